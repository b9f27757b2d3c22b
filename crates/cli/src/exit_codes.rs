//! CLI Exit Code Registry
//!
//! Single source of truth for `votelens` exit codes. Scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range | Domain    | Description                                 |
//! |-------|-----------|---------------------------------------------|
//! | 0     | Universal | Success                                     |
//! | 1     | Universal | General error (unspecified)                 |
//! | 2     | Universal | CLI usage error (bad args)                  |
//! | 3-9   | input     | Data and config files                       |
//! | 10-19 | analysis  | Analysis could not be carried out           |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Update the table above
//! 3. Map it in `exit_code` below

use votelens_analysis::AnalysisError;

// =============================================================================
// Universal (0-2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Input (3-9)
// =============================================================================

/// Data or config file does not exist.
pub const EXIT_FILE_NOT_FOUND: u8 = 3;

/// Reading or writing a file failed.
pub const EXIT_IO: u8 = 4;

/// Data file is not valid delimited text.
pub const EXIT_PARSE: u8 = 5;

/// Config file does not parse or fails validation.
pub const EXIT_INVALID_CONFIG: u8 = 6;

// =============================================================================
// Analysis (10-19)
// =============================================================================

/// A required column is absent from the data.
pub const EXIT_MISSING_COLUMN: u8 = 10;

/// No vote matches the search term.
pub const EXIT_VOTE_NOT_FOUND: u8 = 11;

/// The data has no canton result columns.
pub const EXIT_NO_REGIONS: u8 = 12;

/// Search term is not a valid pattern.
pub const EXIT_INVALID_PATTERN: u8 = 13;

/// Map a library error to its exit code.
pub fn exit_code(err: &AnalysisError) -> u8 {
    match err {
        AnalysisError::ConfigParse(_) | AnalysisError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        AnalysisError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        AnalysisError::VoteNotFound { .. } => EXIT_VOTE_NOT_FOUND,
        AnalysisError::NoRegionColumns { .. } => EXIT_NO_REGIONS,
        AnalysisError::InvalidPattern { .. } => EXIT_INVALID_PATTERN,
        AnalysisError::InvalidArgument(_) => EXIT_USAGE,
        AnalysisError::FileNotFound { .. } => EXIT_FILE_NOT_FOUND,
        AnalysisError::Io(_) => EXIT_IO,
        AnalysisError::Csv(_) => EXIT_PARSE,
    }
}
