use std::fmt;

#[derive(Debug)]
pub enum AnalysisError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (overlapping keywords, empty suffix, etc.).
    ConfigValidation(String),
    /// A column the operation cannot do without is absent from the table.
    MissingColumn { column: String },
    /// No vote title matched the search term.
    VoteNotFound { term: String },
    /// The table has no per-canton yes-percentage columns.
    NoRegionColumns { suffix: String },
    /// Search term is not a valid regular expression.
    InvalidPattern { pattern: String, message: String },
    /// Caller passed arguments the operation cannot work with.
    InvalidArgument(String),
    /// Input file does not exist.
    FileNotFound { path: String },
    /// IO error (file read, write, etc.).
    Io(String),
    /// Malformed delimited text.
    Csv(String),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { column } => write!(f, "missing column '{column}'"),
            Self::VoteNotFound { term } => write!(f, "no vote found matching '{term}'"),
            Self::NoRegionColumns { suffix } => {
                write!(f, "no canton columns ending in '{suffix}' in the data")
            }
            Self::InvalidPattern { pattern, message } => {
                write!(f, "invalid search pattern '{pattern}': {message}")
            }
            Self::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            Self::FileNotFound { path } => write!(f, "file not found: {path}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::Csv(msg) => write!(f, "CSV error: {msg}"),
        }
    }
}

impl std::error::Error for AnalysisError {}

impl From<std::io::Error> for AnalysisError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<csv::Error> for AnalysisError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
