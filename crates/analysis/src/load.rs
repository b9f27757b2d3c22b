//! Delimited-text loading and export of vote tables.

use std::io::Read;
use std::path::Path;

use log::{debug, info};

use crate::config::ColumnConfig;
use crate::error::AnalysisError;
use crate::model::VoteTable;

/// Load a vote table from disk.
///
/// The delimiter is sniffed, the date column parsed and a `year` column
/// derived. A `society_oriented` column from a previous export is read
/// back as labels.
pub fn load_table(path: &Path, columns: &ColumnConfig) -> Result<VoteTable, AnalysisError> {
    if !path.exists() {
        return Err(AnalysisError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    debug!("{}: delimiter {:?}", path.display(), delimiter as char);
    let table = parse_table(&content, delimiter)?.with_parsed_dates(&columns.date);
    info!(
        "loaded {} votes with {} columns from {}",
        table.len(),
        table.columns().len(),
        path.display()
    );
    Ok(table)
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (semicolon, comma, tab, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; semicolon is the fallback.
pub fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b';', b',', b'\t', b'|'];
    let sample_lines: Vec<&str> = content.lines().take(10).collect();

    let mut best = b';';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample_lines
            .iter()
            .map(|line| {
                csv::ReaderBuilder::new()
                    .delimiter(delim)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(line.as_bytes())
                    .records()
                    .next()
                    .and_then(|r| r.ok())
                    .map(|r| r.len())
                    .unwrap_or(1)
            })
            .collect();

        if counts.first().copied().unwrap_or(0) <= 1 {
            continue;
        }

        let target = counts[0];
        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;

        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1252.
pub fn read_file_as_utf8(path: &Path) -> Result<String, AnalysisError> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

/// Parse delimited text with a header row. Header names are trimmed;
/// empty cells become missing.
pub fn parse_table(content: &str, delimiter: u8) -> Result<VoteTable, AnalysisError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(String::as_str).collect();

    let mut rows: Vec<csv::StringRecord> = Vec::new();
    for result in reader.records() {
        rows.push(result?);
    }
    let rows: Vec<Vec<&str>> = rows.iter().map(|r| r.iter().collect()).collect();
    Ok(VoteTable::from_rows(&header_refs, rows))
}

/// Serialize a table (labels included) as delimited text.
pub fn write_table_csv(table: &VoteTable, delimiter: u8) -> Result<String, AnalysisError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(table.columns())?;
    for row in table.text_rows() {
        writer.write_record(&row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| AnalysisError::Io(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| AnalysisError::Io(e.to_string()))
}
