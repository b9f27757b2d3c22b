use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::error::AnalysisError;
use crate::parse::{parse_label, parse_percentage, parse_vote_date};

/// Column that carries the classification label once `classify` has run.
pub const SOCIETY_ORIENTED: &str = "society_oriented";

/// Derived calendar year of the vote date.
pub const YEAR: &str = "year";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single referendum row.
///
/// Cells are kept as raw text keyed by column name; empty cells are absent.
/// Numeric columns are coerced on read through `parse_percentage`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteRecord {
    pub cells: HashMap<String, String>,
    pub date: Option<NaiveDate>,
    pub society_oriented: Option<bool>,
}

impl VoteRecord {
    /// Non-blank text of a cell.
    pub fn text(&self, column: &str) -> Option<&str> {
        self.cells
            .get(column)
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// Numeric value of a cell, `None` when absent or not a number.
    ///
    /// `year` falls back to the parsed date when no year cell is present.
    pub fn number(&self, column: &str) -> Option<f64> {
        match self.text(column).and_then(parse_percentage) {
            Some(v) => Some(v),
            None if column == YEAR => self.date.map(|d| d.year() as f64),
            None => None,
        }
    }

    pub fn year(&self) -> Option<i32> {
        self.number(YEAR).map(|y| y.floor() as i32)
    }

    pub fn is_society_oriented(&self) -> bool {
        self.society_oriented == Some(true)
    }
}

/// In-memory vote table: ordered column names plus records.
///
/// Every analysis takes `&VoteTable` and returns derived data; the table
/// itself is never modified in place by the engine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoteTable {
    columns: Vec<String>,
    records: Vec<VoteRecord>,
}

impl VoteTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            records: Vec::new(),
        }
    }

    /// Build a table from header names and rows of raw text.
    ///
    /// Empty strings are treated as missing. A `society_oriented` column is
    /// parsed back into labels (for re-loading an exported, labeled table).
    pub fn from_rows(columns: &[&str], rows: Vec<Vec<&str>>) -> Self {
        let mut table = Self::new(columns.iter().map(|c| c.to_string()).collect());
        for row in rows {
            let mut record = VoteRecord::default();
            for (column, value) in columns.iter().zip(row) {
                if *column == SOCIETY_ORIENTED {
                    record.society_oriented = parse_label(value);
                } else if !value.is_empty() {
                    record.cells.insert(column.to_string(), value.to_string());
                }
            }
            table.records.push(record);
        }
        table
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[VoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn push(&mut self, record: VoteRecord) {
        self.records.push(record);
    }

    /// Append a column name if it is not already present.
    pub fn add_column(&mut self, name: &str) {
        if !self.has_column(name) {
            self.columns.push(name.to_string());
        }
    }

    /// Same columns, different records.
    pub fn with_records(&self, records: Vec<VoteRecord>) -> VoteTable {
        VoteTable {
            columns: self.columns.clone(),
            records,
        }
    }

    pub fn require_column(&self, name: &str) -> Result<(), AnalysisError> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(AnalysisError::MissingColumn {
                column: name.to_string(),
            })
        }
    }

    pub fn is_classified(&self) -> bool {
        self.has_column(SOCIETY_ORIENTED)
    }

    /// Records labeled society-oriented.
    pub fn society_votes(&self) -> impl Iterator<Item = &VoteRecord> {
        self.records.iter().filter(|r| r.is_society_oriented())
    }

    /// Records labeled anything but society-oriented.
    pub fn other_votes(&self) -> impl Iterator<Item = &VoteRecord> {
        self.records.iter().filter(|r| r.society_oriented == Some(false))
    }

    /// Parse `date_column` into each record's date and derive the `year` column.
    ///
    /// Unparseable dates stay `None`. An existing `year` cell wins over the
    /// derived one.
    pub fn with_parsed_dates(mut self, date_column: &str) -> VoteTable {
        if !self.has_column(date_column) {
            return self;
        }
        self.add_column(YEAR);
        for record in &mut self.records {
            record.date = record.text(date_column).and_then(parse_vote_date);
            if let Some(date) = record.date {
                record
                    .cells
                    .entry(YEAR.to_string())
                    .or_insert_with(|| date.year().to_string());
            }
        }
        self
    }

    /// Keep only the given columns (in the given order) that exist.
    pub fn project(&self, columns: &[&str]) -> VoteTable {
        let kept: Vec<String> = columns
            .iter()
            .filter(|c| self.has_column(c))
            .map(|c| c.to_string())
            .collect();
        let records = self
            .records
            .iter()
            .map(|r| VoteRecord {
                cells: r
                    .cells
                    .iter()
                    .filter(|(k, _)| kept.contains(k))
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect(),
                date: r.date,
                society_oriented: r.society_oriented,
            })
            .collect();
        VoteTable {
            columns: kept,
            records,
        }
    }

    /// Rows as text in column order, label rendered as `True`/`False`.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.records
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(|c| {
                        if c == SOCIETY_ORIENTED {
                            match r.society_oriented {
                                Some(true) => "True".to_string(),
                                Some(false) => "False".to_string(),
                                None => String::new(),
                            }
                        } else {
                            r.cells.get(c).cloned().unwrap_or_default()
                        }
                    })
                    .collect()
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingEntry {
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub mean_yes_percentage: f64,
    pub rank: usize,
}

// ---------------------------------------------------------------------------
// Temporal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendInterpretation {
    SignificantIncrease,
    SignificantDecrease,
    NoSignificantTrend,
    InsufficientData,
}

impl std::fmt::Display for TrendInterpretation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignificantIncrease => write!(
                f,
                "significant positive correlation: support for society-oriented votes has grown over time"
            ),
            Self::SignificantDecrease => write!(
                f,
                "significant negative correlation: support for society-oriented votes has declined over time"
            ),
            Self::NoSignificantTrend => {
                write!(f, "no significant correlation: the data shows no clear trend")
            }
            Self::InsufficientData => write!(f, "not enough data for correlation analysis"),
        }
    }
}

/// Correlation and least-squares fit of acceptance against time.
///
/// The correlation is undefined, and omitted, when acceptance is constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendFit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_p_value: Option<f64>,
    pub trend_slope: f64,
    pub trend_intercept: f64,
    pub trend_per_decade: f64,
    pub r_squared: f64,
    pub interpretation: TrendInterpretation,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemporalResult {
    pub total_votes: usize,
    pub time_span: Option<f64>,
    pub mean_acceptance: Option<f64>,
    pub median_acceptance: Option<f64>,
    #[serde(flatten)]
    pub trend: Option<TrendFit>,
}

/// Outcome of the temporal analysis. Too few classified votes is reported
/// as data, not as an `Err`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TemporalAnalysis {
    Insufficient { error: String },
    Complete(TemporalResult),
}

impl TemporalAnalysis {
    pub fn result(&self) -> Option<&TemporalResult> {
        match self {
            Self::Complete(r) => Some(r),
            Self::Insufficient { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Insufficient { error } => Some(error),
            Self::Complete(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodStats {
    pub period: String,
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodComparison {
    pub period: String,
    pub society_mean: Option<f64>,
    pub other_mean: Option<f64>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AcceptanceStats {
    pub mean: Option<f64>,
    pub median: Option<f64>,
    pub std: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSpan {
    pub start: i32,
    pub end: i32,
    pub years: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub missing_dates: usize,
    pub missing_titles: usize,
    pub missing_results: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryResult {
    pub total_votes: usize,
    pub society_votes: usize,
    /// `None` for a table without rows.
    pub society_percentage: Option<f64>,
    pub society_acceptance: AcceptanceStats,
    pub other_acceptance: AcceptanceStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_span: Option<TimeSpan>,
    pub data_quality: DataQuality,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub engine_version: String,
    pub run_at: String,
    pub keyword_preset: String,
    /// Labels were read from the input instead of computed.
    pub stored_labels: bool,
    pub records: usize,
    pub region_columns: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub meta: ReportMeta,
    pub summary: SummaryResult,
    pub ranking: Vec<RankingEntry>,
    pub trends: TemporalAnalysis,
    pub periods: Vec<PeriodComparison>,
}
