//! Title search and per-canton result profile of a single vote.

use log::{debug, warn};
use regex::RegexBuilder;
use serde::Serialize;

use crate::cantons::canton_name;
use crate::columns::{extract_region_columns, region_code};
use crate::config::{ColumnConfig, RegionConfig};
use crate::error::AnalysisError;
use crate::model::{VoteRecord, VoteTable};
use crate::stats::{mean, median, sample_std};

/// Votes whose `column` matches `term`.
///
/// Non-exact search is a case-insensitive regular expression match
/// anywhere in the title. Exact search compares trimmed, lowercased
/// titles. Votes with no title never match.
pub fn search_by_title(
    table: &VoteTable,
    term: &str,
    exact: bool,
    column: &str,
) -> Result<VoteTable, AnalysisError> {
    table.require_column(column)?;
    let hits: Vec<VoteRecord> = if exact {
        let needle = term.trim().to_lowercase();
        table
            .records()
            .iter()
            .filter(|r| r.text(column).is_some_and(|t| t.trim().to_lowercase() == needle))
            .cloned()
            .collect()
    } else {
        let re = RegexBuilder::new(term)
            .case_insensitive(true)
            .build()
            .map_err(|e| AnalysisError::InvalidPattern {
                pattern: term.to_string(),
                message: e.to_string(),
            })?;
        table
            .records()
            .iter()
            .filter(|r| r.text(column).is_some_and(|t| re.is_match(t)))
            .cloned()
            .collect()
    };
    debug!("search '{term}': {} hits", hits.len());
    Ok(table.with_records(hits))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CantonValue {
    pub code: String,
    pub name: String,
    pub yes_percentage: f64,
}

/// Per-canton yes-percentages of one vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CantonProfile {
    pub term: String,
    pub title: String,
    pub id: Option<String>,
    pub date: Option<String>,
    /// Number of votes that matched; the profile is built from the first.
    pub matches: usize,
    pub cantons: Vec<CantonValue>,
}

/// Find the first vote matching `term` and collect its canton results.
///
/// The short title is searched first, then the official title. Only
/// known cantons with a valid value are kept, in column order.
pub fn canton_profile(
    table: &VoteTable,
    term: &str,
    columns: &ColumnConfig,
    regions: &RegionConfig,
) -> Result<CantonProfile, AnalysisError> {
    let mut hits = if table.has_column(&columns.short_title) {
        search_by_title(table, term, false, &columns.short_title)?
    } else {
        table.with_records(Vec::new())
    };
    if hits.is_empty() && table.has_column(&columns.official_title) {
        hits = search_by_title(table, term, false, &columns.official_title)?;
    }
    let Some(record) = hits.records().first() else {
        return Err(AnalysisError::VoteNotFound {
            term: term.to_string(),
        });
    };

    let region_columns = extract_region_columns(table, &regions.suffix);
    if region_columns.is_empty() {
        return Err(AnalysisError::NoRegionColumns {
            suffix: regions.suffix.clone(),
        });
    }
    if hits.len() > 1 {
        warn!("{} votes match '{term}', using the first", hits.len());
    }

    let cantons = region_columns
        .iter()
        .filter_map(|column| {
            let code = region_code(column, &regions.suffix, regions.code_policy);
            let name = canton_name(&code)?;
            Some(CantonValue {
                name: name.to_string(),
                yes_percentage: record.number(column)?,
                code,
            })
        })
        .collect();

    Ok(CantonProfile {
        term: term.to_string(),
        title: record
            .text(&columns.short_title)
            .or_else(|| record.text(&columns.official_title))
            .unwrap_or(term)
            .to_string(),
        id: record.text(&columns.id).map(String::from),
        date: record.text(&columns.date).map(String::from),
        matches: hits.len(),
        cantons,
    })
}

/// Canton counts per yes-percentage band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalBands {
    /// >= 70
    pub very_high: usize,
    /// 60 to < 70
    pub high: usize,
    /// 40 to < 60
    pub medium: usize,
    /// < 40
    pub low: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileStatistics {
    pub mean: f64,
    pub median: f64,
    pub std: Option<f64>,
    pub range: f64,
    pub highest: CantonValue,
    pub lowest: CantonValue,
    pub accepted: usize,
    pub rejected: usize,
    pub bands: ApprovalBands,
}

/// Descriptive statistics over a profile; `None` when it has no cantons.
/// A canton accepts at 50 % or more.
pub fn profile_statistics(profile: &CantonProfile) -> Option<ProfileStatistics> {
    let values: Vec<f64> = profile.cantons.iter().map(|c| c.yes_percentage).collect();
    let mut highest = profile.cantons.first()?;
    let mut lowest = highest;
    for c in &profile.cantons {
        if c.yes_percentage > highest.yes_percentage {
            highest = c;
        }
        if c.yes_percentage < lowest.yes_percentage {
            lowest = c;
        }
    }

    let mut bands = ApprovalBands::default();
    for v in &values {
        match *v {
            v if v >= 70.0 => bands.very_high += 1,
            v if v >= 60.0 => bands.high += 1,
            v if v >= 40.0 => bands.medium += 1,
            _ => bands.low += 1,
        }
    }
    let accepted = values.iter().filter(|v| **v >= 50.0).count();

    Some(ProfileStatistics {
        mean: mean(&values)?,
        median: median(&values)?,
        std: sample_std(&values),
        range: highest.yes_percentage - lowest.yes_percentage,
        highest: highest.clone(),
        lowest: lowest.clone(),
        accepted,
        rejected: values.len() - accepted,
        bands,
    })
}
