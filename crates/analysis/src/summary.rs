use crate::config::ColumnConfig;
use crate::error::AnalysisError;
use crate::model::{
    AcceptanceStats, DataQuality, SummaryResult, TimeSpan, VoteRecord, VoteTable,
    SOCIETY_ORIENTED,
};
use crate::parse::parse_vote_date;
use crate::stats::{mean, median, sample_std};

fn acceptance_stats<'a>(
    records: impl Iterator<Item = &'a VoteRecord>,
    acceptance: &str,
) -> AcceptanceStats {
    let values: Vec<f64> = records.filter_map(|r| r.number(acceptance)).collect();
    AcceptanceStats {
        mean: mean(&values),
        median: median(&values),
        std: sample_std(&values),
    }
}

/// Count records where `column` is absent or has no usable value.
/// An absent column counts every row.
fn missing(table: &VoteTable, column: &str, present: impl Fn(&VoteRecord) -> bool) -> usize {
    if !table.has_column(column) {
        return table.len();
    }
    table.records().iter().filter(|r| !present(r)).count()
}

/// Classification counts, per-class acceptance statistics, time span and
/// data-quality counters for a labeled table.
pub fn summarize(table: &VoteTable, columns: &ColumnConfig) -> Result<SummaryResult, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;

    let total_votes = table.len();
    let society_votes = table.society_votes().count();
    let society_percentage = if total_votes == 0 {
        None
    } else {
        Some(society_votes as f64 / total_votes as f64 * 100.0)
    };

    let years: Vec<i32> = table.records().iter().filter_map(VoteRecord::year).collect();
    let time_span = match (years.iter().min(), years.iter().max()) {
        (Some(&start), Some(&end)) => Some(TimeSpan {
            start,
            end,
            years: end - start,
        }),
        _ => None,
    };

    let acceptance = columns.acceptance.as_str();
    let data_quality = DataQuality {
        missing_dates: missing(table, &columns.date, |r| {
            r.date.is_some() || r.text(&columns.date).and_then(parse_vote_date).is_some()
        }),
        missing_titles: missing(table, &columns.short_title, |r| {
            r.text(&columns.short_title).is_some()
        }),
        missing_results: missing(table, acceptance, |r| r.number(acceptance).is_some()),
    };

    Ok(SummaryResult {
        total_votes,
        society_votes,
        society_percentage,
        society_acceptance: acceptance_stats(table.society_votes(), acceptance),
        other_acceptance: acceptance_stats(table.other_votes(), acceptance),
        time_span,
        data_quality,
    })
}
