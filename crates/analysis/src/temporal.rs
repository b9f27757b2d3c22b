//! Time-based analysis of society-oriented votes.

use std::collections::BTreeMap;

use log::debug;
use serde::Serialize;

use crate::config::RegionConfig;
use crate::error::AnalysisError;
use crate::model::{
    TemporalAnalysis, TemporalResult, TrendFit, TrendInterpretation, VoteRecord, VoteTable,
    SOCIETY_ORIENTED, YEAR,
};
use crate::stats::{linear_regression, mean, median, pearson};

pub const INSUFFICIENT_DATA: &str = "not enough data for time analysis";

const SIGNIFICANCE: f64 = 0.05;

fn interpret(correlation: f64, p_value: f64) -> TrendInterpretation {
    if p_value < SIGNIFICANCE {
        if correlation > 0.0 {
            TrendInterpretation::SignificantIncrease
        } else {
            TrendInterpretation::SignificantDecrease
        }
    } else {
        TrendInterpretation::NoSignificantTrend
    }
}

/// (period, acceptance) pairs where both values are present.
fn complete_pairs(records: &[&VoteRecord], period_field: &str, acceptance: &str) -> (Vec<f64>, Vec<f64>) {
    records
        .iter()
        .filter_map(|r| Some((r.number(period_field)?, r.number(acceptance)?)))
        .unzip()
}

/// Acceptance statistics and time trend over society-oriented votes.
///
/// Fewer than two society-oriented votes yields
/// `TemporalAnalysis::Insufficient`. Trend fields are filled in with at
/// least two complete (period, acceptance) pairs spanning more than one
/// period. Constant acceptance fits with slope 0 and no correlation.
pub fn analyze_trends(
    table: &VoteTable,
    period_field: &str,
    acceptance: &str,
) -> Result<TemporalAnalysis, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    table.require_column(period_field)?;

    let society: Vec<&VoteRecord> = table.society_votes().collect();
    if society.len() < 2 {
        return Ok(TemporalAnalysis::Insufficient {
            error: INSUFFICIENT_DATA.to_string(),
        });
    }

    let periods: Vec<f64> = society.iter().filter_map(|r| r.number(period_field)).collect();
    let time_span = periods
        .iter()
        .copied()
        .fold(None, |acc: Option<(f64, f64)>, p| match acc {
            None => Some((p, p)),
            Some((lo, hi)) => Some((lo.min(p), hi.max(p))),
        })
        .map(|(lo, hi)| hi - lo);
    let values: Vec<f64> = society.iter().filter_map(|r| r.number(acceptance)).collect();

    let (x, y) = complete_pairs(&society, period_field, acceptance);
    let trend = match linear_regression(&x, &y) {
        Some(fit) => {
            let corr = pearson(&x, &y);
            Some(TrendFit {
                correlation: corr.map(|c| c.r),
                correlation_p_value: corr.map(|c| c.p_value),
                trend_slope: fit.slope,
                trend_intercept: fit.intercept,
                trend_per_decade: fit.slope * 10.0,
                r_squared: fit.r_squared,
                interpretation: corr
                    .map(|c| interpret(c.r, c.p_value))
                    .unwrap_or(TrendInterpretation::NoSignificantTrend),
            })
        }
        None => {
            debug!("{} complete pairs, no trend fit", x.len());
            None
        }
    };

    Ok(TemporalAnalysis::Complete(TemporalResult {
        total_votes: society.len(),
        time_span,
        mean_acceptance: mean(&values),
        median_acceptance: median(&values),
        trend,
    }))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeCorrelation {
    pub correlation: f64,
    pub p_value: f64,
    pub interpretation: TrendInterpretation,
}

/// Correlation between year and acceptance over society-oriented votes.
///
/// Falls back to r = 0, p = 1 when there is nothing to correlate.
pub fn correlation_time_acceptance(
    table: &VoteTable,
    acceptance: &str,
) -> Result<TimeCorrelation, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let society: Vec<&VoteRecord> = table.society_votes().collect();
    let (x, y) = complete_pairs(&society, YEAR, acceptance);
    Ok(match pearson(&x, &y) {
        Some(c) => TimeCorrelation {
            correlation: c.r,
            p_value: c.p_value,
            interpretation: interpret(c.r, c.p_value),
        },
        None => TimeCorrelation {
            correlation: 0.0,
            p_value: 1.0,
            interpretation: TrendInterpretation::InsufficientData,
        },
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DecadeCount {
    pub decade: i32,
    pub count: usize,
}

/// Number of society-oriented votes per decade, ascending.
pub fn decade_counts(table: &VoteTable) -> Result<Vec<DecadeCount>, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let mut counts: BTreeMap<i32, usize> = BTreeMap::new();
    for year in table.society_votes().filter_map(VoteRecord::year) {
        *counts.entry(year.div_euclid(10) * 10).or_default() += 1;
    }
    Ok(counts
        .into_iter()
        .map(|(decade, count)| DecadeCount { decade, count })
        .collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub year: i32,
    pub mean: f64,
}

/// Rolling mean of acceptance over society-oriented votes sorted by year.
///
/// The window counts votes, not years. A point is emitted once the window
/// holds at least `min_periods` valid values. Votes without a year are
/// skipped.
pub fn rolling_acceptance(
    table: &VoteTable,
    acceptance: &str,
    window: usize,
    min_periods: usize,
) -> Result<Vec<RollingPoint>, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    if window == 0 {
        return Err(AnalysisError::InvalidArgument(
            "rolling window must be at least 1".into(),
        ));
    }
    let mut series: Vec<(i32, Option<f64>)> = table
        .society_votes()
        .filter_map(|r| Some((r.year()?, r.number(acceptance))))
        .collect();
    series.sort_by_key(|(year, _)| *year);

    let mut out = Vec::new();
    for i in 0..series.len() {
        let start = (i + 1).saturating_sub(window);
        let values: Vec<f64> = series[start..=i].iter().filter_map(|(_, v)| *v).collect();
        if values.len() >= min_periods.max(1) {
            if let Some(m) = mean(&values) {
                out.push(RollingPoint {
                    year: series[i].0,
                    mean: m,
                });
            }
        }
    }
    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CantonTrend {
    pub canton: String,
    pub slope: f64,
    pub intercept: f64,
    pub votes: usize,
}

/// Linear trend of canton yes-percentages over society-oriented votes.
///
/// Only votes with a year and a valid value for every requested canton
/// are used. Returns an empty list when no such vote exists.
pub fn canton_trends(
    table: &VoteTable,
    cantons: &[&str],
    regions: &RegionConfig,
) -> Result<Vec<CantonTrend>, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let columns: Vec<String> = cantons
        .iter()
        .map(|c| format!("{}{}", c.to_lowercase(), regions.suffix))
        .collect();
    for column in &columns {
        table.require_column(column)?;
    }

    let rows: Vec<(f64, Vec<f64>)> = table
        .society_votes()
        .filter_map(|r| {
            let year = r.number(YEAR)?;
            let values = columns
                .iter()
                .map(|c| r.number(c))
                .collect::<Option<Vec<f64>>>()?;
            Some((year, values))
        })
        .collect();
    if rows.is_empty() {
        debug!("no complete rows for canton trends");
        return Ok(Vec::new());
    }

    let years: Vec<f64> = rows.iter().map(|(y, _)| *y).collect();
    let mut out = Vec::new();
    for (i, canton) in cantons.iter().enumerate() {
        let values: Vec<f64> = rows.iter().map(|(_, v)| v[i]).collect();
        if let Some(fit) = linear_regression(&years, &values) {
            out.push(CantonTrend {
                canton: canton.to_lowercase(),
                slope: fit.slope,
                intercept: fit.intercept,
                votes: rows.len(),
            });
        }
    }
    Ok(out)
}
