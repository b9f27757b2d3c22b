//! Grouping of votes into historical periods.

use std::collections::BTreeMap;

use crate::error::AnalysisError;
use crate::model::{PeriodComparison, PeriodStats, VoteRecord, VoteTable, SOCIETY_ORIENTED};
use crate::stats::{mean, median};

/// Label for votes without a usable year.
pub const UNKNOWN_PERIOD: &str = "unknown";

/// Era boundaries: (first year, last year). Years past the last era end
/// still fall into it.
const ERAS: &[(i32, i32)] = &[
    (1893, 1919),
    (1920, 1949),
    (1950, 1979),
    (1980, 2009),
    (2010, 2025),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodScheme {
    /// Five historical eras from 1893 to 2025.
    Eras,
    /// Fixed-width buckets aligned to multiples of `width`.
    Fixed { width: u32 },
}

impl PeriodScheme {
    pub fn assign(&self, year: Option<i32>) -> String {
        let Some(year) = year else {
            return UNKNOWN_PERIOD.to_string();
        };
        match *self {
            Self::Eras => {
                let (start, end) = ERAS
                    .iter()
                    .copied()
                    .find(|(_, end)| year <= *end)
                    .unwrap_or(ERAS[ERAS.len() - 1]);
                format!("{start}-{end}")
            }
            Self::Fixed { width } => {
                let width = width.max(1) as i32;
                let start = year.div_euclid(width) * width;
                format!("{start}-{}", start + width - 1)
            }
        }
    }
}

/// Integer midpoint of a `start-end` label, `None` for anything else.
pub fn period_midpoint(label: &str) -> Option<i32> {
    let (start, end) = label.split_once('-')?;
    let start: i32 = start.trim().parse().ok()?;
    let end: i32 = end.trim().parse().ok()?;
    Some((start + end).div_euclid(2))
}

fn group_by_period<'a>(
    records: impl Iterator<Item = &'a VoteRecord>,
    scheme: PeriodScheme,
) -> BTreeMap<String, Vec<&'a VoteRecord>> {
    let mut groups: BTreeMap<String, Vec<&VoteRecord>> = BTreeMap::new();
    for r in records {
        groups.entry(scheme.assign(r.year())).or_default().push(r);
    }
    groups
}

fn acceptance_values(records: &[&VoteRecord], acceptance: &str) -> Vec<f64> {
    records.iter().filter_map(|r| r.number(acceptance)).collect()
}

/// Mean, median and count of acceptance per period over all votes, sorted
/// by period label. `count` is the number of valid acceptance values.
pub fn period_statistics(
    table: &VoteTable,
    scheme: PeriodScheme,
    acceptance: &str,
) -> Vec<PeriodStats> {
    group_by_period(table.records().iter(), scheme)
        .into_iter()
        .map(|(period, records)| {
            let values = acceptance_values(&records, acceptance);
            PeriodStats {
                period,
                mean: mean(&values),
                median: median(&values),
                count: values.len(),
            }
        })
        .collect()
}

/// Mean acceptance per period for society-oriented and other votes.
pub fn society_vs_other_by_period(
    table: &VoteTable,
    scheme: PeriodScheme,
    acceptance: &str,
) -> Result<Vec<PeriodComparison>, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let out = group_by_period(table.records().iter(), scheme)
        .into_iter()
        .map(|(period, records)| {
            let (society, other): (Vec<&VoteRecord>, Vec<&VoteRecord>) =
                records.into_iter().partition(|r| r.is_society_oriented());
            PeriodComparison {
                period,
                society_mean: mean(&acceptance_values(&society, acceptance)),
                other_mean: mean(&acceptance_values(&other, acceptance)),
            }
        })
        .collect();
    Ok(out)
}
