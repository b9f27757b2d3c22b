//! Side-by-side comparison of several votes at canton level.

use log::warn;
use serde::Serialize;

use crate::config::{ColumnConfig, RegionConfig};
use crate::error::AnalysisError;
use crate::model::VoteTable;
use crate::search::{canton_profile, profile_statistics, CantonProfile};
use crate::stats::{mean, pearson, population_std};

pub const MAX_COMPARED_VOTES: usize = 6;
const STRONGEST_PAIRS: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteSummary {
    pub term: String,
    pub title: String,
    pub mean: f64,
    pub accepted: usize,
    pub cantons: usize,
    /// Share of cantons accepting, in percent.
    pub acceptance_share: f64,
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CorrelationStrength {
    VeryStrong,
    Strong,
    Moderate,
}

impl CorrelationStrength {
    pub fn of(r: f64) -> Self {
        if r.abs() > 0.8 {
            Self::VeryStrong
        } else if r.abs() > 0.6 {
            Self::Strong
        } else {
            Self::Moderate
        }
    }
}

impl std::fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VeryStrong => write!(f, "very strong"),
            Self::Strong => write!(f, "strong"),
            Self::Moderate => write!(f, "moderate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairCorrelation {
    pub left: String,
    pub right: String,
    pub correlation: f64,
    pub strength: CorrelationStrength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub votes: Vec<VoteSummary>,
    /// Terms that were dropped: over the limit, not found, or without data.
    pub skipped: Vec<String>,
    pub strongest: Vec<PairCorrelation>,
    pub mean_of_means: f64,
    pub mean_acceptance_share: f64,
    /// Population standard deviation of the per-vote means.
    pub std_of_means: f64,
}

/// Compare 2 to 6 votes found by search term.
///
/// Terms past the sixth are dropped with a warning. Terms that do not
/// resolve to a vote with canton data are skipped; fewer than two usable
/// votes is an error. Correlations use cantons present in both votes.
pub fn compare_votes(
    table: &VoteTable,
    terms: &[&str],
    columns: &ColumnConfig,
    regions: &RegionConfig,
) -> Result<Comparison, AnalysisError> {
    if terms.len() < 2 {
        return Err(AnalysisError::InvalidArgument(
            "at least 2 votes are required for a comparison".into(),
        ));
    }
    let mut skipped: Vec<String> = Vec::new();
    if terms.len() > MAX_COMPARED_VOTES {
        warn!(
            "{} votes requested, comparing the first {MAX_COMPARED_VOTES}",
            terms.len()
        );
        skipped.extend(terms[MAX_COMPARED_VOTES..].iter().map(|t| t.to_string()));
    }

    let mut profiles: Vec<CantonProfile> = Vec::new();
    let mut votes: Vec<VoteSummary> = Vec::new();
    for term in terms.iter().take(MAX_COMPARED_VOTES) {
        let profile = match canton_profile(table, term, columns, regions) {
            Ok(p) => p,
            Err(e) => {
                warn!("skipping '{term}': {e}");
                skipped.push(term.to_string());
                continue;
            }
        };
        let Some(stats) = profile_statistics(&profile) else {
            warn!("skipping '{term}': no canton data");
            skipped.push(term.to_string());
            continue;
        };
        let cantons = profile.cantons.len();
        votes.push(VoteSummary {
            term: term.to_string(),
            title: profile.title.clone(),
            mean: stats.mean,
            accepted: stats.accepted,
            cantons,
            acceptance_share: stats.accepted as f64 / cantons as f64 * 100.0,
            min: stats.lowest.yes_percentage,
            max: stats.highest.yes_percentage,
        });
        profiles.push(profile);
    }

    if votes.len() < 2 {
        return Err(AnalysisError::InvalidArgument(
            "not enough valid votes for a comparison".into(),
        ));
    }

    let mut pairs: Vec<PairCorrelation> = Vec::new();
    for i in 0..profiles.len() {
        for j in (i + 1)..profiles.len() {
            let (x, y) = shared_cantons(&profiles[i], &profiles[j]);
            if let Some(c) = pearson(&x, &y) {
                pairs.push(PairCorrelation {
                    left: votes[i].term.clone(),
                    right: votes[j].term.clone(),
                    correlation: c.r,
                    strength: CorrelationStrength::of(c.r),
                });
            }
        }
    }
    pairs.sort_by(|a, b| b.correlation.abs().total_cmp(&a.correlation.abs()));
    pairs.truncate(STRONGEST_PAIRS);

    let means: Vec<f64> = votes.iter().map(|v| v.mean).collect();
    let shares: Vec<f64> = votes.iter().map(|v| v.acceptance_share).collect();
    Ok(Comparison {
        mean_of_means: mean(&means).unwrap_or(0.0),
        mean_acceptance_share: mean(&shares).unwrap_or(0.0),
        std_of_means: population_std(&means).unwrap_or(0.0),
        votes,
        skipped,
        strongest: pairs,
    })
}

fn shared_cantons(a: &CantonProfile, b: &CantonProfile) -> (Vec<f64>, Vec<f64>) {
    a.cantons
        .iter()
        .filter_map(|ca| {
            let cb = b.cantons.iter().find(|cb| cb.code == ca.code)?;
            Some((ca.yes_percentage, cb.yes_percentage))
        })
        .unzip()
}
