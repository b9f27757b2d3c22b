//! Party recommendation support for society-oriented votes.
//!
//! Recommendation codes: 1 = yes, 2 = no. Everything else (3 = free vote,
//! 9999 = none, blanks) counts as missing.

use serde::Serialize;

use crate::config::PartyConfig;
use crate::error::AnalysisError;
use crate::model::{VoteRecord, VoteTable, SOCIETY_ORIENTED};
use crate::parse::parse_percentage;
use crate::stats::{linear_regression, mean, LinearFit};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoteSupport {
    pub id: Option<String>,
    pub year: Option<i32>,
    /// Percentage of liberal parties recommending yes.
    pub liberal: Option<f64>,
    /// Percentage of conservative parties recommending yes.
    pub conservative: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SupportTrend {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
}

impl From<LinearFit> for SupportTrend {
    fn from(fit: LinearFit) -> Self {
        Self {
            slope: fit.slope,
            intercept: fit.intercept,
            r_squared: fit.r_squared,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartySupport {
    pub liberal_parties: Vec<String>,
    pub conservative_parties: Vec<String>,
    pub votes: Vec<VoteSupport>,
    pub liberal_trend: Option<SupportTrend>,
    pub conservative_trend: Option<SupportTrend>,
}

fn recommendation(raw: &str) -> Option<f64> {
    match parse_percentage(raw)? {
        v if v == 1.0 => Some(1.0),
        v if v == 2.0 => Some(0.0),
        _ => None,
    }
}

fn camp_support(record: &VoteRecord, parties: &[String]) -> Option<f64> {
    let values: Vec<f64> = parties
        .iter()
        .filter_map(|p| record.text(p).and_then(recommendation))
        .collect();
    mean(&values).map(|m| m * 100.0)
}

fn available_columns(table: &VoteTable, names: &[String]) -> Vec<String> {
    names
        .iter()
        .filter(|p| table.has_column(p))
        .cloned()
        .collect()
}

fn trend(votes: &[VoteSupport], camp: impl Fn(&VoteSupport) -> Option<f64>) -> Option<SupportTrend> {
    let (x, y): (Vec<f64>, Vec<f64>) = votes
        .iter()
        .filter_map(|v| Some((v.year? as f64, camp(v)?)))
        .unzip();
    linear_regression(&x, &y).map(SupportTrend::from)
}

/// Per-vote share of yes recommendations in each camp, plus a linear trend
/// over time per camp. Party columns missing from the table are ignored.
pub fn party_support(
    table: &VoteTable,
    parties: &PartyConfig,
    id_column: &str,
) -> Result<PartySupport, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let liberal_parties = available_columns(table, &parties.liberal);
    let conservative_parties = available_columns(table, &parties.conservative);

    let votes: Vec<VoteSupport> = table
        .society_votes()
        .map(|r| VoteSupport {
            id: r.text(id_column).map(String::from),
            year: r.year(),
            liberal: camp_support(r, &liberal_parties),
            conservative: camp_support(r, &conservative_parties),
        })
        .collect();

    Ok(PartySupport {
        liberal_trend: trend(&votes, |v| v.liberal),
        conservative_trend: trend(&votes, |v| v.conservative),
        liberal_parties,
        conservative_parties,
        votes,
    })
}
