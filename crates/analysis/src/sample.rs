use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::config::ColumnConfig;
use crate::error::AnalysisError;
use crate::model::{VoteRecord, VoteTable, SOCIETY_ORIENTED};

/// Stratified random sample for checking the classification by hand.
///
/// Draws up to `size / 2` society-oriented and `size / 2` other votes
/// (society-oriented first), projected onto id, date, titles, label and
/// acceptance. The same seed gives the same sample.
pub fn validation_sample(
    table: &VoteTable,
    size: usize,
    seed: Option<u64>,
    columns: &ColumnConfig,
) -> Result<VoteTable, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };

    let half = size / 2;
    let society: Vec<&VoteRecord> = table.society_votes().collect();
    let other: Vec<&VoteRecord> = table.other_votes().collect();
    let mut picked: Vec<VoteRecord> = Vec::with_capacity(half * 2);
    picked.extend(society.choose_multiple(&mut rng, half).map(|r| (*r).clone()));
    picked.extend(other.choose_multiple(&mut rng, half).map(|r| (*r).clone()));
    debug!(
        "validation sample: {} of {} votes",
        picked.len(),
        table.len()
    );

    Ok(table.with_records(picked).project(&[
        columns.id.as_str(),
        columns.date.as_str(),
        columns.short_title.as_str(),
        columns.official_title.as_str(),
        SOCIETY_ORIENTED,
        columns.acceptance.as_str(),
    ]))
}
