use log::{debug, warn};

use crate::cantons::canton_name;
use crate::columns::{extract_region_columns, region_code};
use crate::config::RegionConfig;
use crate::error::AnalysisError;
use crate::model::{RankingEntry, VoteTable, SOCIETY_ORIENTED};
use crate::stats::mean;

/// Rank regions by mean yes-percentage over society-oriented votes.
///
/// Cells that do not parse as numbers are ignored; a region with no valid
/// value is left out. Columns mapping to the same region code are pooled
/// into one entry. Ties keep column order. Ranks start at 1.
pub fn rank_regions(
    table: &VoteTable,
    regions: &RegionConfig,
) -> Result<Vec<RankingEntry>, AnalysisError> {
    table.require_column(SOCIETY_ORIENTED)?;

    let society: Vec<_> = table.society_votes().collect();
    if society.is_empty() {
        debug!("no society-oriented votes, ranking is empty");
        return Ok(Vec::new());
    }

    // Columns that share a region code are pooled, in first-seen order.
    let mut pooled: Vec<(String, Vec<f64>)> = Vec::new();
    for column in extract_region_columns(table, &regions.suffix) {
        let code = region_code(&column, &regions.suffix, regions.code_policy);
        let values = society.iter().filter_map(|r| r.number(&column));
        match pooled.iter_mut().find(|(c, _)| *c == code) {
            Some((_, existing)) => {
                warn!("region column '{column}' maps to '{code}' again, pooling its values");
                existing.extend(values);
            }
            None => pooled.push((code, values.collect())),
        }
    }

    let mut entries: Vec<RankingEntry> = Vec::new();
    for (code, values) in pooled {
        let Some(m) = mean(&values) else {
            debug!("region '{code}' has no valid values, skipped");
            continue;
        };
        entries.push(RankingEntry {
            name: canton_name(&code).map(String::from),
            region: code,
            mean_yes_percentage: m,
            rank: 0,
        });
    }

    entries.sort_by(|a, b| b.mean_yes_percentage.total_cmp(&a.mean_yes_percentage));
    for (i, e) in entries.iter_mut().enumerate() {
        e.rank = i + 1;
    }
    Ok(entries)
}
