use log::info;

use crate::classify::classify_fields;
use crate::columns::extract_region_columns;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::model::{AnalysisReport, ReportMeta, VoteTable, YEAR};
use crate::period::society_vs_other_by_period;
use crate::ranking::rank_regions;
use crate::summary::summarize;
use crate::temporal::analyze_trends;

/// Classify the table per config, then summarize, rank, and analyze trends.
///
/// A table that already carries `society_oriented` labels (a previous
/// export) keeps them. Returns the report together with the labeled table
/// so the caller can export it.
pub fn run(
    config: &AnalysisConfig,
    table: &VoteTable,
) -> Result<(AnalysisReport, VoteTable), AnalysisError> {
    let stored_labels = table.is_classified();
    let labeled = if stored_labels {
        info!("input already labeled, keeping stored labels");
        table.clone()
    } else {
        let keywords = config.keywords.sets();
        classify_fields(table, &keywords, &config.columns.text_fields())
    };
    let acceptance = config.columns.acceptance.as_str();

    let summary = summarize(&labeled, &config.columns)?;
    let ranking = rank_regions(&labeled, &config.regions)?;
    let trends = analyze_trends(&labeled, YEAR, acceptance)?;
    let periods = society_vs_other_by_period(&labeled, config.periods.scheme(), acceptance)?;

    info!(
        "analysis done: {} votes, {} society-oriented, {} regions ranked",
        summary.total_votes,
        summary.society_votes,
        ranking.len()
    );

    let report = AnalysisReport {
        meta: ReportMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            keyword_preset: config.keywords.preset.to_string(),
            stored_labels,
            records: labeled.len(),
            region_columns: extract_region_columns(&labeled, &config.regions.suffix).len(),
        },
        summary,
        ranking,
        trends,
        periods,
    };
    Ok((report, labeled))
}
