//! `votelens-analysis`: referendum classification and aggregation engine.
//!
//! Pure engine crate: receives a pre-loaded vote table, returns labeled
//! copies, rankings and statistics. The `load` module is the only place
//! that touches the filesystem.

pub mod cantons;
pub mod classify;
pub mod columns;
pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod keywords;
pub mod load;
pub mod model;
pub mod parse;
pub mod party;
pub mod period;
pub mod ranking;
pub mod sample;
pub mod search;
pub mod stats;
pub mod summary;
pub mod temporal;

pub use classify::{classify, classify_fields};
pub use columns::extract_region_columns;
pub use config::AnalysisConfig;
pub use engine::run;
pub use error::AnalysisError;
pub use keywords::KeywordSets;
pub use model::{AnalysisReport, RankingEntry, SummaryResult, TemporalAnalysis, VoteRecord, VoteTable};
pub use parse::parse_percentage;
pub use ranking::rank_regions;
pub use summary::summarize;
pub use temporal::analyze_trends;
