use std::path::PathBuf;

use votelens_analysis::compare::compare_votes;
use votelens_analysis::config::AnalysisConfig;
use votelens_analysis::load::{load_table, parse_table, write_table_csv};
use votelens_analysis::model::{TrendInterpretation, VoteTable, SOCIETY_ORIENTED, YEAR};
use votelens_analysis::party::party_support;
use votelens_analysis::period::{period_statistics, society_vs_other_by_period};
use votelens_analysis::sample::validation_sample;
use votelens_analysis::search::{canton_profile, profile_statistics};
use votelens_analysis::temporal::{canton_trends, correlation_time_acceptance};
use votelens_analysis::{analyze_trends, classify, rank_regions, run, summarize, AnalysisError, KeywordSets};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn fixture_config() -> AnalysisConfig {
    let toml = std::fs::read_to_string(fixtures_dir().join("analysis.toml")).unwrap();
    AnalysisConfig::from_toml(&toml).unwrap()
}

fn load_votes(config: &AnalysisConfig) -> VoteTable {
    load_table(&fixtures_dir().join("votes.csv"), &config.columns).unwrap()
}

fn labeled() -> (AnalysisConfig, VoteTable) {
    let config = fixture_config();
    let table = load_votes(&config);
    let labeled = classify(&table, &config.keywords.sets());
    (config, labeled)
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

// -------------------------------------------------------------------------
// Classification
// -------------------------------------------------------------------------

#[test]
fn reference_titles_classify_as_expected() {
    let (_, labeled) = labeled();
    let labels: Vec<bool> = labeled
        .records()
        .iter()
        .map(|r| r.is_society_oriented())
        .collect();
    assert_eq!(
        labels,
        vec![
            true, false, true, false, true, false, true, false, true, true, false, false, false
        ]
    );
}

#[test]
fn short_titles_alone_match_reference_labels() {
    let table = VoteTable::from_rows(
        &["titel_kurz_d"],
        vec![
            vec!["Gesellschaftliche Reform"],
            vec!["Wirtschaftsgesetz"],
            vec!["Bildungsreform"],
            vec!["Steuergesetz"],
            vec!["Gleichstellungsinitiative"],
            vec!["Nationalstrassenbau"],
        ],
    );
    let labels: Vec<bool> = classify(&table, &KeywordSets::default())
        .records()
        .iter()
        .map(|r| r.is_society_oriented())
        .collect();
    assert_eq!(labels, vec![true, false, true, false, true, false]);
}

#[test]
fn classified_and_unclassified_partition_the_table() {
    let (_, labeled) = labeled();
    assert_eq!(
        labeled.society_votes().count() + labeled.other_votes().count(),
        labeled.len()
    );
}

// -------------------------------------------------------------------------
// Summary + Ranking + Trends
// -------------------------------------------------------------------------

#[test]
fn summary_over_fixture() {
    let (config, labeled) = labeled();
    let s = summarize(&labeled, &config.columns).unwrap();
    assert_eq!(s.total_votes, 13);
    assert_eq!(s.society_votes, 6);
    assert!(close(s.society_percentage.unwrap(), 600.0 / 13.0));
    assert!(close(s.society_acceptance.mean.unwrap(), 60.52));
    assert!(close(s.society_acceptance.median.unwrap(), 61.5));
    assert!(close(s.other_acceptance.median.unwrap(), 48.4));
    let span = s.time_span.unwrap();
    assert_eq!((span.start, span.end, span.years), (1985, 2023, 38));
    assert_eq!(s.data_quality.missing_dates, 1);
    assert_eq!(s.data_quality.missing_titles, 1);
    assert_eq!(s.data_quality.missing_results, 1);
}

#[test]
fn ranking_over_fixture() {
    let (config, labeled) = labeled();
    let ranking = rank_regions(&labeled, &config.regions).unwrap();
    let codes: Vec<&str> = ranking.iter().map(|e| e.region.as_str()).collect();
    assert_eq!(codes, vec!["ge", "zh", "be", "ti", "vs"]);
    assert!(close(ranking[0].mean_yes_percentage, 71.5));
    assert!(close(ranking[1].mean_yes_percentage, 63.583333333));
    assert_eq!(ranking[0].name.as_deref(), Some("Genève"));
    for pair in ranking.windows(2) {
        assert!(pair[0].mean_yes_percentage >= pair[1].mean_yes_percentage);
        assert_eq!(pair[0].rank + 1, pair[1].rank);
    }
}

#[test]
fn trends_over_fixture() {
    let (config, labeled) = labeled();
    let analysis = analyze_trends(&labeled, YEAR, &config.columns.acceptance).unwrap();
    let result = analysis.result().unwrap();
    assert_eq!(result.total_votes, 6);
    assert_eq!(result.time_span, Some(35.0));
    let trend = result.trend.as_ref().unwrap();
    let r = trend.correlation.unwrap();
    assert!(close(r, 0.604457525));
    assert!(close(trend.trend_slope, 0.175863931));
    assert!(close(trend.trend_per_decade, 1.75863931));
    assert!(close(trend.r_squared, 0.365368899));
    let p = trend.correlation_p_value.unwrap();
    assert!(p > 0.05 && p < 1.0);
    assert_eq!(trend.interpretation, TrendInterpretation::NoSignificantTrend);

    let corr = correlation_time_acceptance(&labeled, &config.columns.acceptance).unwrap();
    assert!(close(corr.correlation, r));
}

// -------------------------------------------------------------------------
// Periods, Search, Comparison, Parties, Sample
// -------------------------------------------------------------------------

#[test]
fn fixed_width_periods() {
    let (config, labeled) = labeled();
    let acceptance = config.columns.acceptance.as_str();
    let rows = society_vs_other_by_period(&labeled, config.periods.scheme(), acceptance).unwrap();
    let labels: Vec<&str> = rows.iter().map(|r| r.period.as_str()).collect();
    assert_eq!(
        labels,
        vec!["1980-1989", "1990-1999", "2000-2009", "2010-2019", "2020-2029", "unknown"]
    );
    assert_eq!(rows[1].society_mean, Some(61.5));
    assert_eq!(rows[1].other_mean, Some(39.0));
    assert_eq!(rows[5].society_mean, None);

    let stats = period_statistics(&labeled, config.periods.scheme(), acceptance);
    assert_eq!(stats[4].count, 4);
    assert_eq!(stats[5].count, 0);
}

#[test]
fn vote_profile_and_statistics() {
    let (config, labeled) = labeled();
    let profile = canton_profile(&labeled, "ehe für alle", &config.columns, &config.regions).unwrap();
    assert_eq!(profile.id.as_deref(), Some("10"));
    assert_eq!(profile.cantons.len(), 4);
    let stats = profile_statistics(&profile).unwrap();
    assert_eq!(stats.highest.name, "Zürich");
    assert_eq!(stats.lowest.name, "Valais");
    assert_eq!(stats.accepted, 4);
    assert_eq!(stats.bands.very_high, 1);

    let err = canton_profile(&labeled, "Atomausstieg", &config.columns, &config.regions).unwrap_err();
    assert!(matches!(err, AnalysisError::VoteNotFound { .. }));
}

#[test]
fn compare_fixture_votes() {
    let (config, labeled) = labeled();
    let cmp = compare_votes(
        &labeled,
        &["Bildungsreform", "Steuergesetz", "Kampfjets"],
        &config.columns,
        &config.regions,
    )
    .unwrap();
    assert_eq!(cmp.votes.len(), 3);
    assert_eq!(cmp.strongest.len(), 3);
    assert!(cmp.std_of_means > 0.0);
    assert!(cmp.skipped.is_empty());
}

#[test]
fn party_support_over_fixture() {
    let (config, labeled) = labeled();
    let support = party_support(&labeled, &config.parties, &config.columns.id).unwrap();
    let liberal: Vec<Option<f64>> = support.votes.iter().map(|v| v.liberal).collect();
    assert_eq!(
        liberal,
        vec![Some(100.0), Some(100.0), Some(100.0), Some(100.0), Some(50.0), Some(100.0)]
    );
    let conservative: Vec<Option<f64>> = support.votes.iter().map(|v| v.conservative).collect();
    assert_eq!(
        conservative,
        vec![Some(50.0), Some(0.0), Some(0.0), Some(0.0), Some(0.0), Some(50.0)]
    );
}

#[test]
fn canton_trends_over_fixture() {
    let (config, labeled) = labeled();
    let trends = canton_trends(&labeled, &["zh", "be", "vs"], &config.regions).unwrap();
    assert_eq!(trends.len(), 3);
    assert!(trends.iter().all(|t| t.votes == 5));
}

#[test]
fn seeded_validation_sample() {
    let (config, labeled) = labeled();
    let a = validation_sample(&labeled, config.sample.size, config.sample.seed, &config.columns).unwrap();
    let b = validation_sample(&labeled, config.sample.size, config.sample.seed, &config.columns).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.society_votes().count(), 3);
    assert_eq!(a.other_votes().count(), 3);
    assert!(a.has_column(SOCIETY_ORIENTED));
}

// -------------------------------------------------------------------------
// Runner + Export
// -------------------------------------------------------------------------

#[test]
fn run_matches_individual_steps() {
    let config = fixture_config();
    let table = load_votes(&config);
    let (report, labeled) = run(&config, &table).unwrap();
    assert_eq!(report.summary, summarize(&labeled, &config.columns).unwrap());
    assert_eq!(report.ranking, rank_regions(&labeled, &config.regions).unwrap());
    assert_eq!(report.meta.region_columns, 5);
    assert_eq!(report.periods.len(), 6);
}

#[test]
fn run_is_deterministic() {
    let config = fixture_config();
    let table = load_votes(&config);
    let (a, _) = run(&config, &table).unwrap();
    let (b, _) = run(&config, &table).unwrap();
    assert_eq!(a.summary, b.summary);
    assert_eq!(a.ranking, b.ranking);
    assert_eq!(a.trends, b.trends);
}

#[test]
fn exported_labels_reload_to_same_results() {
    let (config, labeled) = labeled();
    let text = write_table_csv(&labeled, b';').unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labeled.csv");
    std::fs::write(&path, &text).unwrap();
    let reloaded = load_table(&path, &config.columns).unwrap();

    assert!(reloaded.is_classified());
    assert_eq!(
        summarize(&reloaded, &config.columns).unwrap(),
        summarize(&labeled, &config.columns).unwrap()
    );
    assert_eq!(
        rank_regions(&reloaded, &config.regions).unwrap(),
        rank_regions(&labeled, &config.regions).unwrap()
    );
    let direct = parse_table(&text, b';').unwrap();
    assert_eq!(direct.len(), labeled.len());
}

/// Flip the stored label of vote `id` in an exported table.
fn relabel(text: &str, id: &str) -> String {
    text.lines()
        .map(|line| {
            if line.starts_with(&format!("{id};")) {
                line.replace(";False", ";True")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn run_keeps_hand_edited_labels() {
    let (config, labeled) = labeled();
    let text = relabel(&write_table_csv(&labeled, b';').unwrap(), "4");

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("edited.csv");
    std::fs::write(&path, &text).unwrap();
    let reloaded = load_table(&path, &config.columns).unwrap();
    assert_eq!(reloaded.society_votes().count(), 7);

    let (report, out) = run(&config, &reloaded).unwrap();
    assert!(report.meta.stored_labels);
    assert_eq!(report.summary.society_votes, 7);
    assert_eq!(report.summary, summarize(&reloaded, &config.columns).unwrap());
    assert_eq!(out, reloaded);
}
