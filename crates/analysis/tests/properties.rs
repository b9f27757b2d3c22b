// Property-based tests for classification, ranking and trend statistics.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::BTreeSet;

use proptest::prelude::*;
use votelens_analysis::columns::{extract_region_columns, region_code};
use votelens_analysis::config::{ColumnConfig, RegionConfig};
use votelens_analysis::model::{VoteTable, SOCIETY_ORIENTED, YEAR};
use votelens_analysis::{analyze_trends, classify, rank_regions, summarize, KeywordSets};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

const REGIONS: &[&str] = &["zh-japroz", "be-japroz", "ge-japroz", "ai-ar-japroz"];

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

/// Title words: keyword hits, vetoes and neutral filler.
fn arb_word() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => prop::sample::select(vec![
            "Bildung", "Frauen", "Sozialhilfe", "Familie", "Mieterschutz", "Jugendschutz",
        ]),
        2 => prop::sample::select(vec![
            "Mehrwertsteuer", "Verkehr", "Nationalstrassen", "Zölle", "Militärgesetz",
        ]),
        3 => prop::sample::select(vec![
            "Bundesgesetz", "Initiative", "über", "die", "Revision", "Vorlage",
        ]),
    ]
    .prop_map(String::from)
}

fn arb_title() -> impl Strategy<Value = String> {
    prop::collection::vec(arb_word(), 0..5).prop_map(|w| w.join(" "))
}

/// Percentage cell: mostly numeric, sometimes garbage, sometimes empty.
fn arb_percentage() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (0.0..100.0f64).prop_map(|v| format!("{v:.1}")),
        1 => r"[a-z]{1,4}",
        1 => Just(String::new()),
    ]
}

fn arb_year() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1893i32..2025).prop_map(|y| y.to_string()),
        1 => Just(String::new()),
    ]
}

/// (short title, official title, year, acceptance, region values)
type Row = (String, String, String, String, Vec<String>);

fn arb_rows(max: usize) -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (
            arb_title(),
            arb_title(),
            arb_year(),
            arb_percentage(),
            prop::collection::vec(arb_percentage(), REGIONS.len()),
        ),
        0..max,
    )
}

fn build_table(rows: &[Row]) -> VoteTable {
    let mut columns = vec!["titel_kurz_d", "titel_off_d", YEAR, "volkja-proz"];
    columns.extend_from_slice(REGIONS);
    let cells: Vec<Vec<&str>> = rows
        .iter()
        .map(|(short, official, year, acceptance, regions)| {
            let mut row = vec![short.as_str(), official.as_str(), year.as_str(), acceptance.as_str()];
            row.extend(regions.iter().map(String::as_str));
            row
        })
        .collect();
    VoteTable::from_rows(&columns, cells)
}

fn labels(table: &VoteTable) -> Vec<bool> {
    table
        .records()
        .iter()
        .map(|r| r.is_society_oriented())
        .collect()
}

/// Region codes with at least one valid value among society-oriented votes.
fn regions_with_values(table: &VoteTable, regions: &RegionConfig) -> BTreeSet<String> {
    extract_region_columns(table, &regions.suffix)
        .into_iter()
        .filter(|c| table.society_votes().any(|r| r.number(c).is_some()))
        .map(|c| region_code(&c, &regions.suffix, regions.code_policy))
        .collect()
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn default_keywords_are_disjoint() {
    assert!(KeywordSets::default().overlap().is_empty());
}

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn classification_is_deterministic(rows in arb_rows(30)) {
        let table = build_table(&rows);
        let keywords = KeywordSets::default();
        let a = classify(&table, &keywords);
        let b = classify(&table, &keywords);
        prop_assert_eq!(labels(&a), labels(&b));
        prop_assert_eq!(a.len(), table.len());
    }

    #[test]
    fn extra_exclusion_never_adds_labels(
        rows in arb_rows(30),
        extra in prop::sample::select(vec!["bundes", "initiative", "vorlage", "revision", "gesetz"]),
    ) {
        let table = build_table(&rows);
        let base = KeywordSets::default();
        let mut exclusion = base.exclusion().to_vec();
        exclusion.push(extra.to_string());
        let stricter = KeywordSets::new(base.inclusion().to_vec(), exclusion);

        let before = labels(&classify(&table, &base));
        let after = labels(&classify(&table, &stricter));
        for (b, a) in before.iter().zip(&after) {
            prop_assert!(!(*a && !*b), "label turned true after adding an exclusion word");
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn ranking_is_ordered_and_complete(rows in arb_rows(30)) {
        let labeled = classify(&build_table(&rows), &KeywordSets::default());
        let regions = RegionConfig::default();
        let ranking = rank_regions(&labeled, &regions).unwrap();

        let expected = regions_with_values(&labeled, &regions);
        prop_assert!(ranking.len() <= expected.len());
        for pair in ranking.windows(2) {
            prop_assert!(pair[0].mean_yes_percentage >= pair[1].mean_yes_percentage);
        }
        for (i, entry) in ranking.iter().enumerate() {
            prop_assert_eq!(entry.rank, i + 1);
        }

        let ranked: BTreeSet<String> = ranking.iter().map(|e| e.region.clone()).collect();
        prop_assert_eq!(ranked, expected);
    }

    #[test]
    fn ranking_without_society_votes_is_empty(rows in arb_rows(20)) {
        let table = build_table(&rows);
        let none = KeywordSets::new(["no-such-keyword"], Vec::<String>::new());
        let labeled = classify(&table, &none);
        prop_assert!(rank_regions(&labeled, &RegionConfig::default()).unwrap().is_empty());
    }
}

// ---------------------------------------------------------------------------
// Trends + Summary
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]
    #[test]
    fn trend_statistics_are_bounded(rows in arb_rows(40)) {
        let labeled = classify(&build_table(&rows), &KeywordSets::default());
        let analysis = analyze_trends(&labeled, YEAR, "volkja-proz").unwrap();
        let society = labeled.society_votes().count();

        match analysis.result() {
            None => {
                prop_assert!(society < 2);
                prop_assert!(analysis.error().is_some());
            }
            Some(result) => {
                prop_assert_eq!(result.total_votes, society);
                if let Some(trend) = &result.trend {
                    if let Some(r) = trend.correlation {
                        prop_assert!((-1.0..=1.0).contains(&r));
                    }
                    if let Some(p) = trend.correlation_p_value {
                        prop_assert!((0.0..=1.0).contains(&p));
                    }
                    prop_assert!((0.0..=1.0).contains(&trend.r_squared));
                }
            }
        }
    }

    #[test]
    fn summary_percentage_is_bounded(rows in arb_rows(30)) {
        let labeled = classify(&build_table(&rows), &KeywordSets::default());
        let summary = summarize(&labeled, &ColumnConfig::default()).unwrap();
        prop_assert_eq!(summary.total_votes, labeled.len());
        prop_assert!(summary.society_votes <= summary.total_votes);
        match summary.society_percentage {
            Some(p) => prop_assert!((0.0..=100.0).contains(&p)),
            None => prop_assert_eq!(summary.total_votes, 0),
        }
        prop_assert!(labeled.has_column(SOCIETY_ORIENTED));
    }
}
