//! Subcommand implementations: load data, run one analysis, print.

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;
use votelens_analysis::compare::compare_votes;
use votelens_analysis::config::PeriodKind;
use votelens_analysis::load::{load_table, write_table_csv};
use votelens_analysis::model::YEAR;
use votelens_analysis::party::party_support;
use votelens_analysis::period::{period_statistics, society_vs_other_by_period};
use votelens_analysis::sample::validation_sample;
use votelens_analysis::search::{canton_profile, profile_statistics, search_by_title};
use votelens_analysis::temporal::{
    canton_trends, correlation_time_acceptance, decade_counts, rolling_acceptance,
};
use votelens_analysis::{
    analyze_trends, classify_fields, rank_regions, run, summarize, AnalysisConfig, AnalysisError,
    TemporalAnalysis, VoteTable,
};

use crate::{Commands, CliError, GlobalArgs, SchemeArg};

pub fn dispatch(cmd: Commands, global: &GlobalArgs) -> Result<(), CliError> {
    if let Commands::Validate { file } = &cmd {
        return cmd_validate(file);
    }
    let mut config = load_config(global.config.as_deref())?;

    match cmd {
        Commands::Classify { data, preset, export } => {
            if let Some(p) = preset {
                config.keywords.preset = p.into();
            }
            cmd_classify(&data, &config, export, global)
        }
        Commands::Report { data } => cmd_report(&data, &config, global),
        Commands::Summary { data } => cmd_summary(&data, &config, global),
        Commands::Rank { data, top } => cmd_rank(&data, &config, top, global),
        Commands::Trend { data, window, min_periods, cantons } => {
            cmd_trend(&data, &config, window, min_periods, &cantons, global)
        }
        Commands::Periods { data, scheme, width } => {
            if let Some(s) = scheme {
                config.periods.scheme = match s {
                    SchemeArg::Eras => PeriodKind::Eras,
                    SchemeArg::Fixed => PeriodKind::Fixed,
                };
            }
            if let Some(w) = width {
                config.periods.width = w;
            }
            config.validate()?;
            cmd_periods(&data, &config, global)
        }
        Commands::Search { data, term, exact, column } => {
            cmd_search(&data, &config, &term, exact, column, global)
        }
        Commands::Vote { data, term } => cmd_vote(&data, &config, &term, global),
        Commands::Compare { data, terms } => cmd_compare(&data, &config, &terms, global),
        Commands::Parties { data } => cmd_parties(&data, &config, global),
        Commands::Sample { data, size, seed, export } => {
            if let Some(s) = size {
                config.sample.size = s;
            }
            if seed.is_some() {
                config.sample.seed = seed;
            }
            cmd_sample(&data, &config, export, global)
        }
        Commands::Validate { .. } => Ok(()),
    }
}

// ============================================================================
// Loading + Output
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig, CliError> {
    let Some(path) = path else {
        return Ok(AnalysisConfig::default());
    };
    if !path.exists() {
        return Err(AnalysisError::FileNotFound {
            path: path.display().to_string(),
        }
        .into());
    }
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
    Ok(AnalysisConfig::from_toml(&text)?)
}

/// Load the data and label it, unless it already carries labels from a
/// previous export.
fn load_labeled(data: &Path, config: &AnalysisConfig) -> Result<VoteTable, CliError> {
    let table = load_table(data, &config.columns)?;
    if table.is_classified() {
        info!("{} already labeled, keeping labels", data.display());
        return Ok(table);
    }
    let keywords = config.keywords.sets();
    Ok(classify_fields(&table, &keywords, &config.columns.text_fields()))
}

/// Write JSON to `--output` if given, then print JSON or the human view.
fn emit<T: Serialize>(
    global: &GlobalArgs,
    value: &T,
    human: impl FnOnce(&T),
) -> Result<(), CliError> {
    let json_str = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

    if let Some(ref path) = global.output {
        std::fs::write(path, &json_str)
            .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
        eprintln!("wrote {}", path.display());
    }

    if global.json {
        println!("{json_str}");
    } else {
        human(value);
    }
    Ok(())
}

fn export_csv(table: &VoteTable, path: &Path) -> Result<(), CliError> {
    let text = write_table_csv(table, b';')?;
    std::fs::write(path, text)
        .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
    eprintln!("wrote {}", path.display());
    Ok(())
}

fn pct(v: Option<f64>) -> String {
    v.map(|v| format!("{v:.1}")).unwrap_or_else(|| "-".into())
}

// ============================================================================
// classify / summary / report
// ============================================================================

#[derive(Serialize)]
struct ClassifyOutput {
    preset: String,
    total_votes: usize,
    society_votes: usize,
    titles: Vec<String>,
}

fn cmd_classify(
    data: &Path,
    config: &AnalysisConfig,
    export: Option<PathBuf>,
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let table = load_table(data, &config.columns)?;
    let keywords = config.keywords.sets();
    let labeled = classify_fields(&table, &keywords, &config.columns.text_fields());

    if let Some(path) = export {
        export_csv(&labeled, &path)?;
    }

    let short_title = config.columns.short_title.as_str();
    let out = ClassifyOutput {
        preset: config.keywords.preset.to_string(),
        total_votes: labeled.len(),
        society_votes: labeled.society_votes().count(),
        titles: labeled
            .society_votes()
            .filter_map(|r| r.text(short_title).map(String::from))
            .collect(),
    };
    emit(global, &out, |o| {
        println!(
            "{} of {} votes society-oriented (preset {})",
            o.society_votes, o.total_votes, o.preset
        );
        for t in &o.titles {
            println!("  {t}");
        }
    })
}

fn cmd_summary(data: &Path, config: &AnalysisConfig, global: &GlobalArgs) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let summary = summarize(&labeled, &config.columns)?;
    emit(global, &summary, |s| {
        println!(
            "{} votes, {} society-oriented ({}%)",
            s.total_votes,
            s.society_votes,
            pct(s.society_percentage)
        );
        println!(
            "acceptance: society-oriented mean {} median {}, other mean {} median {}",
            pct(s.society_acceptance.mean),
            pct(s.society_acceptance.median),
            pct(s.other_acceptance.mean),
            pct(s.other_acceptance.median),
        );
        if let Some(span) = s.time_span {
            println!("time span: {}-{} ({} years)", span.start, span.end, span.years);
        }
        let q = s.data_quality;
        println!(
            "missing: {} dates, {} titles, {} results",
            q.missing_dates, q.missing_titles, q.missing_results
        );
    })
}

fn cmd_report(data: &Path, config: &AnalysisConfig, global: &GlobalArgs) -> Result<(), CliError> {
    let table = load_table(data, &config.columns)?;
    let (report, _) = run(config, &table)?;
    emit(global, &report, |r| {
        let s = &r.summary;
        println!(
            "{} votes, {} society-oriented ({}%), preset {}",
            s.total_votes,
            s.society_votes,
            pct(s.society_percentage),
            r.meta.keyword_preset
        );
        println!("top cantons:");
        for e in r.ranking.iter().take(5) {
            println!(
                "  {:>2}. {:<4} {:>5.1}",
                e.rank, e.region, e.mean_yes_percentage
            );
        }
        print_trend(&r.trends);
    })
}

// ============================================================================
// rank / trend / periods
// ============================================================================

fn cmd_rank(
    data: &Path,
    config: &AnalysisConfig,
    top: Option<usize>,
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let mut ranking = rank_regions(&labeled, &config.regions)?;
    if let Some(n) = top {
        ranking.truncate(n);
    }
    emit(global, &ranking, |ranking| {
        if ranking.is_empty() {
            println!("no canton data for society-oriented votes");
        }
        for e in ranking {
            println!(
                "{:>2}. {:<4} {:<20} {:>5.1}",
                e.rank,
                e.region,
                e.name.as_deref().unwrap_or(""),
                e.mean_yes_percentage
            );
        }
    })
}

fn print_trend(analysis: &TemporalAnalysis) {
    match analysis {
        TemporalAnalysis::Insufficient { error } => println!("trend: {error}"),
        TemporalAnalysis::Complete(t) => {
            println!(
                "trend: {} votes, mean {} median {}",
                t.total_votes,
                pct(t.mean_acceptance),
                pct(t.median_acceptance)
            );
            if let Some(fit) = &t.trend {
                if let (Some(r), Some(p)) = (fit.correlation, fit.correlation_p_value) {
                    println!("  r = {r:.3} (p = {p:.4})");
                }
                println!(
                    "  {:+.2} points per decade: {}",
                    fit.trend_per_decade, fit.interpretation
                );
            }
        }
    }
}

#[derive(Serialize)]
struct TrendOutput {
    analysis: TemporalAnalysis,
    time_correlation: votelens_analysis::temporal::TimeCorrelation,
    decades: Vec<votelens_analysis::temporal::DecadeCount>,
    rolling: Vec<votelens_analysis::temporal::RollingPoint>,
    cantons: Vec<votelens_analysis::temporal::CantonTrend>,
}

fn cmd_trend(
    data: &Path,
    config: &AnalysisConfig,
    window: usize,
    min_periods: usize,
    cantons: &[String],
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let acceptance = config.columns.acceptance.as_str();
    let canton_refs: Vec<&str> = cantons.iter().map(String::as_str).collect();

    let out = TrendOutput {
        analysis: analyze_trends(&labeled, YEAR, acceptance)?,
        time_correlation: correlation_time_acceptance(&labeled, acceptance)?,
        decades: decade_counts(&labeled)?,
        rolling: rolling_acceptance(&labeled, acceptance, window, min_periods)?,
        cantons: if canton_refs.is_empty() {
            Vec::new()
        } else {
            canton_trends(&labeled, &canton_refs, &config.regions)?
        },
    };
    emit(global, &out, |o| {
        print_trend(&o.analysis);
        println!("votes per decade:");
        for d in &o.decades {
            println!("  {}s: {}", d.decade, d.count);
        }
        for c in &o.cantons {
            println!(
                "  {}: {:+.3} points per year over {} votes",
                c.canton, c.slope, c.votes
            );
        }
    })
}

#[derive(Serialize)]
struct PeriodsOutput {
    all_votes: Vec<votelens_analysis::model::PeriodStats>,
    by_class: Vec<votelens_analysis::model::PeriodComparison>,
}

fn cmd_periods(data: &Path, config: &AnalysisConfig, global: &GlobalArgs) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let acceptance = config.columns.acceptance.as_str();
    let scheme = config.periods.scheme();
    let out = PeriodsOutput {
        all_votes: period_statistics(&labeled, scheme, acceptance),
        by_class: society_vs_other_by_period(&labeled, scheme, acceptance)?,
    };
    emit(global, &out, |o| {
        println!("{:<10} {:>6} {:>8} {:>8}", "period", "votes", "society", "other");
        for (stats, cmp) in o.all_votes.iter().zip(&o.by_class) {
            println!(
                "{:<10} {:>6} {:>8} {:>8}",
                stats.period,
                stats.count,
                pct(cmp.society_mean),
                pct(cmp.other_mean)
            );
        }
    })
}

// ============================================================================
// search / vote / compare
// ============================================================================

#[derive(Serialize)]
struct SearchHit {
    id: Option<String>,
    date: Option<String>,
    title: Option<String>,
    society_oriented: bool,
    acceptance: Option<f64>,
}

fn cmd_search(
    data: &Path,
    config: &AnalysisConfig,
    term: &str,
    exact: bool,
    column: Option<String>,
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let column = column.unwrap_or_else(|| config.columns.short_title.clone());
    let hits = search_by_title(&labeled, term, exact, &column)?;
    let c = &config.columns;
    let out: Vec<SearchHit> = hits
        .records()
        .iter()
        .map(|r| SearchHit {
            id: r.text(&c.id).map(String::from),
            date: r.text(&c.date).map(String::from),
            title: r.text(&column).map(String::from),
            society_oriented: r.is_society_oriented(),
            acceptance: r.number(&c.acceptance),
        })
        .collect();
    emit(global, &out, |hits| {
        println!("{} votes match '{term}'", hits.len());
        for h in hits {
            println!(
                "  {:<6} {:<10} {:>5}  {}{}",
                h.id.as_deref().unwrap_or("-"),
                h.date.as_deref().unwrap_or("-"),
                pct(h.acceptance),
                h.title.as_deref().unwrap_or(""),
                if h.society_oriented { "  [society]" } else { "" }
            );
        }
    })
}

#[derive(Serialize)]
struct VoteOutput {
    profile: votelens_analysis::search::CantonProfile,
    statistics: Option<votelens_analysis::search::ProfileStatistics>,
}

fn cmd_vote(
    data: &Path,
    config: &AnalysisConfig,
    term: &str,
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let table = load_table(data, &config.columns)?;
    let profile = canton_profile(&table, term, &config.columns, &config.regions)?;
    let out = VoteOutput {
        statistics: profile_statistics(&profile),
        profile,
    };
    emit(global, &out, |o| {
        let p = &o.profile;
        println!(
            "{} ({}, {})",
            p.title,
            p.id.as_deref().unwrap_or("-"),
            p.date.as_deref().unwrap_or("-")
        );
        if p.matches > 1 {
            println!("  {} votes matched, showing the first", p.matches);
        }
        let mut cantons = p.cantons.clone();
        cantons.sort_by(|a, b| b.yes_percentage.total_cmp(&a.yes_percentage));
        for c in &cantons {
            println!("  {:<24} {:>5.1}", c.name, c.yes_percentage);
        }
        if let Some(s) = &o.statistics {
            println!(
                "mean {:.1}, median {:.1}, range {:.1}; {} accepted, {} rejected",
                s.mean, s.median, s.range, s.accepted, s.rejected
            );
        }
    })
}

fn cmd_compare(
    data: &Path,
    config: &AnalysisConfig,
    terms: &[String],
    global: &GlobalArgs,
) -> Result<(), CliError> {
    let table = load_table(data, &config.columns)?;
    let refs: Vec<&str> = terms.iter().map(String::as_str).collect();
    let cmp = compare_votes(&table, &refs, &config.columns, &config.regions)
        .map_err(|e| CliError::from(e).with_hint("pass at least two terms that match a vote"))?;
    emit(global, &cmp, |c| {
        for v in &c.votes {
            println!(
                "{:<40} mean {:>5.1}, {}/{} cantons accept",
                v.title, v.mean, v.accepted, v.cantons
            );
        }
        for p in &c.strongest {
            println!(
                "  {} / {}: r = {:.3} ({})",
                p.left, p.right, p.correlation, p.strength
            );
        }
        if !c.skipped.is_empty() {
            println!("skipped: {}", c.skipped.join(", "));
        }
    })
}

// ============================================================================
// parties / sample / validate
// ============================================================================

fn cmd_parties(data: &Path, config: &AnalysisConfig, global: &GlobalArgs) -> Result<(), CliError> {
    let labeled = load_labeled(data, config)?;
    let support = party_support(&labeled, &config.parties, &config.columns.id)?;
    emit(global, &support, |s| {
        println!("{:<8} {:<6} {:>8} {:>12}", "vote", "year", "liberal", "conservative");
        for v in &s.votes {
            println!(
                "{:<8} {:<6} {:>8} {:>12}",
                v.id.as_deref().unwrap_or("-"),
                v.year.map(|y| y.to_string()).unwrap_or_else(|| "-".into()),
                pct(v.liberal),
                pct(v.conservative)
            );
        }
        if let Some(t) = s.liberal_trend {
            println!("liberal trend: {:+.2} per year", t.slope);
        }
        if let Some(t) = s.conservative_trend {
            println!("conservative trend: {:+.2} per year", t.slope);
        }
    })
}

fn cmd_sample(
    data: &Path,
    config: &AnalysisConfig,
    export: Option<PathBuf>,
    global: &GlobalArgs,
) -> Result<(), CliError> {
    if config.sample.size < 2 {
        return Err(CliError::args("sample size must be at least 2"));
    }
    let labeled = load_labeled(data, config)?;
    let sample = validation_sample(&labeled, config.sample.size, config.sample.seed, &config.columns)?;
    if let Some(path) = export {
        export_csv(&sample, &path)?;
    }
    let rows = sample.text_rows();
    let out: Vec<serde_json::Map<String, serde_json::Value>> = rows
        .iter()
        .map(|row| {
            sample
                .columns()
                .iter()
                .zip(row)
                .map(|(c, v)| (c.clone(), serde_json::Value::String(v.clone())))
                .collect()
        })
        .collect();
    emit(global, &out, |_| {
        println!("{}", sample.columns().join("\t"));
        for row in &rows {
            println!("{}", row.join("\t"));
        }
    })
}

fn cmd_validate(file: &Path) -> Result<(), CliError> {
    let config = load_config(Some(file))?;
    eprintln!(
        "{}: ok (preset {}, {} inclusion keywords)",
        file.display(),
        config.keywords.preset,
        config.keywords.sets().inclusion().len()
    );
    Ok(())
}
