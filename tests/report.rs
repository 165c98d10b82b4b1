use std::fs;
use std::path::PathBuf;

use bola_stats::frontend::FrontEnd;
use bola_stats::report::{ReportStatus, build_round_report, render_markdown};
use bola_stats::source::LoadedTables;
use bola_stats::trends::TrendEngine;

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn tables() -> LoadedTables {
    LoadedTables::from_csv(
        &read_fixture("results.csv"),
        &read_fixture("fixtures.csv"),
        "fixtures",
    )
    .expect("fixtures should parse")
}

#[test]
fn round_one_full_report() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 1, TrendEngine::full());
    assert_eq!(report.round, 1);
    assert_eq!(report.fixtures.len(), 2);

    let arsenal = &report.fixtures[0];
    assert_eq!(arsenal.label(), "Arsenal vs Chelsea");
    assert_eq!(arsenal.status, ReportStatus::Trends);
    assert_eq!(arsenal.meetings, 5);
    assert_eq!(
        arsenal.trends.lines(),
        vec![
            "Arsenal won 4/5 recent meetings".to_string(),
            "Both teams scored in 4/5 games".to_string(),
            "Over 2.5 goals in 4/5 games".to_string(),
            "Over 9.5 corners in 4/5 games".to_string(),
        ]
    );

    let derby = &report.fixtures[1];
    assert_eq!(derby.status, ReportStatus::InsufficientHistory);
    assert_eq!(derby.meetings, 3);
    assert!(derby.trends.is_empty());
    assert_eq!(report.trend_count(), 4);
}

#[test]
fn reversed_fixture_drops_win_trend() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 2, TrendEngine::full());
    let chelsea = &report.fixtures[0];
    assert_eq!(chelsea.label(), "Chelsea vs Arsenal");
    assert_eq!(
        chelsea.trends.lines(),
        vec![
            "Both teams scored in 4/5 games".to_string(),
            "Over 2.5 goals in 4/5 games".to_string(),
            "Over 9.5 corners in 4/5 games".to_string(),
        ]
    );
}

#[test]
fn digest_caps_each_fixture_at_three() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 1, TrendEngine::digest());
    assert_eq!(
        report.fixtures[0].trends.lines(),
        vec![
            "Arsenal won 4/5 recent meetings".to_string(),
            "Both teams scored in 4/5 games".to_string(),
            "Over 2.5 goals in 4/5 games".to_string(),
        ]
    );
}

#[test]
fn five_meetings_without_trends_is_its_own_status() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 3, TrendEngine::full());
    assert_eq!(report.fixtures.len(), 1);
    assert_eq!(report.fixtures[0].status, ReportStatus::NoQualifyingTrends);
    assert_eq!(report.fixtures[0].meetings, 5);
}

#[test]
fn markdown_shows_trends_and_empty_states() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 1, TrendEngine::full());
    let md = render_markdown(&report, FrontEnd::Gameweek);
    assert!(md.starts_with("## Gameweek 1 Insights"));
    assert!(md.contains("### Arsenal vs Chelsea\n- Arsenal won 4/5 recent meetings\n"));
    assert!(md.contains("### Liverpool vs Everton\n> Not enough H2H data to generate trends.\n"));

    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 3, TrendEngine::digest());
    let md = render_markdown(&report, FrontEnd::Current);
    assert!(md.contains("> No strong trends to recommend for this game."));
}

#[test]
fn unknown_round_is_an_empty_report() {
    let t = tables();
    let report = build_round_report(&t.results.rows, &t.fixtures.rows, 42, TrendEngine::full());
    assert!(report.fixtures.is_empty());
    assert!(render_markdown(&report, FrontEnd::Admin).contains("No fixtures in this round"));
}
