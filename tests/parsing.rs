use std::fs;
use std::path::PathBuf;

use bola_stats::records::StatValue;
use bola_stats::table::{parse_fixtures_csv, parse_results_csv};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

#[test]
fn parses_results_fixture_with_normalized_headers() {
    let table = parse_results_csv(&read_fixture("results.csv")).expect("fixture should parse");
    assert_eq!(table.rows.len(), 14);
    assert!(table.has_column("home_team"));
    assert!(table.has_column("over_2_5"));
    assert!(table.has_column("total_corners"));
    assert!(!table.has_column("home_yellow_cards"));

    let first = &table.rows[0];
    assert_eq!(first.home_team, "Arsenal");
    assert_eq!(first.away_team, "Chelsea");
    assert_eq!(first.home_score, Some(2.0));
    assert_eq!(first.total_corners, Some(StatValue::Number(11.0)));
    assert_eq!(first.both_teams_score, Some(StatValue::Number(1.0)));
    assert_eq!(first.home_yellow_cards, None);
    assert_eq!(first.first_half_home, None);
    assert_eq!(
        first.match_date.map(|d| d.format("%Y-%m-%d").to_string()),
        Some("2024-04-10".to_string())
    );
}

#[test]
fn junk_statistic_cells_become_not_a_number() {
    let table = parse_results_csv(&read_fixture("results.csv")).expect("fixture should parse");
    let junk = table
        .rows
        .iter()
        .find(|m| m.home_team == "Liverpool" && m.over_2_5 == Some(StatValue::NotANumber))
        .expect("n/a cell should be kept as not-a-number");
    assert_eq!(junk.away_team, "Everton");
    assert_eq!(table.warnings.len(), 1);
    assert!(table.warnings[0].contains("over_2_5"));
}

#[test]
fn parses_fixtures_fixture() {
    let table = parse_fixtures_csv(&read_fixture("fixtures.csv")).expect("fixture should parse");
    assert_eq!(table.rows.len(), 5);
    assert_eq!(table.rows[0].round_number, 1);
    assert_eq!(table.rows[4].home_team, "Man City");
    assert!(table.rows.iter().all(|f| f.date.is_some()));
    assert!(table.warnings.is_empty());
}

#[test]
fn missing_required_column_is_an_error() {
    let raw = "home_team,away_team,home_score,away_score\nA,B,1,0\n";
    let err = parse_results_csv(raw).expect_err("match_date is required");
    assert!(err.to_string().contains("match_date"));

    let raw = "home_team,away_team,date\nA,B,2024-01-01\n";
    let err = parse_fixtures_csv(raw).expect_err("round_number is required");
    assert!(err.to_string().contains("round_number"));
}

#[test]
fn fixtures_without_date_column_still_parse() {
    let raw = "Home Team,Away Team,Round Number\nA,B,3.0\nC,D,week4\n";
    let table = parse_fixtures_csv(raw).expect("date is optional");
    assert_eq!(table.rows.len(), 1);
    assert_eq!(table.rows[0].round_number, 3);
    assert_eq!(table.rows[0].date, None);
    assert!(table.warnings.iter().any(|w| w.contains("dropped 1")));
}

#[test]
fn boolean_words_coerce_to_numbers() {
    let raw = "home_team,away_team,home_score,away_score,match_date,both_teams_score,over_2_5\n\
               A,B,1,1,2024-01-01,True,FALSE\n";
    let table = parse_results_csv(raw).expect("should parse");
    assert_eq!(table.rows[0].both_teams_score, Some(StatValue::Number(1.0)));
    assert_eq!(table.rows[0].over_2_5, Some(StatValue::Number(0.0)));
}

#[test]
fn blank_statistic_cell_is_not_a_number_without_warning() {
    let raw = "home_team,away_team,home_score,away_score,match_date,total_corners\n\
               A,B,1,1,2024-01-01,\n";
    let table = parse_results_csv(raw).expect("should parse");
    assert_eq!(table.rows[0].total_corners, Some(StatValue::NotANumber));
    assert!(table.warnings.is_empty());
}
