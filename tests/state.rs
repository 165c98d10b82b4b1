use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;

use bola_stats::frontend::FrontEnd;
use bola_stats::rounds::RoundStrategy;
use bola_stats::source::LoadedTables;
use bola_stats::state::{AppState, Delta, apply_delta};

fn read_fixture(name: &str) -> String {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    fs::read_to_string(path).expect("fixture file should be readable")
}

fn loaded_state(frontend: FrontEnd, today: NaiveDate) -> AppState {
    let mut state = AppState::new(frontend, today);
    let tables = LoadedTables::from_csv(
        &read_fixture("results.csv"),
        &read_fixture("fixtures.csv"),
        "fixtures",
    )
    .expect("fixtures should parse");
    apply_delta(&mut state, Delta::TablesLoaded(Box::new(tables)));
    state
}

#[test]
fn tables_loaded_builds_first_round_report() {
    let state = loaded_state(FrontEnd::Gameweek, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    assert!(!state.loading);
    assert_eq!(state.rounds, vec![1, 2, 3]);
    let report = state.report.as_ref().expect("report computed");
    assert_eq!(report.round, 1);
    assert_eq!(report.fixtures[0].trends.len(), 4);
    assert!(state.logs.iter().any(|l| l.contains("over_2_5")));
}

#[test]
fn current_profile_starts_on_auto_round_in_digest() {
    let state = loaded_state(FrontEnd::Current, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    let report = state.report.as_ref().expect("report computed");
    assert_eq!(report.round, 2);
    assert!(report.fixtures.iter().all(|f| f.trends.len() <= 3));
}

#[test]
fn stepping_rounds_switches_to_manual() {
    let mut state = loaded_state(FrontEnd::Current, NaiveDate::from_ymd_opt(2024, 9, 1).unwrap());
    state.step_round(true);
    assert_eq!(state.strategy, RoundStrategy::Manual(Some(3)));
    state.step_round(true);
    assert_eq!(state.selected_round(), Some(3));
    state.step_round(false);
    state.step_round(false);
    state.step_round(false);
    assert_eq!(state.selected_round(), Some(1));

    state.toggle_auto_round();
    assert_eq!(state.selected_round(), Some(2));
}

#[test]
fn toggling_digest_recomputes() {
    let mut state = loaded_state(FrontEnd::Gameweek, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    state.toggle_digest();
    assert_eq!(state.report.as_ref().unwrap().fixtures[0].trends.len(), 3);
    state.toggle_digest();
    assert_eq!(state.report.as_ref().unwrap().fixtures[0].trends.len(), 4);
}

#[test]
fn load_failure_is_logged() {
    let mut state = AppState::new(FrontEnd::Admin, NaiveDate::from_ymd_opt(2024, 8, 1).unwrap());
    apply_delta(&mut state, Delta::LoadFailed("no uploads".to_string()));
    assert!(!state.loading);
    assert!(state.report.is_none());
    assert!(state.logs.back().is_some_and(|l| l.starts_with("[WARN]")));
}
