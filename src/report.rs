use std::env;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::frontend::FrontEnd;
use crate::records::{FixtureRecord, MatchRecord};
use crate::rounds::fixtures_in_round;
use crate::trends::{HEAD_TO_HEAD_SAMPLE, TrendEngine, TrendResult, select_head_to_head};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    /// Fewer than five previous meetings.
    InsufficientHistory,
    NoQualifyingTrends,
    Trends,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureReport {
    pub home_team: String,
    pub away_team: String,
    pub date: Option<NaiveDateTime>,
    pub meetings: usize,
    pub status: ReportStatus,
    pub trends: TrendResult,
}

impl FixtureReport {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: i64,
    pub engine: TrendEngine,
    pub fixtures: Vec<FixtureReport>,
}

impl RoundReport {
    pub fn trend_count(&self) -> usize {
        self.fixtures.iter().map(|f| f.trends.len()).sum()
    }
}

pub fn evaluate_fixture(
    results: &[MatchRecord],
    fixture: &FixtureRecord,
    engine: &TrendEngine,
) -> FixtureReport {
    let h2h = select_head_to_head(results, &fixture.home_team, &fixture.away_team);
    let trends = engine.compute_trends(&h2h, &fixture.home_team, &fixture.away_team);
    let status = if h2h.len() < HEAD_TO_HEAD_SAMPLE {
        ReportStatus::InsufficientHistory
    } else if trends.is_empty() {
        ReportStatus::NoQualifyingTrends
    } else {
        ReportStatus::Trends
    };
    FixtureReport {
        home_team: fixture.home_team.clone(),
        away_team: fixture.away_team.clone(),
        date: fixture.date,
        meetings: h2h.len(),
        status,
        trends,
    }
}

/// Evaluate every fixture of `round`. Fixtures run in parallel; output keeps
/// table order.
pub fn build_round_report(
    results: &[MatchRecord],
    fixtures: &[FixtureRecord],
    round: i64,
    engine: TrendEngine,
) -> RoundReport {
    let selected = fixtures_in_round(fixtures, round);
    let evaluate = || {
        selected
            .par_iter()
            .map(|fixture| evaluate_fixture(results, fixture, &engine))
            .collect::<Vec<_>>()
    };
    let reports = match REPORT_POOL.as_ref() {
        Some(pool) => pool.install(evaluate),
        None => evaluate(),
    };
    RoundReport {
        round,
        engine,
        fixtures: reports,
    }
}

pub fn render_markdown(report: &RoundReport, frontend: FrontEnd) -> String {
    let mut out = String::new();
    out.push_str(&format!("## {}\n\n", frontend.round_heading(report.round)));
    if report.fixtures.is_empty() {
        out.push_str("_No fixtures in this round._\n");
        return out;
    }
    for fixture in &report.fixtures {
        out.push_str(&format!("### {}\n", fixture.label()));
        match fixture.status {
            ReportStatus::Trends => {
                for line in fixture.trends.lines() {
                    out.push_str(&format!("- {line}\n"));
                }
            }
            status => {
                out.push_str(&format!("> {}\n", frontend.empty_message(status)));
            }
        }
        out.push('\n');
    }
    out
}

static REPORT_POOL: Lazy<Option<rayon::ThreadPool>> = Lazy::new(build_report_pool);

fn build_report_pool() -> Option<rayon::ThreadPool> {
    let threads = env::var("REPORT_PARALLELISM")
        .ok()
        .and_then(|val| val.parse::<usize>().ok())?
        .clamp(1, 32);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_pool_is_built_once() {
        let first = REPORT_POOL.as_ref().map(|p| p as *const rayon::ThreadPool);
        let second = REPORT_POOL.as_ref().map(|p| p as *const rayon::ThreadPool);
        assert_eq!(first, second);
        let report = build_round_report(&[], &[], 1, TrendEngine::full());
        assert!(report.fixtures.is_empty());
        assert_eq!(
            REPORT_POOL.as_ref().map(|p| p as *const rayon::ThreadPool),
            first
        );
    }
}
