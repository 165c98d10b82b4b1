use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::NaiveDate;

use crate::frontend::FrontEnd;
use crate::records::{FixtureRecord, MatchRecord};
use crate::report::{RoundReport, build_round_report};
use crate::rounds::{RoundStrategy, distinct_rounds};
use crate::source::LoadedTables;
use crate::trends::TrendEngine;

const MAX_LOGS: usize = 200;

#[derive(Debug, Clone)]
pub struct AppState {
    pub frontend: FrontEnd,
    pub today: NaiveDate,
    pub strategy: RoundStrategy,
    pub engine: TrendEngine,
    pub results: Vec<MatchRecord>,
    pub fixtures: Vec<FixtureRecord>,
    pub rounds: Vec<i64>,
    pub origin: Option<String>,
    pub loading: bool,
    pub report: Option<RoundReport>,
    pub scroll: u16,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub export_status: Option<String>,
}

impl AppState {
    pub fn new(frontend: FrontEnd, today: NaiveDate) -> Self {
        Self {
            frontend,
            today,
            strategy: frontend.round_strategy(),
            engine: frontend.engine(),
            results: Vec::new(),
            fixtures: Vec::new(),
            rounds: Vec::new(),
            origin: None,
            loading: true,
            report: None,
            scroll: 0,
            logs: VecDeque::new(),
            help_overlay: false,
            export_status: None,
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    pub fn selected_round(&self) -> Option<i64> {
        self.strategy.resolve(&self.fixtures, self.today)
    }

    /// Step the manual selection through the sorted rounds. Leaves
    /// auto-current mode, starting from whatever round was showing.
    pub fn step_round(&mut self, forward: bool) {
        if self.rounds.is_empty() {
            return;
        }
        let current = self.selected_round();
        let idx = current
            .and_then(|r| self.rounds.iter().position(|x| *x == r))
            .unwrap_or(0);
        let next = if forward {
            (idx + 1).min(self.rounds.len() - 1)
        } else {
            idx.saturating_sub(1)
        };
        self.strategy = RoundStrategy::Manual(Some(self.rounds[next]));
        self.recompute();
    }

    pub fn toggle_auto_round(&mut self) {
        self.strategy = if self.strategy.is_auto() {
            RoundStrategy::Manual(self.selected_round())
        } else {
            RoundStrategy::AutoCurrent
        };
        let label = if self.strategy.is_auto() {
            "auto-current"
        } else {
            "manual"
        };
        self.push_log(format!("[INFO] Round selection: {label}"));
        self.recompute();
    }

    pub fn toggle_digest(&mut self) {
        self.engine = if self.engine.is_digest() {
            TrendEngine::full()
        } else {
            TrendEngine::digest()
        };
        self.recompute();
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let next = (self.scroll as i32 + delta).max(0);
        self.scroll = next.min(u16::MAX as i32) as u16;
    }

    /// Trends are never cached across selections; every change re-evaluates.
    pub fn recompute(&mut self) {
        self.scroll = 0;
        self.report = self
            .selected_round()
            .map(|round| build_round_report(&self.results, &self.fixtures, round, self.engine));
    }

    fn install_tables(&mut self, tables: LoadedTables) {
        for warning in tables.warnings() {
            self.push_log(format!("[WARN] {warning}"));
        }
        self.push_log(format!(
            "[INFO] Loaded {} results, {} fixtures from {}",
            tables.results.rows.len(),
            tables.fixtures.rows.len(),
            tables.origin
        ));
        self.results = tables.results.rows;
        self.fixtures = tables.fixtures.rows;
        self.rounds = distinct_rounds(&self.fixtures);
        self.origin = Some(tables.origin);
        self.loading = false;
        // Keep a manual pick only if the new table still has that round.
        if let RoundStrategy::Manual(Some(round)) = self.strategy
            && !self.rounds.contains(&round)
        {
            self.strategy = RoundStrategy::Manual(None);
        }
        self.recompute();
    }
}

#[derive(Debug)]
pub enum Delta {
    TablesLoaded(Box<LoadedTables>),
    LoadFailed(String),
    ExportFinished {
        path: String,
        fixtures: usize,
        trends: usize,
    },
    Log(String),
}

#[derive(Debug, Clone)]
pub enum ProviderCommand {
    Reload,
    Export { path: PathBuf, report: RoundReport },
}

pub fn apply_delta(state: &mut AppState, delta: Delta) {
    match delta {
        Delta::TablesLoaded(tables) => state.install_tables(*tables),
        Delta::LoadFailed(err) => {
            state.loading = false;
            state.push_log(format!("[WARN] Load failed: {err}"));
        }
        Delta::ExportFinished {
            path,
            fixtures,
            trends,
        } => {
            let msg = format!("Exported {fixtures} fixtures / {trends} trends to {path}");
            state.push_log(format!("[INFO] {msg}"));
            state.export_status = Some(msg);
        }
        Delta::Log(msg) => state.push_log(msg),
    }
}
