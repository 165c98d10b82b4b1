use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;

use crate::config::{arg_value, has_flag};
use crate::export::export_round_report;
use crate::frontend::FrontEnd;
use crate::report::{RoundReport, build_round_report, render_markdown};
use crate::rounds::{RoundStrategy, distinct_rounds};
use crate::source::LoadedTables;
use crate::trends::TrendEngine;

/// Flags shared by the line-oriented report binaries.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    pub round: Option<i64>,
    pub digest: bool,
    pub json: bool,
    pub export: Option<PathBuf>,
}

impl ReportOptions {
    pub fn from_args(args: &[String]) -> Result<Self> {
        let round = match arg_value(args, "--round") {
            Some(raw) => Some(
                raw.parse::<i64>()
                    .with_context(|| format!("invalid --round value `{raw}`"))?,
            ),
            None => None,
        };
        Ok(Self {
            round,
            digest: has_flag(args, "--digest"),
            json: has_flag(args, "--json"),
            export: arg_value(args, "--export").map(PathBuf::from),
        })
    }

    fn strategy(&self, frontend: FrontEnd) -> RoundStrategy {
        match self.round {
            Some(round) => RoundStrategy::Manual(Some(round)),
            None => frontend.round_strategy(),
        }
    }

    fn engine(&self, frontend: FrontEnd) -> TrendEngine {
        if self.digest {
            TrendEngine::digest()
        } else {
            frontend.engine()
        }
    }
}

/// Build the report for the round the options pick and print it as markdown
/// (or JSON), exporting to XLSX when asked.
pub fn run_report(
    tables: &LoadedTables,
    frontend: FrontEnd,
    opts: &ReportOptions,
    today: NaiveDate,
) -> Result<RoundReport> {
    for warning in tables.warnings() {
        eprintln!("warning: {warning}");
    }

    let fixtures = &tables.fixtures.rows;
    let Some(round) = opts.strategy(frontend).resolve(fixtures, today) else {
        let rounds = distinct_rounds(fixtures);
        return Err(match opts.round {
            Some(round) => anyhow!("gameweek {round} not found; available: {rounds:?}"),
            None => anyhow!("fixtures table has no gameweeks"),
        });
    };

    let report = build_round_report(&tables.results.rows, fixtures, round, opts.engine(frontend));

    if opts.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        println!("# {}", frontend.title());
        println!("{}\n", frontend.caption());
        println!("_Source: {}_\n", tables.origin);
        print!("{}", render_markdown(&report, frontend));
    }

    if let Some(path) = opts.export.as_ref() {
        let summary = export_round_report(path, &report)?;
        eprintln!(
            "exported {} fixtures / {} trends to {}",
            summary.fixtures,
            summary.trends,
            path.display()
        );
    }

    Ok(report)
}
