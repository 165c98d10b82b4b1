use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::report::{ReportStatus, RoundReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportReport {
    pub fixtures: usize,
    pub trends: usize,
}

pub fn export_round_report(path: &Path, report: &RoundReport) -> Result<ExportReport> {
    let mut fixture_rows = vec![vec![
        "Round".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "Date".to_string(),
        "Status".to_string(),
        "H2H Meetings".to_string(),
        "Trends".to_string(),
    ]];
    let mut trend_rows = vec![vec![
        "Round".to_string(),
        "Home".to_string(),
        "Away".to_string(),
        "#".to_string(),
        "Trend".to_string(),
        "Hits".to_string(),
        "Sample".to_string(),
    ]];

    for fixture in &report.fixtures {
        fixture_rows.push(vec![
            report.round.to_string(),
            fixture.home_team.clone(),
            fixture.away_team.clone(),
            fixture
                .date
                .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_default(),
            status_label(fixture.status).to_string(),
            fixture.meetings.to_string(),
            fixture.trends.len().to_string(),
        ]);
        for (idx, trend) in fixture.trends.iter().enumerate() {
            trend_rows.push(vec![
                report.round.to_string(),
                fixture.home_team.clone(),
                fixture.away_team.clone(),
                (idx + 1).to_string(),
                trend.to_string(),
                trend.hits.to_string(),
                trend.sample.to_string(),
            ]);
        }
    }

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Fixtures")?;
        write_rows(sheet, &fixture_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Trends")?;
        write_rows(sheet, &trend_rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;

    Ok(ExportReport {
        fixtures: fixture_rows.len() - 1,
        trends: trend_rows.len() - 1,
    })
}

pub fn status_label(status: ReportStatus) -> &'static str {
    match status {
        ReportStatus::InsufficientHistory => "Not enough H2H",
        ReportStatus::NoQualifyingTrends => "No strong trends",
        ReportStatus::Trends => "Trends",
    }
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
