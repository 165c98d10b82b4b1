use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord, Trim};
use serde::{Deserialize, Serialize};

use crate::records::{FixtureRecord, MatchRecord, StatValue};

const RESULTS_REQUIRED: [&str; 5] = [
    "home_team",
    "away_team",
    "home_score",
    "away_score",
    "match_date",
];
const FIXTURES_REQUIRED: [&str; 3] = ["home_team", "away_team", "round_number"];

/// Rows parsed from one CSV table plus the normalized header and any
/// coercion warnings worth surfacing to the user.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsedTable<T> {
    pub rows: Vec<T>,
    pub columns: Vec<String>,
    pub warnings: Vec<String>,
}

impl<T> ParsedTable<T> {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

pub fn normalize_column_name(raw: &str) -> String {
    raw.trim().to_lowercase().replace(' ', "_")
}

struct Header {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    fn from_record(record: &StringRecord) -> Self {
        let columns: Vec<String> = record.iter().map(normalize_column_name).collect();
        let mut index = HashMap::new();
        for (idx, name) in columns.iter().enumerate() {
            // First occurrence wins on duplicate headers.
            index.entry(name.clone()).or_insert(idx);
        }
        Self { columns, index }
    }

    fn require(&self, table: &str, names: &[&str]) -> Result<()> {
        for name in names {
            if !self.index.contains_key(*name) {
                return Err(anyhow!("{table} table missing required column `{name}`"));
            }
        }
        Ok(())
    }

    fn pos(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

// Counts cells per column that failed to coerce; one warning per column.
#[derive(Default)]
struct CoercionLog {
    failures: Vec<(String, usize)>,
}

impl CoercionLog {
    fn note(&mut self, column: &str) {
        if let Some(entry) = self.failures.iter_mut().find(|(c, _)| c == column) {
            entry.1 += 1;
        } else {
            self.failures.push((column.to_string(), 1));
        }
    }

    fn into_warnings(self, table: &str) -> Vec<String> {
        self.failures
            .into_iter()
            .map(|(column, n)| format!("{table}: {n} value(s) in `{column}` could not be parsed"))
            .collect()
    }
}

pub fn parse_results_csv(raw: &str) -> Result<ParsedTable<MatchRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let header = Header::from_record(reader.headers().context("read results header")?);
    header.require("results", &RESULTS_REQUIRED)?;

    let mut log = CoercionLog::default();
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read results row {}", line + 1))?;
        let cell = |name: &str| header.pos(name).and_then(|i| record.get(i)).unwrap_or("");

        let mut score = |name: &str| {
            let value = coerce_numeric(cell(name)).as_f64();
            if value.is_none() {
                log.note(name);
            }
            value
        };
        let home_score = score("home_score");
        let away_score = score("away_score");

        let match_date = parse_date(cell("match_date"));
        if match_date.is_none() {
            log.note("match_date");
        }

        let mut stat = |name: &str| {
            header.pos(name)?;
            let raw = cell(name);
            let value = coerce_numeric(raw);
            if !value.is_number() && !raw.is_empty() {
                log.note(name);
            }
            Some(value)
        };

        rows.push(MatchRecord {
            home_team: cell("home_team").to_string(),
            away_team: cell("away_team").to_string(),
            home_score,
            away_score,
            match_date,
            total_corners: stat("total_corners"),
            home_yellow_cards: stat("home_yellow_cards"),
            away_yellow_cards: stat("away_yellow_cards"),
            first_half_home: stat("first_half_home"),
            first_half_away: stat("first_half_away"),
            both_teams_score: stat("both_teams_score"),
            over_2_5: stat("over_2_5"),
        });
    }

    Ok(ParsedTable {
        rows,
        columns: header.columns,
        warnings: log.into_warnings("results"),
    })
}

pub fn parse_fixtures_csv(raw: &str) -> Result<ParsedTable<FixtureRecord>> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(raw.as_bytes());
    let header = Header::from_record(reader.headers().context("read fixtures header")?);
    header.require("fixtures", &FIXTURES_REQUIRED)?;
    let has_date = header.pos("date").is_some();

    let mut log = CoercionLog::default();
    let mut dropped = 0usize;
    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.with_context(|| format!("read fixtures row {}", line + 1))?;
        let cell = |name: &str| header.pos(name).and_then(|i| record.get(i)).unwrap_or("");

        let Some(round_number) = parse_round(cell("round_number")) else {
            dropped += 1;
            continue;
        };
        let date = if has_date {
            let parsed = parse_date(cell("date"));
            if parsed.is_none() && !cell("date").is_empty() {
                log.note("date");
            }
            parsed
        } else {
            None
        };

        rows.push(FixtureRecord {
            home_team: cell("home_team").to_string(),
            away_team: cell("away_team").to_string(),
            round_number,
            date,
        });
    }

    let mut warnings = log.into_warnings("fixtures");
    if dropped > 0 {
        warnings.push(format!(
            "fixtures: dropped {dropped} row(s) without a usable round_number"
        ));
    }
    Ok(ParsedTable {
        rows,
        columns: header.columns,
        warnings,
    })
}

/// Numeric coercion for statistic cells. Boolean words map to 1/0 and
/// anything else unparseable becomes `NotANumber`.
pub fn coerce_numeric(raw: &str) -> StatValue {
    let s = raw.trim();
    if s.eq_ignore_ascii_case("true") {
        return StatValue::Number(1.0);
    }
    if s.eq_ignore_ascii_case("false") {
        return StatValue::Number(0.0);
    }
    s.parse::<f64>()
        .map(StatValue::from)
        .unwrap_or(StatValue::NotANumber)
}

fn parse_round(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 {
        Some(f as i64)
    } else {
        None
    }
}

pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    // Slashed dates read month-first, falling back to day-first when the
    // first field cannot be a month.
    const DATETIME_FORMATS: [&str; 7] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M",
        "%m/%d/%Y %H:%M",
        "%d/%m/%Y %H:%M",
        "%d.%m.%Y %H:%M",
    ];
    const DATE_FORMATS: [&str; 5] = ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%d.%m.%Y", "%Y/%m/%d"];

    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_headers() {
        assert_eq!(normalize_column_name(" Home Team "), "home_team");
        assert_eq!(normalize_column_name("Over_2_5"), "over_2_5");
    }

    #[test]
    fn coerce_handles_bools_and_junk() {
        assert_eq!(coerce_numeric("1"), StatValue::Number(1.0));
        assert_eq!(coerce_numeric("TRUE"), StatValue::Number(1.0));
        assert_eq!(coerce_numeric("false"), StatValue::Number(0.0));
        assert_eq!(coerce_numeric("n/a"), StatValue::NotANumber);
        assert_eq!(coerce_numeric(""), StatValue::NotANumber);
    }

    #[test]
    fn round_accepts_integral_floats() {
        assert_eq!(parse_round("7"), Some(7));
        assert_eq!(parse_round("7.0"), Some(7));
        assert_eq!(parse_round("7.5"), None);
        assert_eq!(parse_round("GW7"), None);
    }

    #[test]
    fn dates_in_common_sheet_formats() {
        let d = parse_date("2024-03-09").unwrap();
        assert_eq!(d.format("%Y-%m-%d").to_string(), "2024-03-09");
        assert_eq!(parse_date("03/09/2024"), Some(d));
        assert_eq!(parse_date("09.03.2024"), Some(d));
        assert!(parse_date("2024-03-09T15:00:00Z").is_some());
        assert!(parse_date("soon").is_none());
    }

    #[test]
    fn slashed_dates_are_month_first() {
        let jan_2 = parse_date("01/02/2025").unwrap();
        assert_eq!(jan_2.format("%Y-%m-%d").to_string(), "2025-01-02");
        let aug_17 = parse_date("08/17/2024 15:00").unwrap();
        assert_eq!(aug_17.format("%Y-%m-%d %H:%M").to_string(), "2024-08-17 15:00");
        let day_first = parse_date("17/08/2024").unwrap();
        assert_eq!(day_first.format("%Y-%m-%d").to_string(), "2024-08-17");
    }

    #[test]
    fn infinite_cells_are_not_numbers() {
        assert_eq!(coerce_numeric("inf"), StatValue::NotANumber);
        assert_eq!(coerce_numeric("-Infinity"), StatValue::NotANumber);
        assert_eq!(coerce_numeric("1e3"), StatValue::Number(1000.0));
    }
}
