use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::records::FixtureRecord;

/// How the round to report on is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundStrategy {
    /// A caller-picked round; `None` means the first available round.
    Manual(Option<i64>),
    /// The earliest round that has not fully played out yet.
    AutoCurrent,
}

impl RoundStrategy {
    pub fn resolve(&self, fixtures: &[FixtureRecord], today: NaiveDate) -> Option<i64> {
        match self {
            RoundStrategy::Manual(choice) => {
                let rounds = distinct_rounds(fixtures);
                match choice {
                    Some(round) => rounds.contains(round).then_some(*round),
                    None => rounds.first().copied(),
                }
            }
            RoundStrategy::AutoCurrent => current_round(fixtures, today),
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, RoundStrategy::AutoCurrent)
    }
}

pub fn distinct_rounds(fixtures: &[FixtureRecord]) -> Vec<i64> {
    let mut rounds: Vec<i64> = fixtures.iter().map(|f| f.round_number).collect();
    rounds.sort_unstable();
    rounds.dedup();
    rounds
}

/// Smallest round whose latest fixture date is on or after `today`. When every
/// round is in the past, the round holding the latest date; when nothing is
/// dated at all, the highest round number.
pub fn current_round(fixtures: &[FixtureRecord], today: NaiveDate) -> Option<i64> {
    let rounds = distinct_rounds(fixtures);
    if rounds.is_empty() {
        return None;
    }

    let mut latest: BTreeMap<i64, NaiveDateTime> = BTreeMap::new();
    for f in fixtures {
        let Some(date) = f.date else {
            continue;
        };
        latest
            .entry(f.round_number)
            .and_modify(|d| *d = (*d).max(date))
            .or_insert(date);
    }

    let Some(midnight) = today.and_hms_opt(0, 0, 0) else {
        return rounds.last().copied();
    };
    if let Some((round, _)) = latest.iter().find(|(_, d)| **d >= midnight) {
        return Some(*round);
    }

    latest
        .iter()
        .max_by(|(ra, da), (rb, db)| da.cmp(db).then(ra.cmp(rb)))
        .map(|(round, _)| *round)
        .or_else(|| rounds.last().copied())
}

pub fn fixtures_in_round(fixtures: &[FixtureRecord], round: i64) -> Vec<&FixtureRecord> {
    fixtures.iter().filter(|f| f.round_number == round).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture(round: i64, date: Option<&str>) -> FixtureRecord {
        let mut f = FixtureRecord::new("A", "B", round);
        f.date = date.map(|d| {
            NaiveDate::parse_from_str(d, "%Y-%m-%d")
                .unwrap()
                .and_hms_opt(15, 0, 0)
                .unwrap()
        });
        f
    }

    #[test]
    fn distinct_rounds_sorted() {
        let fixtures = vec![fixture(3, None), fixture(1, None), fixture(3, None)];
        assert_eq!(distinct_rounds(&fixtures), vec![1, 3]);
    }

    #[test]
    fn undated_table_falls_back_to_highest_round() {
        let fixtures = vec![fixture(2, None), fixture(5, None)];
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(current_round(&fixtures, today), Some(5));
    }
}
