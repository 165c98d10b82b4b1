use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::records::{MatchRecord, StatValue};

/// Number of most-recent meetings a trend is measured over.
pub const HEAD_TO_HEAD_SAMPLE: usize = 5;
/// Minimum hit ratio for a statistic to count as a trend (inclusive).
pub const TREND_THRESHOLD: f64 = 0.8;
pub const DIGEST_MAX_RESULTS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    BothTeamsScore,
    Over25Goals,
    CornersOver95,
    BookingsOver35,
    FirstHalfGoal,
}

impl Statistic {
    /// Checklist in evaluation order. The order is also the output order.
    pub const CHECKLIST: [Statistic; 5] = [
        Statistic::BothTeamsScore,
        Statistic::Over25Goals,
        Statistic::CornersOver95,
        Statistic::BookingsOver35,
        Statistic::FirstHalfGoal,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Statistic::BothTeamsScore => "Both teams scored",
            Statistic::Over25Goals => "Over 2.5 goals",
            Statistic::CornersOver95 => "Over 9.5 corners",
            Statistic::BookingsOver35 => "Over 3.5 bookings",
            Statistic::FirstHalfGoal => "First-half goals",
        }
    }

    /// Per-match value of this statistic, or `None` when the record lacks the
    /// source column(s). Derived flags yield 1.0/0.0.
    pub fn value(self, m: &MatchRecord) -> Option<StatValue> {
        match self {
            Statistic::BothTeamsScore => m.both_teams_score,
            Statistic::Over25Goals => m.over_2_5,
            Statistic::CornersOver95 => {
                let corners = m.total_corners?;
                Some(flag(corners.as_f64().is_some_and(|c| c > 9.5)))
            }
            Statistic::BookingsOver35 => {
                let total = sum_pair(m.home_yellow_cards?, m.away_yellow_cards?);
                Some(flag(total.is_some_and(|t| t > 3.5)))
            }
            Statistic::FirstHalfGoal => {
                let total = sum_pair(m.first_half_home?, m.first_half_away?);
                Some(flag(total.is_some_and(|t| t > 0.0)))
            }
        }
    }
}

fn flag(hit: bool) -> StatValue {
    StatValue::Number(if hit { 1.0 } else { 0.0 })
}

fn sum_pair(a: StatValue, b: StatValue) -> Option<f64> {
    Some(a.as_f64()? + b.as_f64()?)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TrendKind {
    Win { team: String },
    Stat(Statistic),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trend {
    pub kind: TrendKind,
    pub hits: i64,
    pub sample: usize,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            TrendKind::Win { team } => {
                write!(f, "{team} won {}/{} recent meetings", self.hits, self.sample)
            }
            TrendKind::Stat(stat) => {
                write!(f, "{} in {}/{} games", stat.label(), self.hits, self.sample)
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendResult {
    pub trends: Vec<Trend>,
}

impl TrendResult {
    pub fn is_empty(&self) -> bool {
        self.trends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trends.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trend> {
        self.trends.iter()
    }

    pub fn lines(&self) -> Vec<String> {
        self.trends.iter().map(|t| t.to_string()).collect()
    }

    fn truncate(&mut self, max: MaxResults) {
        if let MaxResults::Capped(n) = max {
            self.trends.truncate(n);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MaxResults {
    #[default]
    Unbounded,
    Capped(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TrendEngine {
    pub max_results: MaxResults,
}

impl TrendEngine {
    pub fn new(max_results: MaxResults) -> Self {
        Self { max_results }
    }

    pub fn full() -> Self {
        Self::new(MaxResults::Unbounded)
    }

    pub fn digest() -> Self {
        Self::new(MaxResults::Capped(DIGEST_MAX_RESULTS))
    }

    pub fn is_digest(&self) -> bool {
        matches!(self.max_results, MaxResults::Capped(_))
    }

    /// Select the head-to-head sample for `home` vs `away` and evaluate it.
    pub fn evaluate(&self, results: &[MatchRecord], home: &str, away: &str) -> TrendResult {
        let h2h = select_head_to_head(results, home, away);
        self.compute_trends(&h2h, home, away)
    }

    /// Evaluate an already selected head-to-head sample. Anything other than
    /// exactly five meetings yields an empty result. Only `home` feeds the
    /// win trend; the away side just names the pairing.
    pub fn compute_trends(&self, h2h: &[&MatchRecord], home: &str, _away: &str) -> TrendResult {
        let mut out = TrendResult::default();
        if h2h.len() != HEAD_TO_HEAD_SAMPLE {
            return out;
        }
        let total = h2h.len();

        let wins = h2h.iter().filter(|m| m.won_by(home)).count();
        if clears_threshold(wins as f64, total) {
            out.trends.push(Trend {
                kind: TrendKind::Win {
                    team: home.to_string(),
                },
                hits: wins as i64,
                sample: total,
            });
        }

        for stat in Statistic::CHECKLIST {
            let Some(sum) = stat_sum(h2h, stat) else {
                continue;
            };
            if clears_threshold(sum, total) {
                out.trends.push(Trend {
                    kind: TrendKind::Stat(stat),
                    hits: sum.trunc() as i64,
                    sample: total,
                });
            }
        }

        out.truncate(self.max_results);
        out
    }
}

/// Meetings between `team_a` and `team_b` in either orientation, newest first,
/// at most [`HEAD_TO_HEAD_SAMPLE`] of them. Undated rows sort last.
pub fn select_head_to_head<'a>(
    results: &'a [MatchRecord],
    team_a: &str,
    team_b: &str,
) -> Vec<&'a MatchRecord> {
    let mut h2h: Vec<&MatchRecord> = results
        .iter()
        .filter(|m| m.involves_pair(team_a, team_b))
        .collect();
    h2h.sort_by(|a, b| match (a.match_date, b.match_date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    h2h.truncate(HEAD_TO_HEAD_SAMPLE);
    h2h
}

// Sum of the numeric values of `stat` across the sample. `None` when any
// record lacks the column; not-a-number cells add nothing.
fn stat_sum(h2h: &[&MatchRecord], stat: Statistic) -> Option<f64> {
    let mut sum = 0.0;
    for m in h2h {
        if let Some(v) = stat.value(m)?.as_f64() {
            sum += v;
        }
    }
    Some(sum)
}

fn clears_threshold(hits: f64, total: usize) -> bool {
    total > 0 && hits / (total as f64) >= TREND_THRESHOLD
}
