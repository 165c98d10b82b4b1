use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A numeric cell after coercion. Cells that fail to parse, or parse to a
/// non-finite float, are kept as `NotANumber` so they can be skipped without shrinking the sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum StatValue {
    Number(f64),
    NotANumber,
}

impl StatValue {
    pub fn as_f64(self) -> Option<f64> {
        match self {
            StatValue::Number(v) if !v.is_nan() => Some(v),
            _ => None,
        }
    }

    pub fn is_number(self) -> bool {
        self.as_f64().is_some()
    }
}

impl From<f64> for StatValue {
    fn from(value: f64) -> Self {
        if !value.is_finite() {
            StatValue::NotANumber
        } else {
            StatValue::Number(value)
        }
    }
}

/// One historical result. Optional statistics are `None` when the source table
/// has no such column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<f64>,
    pub away_score: Option<f64>,
    pub match_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub total_corners: Option<StatValue>,
    #[serde(default)]
    pub home_yellow_cards: Option<StatValue>,
    #[serde(default)]
    pub away_yellow_cards: Option<StatValue>,
    #[serde(default)]
    pub first_half_home: Option<StatValue>,
    #[serde(default)]
    pub first_half_away: Option<StatValue>,
    #[serde(default)]
    pub both_teams_score: Option<StatValue>,
    #[serde(default)]
    pub over_2_5: Option<StatValue>,
}

impl MatchRecord {
    /// Bare result with no optional statistics.
    pub fn new(
        home_team: impl Into<String>,
        away_team: impl Into<String>,
        home_score: f64,
        away_score: f64,
        match_date: Option<NaiveDateTime>,
    ) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            home_score: Some(home_score),
            away_score: Some(away_score),
            match_date,
            total_corners: None,
            home_yellow_cards: None,
            away_yellow_cards: None,
            first_half_home: None,
            first_half_away: None,
            both_teams_score: None,
            over_2_5: None,
        }
    }

    pub fn involves_pair(&self, team_a: &str, team_b: &str) -> bool {
        (self.home_team == team_a && self.away_team == team_b)
            || (self.home_team == team_b && self.away_team == team_a)
    }

    /// True when `team` took part in this match and outscored the opponent.
    pub fn won_by(&self, team: &str) -> bool {
        let (Some(home), Some(away)) = (self.home_score, self.away_score) else {
            return false;
        };
        (self.home_team == team && home > away) || (self.away_team == team && away > home)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureRecord {
    pub home_team: String,
    pub away_team: String,
    pub round_number: i64,
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
}

impl FixtureRecord {
    pub fn new(home_team: impl Into<String>, away_team: impl Into<String>, round_number: i64) -> Self {
        Self {
            home_team: home_team.into(),
            away_team: away_team.into(),
            round_number,
            date: None,
        }
    }

    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}
