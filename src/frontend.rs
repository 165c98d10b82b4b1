use serde::{Deserialize, Serialize};

use crate::report::ReportStatus;
use crate::rounds::RoundStrategy;
use crate::trends::TrendEngine;

/// The three presentation profiles. They share one engine and differ only in
/// configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrontEnd {
    /// Pick a gameweek by hand, show every trend.
    Gameweek,
    /// Auto-detected current gameweek, digest of at most three trends.
    Current,
    /// Tables come from the admin upload store.
    Admin,
}

impl FrontEnd {
    pub fn from_args(args: &[String]) -> Self {
        if args.iter().any(|a| a == "--admin") {
            FrontEnd::Admin
        } else if args.iter().any(|a| a == "--current") {
            FrontEnd::Current
        } else {
            FrontEnd::Gameweek
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            FrontEnd::Gameweek => "Bola Score - Weekend Stat Blaster",
            FrontEnd::Current => "BolaStats",
            FrontEnd::Admin => "Weekend Stat Blaster",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            FrontEnd::Gameweek => "High-confidence EPL insights from the last 5 meetings (80%+ trends)",
            FrontEnd::Current => "Quick stats for quick thinking",
            FrontEnd::Admin => "Trends from the latest uploaded results and fixtures",
        }
    }

    pub fn engine(self) -> TrendEngine {
        match self {
            FrontEnd::Current => TrendEngine::digest(),
            FrontEnd::Gameweek | FrontEnd::Admin => TrendEngine::full(),
        }
    }

    pub fn round_strategy(self) -> RoundStrategy {
        match self {
            FrontEnd::Current => RoundStrategy::AutoCurrent,
            FrontEnd::Gameweek | FrontEnd::Admin => RoundStrategy::Manual(None),
        }
    }

    pub fn uses_upload_store(self) -> bool {
        self == FrontEnd::Admin
    }

    pub fn round_heading(self, round: i64) -> String {
        match self {
            FrontEnd::Current => format!("Gameweek {round} Predictions"),
            FrontEnd::Gameweek => format!("Gameweek {round} Insights"),
            FrontEnd::Admin => format!("Gameweek {round} Stats"),
        }
    }

    pub fn empty_message(self, status: ReportStatus) -> &'static str {
        match status {
            ReportStatus::InsufficientHistory => "Not enough H2H data to generate trends.",
            ReportStatus::NoQualifyingTrends | ReportStatus::Trends => {
                "No strong trends to recommend for this game."
            }
        }
    }
}
