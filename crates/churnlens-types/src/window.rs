//! Time windows, granularity and focus selectors for frequency analysis.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Look-back window for churn aggregation.
///
/// Parsing is lenient: any unrecognized spelling resolves to
/// [`TimeWindow::Days30`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum TimeWindow {
    #[serde(rename = "7d")]
    Days7,
    #[default]
    #[serde(rename = "30d")]
    Days30,
    #[serde(rename = "90d")]
    Days90,
    #[serde(rename = "1y")]
    Year1,
}

impl TimeWindow {
    /// Every window, shortest first.
    pub const ALL: [TimeWindow; 4] = [
        TimeWindow::Days7,
        TimeWindow::Days30,
        TimeWindow::Days90,
        TimeWindow::Year1,
    ];

    /// Resolve a user-facing alias.
    ///
    /// # Examples
    ///
    /// ```
    /// use churnlens_types::TimeWindow;
    ///
    /// assert_eq!(TimeWindow::parse("week"), TimeWindow::Days7);
    /// assert_eq!(TimeWindow::parse("365d"), TimeWindow::Year1);
    /// assert_eq!(TimeWindow::parse("fortnight"), TimeWindow::Days30);
    /// ```
    #[must_use]
    pub fn parse(s: &str) -> TimeWindow {
        match s {
            "7d" | "7days" | "week" => TimeWindow::Days7,
            "30d" | "30days" | "month" => TimeWindow::Days30,
            "90d" | "90days" | "quarter" => TimeWindow::Days90,
            "1y" | "1year" | "year" | "365d" => TimeWindow::Year1,
            _ => TimeWindow::Days30,
        }
    }

    /// Length of the window in whole days.
    #[must_use]
    pub fn days(self) -> i64 {
        match self {
            TimeWindow::Days7 => 7,
            TimeWindow::Days30 => 30,
            TimeWindow::Days90 => 90,
            TimeWindow::Year1 => 365,
        }
    }

    #[must_use]
    pub fn duration(self) -> Duration {
        Duration::days(self.days())
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TimeWindow::Days7 => "7d",
            TimeWindow::Days30 => "30d",
            TimeWindow::Days90 => "90d",
            TimeWindow::Year1 => "1y",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether frequency is tracked per file or per symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    #[default]
    File,
    Symbol,
}

impl Granularity {
    /// Unknown spellings fall back to file granularity.
    #[must_use]
    pub fn parse(s: &str) -> Granularity {
        match s {
            "symbol" => Granularity::Symbol,
            _ => Granularity::File,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::File => "file",
            Granularity::Symbol => "symbol",
        }
    }
}

/// Sections of the frequency report a caller asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyFocus {
    Hotspots,
    Collisions,
    Patterns,
    Ownership,
    All,
}

impl FrequencyFocus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            FrequencyFocus::Hotspots => "hotspots",
            FrequencyFocus::Collisions => "collisions",
            FrequencyFocus::Patterns => "patterns",
            FrequencyFocus::Ownership => "ownership",
            FrequencyFocus::All => "all",
        }
    }
}
