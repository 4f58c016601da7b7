//! Reporting periods for the dashboard report.

use chrono::{DateTime, Datelike, Duration, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

/// Time window a dashboard report covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// Since midnight UTC.
    #[default]
    Today,
    /// The last seven days.
    Week,
    /// Since the first day of the current month.
    Month,
}

impl ReportPeriod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Today => "today",
            ReportPeriod::Week => "week",
            ReportPeriod::Month => "month",
        }
    }

    /// Inclusive lower bound of the window ending at `now`.
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let midnight = |date: chrono::NaiveDate| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));

        match self {
            ReportPeriod::Today => midnight(now.date_naive()),
            ReportPeriod::Week => now - Duration::days(7),
            ReportPeriod::Month => {
                let date = now.date_naive();
                // day 1 of any month is always valid
                midnight(date.with_day(1).unwrap_or(date))
            }
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportPeriod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "today" => Ok(ReportPeriod::Today),
            "week" => Ok(ReportPeriod::Week),
            "month" => Ok(ReportPeriod::Month),
            _ => Err(ValidationError::not_allowed("period", &["today", "week", "month"])),
        }
    }
}
