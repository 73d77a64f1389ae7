//! Calendar month keys ("YYYY-MM")

use crate::error::PlanError;
use chrono::{Datelike, Local, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on simulated months (50 years)
pub const MAX_HORIZON_MONTHS: u32 = 600;

/// A calendar month, serialized as "YYYY-MM"
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MonthKey {
    year: i32,
    /// 1-12
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> Result<Self, PlanError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(|_| Self { year, month })
            .ok_or_else(|| PlanError::InvalidMonthKey(format!("{}-{}", year, month)))
    }

    /// Month containing today's local date
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Absolute month index (`year * 12 + zero-based month`)
    pub fn index(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn from_index(index: i64) -> Self {
        Self {
            year: index.div_euclid(12) as i32,
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn add_months(&self, months: i64) -> Self {
        Self::from_index(self.index() + months)
    }

    /// Signed number of months from `earlier` to `self`
    pub fn months_since(&self, earlier: &MonthKey) -> i64 {
        self.index() - earlier.index()
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlanError::InvalidMonthKey(s.to_string());

        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        if month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;

        Self::new(year, month).map_err(|_| invalid())
    }
}

impl TryFrom<String> for MonthKey {
    type Error = PlanError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

/// Consecutive month keys starting at `start_month`
///
/// The horizon is clamped to `1..=MAX_HORIZON_MONTHS`.
pub fn build_month_sequence(start_month: MonthKey, horizon_months: u32) -> Vec<MonthKey> {
    let horizon = horizon_months.clamp(1, MAX_HORIZON_MONTHS);
    if horizon != horizon_months {
        warn!(
            "horizon of {} months clamped to {}",
            horizon_months, horizon
        );
    }

    let start = start_month.index();
    (0..horizon as i64)
        .map(|offset| MonthKey::from_index(start + offset))
        .collect()
}
