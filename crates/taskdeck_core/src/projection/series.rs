//! Completion time series for the progress chart.
//!
//! # Invariants
//! - Weekly, monthly and yearly series always have 7, 12 and 5 buckets.
//! - Buckets are ordered oldest first and end with the period containing
//!   `now`.
//! - Only completed tasks are counted, keyed by the calendar date of their
//!   `updated_at` in the time zone of `now`.

use crate::model::task::{ParseEnumError, Task};
use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Analytics window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    #[default]
    Weekly,
    Monthly,
    Yearly,
}

impl Timeframe {
    pub fn bucket_count(self) -> usize {
        match self {
            Self::Weekly => 7,
            Self::Monthly => 12,
            Self::Yearly => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl FromStr for Timeframe {
    type Err = ParseEnumError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(ParseEnumError {
                kind: "timeframe",
                value: value.to_string(),
            }),
        }
    }
}

impl Display for Timeframe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval covered by one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Period {
    Day { date: NaiveDate },
    /// `month` is 1-based.
    Month { year: i32, month: u32 },
    Year { year: i32 },
}

impl Period {
    fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day { date: day } => day == date,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year { year } => date.year() == year,
        }
    }

    fn label(&self) -> String {
        match *self {
            Self::Day { date } => date.format("%a").to_string(),
            Self::Month { month, .. } => MONTH_ABBREVIATIONS[(month as usize - 1) % 12].to_string(),
            Self::Year { year } => year.to_string(),
        }
    }
}

/// One point of the completion series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionBucket {
    pub label: String,
    pub period: Period,
    pub count: usize,
}

/// Completed-task counts per period, ending with the period containing `now`.
pub fn completion_series<Tz: TimeZone>(
    tasks: &[Task],
    timeframe: Timeframe,
    now: &DateTime<Tz>,
) -> Vec<CompletionBucket> {
    let zone = now.timezone();
    let completed_dates: Vec<NaiveDate> = tasks
        .iter()
        .filter(|task| task.is_completed())
        .map(|task| task.updated_at.with_timezone(&zone).date_naive())
        .collect();

    periods_ending_at(timeframe, now.date_naive())
        .into_iter()
        .map(|period| CompletionBucket {
            label: period.label(),
            count: completed_dates
                .iter()
                .filter(|date| period.contains(**date))
                .count(),
            period,
        })
        .collect()
}

fn periods_ending_at(timeframe: Timeframe, today: NaiveDate) -> Vec<Period> {
    let span = timeframe.bucket_count() as i32;
    match timeframe {
        Timeframe::Weekly => (0..span)
            .rev()
            .map(|back| Period::Day {
                date: today - Duration::days(i64::from(back)),
            })
            .collect(),
        Timeframe::Monthly => {
            let current = today.year() * 12 + today.month0() as i32;
            (0..span)
                .rev()
                .map(|back| {
                    let index = current - back;
                    Period::Month {
                        year: index.div_euclid(12),
                        month: index.rem_euclid(12) as u32 + 1,
                    }
                })
                .collect()
        }
        Timeframe::Yearly => (0..span)
            .rev()
            .map(|back| Period::Year {
                year: today.year() - back,
            })
            .collect(),
    }
}
