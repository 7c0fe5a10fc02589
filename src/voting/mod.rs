pub mod report;
pub mod validate;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A calendar month, the granularity every rule in this service works at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    pub fn of(ts: &DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn contains(&self, ts: &DateTime<Utc>) -> bool {
        ts.year() == self.year && ts.month() == self.month
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Period {
    type Err = String;

    // Accepts "yyyy-mm", e.g. "2026-03".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .split_once('-')
            .ok_or_else(|| format!("invalid period '{}', expected yyyy-mm", s))?;
        let year: i32 = year
            .parse()
            .map_err(|_| format!("invalid year in period '{}'", s))?;
        let month: u32 = month
            .parse()
            .map_err(|_| format!("invalid month in period '{}'", s))?;
        if !(1..=12).contains(&month) {
            return Err(format!("month out of range in period '{}'", s));
        }
        Ok(Period { year, month })
    }
}

/// The overall winner of a period: whoever collected the most votes across
/// all categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostVoted {
    pub id: Uuid,
    pub name: String,
    pub count: usize,
}

/// Monthly summary handed to an admin. Recomputed on every request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub most_voted: MostVoted,
    pub period: Period,
    pub registered_employee_count: usize,
    /// Winner name -> category label, one entry per category that saw votes,
    /// in category declaration order.
    pub nomination_winners: BTreeMap<String, String>,
}
