//! Mastery progression for spaced review.
//!
//! A problem moves through levels 0 (new) to 4 (retired). A correct review
//! moves one level up and pushes the due date out by the interval of the new
//! level; an incorrect review lapses the level and makes the problem due
//! immediately.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, AppResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct MasteryLevel(u8);

impl MasteryLevel {
    pub const NEW: MasteryLevel = MasteryLevel(0);
    pub const RETIRED: MasteryLevel = MasteryLevel(4);

    pub fn new(level: u8) -> Option<Self> {
        (level <= Self::RETIRED.0).then_some(MasteryLevel(level))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_retired(&self) -> bool {
        *self == Self::RETIRED
    }

    pub fn promoted(self) -> Self {
        MasteryLevel((self.0 + 1).min(Self::RETIRED.0))
    }

    pub fn demoted(self) -> Self {
        MasteryLevel(self.0.saturating_sub(1))
    }
}

impl TryFrom<i32> for MasteryLevel {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .ok()
            .and_then(MasteryLevel::new)
            .ok_or_else(|| format!("mastery level {} is outside 0..=4", value))
    }
}

impl From<MasteryLevel> for i32 {
    fn from(level: MasteryLevel) -> Self {
        level.0 as i32
    }
}

impl fmt::Display for MasteryLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Days until the next review after reaching levels 1 through 4.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewIntervals {
    days: [i64; 4],
}

impl Default for ReviewIntervals {
    fn default() -> Self {
        Self { days: [1, 3, 7, 14] }
    }
}

impl ReviewIntervals {
    pub fn new(days: [i64; 4]) -> AppResult<Self> {
        if days[0] <= 0 {
            return Err(AppError::ValidationError(
                "Review intervals must be positive".to_string(),
            ));
        }
        if days.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(AppError::ValidationError(
                "Review intervals must be strictly increasing".to_string(),
            ));
        }
        Ok(Self { days })
    }

    /// Parses a comma separated list such as `1,3,7,14`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let parsed: Vec<i64> = raw
            .split(',')
            .map(|part| part.trim().parse::<i64>())
            .collect::<Result<_, _>>()
            .map_err(|_| AppError::ValidationError(format!("Invalid review intervals '{}'", raw)))?;

        let days: [i64; 4] = parsed.try_into().map_err(|_| {
            AppError::ValidationError("Exactly four review intervals are required".to_string())
        })?;

        Self::new(days)
    }

    pub fn days(&self) -> [i64; 4] {
        self.days
    }

    pub fn interval_for(&self, level: MasteryLevel) -> Duration {
        match level.value() {
            0 => Duration::zero(),
            n => Duration::days(self.days[n as usize - 1]),
        }
    }
}

/// What an incorrect review does to the level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LapsePolicy {
    #[default]
    Reset,
    Decrement,
}

impl FromStr for LapsePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" => Ok(LapsePolicy::Reset),
            "decrement" => Ok(LapsePolicy::Decrement),
            other => Err(AppError::ValidationError(format!(
                "Unknown lapse policy '{}'",
                other
            ))),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReviewTransition {
    pub level: MasteryLevel,
    pub next_review_date: DateTime<Utc>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReviewPolicy {
    pub intervals: ReviewIntervals,
    pub lapse: LapsePolicy,
}

impl ReviewPolicy {
    pub fn new(intervals: ReviewIntervals, lapse: LapsePolicy) -> Self {
        Self { intervals, lapse }
    }

    pub fn apply(&self, level: MasteryLevel, is_correct: bool, now: DateTime<Utc>) -> ReviewTransition {
        if is_correct {
            let level = level.promoted();
            ReviewTransition {
                level,
                next_review_date: now + self.intervals.interval_for(level),
            }
        } else {
            let level = match self.lapse {
                LapsePolicy::Reset => MasteryLevel::NEW,
                LapsePolicy::Decrement => level.demoted(),
            };
            ReviewTransition {
                level,
                next_review_date: now,
            }
        }
    }

    /// Due date for the stage after `stage`, used by workbook schedules.
    pub fn next_stage_date(&self, stage: i32, now: DateTime<Utc>) -> Option<(i32, DateTime<Utc>)> {
        let next = MasteryLevel::new(u8::try_from(stage.checked_add(1)?).ok()?)?;
        Some((next.value() as i32, now + self.intervals.interval_for(next)))
    }
}
