//! Early-unlock reward schedule
//!
//! Maps whole weeks elapsed since a lock to the percentage of the locked
//! amount returned on early unlock. Brackets are half-open and must cover
//! `[0, HISTORY_WEEKS)` exactly once.

use serde::{Deserialize, Serialize};

use crate::constants::{FULL_UNLOCK_PERCENT, HISTORY_WEEKS};
use crate::error::{QearnError, Result};

/// Weeks `[week_from, week_to)` share one early-unlock percentage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBracket {
    pub week_from: u32,
    pub week_to: u32,
    pub early_unlock_percent: u8,
}

impl RewardBracket {
    pub const fn new(week_from: u32, week_to: u32, early_unlock_percent: u8) -> Self {
        Self {
            week_from,
            week_to,
            early_unlock_percent,
        }
    }

    pub fn contains(&self, week: u32) -> bool {
        self.week_from <= week && week < self.week_to
    }
}

/// QEARN early-unlock schedule
pub const QEARN_REWARD_SCHEDULE: [RewardBracket; 12] = [
    RewardBracket::new(0, 4, 0),
    RewardBracket::new(4, 12, 5),
    RewardBracket::new(12, 16, 10),
    RewardBracket::new(16, 20, 15),
    RewardBracket::new(20, 24, 20),
    RewardBracket::new(24, 28, 25),
    RewardBracket::new(28, 32, 30),
    RewardBracket::new(32, 36, 35),
    RewardBracket::new(36, 40, 40),
    RewardBracket::new(40, 44, 45),
    RewardBracket::new(44, 48, 50),
    RewardBracket::new(48, 52, 55),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardScheduleTable {
    brackets: Vec<RewardBracket>,
}

impl RewardScheduleTable {
    /// Build a table from custom brackets, rejecting gaps and overlaps
    pub fn new(mut brackets: Vec<RewardBracket>) -> Result<Self> {
        brackets.sort_by_key(|b| b.week_from);
        let table = Self { brackets };
        table.validate()?;
        Ok(table)
    }

    pub fn brackets(&self) -> &[RewardBracket] {
        &self.brackets
    }

    /// Early-unlock percentage for `weeks_elapsed`
    pub fn lookup(&self, weeks_elapsed: u32) -> Result<u8> {
        self.brackets
            .iter()
            .find(|b| b.contains(weeks_elapsed))
            .map(|b| b.early_unlock_percent)
            .ok_or(QearnError::NoMatchingBracket(weeks_elapsed))
    }

    pub fn full_unlock_percent(&self) -> u8 {
        FULL_UNLOCK_PERCENT
    }

    /// Check the brackets tile `[0, HISTORY_WEEKS)` in order
    pub fn validate(&self) -> Result<()> {
        let mut next = 0;
        for bracket in &self.brackets {
            if bracket.week_from != next {
                return Err(QearnError::Config(format!(
                    "reward bracket starting at week {} should start at week {}",
                    bracket.week_from, next
                )));
            }
            if bracket.week_to <= bracket.week_from {
                return Err(QearnError::Config(format!(
                    "reward bracket [{}, {}) is empty",
                    bracket.week_from, bracket.week_to
                )));
            }
            next = bracket.week_to;
        }
        if next != HISTORY_WEEKS {
            return Err(QearnError::Config(format!(
                "reward brackets end at week {}, expected {}",
                next, HISTORY_WEEKS
            )));
        }
        Ok(())
    }
}

impl Default for RewardScheduleTable {
    fn default() -> Self {
        Self {
            brackets: QEARN_REWARD_SCHEDULE.to_vec(),
        }
    }
}
