// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Credit-card statement cycles.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{FinanceError, Result};
use crate::models::Transaction;
use crate::utils::ymd_clamped;

pub const DEFAULT_BILLING_DAY: u32 = 10;

/// Day of the month a card statement closes, 1..=31.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BillingDay(u32);

impl BillingDay {
    pub fn new(day: u32) -> Result<Self> {
        if (1..=31).contains(&day) {
            Ok(BillingDay(day))
        } else {
            Err(FinanceError::InvalidBillingDay(day))
        }
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for BillingDay {
    fn default() -> Self {
        BillingDay(DEFAULT_BILLING_DAY)
    }
}

impl TryFrom<u32> for BillingDay {
    type Error = FinanceError;

    fn try_from(day: u32) -> Result<Self> {
        BillingDay::new(day)
    }
}

impl From<BillingDay> for u32 {
    fn from(b: BillingDay) -> Self {
        b.0
    }
}

impl fmt::Display for BillingDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed interval `[start, end]` of one statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BillingCycle {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BillingCycle {
    /// Cycle containing `reference`.
    ///
    /// The closing day is clamped to the end of short months, and the
    /// reference is compared against that clamped date, so consecutive cycles
    /// never overlap or leave gaps.
    pub fn resolve(reference: NaiveDate, billing_day: BillingDay) -> Result<Self> {
        let (y, m, b) = (reference.year(), reference.month(), billing_day.get());
        let this_month = ymd_clamped(y, m, 0, b)?;
        let (start, next) = if reference >= this_month {
            (this_month, ymd_clamped(y, m, 1, b)?)
        } else {
            (ymd_clamped(y, m, -1, b)?, this_month)
        };
        Ok(BillingCycle {
            start,
            end: next - Duration::days(1),
        })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn filter<'a, I>(&self, txs: I) -> Vec<&'a Transaction>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        txs.into_iter().filter(|t| self.contains(t.date)).collect()
    }
}

impl fmt::Display for BillingCycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn cycle(reference: NaiveDate, b: u32) -> BillingCycle {
        BillingCycle::resolve(reference, BillingDay::new(b).unwrap()).unwrap()
    }

    #[test]
    fn on_or_after_billing_day_starts_this_month() {
        let c = cycle(d(2024, 1, 15), 10);
        assert_eq!(c.start, d(2024, 1, 10));
        assert_eq!(c.end, d(2024, 2, 9));

        let c = cycle(d(2024, 1, 10), 10);
        assert_eq!(c.start, d(2024, 1, 10));
    }

    #[test]
    fn before_billing_day_starts_last_month() {
        let c = cycle(d(2024, 1, 5), 10);
        assert_eq!(c.start, d(2023, 12, 10));
        assert_eq!(c.end, d(2024, 1, 9));
    }

    #[test]
    fn december_rolls_into_next_year() {
        let c = cycle(d(2024, 12, 20), 10);
        assert_eq!(c.start, d(2024, 12, 10));
        assert_eq!(c.end, d(2025, 1, 9));
    }

    #[test]
    fn day_31_clamps_in_february() {
        let c = cycle(d(2024, 2, 15), 31);
        assert_eq!(c.start, d(2024, 1, 31));
        assert_eq!(c.end, d(2024, 2, 28));

        let c = cycle(d(2024, 2, 29), 31);
        assert_eq!(c.start, d(2024, 2, 29));
        assert_eq!(c.end, d(2024, 3, 30));
    }

    #[test]
    fn cycles_tile_the_calendar() {
        for b in 1..=31 {
            let mut day = d(2023, 11, 1);
            let mut prev = cycle(day, b);
            while day < d(2025, 3, 1) {
                day = day.succ_opt().unwrap();
                let c = cycle(day, b);
                assert!(c.contains(day), "b={b} day={day} cycle={c}");
                if c != prev {
                    assert_eq!(c.start, prev.end.succ_opt().unwrap(), "b={b} day={day}");
                    prev = c;
                }
            }
        }
    }

    #[test]
    fn billing_day_bounds() {
        assert!(BillingDay::new(0).is_err());
        assert!(BillingDay::new(32).is_err());
        assert_eq!(BillingDay::default().get(), 10);
    }
}
