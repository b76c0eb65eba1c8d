// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Months, NaiveDate};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::Decimal;

use crate::error::FinanceError;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

/// Parses `YYYY-MM` into `(year, month)`.
pub fn parse_month(s: &str) -> Result<(i32, u32)> {
    let d = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("Invalid month '{}', expected YYYY-MM", s))?;
    Ok((d.year(), d.month()))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Formats an amount as Brazilian reais, e.g. `R$ 1.234,56`.
pub fn fmt_brl(d: &Decimal) -> String {
    let rounded = d.round_dp(2);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}R$ {},{}", sign, grouped, frac_part)
}

/// Saturates at `Decimal::MAX` instead of panicking on overflow.
pub fn sum_amounts<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts
        .into_iter()
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a))
}

pub fn fmt_percent(d: &Decimal) -> String {
    format!("{:.1}%", d.round_dp(1))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        // If v is an array, stream each element; else stream single line
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
                29
            } else {
                28
            }
        }
    }
}

/// Builds the date `day` of the month `offset` months away from
/// `(year, month)`. Days past the end of the target month clamp to its last
/// day, so `(2024, 1) + 1 month, day 31` is 2024-02-29.
pub fn ymd_clamped(
    year: i32,
    month: u32,
    offset: i32,
    day: u32,
) -> std::result::Result<NaiveDate, FinanceError> {
    let index = year as i64 * 12 + (month as i64 - 1) + offset as i64;
    let y = index.div_euclid(12) as i32;
    let m = index.rem_euclid(12) as u32 + 1;
    let d = day.clamp(1, days_in_month(y, m));
    NaiveDate::from_ymd_opt(y, m, d)
        .ok_or_else(|| FinanceError::DateOutOfRange(format!("{y:04}-{m:02}-{d:02}")))
}

/// `date` plus `n` whole months; the day clamps to the end of short months.
pub fn add_months(date: NaiveDate, n: u32) -> std::result::Result<NaiveDate, FinanceError> {
    date.checked_add_months(Months::new(n))
        .ok_or_else(|| FinanceError::DateOutOfRange(format!("{} + {} months", date, n)))
}

pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn brl_formatting_groups_thousands() {
        assert_eq!(fmt_brl(&Decimal::new(123456, 2)), "R$ 1.234,56");
        assert_eq!(fmt_brl(&Decimal::new(5, 0)), "R$ 5,00");
        assert_eq!(fmt_brl(&Decimal::new(-100000050, 2)), "-R$ 1.000.000,50");
        assert_eq!(fmt_brl(&Decimal::ZERO), "R$ 0,00");
    }

    #[test]
    fn ymd_clamped_wraps_years_and_clamps_days() {
        assert_eq!(ymd_clamped(2024, 1, -1, 10).unwrap(), d(2023, 12, 10));
        assert_eq!(ymd_clamped(2024, 12, 1, 10).unwrap(), d(2025, 1, 10));
        assert_eq!(ymd_clamped(2024, 1, 1, 31).unwrap(), d(2024, 2, 29));
        assert_eq!(ymd_clamped(2023, 1, 1, 31).unwrap(), d(2023, 2, 28));
        assert_eq!(ymd_clamped(2024, 3, 13, 15).unwrap(), d(2025, 4, 15));
    }

    #[test]
    fn add_months_clamps_month_end() {
        assert_eq!(add_months(d(2024, 1, 31), 1).unwrap(), d(2024, 2, 29));
        assert_eq!(add_months(d(2024, 1, 15), 2).unwrap(), d(2024, 3, 15));
    }

    #[test]
    fn parse_month_accepts_padded_input() {
        assert_eq!(parse_month(" 2025-07 ").unwrap(), (2025, 7));
        assert!(parse_month("2025-13").is_err());
    }
}
