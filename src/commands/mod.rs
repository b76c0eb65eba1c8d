// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod card;
pub mod exporter;
pub mod fixed;
pub mod plans;
pub mod profiles;
pub mod reports;
pub mod transactions;

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};

use crate::utils::parse_month;

pub(crate) fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub(crate) fn required<'a>(m: &'a clap::ArgMatches, id: &str) -> Result<&'a str> {
    m.get_one::<String>(id)
        .map(String::as_str)
        .with_context(|| format!("Missing --{}", id))
}

/// `--month` if given, otherwise the current calendar month.
pub(crate) fn month_or_current(m: &clap::ArgMatches) -> Result<(i32, u32)> {
    match m.get_one::<String>("month") {
        Some(s) => parse_month(s),
        None => {
            let t = today();
            Ok((t.year(), t.month()))
        }
    }
}
