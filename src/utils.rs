// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::payroll::{ContributionSchedule, PercentagePolicy};
use anyhow::{Context, Result, anyhow};
use chrono::NaiveDate;
use comfy_table::{Cell, Table, presets::UTF8_FULL};
use rusqlite::{Connection, OptionalExtension, params};
use rust_decimal::Decimal;
use std::path::Path;

pub const SETTING_KEYS: &[&str] = &[
    "overtime_rate",
    "holiday_rate",
    "allowance_rate",
    "schedule_path",
];

/// Required argument, trimmed. clap enforces presence; this keeps handlers
/// free of `unwrap`.
pub fn arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Result<&'a str> {
    m.get_one::<String>(name)
        .map(|s| s.trim())
        .with_context(|| format!("Missing argument '--{}'", name))
}

pub fn opt_arg<'a>(m: &'a clap::ArgMatches, name: &str) -> Option<&'a str> {
    m.get_one::<String>(name).map(|s| s.trim())
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.trim()
        .parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

pub fn parse_amount(s: &str) -> Result<Decimal> {
    let d = parse_decimal(s)?;
    if d < Decimal::ZERO {
        return Err(anyhow!("Amount must be non-negative, got {}", d));
    }
    Ok(d)
}

pub fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse::<i64>()
        .with_context(|| format!("Invalid id '{}'", s))
}

pub fn fmt_peso(d: &Decimal) -> String {
    format!("{:.2}", d.round_dp(2))
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
        // arrays stream one element per line
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

pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let v: Option<String> = conn
        .query_row(
            "SELECT value FROM settings WHERE key=?1",
            params![key],
            |r| r.get(0),
        )
        .optional()?;
    Ok(v)
}

pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    if !SETTING_KEYS.contains(&key) {
        return Err(anyhow!(
            "Unknown setting '{}', expected one of: {}",
            key,
            SETTING_KEYS.join(", ")
        ));
    }
    match key {
        "schedule_path" => {
            ContributionSchedule::load(Path::new(value))
                .with_context(|| format!("Schedule at '{}' is not usable", value))?;
        }
        _ => {
            parse_amount(value).with_context(|| format!("Invalid rate for {}", key))?;
        }
    }
    conn.execute(
        "INSERT INTO settings(key, value) VALUES(?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        params![key, value],
    )?;
    Ok(())
}

fn rate_setting(conn: &Connection, key: &str, default: Decimal) -> Result<Decimal> {
    match get_setting(conn, key)? {
        Some(s) => parse_amount(&s).with_context(|| format!("Invalid stored setting {}", key)),
        None => Ok(default),
    }
}

/// Placeholder earnings policy, with any rates overridden in settings.
pub fn earnings_policy(conn: &Connection) -> Result<PercentagePolicy> {
    let d = PercentagePolicy::default();
    Ok(PercentagePolicy {
        overtime_rate: rate_setting(conn, "overtime_rate", d.overtime_rate)?,
        holiday_rate: rate_setting(conn, "holiday_rate", d.holiday_rate)?,
        allowance_rate: rate_setting(conn, "allowance_rate", d.allowance_rate)?,
    })
}

/// Statutory default unless `schedule_path` points at a JSON schedule.
pub fn load_schedule(conn: &Connection) -> Result<ContributionSchedule> {
    match get_setting(conn, "schedule_path")? {
        Some(p) => {
            tracing::debug!(path = %p, "loading contribution schedule");
            ContributionSchedule::load(Path::new(&p))
                .with_context(|| format!("Load contribution schedule from {}", p))
        }
        None => Ok(ContributionSchedule::default()),
    }
}
