// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Earnings;
use crate::store;
use crate::utils::{arg, fmt_peso, maybe_print_json, opt_arg, parse_amount, parse_id, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use serde::Serialize;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("set", sub)) => set(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn set(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period_id = parse_id(arg(sub, "period")?)?;
    let number = arg(sub, "employee")?;
    store::get_period(conn, period_id)?;
    let employee = store::employee_by_number(conn, number)?;

    // unspecified components keep what was recorded before
    let current = store::recorded_earnings(conn, period_id)?
        .remove(&employee.id)
        .unwrap_or_default();
    let pick = |name: &str, prev| -> Result<_> {
        Ok(match opt_arg(sub, name) {
            Some(v) => parse_amount(v)?,
            None => prev,
        })
    };
    let earnings = Earnings {
        overtime: pick("overtime", current.overtime)?,
        holiday: pick("holiday", current.holiday)?,
        allowances: pick("allowances", current.allowances)?,
    };
    store::upsert_earnings(conn, period_id, employee.id, &earnings)?;
    println!(
        "Recorded for {} in period {}: overtime {}, holiday {}, allowances {}",
        number,
        period_id,
        fmt_peso(&earnings.overtime),
        fmt_peso(&earnings.holiday),
        fmt_peso(&earnings.allowances)
    );
    Ok(())
}

#[derive(Serialize)]
pub struct EarningsRow {
    pub employee_number: String,
    pub name: String,
    pub overtime: String,
    pub holiday: String,
    pub allowances: String,
}

pub fn query_rows(conn: &Connection, period_id: i64) -> Result<Vec<EarningsRow>> {
    let recorded = store::recorded_earnings(conn, period_id)?;
    let mut rows: Vec<EarningsRow> = store::list_employees(conn)?
        .into_iter()
        .filter_map(|e| {
            recorded.get(&e.id).map(|x| EarningsRow {
                employee_number: e.employee_number,
                name: e.name,
                overtime: fmt_peso(&x.overtime),
                holiday: fmt_peso(&x.holiday),
                allowances: fmt_peso(&x.allowances),
            })
        })
        .collect();
    rows.sort_by(|a, b| a.employee_number.cmp(&b.employee_number));
    Ok(rows)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period_id = parse_id(arg(sub, "period")?)?;
    store::get_period(conn, period_id)?;
    let data = query_rows(conn, period_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        let rows = data
            .into_iter()
            .map(|r| vec![r.employee_number, r.name, r.overtime, r.holiday, r.allowances])
            .collect();
        println!(
            "{}",
            pretty_table(&["No.", "Name", "Overtime", "Holiday", "Allowances"], rows)
        );
    }
    Ok(())
}
