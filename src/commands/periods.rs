// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PayrollPeriod, PeriodStatus};
use crate::store;
use crate::utils::{arg, fmt_peso, maybe_print_json, parse_date, parse_id, pretty_table};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("cancel", sub)) => cancel(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let label = arg(sub, "label")?;
    let start = parse_date(arg(sub, "start")?)?;
    let end = parse_date(arg(sub, "end")?)?;
    let pay_date = parse_date(arg(sub, "pay-date")?)?;
    if start > end {
        return Err(anyhow!("Period start {} is after end {}", start, end));
    }
    conn.execute(
        "INSERT INTO payroll_periods(label, start_date, end_date, pay_date) VALUES (?1,?2,?3,?4)",
        params![label, start, end, pay_date],
    )
    .with_context(|| format!("Add period '{}'", label))?;
    println!(
        "Created period {} '{}' ({} to {}, pay {})",
        conn.last_insert_rowid(),
        label,
        start,
        end,
        pay_date
    );
    Ok(())
}

fn period_row(p: &PayrollPeriod) -> Vec<String> {
    vec![
        p.id.to_string(),
        p.label.clone(),
        format!("{} to {}", p.start_date, p.end_date),
        p.pay_date.to_string(),
        p.status.to_string(),
        p.totals.employees.to_string(),
        fmt_peso(&p.totals.gross_pay),
        fmt_peso(&p.totals.deductions),
        fmt_peso(&p.totals.net_pay),
        p.processed_date.map(|d| d.to_string()).unwrap_or_default(),
    ]
}

const PERIOD_HEADERS: [&str; 10] = [
    "Id",
    "Label",
    "Coverage",
    "Pay date",
    "Status",
    "Employees",
    "Gross",
    "Deductions",
    "Net",
    "Processed",
];

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let periods = store::list_periods(conn)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &periods)? {
        let rows = periods.iter().map(period_row).collect();
        println!("{}", pretty_table(&PERIOD_HEADERS, rows));
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let period = store::get_period(conn, id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &period)? {
        println!("{}", pretty_table(&PERIOD_HEADERS, vec![period_row(&period)]));
        let t = &period.totals;
        println!(
            "Overtime {}  Holiday {}  Allowances {}",
            fmt_peso(&t.overtime),
            fmt_peso(&t.holiday),
            fmt_peso(&t.allowances)
        );
    }
    Ok(())
}

fn cancel(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id = parse_id(arg(sub, "id")?)?;
    let period = store::get_period(conn, id)?;
    if !period.status.can_transition_to(PeriodStatus::Cancelled) {
        return Err(anyhow!(
            "Period {} is {} and cannot be cancelled",
            id,
            period.status
        ));
    }
    conn.execute(
        "UPDATE payroll_periods SET status=?2 WHERE id=?1",
        params![id, PeriodStatus::Cancelled.as_str()],
    )?;
    println!("Cancelled period {} '{}'", id, period.label);
    Ok(())
}
