// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{PayrollPeriod, PayrollRecord};
use crate::payroll::{EarningsSource, RecordedEarnings, prepare_run, run_payroll};
use crate::store::{self, SqliteRepository};
use crate::utils::{
    arg, earnings_policy, fmt_peso, load_schedule, maybe_print_json, opt_arg, parse_date,
    parse_id, pretty_table,
};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use rusqlite::Connection;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("run", sub)) => run(conn, sub)?,
        Some(("preview", sub)) => preview(conn, sub)?,
        Some(("records", sub)) => records(conn, sub)?,
        _ => {}
    }
    Ok(())
}

pub fn earnings_source(
    conn: &Connection,
    sub: &clap::ArgMatches,
    period_id: i64,
) -> Result<Box<dyn EarningsSource>> {
    match opt_arg(sub, "earnings").unwrap_or("policy") {
        "recorded" => Ok(Box::new(RecordedEarnings::new(
            period_id,
            store::recorded_earnings(conn, period_id)?,
        ))),
        _ => Ok(Box::new(earnings_policy(conn)?)),
    }
}

fn processed_date(sub: &clap::ArgMatches) -> Result<NaiveDate> {
    match opt_arg(sub, "date") {
        Some(d) => parse_date(d),
        None => Ok(Local::now().date_naive()),
    }
}

fn run(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period_id = parse_id(arg(sub, "period")?)?;
    let schedule = load_schedule(conn)?;
    let source = earnings_source(conn, sub, period_id)?;
    let processed_on = processed_date(sub)?;

    let mut repo = SqliteRepository::new(conn);
    let outcome = run_payroll(&mut repo, source.as_ref(), &schedule, period_id, processed_on)
        .with_context(|| format!("Payroll run for period {} failed", period_id))?;

    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome)? {
        print_records(&outcome.records);
        print_summary(&outcome.period);
    }
    Ok(())
}

fn preview(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period_id = parse_id(arg(sub, "period")?)?;
    let schedule = load_schedule(conn)?;
    let source = earnings_source(conn, sub, period_id)?;

    let repo = SqliteRepository::new(conn);
    let outcome = prepare_run(
        &repo,
        source.as_ref(),
        &schedule,
        period_id,
        Local::now().date_naive(),
    )?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &outcome)? {
        print_records(&outcome.records);
        println!("Preview only; nothing was stored.");
        print_summary(&outcome.period);
    }
    Ok(())
}

fn records(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let period_id = parse_id(arg(sub, "period")?)?;
    let period = store::get_period(conn, period_id)?;
    let data = store::records_for_period(conn, period_id)?;
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &data)? {
        print_records(&data);
        print_summary(&period);
    }
    Ok(())
}

fn print_records(records: &[PayrollRecord]) {
    let rows = records
        .iter()
        .map(|r| {
            vec![
                r.employee_name.clone(),
                r.department.clone(),
                fmt_peso(&r.basic_salary),
                fmt_peso(&r.overtime),
                fmt_peso(&r.holiday),
                fmt_peso(&r.allowances),
                fmt_peso(&r.gross_pay),
                fmt_peso(&r.sss),
                fmt_peso(&r.philhealth),
                fmt_peso(&r.pagibig),
                fmt_peso(&r.withholding_tax),
                fmt_peso(&r.net_pay),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(
            &[
                "Employee",
                "Department",
                "Basic",
                "Overtime",
                "Holiday",
                "Allowances",
                "Gross",
                "SSS",
                "PhilHealth",
                "Pag-IBIG",
                "Tax",
                "Net",
            ],
            rows
        )
    );
}

fn print_summary(period: &PayrollPeriod) {
    let t = &period.totals;
    println!(
        "{} [{}]: {} employees, gross {}, deductions {}, net {}",
        period.label,
        period.status,
        t.employees,
        fmt_peso(&t.gross_pay),
        fmt_peso(&t.deductions),
        fmt_peso(&t.net_pay)
    );
}
