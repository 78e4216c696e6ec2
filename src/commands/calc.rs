// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::payroll::Contributions;
use crate::utils::{arg, fmt_peso, load_schedule, maybe_print_json, parse_decimal, pretty_table};
use anyhow::{Context, Result};
use rusqlite::Connection;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Breakdown {
    pub basic_salary: Decimal,
    pub contributions: Contributions,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}

pub fn breakdown(conn: &Connection, basic_salary: Decimal) -> Result<Breakdown> {
    let schedule = load_schedule(conn)?;
    let contributions = schedule.compute(basic_salary)?.rounded();
    let total_deductions = contributions.total()?;
    let net_pay = basic_salary
        .checked_sub(total_deductions)
        .context("Net pay out of range")?;
    Ok(Breakdown {
        basic_salary,
        contributions,
        total_deductions,
        net_pay,
    })
}

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    let salary = parse_decimal(arg(m, "salary")?)?;
    let b = breakdown(conn, salary)?;
    if !maybe_print_json(m.get_flag("json"), m.get_flag("jsonl"), &b)? {
        let c = &b.contributions;
        let rows = vec![
            vec!["Basic salary".into(), fmt_peso(&b.basic_salary)],
            vec!["SSS".into(), fmt_peso(&c.sss)],
            vec!["PhilHealth".into(), fmt_peso(&c.philhealth)],
            vec!["Pag-IBIG".into(), fmt_peso(&c.pagibig)],
            vec!["Taxable income".into(), fmt_peso(&c.taxable_income)],
            vec!["Withholding tax".into(), fmt_peso(&c.withholding_tax)],
            vec!["Total deductions".into(), fmt_peso(&b.total_deductions)],
            vec!["Net pay".into(), fmt_peso(&b.net_pay)],
        ];
        println!("{}", pretty_table(&["Item", "Amount"], rows));
    }
    Ok(())
}
