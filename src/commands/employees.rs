// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EmployeeStatus, EmploymentType};
use crate::store;
use crate::utils::{
    arg, fmt_peso, maybe_print_json, opt_arg, parse_amount, parse_date, pretty_table,
};
use anyhow::{Context, Result, anyhow};
use rusqlite::{Connection, params};

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("salary", sub)) => set_salary(conn, sub)?,
        Some(("status", sub)) => set_status(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = arg(sub, "number")?;
    let name = arg(sub, "name")?;
    let department = arg(sub, "department")?;
    let position = arg(sub, "position")?;
    let employment_type: EmploymentType = arg(sub, "type")?.parse()?;
    let hired = parse_date(arg(sub, "hired")?)?;
    let salary = opt_arg(sub, "salary").map(parse_amount).transpose()?;

    conn.execute(
        "INSERT INTO employees(employee_number, name, department, position, employment_type, hire_date, basic_salary)
         VALUES (?1,?2,?3,?4,?5,?6,?7)",
        params![
            number,
            name,
            department,
            position,
            employment_type.as_str(),
            hired,
            salary.map(|s| s.to_string())
        ],
    )
    .with_context(|| format!("Add employee '{}'", number))?;
    println!("Added employee {} ({}, {})", number, name, position);
    Ok(())
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let status = opt_arg(sub, "status")
        .map(|s| s.parse::<EmployeeStatus>())
        .transpose()?;
    let mut employees = store::list_employees(conn)?;
    if let Some(st) = status {
        employees.retain(|e| e.status == st);
    }
    if !maybe_print_json(sub.get_flag("json"), sub.get_flag("jsonl"), &employees)? {
        let rows = employees
            .iter()
            .map(|e| {
                vec![
                    e.employee_number.clone(),
                    e.name.clone(),
                    e.department.clone(),
                    e.position.clone(),
                    e.employment_type.as_str().to_string(),
                    e.hire_date.to_string(),
                    e.basic_salary.as_ref().map(fmt_peso).unwrap_or_else(|| "-".into()),
                    e.status.to_string(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &["No.", "Name", "Department", "Position", "Type", "Hired", "Basic", "Status"],
                rows
            )
        );
    }
    Ok(())
}

fn set_salary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = arg(sub, "number")?;
    let amount = parse_amount(arg(sub, "amount")?)?;
    let changed = conn.execute(
        "UPDATE employees SET basic_salary=?2 WHERE employee_number=?1",
        params![number, amount.to_string()],
    )?;
    if changed == 0 {
        return Err(anyhow!("Employee '{}' not found", number));
    }
    tracing::info!(employee = number, salary = %amount, "basic salary updated");
    println!("Basic salary of {} set to {}", number, fmt_peso(&amount));
    Ok(())
}

fn set_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let number = arg(sub, "number")?;
    let status: EmployeeStatus = arg(sub, "status")?.parse()?;
    let changed = conn.execute(
        "UPDATE employees SET status=?2 WHERE employee_number=?1",
        params![number, status.as_str()],
    )?;
    if changed == 0 {
        return Err(anyhow!("Employee '{}' not found", number));
    }
    println!("Employee {} is now {}", number, status);
    Ok(())
}
