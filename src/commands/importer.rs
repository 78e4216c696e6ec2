// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EmployeeStatus, EmploymentType};
use crate::utils::{arg, parse_amount, parse_date};
use anyhow::{Context, Result};
use csv::ReaderBuilder;
use rusqlite::{Connection, params};

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("employees", sub)) => import_employees(conn, sub),
        _ => Ok(()),
    }
}

/// Columns: employee_number, name, department, position, employment_type,
/// hire_date, basic_salary, status. Blank type, salary and status mean
/// regular, unset and active. Existing employee numbers are updated.
fn import_employees(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let path = arg(sub, "path")?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Open CSV {}", path))?;

    let tx = conn.transaction()?;
    let mut count = 0usize;
    for (line, result) in rdr.records().enumerate() {
        let rec = result?;
        let row = line + 2;
        let number = rec.get(0).filter(|s| !s.is_empty()).with_context(|| {
            format!("Row {}: employee_number missing", row)
        })?;
        let name = rec
            .get(1)
            .filter(|s| !s.is_empty())
            .with_context(|| format!("Row {}: name missing", row))?;
        let department = rec.get(2).unwrap_or("");
        let position = rec.get(3).unwrap_or("");
        let employment_type = match rec.get(4).filter(|s| !s.is_empty()) {
            Some(t) => t
                .parse::<EmploymentType>()
                .with_context(|| format!("Row {}", row))?,
            None => EmploymentType::Regular,
        };
        let hire_date = parse_date(rec.get(5).context("hire_date missing")?)
            .with_context(|| format!("Row {}: invalid hire_date", row))?;
        let salary = rec
            .get(6)
            .filter(|s| !s.is_empty())
            .map(parse_amount)
            .transpose()
            .with_context(|| format!("Row {}: invalid basic_salary for {}", row, number))?;
        let status = match rec.get(7).filter(|s| !s.is_empty()) {
            Some(s) => s
                .parse::<EmployeeStatus>()
                .with_context(|| format!("Row {}", row))?,
            None => EmployeeStatus::Active,
        };

        tx.execute(
            "INSERT INTO employees(employee_number, name, department, position, employment_type, hire_date, basic_salary, status)
             VALUES (?1,?2,?3,?4,?5,?6,?7,?8)
             ON CONFLICT(employee_number) DO UPDATE SET
                name=excluded.name, department=excluded.department, position=excluded.position,
                employment_type=excluded.employment_type, hire_date=excluded.hire_date,
                basic_salary=excluded.basic_salary, status=excluded.status",
            params![
                number,
                name,
                department,
                position,
                employment_type.as_str(),
                hire_date,
                salary.map(|s| s.to_string()),
                status.as_str()
            ],
        )?;
        count += 1;
    }
    tx.commit()?;
    tracing::info!(count, path, "imported employees");
    println!("Imported {} employees from {}", count, path);
    Ok(())
}
