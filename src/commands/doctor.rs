// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::{EmployeeStatus, PeriodStatus};
use crate::store;
use crate::utils::pretty_table;
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;

pub fn check(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) Active employees that would abort a run
    for e in store::list_employees(conn)? {
        if e.status != EmployeeStatus::Active {
            continue;
        }
        match e.basic_salary {
            None => rows.push(vec![
                "missing_salary".into(),
                format!("{} {}", e.employee_number, e.name),
            ]),
            Some(s) if s < Decimal::ZERO => rows.push(vec![
                "negative_salary".into(),
                format!("{} {}", e.employee_number, s),
            ]),
            _ => {}
        }
    }

    // 2) Completed periods whose stored totals drifted from their records
    for p in store::list_periods(conn)? {
        let records = store::records_for_period(conn, p.id)?;
        if p.status == PeriodStatus::Completed {
            if let Err(e) = p.totals.verify_against(&records) {
                rows.push(vec!["totals_mismatch".into(), format!("period {}: {}", p.id, e)]);
            }
            if let Some(bad) = records.iter().find_map(|r| r.verify().err()) {
                rows.push(vec!["record_identity".into(), format!("period {}: {}", p.id, bad)]);
            }
        } else if !records.is_empty() {
            rows.push(vec![
                "records_without_run".into(),
                format!("period {} is {} but has {} records", p.id, p.status, records.len()),
            ]);
        }
    }
    Ok(rows)
}

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = check(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}
