// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use chrono::NaiveDate;
use rusqlite::Connection;
use sahod::commands::doctor;
use sahod::payroll::{ContributionSchedule, PercentagePolicy, run_payroll};
use sahod::{db, store};

fn completed_run() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO employees(employee_number,name,department,position,hire_date,basic_salary)
            VALUES ('E-001','Ana Cruz','Finance','Analyst','2022-03-01','20000');
        INSERT INTO payroll_periods(label,start_date,end_date,pay_date)
            VALUES ('January 2025','2025-01-01','2025-01-31','2025-02-05');
        "#,
    )
    .unwrap();
    let mut repo = store::SqliteRepository::new(&mut conn);
    run_payroll(
        &mut repo,
        &PercentagePolicy::default(),
        &ContributionSchedule::default(),
        1,
        NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
    )
    .unwrap();
    conn
}

fn issues(conn: &Connection) -> Vec<String> {
    doctor::check(conn)
        .unwrap()
        .into_iter()
        .map(|row| row[0].clone())
        .collect()
}

#[test]
fn clean_run_has_no_issues() {
    let conn = completed_run();
    assert!(issues(&conn).is_empty());
}

#[test]
fn edited_record_is_reported() {
    let conn = completed_run();
    conn.execute("UPDATE payroll_records SET net_pay='1' WHERE employee_id=1", [])
        .unwrap();
    let found = issues(&conn);
    assert!(found.contains(&"totals_mismatch".to_string()));
    assert!(found.contains(&"record_identity".to_string()));
}

#[test]
fn missing_salary_and_orphan_records_are_reported() {
    let conn = completed_run();
    conn.execute_batch(
        r#"
        INSERT INTO employees(employee_number,name,department,position,hire_date)
            VALUES ('E-002','Ben Reyes','Sales','Agent','2021-01-15');
        UPDATE payroll_periods SET status='draft' WHERE id=1;
        "#,
    )
    .unwrap();
    let found = issues(&conn);
    assert!(found.contains(&"missing_salary".to_string()));
    assert!(found.contains(&"records_without_run".to_string()));
}
