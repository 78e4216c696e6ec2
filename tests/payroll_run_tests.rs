// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use rusqlite::Connection;
use rust_decimal::Decimal;
use sahod::models::PeriodStatus;
use sahod::{cli, commands, db, store};

fn setup() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    db::init_schema(&conn).unwrap();
    conn.execute_batch(
        r#"
        INSERT INTO employees(employee_number,name,department,position,hire_date,basic_salary)
            VALUES ('E-001','Ana Cruz','Finance','Analyst','2022-03-01','20000');
        INSERT INTO employees(employee_number,name,department,position,hire_date,basic_salary)
            VALUES ('E-002','Ben Reyes','Sales','Agent','2021-01-15','40000');
        INSERT INTO payroll_periods(label,start_date,end_date,pay_date)
            VALUES ('January 2025','2025-01-01','2025-01-31','2025-02-05');
        "#,
    )
    .unwrap();
    conn
}

fn run_cli(conn: &mut Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut argv = vec!["sahod"];
    argv.extend_from_slice(args);
    let matches = cli::build_cli().try_get_matches_from(argv)?;
    match matches.subcommand() {
        Some(("payroll", sub)) => commands::payroll::handle(conn, sub),
        Some(("employee", sub)) => commands::employees::handle(conn, sub),
        Some(("earnings", sub)) => commands::earnings::handle(conn, sub),
        Some(("period", sub)) => commands::periods::handle(conn, sub),
        _ => panic!("unexpected command {:?}", args),
    }
}

const RUN: &[&str] = &["payroll", "run", "--period", "1", "--date", "2025-02-05"];

#[test]
fn run_stores_records_and_completes_period() {
    let mut conn = setup();
    run_cli(&mut conn, RUN).unwrap();

    let period = store::get_period(&conn, 1).unwrap();
    let records = store::records_for_period(&conn, 1).unwrap();
    assert_eq!(period.status, PeriodStatus::Completed);
    assert_eq!(period.processed_date.unwrap().to_string(), "2025-02-05");
    assert_eq!(records.len(), 2);
    assert_eq!(period.totals.employees, 2);
    assert_eq!(period.totals.gross_pay, Decimal::from(68400));
    assert_eq!(period.totals.net_pay, Decimal::from(62092));
    period.totals.verify_against(&records).unwrap();
}

#[test]
fn rerun_gives_identical_totals() {
    let mut conn = setup();
    run_cli(&mut conn, RUN).unwrap();
    let first = store::get_period(&conn, 1).unwrap();
    let first_records = store::records_for_period(&conn, 1).unwrap();
    run_cli(&mut conn, RUN).unwrap();
    assert_eq!(store::get_period(&conn, 1).unwrap(), first);
    assert_eq!(store::records_for_period(&conn, 1).unwrap(), first_records);
}

#[test]
fn rerun_after_deactivation_drops_employee() {
    let mut conn = setup();
    run_cli(&mut conn, RUN).unwrap();
    let before = store::get_period(&conn, 1).unwrap();

    run_cli(
        &mut conn,
        &["employee", "status", "--number", " E-002 ", "--status", "inactive"],
    )
    .unwrap();
    run_cli(&mut conn, RUN).unwrap();

    let after = store::get_period(&conn, 1).unwrap();
    let records = store::records_for_period(&conn, 1).unwrap();
    assert_eq!(after.totals.employees, 1);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].employee_name, "Ana Cruz");
    assert!(after.totals.gross_pay < before.totals.gross_pay);
    assert!(after.totals.net_pay < before.totals.net_pay);
}

#[test]
fn empty_roster_completes_with_zero_totals() {
    let mut conn = setup();
    conn.execute("UPDATE employees SET status='resigned'", []).unwrap();
    run_cli(&mut conn, RUN).unwrap();
    let period = store::get_period(&conn, 1).unwrap();
    assert_eq!(period.status, PeriodStatus::Completed);
    assert_eq!(period.totals.employees, 0);
    assert!(period.totals.gross_pay.is_zero());
    assert!(period.totals.net_pay.is_zero());
    assert!(store::records_for_period(&conn, 1).unwrap().is_empty());
}

#[test]
fn missing_salary_aborts_without_partial_writes() {
    let mut conn = setup();
    run_cli(&mut conn, RUN).unwrap();
    let before = store::get_period(&conn, 1).unwrap();
    let before_records = store::records_for_period(&conn, 1).unwrap();

    conn.execute(
        "INSERT INTO employees(employee_number,name,department,position,hire_date)
         VALUES ('E-003','Cora Lim','IT','Engineer','2024-05-20')",
        [],
    )
    .unwrap();
    let err = run_cli(&mut conn, RUN).unwrap_err();
    assert!(format!("{:#}", err).contains("no basic salary"));
    assert_eq!(store::get_period(&conn, 1).unwrap(), before);
    assert_eq!(store::records_for_period(&conn, 1).unwrap(), before_records);
}

#[test]
fn oversized_salary_aborts_run_with_error() {
    let mut conn = setup();
    conn.execute(
        "UPDATE employees SET basic_salary=?1 WHERE employee_number='E-002'",
        [Decimal::MAX.to_string()],
    )
    .unwrap();
    let err = run_cli(&mut conn, RUN).unwrap_err();
    assert!(format!("{:#}", err).contains("out of range"));
    assert_eq!(store::get_period(&conn, 1).unwrap().status, PeriodStatus::Draft);
    assert!(store::records_for_period(&conn, 1).unwrap().is_empty());
}

#[test]
fn unknown_period_is_not_found() {
    let mut conn = setup();
    let err = run_cli(&mut conn, &["payroll", "run", "--period", "99"]).unwrap_err();
    assert!(format!("{:#}", err).contains("not found"));
}

#[test]
fn cancelled_period_refuses_to_run() {
    let mut conn = setup();
    run_cli(&mut conn, &["period", "cancel", "--id", "1"]).unwrap();
    let err = run_cli(&mut conn, RUN).unwrap_err();
    assert!(format!("{:#}", err).contains("cancelled"));
    assert!(store::records_for_period(&conn, 1).unwrap().is_empty());
}

#[test]
fn processing_period_can_be_cancelled() {
    let mut conn = setup();
    conn.execute("UPDATE payroll_periods SET status='processing' WHERE id=1", [])
        .unwrap();
    run_cli(&mut conn, &["period", "cancel", "--id", "1"]).unwrap();
    assert_eq!(store::get_period(&conn, 1).unwrap().status, PeriodStatus::Cancelled);

    let help = cli::build_cli()
        .find_subcommand("period")
        .and_then(|p| p.find_subcommand("cancel"))
        .and_then(|c| c.get_about())
        .map(|a| a.to_string())
        .unwrap();
    assert!(help.contains("processing"));
}

#[test]
fn recorded_earnings_replace_policy() {
    let mut conn = setup();
    run_cli(
        &mut conn,
        &[
            "earnings", "set", "--period", "1", "--employee", "E-001", "--overtime", "1250.50",
            "--holiday", "800",
        ],
    )
    .unwrap();
    run_cli(
        &mut conn,
        &[
            "payroll", "run", "--period", "1", "--earnings", "recorded", "--date", "2025-02-05",
        ],
    )
    .unwrap();
    let period = store::get_period(&conn, 1).unwrap();
    // 20000 + 1250.50 + 800 + 40000
    assert_eq!(period.totals.gross_pay, Decimal::new(6205050, 2));
    assert_eq!(period.totals.overtime, Decimal::new(125050, 2));
    assert_eq!(period.totals.holiday, Decimal::from(800));
    assert!(period.totals.allowances.is_zero());
}

#[test]
fn earnings_set_keeps_unspecified_components() {
    let mut conn = setup();
    run_cli(
        &mut conn,
        &["earnings", "set", "--period", "1", "--employee", "E-001", "--overtime", "500"],
    )
    .unwrap();
    run_cli(
        &mut conn,
        &["earnings", "set", "--period", "1", "--employee", "E-001", "--allowances", "300"],
    )
    .unwrap();
    let rows = commands::earnings::query_rows(&conn, 1).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].overtime, "500.00");
    assert_eq!(rows[0].allowances, "300.00");
    assert_eq!(rows[0].holiday, "0.00");
}

#[test]
fn negative_earnings_rejected() {
    let mut conn = setup();
    let err = run_cli(
        &mut conn,
        &["earnings", "set", "--period", "1", "--employee", "E-001", "--overtime=-5"],
    )
    .unwrap_err();
    assert!(err.to_string().contains("non-negative"));
}

#[test]
fn preview_does_not_store() {
    let mut conn = setup();
    run_cli(&mut conn, &["payroll", "preview", "--period", "1", "--json"]).unwrap();
    assert_eq!(store::get_period(&conn, 1).unwrap().status, PeriodStatus::Draft);
    assert!(store::records_for_period(&conn, 1).unwrap().is_empty());
}
