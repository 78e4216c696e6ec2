// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! SQLite-backed roster, periods and payroll records.

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Earnings, Employee, PayrollPeriod, PayrollRecord, PeriodTotals};
use crate::payroll::run::PayrollRepository;
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::str::FromStr;

const EMPLOYEE_COLS: &str = "id, employee_number, name, department, position, employment_type, \
                             hire_date, basic_salary, status";

const PERIOD_COLS: &str = "id, label, start_date, end_date, pay_date, status, total_employees, \
                           gross_pay, deductions, net_pay, overtime, holiday, allowances, \
                           processed_date";

const RECORD_COLS: &str = "period_id, employee_id, employee_name, department, position, \
                           basic_salary, overtime, holiday, allowances, gross_pay, sss, \
                           philhealth, pagibig, withholding_tax, total_deductions, net_pay";

fn conversion_err<E>(idx: usize, e: E) -> rusqlite::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

fn get_decimal(r: &Row, idx: usize) -> rusqlite::Result<Decimal> {
    let s: String = r.get(idx)?;
    s.parse::<Decimal>().map_err(|e| conversion_err(idx, e))
}

fn get_parsed<T>(r: &Row, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr<Err = PayrollError>,
{
    let s: String = r.get(idx)?;
    s.parse::<T>().map_err(|e| conversion_err(idx, e))
}

fn employee_from_row(r: &Row) -> rusqlite::Result<Employee> {
    let salary: Option<String> = r.get(7)?;
    let basic_salary = salary
        .map(|s| s.parse::<Decimal>().map_err(|e| conversion_err(7, e)))
        .transpose()?;
    Ok(Employee {
        id: r.get(0)?,
        employee_number: r.get(1)?,
        name: r.get(2)?,
        department: r.get(3)?,
        position: r.get(4)?,
        employment_type: get_parsed(r, 5)?,
        hire_date: r.get(6)?,
        basic_salary,
        status: get_parsed(r, 8)?,
    })
}

fn period_from_row(r: &Row) -> rusqlite::Result<PayrollPeriod> {
    Ok(PayrollPeriod {
        id: r.get(0)?,
        label: r.get(1)?,
        start_date: r.get(2)?,
        end_date: r.get(3)?,
        pay_date: r.get(4)?,
        status: get_parsed(r, 5)?,
        totals: PeriodTotals {
            employees: r.get(6)?,
            gross_pay: get_decimal(r, 7)?,
            deductions: get_decimal(r, 8)?,
            net_pay: get_decimal(r, 9)?,
            overtime: get_decimal(r, 10)?,
            holiday: get_decimal(r, 11)?,
            allowances: get_decimal(r, 12)?,
        },
        processed_date: r.get(13)?,
    })
}

fn record_from_row(r: &Row) -> rusqlite::Result<PayrollRecord> {
    Ok(PayrollRecord {
        period_id: r.get(0)?,
        employee_id: r.get(1)?,
        employee_name: r.get(2)?,
        department: r.get(3)?,
        position: r.get(4)?,
        basic_salary: get_decimal(r, 5)?,
        overtime: get_decimal(r, 6)?,
        holiday: get_decimal(r, 7)?,
        allowances: get_decimal(r, 8)?,
        gross_pay: get_decimal(r, 9)?,
        sss: get_decimal(r, 10)?,
        philhealth: get_decimal(r, 11)?,
        pagibig: get_decimal(r, 12)?,
        withholding_tax: get_decimal(r, 13)?,
        total_deductions: get_decimal(r, 14)?,
        net_pay: get_decimal(r, 15)?,
    })
}

pub fn list_employees(conn: &Connection) -> PayrollResult<Vec<Employee>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM employees ORDER BY employee_number",
        EMPLOYEE_COLS
    ))?;
    let rows = stmt.query_map([], employee_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn active_employees(conn: &Connection) -> PayrollResult<Vec<Employee>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM employees WHERE status='active' ORDER BY id",
        EMPLOYEE_COLS
    ))?;
    let rows = stmt.query_map([], employee_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn employee_by_number(conn: &Connection, number: &str) -> PayrollResult<Employee> {
    conn.query_row(
        &format!(
            "SELECT {} FROM employees WHERE employee_number=?1",
            EMPLOYEE_COLS
        ),
        params![number],
        employee_from_row,
    )
    .optional()?
    .ok_or_else(|| PayrollError::not_found(format!("employee '{}'", number)))
}

pub fn get_period(conn: &Connection, period_id: i64) -> PayrollResult<PayrollPeriod> {
    conn.query_row(
        &format!("SELECT {} FROM payroll_periods WHERE id=?1", PERIOD_COLS),
        params![period_id],
        period_from_row,
    )
    .optional()?
    .ok_or_else(|| PayrollError::not_found(format!("payroll period {}", period_id)))
}

pub fn list_periods(conn: &Connection) -> PayrollResult<Vec<PayrollPeriod>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM payroll_periods ORDER BY start_date DESC, id DESC",
        PERIOD_COLS
    ))?;
    let rows = stmt.query_map([], period_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn records_for_period(
    conn: &Connection,
    period_id: i64,
) -> PayrollResult<Vec<PayrollRecord>> {
    let mut stmt = conn.prepare_cached(&format!(
        "SELECT {} FROM payroll_records WHERE period_id=?1 ORDER BY employee_id",
        RECORD_COLS
    ))?;
    let rows = stmt.query_map(params![period_id], record_from_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Earnings recorded for a period keyed by employee id.
pub fn recorded_earnings(
    conn: &Connection,
    period_id: i64,
) -> PayrollResult<HashMap<i64, Earnings>> {
    let mut stmt = conn.prepare(
        "SELECT employee_id, overtime, holiday, allowances FROM earnings WHERE period_id=?1",
    )?;
    let mut cur = stmt.query(params![period_id])?;
    let mut out = HashMap::new();
    while let Some(r) = cur.next()? {
        let employee_id: i64 = r.get(0)?;
        out.insert(
            employee_id,
            Earnings {
                overtime: get_decimal(r, 1)?,
                holiday: get_decimal(r, 2)?,
                allowances: get_decimal(r, 3)?,
            },
        );
    }
    Ok(out)
}

pub fn upsert_earnings(
    conn: &Connection,
    period_id: i64,
    employee_id: i64,
    earnings: &Earnings,
) -> PayrollResult<()> {
    earnings.validate()?;
    conn.execute(
        "INSERT INTO earnings(period_id, employee_id, overtime, holiday, allowances)
         VALUES (?1,?2,?3,?4,?5)
         ON CONFLICT(period_id, employee_id) DO UPDATE SET
            overtime=excluded.overtime, holiday=excluded.holiday, allowances=excluded.allowances",
        params![
            period_id,
            employee_id,
            earnings.overtime.to_string(),
            earnings.holiday.to_string(),
            earnings.allowances.to_string()
        ],
    )?;
    Ok(())
}

/// Delete every record of the period and insert `records` in its place.
/// Call inside a transaction.
pub fn replace_period_records(
    conn: &Connection,
    period_id: i64,
    records: &[PayrollRecord],
) -> PayrollResult<()> {
    conn.execute(
        "DELETE FROM payroll_records WHERE period_id=?1",
        params![period_id],
    )?;
    let mut stmt = conn.prepare_cached(&format!(
        "INSERT INTO payroll_records({}) VALUES (?1,?2,?3,?4,?5,?6,?7,?8,?9,?10,?11,?12,?13,?14,?15,?16)",
        RECORD_COLS
    ))?;
    for r in records {
        if r.period_id != period_id {
            return Err(PayrollError::inconsistent(format!(
                "record for employee {} belongs to period {}, not {}",
                r.employee_id, r.period_id, period_id
            )));
        }
        stmt.execute(params![
            r.period_id,
            r.employee_id,
            r.employee_name,
            r.department,
            r.position,
            r.basic_salary.to_string(),
            r.overtime.to_string(),
            r.holiday.to_string(),
            r.allowances.to_string(),
            r.gross_pay.to_string(),
            r.sss.to_string(),
            r.philhealth.to_string(),
            r.pagibig.to_string(),
            r.withholding_tax.to_string(),
            r.total_deductions.to_string(),
            r.net_pay.to_string(),
        ])?;
    }
    Ok(())
}

/// Store a period's status, totals and processed date. Call inside a
/// transaction.
pub fn update_period(conn: &Connection, period: &PayrollPeriod) -> PayrollResult<()> {
    let t = &period.totals;
    let changed = conn.execute(
        "UPDATE payroll_periods SET status=?2, total_employees=?3, gross_pay=?4, deductions=?5,
            net_pay=?6, overtime=?7, holiday=?8, allowances=?9, processed_date=?10
         WHERE id=?1",
        params![
            period.id,
            period.status.as_str(),
            t.employees,
            t.gross_pay.to_string(),
            t.deductions.to_string(),
            t.net_pay.to_string(),
            t.overtime.to_string(),
            t.holiday.to_string(),
            t.allowances.to_string(),
            period.processed_date,
        ],
    )?;
    if changed == 0 {
        return Err(PayrollError::not_found(format!(
            "payroll period {}",
            period.id
        )));
    }
    Ok(())
}

pub struct SqliteRepository<'c> {
    conn: &'c mut Connection,
}

impl<'c> SqliteRepository<'c> {
    pub fn new(conn: &'c mut Connection) -> Self {
        SqliteRepository { conn }
    }
}

impl PayrollRepository for SqliteRepository<'_> {
    fn active_employees(&self) -> PayrollResult<Vec<Employee>> {
        active_employees(&*self.conn)
    }

    fn period(&self, period_id: i64) -> PayrollResult<PayrollPeriod> {
        get_period(&*self.conn, period_id)
    }

    fn commit_run(
        &mut self,
        period: &PayrollPeriod,
        records: &[PayrollRecord],
    ) -> PayrollResult<()> {
        let tx = self.conn.transaction()?;
        let current = get_period(&tx, period.id)?;
        if !current.status.can_transition_to(period.status) {
            return Err(PayrollError::invalid(format!(
                "period {} cannot move from {} to {}",
                period.id, current.status, period.status
            )));
        }
        replace_period_records(&tx, period.id, records)?;
        let stored = records_for_period(&tx, period.id)?;
        period.totals.verify_against(&stored)?;
        update_period(&tx, period)?;
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_schema;
    use crate::models::PeriodStatus;
    use crate::payroll::{ContributionSchedule, PercentagePolicy, run_payroll};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn setup() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        init_schema(&conn).unwrap();
        conn.execute_batch(
            r#"
            INSERT INTO employees(employee_number,name,department,position,hire_date,basic_salary)
                VALUES ('E-1','Ana Cruz','Finance','Analyst','2022-03-01','20000');
            INSERT INTO employees(employee_number,name,department,position,hire_date,basic_salary,status)
                VALUES ('E-2','Ben Reyes','Sales','Agent','2021-01-15','15000','resigned');
            INSERT INTO payroll_periods(label,start_date,end_date,pay_date)
                VALUES ('Jan 2025','2025-01-01','2025-01-31','2025-02-05');
            "#,
        )
        .unwrap();
        conn
    }

    #[test]
    fn reads_roster_and_period() {
        let mut conn = setup();
        let repo = SqliteRepository::new(&mut conn);
        let active = repo.active_employees().unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].basic_salary, Some(dec!(20000)));
        let p = repo.period(1).unwrap();
        assert_eq!(p.status, PeriodStatus::Draft);
        assert_eq!(p.totals, PeriodTotals::default());
        assert!(matches!(repo.period(9), Err(PayrollError::NotFound(_))));
    }

    #[test]
    fn commit_replaces_records_atomically() {
        let mut conn = setup();
        let day = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        {
            let mut repo = SqliteRepository::new(&mut conn);
            run_payroll(
                &mut repo,
                &PercentagePolicy::default(),
                &ContributionSchedule::default(),
                1,
                day,
            )
            .unwrap();
        }
        let stored = records_for_period(&conn, 1).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].net_pay, dec!(21300));
        let p = get_period(&conn, 1).unwrap();
        assert_eq!(p.status, PeriodStatus::Completed);
        assert_eq!(p.processed_date, Some(day));
        p.totals.verify_against(&stored).unwrap();
    }

    #[test]
    fn failed_commit_rolls_back() {
        let mut conn = setup();
        let day = NaiveDate::from_ymd_opt(2025, 2, 5).unwrap();
        let outcome = {
            let mut repo = SqliteRepository::new(&mut conn);
            run_payroll(
                &mut repo,
                &PercentagePolicy::default(),
                &ContributionSchedule::default(),
                1,
                day,
            )
            .unwrap()
        };

        let mut bad_period = outcome.period.clone();
        bad_period.totals.net_pay += Decimal::ONE;
        let mut repo = SqliteRepository::new(&mut conn);
        let err = repo.commit_run(&bad_period, &[]).unwrap_err();
        assert!(matches!(err, PayrollError::InconsistentState(_)));

        assert_eq!(records_for_period(&conn, 1).unwrap(), outcome.records);
        assert_eq!(get_period(&conn, 1).unwrap(), outcome.period);
    }
}
