// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Period runs: roster in, records and period totals out.

use crate::error::{PayrollError, PayrollResult};
use crate::models::{
    Employee, EmployeeStatus, PayrollPeriod, PayrollRecord, PeriodStatus, PeriodTotals,
};
use crate::payroll::contributions::{ContributionSchedule, checked_sum};
use crate::payroll::earnings::EarningsSource;
use crate::payroll::record::build_record;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Storage the engine reads its roster and periods from, and writes run
/// results to.
pub trait PayrollRepository {
    fn active_employees(&self) -> PayrollResult<Vec<Employee>>;

    /// Fails with [`PayrollError::NotFound`] when the period does not exist.
    fn period(&self, period_id: i64) -> PayrollResult<PayrollPeriod>;

    /// Replace every record of `period.id` with `records` and store the
    /// period's new totals, status and processed date. Readers see either
    /// the old state or the new one, never a mix.
    fn commit_run(&mut self, period: &PayrollPeriod, records: &[PayrollRecord])
    -> PayrollResult<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunOutcome {
    pub period: PayrollPeriod,
    pub records: Vec<PayrollRecord>,
}

impl PeriodTotals {
    /// Sum of the records. Overflow is [`PayrollError::InvalidInput`].
    pub fn from_records(records: &[PayrollRecord]) -> PayrollResult<PeriodTotals> {
        let start = PeriodTotals {
            employees: records.len() as i64,
            ..PeriodTotals::default()
        };
        records.iter().try_fold(start, |t, r| {
            Ok(PeriodTotals {
                employees: t.employees,
                gross_pay: checked_sum(&[t.gross_pay, r.gross_pay])?,
                deductions: checked_sum(&[t.deductions, r.total_deductions])?,
                net_pay: checked_sum(&[t.net_pay, r.net_pay])?,
                overtime: checked_sum(&[t.overtime, r.overtime])?,
                holiday: checked_sum(&[t.holiday, r.holiday])?,
                allowances: checked_sum(&[t.allowances, r.allowances])?,
            })
        })
    }

    pub fn verify_against(&self, records: &[PayrollRecord]) -> PayrollResult<()> {
        let expected = PeriodTotals::from_records(records)?;
        if &expected != self {
            return Err(PayrollError::inconsistent(format!(
                "period totals {:?} do not match record sums {:?}",
                self, expected
            )));
        }
        Ok(())
    }
}

/// Compute a run without persisting anything.
pub fn prepare_run<R: PayrollRepository + ?Sized>(
    repo: &R,
    earnings: &dyn EarningsSource,
    schedule: &ContributionSchedule,
    period_id: i64,
    processed_on: NaiveDate,
) -> PayrollResult<RunOutcome> {
    let period = repo.period(period_id)?;
    if !period.status.can_transition_to(PeriodStatus::Completed) {
        return Err(PayrollError::invalid(format!(
            "period {} ({}) is {} and cannot be run",
            period.id, period.label, period.status
        )));
    }

    let mut employees = repo.active_employees()?;
    employees.retain(|e| e.status == EmployeeStatus::Active);
    employees.sort_by_key(|e| e.id);

    let mut records = Vec::with_capacity(employees.len());
    for employee in &employees {
        let extras = earnings.earnings_for(employee, &period)?;
        let record = build_record(schedule, period.id, employee, &extras)?;
        record.verify()?;
        if record.net_pay < Decimal::ZERO {
            warn!(
                period = period.id,
                employee = employee.id,
                net_pay = %record.net_pay,
                "negative net pay"
            );
        }
        debug!(
            employee = employee.id,
            gross = %record.gross_pay,
            deductions = %record.total_deductions,
            net = %record.net_pay,
            "built payroll record"
        );
        records.push(record);
    }

    let totals = PeriodTotals::from_records(&records)?;
    Ok(RunOutcome {
        period: PayrollPeriod {
            status: PeriodStatus::Completed,
            totals,
            processed_date: Some(processed_on),
            ..period
        },
        records,
    })
}

/// Run payroll for a period and commit the result. Either the whole record
/// set and the period update are stored, or nothing is.
pub fn run_payroll<R: PayrollRepository + ?Sized>(
    repo: &mut R,
    earnings: &dyn EarningsSource,
    schedule: &ContributionSchedule,
    period_id: i64,
    processed_on: NaiveDate,
) -> PayrollResult<RunOutcome> {
    info!(period = period_id, "starting payroll run");
    let outcome = prepare_run(&*repo, earnings, schedule, period_id, processed_on)?;
    outcome.period.totals.verify_against(&outcome.records)?;
    repo.commit_run(&outcome.period, &outcome.records)?;
    info!(
        period = period_id,
        employees = outcome.period.totals.employees,
        gross = %outcome.period.totals.gross_pay,
        net = %outcome.period.totals.net_pay,
        "payroll run completed"
    );
    Ok(outcome)
}
