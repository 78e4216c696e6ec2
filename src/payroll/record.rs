// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Earnings, Employee, PayrollRecord};
use crate::payroll::contributions::{ContributionSchedule, checked_sum, out_of_range};
use rust_decimal::Decimal;

/// Basic salary of an employee about to be paid: set and non-negative.
pub fn payable_salary(employee: &Employee) -> PayrollResult<Decimal> {
    match employee.basic_salary {
        None => Err(PayrollError::invalid(format!(
            "employee {} ({}) has no basic salary",
            employee.employee_number, employee.name
        ))),
        Some(s) if s < Decimal::ZERO => Err(PayrollError::invalid(format!(
            "employee {} ({}): basic salary must be non-negative, got {}",
            employee.employee_number, employee.name, s
        ))),
        Some(s) => Ok(s),
    }
}

/// Build one employee's record for a period.
///
/// Deductions are computed on basic salary alone, each rounded to whole
/// pesos. Net pay is not clamped; a negative value is returned as-is.
pub fn build_record(
    schedule: &ContributionSchedule,
    period_id: i64,
    employee: &Employee,
    earnings: &Earnings,
) -> PayrollResult<PayrollRecord> {
    let basic_salary = payable_salary(employee)?;
    earnings.validate()?;

    let gross_pay = checked_sum(&[
        basic_salary,
        earnings.overtime,
        earnings.holiday,
        earnings.allowances,
    ])?;
    let deductions = schedule.compute(basic_salary)?.rounded();
    let total_deductions = deductions.total()?;
    let net_pay = gross_pay
        .checked_sub(total_deductions)
        .ok_or_else(out_of_range)?;

    Ok(PayrollRecord {
        period_id,
        employee_id: employee.id,
        employee_name: employee.name.clone(),
        department: employee.department.clone(),
        position: employee.position.clone(),
        basic_salary,
        overtime: earnings.overtime,
        holiday: earnings.holiday,
        allowances: earnings.allowances,
        gross_pay,
        sss: deductions.sss,
        philhealth: deductions.philhealth,
        pagibig: deductions.pagibig,
        withholding_tax: deductions.withholding_tax,
        total_deductions,
        net_pay,
    })
}

impl PayrollRecord {
    pub fn verify(&self) -> PayrollResult<()> {
        let gross = checked_sum(&[
            self.basic_salary,
            self.overtime,
            self.holiday,
            self.allowances,
        ])?;
        if gross != self.gross_pay {
            return Err(PayrollError::inconsistent(format!(
                "employee {}: gross {} != components {}",
                self.employee_id, self.gross_pay, gross
            )));
        }
        let deductions = checked_sum(&[
            self.sss,
            self.philhealth,
            self.pagibig,
            self.withholding_tax,
        ])?;
        if deductions != self.total_deductions {
            return Err(PayrollError::inconsistent(format!(
                "employee {}: total deductions {} != itemized {}",
                self.employee_id, self.total_deductions, deductions
            )));
        }
        if self.gross_pay.checked_sub(self.total_deductions) != Some(self.net_pay) {
            return Err(PayrollError::inconsistent(format!(
                "employee {}: net {} != gross {} - deductions {}",
                self.employee_id, self.net_pay, self.gross_pay, self.total_deductions
            )));
        }
        Ok(())
    }
}
