// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Employee, EmployeeStatus, PayrollPeriod, PayrollRecord};
use crate::payroll::run::PayrollRepository;
use std::collections::BTreeMap;

/// Repository held entirely in memory.
///
/// A commit builds the next record collection off to the side and swaps it
/// in with one assignment.
#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    employees: Vec<Employee>,
    periods: BTreeMap<i64, PayrollPeriod>,
    records: Vec<PayrollRecord>,
}

impl MemoryRepository {
    pub fn add_employee(&mut self, employee: Employee) {
        self.employees.retain(|e| e.id != employee.id);
        self.employees.push(employee);
    }

    pub fn add_period(&mut self, period: PayrollPeriod) {
        self.periods.insert(period.id, period);
    }

    pub fn set_status(&mut self, employee_id: i64, status: EmployeeStatus) -> PayrollResult<()> {
        let employee = self
            .employees
            .iter_mut()
            .find(|e| e.id == employee_id)
            .ok_or_else(|| PayrollError::not_found(format!("employee {}", employee_id)))?;
        employee.status = status;
        Ok(())
    }

    pub fn records_for(&self, period_id: i64) -> Vec<PayrollRecord> {
        let mut out: Vec<PayrollRecord> = self
            .records
            .iter()
            .filter(|r| r.period_id == period_id)
            .cloned()
            .collect();
        out.sort_by_key(|r| r.employee_id);
        out
    }
}

impl PayrollRepository for MemoryRepository {
    fn active_employees(&self) -> PayrollResult<Vec<Employee>> {
        Ok(self
            .employees
            .iter()
            .filter(|e| e.status == EmployeeStatus::Active)
            .cloned()
            .collect())
    }

    fn period(&self, period_id: i64) -> PayrollResult<PayrollPeriod> {
        self.periods
            .get(&period_id)
            .cloned()
            .ok_or_else(|| PayrollError::not_found(format!("payroll period {}", period_id)))
    }

    fn commit_run(
        &mut self,
        period: &PayrollPeriod,
        records: &[PayrollRecord],
    ) -> PayrollResult<()> {
        if !self.periods.contains_key(&period.id) {
            return Err(PayrollError::not_found(format!(
                "payroll period {}",
                period.id
            )));
        }
        if let Some(stray) = records.iter().find(|r| r.period_id != period.id) {
            return Err(PayrollError::inconsistent(format!(
                "record for employee {} belongs to period {}, not {}",
                stray.employee_id, stray.period_id, period.id
            )));
        }
        let mut next: Vec<PayrollRecord> = self
            .records
            .iter()
            .filter(|r| r.period_id != period.id)
            .cloned()
            .collect();
        next.extend_from_slice(records);

        self.records = next;
        self.periods.insert(period.id, period.clone());
        Ok(())
    }
}
