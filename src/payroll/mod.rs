// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Philippine payroll computation.
//!
//! [`contributions`] maps a basic salary to statutory deductions,
//! [`record`] turns an employee plus earnings into a [`PayrollRecord`], and
//! [`run`] aggregates a whole period against a [`PayrollRepository`].
//!
//! [`PayrollRecord`]: crate::models::PayrollRecord
//! [`PayrollRepository`]: run::PayrollRepository

pub mod contributions;
pub mod earnings;
pub mod memory;
pub mod record;
pub mod run;

pub use contributions::{ContributionSchedule, Contributions};
pub use earnings::{EarningsSource, PercentagePolicy, RecordedEarnings};
pub use memory::MemoryRepository;
pub use record::build_record;
pub use run::{PayrollRepository, RunOutcome, prepare_run, run_payroll};

#[cfg(test)]
pub(crate) mod testing {
    use crate::models::{
        Employee, EmployeeStatus, EmploymentType, PayrollPeriod, PeriodStatus, PeriodTotals,
    };
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    pub fn employee(id: i64, basic: Decimal) -> Employee {
        Employee {
            id,
            employee_number: format!("EMP-{:03}", id),
            name: format!("Employee {}", id),
            department: "Operations".into(),
            position: "Associate".into(),
            employment_type: EmploymentType::Regular,
            hire_date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            basic_salary: Some(basic),
            status: EmployeeStatus::Active,
        }
    }

    pub fn period(id: i64) -> PayrollPeriod {
        PayrollPeriod {
            id,
            label: "January 2025".into(),
            start_date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
            pay_date: NaiveDate::from_ymd_opt(2025, 2, 5).unwrap(),
            status: PeriodStatus::Draft,
            totals: PeriodTotals::default(),
            processed_date: None,
        }
    }
}
