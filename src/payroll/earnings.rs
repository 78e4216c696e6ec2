// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Where overtime, holiday pay and allowances come from.

use crate::error::{PayrollError, PayrollResult};
use crate::models::{Earnings, Employee, PayrollPeriod};
use crate::payroll::contributions::out_of_range;
use crate::payroll::record::payable_salary;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

pub trait EarningsSource {
    fn earnings_for(&self, employee: &Employee, period: &PayrollPeriod) -> PayrollResult<Earnings>;
}

/// Earnings derived as fixed fractions of basic salary. Stands in for
/// attendance-derived figures until timesheets feed the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PercentagePolicy {
    pub overtime_rate: Decimal,
    pub holiday_rate: Decimal,
    pub allowance_rate: Decimal,
}

impl Default for PercentagePolicy {
    fn default() -> Self {
        PercentagePolicy {
            overtime_rate: dec!(0.08),
            holiday_rate: Decimal::ZERO,
            allowance_rate: dec!(0.06),
        }
    }
}

impl EarningsSource for PercentagePolicy {
    fn earnings_for(
        &self,
        employee: &Employee,
        _period: &PayrollPeriod,
    ) -> PayrollResult<Earnings> {
        let basic = payable_salary(employee)?;
        let share = |rate: Decimal| basic.checked_mul(rate).ok_or_else(out_of_range);
        Ok(Earnings {
            overtime: share(self.overtime_rate)?,
            holiday: share(self.holiday_rate)?,
            allowances: share(self.allowance_rate)?,
        })
    }
}

/// Earnings recorded per employee for one period. Employees with nothing
/// recorded earn no extras.
#[derive(Debug, Clone, Default)]
pub struct RecordedEarnings {
    period_id: i64,
    by_employee: HashMap<i64, Earnings>,
}

impl RecordedEarnings {
    pub fn new(period_id: i64, by_employee: HashMap<i64, Earnings>) -> Self {
        RecordedEarnings {
            period_id,
            by_employee,
        }
    }
}

impl EarningsSource for RecordedEarnings {
    fn earnings_for(
        &self,
        employee: &Employee,
        period: &PayrollPeriod,
    ) -> PayrollResult<Earnings> {
        if period.id != self.period_id {
            return Err(PayrollError::inconsistent(format!(
                "earnings recorded for period {} used for period {}",
                self.period_id, period.id
            )));
        }
        Ok(self
            .by_employee
            .get(&employee.id)
            .copied()
            .unwrap_or_default())
    }
}

impl Earnings {
    pub fn validate(&self) -> PayrollResult<()> {
        for (name, value) in [
            ("overtime", self.overtime),
            ("holiday", self.holiday),
            ("allowances", self.allowances),
        ] {
            if value < Decimal::ZERO {
                return Err(PayrollError::invalid(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payroll::testing::{employee, period};

    #[test]
    fn percentage_policy_defaults() {
        let e = employee(1, dec!(20000));
        let got = PercentagePolicy::default()
            .earnings_for(&e, &period(1))
            .unwrap();
        assert_eq!(got.overtime, dec!(1600));
        assert_eq!(got.holiday, Decimal::ZERO);
        assert_eq!(got.allowances, dec!(1200));
    }

    #[test]
    fn percentage_policy_requires_salary() {
        let mut e = employee(1, dec!(20000));
        e.basic_salary = None;
        let err = PercentagePolicy::default()
            .earnings_for(&e, &period(1))
            .unwrap_err();
        assert!(matches!(err, PayrollError::InvalidInput(_)));
    }

    #[test]
    fn percentage_policy_names_negative_salary() {
        let e = employee(1, dec!(-100));
        let err = PercentagePolicy::default()
            .earnings_for(&e, &period(1))
            .unwrap_err();
        assert!(err.to_string().contains("basic salary must be non-negative"));
    }

    #[test]
    fn recorded_earnings_default_to_zero() {
        let mut map = HashMap::new();
        map.insert(
            2,
            Earnings {
                overtime: dec!(500),
                holiday: dec!(250),
                allowances: Decimal::ZERO,
            },
        );
        let src = RecordedEarnings::new(7, map);
        let p = period(7);
        assert_eq!(src.earnings_for(&employee(1, dec!(10000)), &p).unwrap(), Earnings::default());
        assert_eq!(src.earnings_for(&employee(2, dec!(10000)), &p).unwrap().holiday, dec!(250));
        assert!(src.earnings_for(&employee(2, dec!(10000)), &period(8)).is_err());
    }

    #[test]
    fn negative_earnings_fail_validation() {
        let e = Earnings {
            overtime: dec!(-1),
            ..Earnings::default()
        };
        assert!(e.validate().is_err());
    }
}
