// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::error::PayrollError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    Active,
    Inactive,
    Resigned,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "active",
            EmployeeStatus::Inactive => "inactive",
            EmployeeStatus::Resigned => "resigned",
            EmployeeStatus::Terminated => "terminated",
        }
    }
}

impl FromStr for EmployeeStatus {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Ok(EmployeeStatus::Active),
            "inactive" => Ok(EmployeeStatus::Inactive),
            "resigned" => Ok(EmployeeStatus::Resigned),
            "terminated" => Ok(EmployeeStatus::Terminated),
            other => Err(PayrollError::invalid(format!(
                "unknown employee status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for EmployeeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    Regular,
    Probationary,
    Contractual,
    PartTime,
}

impl EmploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EmploymentType::Regular => "regular",
            EmploymentType::Probationary => "probationary",
            EmploymentType::Contractual => "contractual",
            EmploymentType::PartTime => "part_time",
        }
    }
}

impl FromStr for EmploymentType {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "regular" => Ok(EmploymentType::Regular),
            "probationary" => Ok(EmploymentType::Probationary),
            "contractual" => Ok(EmploymentType::Contractual),
            "part_time" => Ok(EmploymentType::PartTime),
            other => Err(PayrollError::invalid(format!(
                "unknown employment type '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub employee_number: String,
    pub name: String,
    pub department: String,
    pub position: String,
    pub employment_type: EmploymentType,
    pub hire_date: NaiveDate,
    /// Monthly basic salary in pesos; `None` until HR sets it.
    pub basic_salary: Option<Decimal>,
    pub status: EmployeeStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodStatus {
    Draft,
    Processing,
    Completed,
    Cancelled,
}

impl PeriodStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodStatus::Draft => "draft",
            PeriodStatus::Processing => "processing",
            PeriodStatus::Completed => "completed",
            PeriodStatus::Cancelled => "cancelled",
        }
    }

    /// Status only moves forward. A completed period may be completed again
    /// by an explicit re-run.
    pub fn can_transition_to(&self, next: PeriodStatus) -> bool {
        use PeriodStatus::*;
        matches!(
            (self, next),
            (Draft, Processing)
                | (Draft, Completed)
                | (Draft, Cancelled)
                | (Processing, Completed)
                | (Processing, Cancelled)
                | (Completed, Completed)
        )
    }
}

impl FromStr for PeriodStatus {
    type Err = PayrollError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "draft" => Ok(PeriodStatus::Draft),
            "processing" => Ok(PeriodStatus::Processing),
            "completed" => Ok(PeriodStatus::Completed),
            "cancelled" => Ok(PeriodStatus::Cancelled),
            other => Err(PayrollError::invalid(format!(
                "unknown period status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PeriodStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sums over every record of a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodTotals {
    pub employees: i64,
    pub gross_pay: Decimal,
    pub deductions: Decimal,
    pub net_pay: Decimal,
    pub overtime: Decimal,
    pub holiday: Decimal,
    pub allowances: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollPeriod {
    pub id: i64,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub pay_date: NaiveDate,
    pub status: PeriodStatus,
    pub totals: PeriodTotals,
    pub processed_date: Option<NaiveDate>,
}

/// Supplementary earnings for one employee in one period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Earnings {
    pub overtime: Decimal,
    pub holiday: Decimal,
    pub allowances: Decimal,
}

/// One employee's computed pay for one period. Identified by
/// `(period_id, employee_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollRecord {
    pub period_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub department: String,
    pub position: String,
    pub basic_salary: Decimal,
    pub overtime: Decimal,
    pub holiday: Decimal,
    pub allowances: Decimal,
    pub gross_pay: Decimal,
    pub sss: Decimal,
    pub philhealth: Decimal,
    pub pagibig: Decimal,
    pub withholding_tax: Decimal,
    pub total_deductions: Decimal,
    pub net_pay: Decimal,
}
