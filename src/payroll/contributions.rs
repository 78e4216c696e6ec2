// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Statutory contribution and withholding tax tables.
//!
//! Every table is an ascending list of [`Bracket`]s searched with
//! [`find_bracket`]. SSS bands are brackets with a zero marginal rate, so a
//! band lookup and a tax lookup share the same code path.

use crate::error::{PayrollError, PayrollResult};
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bracket {
    pub lower_bound: Decimal,
    pub base_amount: Decimal,
    #[serde(default)]
    pub rate: Decimal,
}

impl Bracket {
    pub fn flat(lower_bound: Decimal, amount: Decimal) -> Self {
        Bracket {
            lower_bound,
            base_amount: amount,
            rate: Decimal::ZERO,
        }
    }

    pub fn marginal(lower_bound: Decimal, base_amount: Decimal, rate: Decimal) -> Self {
        Bracket {
            lower_bound,
            base_amount,
            rate,
        }
    }

    pub fn apply(&self, amount: Decimal) -> PayrollResult<Decimal> {
        amount
            .checked_sub(self.lower_bound)
            .and_then(|over| over.checked_mul(self.rate))
            .and_then(|marginal| self.base_amount.checked_add(marginal))
            .ok_or_else(out_of_range)
    }
}

/// Last bracket whose lower bound is `<= amount`. A value sitting exactly on
/// a boundary belongs to the upper bracket.
pub fn find_bracket(brackets: &[Bracket], amount: Decimal) -> Option<&Bracket> {
    let idx = brackets.partition_point(|b| b.lower_bound <= amount);
    idx.checked_sub(1).map(|i| &brackets[i])
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CappedRate {
    pub rate: Decimal,
    pub cap: Decimal,
}

impl CappedRate {
    pub fn apply(&self, basic_salary: Decimal) -> PayrollResult<Decimal> {
        basic_salary
            .checked_mul(self.rate)
            .map(|v| v.min(self.cap))
            .ok_or_else(out_of_range)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionSchedule {
    pub sss: Vec<Bracket>,
    /// Employee share only: half of the nominal premium rate.
    pub philhealth: CappedRate,
    pub pagibig: CappedRate,
    pub withholding_tax: Vec<Bracket>,
}

impl Default for ContributionSchedule {
    fn default() -> Self {
        ContributionSchedule {
            sss: sss_schedule(),
            philhealth: CappedRate {
                rate: dec!(0.025),
                cap: dec!(2500),
            },
            pagibig: CappedRate {
                rate: dec!(0.02),
                cap: dec!(100),
            },
            withholding_tax: vec![
                Bracket::marginal(dec!(0), dec!(0), dec!(0)),
                Bracket::marginal(dec!(20833), dec!(0), dec!(0.15)),
                Bracket::marginal(dec!(33333), dec!(1875), dec!(0.20)),
                Bracket::marginal(dec!(66667), dec!(8541.80), dec!(0.25)),
                Bracket::marginal(dec!(166667), dec!(33541.80), dec!(0.30)),
                Bracket::marginal(dec!(666667), dec!(183541.80), dec!(0.35)),
            ],
        }
    }
}

// Below 4,250 pays 180; every 500-peso band above adds 22.50 up to the
// 18,250 band, and 18,750 and above pays the 900 ceiling.
fn sss_schedule() -> Vec<Bracket> {
    let first_band = dec!(4250);
    let band_width = dec!(500);
    let floor_amount = dec!(180);
    let step = dec!(22.50);
    let mut bands = vec![Bracket::flat(Decimal::ZERO, floor_amount)];
    for k in 1..=29i64 {
        let n = Decimal::from(k);
        bands.push(Bracket::flat(
            first_band + band_width * (n - Decimal::ONE),
            floor_amount + step * n,
        ));
    }
    bands.push(Bracket::flat(dec!(18750), dec!(900)));
    bands
}

impl ContributionSchedule {
    pub fn from_json(text: &str) -> PayrollResult<Self> {
        let schedule: ContributionSchedule = serde_json::from_str(text)
            .map_err(|e| PayrollError::invalid(format!("malformed schedule: {}", e)))?;
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn load(path: &Path) -> PayrollResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            PayrollError::invalid(format!("cannot read schedule {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> PayrollResult<()> {
        validate_table("sss", &self.sss)?;
        validate_table("withholding_tax", &self.withholding_tax)?;
        for (name, capped) in [("philhealth", &self.philhealth), ("pagibig", &self.pagibig)] {
            if capped.rate < Decimal::ZERO || capped.cap < Decimal::ZERO {
                return Err(PayrollError::invalid(format!(
                    "{} rate and cap must be non-negative",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Compute the four statutory deductions for a monthly basic salary.
    ///
    /// Amounts are unrounded; see [`Contributions::rounded`].
    pub fn compute(&self, basic_salary: Decimal) -> PayrollResult<Contributions> {
        if basic_salary < Decimal::ZERO {
            return Err(PayrollError::invalid(format!(
                "basic salary must be non-negative, got {}",
                basic_salary
            )));
        }
        let sss = find_bracket(&self.sss, basic_salary)
            .map(|b| b.apply(basic_salary))
            .transpose()?
            .unwrap_or(Decimal::ZERO);
        let philhealth = self.philhealth.apply(basic_salary)?;
        let pagibig = self.pagibig.apply(basic_salary)?;
        let taxable_income = basic_salary
            .checked_sub(checked_sum(&[sss, philhealth, pagibig])?)
            .ok_or_else(out_of_range)?;
        let withholding_tax = find_bracket(&self.withholding_tax, taxable_income)
            .map(|b| b.apply(taxable_income))
            .transpose()?
            .unwrap_or(Decimal::ZERO)
            .max(Decimal::ZERO);
        Ok(Contributions {
            sss,
            philhealth,
            pagibig,
            taxable_income,
            withholding_tax,
        })
    }
}

fn validate_table(name: &str, brackets: &[Bracket]) -> PayrollResult<()> {
    let first = brackets
        .first()
        .ok_or_else(|| PayrollError::invalid(format!("{} table is empty", name)))?;
    if !first.lower_bound.is_zero() {
        return Err(PayrollError::invalid(format!(
            "{} table must start at 0, starts at {}",
            name, first.lower_bound
        )));
    }
    for pair in brackets.windows(2) {
        if pair[1].lower_bound <= pair[0].lower_bound {
            return Err(PayrollError::invalid(format!(
                "{} brackets must be strictly ascending ({} after {})",
                name, pair[1].lower_bound, pair[0].lower_bound
            )));
        }
    }
    if let Some(b) = brackets
        .iter()
        .find(|b| b.rate < Decimal::ZERO || b.base_amount < Decimal::ZERO)
    {
        return Err(PayrollError::invalid(format!(
            "{} bracket at {} has a negative rate or base amount",
            name, b.lower_bound
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributions {
    pub sss: Decimal,
    pub philhealth: Decimal,
    pub pagibig: Decimal,
    /// Basic salary net of the other three contributions.
    pub taxable_income: Decimal,
    pub withholding_tax: Decimal,
}

impl Contributions {
    pub fn rounded(&self) -> Contributions {
        Contributions {
            sss: round_peso(self.sss),
            philhealth: round_peso(self.philhealth),
            pagibig: round_peso(self.pagibig),
            taxable_income: self.taxable_income,
            withholding_tax: round_peso(self.withholding_tax),
        }
    }

    pub fn total(&self) -> PayrollResult<Decimal> {
        checked_sum(&[self.sss, self.philhealth, self.pagibig, self.withholding_tax])
    }
}

/// Sum that reports overflow as [`PayrollError::InvalidInput`] instead of
/// panicking.
pub fn checked_sum(parts: &[Decimal]) -> PayrollResult<Decimal> {
    parts
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(*v))
        .ok_or_else(out_of_range)
}

pub(crate) fn out_of_range() -> PayrollError {
    PayrollError::invalid("amount out of range")
}

/// Round to the nearest whole peso, halves away from zero.
pub fn round_peso(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compute(basic: Decimal) -> Contributions {
        ContributionSchedule::default().compute(basic).unwrap()
    }

    #[test]
    fn twenty_thousand_salary_breakdown() {
        let c = compute(dec!(20000));
        assert_eq!(c.sss, dec!(900));
        assert_eq!(c.philhealth, dec!(500));
        assert_eq!(c.pagibig, dec!(100));
        assert_eq!(c.taxable_income, dec!(18500));
        assert_eq!(c.withholding_tax, Decimal::ZERO);
        assert_eq!(c.total().unwrap(), dec!(1500));
    }

    #[test]
    fn sss_band_boundaries_belong_to_upper_band() {
        assert_eq!(compute(dec!(4249.99)).sss, dec!(180));
        assert_eq!(compute(dec!(4250)).sss, dec!(202.50));
        assert_eq!(compute(dec!(4749.99)).sss, dec!(202.50));
        assert_eq!(compute(dec!(4750)).sss, dec!(225.00));
        assert_eq!(compute(dec!(18749.99)).sss, dec!(832.50));
        assert_eq!(compute(dec!(18750)).sss, dec!(900));
        assert_eq!(compute(dec!(250000)).sss, dec!(900));
    }

    #[test]
    fn sss_schedule_shape() {
        let bands = sss_schedule();
        assert_eq!(bands.len(), 31);
        for pair in bands[1..bands.len() - 1].windows(2) {
            assert_eq!(pair[1].lower_bound - pair[0].lower_bound, dec!(500));
            assert_eq!(pair[1].base_amount - pair[0].base_amount, dec!(22.50));
        }
    }

    #[test]
    fn caps_apply_above_threshold() {
        let c = compute(dec!(150000));
        assert_eq!(c.philhealth, dec!(2500));
        assert_eq!(c.pagibig, dec!(100));
        let c = compute(dec!(4000));
        assert_eq!(c.philhealth, dec!(100));
        assert_eq!(c.pagibig, dec!(80));
    }

    #[test]
    fn progressive_tax_on_net_of_contributions() {
        // 40000 - 900 - 1000 - 100 = 38000 -> 1875 + 20% of 4667
        let c = compute(dec!(40000));
        assert_eq!(c.taxable_income, dec!(38000));
        assert_eq!(c.withholding_tax, dec!(2808.40));

        // 100000 - 900 - 2500 - 100 = 96500 -> 8541.80 + 25% of 29833
        let c = compute(dec!(100000));
        assert_eq!(c.withholding_tax, dec!(16000.05));
        assert_eq!(c.rounded().withholding_tax, dec!(16000));
    }

    #[test]
    fn negative_taxable_base_yields_zero_tax() {
        let c = compute(dec!(100));
        assert!(c.taxable_income < Decimal::ZERO);
        assert_eq!(c.withholding_tax, Decimal::ZERO);
    }

    #[test]
    fn zero_salary_is_accepted() {
        let c = compute(Decimal::ZERO);
        assert_eq!(c.sss, dec!(180));
        assert_eq!(c.withholding_tax, Decimal::ZERO);
    }

    #[test]
    fn negative_salary_is_rejected() {
        let err = ContributionSchedule::default()
            .compute(dec!(-1))
            .unwrap_err();
        assert!(matches!(err, PayrollError::InvalidInput(_)));
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_peso(dec!(202.50)), dec!(203));
        assert_eq!(round_peso(dec!(202.49)), dec!(202));
        let c = compute(dec!(4250)).rounded();
        assert_eq!(c.sss, dec!(203));
    }

    #[test]
    fn find_bracket_below_first_bound() {
        let table = vec![Bracket::flat(dec!(10), dec!(1))];
        assert!(find_bracket(&table, dec!(9.99)).is_none());
        assert_eq!(find_bracket(&table, dec!(10)).unwrap().base_amount, dec!(1));
    }

    #[test]
    fn schedule_json_round_trips_and_validates() {
        let json = serde_json::to_string(&ContributionSchedule::default()).unwrap();
        let parsed = ContributionSchedule::from_json(&json).unwrap();
        assert_eq!(parsed, ContributionSchedule::default());

        let mut bad = ContributionSchedule::default();
        bad.withholding_tax.swap(1, 2);
        let json = serde_json::to_string(&bad).unwrap();
        let err = ContributionSchedule::from_json(&json).unwrap_err();
        assert!(err.to_string().contains("strictly ascending"));
    }

    #[test]
    fn largest_salary_is_computed_without_overflow() {
        let c = compute(Decimal::MAX);
        assert_eq!(c.sss, dec!(900));
        assert_eq!(c.philhealth, dec!(2500));
        assert_eq!(c.pagibig, dec!(100));
        assert!(c.withholding_tax > Decimal::ZERO);
    }

    #[test]
    fn overflowing_schedule_is_an_error() {
        let mut schedule = ContributionSchedule::default();
        schedule.withholding_tax = vec![Bracket::marginal(dec!(0), dec!(0), dec!(2))];
        let err = schedule.compute(Decimal::MAX).unwrap_err();
        assert!(matches!(err, PayrollError::InvalidInput(_)));
        assert!(checked_sum(&[Decimal::MAX, Decimal::ONE]).is_err());
    }
}
