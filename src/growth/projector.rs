//! Year-stepped retirement account growth across tax treatments
//!
//! Three tracks run side by side on the same contribution cadence and growth
//! rate: tax-deferred (taxed at withdrawal), tax-free (contributions taxed up
//! front), and a taxable account whose growth is taxed every year. All inputs
//! are stated in pre-tax dollars.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Inputs for a growth projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthParameters {
    pub current_age: u8,
    pub retirement_age: u8,
    /// Starting balance, pre-tax dollars
    pub starting_balance: f64,
    /// Contribution per year, pre-tax dollars
    pub annual_contribution: f64,
    /// Annual growth rate
    pub growth_rate: f64,
    /// Marginal tax rate while contributing, in [0, 1)
    pub current_tax_rate: f64,
    /// Marginal tax rate in retirement, in [0, 1)
    pub retirement_tax_rate: f64,
}

impl GrowthParameters {
    fn validate(&self) -> Result<()> {
        if !self.starting_balance.is_finite() || self.starting_balance < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "starting balance must be non-negative, got {}",
                self.starting_balance
            )));
        }
        if !self.annual_contribution.is_finite() || self.annual_contribution < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "annual contribution must be non-negative, got {}",
                self.annual_contribution
            )));
        }
        if !self.growth_rate.is_finite() || self.growth_rate <= -1.0 {
            return Err(EngineError::InvalidInput(format!(
                "growth rate must be greater than -100%, got {}",
                self.growth_rate
            )));
        }
        for (name, rate) in [
            ("current tax rate", self.current_tax_rate),
            ("retirement tax rate", self.retirement_tax_rate),
        ] {
            if !rate.is_finite() || !(0.0..1.0).contains(&rate) {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be in [0, 1), got {}",
                    name, rate
                )));
            }
        }
        Ok(())
    }
}

/// One projected year; all three balances so a chart never re-derives state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnualRow {
    /// Projection year, 1-indexed
    pub year: u32,
    /// Age at the end of the year
    pub age: u8,
    /// Tax-deferred balance, still pre-tax dollars
    pub pre_tax: f64,
    /// Tax-free balance
    pub post_tax: f64,
    /// Taxable-account balance, growth taxed annually
    pub taxable: f64,
}

/// Complete growth projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthResult {
    /// Tax rate applied to the deferred track at retirement
    pub retirement_tax_rate: f64,
    /// One row per projected year
    pub rows: Vec<AnnualRow>,
}

impl GrowthResult {
    /// After-tax value of each track at the horizon. Empty projections
    /// summarize to zero.
    pub fn summary(&self) -> GrowthSummary {
        let last = self.rows.last();
        GrowthSummary {
            years_projected: self.rows.len() as u32,
            pre_tax_after_tax: last
                .map(|r| r.pre_tax * (1.0 - self.retirement_tax_rate))
                .unwrap_or(0.0),
            post_tax_after_tax: last.map(|r| r.post_tax).unwrap_or(0.0),
            taxable_after_tax: last.map(|r| r.taxable).unwrap_or(0.0),
        }
    }
}

/// After-tax comparison values at retirement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrowthSummary {
    pub years_projected: u32,
    /// Deferred balance less retirement-rate tax
    pub pre_tax_after_tax: f64,
    /// Tax-free balance, no further tax due
    pub post_tax_after_tax: f64,
    /// Taxable balance, growth already taxed along the way
    pub taxable_after_tax: f64,
}

/// Project all three tracks from the current age to retirement.
///
/// Contributions are credited at the start of each year, growth applies to
/// the contributed balance. `current_age >= retirement_age` is a valid
/// degenerate input: the result has no rows and a zero summary.
pub fn project(params: &GrowthParameters) -> Result<GrowthResult> {
    params.validate()?;

    let mut result = GrowthResult {
        retirement_tax_rate: params.retirement_tax_rate,
        rows: Vec::new(),
    };

    if params.current_age >= params.retirement_age {
        return Ok(result);
    }

    let keep = 1.0 - params.current_tax_rate;
    let growth = params.growth_rate;

    let mut pre_tax = params.starting_balance;
    let mut post_tax = params.starting_balance * keep;
    let mut taxable = params.starting_balance * keep;
    let after_tax_contribution = params.annual_contribution * keep;

    let years = (params.retirement_age - params.current_age) as u32;
    for year in 1..=years {
        pre_tax = (pre_tax + params.annual_contribution) * (1.0 + growth);
        post_tax = (post_tax + after_tax_contribution) * (1.0 + growth);

        // Taxable account: this year's growth is taxed at the current rate
        let contributed = taxable + after_tax_contribution;
        taxable = contributed + contributed * growth * keep;

        result.rows.push(AnnualRow {
            year,
            age: params.current_age + year as u8,
            pre_tax,
            post_tax,
            taxable,
        });
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn base_params() -> GrowthParameters {
        GrowthParameters {
            current_age: 35,
            retirement_age: 65,
            starting_balance: 50_000.0,
            annual_contribution: 7000.0,
            growth_rate: 0.07,
            current_tax_rate: 0.24,
            retirement_tax_rate: 0.22,
        }
    }

    #[test]
    fn test_projects_one_row_per_year() {
        let result = project(&base_params()).unwrap();

        assert_eq!(result.rows.len(), 30);
        assert_eq!(result.rows[0].year, 1);
        assert_eq!(result.rows[0].age, 36);
        assert_eq!(result.rows.last().unwrap().age, 65);
        assert_eq!(result.summary().years_projected, 30);
    }

    #[test]
    fn test_single_year_hand_check() {
        let params = GrowthParameters {
            current_age: 64,
            retirement_age: 65,
            starting_balance: 10_000.0,
            annual_contribution: 6000.0,
            growth_rate: 0.05,
            current_tax_rate: 0.25,
            retirement_tax_rate: 0.20,
        };
        let result = project(&params).unwrap();
        let row = &result.rows[0];

        // Deferred: (10000 + 6000) * 1.05
        assert_relative_eq!(row.pre_tax, 16_800.0, max_relative = 1e-12);
        // Tax-free: (7500 + 4500) * 1.05
        assert_relative_eq!(row.post_tax, 12_600.0, max_relative = 1e-12);
        // Taxable: 12000 plus 600 growth taxed at 25%
        assert_relative_eq!(row.taxable, 12_450.0, max_relative = 1e-12);

        let summary = result.summary();
        assert_relative_eq!(summary.pre_tax_after_tax, 16_800.0 * 0.8, max_relative = 1e-12);
        assert_relative_eq!(summary.post_tax_after_tax, 12_600.0, max_relative = 1e-12);
    }

    #[test]
    fn test_equal_tax_rates_make_deferred_and_tax_free_equivalent() {
        let params = GrowthParameters {
            current_tax_rate: 0.22,
            retirement_tax_rate: 0.22,
            ..base_params()
        };
        let summary = project(&params).unwrap().summary();

        assert_relative_eq!(
            summary.pre_tax_after_tax,
            summary.post_tax_after_tax,
            max_relative = 1e-9
        );
    }

    #[test]
    fn test_annual_taxation_drags_the_taxable_track() {
        let result = project(&base_params()).unwrap();

        for row in &result.rows {
            assert!(
                row.taxable <= row.post_tax,
                "taxed growth cannot beat tax-free growth at year {}",
                row.year
            );
        }
        // Strict after the first year of growth
        assert!(result.rows.last().unwrap().taxable < result.rows.last().unwrap().post_tax);
    }

    #[test]
    fn test_zero_growth_degenerates_to_contribution_sums() {
        let params = GrowthParameters {
            current_age: 60,
            retirement_age: 65,
            starting_balance: 1000.0,
            annual_contribution: 500.0,
            growth_rate: 0.0,
            current_tax_rate: 0.0,
            retirement_tax_rate: 0.0,
        };
        let result = project(&params).unwrap();

        assert_eq!(result.rows.last().unwrap().pre_tax, 3500.0);
        assert_eq!(result.rows.last().unwrap().post_tax, 3500.0);
        assert_eq!(result.rows.last().unwrap().taxable, 3500.0);
    }

    #[test]
    fn test_already_retired_yields_empty_result() {
        for retirement_age in [65, 60] {
            let params = GrowthParameters {
                current_age: 65,
                retirement_age,
                ..base_params()
            };
            let result = project(&params).unwrap();

            assert!(result.rows.is_empty());
            let summary = result.summary();
            assert_eq!(summary.years_projected, 0);
            assert_eq!(summary.pre_tax_after_tax, 0.0);
            assert_eq!(summary.post_tax_after_tax, 0.0);
            assert_eq!(summary.taxable_after_tax, 0.0);
        }
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let bad_tax = GrowthParameters { current_tax_rate: 1.0, ..base_params() };
        assert!(matches!(project(&bad_tax), Err(EngineError::InvalidInput(_))));

        let bad_contribution = GrowthParameters {
            annual_contribution: -100.0,
            ..base_params()
        };
        assert!(project(&bad_contribution).is_err());

        let bad_growth = GrowthParameters { growth_rate: -1.5, ..base_params() };
        assert!(project(&bad_growth).is_err());
    }
}
