//! Required minimum distribution scheduling
//!
//! Divisor lookups come from an injected life table; every miss is a typed
//! failure, never a clamped default. Projection runs a year at a time with
//! growth applied before the withdrawal.

use serde::{Deserialize, Serialize};

use crate::amortization::CURRENCY_EPSILON;
use crate::error::{EngineError, Result};
use crate::tables::LifeTable;

/// Distribution status for a single year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum RmdStatus {
    /// Below the mandated starting age; nothing is due
    NotYetRequired { first_rmd_age: u8 },
    /// Distribution due this year
    Required { divisor: f64, amount: f64 },
}

/// Inputs for a multi-year RMD projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdParameters {
    /// Account balance at the start age
    pub balance: f64,
    /// Owner age in the first projected year
    pub start_age: u8,
    /// Sole spouse beneficiary age in the first projected year, if any;
    /// ages advance in lockstep with the owner
    pub spouse_age: Option<u8>,
    /// Annual growth rate applied before each withdrawal
    pub growth_rate: f64,
}

impl RmdParameters {
    fn validate(&self) -> Result<()> {
        if !self.balance.is_finite() || self.balance < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "balance must be non-negative, got {}",
                self.balance
            )));
        }
        if !self.growth_rate.is_finite() || self.growth_rate <= -1.0 {
            return Err(EngineError::InvalidInput(format!(
                "growth rate must be greater than -100%, got {}",
                self.growth_rate
            )));
        }
        Ok(())
    }
}

/// One projected year of distributions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdYearRow {
    pub age: u8,
    /// Applicable divisor; None in years before the first RMD age
    pub divisor: Option<f64>,
    pub beginning_balance: f64,
    pub rmd: f64,
    pub ending_balance: f64,
}

/// Complete RMD projection result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdProjection {
    pub rows: Vec<RmdYearRow>,
}

impl RmdProjection {
    /// Get summary statistics
    pub fn summary(&self) -> RmdSummary {
        let last = self.rows.last();
        let final_balance = last.map(|r| r.ending_balance).unwrap_or(0.0);

        RmdSummary {
            years_projected: self.rows.len() as u32,
            total_withdrawn: self.rows.iter().map(|r| r.rmd).sum(),
            final_balance,
            depleted_at_age: last
                .filter(|r| r.ending_balance <= CURRENCY_EPSILON)
                .map(|r| r.age),
        }
    }
}

/// Summary statistics for an RMD projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RmdSummary {
    pub years_projected: u32,
    pub total_withdrawn: f64,
    pub final_balance: f64,
    /// Age at which the balance ran out, when it did
    pub depleted_at_age: Option<u8>,
}

/// RMD scheduler over an injected life table
#[derive(Debug, Clone)]
pub struct RmdScheduler {
    life: LifeTable,
}

impl RmdScheduler {
    /// Create a scheduler with the given life table
    pub fn new(life: LifeTable) -> Self {
        Self { life }
    }

    /// First age at which distributions are required
    pub fn first_rmd_age(&self) -> u8 {
        self.life.first_rmd_age()
    }

    /// Divisor for an owner. A sole spouse beneficiary more than ten years
    /// younger selects the joint-life divisor; otherwise the uniform table
    /// applies.
    ///
    /// # Arguments
    /// * `age` - Owner attained age
    /// * `spouse_age` - Sole spouse beneficiary age, if any
    ///
    /// # Returns
    /// * The applicable divisor, or `TableLookupFailed` outside the table
    pub fn divisor(&self, age: u8, spouse_age: Option<u8>) -> Result<f64> {
        match spouse_age {
            Some(spouse) if (age as i32 - spouse as i32) > 10 => {
                self.life.joint_divisor(age, spouse)
            }
            _ => self.life.divisor(age),
        }
    }

    /// Required distribution for the current year
    pub fn current_rmd(&self, balance: f64, age: u8, spouse_age: Option<u8>) -> Result<RmdStatus> {
        if !balance.is_finite() || balance < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "balance must be non-negative, got {}",
                balance
            )));
        }

        if age < self.life.first_rmd_age() {
            return Ok(RmdStatus::NotYetRequired {
                first_rmd_age: self.life.first_rmd_age(),
            });
        }

        let divisor = self.divisor(age, spouse_age)?;
        Ok(RmdStatus::Required {
            divisor,
            amount: balance / divisor,
        })
    }

    /// Project distributions year by year until the balance runs out or the
    /// table ends.
    ///
    /// Years before the first RMD age accrue growth with no withdrawal and
    /// appear as rows without a divisor. Each later year withdraws
    /// `beginning balance / divisor` after growth is applied, clamped at
    /// zero.
    pub fn project(&self, params: &RmdParameters) -> Result<RmdProjection> {
        params.validate()?;

        let first_age = self.life.first_rmd_age();
        let max_age = self.life.max_age();
        if params.start_age > max_age {
            return Err(EngineError::TableLookupFailed {
                age: params.start_age,
                spouse_age: None,
            });
        }

        let mut projection = RmdProjection { rows: Vec::new() };
        let mut balance = params.balance;

        for age in params.start_age..=max_age {
            if balance <= CURRENCY_EPSILON {
                break;
            }

            let beginning = balance;
            let (divisor, rmd) = if age < first_age {
                (None, 0.0)
            } else {
                let spouse_now = params
                    .spouse_age
                    .map(|s| s.saturating_add(age - params.start_age));
                let d = self.divisor(age, spouse_now)?;
                (Some(d), beginning / d)
            };

            balance = (balance * (1.0 + params.growth_rate) - rmd).max(0.0);

            projection.rows.push(RmdYearRow {
                age,
                divisor,
                beginning_balance: beginning,
                rmd,
                ending_balance: balance,
            });
        }

        Ok(projection)
    }
}
