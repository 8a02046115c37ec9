//! Extra-payment policies layered on top of the scheduled loan payment

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Extra principal applied in addition to the base payment.
///
/// Policies are deterministic: for any period index the extra amount is a
/// pure function of the policy and the payment cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExtraPaymentPolicy {
    /// Base payment only
    None,
    /// Fixed extra amount every period
    Monthly(f64),
    /// Lump sum on each payment anniversary (periods are 1-indexed, so this
    /// lands on payments 12, 24, ... for a monthly loan)
    Annual(f64),
    /// Single lump at one specific period
    OneTime { amount: f64, at_period: u32 },
    /// Any combination of the above
    Composite(Vec<ExtraPaymentPolicy>),
}

impl Default for ExtraPaymentPolicy {
    fn default() -> Self {
        Self::None
    }
}

impl ExtraPaymentPolicy {
    /// Extra principal contributed at a given period
    pub fn amount_for(&self, period: u32, periods_per_year: u32) -> f64 {
        match self {
            Self::None => 0.0,
            Self::Monthly(amount) => *amount,
            Self::Annual(amount) => {
                if periods_per_year > 0 && period % periods_per_year == 0 {
                    *amount
                } else {
                    0.0
                }
            }
            Self::OneTime { amount, at_period } => {
                if period == *at_period {
                    *amount
                } else {
                    0.0
                }
            }
            Self::Composite(policies) => policies
                .iter()
                .map(|p| p.amount_for(period, periods_per_year))
                .sum(),
        }
    }

    /// Check amounts are finite and non-negative before simulation starts
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::None => Ok(()),
            Self::Monthly(amount) | Self::Annual(amount) => {
                if !amount.is_finite() || *amount < 0.0 {
                    return Err(EngineError::InvalidInput(format!(
                        "extra payment amount must be non-negative, got {}",
                        amount
                    )));
                }
                Ok(())
            }
            Self::OneTime { amount, at_period } => {
                if !amount.is_finite() || *amount < 0.0 {
                    return Err(EngineError::InvalidInput(format!(
                        "extra payment amount must be non-negative, got {}",
                        amount
                    )));
                }
                if *at_period == 0 {
                    return Err(EngineError::InvalidInput(
                        "one-time extra payment period must be at least 1".to_string(),
                    ));
                }
                Ok(())
            }
            Self::Composite(policies) => {
                for policy in policies {
                    policy.validate()?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_contributes_nothing() {
        let policy = ExtraPaymentPolicy::None;
        for period in 1..=24 {
            assert_eq!(policy.amount_for(period, 12), 0.0);
        }
    }

    #[test]
    fn test_monthly_contributes_every_period() {
        let policy = ExtraPaymentPolicy::Monthly(250.0);
        for period in 1..=24 {
            assert_eq!(policy.amount_for(period, 12), 250.0);
        }
    }

    #[test]
    fn test_annual_lands_on_anniversaries_only() {
        let policy = ExtraPaymentPolicy::Annual(3000.0);

        assert_eq!(policy.amount_for(1, 12), 0.0);
        assert_eq!(policy.amount_for(11, 12), 0.0);
        assert_eq!(policy.amount_for(12, 12), 3000.0);
        assert_eq!(policy.amount_for(13, 12), 0.0);
        assert_eq!(policy.amount_for(24, 12), 3000.0);

        // Quarterly cadence: anniversary every 4th payment
        assert_eq!(policy.amount_for(4, 4), 3000.0);
        assert_eq!(policy.amount_for(5, 4), 0.0);
    }

    #[test]
    fn test_one_time_lands_once() {
        let policy = ExtraPaymentPolicy::OneTime {
            amount: 10_000.0,
            at_period: 18,
        };

        assert_eq!(policy.amount_for(17, 12), 0.0);
        assert_eq!(policy.amount_for(18, 12), 10_000.0);
        assert_eq!(policy.amount_for(19, 12), 0.0);
    }

    #[test]
    fn test_composite_sums_components() {
        let policy = ExtraPaymentPolicy::Composite(vec![
            ExtraPaymentPolicy::Monthly(100.0),
            ExtraPaymentPolicy::Annual(1200.0),
            ExtraPaymentPolicy::OneTime {
                amount: 5000.0,
                at_period: 12,
            },
        ]);

        assert_eq!(policy.amount_for(1, 12), 100.0);
        assert_eq!(policy.amount_for(12, 12), 100.0 + 1200.0 + 5000.0);
        assert_eq!(policy.amount_for(24, 12), 100.0 + 1200.0);
    }

    #[test]
    fn test_validation_rejects_bad_amounts() {
        assert!(ExtraPaymentPolicy::Monthly(-1.0).validate().is_err());
        assert!(ExtraPaymentPolicy::Annual(f64::NAN).validate().is_err());
        assert!(ExtraPaymentPolicy::OneTime { amount: 100.0, at_period: 0 }
            .validate()
            .is_err());
        assert!(
            ExtraPaymentPolicy::Composite(vec![
                ExtraPaymentPolicy::Monthly(100.0),
                ExtraPaymentPolicy::Monthly(-5.0),
            ])
            .validate()
            .is_err()
        );

        assert!(ExtraPaymentPolicy::Monthly(0.0).validate().is_ok());
        assert!(ExtraPaymentPolicy::None.validate().is_ok());
    }
}
