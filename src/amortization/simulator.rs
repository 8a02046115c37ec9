//! Period-stepping amortization simulator
//!
//! One loop serves every payoff calculator: each period accrues interest on
//! the current balance, applies the base payment plus any policy extras, and
//! retires the remainder as principal. Reaching the period cap is a
//! reportable error, never a silent truncation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::policy::ExtraPaymentPolicy;
use super::schedule::{AmortizationResult, PeriodRow};
use crate::error::{EngineError, Result};

/// Balances at or below one cent count as paid off
pub const CURRENCY_EPSILON: f64 = 0.01;

/// Default step cap: 100 years of monthly payments
pub const DEFAULT_MAX_PERIODS: u32 = 1200;

/// Inputs for an amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Starting balance
    pub principal: f64,
    /// Interest rate per period
    pub period_rate: f64,
    /// Scheduled payment before extras
    pub base_payment: f64,
    /// Extra principal policy
    pub policy: ExtraPaymentPolicy,
    /// Payments per year (12 for monthly)
    pub periods_per_year: u32,
    /// Step cap; reaching it without payoff fails with `HorizonExceeded`
    pub max_periods: u32,
    /// Origination date; payment k lands k periods later
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    /// Monthly loan with no extras and the default step cap
    pub fn monthly(principal: f64, annual_rate: f64, base_payment: f64) -> Self {
        Self {
            principal,
            period_rate: annual_rate / 12.0,
            base_payment,
            policy: ExtraPaymentPolicy::None,
            periods_per_year: 12,
            max_periods: DEFAULT_MAX_PERIODS,
            start_date: None,
        }
    }

    pub fn with_policy(mut self, policy: ExtraPaymentPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_start_date(mut self, start_date: NaiveDate) -> Self {
        self.start_date = Some(start_date);
        self
    }

    pub fn with_max_periods(mut self, max_periods: u32) -> Self {
        self.max_periods = max_periods;
        self
    }

    fn validate(&self) -> Result<()> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "principal must be positive, got {}",
                self.principal
            )));
        }
        if !self.period_rate.is_finite() || self.period_rate < 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "period rate must be non-negative, got {}",
                self.period_rate
            )));
        }
        if !self.base_payment.is_finite() || self.base_payment <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "base payment must be positive, got {}",
                self.base_payment
            )));
        }
        if self.periods_per_year == 0 {
            return Err(EngineError::InvalidInput(
                "periods per year must be at least 1".to_string(),
            ));
        }
        if self.max_periods == 0 {
            return Err(EngineError::InvalidInput(
                "max periods must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Run the amortization loop to payoff.
///
/// Terminal states: the balance drops to one cent or less (success), or the
/// period cap is reached first (`HorizonExceeded`). A period whose total
/// payment fails to cover its own interest fails with `PaymentInsufficient`
/// instead of emitting a growing-balance row.
pub fn simulate(params: &LoanParameters) -> Result<AmortizationResult> {
    params.validate()?;
    params.policy.validate()?;

    let mut result = AmortizationResult::new(
        params.principal,
        params.base_payment,
        params.start_date,
        params.periods_per_year,
    );

    let mut balance = params.principal;
    let mut cumulative_interest = 0.0;
    let mut cumulative_principal = 0.0;

    for period in 1..=params.max_periods {
        let interest = balance * params.period_rate;
        let extra = params.policy.amount_for(period, params.periods_per_year);
        let available = params.base_payment + extra - interest;

        if available <= 0.0 {
            return Err(EngineError::PaymentInsufficient {
                payment: params.base_payment + extra,
                balance,
                period_rate: params.period_rate,
            });
        }

        // Final period: retire the remaining balance, never overshoot
        let principal_paid = available.min(balance);
        balance -= principal_paid;
        cumulative_interest += interest;
        cumulative_principal += principal_paid;

        result.add_row(PeriodRow {
            period,
            payment: interest + principal_paid,
            interest,
            principal: principal_paid,
            extra: extra.min(principal_paid),
            ending_balance: balance,
            cumulative_interest,
            cumulative_principal,
        });

        if balance <= CURRENCY_EPSILON {
            return Ok(result);
        }
    }

    Err(EngineError::HorizonExceeded {
        max_periods: params.max_periods,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::{level_payment, remaining_periods};

    fn thirty_year_params() -> LoanParameters {
        let payment = level_payment(200_000.0, 0.06 / 12.0, 360).unwrap();
        LoanParameters::monthly(200_000.0, 0.06, payment)
    }

    #[test]
    fn test_standard_loan_pays_off_on_schedule() {
        let result = simulate(&thirty_year_params()).unwrap();
        let summary = result.summary();

        assert_eq!(summary.periods_to_payoff, 360);
        assert!(result.rows.last().unwrap().ending_balance <= CURRENCY_EPSILON);

        // Principal conservation within a cent
        assert!(
            (summary.total_principal - 200_000.0).abs() <= CURRENCY_EPSILON,
            "principal portions must sum to the balance, got {:.6}",
            summary.total_principal
        );
    }

    #[test]
    fn test_annuity_identity() {
        // Total interest simulated matches payment * n - principal from the
        // closed form, within a cent per period
        let params = thirty_year_params();
        let result = simulate(&params).unwrap();
        let summary = result.summary();

        let closed_form = params.base_payment * 360.0 - 200_000.0;
        assert!(
            (summary.total_interest - closed_form).abs() <= 360.0 * CURRENCY_EPSILON,
            "simulated {:.4} vs closed form {:.4}",
            summary.total_interest,
            closed_form
        );
    }

    #[test]
    fn test_zero_rate_is_exactly_linear() {
        let params = LoanParameters::monthly(12_000.0, 0.0, 1000.0);
        let result = simulate(&params).unwrap();

        assert_eq!(result.rows.len(), 12);
        for (i, row) in result.rows.iter().enumerate() {
            assert_eq!(row.interest, 0.0);
            assert_eq!(row.principal, 1000.0);
            assert_eq!(row.ending_balance, 12_000.0 - 1000.0 * (i as f64 + 1.0));
        }
        assert_eq!(result.summary().total_interest, 0.0);
    }

    #[test]
    fn test_monthly_extra_shortens_loan_and_saves_interest() {
        // 25-year loan with $500/month extra
        let payment = level_payment(230_000.0, 0.06 / 12.0, 300).unwrap();
        let baseline = simulate(&LoanParameters::monthly(230_000.0, 0.06, payment)).unwrap();
        let accelerated = simulate(
            &LoanParameters::monthly(230_000.0, 0.06, payment)
                .with_policy(ExtraPaymentPolicy::Monthly(500.0)),
        )
        .unwrap();

        let base = baseline.summary();
        let fast = accelerated.summary();

        assert!(
            fast.periods_to_payoff < base.periods_to_payoff,
            "extra payments must shorten the loan: {} vs {}",
            fast.periods_to_payoff,
            base.periods_to_payoff
        );
        assert!(
            fast.total_interest < base.total_interest,
            "extra payments must save interest: {:.2} vs {:.2}",
            fast.total_interest,
            base.total_interest
        );

        // Principal conservation holds under extras too
        assert!((fast.total_principal - 230_000.0).abs() <= CURRENCY_EPSILON);
    }

    #[test]
    fn test_every_policy_variant_accelerates() {
        let payment = level_payment(250_000.0, 0.05 / 12.0, 300).unwrap();
        let base = simulate(&LoanParameters::monthly(250_000.0, 0.05, payment))
            .unwrap()
            .summary();

        let policies = [
            ExtraPaymentPolicy::Monthly(200.0),
            ExtraPaymentPolicy::Annual(2400.0),
            ExtraPaymentPolicy::OneTime { amount: 10_000.0, at_period: 12 },
            ExtraPaymentPolicy::Composite(vec![
                ExtraPaymentPolicy::Monthly(100.0),
                ExtraPaymentPolicy::Annual(1200.0),
            ]),
        ];

        for policy in policies {
            let summary = simulate(
                &LoanParameters::monthly(250_000.0, 0.05, payment).with_policy(policy.clone()),
            )
            .unwrap()
            .summary();

            assert!(
                summary.periods_to_payoff <= base.periods_to_payoff,
                "{:?} must not lengthen the loan",
                policy
            );
            assert!(
                summary.total_interest < base.total_interest,
                "{:?} must save interest",
                policy
            );
        }
    }

    #[test]
    fn test_balances_never_increase() {
        let payment = level_payment(100_000.0, 0.07 / 12.0, 180).unwrap();
        let result = simulate(
            &LoanParameters::monthly(100_000.0, 0.07, payment).with_policy(
                ExtraPaymentPolicy::Composite(vec![
                    ExtraPaymentPolicy::Annual(5000.0),
                    ExtraPaymentPolicy::OneTime { amount: 20_000.0, at_period: 30 },
                ]),
            ),
        )
        .unwrap();

        let mut prev = 100_000.0;
        for row in &result.rows {
            assert!(
                row.ending_balance <= prev,
                "balance rose at period {}: {} -> {}",
                row.period,
                prev,
                row.ending_balance
            );
            assert!(row.ending_balance >= 0.0);
            assert!(row.principal >= 0.0);
            prev = row.ending_balance;
        }
    }

    #[test]
    fn test_final_period_clamps_instead_of_overshooting() {
        // Oversized one-time payment near the end; overage is simply unused
        let payment = level_payment(50_000.0, 0.06 / 12.0, 60).unwrap();
        let result = simulate(
            &LoanParameters::monthly(50_000.0, 0.06, payment).with_policy(
                ExtraPaymentPolicy::OneTime { amount: 1_000_000.0, at_period: 10 },
            ),
        )
        .unwrap();

        let last = result.rows.last().unwrap();
        assert_eq!(last.period, 10);
        assert_eq!(last.ending_balance, 0.0);
        // Payment on the clamped period covers interest plus what was owed,
        // not the full million
        assert!(last.payment < 60_000.0);
    }

    #[test]
    fn test_simulated_periods_match_closed_form() {
        let n = remaining_periods(10_000.0, 500.0, 0.004).unwrap();
        let result = simulate(&LoanParameters {
            principal: 10_000.0,
            period_rate: 0.004,
            base_payment: 500.0,
            policy: ExtraPaymentPolicy::None,
            periods_per_year: 12,
            max_periods: 100,
            start_date: None,
        })
        .unwrap();

        assert_eq!(result.rows.len() as u32, n.ceil() as u32);
    }

    #[test]
    fn test_insufficient_payment_fails_up_front() {
        // Interest accrues at exactly 1000/period
        let result = simulate(&LoanParameters::monthly(200_000.0, 0.06, 1000.0));
        assert!(matches!(
            result,
            Err(EngineError::PaymentInsufficient { balance, .. }) if balance == 200_000.0
        ));
    }

    #[test]
    fn test_insufficient_payment_fails_mid_run() {
        // A one-time lump carries period 1, but the base payment alone cannot
        // cover interest afterwards; the run fails rather than emitting a
        // growing balance
        let result = simulate(
            &LoanParameters::monthly(200_000.0, 0.06, 990.0).with_policy(
                ExtraPaymentPolicy::OneTime { amount: 1000.0, at_period: 1 },
            ),
        );
        assert!(matches!(result, Err(EngineError::PaymentInsufficient { .. })));
    }

    #[test]
    fn test_horizon_exceeded_is_reported() {
        // Payment barely above interest: payoff takes far longer than the cap
        let result = simulate(
            &LoanParameters::monthly(200_000.0, 0.06, 1001.0).with_max_periods(120),
        );
        assert!(matches!(
            result,
            Err(EngineError::HorizonExceeded { max_periods: 120 })
        ));
    }

    #[test]
    fn test_payoff_date_lands_on_final_payment() {
        let start = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let result = simulate(
            &LoanParameters::monthly(12_000.0, 0.0, 1000.0).with_start_date(start),
        )
        .unwrap();

        assert_eq!(
            result.summary().payoff_date,
            Some(NaiveDate::from_ymd_opt(2027, 3, 1).unwrap())
        );
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        assert!(simulate(&LoanParameters::monthly(-5.0, 0.06, 1000.0)).is_err());
        assert!(simulate(&LoanParameters::monthly(10_000.0, -0.06, 1000.0)).is_err());
        assert!(simulate(&LoanParameters::monthly(10_000.0, 0.06, 0.0)).is_err());
        assert!(
            simulate(&LoanParameters::monthly(10_000.0, 0.06, 500.0).with_max_periods(0)).is_err()
        );
    }
}
