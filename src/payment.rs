//! Closed-form annuity payment and term solvers
//!
//! Level-payment loans follow M = P * r(1+r)^n / ((1+r)^n - 1). Everything
//! here is closed form; the simulation loop lives in `amortization`.

use crate::error::{EngineError, Result};

/// Calculate the level payment that amortizes a principal over a fixed term.
///
/// # Arguments
/// * `principal` - Amount borrowed
/// * `period_rate` - Interest rate per period (annual rate / periods per year)
/// * `periods` - Number of payments
///
/// # Returns
/// * Payment per period, unrounded
pub fn level_payment(principal: f64, period_rate: f64, periods: u32) -> Result<f64> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "principal must be positive, got {}",
            principal
        )));
    }
    if periods == 0 {
        return Err(EngineError::InvalidInput(
            "term must be at least one period".to_string(),
        ));
    }
    if !period_rate.is_finite() || period_rate < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "period rate must be non-negative, got {}",
            period_rate
        )));
    }

    // Zero rate takes the straight-line branch, not the general formula
    if period_rate == 0.0 {
        return Ok(principal / periods as f64);
    }

    let factor = (1.0 + period_rate).powi(periods as i32);
    Ok(principal * period_rate * factor / (factor - 1.0))
}

/// Solve for the number of periods needed to retire a balance with a given
/// payment: n = -ln(1 - B*r/M) / ln(1 + r).
///
/// Returns a fractional period count; callers round up when they need a
/// whole-period horizon. Fails with `PaymentInsufficient` when the payment
/// does not exceed the interest accruing per period.
pub fn remaining_periods(balance: f64, payment: f64, period_rate: f64) -> Result<f64> {
    if !balance.is_finite() || balance <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "balance must be positive, got {}",
            balance
        )));
    }
    if !payment.is_finite() || payment <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "payment must be positive, got {}",
            payment
        )));
    }
    if !period_rate.is_finite() || period_rate < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "period rate must be non-negative, got {}",
            period_rate
        )));
    }

    if period_rate == 0.0 {
        return Ok(balance / payment);
    }

    if payment <= balance * period_rate {
        return Err(EngineError::PaymentInsufficient {
            payment,
            balance,
            period_rate,
        });
    }

    Ok(-(1.0 - balance * period_rate / payment).ln() / (1.0 + period_rate).ln())
}

/// Present value of a level payment stream: the principal a given payment
/// retires over `periods` at `period_rate`. Inverse of `level_payment`.
pub fn principal_for_payment(payment: f64, period_rate: f64, periods: u32) -> Result<f64> {
    if !payment.is_finite() || payment <= 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "payment must be positive, got {}",
            payment
        )));
    }
    if periods == 0 {
        return Err(EngineError::InvalidInput(
            "term must be at least one period".to_string(),
        ));
    }
    if !period_rate.is_finite() || period_rate < 0.0 {
        return Err(EngineError::InvalidInput(format!(
            "period rate must be non-negative, got {}",
            period_rate
        )));
    }

    if period_rate == 0.0 {
        return Ok(payment * periods as f64);
    }

    let factor = (1.0 + period_rate).powi(periods as i32);
    Ok(payment * (factor - 1.0) / (period_rate * factor))
}
