//! Error types shared by all calculation engines
//!
//! Every engine entry point returns `Result<_, EngineError>`. Domain failures
//! are reported through these variants; the engines never panic on bad input
//! and never substitute a default value for a failed lookup.

use thiserror::Error;

/// Calculation engine error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Input failed validation before any stepping began.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Payment does not cover the interest accruing each period, so the
    /// balance can never reach zero.
    #[error(
        "payment {payment:.2} does not cover interest of {:.2} accruing on balance {balance:.2}",
        .balance * .period_rate
    )]
    PaymentInsufficient {
        payment: f64,
        balance: f64,
        period_rate: f64,
    },

    /// The simulation hit its period cap before reaching a terminal state.
    #[error("no payoff within {max_periods} periods")]
    HorizonExceeded { max_periods: u32 },

    /// No life-table divisor for the requested age (or owner/spouse pair).
    #[error("no life-table divisor for age {age}{}", match .spouse_age { Some(s) => format!(" with spouse age {}", s), None => String::new() })]
    TableLookupFailed { age: u8, spouse_age: Option<u8> },

    /// No CPI index value for the requested year and month.
    #[error("no CPI index for {year} {}", match .month { Some(m) => m.name(), None => "annual average" })]
    IndexUnavailable {
        year: i32,
        month: Option<chrono::Month>,
    },
}

/// Convenience alias used throughout the engines.
pub type Result<T> = std::result::Result<T, EngineError>;
