//! Fincalc Engine - Period-stepped projection engine for personal finance calculators
//!
//! This library provides:
//! - Closed-form level payment and remaining-term solutions
//! - Loan amortization with extra-payment acceleration policies
//! - Retirement savings growth across pre-tax, post-tax, and taxable tracks
//! - Required minimum distribution scheduling and depletion projections
//! - Historical and assumed-rate inflation adjustment

pub mod amortization;
pub mod calculators;
pub mod error;
pub mod growth;
pub mod inflation;
pub mod payment;
pub mod rmd;
pub mod tables;

// Re-export commonly used types
pub use amortization::{simulate, AmortizationResult, ExtraPaymentPolicy, LoanParameters};
pub use calculators::CalculatorSuite;
pub use error::{EngineError, Result};
pub use growth::{project, GrowthParameters, GrowthResult};
pub use inflation::InflationAdjuster;
pub use rmd::{RmdParameters, RmdScheduler, RmdStatus};
pub use tables::{CpiPeriod, ReferenceTables};
