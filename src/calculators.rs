//! Calculator facades over the projection engines
//!
//! Reference tables are built or loaded once, then each calculator call is a
//! cheap parameter mapping onto one of the engines. The payoff calculators
//! all reduce to the same (balance, rate, payment) triple fed into the
//! amortization simulator; they differ only in how the triple is derived.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::amortization::{
    simulate, AmortizationResult, ExtraPaymentPolicy, LoanParameters, LoanSummary,
};
use crate::error::{EngineError, Result};
use crate::growth::{self, GrowthParameters, GrowthResult};
use crate::inflation::InflationAdjuster;
use crate::payment::{level_payment, remaining_periods};
use crate::rmd::{RmdParameters, RmdProjection, RmdScheduler, RmdStatus};
use crate::tables::{CpiPeriod, ReferenceTables};

/// How a payoff run derives its base payment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PayoffMode {
    /// Remaining term is known; payment comes from the closed form
    KnownTerm { remaining_periods: u32 },
    /// Current payment is known; the horizon comes from the closed form
    KnownPayment { payment: f64 },
}

/// Mortgage payoff request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MortgagePayoffRequest {
    /// Current outstanding balance
    pub balance: f64,
    pub annual_rate: f64,
    pub mode: PayoffMode,
    pub policy: ExtraPaymentPolicy,
    pub start_date: Option<NaiveDate>,
}

/// Payoff schedule under the policy, against the no-extra baseline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffComparison {
    pub base_payment: f64,
    pub summary: LoanSummary,
    pub baseline: LoanSummary,
    pub periods_saved: u32,
    pub interest_saved: f64,
    pub schedule: AmortizationResult,
}

/// Plain payment calculator request (monthly cadence)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub start_date: Option<NaiveDate>,
}

/// Payment calculator output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPaymentReport {
    pub payment: f64,
    pub summary: LoanSummary,
    pub schedule: AmortizationResult,
}

/// Auto loan request: price decomposition on top of a standard loan
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanRequest {
    pub vehicle_price: f64,
    pub down_payment: f64,
    pub trade_in: f64,
    /// Sales tax applied to price net of trade-in
    pub sales_tax_rate: f64,
    /// Title, registration, and dealer fees rolled into the loan
    pub fees: f64,
    pub annual_rate: f64,
    pub term_months: u32,
    pub start_date: Option<NaiveDate>,
}

/// Auto loan output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoLoanReport {
    pub amount_financed: f64,
    pub sales_tax: f64,
    pub payment: f64,
    pub summary: LoanSummary,
    pub schedule: AmortizationResult,
}

/// Inflation calculator output, shared by both modes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InflationReport {
    pub original_amount: f64,
    pub adjusted_amount: f64,
    /// Total price-level change over the span
    pub total_change: f64,
    /// Annual rate: assumed, or implied by the index pair when it spans at
    /// least a year
    pub annual_rate: Option<f64>,
}

/// Pre-loaded calculator suite
///
/// # Example
/// ```ignore
/// let suite = CalculatorSuite::new();
/// let report = suite.loan_payment(&LoanRequest {
///     principal: 200_000.0,
///     annual_rate: 0.06,
///     term_months: 360,
///     start_date: None,
/// })?;
/// ```
#[derive(Debug, Clone)]
pub struct CalculatorSuite {
    tables: ReferenceTables,
}

impl CalculatorSuite {
    /// Create a suite with the built-in reference tables
    pub fn new() -> Self {
        Self {
            tables: ReferenceTables::builtin(),
        }
    }

    /// Create a suite by loading tables from CSV files
    pub fn from_csv_path(path: &std::path::Path) -> std::result::Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            tables: ReferenceTables::from_csv_path(path)?,
        })
    }

    /// Create a suite with pre-built tables
    pub fn with_tables(tables: ReferenceTables) -> Self {
        Self { tables }
    }

    /// Get reference to the loaded tables
    pub fn tables(&self) -> &ReferenceTables {
        &self.tables
    }

    /// Payment calculator: principal, rate, and term to a payment plus the
    /// full schedule
    pub fn loan_payment(&self, request: &LoanRequest) -> Result<LoanPaymentReport> {
        let payment = level_payment(
            request.principal,
            request.annual_rate / 12.0,
            request.term_months,
        )?;

        let mut params = LoanParameters::monthly(request.principal, request.annual_rate, payment)
            .with_max_periods(request.term_months.saturating_add(1));
        if let Some(date) = request.start_date {
            params = params.with_start_date(date);
        }

        let schedule = simulate(&params)?;
        Ok(LoanPaymentReport {
            payment,
            summary: schedule.summary(),
            schedule,
        })
    }

    /// Mortgage payoff calculator. Both modes derive the same
    /// (balance, rate, payment) triple and run one simulation, reported
    /// against the no-extra baseline.
    pub fn mortgage_payoff(&self, request: &MortgagePayoffRequest) -> Result<PayoffComparison> {
        let period_rate = request.annual_rate / 12.0;

        let (base_payment, horizon) = match request.mode {
            PayoffMode::KnownTerm { remaining_periods } => {
                let payment = level_payment(request.balance, period_rate, remaining_periods)?;
                (payment, remaining_periods)
            }
            PayoffMode::KnownPayment { payment } => {
                // Closed form both checks sufficiency and bounds the horizon
                let periods = remaining_periods(request.balance, payment, period_rate)?;
                (payment, periods.ceil() as u32)
            }
        };

        let mut params = LoanParameters::monthly(request.balance, request.annual_rate, base_payment)
            .with_max_periods(horizon.saturating_add(1));
        if let Some(date) = request.start_date {
            params = params.with_start_date(date);
        }

        let baseline = simulate(&params)?.summary();

        let schedule = simulate(&params.with_policy(request.policy.clone()))?;
        let summary = schedule.summary();

        Ok(PayoffComparison {
            base_payment,
            periods_saved: baseline.periods_to_payoff.saturating_sub(summary.periods_to_payoff),
            interest_saved: baseline.total_interest - summary.total_interest,
            baseline,
            summary,
            schedule,
        })
    }

    /// Auto loan calculator: derive the amount financed, then a standard
    /// payment calculation
    pub fn auto_loan(&self, request: &AutoLoanRequest) -> Result<AutoLoanReport> {
        if !request.vehicle_price.is_finite() || request.vehicle_price <= 0.0 {
            return Err(EngineError::InvalidInput(format!(
                "vehicle price must be positive, got {}",
                request.vehicle_price
            )));
        }
        for (name, value) in [
            ("down payment", request.down_payment),
            ("trade-in", request.trade_in),
            ("fees", request.fees),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(EngineError::InvalidInput(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }
        if !request.sales_tax_rate.is_finite() || !(0.0..1.0).contains(&request.sales_tax_rate) {
            return Err(EngineError::InvalidInput(format!(
                "sales tax rate must be in [0, 1), got {}",
                request.sales_tax_rate
            )));
        }

        // Tax applies to the price net of trade-in credit
        let taxable_base = (request.vehicle_price - request.trade_in).max(0.0);
        let sales_tax = taxable_base * request.sales_tax_rate;
        let amount_financed = request.vehicle_price - request.down_payment - request.trade_in
            + sales_tax
            + request.fees;

        if amount_financed <= 0.0 {
            return Err(EngineError::InvalidInput(
                "nothing to finance after down payment and trade-in".to_string(),
            ));
        }

        let payment = level_payment(
            amount_financed,
            request.annual_rate / 12.0,
            request.term_months,
        )?;

        let mut params = LoanParameters::monthly(amount_financed, request.annual_rate, payment)
            .with_max_periods(request.term_months.saturating_add(1));
        if let Some(date) = request.start_date {
            params = params.with_start_date(date);
        }

        let schedule = simulate(&params)?;
        Ok(AutoLoanReport {
            amount_financed,
            sales_tax,
            payment,
            summary: schedule.summary(),
            schedule,
        })
    }

    /// Savings growth comparison across tax treatments
    pub fn ira_comparison(&self, params: &GrowthParameters) -> Result<GrowthResult> {
        growth::project(params)
    }

    /// Required distribution for the current year
    pub fn current_rmd(&self, balance: f64, age: u8, spouse_age: Option<u8>) -> Result<RmdStatus> {
        RmdScheduler::new(self.tables.life.clone()).current_rmd(balance, age, spouse_age)
    }

    /// Multi-year required distribution projection
    pub fn rmd_projection(&self, params: &RmdParameters) -> Result<RmdProjection> {
        RmdScheduler::new(self.tables.life.clone()).project(params)
    }

    /// Historical inflation adjustment between two tabulated periods
    pub fn adjust_for_inflation(
        &self,
        amount: f64,
        from: CpiPeriod,
        to: CpiPeriod,
    ) -> Result<InflationReport> {
        let adjuster = InflationAdjuster::new(self.tables.cpi.clone());
        let adjusted_amount = adjuster.convert(amount, from, to)?;
        let total_change = adjuster.total_change(from, to)?;

        Ok(InflationReport {
            original_amount: amount,
            adjusted_amount,
            total_change,
            annual_rate: adjuster.implied_annual_rate(from, to).ok(),
        })
    }

    /// Assumed-rate inflation projection; `backward` deflates instead
    pub fn project_inflation(
        &self,
        amount: f64,
        annual_rate: f64,
        years: u32,
        backward: bool,
    ) -> Result<InflationReport> {
        let adjusted_amount = if backward {
            InflationAdjuster::project_backward(amount, annual_rate, years)?
        } else {
            InflationAdjuster::project_forward(amount, annual_rate, years)?
        };

        let growth_factor = (1.0 + annual_rate).powi(years as i32);
        let total_change = if backward {
            1.0 / growth_factor - 1.0
        } else {
            growth_factor - 1.0
        };

        Ok(InflationReport {
            original_amount: amount,
            adjusted_amount,
            total_change,
            annual_rate: Some(annual_rate),
        })
    }
}

impl Default for CalculatorSuite {
    fn default() -> Self {
        Self::new()
    }
}
