//! Amortization schedule output structures

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// A single row of amortization output for one period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Period index, 1-indexed
    pub period: u32,
    /// Cash actually paid this period (interest + principal)
    pub payment: f64,
    /// Interest accrued on the beginning balance
    pub interest: f64,
    /// Principal retired, extras included; clamped on the final period
    pub principal: f64,
    /// Portion of the principal attributable to the extra-payment policy
    /// (after final-period clamping)
    pub extra: f64,
    pub ending_balance: f64,
    pub cumulative_interest: f64,
    pub cumulative_principal: f64,
}

/// Complete amortization result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    /// Balance the schedule started from
    pub starting_balance: f64,
    /// Scheduled payment before extras
    pub base_payment: f64,
    /// Origination date; payment k lands k periods later
    pub start_date: Option<NaiveDate>,
    /// Payments per year (12 for monthly)
    pub periods_per_year: u32,
    /// Periodic rows
    pub rows: Vec<PeriodRow>,
}

impl AmortizationResult {
    pub fn new(
        starting_balance: f64,
        base_payment: f64,
        start_date: Option<NaiveDate>,
        periods_per_year: u32,
    ) -> Self {
        Self {
            starting_balance,
            base_payment,
            start_date,
            periods_per_year,
            rows: Vec::new(),
        }
    }

    /// Add a period row
    pub fn add_row(&mut self, row: PeriodRow) {
        self.rows.push(row);
    }

    /// Get summary statistics
    pub fn summary(&self) -> LoanSummary {
        let periods_to_payoff = self.rows.len() as u32;
        let total_interest = self.rows.last().map(|r| r.cumulative_interest).unwrap_or(0.0);
        let total_principal = self.rows.last().map(|r| r.cumulative_principal).unwrap_or(0.0);
        let final_payment = self.rows.last().map(|r| r.payment).unwrap_or(0.0);

        LoanSummary {
            periods_to_payoff,
            total_interest,
            total_principal,
            total_paid: total_interest + total_principal,
            final_payment,
            payoff_date: self.payoff_date(periods_to_payoff),
        }
    }

    /// Calendar date of the final payment, when a start date was given and
    /// the cadence maps onto whole months
    fn payoff_date(&self, periods: u32) -> Option<NaiveDate> {
        let start = self.start_date?;
        if self.periods_per_year == 0 || 12 % self.periods_per_year != 0 {
            return None;
        }
        let months_per_period = 12 / self.periods_per_year;
        start.checked_add_months(Months::new(periods * months_per_period))
    }
}

/// Summary statistics for an amortization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    pub periods_to_payoff: u32,
    pub total_interest: f64,
    pub total_principal: f64,
    pub total_paid: f64,
    pub final_payment: f64,
    pub payoff_date: Option<NaiveDate>,
}
