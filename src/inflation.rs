//! Inflation adjustment over a CPI index series
//!
//! Conversions between periods are plain index ratios; assumed-rate
//! projections are closed-form compounding. Nothing here iterates.

use crate::error::{EngineError, Result};
use crate::tables::{CpiPeriod, CpiTable};

/// Inflation adjuster over an injected CPI table
#[derive(Debug, Clone)]
pub struct InflationAdjuster {
    cpi: CpiTable,
}

impl InflationAdjuster {
    /// Create an adjuster with the given CPI series
    pub fn new(cpi: CpiTable) -> Self {
        Self { cpi }
    }

    /// The underlying index series
    pub fn table(&self) -> &CpiTable {
        &self.cpi
    }

    /// Re-express an amount from one period's dollars in another's:
    /// amount * index(to) / index(from).
    pub fn convert(&self, amount: f64, from: CpiPeriod, to: CpiPeriod) -> Result<f64> {
        if !amount.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "amount must be finite, got {}",
                amount
            )));
        }

        let from_index = self.cpi.index(from)?;
        let to_index = self.cpi.index(to)?;
        Ok(amount * to_index / from_index)
    }

    /// Total price-level change between two periods (0.25 means prices rose 25%)
    pub fn total_change(&self, from: CpiPeriod, to: CpiPeriod) -> Result<f64> {
        let from_index = self.cpi.index(from)?;
        let to_index = self.cpi.index(to)?;
        Ok(to_index / from_index - 1.0)
    }

    /// Average annual inflation rate implied by two index points
    pub fn implied_annual_rate(&self, from: CpiPeriod, to: CpiPeriod) -> Result<f64> {
        let years = to.year - from.year;
        if years == 0 {
            return Err(EngineError::InvalidInput(
                "implied annual rate needs periods at least one year apart".to_string(),
            ));
        }

        let from_index = self.cpi.index(from)?;
        let to_index = self.cpi.index(to)?;
        Ok((to_index / from_index).powf(1.0 / years as f64) - 1.0)
    }

    /// Future value of an amount under an assumed constant annual rate
    pub fn project_forward(amount: f64, annual_rate: f64, years: u32) -> Result<f64> {
        Self::validate_assumed(amount, annual_rate)?;
        Ok(amount * (1.0 + annual_rate).powi(years as i32))
    }

    /// Present-day value of a future amount under an assumed constant annual
    /// rate; inverse of `project_forward`
    pub fn project_backward(amount: f64, annual_rate: f64, years: u32) -> Result<f64> {
        Self::validate_assumed(amount, annual_rate)?;
        Ok(amount / (1.0 + annual_rate).powi(years as i32))
    }

    fn validate_assumed(amount: f64, annual_rate: f64) -> Result<()> {
        if !amount.is_finite() {
            return Err(EngineError::InvalidInput(format!(
                "amount must be finite, got {}",
                amount
            )));
        }
        if !annual_rate.is_finite() || annual_rate <= -1.0 {
            return Err(EngineError::InvalidInput(format!(
                "annual rate must be greater than -100%, got {}",
                annual_rate
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::Month;

    fn fixture_adjuster() -> InflationAdjuster {
        InflationAdjuster::new(CpiTable::from_entries(vec![
            (CpiPeriod::annual(2015), 237.0),
            (CpiPeriod::monthly(2025, Month::August), 312.8),
        ]))
    }

    #[test]
    fn test_convert_between_periods() {
        let adjuster = fixture_adjuster();
        let value = adjuster
            .convert(
                100.0,
                CpiPeriod::annual(2015),
                CpiPeriod::monthly(2025, Month::August),
            )
            .unwrap();

        assert!(
            (value - 131.98).abs() < 0.01,
            "expected ~131.98, got {:.4}",
            value
        );
    }

    #[test]
    fn test_convert_round_trips() {
        let adjuster = fixture_adjuster();
        let from = CpiPeriod::annual(2015);
        let to = CpiPeriod::monthly(2025, Month::August);

        let there = adjuster.convert(250.0, from, to).unwrap();
        let back = adjuster.convert(there, to, from).unwrap();
        assert_relative_eq!(back, 250.0, max_relative = 1e-12);
    }

    #[test]
    fn test_missing_period_fails_with_the_period() {
        let adjuster = fixture_adjuster();
        let result = adjuster.convert(100.0, CpiPeriod::annual(2015), CpiPeriod::annual(1971));
        assert_eq!(
            result,
            Err(EngineError::IndexUnavailable { year: 1971, month: None })
        );
    }

    #[test]
    fn test_total_change() {
        let adjuster = InflationAdjuster::new(CpiTable::cpi_u_annual());
        let change = adjuster
            .total_change(CpiPeriod::annual(2000), CpiPeriod::annual(2024))
            .unwrap();

        assert_relative_eq!(change, 313.689 / 172.2 - 1.0, max_relative = 1e-12);
        assert!(change > 0.8 && change < 0.85);
    }

    #[test]
    fn test_implied_annual_rate() {
        let adjuster = fixture_adjuster();
        let rate = adjuster
            .implied_annual_rate(
                CpiPeriod::annual(2015),
                CpiPeriod::monthly(2025, Month::August),
            )
            .unwrap();

        // (312.8/237.0)^(1/10) - 1
        assert!((rate - 0.0281).abs() < 1e-3, "expected ~2.81%, got {}", rate);

        // Same calendar year has no annualization
        let same_year = adjuster.implied_annual_rate(
            CpiPeriod::annual(2015),
            CpiPeriod::annual(2015),
        );
        assert!(matches!(same_year, Err(EngineError::InvalidInput(_))));
    }

    #[test]
    fn test_assumed_rate_projection() {
        let future = InflationAdjuster::project_forward(100.0, 0.03, 10).unwrap();
        assert!((future - 134.39).abs() < 0.01, "expected ~134.39, got {}", future);

        let back = InflationAdjuster::project_backward(future, 0.03, 10).unwrap();
        assert_relative_eq!(back, 100.0, max_relative = 1e-12);

        // Zero years changes nothing
        assert_eq!(InflationAdjuster::project_forward(100.0, 0.03, 0).unwrap(), 100.0);

        // Deflation is a valid assumption; -100% and below are not
        assert!(InflationAdjuster::project_forward(100.0, -0.02, 5).is_ok());
        assert!(InflationAdjuster::project_forward(100.0, -1.0, 5).is_err());
        assert!(InflationAdjuster::project_forward(f64::NAN, 0.03, 5).is_err());
    }
}
