//! Consumer Price Index reference table
//!
//! Stores CPI-U index values keyed by year plus either a calendar month or
//! the published annual-average row. Conversions between dollar amounts in
//! different periods are plain index ratios; see `InflationAdjuster`.

use std::collections::BTreeMap;
use std::fmt;

use chrono::Month;

use crate::error::{EngineError, Result};

/// A point in the CPI series: a year plus either a specific month or the
/// annual average (`month: None`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpiPeriod {
    pub year: i32,
    pub month: Option<Month>,
}

impl CpiPeriod {
    /// Annual-average row for a year
    pub fn annual(year: i32) -> Self {
        Self { year, month: None }
    }

    /// Specific month within a year
    pub fn monthly(year: i32, month: Month) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    /// Map key: month number 1-12, with 0 for the annual average
    fn slot(&self) -> (i32, u8) {
        let m = self.month.map(|m| m.number_from_month() as u8).unwrap_or(0);
        (self.year, m)
    }
}

impl fmt::Display for CpiPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{} {}", m.name(), self.year),
            None => write!(f, "{} annual average", self.year),
        }
    }
}

/// CPI index series
#[derive(Debug, Clone)]
pub struct CpiTable {
    /// (year, month slot) -> index value; slot 0 is the annual average
    entries: BTreeMap<(i32, u8), f64>,
}

impl Default for CpiTable {
    fn default() -> Self {
        Self::cpi_u_annual()
    }
}

impl CpiTable {
    /// CPI-U, U.S. city average, annual averages 1990-2024 (BLS, 1982-84=100).
    /// Monthly rows come from host data; see the CSV loader.
    pub fn cpi_u_annual() -> Self {
        let series = [
            (1990, 130.7),
            (1991, 136.2),
            (1992, 140.3),
            (1993, 144.5),
            (1994, 148.2),
            (1995, 152.4),
            (1996, 156.9),
            (1997, 160.5),
            (1998, 163.0),
            (1999, 166.6),
            (2000, 172.2),
            (2001, 177.1),
            (2002, 179.9),
            (2003, 184.0),
            (2004, 188.9),
            (2005, 195.3),
            (2006, 201.6),
            (2007, 207.342),
            (2008, 215.303),
            (2009, 214.537),
            (2010, 218.056),
            (2011, 224.939),
            (2012, 229.594),
            (2013, 232.957),
            (2014, 236.736),
            (2015, 237.017),
            (2016, 240.007),
            (2017, 245.120),
            (2018, 251.107),
            (2019, 255.657),
            (2020, 258.811),
            (2021, 270.970),
            (2022, 292.655),
            (2023, 304.702),
            (2024, 313.689),
        ];

        Self::from_entries(
            series
                .iter()
                .map(|&(year, index)| (CpiPeriod::annual(year), index))
                .collect(),
        )
    }

    /// Build a table from (period, index) pairs. Later duplicates win.
    pub fn from_entries(entries: Vec<(CpiPeriod, f64)>) -> Self {
        let mut map = BTreeMap::new();
        for (period, index) in entries {
            map.insert(period.slot(), index);
        }
        Self { entries: map }
    }

    /// Index value for a period
    pub fn index(&self, period: CpiPeriod) -> Result<f64> {
        self.entries
            .get(&period.slot())
            .copied()
            .ok_or(EngineError::IndexUnavailable {
                year: period.year,
                month: period.month,
            })
    }

    /// Earliest and latest year with any entry
    pub fn year_range(&self) -> Option<(i32, i32)> {
        let first = self.entries.keys().next()?.0;
        let last = self.entries.keys().next_back()?.0;
        Some((first, last))
    }

    /// Number of entries in the series
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
