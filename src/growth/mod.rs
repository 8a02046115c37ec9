//! Retirement savings growth projection across tax treatments

mod projector;

pub use projector::{project, AnnualRow, GrowthParameters, GrowthResult, GrowthSummary};
