//! Required minimum distribution lookup and projection

mod scheduler;

pub use scheduler::{
    RmdParameters, RmdProjection, RmdScheduler, RmdStatus, RmdSummary, RmdYearRow,
};
