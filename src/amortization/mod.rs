//! Loan amortization: extra-payment policies, the stepping simulator, and
//! schedule outputs

mod policy;
mod schedule;
mod simulator;

pub use policy::ExtraPaymentPolicy;
pub use schedule::{AmortizationResult, LoanSummary, PeriodRow};
pub use simulator::{simulate, LoanParameters, CURRENCY_EPSILON, DEFAULT_MAX_PERIODS};
