//! Real-estate purchase simulator - multi-year cashflow projection engine
//!
//! This library provides:
//! - Initial cost totals for cash and loan purchases
//! - Loan amortization (equal installment / equal principal)
//! - Year-by-year holding cashflows with residence and rental periods
//! - Sale proceeds with the statutory brokerage cap
//! - Total profit, break-even year and IRR
//! - Scenario sweeps and CSV/JSON reports

pub mod inputs;
pub mod projection;
pub mod scenario;
pub mod report;

// Re-export commonly used types
pub use inputs::{InputSet, RawInputs};
pub use projection::{project, ProjectionEngine, ProjectionResult, YearlyCashflow};
pub use scenario::ScenarioRunner;
