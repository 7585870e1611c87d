//! Projection engines: loan schedule, holding cashflows, sale and summary

mod initial_costs;
mod amortization;
mod cashflows;
mod sale;
mod summary;
mod engine;
mod irr;

pub use initial_costs::InitialCosts;
pub use amortization::LoanSchedule;
pub use cashflows::{CashflowProjection, Occupancy, YearlyCashflow};
pub use sale::{brokerage_fee, SaleResult, BROKERAGE_CAP_FIXED, BROKERAGE_CAP_RATE};
pub use summary::{break_even_year, cumulative_path, SummaryResult};
pub use engine::{project, ProjectionEngine, ProjectionResult};
pub use irr::{calculate_irr, investment_stream};
