//! Purchase scenario inputs and the raw parameter boundary

mod data;
pub mod loader;

pub use data::{
    HoldingPlan, InitialCostItems, InputSet, LoanDeduction, LoanTerms, PurchaseMethod,
    RecurringCosts, RentSaving, RentalTerms, RepairEvent, RepaymentMethod, SalePriceMethod,
    SaleTerms, DEFAULT_HOLDING_YEARS, DEFAULT_LOAN_YEARS, DEFAULT_RESIDENCE_END_YEAR,
    DEFAULT_RESIDENCE_START_YEAR, DEFAULT_SALE_BROKERAGE_RATE_PCT, MAX_YEARS,
};
pub use loader::{load_raw_inputs, InputError, RawInputs, Result};
