//! Typed purchase scenario consumed by the projection engines

use serde::{Deserialize, Serialize};

/// How the property is paid for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PurchaseMethod {
    /// Paid in full from own funds
    #[default]
    Cash,
    /// Partly financed with a loan
    Loan,
}

impl PurchaseMethod {
    pub fn is_loan(&self) -> bool {
        matches!(self, PurchaseMethod::Loan)
    }
}

/// Loan repayment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RepaymentMethod {
    /// Level total payment every month
    #[default]
    EqualInstallment,
    /// Level principal every month, interest on the remaining balance
    EqualPrincipal,
}

/// How the sale price is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SalePriceMethod {
    /// Sale price given directly
    #[default]
    Direct,
    /// Purchase price compounded by an annual appreciation rate
    AppreciationRate,
}

/// One-off costs paid around the purchase
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InitialCostItems {
    // Paid at contract
    pub earnest_money: f64,
    pub brokerage_fee: f64,
    pub other_contract_fee: f64,

    // Paid at settlement
    pub down_payment: f64,
    pub registration_fee: f64,
    pub stamp_duty: f64,
    pub other_settlement_fee: f64,

    // Paid after settlement
    pub other_later_fee: f64,
}

/// Loan terms (only read for loan purchases)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub amount: f64,

    /// Annual interest rate in percent (1.5 = 1.5%)
    pub annual_rate_pct: f64,

    pub term_years: u32,

    pub repayment_method: RepaymentMethod,
}

impl Default for LoanTerms {
    fn default() -> Self {
        Self {
            amount: 0.0,
            annual_rate_pct: 0.0,
            term_years: DEFAULT_LOAN_YEARS,
            repayment_method: RepaymentMethod::EqualInstallment,
        }
    }
}

/// Holding period and the owner-occupied window inside it.
///
/// Years are 1-indexed and the residence window is inclusive on both ends.
/// A window lying outside `1..=holding_years` is legal and simply never matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoldingPlan {
    pub holding_years: u32,
    pub residence_start_year: i32,
    pub residence_end_year: i32,
}

impl HoldingPlan {
    /// Whether the owner lives in the property during `year`
    pub fn is_residence_year(&self, year: u32) -> bool {
        let year = year as i64;
        year >= self.residence_start_year as i64 && year <= self.residence_end_year as i64
    }
}

impl Default for HoldingPlan {
    fn default() -> Self {
        Self {
            holding_years: DEFAULT_HOLDING_YEARS,
            residence_start_year: DEFAULT_RESIDENCE_START_YEAR,
            residence_end_year: DEFAULT_RESIDENCE_END_YEAR,
        }
    }
}

/// Running costs, escalated yearly by `annual_increase_pct`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecurringCosts {
    pub monthly_maintenance_fee: f64,
    pub monthly_repair_reserve: f64,
    pub annual_property_tax: f64,
    pub annual_insurance: f64,
    pub annual_increase_pct: f64,
}

/// Single large repair charged once in `year`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepairEvent {
    /// 1-indexed holding year; values outside the holding period never fire
    pub year: i32,
    pub cost: f64,
}

/// Mortgage tax deduction credited as a flat amount per year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanDeduction {
    pub amount_per_year: f64,
    pub years: u32,
}

/// Rental terms applied in non-residence years
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentalTerms {
    pub monthly_rent: f64,
    pub vacancy_rate_pct: f64,
    pub management_fee_pct: f64,
    pub annual_increase_pct: f64,
}

/// Rent the owner avoids paying elsewhere while living in the property
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RentSaving {
    pub enabled: bool,
    pub monthly_amount: f64,
}

/// Sale assumptions at the end of the holding period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleTerms {
    pub method: SalePriceMethod,
    pub direct_price: f64,
    pub appreciation_rate_pct: f64,
    pub brokerage_rate_pct: f64,
    pub other_sale_cost: f64,
    pub sale_tax_cost: f64,
}

impl Default for SaleTerms {
    fn default() -> Self {
        Self {
            method: SalePriceMethod::Direct,
            direct_price: 0.0,
            appreciation_rate_pct: 0.0,
            brokerage_rate_pct: DEFAULT_SALE_BROKERAGE_RATE_PCT,
            other_sale_cost: 0.0,
            sale_tax_cost: 0.0,
        }
    }
}

pub const DEFAULT_LOAN_YEARS: u32 = 35;
pub const DEFAULT_HOLDING_YEARS: u32 = 10;
pub const DEFAULT_RESIDENCE_START_YEAR: i32 = 1;
pub const DEFAULT_RESIDENCE_END_YEAR: i32 = 3;
pub const DEFAULT_SALE_BROKERAGE_RATE_PCT: f64 = 3.0;

/// Year fields read from raw parameters are clamped to `±MAX_YEARS`
pub const MAX_YEARS: i32 = 100;

/// Complete, immutable description of one purchase scenario
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSet {
    pub purchase_method: PurchaseMethod,
    pub purchase_price: f64,
    pub initial_costs: InitialCostItems,
    pub loan: LoanTerms,
    pub plan: HoldingPlan,
    pub recurring: RecurringCosts,
    pub repair_event: RepairEvent,
    pub deduction: LoanDeduction,
    pub rental: RentalTerms,
    pub rent_saving: RentSaving,
    pub sale: SaleTerms,
}

impl InputSet {
    pub fn is_loan_purchase(&self) -> bool {
        self.purchase_method.is_loan()
    }

    pub fn holding_years(&self) -> u32 {
        self.plan.holding_years
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_defaults() {
        let inputs = InputSet::default();
        assert_eq!(inputs.purchase_method, PurchaseMethod::Cash);
        assert_eq!(inputs.loan.term_years, 35);
        assert_eq!(inputs.plan.holding_years, 10);
        assert_eq!(inputs.plan.residence_start_year, 1);
        assert_eq!(inputs.plan.residence_end_year, 3);
        assert_eq!(inputs.repair_event.year, 0);
        assert_eq!(inputs.sale.brokerage_rate_pct, 3.0);
    }

    #[test]
    fn test_residence_window_is_inclusive() {
        let plan = HoldingPlan {
            holding_years: 10,
            residence_start_year: 3,
            residence_end_year: 5,
        };
        assert!(!plan.is_residence_year(2));
        assert!(plan.is_residence_year(3));
        assert!(plan.is_residence_year(5));
        assert!(!plan.is_residence_year(6));
    }

    #[test]
    fn test_inverted_window_never_matches() {
        let plan = HoldingPlan {
            holding_years: 5,
            residence_start_year: 4,
            residence_end_year: 2,
        };
        assert!((1..=5).all(|y| !plan.is_residence_year(y)));
    }
}
