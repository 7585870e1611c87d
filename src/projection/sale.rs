//! Sale at the end of the holding period

use log::debug;
use serde::{Deserialize, Serialize};

use crate::inputs::{InputSet, SalePriceMethod};
use super::amortization::LoanSchedule;

/// Proportional part of the statutory brokerage cap
pub const BROKERAGE_CAP_RATE: f64 = 0.03;

/// Fixed part of the statutory brokerage cap
pub const BROKERAGE_CAP_FIXED: f64 = 60_000.0;

/// Outcome of selling the property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleResult {
    pub sale_price: f64,
    pub brokerage_fee: f64,
    pub other_sale_cost: f64,
    pub sale_tax_cost: f64,
    pub total_sale_costs: f64,

    /// Loan still owed at the sale, repaid from the price
    pub loan_balance: f64,

    /// Cash received after costs and loan payoff
    pub sale_proceeds: f64,
}

impl SaleResult {
    /// Sell at the end of `inputs.plan.holding_years`
    pub fn calculate(inputs: &InputSet, loan: Option<&LoanSchedule>) -> Self {
        let holding_years = inputs.holding_years();
        let terms = &inputs.sale;

        let sale_price = match terms.method {
            SalePriceMethod::Direct => terms.direct_price,
            SalePriceMethod::AppreciationRate => {
                inputs.purchase_price
                    * (1.0 + terms.appreciation_rate_pct / 100.0).powf(holding_years as f64)
            }
        };

        let brokerage_fee = brokerage_fee(sale_price, terms.brokerage_rate_pct);
        let total_sale_costs = brokerage_fee + terms.other_sale_cost + terms.sale_tax_cost;

        let loan_balance = match loan {
            Some(schedule) if inputs.is_loan_purchase() && holding_years <= schedule.term_years => {
                schedule.balance_at(holding_years).unwrap_or(0.0)
            }
            _ => 0.0,
        };

        let sale_proceeds = sale_price - total_sale_costs - loan_balance;

        debug!(
            "sale: price={:.0} costs={:.0} loan balance={:.0} proceeds={:.0}",
            sale_price, total_sale_costs, loan_balance, sale_proceeds
        );

        Self {
            sale_price,
            brokerage_fee,
            other_sale_cost: terms.other_sale_cost,
            sale_tax_cost: terms.sale_tax_cost,
            total_sale_costs,
            loan_balance,
            sale_proceeds,
        }
    }
}

/// Brokerage at the configured rate, never above `price * 3% + 60,000`
pub fn brokerage_fee(sale_price: f64, rate_pct: f64) -> f64 {
    let configured = sale_price * (rate_pct / 100.0);
    let cap = sale_price * BROKERAGE_CAP_RATE + BROKERAGE_CAP_FIXED;
    configured.min(cap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{LoanTerms, PurchaseMethod, RepaymentMethod};
    use approx::assert_relative_eq;

    fn direct_sale(price: f64) -> InputSet {
        let mut inputs = InputSet {
            purchase_price: price,
            ..Default::default()
        };
        inputs.sale.direct_price = price;
        inputs
    }

    #[test]
    fn test_direct_sale_cash() {
        let mut inputs = direct_sale(30_000_000.0);
        inputs.plan.holding_years = 1;
        let sale = SaleResult::calculate(&inputs, None);

        assert_eq!(sale.sale_price, 30_000_000.0);
        assert_relative_eq!(sale.brokerage_fee, 900_000.0);
        assert_eq!(sale.loan_balance, 0.0);
        assert_relative_eq!(sale.sale_proceeds, 29_100_000.0);
    }

    #[test]
    fn test_appreciation_sale_price() {
        let mut inputs = direct_sale(20_000_000.0);
        inputs.sale.method = SalePriceMethod::AppreciationRate;
        inputs.sale.appreciation_rate_pct = -1.0;
        inputs.plan.holding_years = 10;

        let sale = SaleResult::calculate(&inputs, None);
        assert_relative_eq!(sale.sale_price, 20_000_000.0 * 0.99_f64.powi(10), max_relative = 1e-12);
    }

    #[test]
    fn test_brokerage_fee_is_capped() {
        for rate in [0.0, 1.0, 3.0, 3.3, 5.0, 50.0] {
            for price in [0.0, 1_000_000.0, 30_000_000.0, 123_456_789.0] {
                let fee = brokerage_fee(price, rate);
                assert!(fee <= price * 0.03 + 60_000.0 + 1e-9);
            }
        }
        assert_relative_eq!(brokerage_fee(30_000_000.0, 5.0), 960_000.0);
        assert_relative_eq!(brokerage_fee(30_000_000.0, 2.0), 600_000.0);
    }

    #[test]
    fn test_sale_costs_and_loan_payoff() {
        let mut inputs = direct_sale(30_000_000.0);
        inputs.purchase_method = PurchaseMethod::Loan;
        inputs.plan.holding_years = 4;
        inputs.sale.other_sale_cost = 100_000.0;
        inputs.sale.sale_tax_cost = 500_000.0;
        inputs.loan = LoanTerms {
            amount: 10_000_000.0,
            annual_rate_pct: 0.0,
            term_years: 10,
            repayment_method: RepaymentMethod::EqualPrincipal,
        };
        let schedule = LoanSchedule::generate(&inputs.loan);

        let sale = SaleResult::calculate(&inputs, Some(&schedule));
        assert_relative_eq!(sale.total_sale_costs, 900_000.0 + 600_000.0);
        assert_relative_eq!(sale.loan_balance, 6_000_000.0, max_relative = 1e-12);
        assert_relative_eq!(sale.sale_proceeds, 30_000_000.0 - 1_500_000.0 - 6_000_000.0, max_relative = 1e-12);
    }

    #[test]
    fn test_holding_past_loan_term_owes_nothing() {
        let mut inputs = direct_sale(30_000_000.0);
        inputs.purchase_method = PurchaseMethod::Loan;
        inputs.plan.holding_years = 12;
        inputs.loan.amount = 10_000_000.0;
        inputs.loan.term_years = 10;
        let schedule = LoanSchedule::generate(&inputs.loan);

        assert_eq!(SaleResult::calculate(&inputs, Some(&schedule)).loan_balance, 0.0);
    }

    #[test]
    fn test_zero_holding_years_owes_full_loan() {
        let mut inputs = direct_sale(30_000_000.0);
        inputs.purchase_method = PurchaseMethod::Loan;
        inputs.plan.holding_years = 0;
        inputs.loan.amount = 10_000_000.0;
        let schedule = LoanSchedule::generate(&inputs.loan);

        assert_eq!(SaleResult::calculate(&inputs, Some(&schedule)).loan_balance, 10_000_000.0);
    }
}
