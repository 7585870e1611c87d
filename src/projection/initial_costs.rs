//! Up-front cost totals

use serde::{Deserialize, Serialize};

use crate::inputs::InputSet;

/// Totals of the costs paid around the purchase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InitialCosts {
    pub purchase_price: f64,

    /// Earnest money + brokerage fee + other contract fees
    pub total_contract_fee: f64,

    /// Down payment + registration + stamp duty + other settlement fees
    pub total_settlement_fee: f64,

    pub total_later_fee: f64,

    /// Own funds put into the purchase price (loan purchases only)
    pub self_funded: Option<f64>,

    /// Cash out of pocket at purchase; the baseline of the cumulative cashflow
    pub total_initial_cost: f64,
}

impl InitialCosts {
    /// For loan purchases the self-funded part of the price (price - loan)
    /// replaces the down payment in the grand total.
    pub fn calculate(inputs: &InputSet) -> Self {
        let items = &inputs.initial_costs;

        let total_contract_fee = items.earnest_money + items.brokerage_fee + items.other_contract_fee;
        let total_settlement_fee = items.down_payment
            + items.registration_fee
            + items.stamp_duty
            + items.other_settlement_fee;
        let total_later_fee = items.other_later_fee;

        let (self_funded, total_initial_cost) = if inputs.is_loan_purchase() {
            let self_funded = inputs.purchase_price - inputs.loan.amount;
            let total = total_contract_fee
                + self_funded
                + items.registration_fee
                + items.stamp_duty
                + items.other_settlement_fee
                + total_later_fee;
            (Some(self_funded), total)
        } else {
            (None, total_contract_fee + total_settlement_fee + total_later_fee)
        };

        Self {
            purchase_price: inputs.purchase_price,
            total_contract_fee,
            total_settlement_fee,
            total_later_fee,
            self_funded,
            total_initial_cost,
        }
    }
}
