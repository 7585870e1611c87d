//! Total profit and break-even detection

use log::debug;
use serde::{Deserialize, Serialize};

use super::cashflows::CashflowProjection;
use super::irr::{calculate_irr, investment_stream};
use super::sale::SaleResult;

/// Whole-investment outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResult {
    /// -initial cost + holding cashflows + sale proceeds
    pub total_profit: f64,

    /// Sum of every holding year's net cashflow
    pub total_holding_cashflow: f64,

    /// Cumulative position at purchase, after each holding year, and after the
    /// sale (length = holding years + 2)
    pub cumulative_cashflows: Vec<f64>,

    /// Cumulative position after the sale
    pub final_cumulative: f64,

    /// First 1-indexed year with a non-negative cumulative position.
    ///
    /// A crossing caused only by the sale proceeds is reported as the last
    /// holding year.
    pub break_even_year: Option<u32>,

    /// Annual IRR of the investment stream, when one exists
    pub irr: Option<f64>,
}

impl SummaryResult {
    pub fn calculate(
        total_initial_cost: f64,
        cashflow: &CashflowProjection,
        sale: &SaleResult,
    ) -> Self {
        let net_cashflows = cashflow.net_cashflows();
        let total_holding_cashflow: f64 = net_cashflows.iter().sum();

        let cumulative_cashflows = cumulative_path(total_initial_cost, &net_cashflows, sale.sale_proceeds);
        let final_cumulative = cumulative_cashflows
            .last()
            .copied()
            .unwrap_or(-total_initial_cost);
        let break_even_year = break_even_year(total_initial_cost, &net_cashflows, sale.sale_proceeds);

        let irr = calculate_irr(&investment_stream(
            total_initial_cost,
            &net_cashflows,
            sale.sale_proceeds,
        ));

        let total_profit = -total_initial_cost + total_holding_cashflow + sale.sale_proceeds;

        debug!(
            "summary: profit={:.0} holding cf={:.0} break-even={:?} irr={:?}",
            total_profit, total_holding_cashflow, break_even_year, irr
        );

        Self {
            total_profit,
            total_holding_cashflow,
            cumulative_cashflows,
            final_cumulative,
            break_even_year,
            irr,
        }
    }
}

/// Running position starting from `-initial_cost`, one point per year plus a
/// final post-sale point
pub fn cumulative_path(initial_cost: f64, net_cashflows: &[f64], sale_proceeds: f64) -> Vec<f64> {
    let mut path = Vec::with_capacity(net_cashflows.len() + 2);
    let mut cumulative = -initial_cost;
    path.push(cumulative);

    for cf in net_cashflows {
        cumulative += cf;
        path.push(cumulative);
    }

    path.push(cumulative + sale_proceeds);
    path
}

/// First year whose cumulative position is non-negative.
///
/// If no holding year gets there but the sale does, the last holding year is
/// returned.
pub fn break_even_year(initial_cost: f64, net_cashflows: &[f64], sale_proceeds: f64) -> Option<u32> {
    let mut cumulative = -initial_cost;

    for (i, cf) in net_cashflows.iter().enumerate() {
        cumulative += cf;
        if cumulative >= 0.0 {
            return Some(i as u32 + 1);
        }
    }

    if cumulative + sale_proceeds >= 0.0 {
        Some(net_cashflows.len() as u32)
    } else {
        None
    }
}
