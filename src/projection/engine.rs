//! Full projection pipeline
//!
//! InputSet -> amortization -> cashflows -> sale -> summary. Every run
//! recomputes the whole result from the inputs; nothing is cached between runs.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::inputs::{InputSet, PurchaseMethod};
use super::amortization::LoanSchedule;
use super::cashflows::CashflowProjection;
use super::initial_costs::InitialCosts;
use super::sale::SaleResult;
use super::summary::SummaryResult;

/// Composed result of one projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub purchase_method: PurchaseMethod,
    pub initial_costs: InitialCosts,

    /// `None` for cash purchases
    pub loan: Option<LoanSchedule>,

    pub cashflow: CashflowProjection,
    pub sale: SaleResult,
    pub summary: SummaryResult,
}

impl ProjectionResult {
    pub fn holding_years(&self) -> u32 {
        self.cashflow.years.len() as u32
    }
}

/// Projection engine bound to one scenario
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    inputs: InputSet,
}

impl ProjectionEngine {
    pub fn new(inputs: InputSet) -> Self {
        Self { inputs }
    }

    pub fn inputs(&self) -> &InputSet {
        &self.inputs
    }

    /// Run the full pipeline
    pub fn project(&self) -> ProjectionResult {
        let inputs = &self.inputs;
        debug!(
            "projecting {:?} purchase of {:.0} over {} years",
            inputs.purchase_method,
            inputs.purchase_price,
            inputs.holding_years()
        );

        let initial_costs = InitialCosts::calculate(inputs);

        let loan = inputs
            .is_loan_purchase()
            .then(|| LoanSchedule::generate(&inputs.loan));

        let cashflow = CashflowProjection::project(inputs, loan.as_ref());
        let sale = SaleResult::calculate(inputs, loan.as_ref());
        let summary = SummaryResult::calculate(initial_costs.total_initial_cost, &cashflow, &sale);

        ProjectionResult {
            purchase_method: inputs.purchase_method,
            initial_costs,
            loan,
            cashflow,
            sale,
            summary,
        }
    }
}

/// Convenience wrapper for a one-off run
pub fn project(inputs: &InputSet) -> ProjectionResult {
    ProjectionEngine::new(inputs.clone()).project()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::{HoldingPlan, LoanTerms, RawInputs, RepaymentMethod, SalePriceMethod};
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use serde_json::json;

    fn cash_single_year() -> InputSet {
        let mut inputs = InputSet {
            purchase_price: 30_000_000.0,
            ..Default::default()
        };
        inputs.plan = HoldingPlan {
            holding_years: 1,
            residence_start_year: 1,
            residence_end_year: 1,
        };
        inputs.sale.direct_price = 30_000_000.0;
        inputs
    }

    fn mixed_loan_scenario() -> InputSet {
        let raw: RawInputs = [
            ("purchaseMethod", json!("loan")),
            ("purchasePrice", json!(40_000_000)),
            ("earnestMoney", json!(1_000_000)),
            ("brokerageFee", json!(1_386_000)),
            ("registrationFee", json!(400_000)),
            ("stampDuty", json!(30_000)),
            ("loanAmount", json!(35_000_000)),
            ("interestRate", json!(0.8)),
            ("loanYears", json!(35)),
            ("repaymentMethod", json!("equal")),
            ("holdingYears", json!(12)),
            ("residenceStartYear", json!(1)),
            ("residenceEndYear", json!(5)),
            ("monthlyMaintenanceFee", json!(15_000)),
            ("monthlyRepairReserve", json!(12_000)),
            ("annualPropertyTax", json!(150_000)),
            ("annualInsurance", json!(20_000)),
            ("costIncreaseRate", json!(1)),
            ("repairEventYear", json!(10)),
            ("repairEventCost", json!(1_500_000)),
            ("loanDeduction", json!(245_000)),
            ("deductionYears", json!(13)),
            ("monthlyRent", json!(180_000)),
            ("vacancyRate", json!(5)),
            ("rentalManagementRate", json!(5)),
            ("rentIncreaseRate", json!(0.5)),
            ("enableRentSaving", json!(true)),
            ("monthlyRentSaving", json!(150_000)),
            ("salePriceMethod", json!("rate")),
            ("priceIncreaseRate", json!(-1)),
            ("saleBrokerageRate", json!(3)),
            ("otherSaleCost", json!(200_000)),
        ]
        .into_iter()
        .collect();
        InputSet::from_raw(&raw)
    }

    #[test]
    fn test_cash_purchase_single_year() {
        let result = project(&cash_single_year());

        assert!(result.loan.is_none());
        assert_eq!(result.initial_costs.total_initial_cost, 0.0);
        assert_eq!(result.cashflow.years.len(), 1);
        assert_eq!(result.cashflow.years[0].net_cashflow, 0.0);
        assert_relative_eq!(result.sale.brokerage_fee, 900_000.0);
        assert_relative_eq!(result.sale.sale_proceeds, 29_100_000.0);
        assert_relative_eq!(result.summary.total_profit, 29_100_000.0);
        assert_eq!(result.summary.break_even_year, Some(1));
    }

    #[test]
    fn test_loan_zero_rate_schedule() {
        let mut inputs = cash_single_year();
        inputs.purchase_method = PurchaseMethod::Loan;
        inputs.plan.holding_years = 10;
        inputs.loan = LoanTerms {
            amount: 10_000_000.0,
            annual_rate_pct: 0.0,
            term_years: 10,
            repayment_method: RepaymentMethod::EqualInstallment,
        };

        let result = project(&inputs);
        let loan = result.loan.as_ref().unwrap();
        assert_relative_eq!(loan.monthly_payment, 83_333.333_333_333, max_relative = 1e-12);
        for year in &result.cashflow.years {
            assert_relative_eq!(year.loan_payment, 1_000_000.0, max_relative = 1e-12);
        }
        assert_abs_diff_eq!(loan.balances[9], 0.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.sale.loan_balance, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_mixed_usage_scenario_is_consistent() {
        let inputs = mixed_loan_scenario();
        let result = project(&inputs);

        assert_eq!(result.holding_years(), 12);
        assert_eq!(result.summary.cumulative_cashflows.len(), 14);

        let residence: Vec<bool> = result.cashflow.years.iter().map(|y| y.is_residence()).collect();
        assert_eq!(residence[..5], [true; 5]);
        assert_eq!(residence[5..], [false; 7]);

        assert_relative_eq!(
            result.initial_costs.total_initial_cost,
            1_000_000.0 + 1_386_000.0 + 5_000_000.0 + 400_000.0 + 30_000.0
        );
        assert_relative_eq!(
            result.sale.sale_price,
            40_000_000.0 * 0.99_f64.powi(12),
            max_relative = 1e-12
        );

        let loan = result.loan.as_ref().unwrap();
        assert_relative_eq!(result.sale.loan_balance, loan.balances[11]);

        assert_relative_eq!(
            result.summary.total_profit,
            -result.initial_costs.total_initial_cost
                + result.cashflow.total_net_cashflow()
                + result.sale.sale_proceeds,
            max_relative = 1e-12
        );
        assert_relative_eq!(result.summary.final_cumulative, result.summary.total_profit, max_relative = 1e-9);
    }

    #[test]
    fn test_projection_is_deterministic() {
        let inputs = mixed_loan_scenario();
        let first = project(&inputs);
        let second = ProjectionEngine::new(inputs).project();
        assert_eq!(first, second);
    }

    #[test]
    fn test_result_serializes() {
        let mut inputs = mixed_loan_scenario();
        inputs.sale.method = SalePriceMethod::Direct;
        let result = project(&inputs);
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["purchase_method"], "Loan");
        assert_eq!(json["cashflow"]["years"][0]["occupancy"]["usage"], "residence");
        assert_eq!(json["cashflow"]["years"][11]["occupancy"]["usage"], "rental");
    }

    #[test]
    fn test_zero_holding_years() {
        let mut inputs = cash_single_year();
        inputs.plan.holding_years = 0;
        inputs.initial_costs.earnest_money = 1_000_000.0;
        let result = project(&inputs);

        assert!(result.cashflow.years.is_empty());
        assert_eq!(result.summary.cumulative_cashflows.len(), 2);
        assert_eq!(result.summary.break_even_year, Some(0));
    }
}
