//! Year-by-year holding cashflows

use log::debug;
use serde::{Deserialize, Serialize};

use crate::inputs::InputSet;
use super::amortization::LoanSchedule;

/// How the property is used in a given year
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "usage", rename_all = "snake_case")]
pub enum Occupancy {
    /// Owner-occupied; may credit the rent the owner no longer pays elsewhere
    Residence { rent_saving: f64 },
    /// Let out; income after vacancy, before management fee
    Rental { gross_income: f64, management_fee: f64 },
}

/// One row of the holding-period cashflow table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyCashflow {
    /// Holding year (1-indexed)
    pub year: u32,

    pub occupancy: Occupancy,

    // Escalated running costs
    pub maintenance_fee: f64,
    pub repair_reserve: f64,
    pub property_tax: f64,
    pub insurance: f64,

    /// One-off repair charged this year
    pub repair_cost: f64,

    pub loan_payment: f64,

    /// Mortgage tax deduction credited this year
    pub deduction: f64,

    pub net_cashflow: f64,
}

impl YearlyCashflow {
    pub fn is_residence(&self) -> bool {
        matches!(self.occupancy, Occupancy::Residence { .. })
    }

    /// Rental income net of the management fee; zero in residence years
    pub fn rental_income(&self) -> f64 {
        match self.occupancy {
            Occupancy::Rental {
                gross_income,
                management_fee,
            } => gross_income - management_fee,
            Occupancy::Residence { .. } => 0.0,
        }
    }

    pub fn rent_saving(&self) -> f64 {
        match self.occupancy {
            Occupancy::Residence { rent_saving } => rent_saving,
            Occupancy::Rental { .. } => 0.0,
        }
    }

    /// Every outflow of the year, before income and deduction
    pub fn total_costs(&self) -> f64 {
        self.maintenance_fee
            + self.repair_reserve
            + self.property_tax
            + self.insurance
            + self.repair_cost
            + self.loan_payment
    }
}

/// Holding-period cashflows with running totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashflowProjection {
    pub years: Vec<YearlyCashflow>,

    /// Net rental income over all rental years
    pub total_rental_income: f64,

    /// Rent saving over all residence years
    pub total_rent_saving: f64,
}

impl CashflowProjection {
    /// Project every holding year.
    ///
    /// `loan` is `None` for cash purchases.
    pub fn project(inputs: &InputSet, loan: Option<&LoanSchedule>) -> Self {
        let holding_years = inputs.holding_years();
        let mut years = Vec::with_capacity(holding_years as usize);
        let mut total_rental_income = 0.0;
        let mut total_rent_saving = 0.0;

        for year in 1..=holding_years {
            let row = project_year(inputs, loan, year);
            total_rental_income += row.rental_income();
            total_rent_saving += row.rent_saving();
            years.push(row);
        }

        debug!(
            "cashflow: {} years, rental income {:.0}, rent saving {:.0}",
            years.len(),
            total_rental_income,
            total_rent_saving
        );

        Self {
            years,
            total_rental_income,
            total_rent_saving,
        }
    }

    pub fn total_net_cashflow(&self) -> f64 {
        self.years.iter().map(|y| y.net_cashflow).sum()
    }

    pub fn net_cashflows(&self) -> Vec<f64> {
        self.years.iter().map(|y| y.net_cashflow).collect()
    }
}

fn project_year(inputs: &InputSet, loan: Option<&LoanSchedule>, year: u32) -> YearlyCashflow {
    let costs = &inputs.recurring;
    let rental = &inputs.rental;

    let cost_multiplier = growth_factor(costs.annual_increase_pct, year as i64 - 1);
    let maintenance_fee = costs.monthly_maintenance_fee * 12.0 * cost_multiplier;
    let repair_reserve = costs.monthly_repair_reserve * 12.0 * cost_multiplier;
    let property_tax = costs.annual_property_tax * cost_multiplier;
    let insurance = costs.annual_insurance * cost_multiplier;

    let repair_cost = if year as i64 == inputs.repair_event.year as i64 {
        inputs.repair_event.cost
    } else {
        0.0
    };

    let loan_payment = match loan {
        Some(schedule) if inputs.is_loan_purchase() => schedule.payment_for_year(year),
        _ => 0.0,
    };

    let deduction = if year <= inputs.deduction.years {
        inputs.deduction.amount_per_year
    } else {
        0.0
    };

    let occupancy = if inputs.plan.is_residence_year(year) {
        let rent_saving = if inputs.rent_saving.enabled {
            inputs.rent_saving.monthly_amount * 12.0
        } else {
            0.0
        };
        Occupancy::Residence { rent_saving }
    } else {
        // Rent escalates from the year after the residence window ends, so
        // rental years before the window are discounted (negative exponent)
        let exponent = year as i64 - inputs.plan.residence_end_year as i64 - 1;
        let effective_rent = rental.monthly_rent * growth_factor(rental.annual_increase_pct, exponent);
        let gross_income = effective_rent * 12.0 * (1.0 - rental.vacancy_rate_pct / 100.0);
        let management_fee = gross_income * (rental.management_fee_pct / 100.0);
        Occupancy::Rental {
            gross_income,
            management_fee,
        }
    };

    let mut row = YearlyCashflow {
        year,
        occupancy,
        maintenance_fee,
        repair_reserve,
        property_tax,
        insurance,
        repair_cost,
        loan_payment,
        deduction,
        net_cashflow: 0.0,
    };
    row.net_cashflow = row.rental_income() + row.rent_saving() - row.total_costs() + row.deduction;
    row
}

/// `(1 + pct/100)^exponent`, exponent may be negative
fn growth_factor(pct: f64, exponent: i64) -> f64 {
    (1.0 + pct / 100.0).powf(exponent as f64)
}
