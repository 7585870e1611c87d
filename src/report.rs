//! CSV and JSON export of a projection result

use std::io::Write;

use serde::Serialize;

use crate::projection::{LoanSchedule, ProjectionResult};

/// Flat row of the yearly cashflow table
#[derive(Debug, Serialize)]
struct CashflowCsvRow {
    year: u32,
    usage: &'static str,
    maintenance_fee: f64,
    repair_reserve: f64,
    property_tax: f64,
    insurance: f64,
    repair_cost: f64,
    loan_payment: f64,
    deduction: f64,
    rental_income: f64,
    rent_saving: f64,
    net_cashflow: f64,
}

#[derive(Debug, Serialize)]
struct CumulativeCsvRow {
    point: String,
    cumulative_cashflow: f64,
}

#[derive(Debug, Serialize)]
struct LoanCsvRow {
    year: u32,
    payment: f64,
    principal: f64,
    interest: f64,
    balance: f64,
}

/// Write the yearly cashflow table
pub fn write_cashflow_csv<W: Write>(result: &ProjectionResult, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for year in &result.cashflow.years {
        wtr.serialize(CashflowCsvRow {
            year: year.year,
            usage: if year.is_residence() { "residence" } else { "rental" },
            maintenance_fee: year.maintenance_fee,
            repair_reserve: year.repair_reserve,
            property_tax: year.property_tax,
            insurance: year.insurance,
            repair_cost: year.repair_cost,
            loan_payment: year.loan_payment,
            deduction: year.deduction,
            rental_income: year.rental_income(),
            rent_saving: year.rent_saving(),
            net_cashflow: year.net_cashflow,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the cumulative trajectory: purchase, each year, after sale
pub fn write_cumulative_csv<W: Write>(result: &ProjectionResult, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let path = &result.summary.cumulative_cashflows;

    for (i, &cumulative) in path.iter().enumerate() {
        wtr.serialize(CumulativeCsvRow {
            point: cumulative_label(i, path.len()),
            cumulative_cashflow: cumulative,
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write the loan schedule with principal/interest split
pub fn write_loan_csv<W: Write>(schedule: &LoanSchedule, writer: W) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    for year in 1..=schedule.term_years {
        wtr.serialize(LoanCsvRow {
            year,
            payment: schedule.payment_for_year(year),
            principal: schedule.annual_principal(year),
            interest: schedule.annual_interest(year),
            balance: schedule.balance_at(year).unwrap_or(0.0),
        })?;
    }

    wtr.flush()?;
    Ok(())
}

/// Pretty JSON of the whole result
pub fn to_json(result: &ProjectionResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Label for a point of the cumulative trajectory
pub fn cumulative_label(index: usize, len: usize) -> String {
    if index == 0 {
        "purchase".to_string()
    } else if index + 1 == len {
        "after sale".to_string()
    } else {
        format!("year {index}")
    }
}
