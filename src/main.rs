//! Real-estate purchase simulator CLI
//!
//! Loads a scenario from a JSON or CSV parameter file, applies `--set`
//! overrides and prints the projection.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use realestate_sim::inputs::{load_raw_inputs, InputSet, RawInputs};
use realestate_sim::projection::{ProjectionEngine, ProjectionResult};
use realestate_sim::report;

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

#[derive(Debug, Parser)]
#[command(name = "realestate_sim", about = "Project the cashflows of a real-estate purchase")]
struct Cli {
    /// Parameter file (.json object or two-column name,value .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override a parameter, e.g. --set holdingYears=15 (repeatable)
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the main output here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the loan schedule as CSV
    #[arg(long)]
    loan_csv: Option<PathBuf>,

    /// Also write the cumulative cashflow trajectory as CSV
    #[arg(long)]
    cumulative_csv: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut raw = match &cli.input {
        Some(path) => load_raw_inputs(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => RawInputs::new(),
    };
    for assignment in &cli.overrides {
        raw.set(assignment).context("Invalid --set override")?;
    }

    let inputs = InputSet::from_raw(&raw);
    let result = ProjectionEngine::new(inputs).project();
    info!(
        "projected {} years, total profit {:.0}",
        result.holding_years(),
        result.summary.total_profit
    );

    let mut out = open_output(cli.output.as_deref())?;
    match cli.format {
        OutputFormat::Table => print_table(&result, &mut out)?,
        OutputFormat::Json => {
            let json = report::to_json(&result).context("Failed to serialize result")?;
            writeln!(out, "{json}")?;
        }
        OutputFormat::Csv => {
            report::write_cashflow_csv(&result, &mut out).context("Failed to write cashflow CSV")?
        }
    }

    if let Some(path) = &cli.loan_csv {
        match &result.loan {
            Some(schedule) => report::write_loan_csv(schedule, create(path)?)
                .context("Failed to write loan CSV")?,
            None => info!("cash purchase, no loan schedule to write"),
        }
    }
    if let Some(path) = &cli.cumulative_csv {
        report::write_cumulative_csv(&result, create(path)?)
            .context("Failed to write cumulative CSV")?;
    }

    Ok(())
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Unable to create {}", path.display()))
}

fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(create(path)?),
        None => Box::new(io::stdout().lock()),
    })
}

fn print_table(result: &ProjectionResult, out: &mut dyn Write) -> io::Result<()> {
    let costs = &result.initial_costs;
    writeln!(out, "Purchase: {:?}, price {:.0}", result.purchase_method, costs.purchase_price)?;
    writeln!(out, "  Contract fees:   {:>14.0}", costs.total_contract_fee)?;
    writeln!(out, "  Settlement fees: {:>14.0}", costs.total_settlement_fee)?;
    writeln!(out, "  Later fees:      {:>14.0}", costs.total_later_fee)?;
    if let Some(self_funded) = costs.self_funded {
        writeln!(out, "  Self-funded:     {:>14.0}", self_funded)?;
    }
    writeln!(out, "  Initial cost:    {:>14.0}", costs.total_initial_cost)?;

    if let Some(loan) = &result.loan {
        writeln!(out)?;
        writeln!(
            out,
            "Loan: {:.0} at {}% over {} years ({:?}), monthly {:.0}, total interest {:.0}",
            loan.loan_amount,
            loan.annual_rate_pct,
            loan.term_years,
            loan.repayment_method,
            loan.monthly_payment,
            loan.total_interest()
        )?;
    }

    writeln!(out)?;
    writeln!(
        out,
        "{:>4} {:>9} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>11} {:>12}",
        "Year", "Usage", "Maint", "Reserve", "PropTax", "Insurance", "Repair", "Loan", "Deduction",
        "Rent", "RentSaving", "NetCF"
    )?;
    writeln!(out, "{}", "-".repeat(136))?;
    for year in &result.cashflow.years {
        writeln!(
            out,
            "{:>4} {:>9} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>11.0} {:>12.0}",
            year.year,
            if year.is_residence() { "residence" } else { "rental" },
            year.maintenance_fee,
            year.repair_reserve,
            year.property_tax,
            year.insurance,
            year.repair_cost,
            year.loan_payment,
            year.deduction,
            year.rental_income(),
            year.rent_saving(),
            year.net_cashflow,
        )?;
    }

    let sale = &result.sale;
    writeln!(out)?;
    writeln!(out, "Sale:")?;
    writeln!(out, "  Sale price:      {:>14.0}", sale.sale_price)?;
    writeln!(out, "  Sale costs:      {:>14.0}", sale.total_sale_costs)?;
    writeln!(out, "  Loan payoff:     {:>14.0}", sale.loan_balance)?;
    writeln!(out, "  Proceeds:        {:>14.0}", sale.sale_proceeds)?;

    let summary = &result.summary;
    writeln!(out)?;
    writeln!(out, "Summary:")?;
    writeln!(out, "  Initial cost:    {:>14.0}", -costs.total_initial_cost)?;
    writeln!(out, "  Holding CF:      {:>14.0}", summary.total_holding_cashflow)?;
    writeln!(out, "  Rental income:   {:>14.0}", result.cashflow.total_rental_income)?;
    writeln!(out, "  Rent saving:     {:>14.0}", result.cashflow.total_rent_saving)?;
    writeln!(out, "  Sale proceeds:   {:>14.0}", sale.sale_proceeds)?;
    writeln!(out, "  Total profit:    {:>14.0}", summary.total_profit)?;
    match summary.break_even_year {
        Some(year) => writeln!(out, "  Break-even year: {:>14}", year)?,
        None => writeln!(out, "  Break-even year: {:>14}", "-")?,
    }
    match summary.irr {
        Some(irr) => writeln!(out, "  IRR:             {:>13.2}%", irr * 100.0)?,
        None => writeln!(out, "  IRR:             {:>14}", "-")?,
    }

    Ok(())
}
