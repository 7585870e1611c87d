//! Compare outcomes across holding periods
//!
//! Runs the same scenario for every holding period in a range and reports
//! profit, sale proceeds and break-even year for each, plus the best period.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use realestate_sim::inputs::{load_raw_inputs, InputSet, RawInputs};
use realestate_sim::scenario::{best_holding_period, ScenarioRunner};

#[derive(Debug, Parser)]
#[command(name = "holding_sweep", about = "Sweep the holding period of a real-estate scenario")]
struct Cli {
    /// Parameter file (.json or .csv)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Override a parameter, e.g. --set interestRate=1.2 (repeatable)
    #[arg(short = 's', long = "set", value_name = "NAME=VALUE")]
    overrides: Vec<String>,

    #[arg(long, default_value_t = 1)]
    from: u32,

    #[arg(long, default_value_t = 35)]
    to: u32,

    /// Write the sweep as CSV instead of printing a table
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
struct SweepRow {
    holding_years: u32,
    total_holding_cashflow: f64,
    sale_price: f64,
    loan_balance: f64,
    sale_proceeds: f64,
    total_profit: f64,
    break_even_year: Option<u32>,
    irr: Option<f64>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let start = Instant::now();

    let mut raw = match &cli.input {
        Some(path) => load_raw_inputs(path)
            .with_context(|| format!("Failed to load parameters from {}", path.display()))?,
        None => RawInputs::new(),
    };
    for assignment in &cli.overrides {
        raw.set(assignment).context("Invalid --set override")?;
    }

    let runner = ScenarioRunner::new(InputSet::from_raw(&raw));
    let sweep = runner.holding_period_sweep(cli.from..=cli.to);

    let rows: Vec<SweepRow> = sweep
        .iter()
        .map(|(years, result)| SweepRow {
            holding_years: *years,
            total_holding_cashflow: result.summary.total_holding_cashflow,
            sale_price: result.sale.sale_price,
            loan_balance: result.sale.loan_balance,
            sale_proceeds: result.sale.sale_proceeds,
            total_profit: result.summary.total_profit,
            break_even_year: result.summary.break_even_year,
            irr: result.summary.irr,
        })
        .collect();

    match &cli.output {
        Some(path) => {
            let mut wtr = csv::Writer::from_path(path)
                .with_context(|| format!("Unable to create {}", path.display()))?;
            for row in &rows {
                wtr.serialize(row)?;
            }
            wtr.flush()?;
            println!("Written {} holding periods to {}", rows.len(), path.display());
        }
        None => {
            println!(
                "{:>5} {:>14} {:>14} {:>14} {:>14} {:>14} {:>10} {:>8}",
                "Years", "HoldingCF", "SalePrice", "LoanPayoff", "Proceeds", "Profit", "BreakEven", "IRR"
            );
            println!("{}", "-".repeat(100));
            for row in &rows {
                println!(
                    "{:>5} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>14.0} {:>10} {:>8}",
                    row.holding_years,
                    row.total_holding_cashflow,
                    row.sale_price,
                    row.loan_balance,
                    row.sale_proceeds,
                    row.total_profit,
                    row.break_even_year.map_or("-".to_string(), |y| y.to_string()),
                    row.irr.map_or("-".to_string(), |irr| format!("{:.2}%", irr * 100.0)),
                );
            }
        }
    }

    if let Some((years, best)) = best_holding_period(&sweep) {
        println!(
            "\nBest holding period: {} years (total profit {:.0})",
            years, best.summary.total_profit
        );
    }
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
