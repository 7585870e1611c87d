//! Loan amortization schedule
//!
//! Produces annual payment totals and year-end balances for the two supported
//! repayment methods. Payments and balances are derived by two independent
//! monthly walks so that each can be checked against the other.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::inputs::{LoanTerms, RepaymentMethod};

/// Annual view of a loan's repayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSchedule {
    pub loan_amount: f64,
    pub annual_rate_pct: f64,
    pub term_years: u32,
    pub repayment_method: RepaymentMethod,

    /// Level payment for equal-installment loans, first month's payment for
    /// equal-principal loans
    pub monthly_payment: f64,

    /// Total paid in each loan year (index 0 = year 1)
    pub annual_payments: Vec<f64>,

    /// Remaining balance at the end of each loan year, floored at zero
    pub balances: Vec<f64>,
}

impl LoanSchedule {
    /// Build the schedule for the given loan terms
    pub fn generate(terms: &LoanTerms) -> Self {
        let monthly_rate = terms.annual_rate_pct / 100.0 / 12.0;
        let total_months = terms.term_years * 12;

        let (monthly_payment, annual_payments) = if total_months == 0 {
            (0.0, Vec::new())
        } else {
            match terms.repayment_method {
                RepaymentMethod::EqualInstallment => {
                    let payment = level_monthly_payment(terms.amount, monthly_rate, total_months);
                    (payment, vec![payment * 12.0; terms.term_years as usize])
                }
                RepaymentMethod::EqualPrincipal => {
                    let principal = terms.amount / total_months as f64;
                    let first = principal + terms.amount * monthly_rate;
                    (
                        first,
                        equal_principal_payments(terms.amount, monthly_rate, terms.term_years),
                    )
                }
            }
        };

        let balances = year_end_balances(terms, monthly_rate, monthly_payment);

        debug!(
            "loan schedule: amount={:.0} rate={}% term={}y method={:?} monthly={:.2}",
            terms.amount, terms.annual_rate_pct, terms.term_years, terms.repayment_method, monthly_payment
        );

        Self {
            loan_amount: terms.amount,
            annual_rate_pct: terms.annual_rate_pct,
            term_years: terms.term_years,
            repayment_method: terms.repayment_method,
            monthly_payment,
            annual_payments,
            balances,
        }
    }

    /// Payment for a 1-indexed year; zero outside the loan term
    pub fn payment_for_year(&self, year: u32) -> f64 {
        year.checked_sub(1)
            .and_then(|idx| self.annual_payments.get(idx as usize))
            .copied()
            .unwrap_or(0.0)
    }

    /// Remaining balance at the end of a 1-indexed year.
    ///
    /// Year 0 is the original loan amount; years past the term return `None`.
    pub fn balance_at(&self, year: u32) -> Option<f64> {
        match year {
            0 => Some(self.loan_amount),
            y => self.balances.get(y as usize - 1).copied(),
        }
    }

    /// Principal repaid during a 1-indexed year
    pub fn annual_principal(&self, year: u32) -> f64 {
        match (self.balance_at(year.saturating_sub(1)), self.balance_at(year)) {
            (Some(opening), Some(closing)) if year > 0 => opening - closing,
            _ => 0.0,
        }
    }

    /// Interest paid during a 1-indexed year
    pub fn annual_interest(&self, year: u32) -> f64 {
        if year == 0 || year > self.term_years {
            return 0.0;
        }
        self.payment_for_year(year) - self.annual_principal(year)
    }

    pub fn total_payments(&self) -> f64 {
        self.annual_payments.iter().sum()
    }

    pub fn total_interest(&self) -> f64 {
        (1..=self.term_years).map(|y| self.annual_interest(y)).sum()
    }
}

/// Annuity payment; straight division when the rate is zero
fn level_monthly_payment(amount: f64, monthly_rate: f64, total_months: u32) -> f64 {
    if monthly_rate == 0.0 {
        amount / total_months as f64
    } else {
        let growth = (1.0 + monthly_rate).powi(total_months as i32);
        amount * monthly_rate * growth / (growth - 1.0)
    }
}

/// Yearly totals of fixed principal plus interest on the opening balance
fn equal_principal_payments(amount: f64, monthly_rate: f64, term_years: u32) -> Vec<f64> {
    let total_months = term_years * 12;
    let principal = amount / total_months as f64;

    (1..=term_years)
        .map(|year| {
            ((year - 1) * 12 + 1..=year * 12)
                .take_while(|&month| month <= total_months)
                .map(|month| {
                    let remaining = amount - principal * (month - 1) as f64;
                    principal + remaining * monthly_rate
                })
                .sum()
        })
        .collect()
}

/// Month-by-month balance walk recording each year-end balance.
///
/// One entry per loan year even after the balance reaches zero.
fn year_end_balances(terms: &LoanTerms, monthly_rate: f64, monthly_payment: f64) -> Vec<f64> {
    let total_months = terms.term_years * 12;
    let mut remaining = terms.amount;
    let mut balances = Vec::with_capacity(terms.term_years as usize);

    for year in 1..=terms.term_years {
        match terms.repayment_method {
            RepaymentMethod::EqualInstallment => {
                for _ in 0..12 {
                    if remaining <= 0.0 {
                        break;
                    }
                    let interest = remaining * monthly_rate;
                    let principal = monthly_payment - interest;
                    remaining = (remaining - principal).max(0.0);
                }
            }
            RepaymentMethod::EqualPrincipal => {
                let principal = terms.amount / total_months as f64;
                for month in 1..=12 {
                    let month_num = (year - 1) * 12 + month;
                    if month_num > total_months || remaining <= 0.0 {
                        break;
                    }
                    remaining = (remaining - principal).max(0.0);
                }
            }
        }
        balances.push(remaining);
    }

    balances
}
