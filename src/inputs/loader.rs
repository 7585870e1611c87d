//! Raw parameter boundary
//!
//! Converts a flat `name -> value` mapping (as collected from a form, a JSON
//! document or a two-column CSV file) into a typed [`InputSet`]. Coercion never
//! fails: unparseable or missing values fall back to the field default and the
//! fallback is logged.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Deserialize;
use serde_json::Value;

use super::data::{
    HoldingPlan, InitialCostItems, InputSet, LoanDeduction, LoanTerms, PurchaseMethod,
    RecurringCosts, RentSaving, RentalTerms, RepairEvent, RepaymentMethod, SalePriceMethod,
    SaleTerms, DEFAULT_HOLDING_YEARS, DEFAULT_LOAN_YEARS, DEFAULT_RESIDENCE_END_YEAR,
    DEFAULT_RESIDENCE_START_YEAR, DEFAULT_SALE_BROKERAGE_RATE_PCT, MAX_YEARS,
};

/// Errors raised while reading raw parameters from a file or override string
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("failed to open {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid JSON input: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid CSV input: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON input must be an object of parameter name to value")]
    NotAnObject,
    #[error("override must look like name=value, got {0:?}")]
    InvalidOverride(String),
    #[error("unsupported input format for {0} (expected .json or .csv)")]
    UnsupportedFormat(PathBuf),
}

pub type Result<T> = std::result::Result<T, InputError>;

/// Flat parameter mapping keyed by form field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawInputs {
    values: BTreeMap<String, Value>,
}

/// Row of a two-column `name,value` parameter file
#[derive(Debug, Deserialize)]
struct CsvRow {
    name: String,
    value: String,
}

impl RawInputs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read a JSON object of parameter name to value
    pub fn from_json_reader<R: Read>(reader: R) -> Result<Self> {
        match serde_json::from_reader(reader)? {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            _ => Err(InputError::NotAnObject),
        }
    }

    /// Read a headed `name,value` CSV file
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut values = BTreeMap::new();
        for row in reader.deserialize() {
            let row: CsvRow = row?;
            values.insert(row.name, Value::String(row.value));
        }

        Ok(Self { values })
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    /// Apply a `name=value` override; the value is kept as a string and coerced later
    pub fn set(&mut self, assignment: &str) -> Result<()> {
        let (name, value) = assignment
            .split_once('=')
            .ok_or_else(|| InputError::InvalidOverride(assignment.to_string()))?;
        let name = name.trim();
        if name.is_empty() {
            return Err(InputError::InvalidOverride(assignment.to_string()));
        }
        self.values
            .insert(name.to_string(), Value::String(value.trim().to_string()));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Numeric field; unparseable values fall back to `default`
    fn number(&self, name: &str, default: f64) -> f64 {
        match self.values.get(name) {
            None => default,
            Some(value) => coerce_number(value).unwrap_or_else(|| {
                warn!("{name}: cannot read {value} as a number, using {default}");
                default
            }),
        }
    }

    /// Numeric field where zero also means "use the default"
    fn number_nonzero(&self, name: &str, default: f64) -> f64 {
        match self.number(name, default) {
            n if n == 0.0 => default,
            n => n,
        }
    }

    /// Whole-year field read from its leading integer, clamped to `±MAX_YEARS`
    fn year(&self, name: &str, default: i32) -> i32 {
        let years = match self.values.get(name) {
            None => return default,
            Some(value) => match coerce_year(value) {
                Some(years) => years,
                None => {
                    warn!("{name}: cannot read {value} as a year, using {default}");
                    return default;
                }
            },
        };

        let bound = i64::from(MAX_YEARS);
        if !(-bound..=bound).contains(&years) {
            warn!("{name}: {years} is outside ±{MAX_YEARS} years, clamping");
        }
        years.clamp(-bound, bound) as i32
    }

    fn year_nonzero(&self, name: &str, default: i32) -> i32 {
        match self.year(name, default) {
            0 => default,
            y => y,
        }
    }

    /// Count of years; negative counts clamp to zero
    fn year_count(&self, name: &str, default: u32, zero_is_default: bool) -> u32 {
        let years = if zero_is_default {
            self.year_nonzero(name, default as i32)
        } else {
            self.year(name, default as i32)
        };
        years.max(0) as u32
    }

    fn flag(&self, name: &str) -> bool {
        match self.values.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
            Some(Value::String(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "on" | "1" | "yes" => true,
                "false" | "off" | "0" | "no" | "" => false,
                other => {
                    warn!("{name}: cannot read {other:?} as a flag, using false");
                    false
                }
            },
            Some(other) => {
                warn!("{name}: cannot read {other} as a flag, using false");
                false
            }
        }
    }

    /// Lower-cased enum tag with separators removed
    fn tag(&self, name: &str) -> Option<String> {
        match self.values.get(name)? {
            Value::String(s) => Some(
                s.chars()
                    .filter(|c| !matches!(c, '_' | '-' | ' '))
                    .flat_map(char::to_lowercase)
                    .collect(),
            ),
            _ => None,
        }
    }

    fn repayment_method(&self) -> RepaymentMethod {
        match self.tag("repaymentMethod").as_deref() {
            None | Some("equal" | "equalinstallment" | "installment") => {
                RepaymentMethod::EqualInstallment
            }
            Some("principal" | "equalprincipal") => RepaymentMethod::EqualPrincipal,
            Some(other) => {
                warn!("repaymentMethod: unknown method {other:?}, using equal installment");
                RepaymentMethod::EqualInstallment
            }
        }
    }

    fn sale_price_method(&self) -> SalePriceMethod {
        match self.tag("salePriceMethod").as_deref() {
            None | Some("direct") => SalePriceMethod::Direct,
            Some("rate" | "appreciationrate" | "appreciation") => {
                SalePriceMethod::AppreciationRate
            }
            Some(other) => {
                warn!("salePriceMethod: unknown method {other:?}, using direct price");
                SalePriceMethod::Direct
            }
        }
    }

    fn purchase_method(&self) -> PurchaseMethod {
        match self.tag("purchaseMethod").as_deref() {
            Some("loan") => PurchaseMethod::Loan,
            _ => PurchaseMethod::Cash,
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for RawInputs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Load raw parameters from a `.json` or `.csv` file
pub fn load_raw_inputs(path: &Path) -> Result<RawInputs> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    let open = || {
        File::open(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let raw = match extension.as_deref() {
        Some("json") => RawInputs::from_json_reader(open()?)?,
        Some("csv") => RawInputs::from_csv_reader(open()?)?,
        _ => return Err(InputError::UnsupportedFormat(path.to_path_buf())),
    };

    debug!("loaded {} parameters from {}", raw.len(), path.display());
    Ok(raw)
}

/// Coerce a raw value to a number the way a live form does
fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_leading_number(s),
        _ => None,
    }
}

/// Coerce a raw value to whole years; strings read only their integer prefix
fn coerce_year(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().map(|n| n.trunc() as i64),
        Value::Bool(b) => Some(i64::from(*b)),
        Value::String(s) => parse_leading_integer(s),
        _ => None,
    }
}

/// Parse the signed integer prefix of `s` ("12.9" -> 12, "1e3" -> 1, ".5" -> None)
fn parse_leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let magnitude = rest.as_bytes()[..digits].iter().fold(0i64, |acc, &b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });

    Some(if negative { -magnitude } else { magnitude })
}

/// Parse the longest numeric prefix of `s` ("12.5%" -> 12.5, "abc" -> None)
fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }
    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

impl InputSet {
    /// Build a typed scenario from raw form values, applying field defaults
    pub fn from_raw(raw: &RawInputs) -> Self {
        Self {
            purchase_method: raw.purchase_method(),
            purchase_price: raw.number("purchasePrice", 0.0),
            initial_costs: InitialCostItems {
                earnest_money: raw.number("earnestMoney", 0.0),
                brokerage_fee: raw.number("brokerageFee", 0.0),
                other_contract_fee: raw.number("otherContractFee", 0.0),
                down_payment: raw.number("downPayment", 0.0),
                registration_fee: raw.number("registrationFee", 0.0),
                stamp_duty: raw.number("stampDuty", 0.0),
                other_settlement_fee: raw.number("otherSettlementFee", 0.0),
                other_later_fee: raw.number("otherLaterFee", 0.0),
            },
            loan: LoanTerms {
                amount: raw.number("loanAmount", 0.0),
                annual_rate_pct: raw.number("interestRate", 0.0),
                term_years: raw.year_count("loanYears", DEFAULT_LOAN_YEARS, true),
                repayment_method: raw.repayment_method(),
            },
            plan: HoldingPlan {
                holding_years: raw.year_count("holdingYears", DEFAULT_HOLDING_YEARS, true),
                residence_start_year: raw
                    .year_nonzero("residenceStartYear", DEFAULT_RESIDENCE_START_YEAR),
                residence_end_year: raw.year_nonzero("residenceEndYear", DEFAULT_RESIDENCE_END_YEAR),
            },
            recurring: RecurringCosts {
                monthly_maintenance_fee: raw.number("monthlyMaintenanceFee", 0.0),
                monthly_repair_reserve: raw.number("monthlyRepairReserve", 0.0),
                annual_property_tax: raw.number("annualPropertyTax", 0.0),
                annual_insurance: raw.number("annualInsurance", 0.0),
                annual_increase_pct: raw.number("costIncreaseRate", 0.0),
            },
            repair_event: RepairEvent {
                year: raw.year("repairEventYear", 0),
                cost: raw.number("repairEventCost", 0.0),
            },
            deduction: LoanDeduction {
                amount_per_year: raw.number("loanDeduction", 0.0),
                years: raw.year_count("deductionYears", 0, false),
            },
            rental: RentalTerms {
                monthly_rent: raw.number("monthlyRent", 0.0),
                vacancy_rate_pct: raw.number("vacancyRate", 0.0),
                management_fee_pct: raw.number("rentalManagementRate", 0.0),
                annual_increase_pct: raw.number("rentIncreaseRate", 0.0),
            },
            rent_saving: RentSaving {
                enabled: raw.flag("enableRentSaving"),
                monthly_amount: raw.number("monthlyRentSaving", 0.0),
            },
            sale: SaleTerms {
                method: raw.sale_price_method(),
                direct_price: raw.number("salePrice", 0.0),
                appreciation_rate_pct: raw.number("priceIncreaseRate", 0.0),
                brokerage_rate_pct: raw
                    .number_nonzero("saleBrokerageRate", DEFAULT_SALE_BROKERAGE_RATE_PCT),
                other_sale_cost: raw.number("otherSaleCost", 0.0),
                sale_tax_cost: raw.number("saleTaxCost", 0.0),
            },
        }
    }
}
