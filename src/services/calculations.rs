// src/services/calculations.rs
use chrono::{Datelike, Utc};
use log::{debug, warn};

use crate::models::{CalculationResult, InvestmentInput, PriceSeries, RawInput};
use super::errors::CalculatorError;

/// First year with Bitcoin price data.
pub const MIN_START_YEAR: i32 = 2009;

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

pub fn parse_amount(raw: &str) -> Result<f64, CalculatorError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount > 0.0 => Ok(amount),
        _ => {
            warn!("Rejected investment amount {:?}", raw);
            Err(CalculatorError::InvalidAmount(raw.to_string()))
        }
    }
}

pub fn parse_start_year(raw: &str, current_year: i32) -> Result<i32, CalculatorError> {
    let out_of_range = || CalculatorError::UnsupportedDateRange {
        year: raw.to_string(),
        min: MIN_START_YEAR,
        max: current_year,
    };
    let year = raw.trim().parse::<i32>().map_err(|_| out_of_range())?;
    if year < MIN_START_YEAR || year > current_year {
        warn!("Rejected start year {} (supported {}-{})", year, MIN_START_YEAR, current_year);
        return Err(out_of_range());
    }
    Ok(year)
}

/// Validates both fields; the amount is checked first.
pub fn validate_input(raw: &RawInput, current_year: i32) -> Result<InvestmentInput, CalculatorError> {
    let amount = parse_amount(&raw.amount)?;
    let start_year = parse_start_year(&raw.start_year, current_year)?;
    Ok(InvestmentInput { amount, start_year })
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Projects `input.amount` over the loaded window: bought at the first price
/// of the series, valued at the last one.
///
/// The start year does not move the window; it is only echoed back.
pub fn compute_return(input: &InvestmentInput, series: &PriceSeries) -> Result<CalculationResult, CalculatorError> {
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(CalculatorError::SeriesUnavailable("price series is empty".to_string())),
    };
    if !(first.price.is_finite() && first.price > 0.0) {
        return Err(CalculatorError::SeriesUnavailable(format!(
            "initial price {} is not usable",
            first.price
        )));
    }

    let amount = input.amount;
    let final_value = round2(amount * (last.price / first.price));
    let return_percent = round2((final_value - amount) / amount * 100.0);
    debug!(
        "Computed return: {} -> {} ({}%), prices {} -> {}",
        amount, final_value, return_percent, first.price, last.price
    );

    Ok(CalculationResult {
        initial_value: round2(amount),
        final_value,
        return_percent,
        initial_price: first.price,
        current_price: last.price,
        start_year: input.start_year,
    })
}

/// Formats a dollar figure with thousands separators, trimming trailing
/// zeros the way a browser's default number formatting does.
pub fn format_usd(value: f64) -> String {
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&grouped);
    if frac != 0 {
        let frac_str = format!("{:02}", frac);
        out.push('.');
        out.push_str(frac_str.trim_end_matches('0'));
    }
    out
}
