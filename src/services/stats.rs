// src/services/stats.rs
use serde::Serialize;

use crate::models::CalculationResult;
use super::calculations::format_usd;
use super::calculator::ReturnCalculator;
use super::ticker::PriceTicker;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvestmentStats {
    pub current_price: Option<f64>,
    pub current_price_display: String,
    pub potential_return: Option<CalculationResult>,
    pub potential_return_display: String,
    pub best_time_to_sell_display: String,
}

pub fn investment_stats(ticker: &PriceTicker, calculator: &ReturnCalculator) -> InvestmentStats {
    let potential_return = calculator.result().get();
    let potential_return_display = match &potential_return {
        Some(result) => format!(
            "{} ({:+.2}%)",
            format_usd(result.final_value),
            result.return_percent
        ),
        None => "Calculate to see returns".to_string(),
    };

    InvestmentStats {
        current_price: ticker.latest(),
        current_price_display: ticker.display_price(),
        potential_return,
        potential_return_display,
        best_time_to_sell_display: "Not yet calculated".to_string(),
    }
}
