use serde::Serialize;

use crate::types::{Movement, Prediction, Stock};

/// Headline numbers a dashboard shows above a prediction table.
/// Computed over exactly the slice it is given, so callers can summarize
/// a filtered subset as easily as the full set.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionSummary {
    pub total: usize,
    pub bullish: usize,
    pub bearish: usize,
    pub average_score: f64,
}

impl PredictionSummary {
    pub fn from_predictions(predictions: &[Prediction]) -> Self {
        let bullish = predictions
            .iter()
            .filter(|p| p.predicted_movement == Movement::Up)
            .count();
        let average_score = if predictions.is_empty() {
            0.0
        } else {
            predictions.iter().map(|p| p.ranking_score).sum::<f64>() / predictions.len() as f64
        };

        Self {
            total: predictions.len(),
            bullish,
            bearish: predictions.len() - bullish,
            average_score,
        }
    }
}

/// Keep only predictions with the given movement direction.
pub fn filter_by_movement(predictions: &[Prediction], movement: Movement) -> Vec<&Prediction> {
    predictions
        .iter()
        .filter(|p| p.predicted_movement == movement)
        .collect()
}

/// Case-insensitive substring search over ticker and company name.
/// An empty query matches everything.
pub fn search_predictions<'a>(predictions: &'a [Prediction], query: &str) -> Vec<&'a Prediction> {
    let query = query.trim().to_lowercase();
    predictions
        .iter()
        .filter(|p| {
            query.is_empty()
                || p.ticker.to_lowercase().contains(&query)
                || p.company_name.to_lowercase().contains(&query)
        })
        .collect()
}

/// Sector filter plus the same search used for predictions.
/// `sector: None` means all sectors.
pub fn filter_stocks<'a>(stocks: &'a [Stock], sector: Option<&str>, query: &str) -> Vec<&'a Stock> {
    let query = query.trim().to_lowercase();
    stocks
        .iter()
        .filter(|s| sector.is_none_or(|want| s.sector == want))
        .filter(|s| {
            query.is_empty()
                || s.ticker.to_lowercase().contains(&query)
                || s.company_name.to_lowercase().contains(&query)
        })
        .collect()
}
