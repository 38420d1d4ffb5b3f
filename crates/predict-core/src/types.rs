use serde::{Deserialize, Serialize};

/// Predicted price movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Movement {
    Up,
    Down,
}

impl std::fmt::Display for Movement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
        }
    }
}

/// One ranked prediction as returned by the ranking endpoints.
/// Ranks are 1-based and contiguous within a result set; tickers are
/// unique within a result set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    pub rank: u32,
    pub ticker: String,
    pub company_name: String,
    pub predicted_movement: Movement,
    pub ranking_score: f64,
    pub sector: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Tracked stock metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stock {
    pub ticker: String,
    pub company_name: String,
    pub sector: String,
    #[serde(default)]
    pub current_price: Option<f64>,
    #[serde(default)]
    pub change_percent: Option<f64>,
}

/// Sector grouping with its member tickers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub name: String,
    pub stock_count: u32,
    #[serde(default)]
    pub stocks: Vec<String>,
}

/// Static descriptive metadata about the serving model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_name: String,
    pub version: String,
    pub accuracy: f64,
    pub last_trained: String,
    pub total_stocks: u32,
    pub features_count: u32,
    pub architecture: String,
}

/// Operational model status from `/model/status/simple`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelStatus {
    pub status: String,
    pub message: String,
    pub last_prediction: String,
}

/// Acknowledgement payload for the retrain / reload-features actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionReceipt {
    pub status: String,
    pub message: String,
}

/// Backend health probe response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
}

impl HealthReport {
    /// The backend reports a loaded, serving model with the literal
    /// status string "healthy"; anything else counts as not ready.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

/// Full single-ticker analysis payload from `/predict/single/{ticker}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickerPrediction {
    pub ticker: String,
    pub sector: String,
    pub prediction: PredictionDetail,
    pub trading_suggestion: TradingSuggestion,
    #[serde(default)]
    pub investment_scenarios: Vec<InvestmentScenario>,
}

/// Core prediction block of a single-ticker analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionDetail {
    pub rank: u32,
    pub total_stocks: u32,
    /// "UP" or "DOWN"
    pub direction: String,
    pub confidence_percentage: f64,
    pub confidence_level: String,
    pub expected_return_percentage: f64,
    pub quality: String,
    pub up_probability: f64,
}

/// Suggested action derived by the backend from the prediction
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSuggestion {
    pub action: String,
    pub suggested_allocation: String,
    pub risk_level: String,
}

/// What a fixed investment amount is expected to return
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentScenario {
    pub investment: f64,
    pub expected_profit: f64,
    pub expected_value: f64,
}
