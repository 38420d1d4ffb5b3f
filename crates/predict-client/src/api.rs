use async_trait::async_trait;

use predict_core::{
    ActionReceipt, HealthReport, ModelInfo, ModelStatus, PredictResult, Prediction, Sector, Stock,
    TickerPrediction,
};

use crate::client::PredictClient;

/// Everything the dashboard layer needs from the prediction backend.
/// Coordinators hold an `Arc<dyn PredictApi>` so tests can swap in a
/// scripted backend without opening a socket.
#[async_trait]
pub trait PredictApi: Send + Sync {
    /// All current predictions
    async fn get_predictions(&self) -> PredictResult<Vec<Prediction>>;

    /// Top `k` predictions ranked 1..k
    async fn get_top_k_predictions(&self, k: usize) -> PredictResult<Vec<Prediction>>;

    /// Full analysis for one ticker
    async fn get_single_prediction(&self, ticker: &str) -> PredictResult<TickerPrediction>;

    /// Static model metadata
    async fn get_model_info(&self) -> PredictResult<ModelInfo>;

    /// Operational model status
    async fn get_model_status(&self) -> PredictResult<ModelStatus>;

    /// Kick off a retrain on the backend
    async fn retrain(&self) -> PredictResult<ActionReceipt>;

    /// Reload the backend's feature set
    async fn reload_features(&self) -> PredictResult<ActionReceipt>;

    /// All sectors with member tickers
    async fn get_sectors(&self) -> PredictResult<Vec<Sector>>;

    /// Tracked stocks, capped at `limit`
    async fn get_stocks(&self, limit: usize) -> PredictResult<Vec<Stock>>;

    /// Backend health probe
    async fn get_health(&self) -> PredictResult<HealthReport>;
}

#[async_trait]
impl PredictApi for PredictClient {
    async fn get_predictions(&self) -> PredictResult<Vec<Prediction>> {
        self.get_predictions().await
    }

    async fn get_top_k_predictions(&self, k: usize) -> PredictResult<Vec<Prediction>> {
        self.get_top_k_predictions(k).await
    }

    async fn get_single_prediction(&self, ticker: &str) -> PredictResult<TickerPrediction> {
        self.get_single_prediction(ticker).await
    }

    async fn get_model_info(&self) -> PredictResult<ModelInfo> {
        self.get_model_info().await
    }

    async fn get_model_status(&self) -> PredictResult<ModelStatus> {
        self.get_model_status().await
    }

    async fn retrain(&self) -> PredictResult<ActionReceipt> {
        self.retrain().await
    }

    async fn reload_features(&self) -> PredictResult<ActionReceipt> {
        self.reload_features().await
    }

    async fn get_sectors(&self) -> PredictResult<Vec<Sector>> {
        self.get_sectors().await
    }

    async fn get_stocks(&self, limit: usize) -> PredictResult<Vec<Stock>> {
        self.get_stocks(limit).await
    }

    async fn get_health(&self) -> PredictResult<HealthReport> {
        self.get_health().await
    }
}
