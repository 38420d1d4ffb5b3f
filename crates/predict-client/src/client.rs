use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use predict_core::{
    ActionReceipt, HealthReport, ModelInfo, ModelStatus, PredictError, PredictResult, Prediction,
    Sector, Stock, TickerPrediction,
};

const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const API_PREFIX: &str = "/api/v1";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the prediction backend.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: REQUEST_TIMEOUT,
        }
    }

    /// Base URL from PREDICT_API_URL, falling back to localhost.
    pub fn from_env() -> Self {
        let base_url = std::env::var("PREDICT_API_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

#[derive(Clone)]
pub struct PredictClient {
    client: Client,
    api_url: String,
}

impl PredictClient {
    pub fn new(config: ClientConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            api_url: format!("{}{}", config.base_url.trim_end_matches('/'), API_PREFIX),
        }
    }

    /// Send a request, retrying once if the failure is a network-level one
    /// (nothing reached the server: refused/dropped connection, timeout).
    /// HTTP error statuses are final and never retried.
    async fn send(&self, builder: reqwest::RequestBuilder) -> PredictResult<reqwest::Response> {
        let request = builder
            .build()
            .map_err(|e| PredictError::Network(e.to_string()))?;
        let method = request.method().clone();
        let path = request.url().path().to_string();

        let mut retried = false;
        loop {
            let attempt = request
                .try_clone()
                .ok_or_else(|| PredictError::Network("cannot clone request".to_string()))?;

            let started = Instant::now();
            let outcome = self.client.execute(attempt).await;
            let elapsed_ms = started.elapsed().as_millis();

            match outcome {
                Ok(response) => {
                    tracing::debug!(
                        "{} {} -> {} ({}ms)",
                        method,
                        path,
                        response.status(),
                        elapsed_ms
                    );
                    return check_status(response).await;
                }
                Err(e) if is_transient(&e) && !retried => {
                    tracing::warn!(
                        "{} {} failed ({}ms), retrying once: {}",
                        method,
                        path,
                        elapsed_ms,
                        e
                    );
                    retried = true;
                }
                Err(e) => {
                    tracing::warn!("{} {} failed ({}ms): {}", method, path, elapsed_ms, e);
                    return Err(PredictError::Network(e.to_string()));
                }
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> PredictResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self.send(self.client.get(&url)).await?;
        decode(response).await
    }

    async fn post_json<T: DeserializeOwned>(&self, path: &str) -> PredictResult<T> {
        let url = format!("{}{}", self.api_url, path);
        let response = self.send(self.client.post(&url)).await?;
        decode(response).await
    }

    /// All current predictions.
    pub async fn get_predictions(&self) -> PredictResult<Vec<Prediction>> {
        let envelope: PredictionsEnvelope = self.get_json("/predict/now").await?;
        Ok(envelope.predictions)
    }

    /// Top `k` predictions ranked 1..k.
    pub async fn get_top_k_predictions(&self, k: usize) -> PredictResult<Vec<Prediction>> {
        let envelope: PredictionsEnvelope =
            self.get_json(&format!("/predict/top-k?k={}", k)).await?;
        Ok(envelope.predictions)
    }

    /// Full analysis for one ticker. The ticker is trimmed and upper-cased
    /// before it goes on the wire.
    pub async fn get_single_prediction(&self, ticker: &str) -> PredictResult<TickerPrediction> {
        let ticker = ticker.trim().to_uppercase();
        self.get_json(&format!("/predict/single/{}", ticker)).await
    }

    pub async fn get_model_info(&self) -> PredictResult<ModelInfo> {
        self.get_json("/model/info").await
    }

    pub async fn get_model_status(&self) -> PredictResult<ModelStatus> {
        self.get_json("/model/status/simple").await
    }

    pub async fn retrain(&self) -> PredictResult<ActionReceipt> {
        self.post_json("/retrain").await
    }

    pub async fn reload_features(&self) -> PredictResult<ActionReceipt> {
        self.post_json("/reload-features").await
    }

    pub async fn get_sectors(&self) -> PredictResult<Vec<Sector>> {
        let envelope: SectorsEnvelope = self.get_json("/sectors").await?;
        Ok(envelope.sectors)
    }

    pub async fn get_stocks(&self, limit: usize) -> PredictResult<Vec<Stock>> {
        let envelope: StocksEnvelope = self.get_json(&format!("/stocks?limit={}", limit)).await?;
        Ok(envelope.stocks)
    }

    pub async fn get_health(&self) -> PredictResult<HealthReport> {
        self.get_json("/health").await
    }

    /// API root this client talks to (for logging/diagnostics).
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_request()
}

async fn check_status(response: reqwest::Response) -> PredictResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(PredictError::Api {
        status: status.as_u16(),
        message: server_detail(&body).unwrap_or_else(|| fallback_message(status, &body)),
    })
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> PredictResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| PredictError::Decode(e.to_string()))
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Message the server itself put in the error body, if any.
fn server_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    parsed.detail.or(parsed.message).filter(|m| !m.is_empty())
}

fn fallback_message(status: StatusCode, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

// Collection endpoints wrap their payloads in a one-key envelope; a
// missing key means an empty collection, not an error.

#[derive(Debug, Deserialize)]
struct PredictionsEnvelope {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
struct SectorsEnvelope {
    #[serde(default)]
    sectors: Vec<Sector>,
}

#[derive(Debug, Deserialize)]
struct StocksEnvelope {
    #[serde(default)]
    stocks: Vec<Stock>,
}
