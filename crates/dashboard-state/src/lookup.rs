use std::sync::Arc;

use tokio::sync::watch;

use predict_client::PredictApi;
use predict_core::TickerPrediction;

const EMPTY_INPUT_MESSAGE: &str = "Please enter a ticker symbol";
const GENERIC_FAILURE_MESSAGE: &str = "Failed to load prediction. Check if ticker exists.";

/// Outcome of the most recent single-ticker lookup.
#[derive(Debug, Clone, Default)]
pub struct LookupSnapshot {
    pub result: Option<TickerPrediction>,
    pub error: Option<String>,
    pub loading: bool,
}

/// User-initiated single-ticker analysis. Unlike the bulk coordinators
/// this surfaces failures inline, because silently dropping the one
/// query the user typed would be confusing.
pub struct TickerLookup {
    api: Arc<dyn PredictApi>,
    state_tx: watch::Sender<LookupSnapshot>,
    state_rx: watch::Receiver<LookupSnapshot>,
}

impl TickerLookup {
    pub fn new(api: Arc<dyn PredictApi>) -> Self {
        let (state_tx, state_rx) = watch::channel(LookupSnapshot::default());
        Self {
            api,
            state_tx,
            state_rx,
        }
    }

    pub fn snapshot(&self) -> LookupSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<LookupSnapshot> {
        self.state_rx.clone()
    }

    /// Look up one ticker. A failure reports the backend's own message
    /// when it sent one and keeps the previous successful result on
    /// screen until a new lookup succeeds.
    pub async fn lookup(&self, ticker: &str) {
        let ticker = ticker.trim();
        if ticker.is_empty() {
            self.state_tx
                .send_modify(|s| s.error = Some(EMPTY_INPUT_MESSAGE.to_string()));
            return;
        }

        self.state_tx.send_modify(|s| {
            s.loading = true;
            s.error = None;
        });

        match self.api.get_single_prediction(ticker).await {
            Ok(result) => {
                tracing::debug!("lookup for {} succeeded", result.ticker);
                let _ = self.state_tx.send(LookupSnapshot {
                    result: Some(result),
                    error: None,
                    loading: false,
                });
            }
            Err(e) => {
                tracing::warn!("lookup for {} failed: {}", ticker, e);
                let message = e
                    .server_message()
                    .map(str::to_string)
                    .unwrap_or_else(|| GENERIC_FAILURE_MESSAGE.to_string());
                self.state_tx.send_modify(|s| {
                    s.error = Some(message);
                    s.loading = false;
                });
            }
        }
    }
}
