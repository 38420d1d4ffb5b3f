use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{watch, Mutex};

use predict_client::PredictApi;
use predict_core::{Prediction, Sector, Stock};
use session_store::{keys, SessionStore, SessionStoreExt};

/// Re-fetch when the cached bundle is older than this. Dataset content
/// changes far more often than model readiness, so this window is much
/// tighter than the model-status one.
const DATA_TTL_SECS: i64 = 5 * 60;

/// How much data each refresh asks for.
#[derive(Debug, Clone, Copy)]
pub struct DatasetLimits {
    pub stock_limit: usize,
    pub top_k: usize,
}

impl Default for DatasetLimits {
    fn default() -> Self {
        Self {
            stock_limit: 500,
            top_k: 20,
        }
    }
}

/// Point-in-time view of the three dashboard datasets.
#[derive(Debug, Clone, Default)]
pub struct DatasetSnapshot {
    pub stocks: Vec<Stock>,
    pub sectors: Vec<Sector>,
    pub predictions: Vec<Prediction>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// Fetches stocks, sectors and ranked predictions as one atomic bundle.
/// The three collections always move together: a refresh where any fetch
/// fails commits nothing, and the previously cached bundle stays visible.
pub struct DatasetCoordinator {
    api: Arc<dyn PredictApi>,
    store: Arc<dyn SessionStore>,
    limits: DatasetLimits,
    state_tx: watch::Sender<DatasetSnapshot>,
    state_rx: watch::Receiver<DatasetSnapshot>,
    /// Refresh ticket counter; each refresh takes the next number.
    generation: AtomicU64,
    /// Generation of the last committed bundle. Stops an older in-flight
    /// refresh from landing on top of a newer commit.
    committed: Mutex<u64>,
}

impl DatasetCoordinator {
    /// Restore whatever the session store holds; missing or corrupt
    /// entries come back as empty collections.
    pub fn new(
        api: Arc<dyn PredictApi>,
        store: Arc<dyn SessionStore>,
        limits: DatasetLimits,
    ) -> Self {
        let snapshot = DatasetSnapshot {
            stocks: store.get_json(keys::STOCKS).unwrap_or_default(),
            sectors: store.get_json(keys::SECTORS).unwrap_or_default(),
            predictions: store.get_json(keys::PREDICTIONS).unwrap_or_default(),
            loading: false,
            last_updated: store.get_stamp(keys::DATA_LAST_UPDATED),
        };
        let (state_tx, state_rx) = watch::channel(snapshot);

        Self {
            api,
            store,
            limits,
            state_tx,
            state_rx,
            generation: AtomicU64::new(0),
            committed: Mutex::new(0),
        }
    }

    pub fn snapshot(&self) -> DatasetSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DatasetSnapshot> {
        self.state_rx.clone()
    }

    /// Fetch all three datasets concurrently and commit them as one unit.
    /// Any failure abandons the whole refresh and keeps cached data
    /// visible; overlapping refreshes are not deduplicated, but a stale
    /// one can never overwrite a newer commit.
    pub async fn refresh(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.state_tx.send_modify(|s| s.loading = true);

        let fetched = tokio::try_join!(
            self.api.get_stocks(self.limits.stock_limit),
            self.api.get_sectors(),
            self.api.get_top_k_predictions(self.limits.top_k),
        );

        match fetched {
            Ok((stocks, sectors, predictions)) => {
                self.commit(generation, stocks, sectors, predictions).await;
            }
            Err(e) => {
                tracing::warn!("dataset refresh failed, keeping cached data: {}", e);
                self.state_tx.send_modify(|s| s.loading = false);
            }
        }
    }

    async fn commit(
        &self,
        generation: u64,
        stocks: Vec<Stock>,
        sectors: Vec<Sector>,
        predictions: Vec<Prediction>,
    ) {
        let mut committed = self.committed.lock().await;
        if generation < *committed {
            tracing::debug!(
                "discarding refresh {} superseded by {}",
                generation,
                *committed
            );
            self.state_tx.send_modify(|s| s.loading = false);
            return;
        }
        *committed = generation;

        let now = Utc::now();
        self.store.set_json(keys::STOCKS, &stocks);
        self.store.set_json(keys::SECTORS, &sectors);
        self.store.set_json(keys::PREDICTIONS, &predictions);
        self.store.set_stamp(keys::DATA_LAST_UPDATED, now);

        tracing::info!(
            "datasets refreshed: {} stocks, {} sectors, {} predictions",
            stocks.len(),
            sectors.len(),
            predictions.len()
        );

        let _ = self.state_tx.send(DatasetSnapshot {
            stocks,
            sectors,
            predictions,
            loading: false,
            last_updated: Some(now),
        });
    }

    /// Mount-time policy: load if nothing is cached, refresh if the cache
    /// has gone stale, otherwise serve what we already have.
    pub async fn ensure_fresh(&self) {
        let (have_stocks, last_updated) = {
            let snapshot = self.state_rx.borrow();
            (!snapshot.stocks.is_empty(), snapshot.last_updated)
        };

        if !have_stocks {
            tracing::debug!("no cached stocks, loading datasets");
            self.refresh().await;
            return;
        }

        if let Some(stamp) = last_updated {
            let age = (Utc::now() - stamp).num_seconds();
            if age > DATA_TTL_SECS {
                tracing::debug!("dataset cache {}s old, refreshing", age);
                self.refresh().await;
                return;
            }
        }

        tracing::debug!("serving cached datasets");
    }
}
