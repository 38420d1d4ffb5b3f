use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::watch;

use predict_client::PredictApi;
use session_store::{keys, CacheEntry, SessionStore, SessionStoreExt};

/// Re-probe the backend only when the last confirmed answer is at least
/// this old. Readiness changes rarely, so this window is deliberately
/// wider than the dataset one.
const STATUS_TTL_SECS: i64 = 30 * 60;

/// Tri-state readiness of the serving model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelReadiness {
    Ready,
    Checking,
    NotReady,
}

impl std::fmt::Display for ModelReadiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready => write!(f, "Ready"),
            Self::Checking => write!(f, "Checking"),
            Self::NotReady => write!(f, "Not ready"),
        }
    }
}

/// What subscribers see between checks.
#[derive(Debug, Clone)]
pub struct ModelStatusSnapshot {
    pub readiness: ModelReadiness,
    /// Last confirmed flag, retained while a check is outstanding.
    pub model_loaded: bool,
    pub last_checked: Option<DateTime<Utc>>,
}

/// Keeps a readiness flag for the serving model, backed by the session
/// store so a page reload inside the same session starts from the last
/// confirmed answer instead of a blank one.
pub struct ModelStatusCoordinator {
    api: Arc<dyn PredictApi>,
    store: Arc<dyn SessionStore>,
    state_tx: watch::Sender<ModelStatusSnapshot>,
    state_rx: watch::Receiver<ModelStatusSnapshot>,
}

impl ModelStatusCoordinator {
    /// Restore from the session store. With no cached flag the default is
    /// optimistic Ready, which avoids a "not ready" flash on every fresh
    /// session while the first probe is still in flight.
    pub fn new(api: Arc<dyn PredictApi>, store: Arc<dyn SessionStore>) -> Self {
        let model_loaded = store.get_json::<bool>(keys::MODEL_LOADED).unwrap_or(true);
        let snapshot = ModelStatusSnapshot {
            readiness: if model_loaded {
                ModelReadiness::Ready
            } else {
                ModelReadiness::NotReady
            },
            model_loaded,
            last_checked: store.get_stamp(keys::MODEL_LAST_CHECKED),
        };
        let (state_tx, state_rx) = watch::channel(snapshot);

        Self {
            api,
            store,
            state_tx,
            state_rx,
        }
    }

    pub fn snapshot(&self) -> ModelStatusSnapshot {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ModelStatusSnapshot> {
        self.state_rx.clone()
    }

    /// Mount-time policy: trust a recent enough confirmed answer, run a
    /// real check otherwise.
    pub async fn ensure_fresh(&self) {
        if let Some(entry) = self
            .store
            .get_entry::<bool>(keys::MODEL_LOADED, keys::MODEL_LAST_CHECKED)
        {
            let age = (Utc::now() - entry.cached_at).num_seconds();
            if age < STATUS_TTL_SECS {
                tracing::debug!("model status confirmed {}s ago, skipping probe", age);
                return;
            }
        }
        self.check_status().await;
    }

    /// Probe backend health and publish the answer. Callable on demand;
    /// concurrent calls are not deduplicated. A failed probe leaves the
    /// last known readiness in place so a single network hiccup cannot
    /// flap the dashboard to "not ready".
    pub async fn check_status(&self) {
        let retained = self.snapshot();
        let _ = self.state_tx.send(ModelStatusSnapshot {
            readiness: ModelReadiness::Checking,
            ..retained.clone()
        });

        match self.api.get_health().await {
            Ok(report) => {
                let loaded = report.is_healthy();
                let entry = CacheEntry::now(loaded);
                self.store
                    .put_entry(keys::MODEL_LOADED, keys::MODEL_LAST_CHECKED, &entry);

                tracing::info!("model health probe: {}", report.status);
                let _ = self.state_tx.send(ModelStatusSnapshot {
                    readiness: if loaded {
                        ModelReadiness::Ready
                    } else {
                        ModelReadiness::NotReady
                    },
                    model_loaded: loaded,
                    last_checked: Some(entry.cached_at),
                });
            }
            Err(e) => {
                tracing::warn!("model health probe failed, keeping previous status: {}", e);
                let _ = self.state_tx.send(retained);
            }
        }
    }
}
