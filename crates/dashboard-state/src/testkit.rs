//! Scripted backend fake shared by the coordinator tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::oneshot;

use predict_client::PredictApi;
use predict_core::{
    ActionReceipt, HealthReport, ModelInfo, ModelStatus, PredictResult, Prediction, Sector, Stock,
    TickerPrediction,
};

enum Scripted<T> {
    Ready(PredictResult<T>),
    /// Held back until the test fires the paired sender.
    Gated(oneshot::Receiver<()>, PredictResult<T>),
}

struct Endpoint<T> {
    name: &'static str,
    queue: Mutex<VecDeque<Scripted<T>>>,
    calls: AtomicUsize,
}

impl<T> Endpoint<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            queue: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    fn push(&self, result: PredictResult<T>) {
        self.queue.lock().unwrap().push_back(Scripted::Ready(result));
    }

    fn push_gated(&self, result: PredictResult<T>) -> oneshot::Sender<()> {
        let (release, gate) = oneshot::channel();
        self.queue
            .lock()
            .unwrap()
            .push_back(Scripted::Gated(gate, result));
        release
    }

    async fn take(&self) -> PredictResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self
            .queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected {} call", self.name));
        match scripted {
            Scripted::Ready(result) => result,
            Scripted::Gated(gate, result) => {
                let _ = gate.await;
                result
            }
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

/// Backend stand-in that serves pre-scripted results in order, counts
/// calls per endpoint, and panics on anything unscripted.
pub struct FakeApi {
    stocks: Endpoint<Vec<Stock>>,
    sectors: Endpoint<Vec<Sector>>,
    top_k: Endpoint<Vec<Prediction>>,
    health: Endpoint<HealthReport>,
    single: Endpoint<TickerPrediction>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            stocks: Endpoint::new("get_stocks"),
            sectors: Endpoint::new("get_sectors"),
            top_k: Endpoint::new("get_top_k_predictions"),
            health: Endpoint::new("get_health"),
            single: Endpoint::new("get_single_prediction"),
        }
    }

    pub fn push_stocks(&self, result: PredictResult<Vec<Stock>>) {
        self.stocks.push(result);
    }

    pub fn push_stocks_gated(&self, result: PredictResult<Vec<Stock>>) -> oneshot::Sender<()> {
        self.stocks.push_gated(result)
    }

    pub fn push_sectors(&self, result: PredictResult<Vec<Sector>>) {
        self.sectors.push(result);
    }

    pub fn push_top_k(&self, result: PredictResult<Vec<Prediction>>) {
        self.top_k.push(result);
    }

    pub fn push_health(&self, result: PredictResult<HealthReport>) {
        self.health.push(result);
    }

    pub fn push_health_gated(&self, result: PredictResult<HealthReport>) -> oneshot::Sender<()> {
        self.health.push_gated(result)
    }

    pub fn push_single(&self, result: PredictResult<TickerPrediction>) {
        self.single.push(result);
    }

    pub fn health_calls(&self) -> usize {
        self.health.calls()
    }

    pub fn single_calls(&self) -> usize {
        self.single.calls()
    }

    pub fn refresh_calls(&self) -> (usize, usize, usize) {
        (
            self.stocks.calls(),
            self.sectors.calls(),
            self.top_k.calls(),
        )
    }
}

#[async_trait]
impl PredictApi for FakeApi {
    async fn get_predictions(&self) -> PredictResult<Vec<Prediction>> {
        unimplemented!("not scripted")
    }

    async fn get_top_k_predictions(&self, _k: usize) -> PredictResult<Vec<Prediction>> {
        self.top_k.take().await
    }

    async fn get_single_prediction(&self, _ticker: &str) -> PredictResult<TickerPrediction> {
        self.single.take().await
    }

    async fn get_model_info(&self) -> PredictResult<ModelInfo> {
        unimplemented!("not scripted")
    }

    async fn get_model_status(&self) -> PredictResult<ModelStatus> {
        unimplemented!("not scripted")
    }

    async fn retrain(&self) -> PredictResult<ActionReceipt> {
        unimplemented!("not scripted")
    }

    async fn reload_features(&self) -> PredictResult<ActionReceipt> {
        unimplemented!("not scripted")
    }

    async fn get_sectors(&self) -> PredictResult<Vec<Sector>> {
        self.sectors.take().await
    }

    async fn get_stocks(&self, _limit: usize) -> PredictResult<Vec<Stock>> {
        self.stocks.take().await
    }

    async fn get_health(&self) -> PredictResult<HealthReport> {
        self.health.take().await
    }
}

// Small builders for test payloads.

pub fn stock(ticker: &str) -> Stock {
    Stock {
        ticker: ticker.to_string(),
        company_name: format!("{} Ltd", ticker),
        sector: "Technology".to_string(),
        current_price: None,
        change_percent: None,
    }
}

pub fn sector(name: &str, tickers: &[&str]) -> Sector {
    Sector {
        name: name.to_string(),
        stock_count: tickers.len() as u32,
        stocks: tickers.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn prediction(rank: u32, ticker: &str) -> Prediction {
    Prediction {
        rank,
        ticker: ticker.to_string(),
        company_name: format!("{} Ltd", ticker),
        predicted_movement: predict_core::Movement::Up,
        ranking_score: 0.5 + rank as f64 / 100.0,
        sector: "Technology".to_string(),
        confidence: None,
    }
}

pub fn healthy() -> HealthReport {
    HealthReport {
        status: "healthy".to_string(),
    }
}

pub fn unhealthy() -> HealthReport {
    HealthReport {
        status: "model_not_loaded".to_string(),
    }
}

pub fn ticker_prediction(ticker: &str) -> TickerPrediction {
    TickerPrediction {
        ticker: ticker.to_string(),
        sector: "Technology".to_string(),
        prediction: predict_core::PredictionDetail {
            rank: 1,
            total_stocks: 88,
            direction: "UP".to_string(),
            confidence_percentage: 70.0,
            confidence_level: "HIGH".to_string(),
            expected_return_percentage: 2.0,
            quality: "Good".to_string(),
            up_probability: 64.0,
        },
        trading_suggestion: predict_core::TradingSuggestion {
            action: "BUY".to_string(),
            suggested_allocation: "5%".to_string(),
            risk_level: "MODERATE".to_string(),
        },
        investment_scenarios: Vec::new(),
    }
}
