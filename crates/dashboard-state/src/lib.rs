//! Dashboard State Module
//!
//! Cache-and-refresh coordinators between the prediction backend and any
//! event-driven UI layer. Each coordinator restores itself from the session
//! store, exposes a snapshot plus a watch channel, and refreshes over HTTP
//! only when its cached view has gone stale.

pub mod datasets;
pub mod lookup;
pub mod model_status;

pub use datasets::{DatasetCoordinator, DatasetLimits, DatasetSnapshot};
pub use lookup::{LookupSnapshot, TickerLookup};
pub use model_status::{ModelReadiness, ModelStatusCoordinator, ModelStatusSnapshot};

#[cfg(test)]
mod testkit;
