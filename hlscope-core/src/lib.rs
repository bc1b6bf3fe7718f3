//! # hlscope-core
//!
//! Core library for hlscope - a monitor for autonomous trading agents.
//!
//! This library provides:
//! - Account telemetry aggregation over the market-data info endpoint
//! - Incremental reasoning extraction from per-agent log files
//! - Agent report assembly
//! - Configuration management
//! - Logging infrastructure
//!
//! ## Example
//!
//! ```rust,no_run
//! use hlscope_core::{Config, ReasoningTracker, TelemetryAggregator};
//!
//! # async fn run() -> hlscope_core::Result<()> {
//! let config = Config::load()?;
//! let aggregator = TelemetryAggregator::from_config(&config.network)?;
//! let snapshot = aggregator.fetch_snapshot("0x0000000000000000000000000000000000000000").await?;
//! println!("balance: {}", snapshot.balance);
//!
//! let tracker = ReasoningTracker::new();
//! let cot = tracker
//!     .poll_new_reasoning("alpha", &config.agent_logs_dir("alpha"))
//!     .await;
//! println!("{}", cot);
//! # Ok(())
//! # }
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use reasoning::{ReasoningTracker, Watermark};
pub use report::{build_report, PromptSet};
pub use telemetry::{InfoClient, InfoSource, TelemetryAggregator};
pub use types::*;

// Public modules
pub mod config;
pub mod error;
pub mod logging;
pub mod reasoning;
pub mod report;
pub mod telemetry;
pub mod types;
