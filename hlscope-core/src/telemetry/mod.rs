//! Account telemetry aggregation
//!
//! Fetches the four info streams for one account concurrently and reduces
//! them into an [`AccountSnapshot`].
//!
//! ## Failure model
//!
//! ```text
//!   userFills ──────────┐
//!   clearinghouseState ─┤  each: Live(value) | Fallback { value, reason }
//!   openOrders ─────────┤
//!   portfolio ──────────┘
//!            │
//!            ▼
//!   portfolio decodes? ──── no ──► Error::Upstream
//!            │ yes
//!            ▼
//!   perpAllTime present? ── no ──► Error::MissingTimeframe
//!            │ yes
//!            ▼
//!      AccountSnapshot { degraded: [streams that fell back] }
//! ```
//!
//! A stream falls back when the request fails or the response is not JSON.
//! The fills, clearinghouse and order streams also fall back when their JSON
//! has the wrong top-level shape. A portfolio that arrives as JSON but does
//! not decode is an error instead, as is one without a usable `perpAllTime`
//! history: the balance would otherwise come from synthetic data.

mod client;
pub mod fallback;
mod stats;

pub use client::{InfoClient, InfoSource};
pub use stats::{parse_value, render};

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::config::NetworkConfig;
use crate::error::{Error, Result};
use crate::types::{
    AccountSnapshot, InfoKind, StreamOutcome, TimeframeSeries, TimeframeStats, PERP_ALL_TIME,
};

/// Builds account snapshots from an [`InfoSource`].
///
/// Holds no cache: every call re-fetches all four streams.
#[derive(Clone)]
pub struct TelemetryAggregator {
    source: Arc<dyn InfoSource>,
}

impl TelemetryAggregator {
    /// Create an aggregator over any info source.
    pub fn new(source: Arc<dyn InfoSource>) -> Self {
        Self { source }
    }

    /// Create an aggregator backed by the HTTP info endpoint.
    pub fn from_config(config: &NetworkConfig) -> Result<Self> {
        let client = InfoClient::new(config)?;
        tracing::debug!(url = %client.info_url(), "Info client ready");
        Ok(Self::new(Arc::new(client)))
    }

    /// Fetch and summarize everything known about `account_id`.
    ///
    /// All four queries are in flight before any is awaited. Individual
    /// stream failures degrade to fallback data. Errors are returned only for
    /// a live portfolio that does not decode ([`Error::Upstream`]) or lacks
    /// the all-time history ([`Error::MissingTimeframe`]).
    pub async fn fetch_snapshot(&self, account_id: &str) -> Result<AccountSnapshot> {
        let (user_fills, clearinghouse_state, open_orders, portfolio) = tokio::join!(
            self.fetch_stream(InfoKind::UserFills, account_id, fallback::user_fills),
            self.fetch_stream(
                InfoKind::ClearinghouseState,
                account_id,
                fallback::clearinghouse_state
            ),
            self.fetch_stream(InfoKind::OpenOrders, account_id, fallback::open_orders),
            self.fetch_portfolio(account_id),
        );
        let portfolio = portfolio?;

        let degraded: Vec<InfoKind> = [
            (InfoKind::UserFills, user_fills.is_fallback()),
            (InfoKind::ClearinghouseState, clearinghouse_state.is_fallback()),
            (InfoKind::OpenOrders, open_orders.is_fallback()),
            (InfoKind::Portfolio, portfolio.is_fallback()),
        ]
        .into_iter()
        .filter_map(|(kind, fell_back)| fell_back.then_some(kind))
        .collect();

        let snapshot = summarize(
            user_fills.into_value(),
            clearinghouse_state.into_value(),
            open_orders.into_value(),
            &portfolio.into_value(),
            degraded,
        )?;

        tracing::info!(
            account = account_id,
            balance = %snapshot.balance,
            trade_count = snapshot.trade_count,
            timeframes = snapshot.pnl.len(),
            degraded = snapshot.degraded.len(),
            "Fetched account snapshot"
        );

        Ok(snapshot)
    }

    /// Run one query and decode it as `T`, substituting `fallback` on any failure.
    async fn fetch_stream<T, F>(
        &self,
        kind: InfoKind,
        user: &str,
        fallback: F,
    ) -> StreamOutcome<T>
    where
        T: DeserializeOwned,
        F: FnOnce() -> T,
    {
        let decoded = match self.source.query(kind, user).await {
            Ok(value) => serde_json::from_value::<T>(value)
                .map_err(|e| Error::Upstream(format!("unexpected {} shape: {}", kind, e))),
            Err(e) => Err(e),
        };

        match decoded {
            Ok(value) => StreamOutcome::Live(value),
            Err(e) => substitute(kind, user, e, fallback),
        }
    }

    /// Like [`Self::fetch_stream`], but a JSON body that does not decode is
    /// returned as an error rather than replaced.
    async fn fetch_portfolio(&self, user: &str) -> Result<StreamOutcome<Vec<TimeframeSeries>>> {
        let kind = InfoKind::Portfolio;
        match self.source.query(kind, user).await {
            Ok(value) => serde_json::from_value(value)
                .map(StreamOutcome::Live)
                .map_err(|e| Error::Upstream(format!("malformed {} response: {}", kind, e))),
            Err(e) => Ok(substitute(kind, user, e, fallback::portfolio)),
        }
    }
}

/// Log a failed stream and wrap its fallback value.
fn substitute<T>(
    kind: InfoKind,
    user: &str,
    error: Error,
    fallback: impl FnOnce() -> T,
) -> StreamOutcome<T> {
    tracing::warn!(
        kind = %kind,
        user,
        error = %error,
        "Substituting fallback data for failed stream"
    );
    StreamOutcome::Fallback {
        value: fallback(),
        reason: error.to_string(),
    }
}

/// Reduce the four stream values into a snapshot.
///
/// Fails if the portfolio has no `perpAllTime` timeframe or that timeframe
/// has an empty account-value history.
pub fn summarize(
    user_fills: Vec<Value>,
    clearinghouse_state: Map<String, Value>,
    open_orders: Vec<Value>,
    portfolio: &[TimeframeSeries],
    degraded: Vec<InfoKind>,
) -> Result<AccountSnapshot> {
    let balance = portfolio
        .iter()
        .find(|series| series.timeframe == PERP_ALL_TIME)
        .and_then(|series| series.account_value_history.last())
        .map(|sample| sample.value().to_string())
        .ok_or_else(|| Error::MissingTimeframe(PERP_ALL_TIME.to_string()))?;

    let pnl = portfolio.iter().map(TimeframeStats::from_series).collect();

    Ok(AccountSnapshot {
        pnl,
        balance,
        trade_count: user_fills.len(),
        clearinghouse_state,
        open_orders,
        degraded,
    })
}
