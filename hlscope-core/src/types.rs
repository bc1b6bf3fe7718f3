//! Core domain types for hlscope
//!
//! These types mirror the info endpoint's portfolio shape on the way in and
//! the normalized account snapshot on the way out.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Timeframe label whose last account value is reported as the balance
pub const PERP_ALL_TIME: &str = "perpAllTime";

// ============================================
// Upstream Query Types
// ============================================

/// The four queries issued against the info endpoint for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum InfoKind {
    UserFills,
    ClearinghouseState,
    OpenOrders,
    Portfolio,
}

impl InfoKind {
    /// Value sent in the request's `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoKind::UserFills => "userFills",
            InfoKind::ClearinghouseState => "clearinghouseState",
            InfoKind::OpenOrders => "openOrders",
            InfoKind::Portfolio => "portfolio",
        }
    }
}

impl std::fmt::Display for InfoKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of an info endpoint request
#[derive(Debug, Serialize)]
pub struct InfoRequest<'a> {
    #[serde(rename = "type")]
    pub kind: InfoKind,
    pub user: &'a str,
}

/// Result of one upstream stream: live data or a substituted fallback.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutcome<T> {
    /// Upstream answered with well-formed JSON
    Live(T),
    /// Upstream failed; `value` is the synthetic stand-in
    Fallback { value: T, reason: String },
}

impl<T> StreamOutcome<T> {
    /// Whether this stream degraded to fallback data
    pub fn is_fallback(&self) -> bool {
        matches!(self, StreamOutcome::Fallback { .. })
    }

    /// Take the carried value regardless of origin
    pub fn into_value(self) -> T {
        match self {
            StreamOutcome::Live(value) | StreamOutcome::Fallback { value, .. } => value,
        }
    }
}

// ============================================
// Portfolio Types
// ============================================

/// A single point in a history: `[timestamp, "decimal"]`.
///
/// Upstream sends the value as a string; a bare JSON number is accepted too
/// and kept in its JSON text form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeframeSample(pub i64, #[serde(deserialize_with = "decimal_text")] pub String);

impl TimeframeSample {
    pub fn new(timestamp: i64, value: impl Into<String>) -> Self {
        Self(timestamp, value.into())
    }

    pub fn timestamp(&self) -> i64 {
        self.0
    }

    pub fn value(&self) -> &str {
        &self.1
    }
}

fn decimal_text<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum DecimalText {
        Text(String),
        Number(Number),
    }

    Ok(match DecimalText::deserialize(deserializer)? {
        DecimalText::Text(text) => text,
        DecimalText::Number(number) => number.to_string(),
    })
}

/// One portfolio timeframe with its value and PnL histories.
///
/// Upstream encodes each timeframe as a `[label, { ... }]` pair; both
/// histories are optional there and default to empty here. The two
/// histories are independent and may differ in length.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(from = "RawTimeframe", into = "RawTimeframe")]
pub struct TimeframeSeries {
    pub timeframe: String,
    pub account_value_history: Vec<TimeframeSample>,
    pub pnl_history: Vec<TimeframeSample>,
}

#[derive(Deserialize, Serialize)]
struct RawTimeframe(String, RawHistories);

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct RawHistories {
    #[serde(default)]
    account_value_history: Vec<TimeframeSample>,
    #[serde(default)]
    pnl_history: Vec<TimeframeSample>,
}

impl From<RawTimeframe> for TimeframeSeries {
    fn from(raw: RawTimeframe) -> Self {
        let RawTimeframe(timeframe, histories) = raw;
        Self {
            timeframe,
            account_value_history: histories.account_value_history,
            pnl_history: histories.pnl_history,
        }
    }
}

impl From<TimeframeSeries> for RawTimeframe {
    fn from(series: TimeframeSeries) -> Self {
        RawTimeframe(
            series.timeframe,
            RawHistories {
                account_value_history: series.account_value_history,
                pnl_history: series.pnl_history,
            },
        )
    }
}

/// Summary statistics for one timeframe, all rendered to four decimals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeframeStats {
    pub timeframe: String,
    pub avg_account_value: String,
    pub avg_pnl: String,
    pub account_value_change: String,
    pub pnl_change: String,
}

// ============================================
// Snapshot
// ============================================

/// Normalized account view built from the four upstream streams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Per-timeframe statistics, in upstream order
    pub pnl: Vec<TimeframeStats>,
    /// Last all-time account value, verbatim from upstream
    pub balance: String,
    /// Number of user fills
    pub trade_count: usize,
    #[serde(rename = "clearinghouseState")]
    pub clearinghouse_state: Map<String, Value>,
    #[serde(rename = "openOrders")]
    pub open_orders: Vec<Value>,
    /// Streams that were substituted with fallback data
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<InfoKind>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_info_kind_wire_names() {
        assert_eq!(
            serde_json::to_value(InfoKind::ClearinghouseState).unwrap(),
            json!("clearinghouseState")
        );
        assert_eq!(InfoKind::UserFills.to_string(), "userFills");
    }

    #[test]
    fn test_info_request_body() {
        let body = InfoRequest {
            kind: InfoKind::Portfolio,
            user: "0xabc",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({"type": "portfolio", "user": "0xabc"})
        );
    }

    #[test]
    fn test_parse_portfolio_timeframes() {
        let raw = json!([
            ["day", {
                "accountValueHistory": [[1700000000000i64, "101.5"], [1700000060000i64, "102.0"]],
                "pnlHistory": [[1700000000000i64, "0.0"]],
                "vlm": "0.0"
            }],
            ["perpAllTime", {}]
        ]);

        let series: Vec<TimeframeSeries> = serde_json::from_value(raw).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].timeframe, "day");
        assert_eq!(series[0].account_value_history.len(), 2);
        assert_eq!(series[0].account_value_history[1].value(), "102.0");
        assert_eq!(series[0].pnl_history.len(), 1);
        assert_eq!(series[1].timeframe, PERP_ALL_TIME);
        assert!(series[1].account_value_history.is_empty());
        assert!(series[1].pnl_history.is_empty());
    }

    #[test]
    fn test_stream_outcome_accessors() {
        let live = StreamOutcome::Live(3);
        assert!(!live.is_fallback());
        assert_eq!(live.into_value(), 3);

        let fallback = StreamOutcome::Fallback {
            value: 0,
            reason: "timeout".to_string(),
        };
        assert!(fallback.is_fallback());
        assert_eq!(fallback.into_value(), 0);
    }

    #[test]
    fn test_numeric_sample_values_are_kept() {
        let raw = json!([["perpAllTime", {
            "accountValueHistory": [[0, 5000.5], [1, "5100.25"], [2, 7]]
        }]]);

        let series: Vec<TimeframeSeries> = serde_json::from_value(raw).unwrap();
        let values: Vec<&str> = series[0]
            .account_value_history
            .iter()
            .map(TimeframeSample::value)
            .collect();
        assert_eq!(values, ["5000.5", "5100.25", "7"]);
    }

    #[test]
    fn test_null_sample_value_is_rejected() {
        let raw = json!([["day", {"accountValueHistory": [[0, null]]}]]);
        assert!(serde_json::from_value::<Vec<TimeframeSeries>>(raw).is_err());
    }

    #[test]
    fn test_snapshot_omits_empty_degraded() {
        let snapshot = AccountSnapshot {
            pnl: Vec::new(),
            balance: "0".to_string(),
            trade_count: 0,
            clearinghouse_state: Map::new(),
            open_orders: Vec::new(),
            degraded: Vec::new(),
        };
        let value = serde_json::to_value(snapshot).unwrap();
        assert!(value.get("degraded").is_none());
        assert!(value.get("clearinghouseState").is_some());
        assert!(value.get("openOrders").is_some());
        assert_eq!(value["trade_count"], json!(0));
    }
}
