//! Synthetic stand-ins for failed upstream streams

use serde_json::{json, Map, Value};

use crate::types::{TimeframeSample, TimeframeSeries, PERP_ALL_TIME};

/// One all-time timeframe, 200.00 -> 210.00 account value and 0.00 -> 10.00 PnL.
pub fn portfolio() -> Vec<TimeframeSeries> {
    vec![TimeframeSeries {
        timeframe: PERP_ALL_TIME.to_string(),
        account_value_history: vec![
            TimeframeSample::new(0, "200.00"),
            TimeframeSample::new(1, "210.00"),
        ],
        pnl_history: vec![
            TimeframeSample::new(0, "0.00"),
            TimeframeSample::new(1, "10.00"),
        ],
    }]
}

pub fn clearinghouse_state() -> Map<String, Value> {
    let mut state = Map::new();
    state.insert("status".to_string(), json!("ok"));
    state
}

pub fn user_fills() -> Vec<Value> {
    Vec::new()
}

pub fn open_orders() -> Vec<Value> {
    Vec::new()
}
