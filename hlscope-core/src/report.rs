//! Agent report assembly
//!
//! Combines an agent's own `config.json`, its account snapshot, the shared
//! prompt documents and any new reasoning into one JSON object. Report
//! fields win over config fields of the same name.

use std::path::Path;

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::reasoning::ReasoningTracker;
use crate::telemetry::TelemetryAggregator;
use crate::types::AccountSnapshot;

/// `created_at` stamped on every report: 2025-03-14T00:00:00Z in epoch ms
pub const AGENTS_CREATED_AT_MS: i64 = 1_741_910_400_000;

/// The prompt documents every agent runs with
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptSet {
    pub deepresearch: Value,
    pub sys_deepresearch: Value,
    pub deeptrade: Value,
    pub sys_deeptrade: Value,
}

impl PromptSet {
    /// Load the four documents from `dir` concurrently.
    ///
    /// Any missing or malformed document fails the whole load.
    pub async fn load(dir: &Path) -> Result<Self> {
        let (deepresearch, sys_deepresearch, deeptrade, sys_deeptrade) = tokio::join!(
            read_prompt(dir, "deepresearch.json"),
            read_prompt(dir, "sys-deepresearch.json"),
            read_prompt(dir, "deeptrade.json"),
            read_prompt(dir, "sys-deeptrade.json"),
        );

        Ok(Self {
            deepresearch: deepresearch?,
            sys_deepresearch: sys_deepresearch?,
            deeptrade: deeptrade?,
            sys_deeptrade: sys_deeptrade?,
        })
    }
}

async fn read_prompt(dir: &Path, name: &str) -> Result<Value> {
    let path = dir.join(name);
    let content = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| Error::Prompt(format!("{}: {}", path.display(), e)))?;
    serde_json::from_str(&content).map_err(|e| Error::Prompt(format!("{}: {}", path.display(), e)))
}

/// Build the report for `agent_id`.
///
/// Fails if the agent is unknown (no account address configured or no
/// readable `config.json`) or a prompt document cannot be loaded. A snapshot
/// that cannot be produced is replaced by zero balance, zero trades and
/// empty state.
pub async fn build_report(
    config: &Config,
    agent_id: &str,
    aggregator: &TelemetryAggregator,
    tracker: &ReasoningTracker,
) -> Result<Map<String, Value>> {
    let address = config.account_address(agent_id)?;
    let agent_config = read_agent_config(config, agent_id).await?;
    let prompts = PromptSet::load(&config.prompt_dir()).await?;

    let snapshot = match aggregator.fetch_snapshot(address).await {
        Ok(snapshot) => snapshot_fields(snapshot)?,
        Err(e) => {
            tracing::warn!(
                agent = agent_id,
                account = address,
                error = %e,
                "Snapshot unavailable, reporting placeholder values"
            );
            placeholder_fields()
        }
    };

    let cot = tracker
        .poll_new_reasoning(agent_id, &config.agent_logs_dir(agent_id))
        .await;

    merge_report(
        agent_config,
        address,
        snapshot,
        prompts,
        cot,
        chrono::Utc::now().timestamp_millis(),
    )
}

/// Read `<data_root>/<agent_id>/config.json` as a JSON object.
async fn read_agent_config(config: &Config, agent_id: &str) -> Result<Map<String, Value>> {
    let path = config.agent_config_path(agent_id);
    let content = tokio::fs::read_to_string(&path).await.map_err(|e| {
        tracing::warn!(
            agent = agent_id,
            path = %path.display(),
            error = %e,
            "Agent config unreadable"
        );
        Error::AgentNotFound(agent_id.to_string())
    })?;
    Ok(serde_json::from_str(&content)?)
}

fn snapshot_fields(snapshot: AccountSnapshot) -> Result<Map<String, Value>> {
    match serde_json::to_value(snapshot)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}

/// Stand-in snapshot fields; `balance` is the number 0 here, not a string.
fn placeholder_fields() -> Map<String, Value> {
    [
        ("trade_count", json!(0)),
        ("balance", json!(0)),
        ("clearinghouseState", json!({})),
        ("pnl", json!([])),
        ("openOrders", json!([])),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect()
}

/// Layer the report fields over the agent's config object.
fn merge_report(
    mut report: Map<String, Value>,
    address: &str,
    snapshot: Map<String, Value>,
    prompts: PromptSet,
    cot: String,
    updated_at: i64,
) -> Result<Map<String, Value>> {
    report.insert(
        "wallet_address".to_string(),
        Value::String(address.to_string()),
    );
    report.extend(snapshot);
    report.insert("prompts".to_string(), serde_json::to_value(prompts)?);
    report.insert("cot".to_string(), Value::String(cot));
    report.insert("created_at".to_string(), Value::from(AGENTS_CREATED_AT_MS));
    report.insert("updated_at".to_string(), Value::from(updated_at));
    Ok(report)
}
