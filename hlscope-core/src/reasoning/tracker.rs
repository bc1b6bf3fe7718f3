//! Per-agent watermarks over numbered reasoning logs

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};

use super::log_file::{newest_since, LogCategory, LogFileRef};
use super::span::ChatCompletion;
use crate::error::Result;

/// Highest log sequence consumed per category for one agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Watermark {
    pub last_research_log: u64,
    pub last_trade_log: u64,
}

impl Watermark {
    pub fn get(&self, category: LogCategory) -> u64 {
        match category {
            LogCategory::Research => self.last_research_log,
            LogCategory::Trade => self.last_trade_log,
        }
    }

    fn advance(&mut self, category: LogCategory, sequence: u64) {
        let slot = match category {
            LogCategory::Research => &mut self.last_research_log,
            LogCategory::Trade => &mut self.last_trade_log,
        };
        *slot = (*slot).max(sequence);
    }
}

/// Watermark plus whether the file at each boundary was already read.
///
/// A fresh or seeded boundary is inclusive: the file sitting exactly at the
/// watermark is still picked up once. After it is read the boundary closes.
#[derive(Debug, Default)]
struct AgentCursor {
    watermark: Watermark,
    research_read: bool,
    trade_read: bool,
}

impl AgentCursor {
    fn seeded(watermark: Watermark) -> Self {
        Self {
            watermark,
            research_read: false,
            trade_read: false,
        }
    }

    fn boundary_read(&self, category: LogCategory) -> bool {
        match category {
            LogCategory::Research => self.research_read,
            LogCategory::Trade => self.trade_read,
        }
    }

    fn consume(&mut self, category: LogCategory, sequence: u64) {
        self.watermark.advance(category, sequence);
        match category {
            LogCategory::Research => self.research_read = true,
            LogCategory::Trade => self.trade_read = true,
        }
    }
}

/// Tracks which reasoning logs each agent has already surfaced.
///
/// State is in memory only. Each agent's cursor has its own async lock,
/// held for a whole poll, so overlapping polls of one agent run one after
/// the other while different agents proceed independently.
#[derive(Default)]
pub struct ReasoningTracker {
    agents: Mutex<HashMap<String, Arc<tokio::sync::Mutex<AgentCursor>>>>,
}

impl ReasoningTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect reasoning from logs written since the last poll for `agent_id`.
    ///
    /// For each category only the newest unseen file is read; older unseen
    /// files in the same batch are skipped. Research text precedes trade
    /// text. A file without a span, or one that cannot be read, still moves
    /// the watermark. If the directory cannot be listed nothing changes and
    /// the result is empty.
    pub async fn poll_new_reasoning(&self, agent_id: &str, logs_dir: &Path) -> String {
        let cursor = self.cursor(agent_id);
        let mut cursor = cursor.lock().await;

        let files = match list_log_files(logs_dir).await {
            Ok(files) => files,
            Err(e) => {
                tracing::warn!(
                    agent = agent_id,
                    dir = %logs_dir.display(),
                    error = %e,
                    "Failed to list reasoning logs"
                );
                return String::new();
            }
        };

        let mut cot = String::new();

        for category in LogCategory::ALL {
            let watermark = cursor.watermark.get(category);
            let include_boundary = !cursor.boundary_read(category);
            let Some(file) = newest_since(&files, category, watermark, include_boundary) else {
                continue;
            };

            match read_reasoning(&file.path).await {
                Ok(Some(span)) => cot.push_str(&span),
                Ok(None) => tracing::debug!(
                    agent = agent_id,
                    path = %file.path.display(),
                    "Log has no reasoning span"
                ),
                Err(e) => tracing::warn!(
                    agent = agent_id,
                    path = %file.path.display(),
                    error = %e,
                    "Skipping unreadable reasoning log"
                ),
            }

            cursor.consume(category, file.sequence);
            tracing::debug!(
                agent = agent_id,
                category = %category,
                sequence = file.sequence,
                "Advanced reasoning watermark"
            );
        }

        cot
    }

    /// Current watermark for `agent_id`, if it has been polled or seeded.
    pub async fn watermark(&self, agent_id: &str) -> Option<Watermark> {
        let cursor = self.existing_cursor(agent_id)?;
        let cursor = cursor.lock().await;
        Some(cursor.watermark)
    }

    /// Set the watermark for `agent_id`, replacing any existing state.
    ///
    /// Files exactly at the seeded sequences are still read by the next poll.
    pub async fn seed(&self, agent_id: &str, watermark: Watermark) {
        let cursor = self.cursor(agent_id);
        *cursor.lock().await = AgentCursor::seeded(watermark);
    }

    /// Drop all state for `agent_id`. Returns whether it was tracked.
    pub fn forget(&self, agent_id: &str) -> bool {
        self.lock_agents().remove(agent_id).is_some()
    }

    /// Agent ids with tracked state
    pub fn agents(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.lock_agents().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn cursor(&self, agent_id: &str) -> Arc<tokio::sync::Mutex<AgentCursor>> {
        self.lock_agents()
            .entry(agent_id.to_string())
            .or_default()
            .clone()
    }

    fn existing_cursor(&self, agent_id: &str) -> Option<Arc<tokio::sync::Mutex<AgentCursor>>> {
        self.lock_agents().get(agent_id).cloned()
    }

    fn lock_agents(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<String, Arc<tokio::sync::Mutex<AgentCursor>>>> {
        // The map is only touched by short non-panicking sections, so a
        // poisoned lock still holds consistent data.
        self.agents.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Recognized log files in `dir`; unrelated names are ignored.
pub async fn list_log_files(dir: &Path) -> Result<Vec<LogFileRef>> {
    let mut entries = tokio::fs::read_dir(dir).await?;
    let mut files = Vec::new();

    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(file) = LogFileRef::parse(dir, name) {
            files.push(file);
        }
    }

    Ok(files)
}

/// Read one log and pull out its reasoning span.
async fn read_reasoning(path: &Path) -> Result<Option<String>> {
    let content = tokio::fs::read_to_string(path).await?;
    let completion: ChatCompletion = serde_json::from_str(&content)?;
    Ok(completion.reasoning().map(str::to_string))
}
