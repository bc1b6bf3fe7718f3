//! Incremental reasoning extraction from agent logs
//!
//! Agents write one chat-completion JSON document per run into
//! `<data_root>/<agent_id>/logs/`:
//!
//! ```text
//! logs/
//! ├── deepresearch-sectors-1712000000.json   research pipeline
//! ├── deepresearch-sectors-1712003600.json
//! └── deeptrade-1712000300.json              trade pipeline
//! ```
//!
//! The [`ReasoningTracker`] remembers, per agent and per pipeline, the highest
//! sequence number already surfaced, and on each poll returns the
//! `<think>...</think>` text of the newest file written since.

mod log_file;
mod span;
mod tracker;

pub use log_file::{newest_since, LogCategory, LogFileRef};
pub use span::{extract_reasoning, ChatCompletion};
pub use tracker::{list_log_files, ReasoningTracker, Watermark};
