//! Agent log file naming
//!
//! Logs are written as `deepresearch-sectors-<seq>.json` and
//! `deeptrade-<seq>.json`, where `<seq>` is an increasing integer.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which pipeline wrote a log file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogCategory {
    Research,
    Trade,
}

impl LogCategory {
    /// All categories, in the order their spans are concatenated
    pub const ALL: [LogCategory; 2] = [LogCategory::Research, LogCategory::Trade];

    /// File name prefix preceding the sequence number
    pub fn prefix(&self) -> &'static str {
        match self {
            LogCategory::Research => "deepresearch-sectors-",
            LogCategory::Trade => "deeptrade-",
        }
    }
}

impl std::fmt::Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogCategory::Research => f.write_str("research"),
            LogCategory::Trade => f.write_str("trade"),
        }
    }
}

/// A recognized log file in an agent's logs directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFileRef {
    pub category: LogCategory,
    pub sequence: u64,
    pub path: PathBuf,
}

impl LogFileRef {
    /// Recognize `file_name` inside `dir`.
    ///
    /// Returns `None` for anything that is not `<prefix><digits>.json`.
    pub fn parse(dir: &Path, file_name: &str) -> Option<Self> {
        let stem = file_name.strip_suffix(".json")?;

        LogCategory::ALL.into_iter().find_map(|category| {
            let digits = stem.strip_prefix(category.prefix())?;
            let sequence = parse_sequence(digits)?;
            Some(Self {
                category,
                sequence,
                path: dir.join(file_name),
            })
        })
    }
}

/// Parse an unsigned sequence number made of ASCII digits only.
fn parse_sequence(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// The newest file of `category` at or after the watermark.
///
/// `include_boundary` decides whether a file exactly at `watermark` counts.
pub fn newest_since<'a>(
    files: &'a [LogFileRef],
    category: LogCategory,
    watermark: u64,
    include_boundary: bool,
) -> Option<&'a LogFileRef> {
    files
        .iter()
        .filter(|f| f.category == category)
        .filter(|f| f.sequence > watermark || (include_boundary && f.sequence == watermark))
        .max_by_key(|f| f.sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(name: &str) -> Option<LogFileRef> {
        LogFileRef::parse(Path::new("/logs"), name)
    }

    #[test]
    fn test_parse_research_and_trade() {
        let research = parse("deepresearch-sectors-17.json").unwrap();
        assert_eq!(research.category, LogCategory::Research);
        assert_eq!(research.sequence, 17);
        assert_eq!(
            research.path,
            PathBuf::from("/logs/deepresearch-sectors-17.json")
        );

        let trade = parse("deeptrade-1712000000.json").unwrap();
        assert_eq!(trade.category, LogCategory::Trade);
        assert_eq!(trade.sequence, 1_712_000_000);
    }

    #[test]
    fn test_parse_rejects_other_names() {
        assert!(parse("deeptrade-12.txt").is_none());
        assert!(parse("deeptrade-.json").is_none());
        assert!(parse("deeptrade-abc.json").is_none());
        assert!(parse("deeptrade-+5.json").is_none());
        assert!(parse("deeptrade-5.bak.json").is_none());
        assert!(parse("deepresearch-7.json").is_none());
        assert!(parse("notes.json").is_none());
    }

    #[test]
    fn test_prefixes_do_not_cross_match() {
        // A research name never parses as trade, and vice versa.
        assert_eq!(
            parse("deepresearch-sectors-3.json").unwrap().category,
            LogCategory::Research
        );
        assert!(parse("deeptrade-sectors-3.json").is_none());
        assert!(parse("xdeeptrade-3.json").is_none());
    }

    #[test]
    fn test_newest_since() {
        let files: Vec<LogFileRef> = [
            "deeptrade-3.json",
            "deeptrade-9.json",
            "deeptrade-5.json",
            "deepresearch-sectors-20.json",
        ]
        .iter()
        .filter_map(|n| parse(n))
        .collect();

        let newest = newest_since(&files, LogCategory::Trade, 4, false).unwrap();
        assert_eq!(newest.sequence, 9);

        assert!(newest_since(&files, LogCategory::Trade, 9, false).is_none());
        assert_eq!(
            newest_since(&files, LogCategory::Trade, 9, true)
                .unwrap()
                .sequence,
            9
        );
        assert_eq!(
            newest_since(&files, LogCategory::Research, 0, true)
                .unwrap()
                .sequence,
            20
        );
    }
}
