//! Reasoning span extraction from chat-completion logs

use serde::Deserialize;

const OPEN_MARKER: &str = "<think>";
const CLOSE_MARKER: &str = "</think>";

/// The slice of a chat-completion document we read
#[derive(Debug, Deserialize)]
pub struct ChatCompletion {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChatMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice's message, if any
    pub fn first_content(&self) -> Option<&str> {
        self.choices.first()?.message.content.as_deref()
    }

    /// Reasoning span of the first choice, if marked
    pub fn reasoning(&self) -> Option<&str> {
        self.first_content().and_then(extract_reasoning)
    }
}

/// Text between the first `<think>` and the next `</think>`.
///
/// The span may cross lines. Returns `None` when either marker is missing.
pub fn extract_reasoning(content: &str) -> Option<&str> {
    let start = content.find(OPEN_MARKER)? + OPEN_MARKER.len();
    let len = content[start..].find(CLOSE_MARKER)?;
    Some(&content[start..start + len])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_reasoning() {
        assert_eq!(
            extract_reasoning("<think>buy the dip</think>Buy 1 ETH"),
            Some("buy the dip")
        );
        assert_eq!(
            extract_reasoning("preamble <think>line one\nline two</think> tail"),
            Some("line one\nline two")
        );
        assert_eq!(extract_reasoning("<think></think>"), Some(""));
    }

    #[test]
    fn test_extract_reasoning_is_non_greedy() {
        assert_eq!(
            extract_reasoning("<think>a</think> and <think>b</think>"),
            Some("a")
        );
    }

    #[test]
    fn test_extract_reasoning_requires_both_markers() {
        assert_eq!(extract_reasoning("no markers"), None);
        assert_eq!(extract_reasoning("<think>never closed"), None);
        assert_eq!(extract_reasoning("</think> before <think>"), None);
    }

    #[test]
    fn test_reasoning_from_document() {
        let doc: ChatCompletion = serde_json::from_str(
            r#"{"id":"x","choices":[{"index":0,"message":{"role":"assistant","content":"<think>hedge</think>ok"}}]}"#,
        )
        .unwrap();
        assert_eq!(doc.reasoning(), Some("hedge"));

        let empty: ChatCompletion = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert_eq!(empty.reasoning(), None);

        let null_content: ChatCompletion =
            serde_json::from_str(r#"{"choices":[{"message":{"content":null}}]}"#).unwrap();
        assert_eq!(null_content.first_content(), None);
    }
}
