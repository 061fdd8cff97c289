//! Wire types for the checker's `/api/check` contract.
//!
//! The backend accepts a batch of source items and answers with one result
//! per item, each carrying the checker's message list. This module owns the
//! JSON shapes on both sides and the reduction of a structured response to
//! the simplified [`VerifierReply`] the classifier consumes.

use serde::{Deserialize, Serialize};

use proofpad_types::VerifierReply;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub source_items: Vec<SourceItem>,
    /// Always false: every submission gets a fresh check.
    pub reuse: bool,
}

impl CheckRequest {
    #[must_use]
    pub fn single(id: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            source_items: vec![SourceItem {
                id: id.into(),
                code: code.into(),
            }],
            reuse: false,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SourceItem {
    pub id: String,
    pub code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckResponse {
    #[serde(default)]
    pub results: Vec<ItemResult>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ItemResult {
    pub id: String,
    /// Checker-reported wall time in seconds.
    #[serde(default)]
    pub time: Option<f64>,
    #[serde(default)]
    pub response: CheckerOutput,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckerOutput {
    #[serde(default)]
    pub messages: Vec<CheckerMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckerMessage {
    pub severity: Severity,
    #[serde(default)]
    pub pos: Option<Position>,
    #[serde(default)]
    pub end_pos: Option<Position>,
    pub data: String,
}

impl CheckerMessage {
    /// Render as `"Line L, Col C: message"`, without the position prefix
    /// when the checker reported none.
    #[must_use]
    pub fn format(&self) -> String {
        match &self.pos {
            Some(pos) => format!("Line {}, Col {}: {}", pos.line, pos.column, self.data),
            None => self.data.clone(),
        }
    }
}

/// Message severity as reported by the checker. Severities this client does
/// not know about deserialize as `Other` instead of failing the whole reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// Reduce a structured response to the simplified reply shape.
///
/// `pass` is true iff no error-severity messages were reported. Error
/// messages are joined into one newline-separated string; warnings keep
/// their reported order as a list. Info and unknown severities are dropped
/// from the user-facing result but logged for diagnostics.
#[must_use]
pub fn reduce(response: &CheckResponse) -> VerifierReply {
    let mut errors: Vec<String> = Vec::new();
    let mut warnings: Vec<String> = Vec::new();

    for result in &response.results {
        for message in &result.response.messages {
            match message.severity {
                Severity::Error => errors.push(message.format()),
                Severity::Warning => warnings.push(message.format()),
                Severity::Info | Severity::Other => {
                    tracing::debug!(
                        item = %result.id,
                        severity = ?message.severity,
                        "Dropping non-actionable checker message: {}",
                        message.data
                    );
                }
            }
        }
    }

    VerifierReply {
        pass: errors.is_empty(),
        error: if errors.is_empty() {
            None
        } else {
            Some(errors.join("\n"))
        },
        warnings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(severity: Severity, pos: Option<(u32, u32)>, data: &str) -> CheckerMessage {
        CheckerMessage {
            severity,
            pos: pos.map(|(line, column)| Position { line, column }),
            end_pos: None,
            data: data.to_string(),
        }
    }

    fn response_with(messages: Vec<CheckerMessage>) -> CheckResponse {
        CheckResponse {
            results: vec![ItemResult {
                id: "item-0".to_string(),
                time: Some(0.42),
                response: CheckerOutput { messages },
            }],
        }
    }

    #[test]
    fn request_serializes_contract_field_names() {
        let request = CheckRequest::single("abc", "#check Nat");
        let json = serde_json::to_value(&request).expect("serialize");
        assert_eq!(json["sourceItems"][0]["id"], "abc");
        assert_eq!(json["sourceItems"][0]["code"], "#check Nat");
        assert_eq!(json["reuse"], false);
    }

    #[test]
    fn format_includes_position_when_present() {
        let with_pos = message(Severity::Error, Some((2, 4)), "unknown identifier");
        assert_eq!(with_pos.format(), "Line 2, Col 4: unknown identifier");

        let without_pos = message(Severity::Error, None, "unexpected end of input");
        assert_eq!(without_pos.format(), "unexpected end of input");
    }

    #[test]
    fn reduce_passes_clean_response() {
        let reply = reduce(&response_with(vec![message(
            Severity::Info,
            None,
            "compilation finished",
        )]));
        assert!(reply.pass);
        assert_eq!(reply.error, None);
        assert!(reply.warnings.is_empty());
    }

    #[test]
    fn reduce_joins_errors_and_keeps_warning_order() {
        let reply = reduce(&response_with(vec![
            message(Severity::Warning, Some((1, 1)), "declaration uses sorry"),
            message(Severity::Error, Some((2, 4)), "unknown identifier"),
            message(Severity::Error, None, "type mismatch"),
            message(Severity::Warning, None, "unused variable"),
        ]));

        assert!(!reply.pass);
        assert_eq!(
            reply.error.as_deref(),
            Some("Line 2, Col 4: unknown identifier\ntype mismatch")
        );
        assert_eq!(
            reply.warnings,
            vec![
                "Line 1, Col 1: declaration uses sorry".to_string(),
                "unused variable".to_string(),
            ]
        );
    }

    #[test]
    fn response_parsing_tolerates_missing_pos_and_unknown_severity() {
        let raw = r#"{
            "results": [{
                "id": "item-0",
                "time": 1.5,
                "response": {
                    "messages": [
                        {"severity": "trace", "data": "elaboration detail"},
                        {"severity": "warning", "pos": {"line": 3, "column": 7},
                         "endPos": {"line": 3, "column": 12}, "data": "unused variable"}
                    ]
                }
            }]
        }"#;

        let parsed: CheckResponse = serde_json::from_str(raw).expect("parse");
        let messages = &parsed.results[0].response.messages;
        assert_eq!(messages[0].severity, Severity::Other);
        assert!(messages[0].pos.is_none());
        assert_eq!(messages[1].severity, Severity::Warning);
        assert_eq!(messages[1].end_pos, Some(Position { line: 3, column: 12 }));
    }

    #[test]
    fn response_without_results_reduces_to_pass() {
        let parsed: CheckResponse = serde_json::from_str("{}").expect("parse");
        assert!(reduce(&parsed).pass);
    }
}
