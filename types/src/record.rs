//! Verification records and their terminal outcomes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::RecordId;

/// Lifecycle status of a verification attempt.
///
/// A record starts `Pending` and transitions exactly once to one of the
/// three terminal states. There are no transitions out of a terminal state;
/// a retry is a new record with a new id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Success,
    Error,
    Warning,
}

impl VerificationStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VerificationStatus::Pending => "pending",
            VerificationStatus::Success => "success",
            VerificationStatus::Error => "error",
            VerificationStatus::Warning => "warning",
        }
    }

    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, VerificationStatus::Pending)
    }
}

/// One verification attempt and its outcome, as persisted in history.
///
/// `id`, `code`, and `timestamp` are immutable after creation; `status`,
/// `errors`, and `warnings` are written exactly once by the classification
/// commit. Edits to the working code produce a new record, never a mutation
/// of an existing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRecord {
    pub id: RecordId,
    pub code: String,
    pub title: String,
    pub status: VerificationStatus,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub verifier_version: String,
}

impl VerificationRecord {
    /// Create a fresh pending record at the current instant.
    #[must_use]
    pub fn pending(
        id: RecordId,
        code: impl Into<String>,
        title: impl Into<String>,
        verifier_version: impl Into<String>,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            title: title.into(),
            status: VerificationStatus::Pending,
            errors: Vec::new(),
            warnings: Vec::new(),
            timestamp: Utc::now(),
            verifier_version: verifier_version.into(),
        }
    }
}

/// Terminal classification result committed onto a pending record.
///
/// Only these fields change on commit; id, code, title, and timestamp are
/// untouched. The constructors uphold the message/status invariant: an
/// `Error` outcome always carries at least one error message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationOutcome {
    pub status: VerificationStatus,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl VerificationOutcome {
    #[must_use]
    pub fn success() -> Self {
        Self {
            status: VerificationStatus::Success,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// An error outcome. `errors` must be non-empty; callers that have no
    /// structured message supply a synthesized one.
    #[must_use]
    pub fn error(errors: Vec<String>, warnings: Vec<String>) -> Self {
        debug_assert!(!errors.is_empty(), "error outcome requires a message");
        Self {
            status: VerificationStatus::Error,
            errors,
            warnings,
        }
    }

    #[must_use]
    pub fn warning(warnings: Vec<String>) -> Self {
        Self {
            status: VerificationStatus::Warning,
            errors: Vec::new(),
            warnings,
        }
    }
}
