//! Reply classification.
//!
//! Maps a checker reply (or a transport failure) to the terminal outcome
//! committed onto the history record. The rules are ordered: presence of any
//! error dominates, warnings without errors are a distinct terminal state,
//! and an explicit non-acceptance flag is the fallback for backends that
//! report failure without structured messages. Pure and deterministic.

use proofpad_client::ClientError;
use proofpad_types::{VerificationOutcome, VerifierReply};

/// Synthesized when the checker rejects a submission without supplying any
/// message. Keeps `errors` non-empty for every error outcome, which the rest
/// of the system relies on.
pub const GENERIC_FAILURE_MESSAGE: &str = "verification failed";

/// Classify a reply the transport layer delivered successfully.
#[must_use]
pub fn classify(reply: &VerifierReply) -> VerificationOutcome {
    let errors = reply
        .error
        .as_deref()
        .map(split_messages)
        .unwrap_or_default();
    let warnings = reply.warnings.clone();

    if !errors.is_empty() {
        return VerificationOutcome::error(errors, warnings);
    }
    if !warnings.is_empty() {
        return VerificationOutcome::warning(warnings);
    }
    if !reply.pass {
        return VerificationOutcome::error(vec![GENERIC_FAILURE_MESSAGE.to_string()], warnings);
    }
    VerificationOutcome::success()
}

/// Classify a failed transport call.
///
/// Checked before any reply parsing: there is no reply to inspect. The
/// message names the failure class so the user can tell a timeout from a
/// connection failure from a misconfiguration.
#[must_use]
pub fn classify_failure(err: &ClientError) -> VerificationOutcome {
    let message = match err {
        ClientError::Timeout { secs } => {
            format!("Request timed out: checker did not respond within {secs} seconds")
        }
        ClientError::Configuration(reason) => format!("Configuration error: {reason}"),
        ClientError::Connect { .. } => format!("Connection failed: {err}"),
        ClientError::Status { .. } | ClientError::Decode { .. } => {
            format!("Checker request failed: {err}")
        }
    };
    VerificationOutcome::error(vec![message], Vec::new())
}

/// The combined error string arrives newline-joined; split it back into the
/// per-message entries the record stores.
fn split_messages(combined: &str) -> Vec<String> {
    combined
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
