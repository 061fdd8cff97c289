//! Core domain types for proofpad.
//!
//! This crate contains pure domain types with no IO, no async, and minimal
//! dependencies. Everything here can be used from any layer of the
//! application: the record a verification attempt produces, its status, the
//! simplified checker reply the classifier consumes, and the terminal
//! outcome that gets committed back onto a record.

mod ids;
mod record;
mod reply;

pub use ids::{RecordId, RecordIdParseError};
pub use record::{VerificationOutcome, VerificationRecord, VerificationStatus};
pub use reply::VerifierReply;
