//! Verification orchestration and history for proofpad.
//!
//! This crate is the core of the application: the state machine that tracks
//! an in-flight verification, the classification of checker replies into
//! terminal outcomes, and the durable history store the editor collaborator
//! renders from.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`history`] | Ordered record store with a persisted JSON slot |
//! | [`classify`] | Reply and transport-failure classification |
//! | [`selection`] | Active record tracking and the working draft |
//! | [`titles`] | Generated adjective-noun display titles |
//! | [`workbench`] | The orchestrator tying the pieces together |

mod atomic_write;
pub mod classify;
pub mod history;
pub mod selection;
pub mod titles;
pub mod workbench;

pub use classify::{GENERIC_FAILURE_MESSAGE, classify, classify_failure};
pub use history::HistoryStore;
pub use selection::{DEFAULT_TEMPLATE, SelectionController, WorkingDraft};
pub use workbench::Workbench;

pub use proofpad_types as types;
