//! Verification orchestration.
//!
//! [`Workbench`] drives one verification lifecycle end to end: allocate an
//! id, insert a pending record (which becomes the active selection), issue
//! the backend call, classify the reply, and commit the terminal outcome
//! onto the record with that id. The store and selection sit behind one
//! mutex that is never held across the network await, so any number of
//! verifications can be in flight at once; each addresses only its own
//! record.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use proofpad_client::VerifierClient;
use proofpad_types::{RecordId, VerificationRecord};

use crate::classify::{classify, classify_failure};
use crate::history::HistoryStore;
use crate::selection::{SelectionController, WorkingDraft};
use crate::titles;

#[derive(Debug)]
struct WorkbenchState {
    history: HistoryStore,
    selection: SelectionController,
}

#[derive(Debug)]
pub struct Workbench {
    client: VerifierClient,
    verifier_version: String,
    state: Mutex<WorkbenchState>,
    in_flight: AtomicUsize,
}

impl Workbench {
    /// Wire up a workbench over a loaded history.
    ///
    /// Applies the initial-load selection rule: with history present, the
    /// most recent record becomes active and its code is bound to the
    /// working draft.
    #[must_use]
    pub fn new(client: VerifierClient, verifier_version: impl Into<String>, history: HistoryStore) -> Self {
        let mut selection = SelectionController::default();
        selection.auto_select_latest(history.records());

        Self {
            client,
            verifier_version: verifier_version.into(),
            state: Mutex::new(WorkbenchState { history, selection }),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// True while at least one verification is awaiting the backend. The UI
    /// collaborator disables submission on this flag; correctness does not
    /// depend on it.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// Submit code for verification.
    ///
    /// Whitespace-only code is a no-op returning `None`. Otherwise exactly
    /// one record is created and exactly one terminal outcome is committed
    /// to it; every failure path ends in a committed error record rather
    /// than a propagated error. The returned id identifies the record the
    /// caller can observe for completion.
    pub async fn verify(&self, code: &str, title: &str) -> Option<RecordId> {
        let code = code.trim();
        if code.is_empty() {
            tracing::debug!("Ignoring verification request with empty code");
            return None;
        }

        let id = RecordId::generate();
        let title = resolve_title(title);
        let record = VerificationRecord::pending(id, code, title, &self.verifier_version);

        {
            let mut guard = self.lock_state();
            guard.selection.on_add(&record);
            guard.history.add(record);
        }

        let _busy = BusyGuard::enter(&self.in_flight);

        let outcome = match self.client.check(id, code).await {
            Ok(reply) => classify(&reply),
            Err(err) => {
                tracing::warn!(%id, class = err.failure_class(), "Check failed: {err}");
                classify_failure(&err)
            }
        };

        self.lock_state().history.complete(id, outcome);
        Some(id)
    }

    /// Make an existing record active and load it into the working draft.
    /// Returns false when the id is no longer present.
    pub fn select(&self, id: RecordId) -> bool {
        let mut guard = self.lock_state();
        let state = &mut *guard;
        match state.history.get(id) {
            Some(record) => {
                state.selection.on_select(record);
                true
            }
            None => {
                tracing::debug!(%id, "Ignoring selection of unknown record");
                false
            }
        }
    }

    /// Delete a record. Resets the selection when it was active. Idempotent.
    pub fn remove(&self, id: RecordId) -> bool {
        let mut guard = self.lock_state();
        let state = &mut *guard;
        let removed = state.history.remove(id);
        if removed {
            state.selection.on_remove(id);
        }
        removed
    }

    /// Delete the whole history and reset the selection.
    pub fn clear(&self) {
        let mut guard = self.lock_state();
        let state = &mut *guard;
        state.history.clear();
        state.selection.on_clear();
    }

    /// Drop the selection and reset the working draft to the template.
    pub fn new_draft(&self) {
        self.lock_state().selection.on_new_draft();
    }

    /// Snapshot of the ordered history, most recent first.
    #[must_use]
    pub fn records(&self) -> Vec<VerificationRecord> {
        self.lock_state().history.records().to_vec()
    }

    #[must_use]
    pub fn record(&self, id: RecordId) -> Option<VerificationRecord> {
        self.lock_state().history.get(id).cloned()
    }

    #[must_use]
    pub fn active(&self) -> Option<RecordId> {
        self.lock_state().selection.active()
    }

    #[must_use]
    pub fn working(&self) -> WorkingDraft {
        self.lock_state().selection.working().clone()
    }

    fn lock_state(&self) -> MutexGuard<'_, WorkbenchState> {
        // A poisoned lock only means another verification panicked between
        // two consistent mutations; the state itself is still usable.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn resolve_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        titles::generate()
    } else {
        trimmed.to_string()
    }
}

struct BusyGuard<'a> {
    counter: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self { counter }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}
