//! Durable, ordered verification history.
//!
//! The store owns the collection outright: one in-memory sequence in strict
//! reverse-chronological creation order, mirrored to a single JSON slot on
//! disk after every mutation. Completion never reorders; a record finishes
//! wherever it was inserted. All mutations address records by id, never by
//! position, so concurrent in-flight verifications cannot cross-update each
//! other's records.
//!
//! Each write replaces the whole slot, so within a process the last mutation
//! wins. Writers in other processes are not coordinated and may race.

use std::path::PathBuf;

use proofpad_types::{RecordId, VerificationOutcome, VerificationRecord};

use crate::atomic_write::atomic_write;

#[derive(Debug)]
pub struct HistoryStore {
    path: PathBuf,
    /// Most recent first.
    records: Vec<VerificationRecord>,
}

impl HistoryStore {
    /// Load persisted history from the given slot.
    ///
    /// Called once at startup. A missing file is an empty history; an
    /// unreadable or unparseable one is logged and treated as empty. Neither
    /// case prevents the application from starting.
    #[must_use]
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let records = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<VerificationRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        "Persisted history is corrupt, starting empty: {e}"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    "Failed to read persisted history, starting empty: {e}"
                );
                Vec::new()
            }
        };

        Self { path, records }
    }

    /// Ordered view, most recent first.
    #[must_use]
    pub fn records(&self) -> &[VerificationRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Point lookup by id. No side effects.
    #[must_use]
    pub fn get(&self, id: RecordId) -> Option<&VerificationRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Prepend a new record and persist.
    pub fn add(&mut self, record: VerificationRecord) {
        if self.get(record.id).is_some() {
            tracing::warn!(id = %record.id, "Refusing to add record with duplicate id");
            return;
        }
        self.records.insert(0, record);
        self.persist();
    }

    /// Commit a terminal outcome onto the matching record and persist.
    ///
    /// Only `status`, `errors`, and `warnings` change; id, code, title, and
    /// timestamp are untouched. A record that already reached a terminal
    /// state is left as-is: the pending-to-terminal transition happens at
    /// most once. Returns false when nothing was updated.
    pub fn complete(&mut self, id: RecordId, outcome: VerificationOutcome) -> bool {
        let Some(record) = self.records.iter_mut().find(|record| record.id == id) else {
            tracing::warn!(%id, "Ignoring completion for unknown record");
            return false;
        };

        if record.status.is_terminal() {
            tracing::warn!(
                %id,
                status = record.status.as_str(),
                "Ignoring completion for already-terminal record"
            );
            return false;
        }

        record.status = outcome.status;
        record.errors = outcome.errors;
        record.warnings = outcome.warnings;
        self.persist();
        true
    }

    /// Delete the record with the given id and persist. Idempotent.
    pub fn remove(&mut self, id: RecordId) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        if self.records.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Empty the history and persist.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
    }

    /// Serialize the whole sequence to the slot.
    ///
    /// In-memory state stays authoritative for the session even when the
    /// write fails; failures are logged, never propagated.
    fn persist(&self) {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!(path = %parent.display(), "Failed to create history dir: {e}");
            return;
        }

        let bytes = match serde_json::to_vec_pretty(&self.records) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize history: {e}");
                return;
            }
        };

        if let Err(e) = atomic_write(&self.path, &bytes) {
            tracing::warn!(path = %self.path.display(), "Failed to persist history: {e}");
        }
    }
}
