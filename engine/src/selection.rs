//! Active-record selection and the editable working draft.
//!
//! The controller holds at most one active record id - a non-owning
//! back-reference into the history store - plus the code/title the editor
//! collaborator is currently working on. Deleting the active record or
//! clearing the history resets both to the default template. Lookups into
//! the store are the caller's job; this type only reacts to resolved
//! records, so a stale id can never be dereferenced here.

use proofpad_types::{RecordId, VerificationRecord};

/// Starting point loaded into the editor when nothing is selected.
pub const DEFAULT_TEMPLATE: &str = "-- Prove something small to get started.\n\
theorem two_eq_two : 2 = 2 := by\n  rfl\n";

/// Code and title currently bound to the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingDraft {
    pub code: String,
    pub title: String,
}

impl Default for WorkingDraft {
    fn default() -> Self {
        Self {
            code: DEFAULT_TEMPLATE.to_string(),
            title: String::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    active: Option<RecordId>,
    working: WorkingDraft,
}

impl SelectionController {
    #[must_use]
    pub fn active(&self) -> Option<RecordId> {
        self.active
    }

    #[must_use]
    pub fn working(&self) -> &WorkingDraft {
        &self.working
    }

    /// A freshly created record becomes active and keeps the editor bound to
    /// the code just submitted.
    pub fn on_add(&mut self, record: &VerificationRecord) {
        self.active = Some(record.id);
        self.working = WorkingDraft {
            code: record.code.clone(),
            title: record.title.clone(),
        };
    }

    /// Bind the editor to an existing record.
    pub fn on_select(&mut self, record: &VerificationRecord) {
        self.on_add(record);
    }

    /// React to a deletion. Only resets when the deleted record was active.
    pub fn on_remove(&mut self, id: RecordId) {
        if self.active == Some(id) {
            self.reset();
        }
    }

    /// React to clear-all.
    pub fn on_clear(&mut self) {
        self.reset();
    }

    /// Start a new draft: no selection, template code.
    pub fn on_new_draft(&mut self) {
        self.reset();
    }

    /// Initial-load rule: with history present and nothing selected yet, the
    /// most recent record becomes active.
    pub fn auto_select_latest(&mut self, records: &[VerificationRecord]) {
        if self.active.is_none()
            && let Some(latest) = records.first()
        {
            self.on_select(latest);
        }
    }

    fn reset(&mut self) {
        self.active = None;
        self.working = WorkingDraft::default();
    }
}
