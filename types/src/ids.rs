use std::fmt;

use uuid::Uuid;

/// Opaque identifier of one verification attempt.
///
/// Generated at submission time and never reused; history mutations address
/// records by this id, never by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

#[derive(Debug, thiserror::Error)]
#[error("invalid record id: {0}")]
pub struct RecordIdParseError(#[from] uuid::Error);

impl RecordId {
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn parse(raw: &str) -> Result<Self, RecordIdParseError> {
        Ok(Self(Uuid::parse_str(raw.trim())?))
    }

    #[must_use]
    pub fn value(self) -> Uuid {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
