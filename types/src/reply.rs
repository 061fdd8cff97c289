/// Simplified checker reply consumed by the classifier.
///
/// The transport layer reduces the backend's structured message list to this
/// shape: `pass` is true when no error-severity messages were reported,
/// `error` is the combined newline-joined error text (if any), and
/// `warnings` keeps the warning messages in the backend's reported order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifierReply {
    pub pass: bool,
    pub error: Option<String>,
    pub warnings: Vec<String>,
}

impl VerifierReply {
    #[must_use]
    pub fn accepted() -> Self {
        Self {
            pass: true,
            error: None,
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            pass: false,
            error: Some(error.into()),
            warnings: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings = warnings;
        self
    }
}
