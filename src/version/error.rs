use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionError {
    /// A field passed to a constructor is out of range or would not survive
    /// the canonical form.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// Text that does not decompose into at least `major.minor`.
    #[error("malformed version string {input:?}: {reason}")]
    MalformedString { input: String, reason: &'static str },
}

impl VersionError {
    pub(super) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub(super) fn malformed(input: &str, reason: &'static str) -> Self {
        Self::MalformedString {
            input: input.to_string(),
            reason,
        }
    }
}
