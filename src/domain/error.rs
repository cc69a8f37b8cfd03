use thiserror::Error;

/// Caller input violating a documented constraint. Only the first failing field is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid `{name}`: {reason}")]
    InvalidField { name: &'static str, reason: String },
}

impl ValidationError {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            name,
            reason: reason.into(),
        }
    }

    pub fn field(&self) -> &'static str {
        match self {
            Self::InvalidField { name, .. } => name,
        }
    }
}
