/// Convenience result type used across keyra.
pub type KeyraResult<T> = Result<T, KeyraError>;

/// Top-level error taxonomy used by keyer APIs.
#[derive(thiserror::Error, Debug)]
pub enum KeyraError {
    /// Invalid configuration or a violated buffer contract.
    #[error("validation error: {0}")]
    Validation(String),

    /// A host display-surface operation failed (sizing, sampling, presenting).
    #[error("surface error: {0}")]
    Surface(String),

    /// Wrapped lower-level error from a host implementation.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeyraError {
    /// Build a [`KeyraError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeyraError::Surface`] value.
    pub fn surface(msg: impl Into<String>) -> Self {
        Self::Surface(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_category_and_message() {
        let e = KeyraError::validation("tolerance must be >= 0");
        assert_eq!(e.to_string(), "validation error: tolerance must be >= 0");

        let e = KeyraError::surface("backing store lost");
        assert_eq!(e.to_string(), "surface error: backing store lost");
    }

    #[test]
    fn wraps_anyhow_transparently() {
        let e: KeyraError = anyhow::anyhow!("context lost").into();
        assert_eq!(e.to_string(), "context lost");
    }
}
