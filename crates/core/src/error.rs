#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Boxed backend error carried by collaborator failures.
pub type BackendError = Box<dyn std::error::Error + Send + Sync>;

/// A catalog (or store/language directory) query failed.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("catalog query failed: {0}")]
    Backend(#[source] BackendError),
}

impl CatalogError {
    pub fn backend(err: impl Into<BackendError>) -> Self {
        Self::Backend(err.into())
    }
}

/// The search index could not answer a query.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The index could not be reached or answered with a failure status.
    #[error("search index unavailable: {0}")]
    Unavailable(String),

    /// The index answered but the body could not be decoded.
    #[error("unexpected search index response: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display() {
        let err = CoreError::Validation("q is too long".to_string());
        assert_eq!(err.to_string(), "Validation failed: q is too long");
    }

    #[test]
    fn catalog_error_keeps_source() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = CatalogError::backend(inner);
        assert_eq!(err.to_string(), "catalog query failed: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }
}
