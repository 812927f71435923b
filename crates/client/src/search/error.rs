//! Search request error types.

use lookout_core::Error;

/// Invalid search parameters, rejected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// Empty or whitespace-only query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Page size outside 1-10.
    #[error("invalid page size {0}: must be 1-10")]
    InvalidPageSize(u8),

    /// Page number outside 1-100.
    #[error("invalid page {0}: must be 1-100")]
    InvalidPage(u8),
}

impl From<SearchError> for Error {
    fn from(err: SearchError) -> Self {
        Error::InvalidInput(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::InvalidQuery("query cannot be empty".to_string());
        assert!(err.to_string().contains("invalid query"));

        assert_eq!(SearchError::InvalidPage(0).to_string(), "invalid page 0: must be 1-100");
    }

    #[test]
    fn test_into_core_error() {
        let err: Error = SearchError::InvalidPageSize(11).into();
        assert!(matches!(err, Error::InvalidInput(ref msg) if msg.contains("1-10")));
    }
}
