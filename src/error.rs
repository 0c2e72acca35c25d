// Page Errors
//
// Failures a page loader can run into. All of them end at the loader
// boundary and become a user-facing fragment; nothing is retried.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    /// The gateway answered with a non-2xx status.
    #[error("Gateway returned status {status}")]
    Gateway { status: u16 },

    /// No response at all (connection refused, DNS, reset).
    #[error("Network error: {0}")]
    Network(String),

    /// The body is not JSON, or the envelope/data is not what the page needs.
    #[error("Unexpected response shape: {0}")]
    Shape(String),
}

impl PageError {
    pub fn shape(detail: impl Into<String>) -> Self {
        PageError::Shape(detail.into())
    }

    pub fn is_shape(&self) -> bool {
        matches!(self, PageError::Shape(_))
    }
}

impl From<serde_json::Error> for PageError {
    fn from(err: serde_json::Error) -> Self {
        PageError::Shape(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_from_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let page_err = PageError::from(err);
        assert!(page_err.is_shape());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            PageError::Gateway { status: 502 }.to_string(),
            "Gateway returned status 502"
        );
        assert!(!PageError::Network("refused".into()).is_shape());
    }
}
