//! Error types for the coin dashboard client

use thiserror::Error;

/// Errors that can occur when calling the dashboard service
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// Service answered with a non-success HTTP status
    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Response body could not be understood
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Service answered `success: false`
    #[error("Request rejected: {}", .0.as_deref().unwrap_or("no reason given"))]
    Rejected(Option<String>),
}

impl ApiError {
    /// Creates an InvalidResponse error
    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Creates a Rejected error carrying the service's message, if any
    pub fn rejected(msg: Option<String>) -> Self {
        Self::Rejected(msg.filter(|m| !m.trim().is_empty()))
    }

    /// The message the service itself returned, if any
    pub fn service_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected(Some(msg)) => Some(msg),
            _ => None,
        }
    }
}

/// Errors raised by client-side validation before any request is made
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DashboardError {
    /// Conversion amount is empty, non-numeric, non-finite or not positive
    #[error("Invalid amount: {0:?}")]
    InvalidAmount(String),

    /// Coin search was triggered with nothing to search for
    #[error("Search query is empty")]
    EmptySearchQuery,

    /// Picker was asked to select an id it does not list
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    /// Search result index out of range
    #[error("No search result at position {0}")]
    UnknownSearchResult(usize),

    /// Preference file could not be read or written
    #[error("Preference storage error: {0}")]
    Preferences(String),
}

impl DashboardError {
    /// Creates an InvalidAmount error
    pub fn invalid_amount(raw: &str) -> Self {
        Self::InvalidAmount(raw.to_string())
    }

    /// Creates a Preferences error
    pub fn preferences(msg: impl Into<String>) -> Self {
        Self::Preferences(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_drops_blank_message() {
        assert_eq!(ApiError::rejected(Some("  ".into())).service_message(), None);
        assert_eq!(
            ApiError::rejected(Some("bad code".into())).service_message(),
            Some("bad code")
        );
    }

    #[test]
    fn test_display() {
        let err = ApiError::HttpStatus {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "HTTP 502: bad gateway");
        assert_eq!(
            ApiError::Rejected(None).to_string(),
            "Request rejected: no reason given"
        );
    }
}
