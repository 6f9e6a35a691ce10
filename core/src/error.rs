//! Error types for the accounts API client.
//!
//! # Design
//! A single closed enum covers every failure, ordered from the transport side
//! (`BuildUrl`, `RequestConstruction`, `Transport`, `ReadBody`) through payload
//! handling (`Encode`, `Decode`) to the domain outcomes mapped from status
//! codes. Variants that have an underlying cause expose it through
//! `std::error::Error::source`, so callers can match on the variant and still
//! inspect the underlying failure.

use thiserror::Error;

use crate::http::TransportError;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by `Endpoint` and `AccountClient`.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A path or query parameter could not be turned into a URL fragment.
    #[error("error building url: {0}")]
    BuildUrl(#[source] ParamError),

    /// The resolved URL could not form a request.
    #[error("error creating http request for {url:?}: {source}")]
    RequestConstruction {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// The transport failed before a response was received.
    #[error("error doing http request: {0}")]
    Transport(#[source] TransportError),

    /// The response arrived but its body could not be read.
    #[error("error reading response body: {0}")]
    ReadBody(#[source] std::io::Error),

    /// The request payload could not be serialized to JSON.
    #[error("error serializing request: {0}")]
    Encode(#[source] serde_json::Error),

    /// A successful response carried a body that is not a valid account.
    #[error("error unmarshalling response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The caller supplied arguments that cannot form a valid request.
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),

    /// The server returned 400; `body` holds its validation details.
    #[error("account bad request: {body}")]
    BadRequest { body: String },

    /// The server returned 404.
    #[error("account not found")]
    NotFound,

    /// The server returned 409, usually a version mismatch on delete.
    #[error("account conflict with version")]
    Conflict,

    /// Any other status at or above 300.
    #[error("unexpected response status code {status}")]
    UnexpectedStatus { status: u16 },
}

/// Why a parameter value could not be rendered into the URL.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    #[error("unsupported parameter type {kind} for {key:?}")]
    UnsupportedType { key: String, kind: &'static str },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn bad_request_display_includes_body() {
        let err = ApiError::BadRequest {
            body: "invalid iban".to_string(),
        };
        assert_eq!(err.to_string(), "account bad request: invalid iban");
    }

    #[test]
    fn unexpected_status_display_includes_code() {
        let err = ApiError::UnexpectedStatus { status: 503 };
        assert_eq!(err.to_string(), "unexpected response status code 503");
    }

    #[test]
    fn wrapped_errors_expose_their_cause() {
        let err = ApiError::Transport("connection refused".into());
        assert_eq!(err.source().unwrap().to_string(), "connection refused");

        let err = ApiError::BuildUrl(ParamError::UnsupportedType {
            key: "id".to_string(),
            kind: "null",
        });
        assert_eq!(
            err.source().unwrap().to_string(),
            "unsupported parameter type null for \"id\""
        );
    }

    #[test]
    fn domain_errors_have_no_source() {
        assert!(ApiError::NotFound.source().is_none());
        assert!(ApiError::Conflict.source().is_none());
    }
}
