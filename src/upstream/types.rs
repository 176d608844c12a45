//! Upstream identifiers and error definitions.

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::contract::ContractError;

/// Upstream body text kept in error messages, in bytes.
pub const MAX_ERROR_BODY_BYTES: usize = 1024;

/// Which external system a call went to. Used in logs, metrics and messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Upstream {
    Cms,
    Catalog,
}

impl Upstream {
    pub fn as_str(self) -> &'static str {
        match self {
            Upstream::Cms => "cms",
            Upstream::Catalog => "catalog",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Upstream::Cms => "CMS",
            Upstream::Catalog => "Product service",
        }
    }
}

impl fmt::Display for Upstream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors that can occur while talking to an upstream.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// No endpoint configured and none supplied by the caller.
    #[error("Missing {0}")]
    MissingEndpoint(&'static str),

    /// Upstream answered with a non-2xx status.
    #[error("{upstream} request failed: {status} {body}")]
    Status {
        upstream: Upstream,
        status: StatusCode,
        body: String,
    },

    /// Upstream did not answer within the configured timeout.
    #[error("{upstream} request timed out after {secs} seconds")]
    Timeout { upstream: Upstream, secs: u64 },

    /// Connection, DNS or protocol failure before a status was received.
    #[error("{upstream} request failed: {source}")]
    Transport {
        upstream: Upstream,
        #[source]
        source: reqwest::Error,
    },

    /// 2xx body that is not JSON or does not have the documented shape.
    #[error("{upstream} response rejected: {source}")]
    Contract {
        upstream: Upstream,
        #[source]
        source: ContractError,
    },

    /// The shared HTTP client could not be built.
    #[error("HTTP client setup failed: {0}")]
    Client(#[source] reqwest::Error),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Cut `body` to at most `MAX_ERROR_BODY_BYTES` on a char boundary.
pub(crate) fn truncate_body(mut body: String) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body;
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body.truncate(end);
    body.push('…');
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = UpstreamError::Status {
            upstream: Upstream::Cms,
            status: StatusCode::SERVICE_UNAVAILABLE,
            body: "maintenance".into(),
        };
        assert_eq!(
            err.to_string(),
            "CMS request failed: 503 Service Unavailable maintenance"
        );

        let err = UpstreamError::Timeout {
            upstream: Upstream::Catalog,
            secs: 10,
        };
        assert_eq!(err.to_string(), "Product service request timed out after 10 seconds");
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short".into()), "short");

        let long = "é".repeat(MAX_ERROR_BODY_BYTES);
        let cut = truncate_body(long);
        assert!(cut.len() <= MAX_ERROR_BODY_BYTES + '…'.len_utf8());
        assert!(cut.ends_with('…'));
    }
}
