//! Error types for Tilia client operations.
//!
//! Only failures below the wire protocol are errors. A well-formed envelope
//! with `status: "Failed"` is still a successful call and is delivered as an
//! [`ApiResponse`](crate::entities::ApiResponse) whose `failed()` flag is set.

/// Stable numeric codes, suitable for crossing an FFI boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum TiliaErrorCode {
    /// Feature not compiled in
    Unimplemented = 1000,
    /// Transport/network layer error
    Transport = 2000,
    /// Connection failed
    ConnectionFailed = 2001,
    /// Connection timeout
    ConnectionTimeout = 2002,
    /// Token exchange failed
    Auth = 3000,
    /// Response body was not valid JSON
    Decode = 4000,
    /// Invalid request data
    InvalidData = 5000,
    /// Invalid client configuration
    InvalidConfig = 5001,
    /// Internal/unexpected error
    Internal = 9999,
}

/// Error type for Tilia client operations.
#[derive(Debug, thiserror::Error)]
pub enum TiliaError {
    /// Feature not compiled into this build.
    #[error("{0} is not implemented in this build")]
    Unimplemented(&'static str),

    /// Transport/network layer error.
    #[error("transport error: {0}")]
    Transport(String),

    /// Connection could not be established.
    #[error("connection to {target} failed: {reason}")]
    ConnectionFailed {
        /// Target URL
        target: String,
        /// Underlying error message
        reason: String,
    },

    /// Request did not complete in time.
    #[error("{operation} timed out after {timeout_ms}ms")]
    ConnectionTimeout {
        /// Operation that timed out
        operation: String,
        /// Timeout duration in milliseconds
        timeout_ms: u64,
    },

    /// The client-credentials exchange did not yield a usable token.
    #[error("authentication error: {0}")]
    Auth(String),

    /// A response body could not be parsed as JSON.
    #[error("undecodable response (HTTP {status}): {reason}")]
    Decode {
        /// Transport status code of the response
        status: u16,
        /// Parser error message
        reason: String,
    },

    /// Invalid data provided by the caller.
    #[error("invalid {field}: {reason}")]
    InvalidData {
        /// Field or parameter name
        field: String,
        /// Reason for invalidity
        reason: String,
    },

    /// Client configuration is incomplete.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Internal/unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl TiliaError {
    /// Get the numeric error code.
    pub fn code(&self) -> TiliaErrorCode {
        match self {
            Self::Unimplemented(_) => TiliaErrorCode::Unimplemented,
            Self::Transport(_) => TiliaErrorCode::Transport,
            Self::ConnectionFailed { .. } => TiliaErrorCode::ConnectionFailed,
            Self::ConnectionTimeout { .. } => TiliaErrorCode::ConnectionTimeout,
            Self::Auth(_) => TiliaErrorCode::Auth,
            Self::Decode { .. } => TiliaErrorCode::Decode,
            Self::InvalidData { .. } => TiliaErrorCode::InvalidData,
            Self::InvalidConfig(_) => TiliaErrorCode::InvalidConfig,
            Self::Internal(_) => TiliaErrorCode::Internal,
        }
    }

    /// Returns true if re-issuing the same call may succeed.
    ///
    /// The library never retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ConnectionFailed { .. } | Self::ConnectionTimeout { .. }
        )
    }

    /// Create a transport error from any error type.
    pub fn transport<E: std::error::Error>(err: E) -> Self {
        Self::Transport(err.to_string())
    }

    /// Create an invalid data error.
    pub fn invalid_data(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidData {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for TiliaError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_data("body", err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = TiliaError::ConnectionTimeout {
            operation: "GET invoice".to_string(),
            timeout_ms: 30_000,
        };
        assert_eq!(err.code(), TiliaErrorCode::ConnectionTimeout);
        assert!(err.is_retryable());

        let err = TiliaError::Decode {
            status: 200,
            reason: "expected value".to_string(),
        };
        assert_eq!(err.code(), TiliaErrorCode::Decode);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = TiliaError::Decode {
            status: 502,
            reason: "EOF while parsing".to_string(),
        };
        assert!(err.to_string().contains("HTTP 502"));

        let err = TiliaError::Auth("token exchange failed".to_string());
        assert!(err.to_string().starts_with("authentication error"));
    }

    #[test]
    fn test_helper_constructors() {
        let err = TiliaError::invalid_data("amount", "must be positive");
        assert_eq!(err.code(), TiliaErrorCode::InvalidData);
        assert_eq!(err.to_string(), "invalid amount: must be positive");
    }
}
