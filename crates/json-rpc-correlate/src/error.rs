use std::fmt;
use thiserror::Error;

use crate::error_codes::{SERVER_ERROR_END, SERVER_ERROR_START};

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => -32700,
            JsonRpcErrorCode::InvalidRequest => -32600,
            JsonRpcErrorCode::MethodNotFound => -32601,
            JsonRpcErrorCode::InvalidParams => -32602,
            JsonRpcErrorCode::InternalError => -32603,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// Every failure this crate reports.
///
/// The protocol variants carry a wire code (see [`JsonRpcError::error_code`]).
/// `InvalidArgument` signals caller misuse and has no wire representation of
/// its own; it should be propagated, not turned into a response.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonRpcError {
    #[error("Parse error")]
    ParseError,

    #[error("Invalid Request")]
    InvalidRequest,

    #[error("Method not found")]
    MethodNotFound,

    #[error("Invalid params")]
    InvalidParams,

    #[error("Internal error")]
    InternalError,

    #[error("{message}")]
    ServerError { code: i64, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl JsonRpcError {
    pub fn invalid_argument(reason: impl Into<String>) -> Self {
        JsonRpcError::InvalidArgument(reason.into())
    }

    /// Build an application-defined error. The code must fall in the
    /// reserved server range -32099..=-32000.
    pub fn server_error(code: i64, message: impl Into<String>) -> Result<Self, JsonRpcError> {
        if !(SERVER_ERROR_START..=SERVER_ERROR_END).contains(&code) {
            return Err(JsonRpcError::invalid_argument(format!(
                "server error code {} outside {}..={}",
                code, SERVER_ERROR_START, SERVER_ERROR_END
            )));
        }
        Ok(JsonRpcError::ServerError {
            code,
            message: message.into(),
        })
    }

    /// The wire code for protocol errors, `None` for argument errors.
    pub fn error_code(&self) -> Option<JsonRpcErrorCode> {
        match self {
            JsonRpcError::ParseError => Some(JsonRpcErrorCode::ParseError),
            JsonRpcError::InvalidRequest => Some(JsonRpcErrorCode::InvalidRequest),
            JsonRpcError::MethodNotFound => Some(JsonRpcErrorCode::MethodNotFound),
            JsonRpcError::InvalidParams => Some(JsonRpcErrorCode::InvalidParams),
            JsonRpcError::InternalError => Some(JsonRpcErrorCode::InternalError),
            JsonRpcError::ServerError { code, .. } => Some(JsonRpcErrorCode::ServerError(*code)),
            JsonRpcError::InvalidArgument(_) => None,
        }
    }

    /// Faults caused by the client's wire text (malformed JSON or a
    /// non-conforming request shape).
    pub fn is_client_fault(&self) -> bool {
        matches!(self, JsonRpcError::ParseError | JsonRpcError::InvalidRequest)
    }

    /// Value objects built from wire text fail with `InvalidArgument`; seen
    /// from the protocol that is a malformed request.
    pub(crate) fn into_client_fault(self) -> Self {
        match self {
            JsonRpcError::InvalidArgument(_) => JsonRpcError::InvalidRequest,
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcErrorCode::ParseError.code(), -32700);
        assert_eq!(JsonRpcErrorCode::MethodNotFound.code(), -32601);
        assert_eq!(JsonRpcErrorCode::ServerError(-32001).message(), "Server error");
    }

    #[test]
    fn test_error_messages_match_wire_messages() {
        assert_eq!(JsonRpcError::ParseError.to_string(), "Parse error");
        assert_eq!(JsonRpcError::InvalidRequest.to_string(), "Invalid Request");
        assert_eq!(
            JsonRpcError::MethodNotFound.error_code().map(|c| c.code()),
            Some(-32601)
        );
        assert_eq!(JsonRpcError::invalid_argument("bad").error_code(), None);
    }

    #[test]
    fn test_server_error_range() {
        let error = JsonRpcError::server_error(-32000, "Server error").unwrap();
        assert_eq!(error.error_code(), Some(JsonRpcErrorCode::ServerError(-32000)));

        assert!(matches!(
            JsonRpcError::server_error(-32100, "out of range"),
            Err(JsonRpcError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_client_fault_classification() {
        assert!(JsonRpcError::ParseError.is_client_fault());
        assert!(JsonRpcError::InvalidRequest.is_client_fault());
        assert!(!JsonRpcError::MethodNotFound.is_client_fault());
        assert_eq!(
            JsonRpcError::invalid_argument("id").into_client_fault(),
            JsonRpcError::InvalidRequest
        );
        assert_eq!(
            JsonRpcError::ParseError.into_client_fault(),
            JsonRpcError::ParseError
        );
    }
}
