//! Custom error types for ChillMCP.
//!
//! The state engine itself cannot fail: every transition saturates at the
//! counter bounds. What remains is caller input validation and the MCP
//! transport, and each variant maps onto a JSON-RPC error code.

use thiserror::Error;

/// Main error type for ChillMCP operations
#[derive(Error, Debug)]
pub enum ChillError {
    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Caller supplied an argument outside its contract
    #[error("Invalid argument: {field} - {reason}")]
    InvalidArgument { field: String, reason: String },

    /// Requested tool is not in the catalog
    #[error("Unknown tool: {name}")]
    UnknownTool { name: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// Frame could not be decoded as JSON
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Frame decoded but is not a valid JSON-RPC request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Method is not served
    #[error("Method not found: {method}")]
    MethodNotFound { method: String },

    // =========================================================================
    // Wrapped Errors
    // =========================================================================
    /// IO error wrapper
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON error wrapper
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Generic error wrapper
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChillError {
    // =========================================================================
    // Constructor helpers
    // =========================================================================

    /// Create an invalid argument error
    pub fn invalid_argument(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown tool error
    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool { name: name.into() }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// Create a method-not-found error
    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound {
            method: method.into(),
        }
    }

    // =========================================================================
    // Classification helpers
    // =========================================================================

    /// Check if the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Io(_) | Self::Other(_))
    }

    /// JSON-RPC 2.0 error code for this error
    pub fn json_rpc_code(&self) -> i64 {
        match self {
            Self::Parse { .. } => -32700,
            Self::InvalidRequest { .. } => -32600,
            Self::MethodNotFound { .. } => -32601,
            Self::InvalidArgument { .. } | Self::UnknownTool { .. } | Self::Json(_) => -32602,
            Self::Io(_) | Self::Other(_) => -32603,
        }
    }
}

/// Type alias for ChillMCP results
pub type Result<T> = std::result::Result<T, ChillError>;
