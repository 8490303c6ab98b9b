//! Aviation client error types.
//!
//! Every failure of a single tool invocation is one of these. None of them
//! are fatal: the tool layer turns them into structured error results.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while validating input or talking to the provider.
#[derive(Error, Diagnostic, Debug)]
pub enum AviationError {
    #[error("Invalid argument: {message}")]
    #[diagnostic(code(aviation_stack_mcp::aviation::invalid_argument))]
    InvalidArgument { message: String },

    #[error("{}", upstream_message(*status, message))]
    #[diagnostic(
        code(aviation_stack_mcp::aviation::upstream),
        help("Check AVIATION_STACK_API_KEY and the provider status page.")
    )]
    Upstream { status: Option<u16>, message: String },

    #[error("Malformed provider response: {message}")]
    #[diagnostic(code(aviation_stack_mcp::aviation::parse))]
    Parse { message: String },
}

fn upstream_message(status: Option<u16>, message: &str) -> String {
    match status {
        Some(status) => format!("Upstream error ({status}): {message}"),
        None => format!("Upstream error: {message}"),
    }
}

impl AviationError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind, surfaced in tool error payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } => "invalid_argument",
            Self::Upstream { .. } => "upstream_error",
            Self::Parse { .. } => "parse_error",
        }
    }

    /// HTTP status reported by the provider, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AviationError {
    fn from(e: serde_json::Error) -> Self {
        AviationError::Parse {
            message: e.to_string(),
        }
    }
}

/// Result type for aviation operations.
pub type AviationResult<T> = Result<T, AviationError>;
