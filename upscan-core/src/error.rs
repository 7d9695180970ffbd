//! Errors a retrieval can end with.
//!
//! - [`Transport`] non-success status from the transactions endpoint.
//! - [`Connection`] the request could not be sent or the body could not be read.
//! - [`NoData`] a success response whose body is not a transactions page.
//! - [`InvalidAccount`] an account selection resolved to an unusable id.
//!
//! An empty result is not an error.
//!
//!  [`Transport`]: RetrievalError::Transport
//!  [`Connection`]: RetrievalError::Connection
//!  [`NoData`]: RetrievalError::NoData
//!  [`InvalidAccount`]: RetrievalError::InvalidAccount
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("transactions request failed with status {status}: {body}")]
    Transport { status: u16, body: String },
    #[error("transactions request could not complete: {0}")]
    Connection(String),
    #[error("response did not contain transaction data: {0}")]
    NoData(String),
    #[error("\"{0}\" has no account id configured")]
    InvalidAccount(String),
}

impl RetrievalError {
    /// Machine-readable reason for caller-level reporting
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Transport { .. } | Self::Connection(_) => "transport_error",
            Self::NoData(_) => "no_data",
            Self::InvalidAccount(_) => "invalid_account",
        }
    }

    /// HTTP status, when the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => Some(*status),
            _ => None,
        }
    }
}
