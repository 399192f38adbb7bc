use thiserror::Error;

/// Per-datagram failures. None of these stop the listener.
#[derive(Error, Debug)]
pub enum GoipError {
    /// Datagram did not match the grammar of its message kind
    #[error("{0}")]
    Format(String),

    /// Reply could not be sent back to the device
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),
}

impl GoipError {
    pub fn format(msg: impl Into<String>) -> Self {
        GoipError::Format(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, GoipError>;
