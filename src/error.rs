//! Error handling for the capture adapter
//!
//! This module defines the error taxonomy and a Result alias for use
//! throughout the crate. The session-establishment errors (`Connection`,
//! `FamilyNotFound`, `Configuration`) are fatal to `open()`; everything
//! raised during a read cycle (`Allocation`, `Send`, `Receive`, `Framing`)
//! is recoverable and is surfaced to the host only as a zero-sample cycle.

use thiserror::Error;

/// Main error type for capture operations
#[derive(Error, Debug)]
pub enum NovacapError {
    /// Socket allocation or generic-netlink handshake failed
    #[error("Connection error: {0}")]
    Connection(String),

    /// The device family is not registered with the kernel bus
    #[error("Family '{0}' not found (is the FPGA driver loaded?)")]
    FamilyNotFound(String),

    /// Socket configuration (receive-buffer sizing) failed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// An outbound request could not be constructed
    #[error("Allocation error: {0}")]
    Allocation(String),

    /// The transport rejected an outbound request
    #[error("Send error: {0}")]
    Send(String),

    /// Transport-level receive failure
    #[error("Receive error: {0}")]
    Receive(String),

    /// A response payload violated the fixed framing-size contract
    #[error("Framing error: expected {expected} bytes, received {actual}")]
    Framing { expected: usize, actual: usize },

    /// Errors related to settings loading/saving
    #[error("Config error: {0}")]
    Config(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<NovacapError>,
    },
}

impl NovacapError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        NovacapError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Whether the error is fatal to session establishment
    ///
    /// Fatal errors mean the adapter must not be used afterward; per-cycle
    /// errors mean "produced no samples this cycle, try again next poll".
    pub fn is_fatal(&self) -> bool {
        match self {
            NovacapError::Connection(_)
            | NovacapError::FamilyNotFound(_)
            | NovacapError::Configuration(_) => true,
            NovacapError::WithContext { source, .. } => source.is_fatal(),
            _ => false,
        }
    }
}

/// Result type alias for capture operations
pub type Result<T> = std::result::Result<T, NovacapError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.with_context(f()))
    }
}
