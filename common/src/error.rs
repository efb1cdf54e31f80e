use thiserror::Error;

/// Rejected user input. Raised before any packet leaves the machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("target host cannot be empty")]
    EmptyHost,

    #[error("invalid target host '{0}'")]
    InvalidHost(String),

    #[error("invalid port '{0}': expected an integer between 0 and 65535")]
    InvalidPort(String),

    #[error("start port {start} is greater than end port {end}")]
    InvertedRange { start: u16, end: u16 },

    #[error("could not resolve host '{host}': {reason}")]
    Unresolvable { host: String, reason: String },
}
