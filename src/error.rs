use std::fmt;

use thiserror::Error;

/// Broad classification of a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The bytes do not follow the DHCP wire format.
    Malformed,
    /// Reading the packet from its source failed.
    Io,
    /// The packet source could not be turned into bytes (bad hex text).
    Input,
    /// Invalid configuration value.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed"),
            Self::Io => write!(f, "io"),
            Self::Input => write!(f, "input"),
            Self::Config => write!(f, "config"),
        }
    }
}

/// Structural violations found while decoding a DHCP packet.
///
/// Offsets are absolute positions in the buffer handed to the parser.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("buffer too short for fixed header: need {expected} bytes, got {actual}")]
    HeaderTooShort { expected: usize, actual: usize },

    #[error("magic cookie not found: expected 63 82 53 63, found {found:02x?}")]
    BadMagicCookie { found: [u8; 4] },

    #[error("option {tag} at offset {offset} has no length byte")]
    OptionLengthMissing { offset: usize, tag: u8 },

    #[error(
        "option payload exceeds buffer: option {tag} at offset {offset} declares {length} bytes, {available} available"
    )]
    OptionOverrun {
        offset: usize,
        tag: u8,
        length: usize,
        available: usize,
    },

    #[error("invalid option overload value {value:02x?}")]
    OverloadInvalid { value: Vec<u8> },
}

impl ParseError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Malformed
    }
}

/// Errors for callers that read packets from files or text before parsing.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Malformed packet: {0}")]
    Malformed(#[from] ParseError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid hex input at position {position}: {message}")]
    InvalidHex { position: usize, message: String },

    #[error("Config error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Malformed(e) => e.kind(),
            Self::Io(_) => ErrorKind::Io,
            Self::InvalidHex { .. } => ErrorKind::Input,
            Self::Config(_) => ErrorKind::Config,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
