//! Loading packet bytes from files.
//!
//! Captures are accepted either as raw binary (a UDP payload dumped to disk)
//! or as hex text copied out of a packet analyser.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use tracing::debug;

use crate::error::{Error, Result};
use crate::utils::{decode_hex, looks_like_hex};

/// How a packet file is encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum InputFormat {
    /// Hex text if the file only holds hex digits and separators, else binary.
    #[default]
    Auto,
    /// Raw bytes.
    Binary,
    /// Hex text.
    Hex,
}

impl FromStr for InputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "binary" | "bin" | "raw" => Ok(Self::Binary),
            "hex" => Ok(Self::Hex),
            other => Err(Error::Config(format!("Invalid input format: {other}"))),
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Binary => write!(f, "binary"),
            Self::Hex => write!(f, "hex"),
        }
    }
}

/// Turn file contents into packet bytes.
pub fn decode_input(data: Vec<u8>, format: InputFormat) -> Result<Vec<u8>> {
    let as_hex = match format {
        InputFormat::Binary => false,
        InputFormat::Hex => true,
        InputFormat::Auto => looks_like_hex(&data),
    };

    if !as_hex {
        return Ok(data);
    }

    let text = String::from_utf8(data).map_err(|e| Error::InvalidHex {
        position: e.utf8_error().valid_up_to(),
        message: "input is not valid UTF-8".to_string(),
    })?;
    decode_hex(&text)
}

/// Read a packet from `path`.
pub fn read_packet(path: &Path, format: InputFormat) -> Result<Vec<u8>> {
    let data = std::fs::read(path)?;
    debug!(path = %path.display(), bytes = data.len(), %format, "read packet file");
    decode_input(data, format)
}
