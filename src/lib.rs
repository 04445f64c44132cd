//! # lantern
//!
//! Decoder for DHCP messages (RFC 2131) received as raw UDP payloads.
//!
//! A packet is a fixed 236-byte header, the magic cookie `63 82 53 63`, and a
//! tag-length-value options block. [`parse`] checks the structure, copies the
//! header fields verbatim and returns the options as a tag to raw bytes table.
//! Interpreting individual option payloads is left to the caller.
//!
//! ```
//! use lantern::{parse, MessageType, OptionCode};
//!
//! let mut packet = vec![0u8; 240];
//! packet[0] = 1; // BOOTREQUEST
//! packet[236..240].copy_from_slice(&[0x63, 0x82, 0x53, 0x63]);
//! packet.extend_from_slice(&[53, 1, 1, 255]);
//!
//! let message = parse(&packet)?;
//! assert!(message.is_request());
//! assert_eq!(message.options().get_code(OptionCode::MessageType), Some(&[1][..]));
//! assert_eq!(message.message_type(), Some(MessageType::Discover));
//! # Ok::<(), lantern::ParseError>(())
//! ```
//!
//! Every structural problem (short header, wrong cookie, an option running
//! past the buffer) is reported as a [`ParseError`]; there is no partial
//! result.

pub mod config;
pub mod domain;
pub mod error;
pub mod input;
pub mod parser;
pub mod reporter;
pub mod utils;

pub use config::Config;
pub use domain::{
    AutoConfigure, DhcpMessage, DhcpOptions, MessageType, OptionCode, OverloadFlag,
};
pub use error::{Error, ErrorKind, ParseError, Result};
pub use input::{read_packet, InputFormat};
pub use parser::{parse, parse_options, DhcpParser, DHCP_MAGIC_COOKIE};
pub use reporter::{ConsoleReporter, MessageReporter};
