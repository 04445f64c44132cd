//! DHCP packet parsing module.
//!
//! Turns raw bytes into domain DHCP types. Nothing here performs I/O.

mod dhcp_parser;

pub use dhcp_parser::{
    parse, parse_options, DhcpParser, DHCP_MAGIC_COOKIE, FIXED_FIELDS_LEN, OPTIONS_OFFSET,
};
