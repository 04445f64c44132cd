//! Domain models for decoded DHCP messages.
//!
//! These types describe what a packet contains, independent of how the
//! bytes are walked.

mod dhcp;
mod options;

pub use dhcp::{DhcpMessage, BOOTREPLY, BOOTREQUEST, HTYPE_ETHERNET};
pub use options::{AutoConfigure, DhcpOptions, Iter, MessageType, OptionCode, OverloadFlag};
