//! The decoded DHCP message.
//!
//! Fields are kept exactly as they appeared on the wire. Convenience views
//! (addresses, MAC, NUL-terminated strings) are computed on demand and never
//! change what was stored.

use std::net::Ipv4Addr;

use macaddr::MacAddr6;

use super::options::{DhcpOptions, MessageType};

/// BOOTP operation code for client requests.
pub const BOOTREQUEST: u8 = 1;

/// BOOTP operation code for server replies.
pub const BOOTREPLY: u8 = 2;

/// Hardware type for Ethernet.
pub const HTYPE_ETHERNET: u8 = 1;

const BROADCAST_FLAG: u16 = 0x8000;

/// A fully decoded DHCP message.
///
/// Only the parser constructs one; there is no way to modify it afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpMessage {
    pub(crate) op: u8,
    pub(crate) htype: u8,
    pub(crate) hlen: u8,
    pub(crate) hops: u8,
    pub(crate) xid: u32,
    pub(crate) secs: u16,
    pub(crate) flags: u16,
    pub(crate) ciaddr: [u8; 4],
    pub(crate) yiaddr: [u8; 4],
    pub(crate) siaddr: [u8; 4],
    pub(crate) giaddr: [u8; 4],
    pub(crate) chaddr: [u8; 16],
    pub(crate) sname: [u8; 64],
    pub(crate) file: [u8; 128],
    pub(crate) options: DhcpOptions,
}

impl DhcpMessage {
    /// Operation code: [`BOOTREQUEST`] or [`BOOTREPLY`], uninterpreted.
    pub fn operation_code(&self) -> u8 {
        self.op
    }

    pub fn hardware_address_type(&self) -> u8 {
        self.htype
    }

    pub fn hardware_address_length(&self) -> u8 {
        self.hlen
    }

    pub fn hops(&self) -> u8 {
        self.hops
    }

    pub fn transaction_id(&self) -> u32 {
        self.xid
    }

    pub fn seconds_elapsed(&self) -> u16 {
        self.secs
    }

    pub fn flags(&self) -> u16 {
        self.flags
    }

    pub fn client_ip_address(&self) -> [u8; 4] {
        self.ciaddr
    }

    pub fn your_ip_address(&self) -> [u8; 4] {
        self.yiaddr
    }

    pub fn server_ip_address(&self) -> [u8; 4] {
        self.siaddr
    }

    pub fn gateway_ip_address(&self) -> [u8; 4] {
        self.giaddr
    }

    /// The full 16-byte chaddr field, padding included.
    pub fn client_hardware_address(&self) -> &[u8; 16] {
        &self.chaddr
    }

    /// The full 64-byte sname field, padding included.
    pub fn server_name(&self) -> &[u8; 64] {
        &self.sname
    }

    /// The full 128-byte file field, padding included.
    pub fn boot_file_name(&self) -> &[u8; 128] {
        &self.file
    }

    pub fn options(&self) -> &DhcpOptions {
        &self.options
    }

    pub fn is_request(&self) -> bool {
        self.op == BOOTREQUEST
    }

    pub fn is_reply(&self) -> bool {
        self.op == BOOTREPLY
    }

    /// Broadcast bit (the most significant bit of flags).
    pub fn is_broadcast(&self) -> bool {
        self.flags & BROADCAST_FLAG != 0
    }

    /// The meaningful prefix of chaddr, as declared by hlen (capped at 16).
    pub fn client_hardware_address_bytes(&self) -> &[u8] {
        let len = usize::from(self.hlen).min(self.chaddr.len());
        &self.chaddr[..len]
    }

    /// Client MAC, for Ethernet messages with a 6-byte hardware address.
    pub fn client_mac(&self) -> Option<MacAddr6> {
        if self.htype != HTYPE_ETHERNET || self.hlen != 6 {
            return None;
        }
        let c = &self.chaddr;
        Some(MacAddr6::new(c[0], c[1], c[2], c[3], c[4], c[5]))
    }

    pub fn ciaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.ciaddr)
    }

    pub fn yiaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.yiaddr)
    }

    pub fn siaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.siaddr)
    }

    pub fn giaddr(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.giaddr)
    }

    /// Server host name up to the first NUL, or None if empty.
    pub fn server_name_str(&self) -> Option<String> {
        nul_terminated_string(&self.sname)
    }

    /// Boot file name up to the first NUL, or None if empty.
    pub fn boot_file_name_str(&self) -> Option<String> {
        nul_terminated_string(&self.file)
    }

    /// Message type from option 53.
    pub fn message_type(&self) -> Option<MessageType> {
        self.options.message_type()
    }
}

fn nul_terminated_string(data: &[u8]) -> Option<String> {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    if end == 0 {
        return None;
    }

    Some(String::from_utf8_lossy(&data[..end]).into_owned())
}
