//! DHCP option tags and the decoded option table.
//!
//! The option table keeps raw payload bytes. Typed views are limited to the
//! handful of single-byte enumerations below; everything else is left to the
//! caller.

use std::collections::btree_map::{self, BTreeMap};
use std::fmt;

/// DHCP option tags recognised by name (RFC 2132 and follow-ups).
///
/// Tags outside this set are still decoded and stored; they just have no name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum OptionCode {
    Pad = 0x00,
    SubnetMask = 0x01,
    Router = 0x03,
    DomainNameServer = 0x06,
    HostName = 0x0C,
    DomainName = 0x0F,
    InterfaceMtu = 0x1A,
    BroadcastAddress = 0x1C,
    StaticRoute = 0x21,
    NtpServers = 0x2A,
    RequestedIpAddress = 0x32,
    LeaseTime = 0x33,
    OptionOverload = 0x34,
    MessageType = 0x35,
    ServerIdentifier = 0x36,
    ParameterRequestList = 0x37,
    MaxMessageSize = 0x39,
    RenewalTime = 0x3A,
    RebindingTime = 0x3B,
    VendorClassId = 0x3C,
    RapidCommit = 0x50,
    AutoConfigure = 0x74,
    DomainSearch = 0x77,
    ClasslessStaticRoute = 0x79,
    ForcerenewNonceCapable = 0x91,
    End = 0xFF,
}

impl OptionCode {
    /// Wire value of the tag.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Pad and End carry no length or payload.
    pub const fn is_sentinel(self) -> bool {
        matches!(self, Self::Pad | Self::End)
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Pad => "Pad",
            Self::SubnetMask => "Subnet Mask",
            Self::Router => "Router",
            Self::DomainNameServer => "Domain Name Server",
            Self::HostName => "Host Name",
            Self::DomainName => "Domain Name",
            Self::InterfaceMtu => "Interface MTU",
            Self::BroadcastAddress => "Broadcast Address",
            Self::StaticRoute => "Static Route",
            Self::NtpServers => "NTP Servers",
            Self::RequestedIpAddress => "Requested IP Address",
            Self::LeaseTime => "IP Address Lease Time",
            Self::OptionOverload => "Option Overload",
            Self::MessageType => "DHCP Message Type",
            Self::ServerIdentifier => "Server Identifier",
            Self::ParameterRequestList => "Parameter Request List",
            Self::MaxMessageSize => "Maximum Message Size",
            Self::RenewalTime => "Renewal (T1) Time",
            Self::RebindingTime => "Rebinding (T2) Time",
            Self::VendorClassId => "Vendor Class Identifier",
            Self::RapidCommit => "Rapid Commit",
            Self::AutoConfigure => "Auto-Configure",
            Self::DomainSearch => "Domain Search",
            Self::ClasslessStaticRoute => "Classless Static Route",
            Self::ForcerenewNonceCapable => "FORCERENEW Nonce Capable",
            Self::End => "End",
        }
    }
}

impl TryFrom<u8> for OptionCode {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Pad),
            0x01 => Ok(Self::SubnetMask),
            0x03 => Ok(Self::Router),
            0x06 => Ok(Self::DomainNameServer),
            0x0C => Ok(Self::HostName),
            0x0F => Ok(Self::DomainName),
            0x1A => Ok(Self::InterfaceMtu),
            0x1C => Ok(Self::BroadcastAddress),
            0x21 => Ok(Self::StaticRoute),
            0x2A => Ok(Self::NtpServers),
            0x32 => Ok(Self::RequestedIpAddress),
            0x33 => Ok(Self::LeaseTime),
            0x34 => Ok(Self::OptionOverload),
            0x35 => Ok(Self::MessageType),
            0x36 => Ok(Self::ServerIdentifier),
            0x37 => Ok(Self::ParameterRequestList),
            0x39 => Ok(Self::MaxMessageSize),
            0x3A => Ok(Self::RenewalTime),
            0x3B => Ok(Self::RebindingTime),
            0x3C => Ok(Self::VendorClassId),
            0x50 => Ok(Self::RapidCommit),
            0x74 => Ok(Self::AutoConfigure),
            0x77 => Ok(Self::DomainSearch),
            0x79 => Ok(Self::ClasslessStaticRoute),
            0x91 => Ok(Self::ForcerenewNonceCapable),
            0xFF => Ok(Self::End),
            other => Err(other),
        }
    }
}

impl From<OptionCode> for u8 {
    fn from(code: OptionCode) -> Self {
        code.code()
    }
}

impl fmt::Display for OptionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// DHCP message types carried in option 53.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageType {
    Discover = 1,
    Offer = 2,
    Request = 3,
    Decline = 4,
    Ack = 5,
    Nak = 6,
    Release = 7,
    Inform = 8,
}

impl TryFrom<u8> for MessageType {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Discover),
            2 => Ok(Self::Offer),
            3 => Ok(Self::Request),
            4 => Ok(Self::Decline),
            5 => Ok(Self::Ack),
            6 => Ok(Self::Nak),
            7 => Ok(Self::Release),
            8 => Ok(Self::Inform),
            other => Err(other),
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Discover => write!(f, "DHCPDISCOVER"),
            Self::Offer => write!(f, "DHCPOFFER"),
            Self::Request => write!(f, "DHCPREQUEST"),
            Self::Decline => write!(f, "DHCPDECLINE"),
            Self::Ack => write!(f, "DHCPACK"),
            Self::Nak => write!(f, "DHCPNAK"),
            Self::Release => write!(f, "DHCPRELEASE"),
            Self::Inform => write!(f, "DHCPINFORM"),
        }
    }
}

/// Which header fields option 52 says hold extra options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OverloadFlag {
    File = 1,
    Sname = 2,
    Both = 3,
}

impl OverloadFlag {
    pub fn uses_file(self) -> bool {
        matches!(self, Self::File | Self::Both)
    }

    pub fn uses_sname(self) -> bool {
        matches!(self, Self::Sname | Self::Both)
    }
}

impl TryFrom<u8> for OverloadFlag {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::File),
            2 => Ok(Self::Sname),
            3 => Ok(Self::Both),
            other => Err(other),
        }
    }
}

/// Option 116 (RFC 2563) values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum AutoConfigure {
    DoNotAutoConfigure = 0,
    AutoConfigure = 1,
}

impl TryFrom<u8> for AutoConfigure {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::DoNotAutoConfigure),
            1 => Ok(Self::AutoConfigure),
            other => Err(other),
        }
    }
}

/// Decoded option table: tag to raw payload.
///
/// Never holds the Pad or End tags. Iteration is in ascending tag order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DhcpOptions {
    entries: BTreeMap<u8, Vec<u8>>,
}

impl DhcpOptions {
    /// Stores a payload, replacing any earlier value for the same tag.
    pub(crate) fn insert(&mut self, tag: u8, payload: Vec<u8>) -> Option<Vec<u8>> {
        debug_assert!(
            tag != OptionCode::Pad.code() && tag != OptionCode::End.code(),
            "sentinel tags are never stored"
        );
        self.entries.insert(tag, payload)
    }

    pub fn get(&self, tag: u8) -> Option<&[u8]> {
        self.entries.get(&tag).map(Vec::as_slice)
    }

    pub fn get_code(&self, code: OptionCode) -> Option<&[u8]> {
        self.get(code.code())
    }

    pub fn contains(&self, tag: u8) -> bool {
        self.entries.contains_key(&tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn tags(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> Iter<'_> {
        Iter {
            inner: self.entries.iter(),
        }
    }

    /// Option 53, if present with a single known value.
    pub fn message_type(&self) -> Option<MessageType> {
        match self.get_code(OptionCode::MessageType)? {
            [value] => MessageType::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Option 52, if present with a single known value.
    pub fn overload(&self) -> Option<OverloadFlag> {
        match self.get_code(OptionCode::OptionOverload)? {
            [value] => OverloadFlag::try_from(*value).ok(),
            _ => None,
        }
    }

    /// Option 116 (RFC 2563), if present with a single known value.
    pub fn auto_configure(&self) -> Option<AutoConfigure> {
        match self.get_code(OptionCode::AutoConfigure)? {
            [value] => AutoConfigure::try_from(*value).ok(),
            _ => None,
        }
    }
}

/// Iterator over `(tag, payload)` pairs of a [`DhcpOptions`].
pub struct Iter<'a> {
    inner: btree_map::Iter<'a, u8, Vec<u8>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = (u8, &'a [u8]);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(tag, payload)| (*tag, payload.as_slice()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a> IntoIterator for &'a DhcpOptions {
    type Item = (u8, &'a [u8]);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
