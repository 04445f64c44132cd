//! DHCP packet parser implementation.
//!
//! Decodes the fixed RFC 2131 header and walks the option TLVs that follow
//! the magic cookie.

use tracing::{debug, trace};

use crate::domain::{DhcpMessage, DhcpOptions, OptionCode, OverloadFlag};
use crate::error::ParseError;

/// DHCP magic cookie: 0x63825363
pub const DHCP_MAGIC_COOKIE: [u8; 4] = [0x63, 0x82, 0x53, 0x63];

/// Length of the fixed fields before the cookie.
pub const FIXED_FIELDS_LEN: usize = 236;

/// Fixed fields plus magic cookie; options start here.
pub const OPTIONS_OFFSET: usize = FIXED_FIELDS_LEN + DHCP_MAGIC_COOKIE.len();

const SNAME_OFFSET: usize = 44;
const FILE_OFFSET: usize = 108;

const PAD: u8 = OptionCode::Pad.code();
const END: u8 = OptionCode::End.code();

/// Parser for DHCP packets.
///
/// Holds only settings, so one instance can be shared freely between
/// threads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DhcpParser {
    option_overload: bool,
}

impl DhcpParser {
    /// Create a parser that walks only the main options block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also walk `file` and `sname` when option 52 asks for it.
    pub fn with_option_overload(mut self, enabled: bool) -> Self {
        self.option_overload = enabled;
        self
    }

    pub fn option_overload(&self) -> bool {
        self.option_overload
    }

    /// Parse a DHCP packet from raw bytes.
    ///
    /// The input should be the UDP payload (not including IP/UDP headers).
    pub fn parse(&self, data: &[u8]) -> Result<DhcpMessage, ParseError> {
        let Some((header, rest)) = data.split_first_chunk::<OPTIONS_OFFSET>() else {
            return Err(ParseError::HeaderTooShort {
                expected: OPTIONS_OFFSET,
                actual: data.len(),
            });
        };

        let cookie: [u8; 4] = field(header, FIXED_FIELDS_LEN);
        if cookie != DHCP_MAGIC_COOKIE {
            return Err(ParseError::BadMagicCookie { found: cookie });
        }

        let mut options = DhcpOptions::default();
        walk_options(rest, OPTIONS_OFFSET, &mut options)?;

        let sname: [u8; 64] = field(header, SNAME_OFFSET);
        let file: [u8; 128] = field(header, FILE_OFFSET);

        if self.option_overload {
            Self::merge_overloaded(&sname, &file, &mut options)?;
        }

        let message = DhcpMessage {
            op: header[0],
            htype: header[1],
            hlen: header[2],
            hops: header[3],
            xid: u32::from_be_bytes(field(header, 4)),
            secs: u16::from_be_bytes(field(header, 8)),
            flags: u16::from_be_bytes(field(header, 10)),
            ciaddr: field(header, 12),
            yiaddr: field(header, 16),
            siaddr: field(header, 20),
            giaddr: field(header, 24),
            chaddr: field(header, 28),
            sname,
            file,
            options,
        };

        debug!(
            xid = message.xid,
            op = message.op,
            options = message.options.len(),
            "decoded DHCP message"
        );

        Ok(message)
    }

    /// Walk a bare options block (the bytes after the magic cookie).
    pub fn parse_options(&self, data: &[u8]) -> Result<DhcpOptions, ParseError> {
        let mut options = DhcpOptions::default();
        walk_options(data, 0, &mut options)?;
        Ok(options)
    }

    /// Option overload (RFC 2131 4.1): `file` is read before `sname`, and
    /// both after the main block. Option 52 keeps its main-block value.
    fn merge_overloaded(
        sname: &[u8; 64],
        file: &[u8; 128],
        options: &mut DhcpOptions,
    ) -> Result<(), ParseError> {
        let Some(value) = options.get_code(OptionCode::OptionOverload) else {
            return Ok(());
        };
        let value = value.to_vec();
        let flag = match value.as_slice() {
            [raw] => OverloadFlag::try_from(*raw).ok(),
            _ => None,
        }
        .ok_or_else(|| ParseError::OverloadInvalid {
            value: value.clone(),
        })?;

        if flag.uses_file() {
            trace!("walking options overloaded into file");
            walk_options(file, FILE_OFFSET, options)?;
        }
        if flag.uses_sname() {
            trace!("walking options overloaded into sname");
            walk_options(sname, SNAME_OFFSET, options)?;
        }

        options.insert(OptionCode::OptionOverload.code(), value);
        Ok(())
    }
}

/// Decode a packet with the default parser settings.
pub fn parse(data: &[u8]) -> Result<DhcpMessage, ParseError> {
    DhcpParser::new().parse(data)
}

/// Walk a bare options block with the default parser settings.
pub fn parse_options(data: &[u8]) -> Result<DhcpOptions, ParseError> {
    DhcpParser::new().parse_options(data)
}

/// Copies `N` bytes at `offset` out of the fixed header.
fn field<const N: usize>(header: &[u8; OPTIONS_OFFSET], offset: usize) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&header[offset..offset + N]);
    out
}

/// Walk TLVs in `data` into `options`. `base` is the absolute offset of
/// `data[0]` and is only used for error reporting.
fn walk_options(data: &[u8], base: usize, options: &mut DhcpOptions) -> Result<(), ParseError> {
    let mut offset = 0;

    while offset < data.len() {
        let tag = data[offset];

        match tag {
            END => break,
            PAD => {
                offset += 1;
                continue;
            }
            _ => {}
        }

        let Some(&len) = data.get(offset + 1) else {
            return Err(ParseError::OptionLengthMissing {
                offset: base + offset,
                tag,
            });
        };
        let len = usize::from(len);

        let start = offset + 2;
        let available = data.len() - start;
        if len > available {
            return Err(ParseError::OptionOverrun {
                offset: base + offset,
                tag,
                length: len,
                available,
            });
        }

        trace!(tag, len, offset = base + offset, "option");
        options.insert(tag, data[start..start + len].to_vec());

        offset = start + len;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MessageType;

    fn header() -> Vec<u8> {
        let mut packet = vec![0u8; OPTIONS_OFFSET];
        packet[0] = 1;
        packet[1] = 1;
        packet[2] = 6;
        packet[4..8].copy_from_slice(&0x12345678u32.to_be_bytes());
        packet[28..34].copy_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        packet[236..240].copy_from_slice(&DHCP_MAGIC_COOKIE);
        packet
    }

    fn packet_with_options(options: &[u8]) -> Vec<u8> {
        let mut packet = header();
        packet.extend_from_slice(options);
        packet
    }

    mod header_tests {
        use super::*;

        #[test]
        fn test_parse_minimum_packet() {
            let mut packet = header();
            packet[3] = 2;
            packet[8..10].copy_from_slice(&7u16.to_be_bytes());
            packet[10..12].copy_from_slice(&0x8000u16.to_be_bytes());
            packet[12..16].copy_from_slice(&[10, 0, 0, 5]);
            packet[16..20].copy_from_slice(&[10, 0, 0, 6]);
            packet[20..24].copy_from_slice(&[10, 0, 0, 1]);
            packet[24..28].copy_from_slice(&[10, 0, 0, 254]);
            packet[44..48].copy_from_slice(b"boot");
            packet[108..118].copy_from_slice(b"pxelinux.0");
            packet.push(END);

            let message = parse(&packet).unwrap();
            assert_eq!(message.operation_code(), 1);
            assert_eq!(message.hardware_address_type(), 1);
            assert_eq!(message.hardware_address_length(), 6);
            assert_eq!(message.hops(), 2);
            assert_eq!(message.transaction_id(), 0x12345678);
            assert_eq!(message.seconds_elapsed(), 7);
            assert_eq!(message.flags(), 0x8000);
            assert_eq!(message.client_ip_address(), [10, 0, 0, 5]);
            assert_eq!(message.your_ip_address(), [10, 0, 0, 6]);
            assert_eq!(message.server_ip_address(), [10, 0, 0, 1]);
            assert_eq!(message.gateway_ip_address(), [10, 0, 0, 254]);
            assert_eq!(&message.client_hardware_address()[..], &packet[28..44]);
            assert_eq!(&message.server_name()[..], &packet[44..108]);
            assert_eq!(&message.boot_file_name()[..], &packet[108..236]);
            assert!(message.options().is_empty());
        }

        #[test]
        fn test_multibyte_fields_are_big_endian() {
            let mut packet = header();
            packet[4..8].copy_from_slice(&[0x01, 0x02, 0x03, 0x04]);
            packet[8..10].copy_from_slice(&[0x01, 0x02]);
            packet[10..12].copy_from_slice(&[0x80, 0x01]);

            let message = parse(&packet).unwrap();
            assert_eq!(message.transaction_id(), 0x01020304);
            assert_eq!(message.seconds_elapsed(), 0x0102);
            assert_eq!(message.flags(), 0x8001);
        }

        #[test]
        fn test_header_without_options_parses() {
            let message = parse(&header()).unwrap();
            assert!(message.options().is_empty());
        }

        #[test]
        fn test_packet_too_short() {
            let packet = vec![0u8; 100];

            let result = parse(&packet);
            assert_eq!(
                result,
                Err(ParseError::HeaderTooShort {
                    expected: 240,
                    actual: 100
                })
            );
        }

        #[test]
        fn test_every_truncated_header_is_rejected() {
            let packet = header();
            for len in 0..OPTIONS_OFFSET {
                let result = parse(&packet[..len]);
                assert!(
                    matches!(result, Err(ParseError::HeaderTooShort { actual, .. }) if actual == len),
                    "length {len} was not rejected"
                );
            }
        }

        #[test]
        fn test_bad_magic_cookie() {
            let mut packet = packet_with_options(&[53, 1, 1, END]);
            packet[236..240].copy_from_slice(&[0x63, 0x82, 0x53, 0x64]);

            let result = parse(&packet);
            assert_eq!(
                result,
                Err(ParseError::BadMagicCookie {
                    found: [0x63, 0x82, 0x53, 0x64]
                })
            );
        }

        #[test]
        fn test_bad_cookie_stops_before_options() {
            // The option block is broken too; the cookie must be reported.
            let mut packet = packet_with_options(&[12, 200, 1]);
            packet[236..240].copy_from_slice(&[0; 4]);

            assert!(matches!(
                parse(&packet),
                Err(ParseError::BadMagicCookie { .. })
            ));
        }
    }

    mod option_tests {
        use super::*;

        #[test]
        fn test_options_decode_to_tag_map() {
            let options =
                parse_options(&[0x35, 1, 0x01, 0x0C, 3, b'a', b'b', b'c', END]).unwrap();

            assert_eq!(options.len(), 2);
            assert_eq!(options.get(0x35), Some(&[0x01][..]));
            assert_eq!(options.get(0x0C), Some(&[0x61, 0x62, 0x63][..]));
            assert_eq!(options.message_type(), Some(MessageType::Discover));
        }

        #[test]
        fn test_pad_run_is_skipped() {
            let options =
                parse_options(&[53, 1, 3, PAD, PAD, PAD, PAD, 12, 1, b'x', END]).unwrap();

            assert_eq!(options.len(), 2);
            assert!(!options.contains(PAD));
            assert_eq!(options.get(12), Some(&b"x"[..]));
        }

        #[test]
        fn test_duplicate_tag_keeps_last_value() {
            let options =
                parse_options(&[12, 3, b'o', b'l', b'd', 12, 3, b'n', b'e', b'w']).unwrap();

            assert_eq!(options.len(), 1);
            assert_eq!(options.get(12), Some(&b"new"[..]));
        }

        #[test]
        fn test_bytes_after_end_are_ignored() {
            let options = parse_options(&[53, 1, 1, END, 12, 200, 0xde, 0xad]).unwrap();

            assert_eq!(options.len(), 1);
            assert!(!options.contains(END));
        }

        #[test]
        fn test_no_trailing_end_required() {
            let options = parse_options(&[53, 1, 5, 12, 2, b'h', b'i']).unwrap();

            assert_eq!(options.get(53), Some(&[5][..]));
            assert_eq!(options.get(12), Some(&b"hi"[..]));
        }

        #[test]
        fn test_zero_length_option() {
            let options = parse_options(&[80, 0, END]).unwrap();
            assert_eq!(options.get(80), Some(&[][..]));
        }

        #[test]
        fn test_empty_block() {
            assert!(parse_options(&[]).unwrap().is_empty());
            assert!(parse_options(&[PAD, PAD]).unwrap().is_empty());
            assert!(parse_options(&[END]).unwrap().is_empty());
        }

        #[test]
        fn test_payload_overrun_on_exact_size_buffer() {
            // Boxed slice: length equals allocation, so there is nothing past the end.
            let data: Box<[u8]> = vec![53, 1, 1, 12, 5, b'a', b'b'].into_boxed_slice();

            let result = parse_options(&data);
            assert_eq!(
                result,
                Err(ParseError::OptionOverrun {
                    offset: 3,
                    tag: 12,
                    length: 5,
                    available: 2,
                })
            );
        }

        #[test]
        fn test_missing_length_byte() {
            let result = parse_options(&[53, 1, 1, 12]);
            assert_eq!(
                result,
                Err(ParseError::OptionLengthMissing { offset: 3, tag: 12 })
            );
        }

        #[test]
        fn test_option_errors_report_packet_offsets() {
            let packet = packet_with_options(&[PAD, 12, 9, b'a']);

            let result = parse(&packet);
            assert_eq!(
                result,
                Err(ParseError::OptionOverrun {
                    offset: 241,
                    tag: 12,
                    length: 9,
                    available: 1,
                })
            );
        }

        #[test]
        fn test_maximal_final_option_reaching_buffer_end() {
            let mut block = vec![43, 255];
            block.extend(std::iter::repeat(0x5a).take(255));

            let options = parse_options(&block).unwrap();
            assert_eq!(options.get(43).map(<[u8]>::len), Some(255));
        }

        #[test]
        fn test_full_packet_with_options() {
            let packet = packet_with_options(&[
                53, 1, 1, 61, 7, 1, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff, END,
            ]);

            let message = parse(&packet).unwrap();
            assert_eq!(message.message_type(), Some(MessageType::Discover));
            assert_eq!(
                message.options().get(61),
                Some(&[1, 0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff][..])
            );
        }
    }

    mod overload_tests {
        use super::*;

        fn overloaded_packet(flag: u8) -> Vec<u8> {
            let mut packet = packet_with_options(&[53, 1, 1, 52, 1, flag, END]);
            packet[FILE_OFFSET..FILE_OFFSET + 5].copy_from_slice(&[12, 2, b'f', b'n', END]);
            packet[SNAME_OFFSET..SNAME_OFFSET + 4].copy_from_slice(&[15, 1, b's', END]);
            packet
        }

        #[test]
        fn test_overload_ignored_by_default() {
            let message = parse(&overloaded_packet(3)).unwrap();

            assert_eq!(message.options().len(), 2);
            assert!(!message.options().contains(12));
            assert_eq!(&message.boot_file_name()[..3], &[12, 2, b'f']);
        }

        #[test]
        fn test_overload_file() {
            let parser = DhcpParser::new().with_option_overload(true);
            let message = parser.parse(&overloaded_packet(1)).unwrap();

            assert_eq!(message.options().get(12), Some(&b"fn"[..]));
            assert!(!message.options().contains(15));
        }

        #[test]
        fn test_overload_sname() {
            let parser = DhcpParser::new().with_option_overload(true);
            let message = parser.parse(&overloaded_packet(2)).unwrap();

            assert_eq!(message.options().get(15), Some(&b"s"[..]));
            assert!(!message.options().contains(12));
        }

        #[test]
        fn test_overload_both() {
            let parser = DhcpParser::new().with_option_overload(true);
            let message = parser.parse(&overloaded_packet(3)).unwrap();

            assert_eq!(message.options().len(), 4);
            assert_eq!(message.options().overload(), Some(OverloadFlag::Both));
        }

        #[test]
        fn test_sname_wins_over_file_and_main_block() {
            let mut packet = packet_with_options(&[12, 1, b'm', 52, 1, 3, END]);
            packet[FILE_OFFSET..FILE_OFFSET + 4].copy_from_slice(&[12, 1, b'f', END]);
            packet[SNAME_OFFSET..SNAME_OFFSET + 4].copy_from_slice(&[12, 1, b's', END]);

            let parser = DhcpParser::new().with_option_overload(true);
            let message = parser.parse(&packet).unwrap();
            assert_eq!(message.options().get(12), Some(&b"s"[..]));
        }

        #[test]
        fn test_overload_in_overloaded_area_does_not_replace_flag() {
            let mut packet = packet_with_options(&[52, 1, 1, END]);
            packet[FILE_OFFSET..FILE_OFFSET + 4].copy_from_slice(&[52, 1, 2, END]);

            let parser = DhcpParser::new().with_option_overload(true);
            let message = parser.parse(&packet).unwrap();
            assert_eq!(message.options().overload(), Some(OverloadFlag::File));
        }

        #[test]
        fn test_invalid_overload_value() {
            let parser = DhcpParser::new().with_option_overload(true);

            let result = parser.parse(&packet_with_options(&[52, 1, 9, END]));
            assert_eq!(result, Err(ParseError::OverloadInvalid { value: vec![9] }));

            let result = parser.parse(&packet_with_options(&[52, 2, 1, 1, END]));
            assert_eq!(
                result,
                Err(ParseError::OverloadInvalid { value: vec![1, 1] })
            );
        }

        #[test]
        fn test_overrun_inside_file_reports_file_offset() {
            let mut packet = packet_with_options(&[52, 1, 1, END]);
            packet[FILE_OFFSET + 126] = 12;
            packet[FILE_OFFSET + 127] = 4;

            let parser = DhcpParser::new().with_option_overload(true);
            assert_eq!(
                parser.parse(&packet),
                Err(ParseError::OptionOverrun {
                    offset: FILE_OFFSET + 126,
                    tag: 12,
                    length: 4,
                    available: 0,
                })
            );
        }
    }
}
