//! Console-based message reporter.

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::domain::{DhcpMessage, DhcpOptions, OptionCode};
use crate::error::Error;
use crate::reporter::MessageReporter;
use crate::utils::hex_string;

/// Prints decoded messages in a human-readable form on stdout, and errors
/// on stderr.
pub struct ConsoleReporter {
    /// Whether to dump the raw chaddr/sname/file fields
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter.
    pub fn new() -> Self {
        Self { verbose: false }
    }

    /// Enable or disable verbose output.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn format_message(&self, source: &str, message: &DhcpMessage) -> String {
        let mut output = String::new();

        let kind = match message.message_type() {
            Some(msg_type) => msg_type.to_string(),
            None if message.is_request() => "BOOTREQUEST".to_string(),
            None if message.is_reply() => "BOOTREPLY".to_string(),
            None => format!("op {}", message.operation_code()),
        };
        let client = match message.client_mac() {
            Some(mac) => mac.to_string(),
            None => hex_string(message.client_hardware_address_bytes()),
        };

        let _ = writeln!(
            output,
            "[{}] {} | XID: {:#010x} | Client: {}",
            kind,
            source,
            message.transaction_id(),
            client
        );
        let _ = writeln!(
            output,
            "  op={} htype={} hlen={} hops={} secs={} flags={:#06x}{}",
            message.operation_code(),
            message.hardware_address_type(),
            message.hardware_address_length(),
            message.hops(),
            message.seconds_elapsed(),
            message.flags(),
            if message.is_broadcast() { " (broadcast)" } else { "" }
        );
        let _ = writeln!(
            output,
            "  ciaddr={} yiaddr={} siaddr={} giaddr={}",
            message.ciaddr(),
            message.yiaddr(),
            message.siaddr(),
            message.giaddr()
        );

        if let Some(sname) = message.server_name_str() {
            let _ = writeln!(output, "  sname={sname:?}");
        }
        if let Some(file) = message.boot_file_name_str() {
            let _ = writeln!(output, "  file={file:?}");
        }

        if self.verbose {
            let _ = writeln!(
                output,
                "  chaddr: {}",
                hex_string(message.client_hardware_address())
            );
            let _ = writeln!(output, "  sname: {}", hex_string(message.server_name()));
            let _ = writeln!(output, "  file: {}", hex_string(message.boot_file_name()));
        }

        output.push_str(&Self::format_option_table(message.options()));
        output
    }

    pub fn format_options(&self, source: &str, options: &DhcpOptions) -> String {
        let mut output = format!("[OPTIONS] {source}\n");
        output.push_str(&Self::format_option_table(options));
        output
    }

    fn format_option_table(options: &DhcpOptions) -> String {
        let mut output = format!("  options ({}):\n", options.len());
        for (tag, payload) in options {
            let name = OptionCode::try_from(tag)
                .map(OptionCode::name)
                .unwrap_or("Unknown");
            let _ = writeln!(
                output,
                "    {:>3} {:<26} [{}] {}",
                tag,
                name,
                payload.len(),
                hex_string(payload)
            );
        }
        output
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageReporter for ConsoleReporter {
    fn report_message(&self, source: &str, message: &DhcpMessage) {
        let output = self.format_message(source, message);
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", output);
    }

    fn report_options(&self, source: &str, options: &DhcpOptions) {
        let output = self.format_options(source, options);
        let mut stdout = io::stdout().lock();
        let _ = write!(stdout, "{}", output);
    }

    fn report_error(&self, source: &str, error: &Error) {
        let mut stderr = io::stderr().lock();
        let _ = writeln!(stderr, "error: {}: {} ({})", source, error, error.kind());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse, parse_options, DHCP_MAGIC_COOKIE};

    fn discover() -> DhcpMessage {
        let mut packet = vec![0u8; 240];
        packet[0] = 1;
        packet[1] = 1;
        packet[2] = 6;
        packet[4..8].copy_from_slice(&0xdeadbeefu32.to_be_bytes());
        packet[10] = 0x80;
        packet[28..34].copy_from_slice(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]);
        packet[108..118].copy_from_slice(b"pxelinux.0");
        packet[236..240].copy_from_slice(&DHCP_MAGIC_COOKIE);
        packet.extend_from_slice(&[53, 1, 1, 12, 4, b'h', b'o', b's', b't', 200, 1, 7, 255]);
        parse(&packet).unwrap()
    }

    #[test]
    fn test_format_message_summary() {
        let output = ConsoleReporter::new().format_message("capture.bin", &discover());

        assert!(output.starts_with("[DHCPDISCOVER] capture.bin | XID: 0xdeadbeef"));
        assert!(output.contains("flags=0x8000 (broadcast)"));
        assert!(output.contains("ciaddr=0.0.0.0"));
        assert!(output.contains("file=\"pxelinux.0\""));
        assert!(!output.contains("sname="));
        assert!(output.contains("options (3):"));
        assert!(output.contains("DHCP Message Type"));
        assert!(output.contains("Host Name"));
        assert!(output.contains("68 6f 73 74"));
        assert!(output.contains("Unknown"));
    }

    #[test]
    fn test_verbose_dumps_raw_fields() {
        let quiet = ConsoleReporter::new().format_message("p", &discover());
        let verbose = ConsoleReporter::new()
            .with_verbose(true)
            .format_message("p", &discover());

        assert!(!quiet.contains("chaddr:"));
        assert!(verbose.contains("chaddr: aa bb cc dd ee ff 00"));
    }

    #[test]
    fn test_format_options_lists_tags_in_order() {
        let options = parse_options(&[53, 1, 3, 1, 4, 255, 255, 255, 0]).unwrap();
        let output = ConsoleReporter::new().format_options("opts.hex", &options);

        let mask = output.find("Subnet Mask").unwrap();
        let msg_type = output.find("DHCP Message Type").unwrap();
        assert!(output.starts_with("[OPTIONS] opts.hex"));
        assert!(mask < msg_type);
    }
}
