//! Reporting module for decoded DHCP messages.
//!
//! This module defines the `MessageReporter` trait and provides a console
//! implementation. Reporters only present results; they never decode.

mod console_reporter;

pub use console_reporter::ConsoleReporter;

use crate::domain::{DhcpMessage, DhcpOptions};
use crate::error::Error;

/// Trait for presenting decode results.
pub trait MessageReporter {
    /// Report a fully decoded message read from `source`.
    fn report_message(&self, source: &str, message: &DhcpMessage);

    /// Report a bare options block read from `source`.
    fn report_options(&self, source: &str, options: &DhcpOptions);

    /// Report why `source` could not be decoded.
    fn report_error(&self, source: &str, error: &Error);
}
