#![warn(missing_docs)]
//! # ahhere-mail
//!
//! ## Purpose
//! Builds the outbound report payload: a plain-text email for the parking
//! enforcement mailbox, plus its `mailto:` serialization.
//!
//! ## Responsibilities
//! - Carry the fixed recipient and subject of the report message.
//! - Render the templated multi-line body from a [`ahhere_core::Report`].
//! - Serialize a message to a percent-encoded `mailto:` URL.
//!
//! ## Data flow
//! Capture workflow reaches `ReportReady` -> [`compose_report_mail`]
//! renders the body -> the platform mail composer receives the message.
//! Image attachment is the composer's responsibility, not part of this
//! payload contract.
//!
//! ## Error model
//! Unrenderable timestamps surface as [`MailError`]; everything else in
//! this crate is pure string templating.

use ahhere_core::{CoreError, Report, format_timestamp_utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Parking-enforcement authority mailbox.
pub const REPORT_RECIPIENT: &str = "ParkingEnforcement@dublincity.ie";

/// Fixed subject line for every report.
pub const REPORT_SUBJECT: &str = "Parking Infringement Report";

/// Explicit marker used when the report carries no fix.
pub const LOCATION_UNAVAILABLE_MARKER: &str = "Location not available";

// RFC 3986 unreserved characters stay literal; everything else is encoded.
const MAILTO_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Provider-neutral mail-compose payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailMessage {
    /// Destination mailbox.
    pub recipient: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text multi-line body.
    pub body: String,
}

impl MailMessage {
    /// Serializes the message to a `mailto:` URL.
    ///
    /// Subject and body are percent-encoded; spaces render as `%20` and
    /// newlines as `%0A`, matching what mail clients expect from a
    /// compose link.
    pub fn mailto_url(&self) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            self.recipient,
            utf8_percent_encode(&self.subject, MAILTO_QUERY),
            utf8_percent_encode(&self.body, MAILTO_QUERY)
        )
    }
}

/// Composes the report email from a completed report.
///
/// The body contains the capture timestamp, the 6-decimal coordinate pair
/// (or the explicit unavailable marker), and the fixed closing line
/// identifying the submitting application.
///
/// # Errors
/// Returns [`MailError::Timestamp`] when the capture timestamp cannot be
/// rendered.
pub fn compose_report_mail(report: &Report) -> Result<MailMessage, MailError> {
    let date = format_timestamp_utc(report.captured_at_ms)?;
    let location = report
        .location
        .map(|fix| fix.format_6dp())
        .unwrap_or_else(|| LOCATION_UNAVAILABLE_MARKER.to_string());

    let body = format!(
        "Parking Infringement Report\n\
         \n\
         Date: {date}\n\
         Location: {location}\n\
         \n\
         Please find attached photo evidence of the parking violation.\n\
         \n\
         This report was submitted via the AhHere app."
    );

    Ok(MailMessage {
        recipient: REPORT_RECIPIENT.to_string(),
        subject: REPORT_SUBJECT.to_string(),
        body,
    })
}

/// Mail payload error type.
#[derive(Debug, Error)]
pub enum MailError {
    /// Capture timestamp could not be rendered as display text.
    #[error("report timestamp failure: {0}")]
    Timestamp(#[from] CoreError),
}
