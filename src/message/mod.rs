// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured log messages flowing through the handler chain.
//!
//! A [`LogMessage`] is created once by the producer and then shared, read-only,
//! by every handler as a [`Message`] (`Arc<LogMessage>`). Handlers never mutate
//! a message in place; forwarding a message that was also queued costs a
//! reference-count increment.
//!
//! The absence of a message (`None` in `Option<Message>`) is the shutdown
//! sentinel understood by [`Handler`](crate::traits::Handler).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Shared, immutable handle to a log message.
pub type Message = Arc<LogMessage>;

/// Syslog severity levels, most severe first.
///
/// Ordering follows the numeric code, so `Severity::Emergency < Severity::Debug`.
/// "At least as severe as X" therefore means `severity <= X`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    #[serde(alias = "emerg", alias = "panic")]
    Emergency = 0,
    Alert = 1,
    #[serde(alias = "crit")]
    Critical = 2,
    #[serde(alias = "err")]
    Error = 3,
    #[serde(alias = "warn")]
    Warning = 4,
    Notice = 5,
    #[serde(alias = "info")]
    Informational = 6,
    Debug = 7,
}

impl Severity {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        use Severity::*;
        Some(match code {
            0 => Emergency,
            1 => Alert,
            2 => Critical,
            3 => Error,
            4 => Warning,
            5 => Notice,
            6 => Informational,
            7 => Debug,
            _ => return None,
        })
    }

    /// Returns true if `self` is at least as severe as `threshold`.
    pub fn at_least(self, threshold: Severity) -> bool {
        self <= threshold
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "emergency",
            Severity::Alert => "alert",
            Severity::Critical => "critical",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Informational => "informational",
            Severity::Debug => "debug",
        }
    }
}

impl Display for Severity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Syslog facilities (RFC 5424 numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Facility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    Authpriv = 10,
    Ftp = 11,
    Ntp = 12,
    Audit = 13,
    Alert = 14,
    Clock = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

impl Facility {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        use Facility::*;
        const ALL: [Facility; 24] = [
            Kern, User, Mail, Daemon, Auth, Syslog, Lpr, News, Uucp, Cron, Authpriv, Ftp, Ntp,
            Audit, Alert, Clock, Local0, Local1, Local2, Local3, Local4, Local5, Local6, Local7,
        ];
        ALL.get(code as usize).copied()
    }
}

/// A single structured log record.
///
/// # Example
/// ```
/// use logpipe::message::{LogMessage, Severity, Facility};
///
/// let msg = LogMessage::new("disk almost full")
///     .with_severity(Severity::Warning)
///     .with_facility(Facility::Daemon)
///     .with_tag("smartd");
///
/// assert_eq!(msg.priority(), 3 * 8 + 4);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogMessage {
    pub facility: Facility,
    pub severity: Severity,
    pub timestamp: SystemTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub content: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, serde_json::Value>,
}

impl LogMessage {
    /// Create a `user.notice` message stamped with the current time.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            facility: Facility::User,
            severity: Severity::Notice,
            timestamp: SystemTime::now(),
            hostname: None,
            tag: None,
            content: content.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    pub fn with_facility(mut self, facility: Facility) -> Self {
        self.facility = facility;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: SystemTime) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Syslog PRI value: `facility * 8 + severity`.
    pub fn priority(&self) -> u8 {
        self.facility.code() * 8 + self.severity.code()
    }

    /// Wrap into the shared form handed to handlers.
    pub fn into_message(self) -> Message {
        Arc::new(self)
    }

    /// Build a message from a raw text line.
    ///
    /// A leading `<PRI>` header sets facility and severity; a following
    /// `tag:` token (no whitespace before the colon) sets the tag. Lines
    /// without a valid header become `user.notice` with the whole line as
    /// content.
    pub fn from_line(line: &str) -> Self {
        let line = line.trim_end_matches(&['\r', '\n'][..]);
        let (header, rest) = match split_priority(line) {
            Some((pri, rest)) => (Some(pri), rest),
            // a malformed header is kept verbatim as content
            None if line.starts_with('<') => return LogMessage::new(line),
            None => (None, line),
        };

        let mut msg = LogMessage::new(rest);
        if let Some(pri) = header {
            if let (Some(facility), Some(severity)) =
                (Facility::from_code(pri / 8), Severity::from_code(pri % 8))
            {
                msg.facility = facility;
                msg.severity = severity;
            }
        }

        if let Some((tag, content)) = rest.split_once(": ") {
            if !tag.is_empty() && !tag.contains(char::is_whitespace) {
                msg.tag = Some(tag.to_string());
                msg.content = content.to_string();
            }
        }
        msg
    }

    /// Single-line text rendering: `<PRI>SECONDS HOST TAG: CONTENT`.
    pub fn to_text_line(&self) -> String {
        let seconds = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        let host = self.hostname.as_deref().unwrap_or("-");
        match &self.tag {
            Some(tag) => format!("<{}>{} {} {}: {}", self.priority(), seconds, host, tag, self.content),
            None => format!("<{}>{} {} {}", self.priority(), seconds, host, self.content),
        }
    }
}

fn split_priority(line: &str) -> Option<(u8, &str)> {
    let rest = line.strip_prefix('<')?;
    let end = rest.find('>')?;
    let digits = &rest[..end];
    if digits.is_empty() || digits.len() > 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let pri: u8 = digits.parse().ok()?;
    if pri > 191 {
        return None;
    }
    Some((pri, &rest[end + 1..]))
}
