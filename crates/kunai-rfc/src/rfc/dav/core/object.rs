//! Calendar object resources (RFC 4791 §4.1).

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};

use crate::rfc::ical::core::ICalendar;
use crate::rfc::ical::parse::parse;

/// ## Summary
/// Generates an `ETag` from the resource bytes using SHA256.
///
/// The `ETag` is the hex-encoded SHA256 hash of the content, wrapped in quotes.
#[must_use]
pub fn generate_etag(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let hash = hasher.finalize();
    format!("\"{}\"", hex::encode(hash))
}

/// A calendar object resource as stored in a calendar collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarObject {
    /// Resource path within the store.
    pub path: String,
    /// Last modification time.
    pub mod_time: DateTime<Utc>,
    /// Size of the resource body in bytes.
    pub content_length: u64,
    /// Strong `ETag` of the resource body.
    pub etag: String,
    /// Parsed calendar, `None` when the body is not valid iCalendar.
    pub data: Option<ICalendar>,
}

impl CalendarObject {
    /// ## Summary
    /// Builds a calendar object from its raw body.
    ///
    /// A body that fails to parse yields an object without data, which never
    /// matches a query.
    #[must_use]
    #[tracing::instrument(skip_all, fields(len = text.len()))]
    pub fn parse(path: impl Into<String>, text: &str) -> Self {
        let path = path.into();
        let data = match parse(text) {
            Ok(ical) => Some(ical),
            Err(error) => {
                tracing::warn!(%path, %error, "Calendar object is not valid iCalendar");
                None
            }
        };

        Self {
            etag: generate_etag(text.as_bytes()),
            content_length: text.len() as u64,
            mod_time: Utc::now(),
            path,
            data,
        }
    }

    /// ## Summary
    /// Builds a calendar object from a body read as raw bytes.
    ///
    /// A body that is not UTF-8 yields an object without data; the `ETag` and
    /// length still describe the bytes as stored.
    #[must_use]
    pub fn from_bytes(path: impl Into<String>, bytes: &[u8]) -> Self {
        let path = path.into();
        match std::str::from_utf8(bytes) {
            Ok(text) => Self::parse(path, text),
            Err(error) => {
                tracing::warn!(%path, %error, "Calendar object is not UTF-8");
                Self {
                    etag: generate_etag(bytes),
                    content_length: bytes.len() as u64,
                    mod_time: Utc::now(),
                    path,
                    data: None,
                }
            }
        }
    }

    /// Sets the modification time.
    #[must_use]
    pub fn with_mod_time(mut self, mod_time: DateTime<Utc>) -> Self {
        self.mod_time = mod_time;
        self
    }
}
