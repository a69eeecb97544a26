//! Rendering of matched calendar objects.

use clap::ValueEnum;
use kunai_rfc::rfc::dav::core::CalendarObject;
use serde::Serialize;

use crate::error::AppResult;

/// Output format of the match report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Format {
    /// One path per line.
    #[default]
    Text,
    /// A JSON array of match records.
    Json,
}

/// A matched calendar object as reported in JSON output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchRecord<'a> {
    pub path: &'a str,
    pub etag: &'a str,
    pub content_length: u64,
}

impl<'a> From<&'a CalendarObject> for MatchRecord<'a> {
    fn from(object: &'a CalendarObject) -> Self {
        Self {
            path: &object.path,
            etag: &object.etag,
            content_length: object.content_length,
        }
    }
}

/// ## Summary
/// Renders the matched objects in the requested format.
///
/// ## Errors
/// Returns an error if JSON serialization fails.
pub fn render(objects: &[CalendarObject], format: Format) -> AppResult<String> {
    match format {
        Format::Text => {
            let mut out = String::new();
            for object in objects {
                out.push_str(&object.path);
                out.push('\n');
            }
            Ok(out)
        }
        Format::Json => {
            let records: Vec<MatchRecord<'_>> = objects.iter().map(MatchRecord::from).collect();
            Ok(serde_json::to_string_pretty(&records)?)
        }
    }
}
