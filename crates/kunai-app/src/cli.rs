//! Command line interface.

use std::path::PathBuf;

use clap::Parser;
use kunai_core::config::Settings;
use kunai_rfc::error::RfcError;
use kunai_rfc::rfc::dav::parse::parse_calendar_query;
use kunai_rfc::rfc::filter::filter;

use crate::error::{AppError, AppResult};
use crate::output::{Format, render};
use crate::store::load_objects;

/// Evaluate a CalDAV calendar-query REPORT against a directory of iCalendar files.
#[derive(Debug, Parser)]
#[command(name = "kunai", version)]
pub struct Cli {
    /// File holding the calendar-query XML body
    pub query: PathBuf,

    /// Directory of calendar object resources
    pub directory: PathBuf,

    /// IANA time zone for floating times (overrides `matching.floating_timezone`)
    #[arg(short, long)]
    pub timezone: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    pub format: Format,
}

/// ## Summary
/// Runs one query and returns the rendered report.
///
/// ## Errors
/// Returns an error if the query cannot be read or decoded, the directory
/// cannot be loaded, the time zone is unknown or a calendar value needed by
/// the query is malformed.
#[tracing::instrument(skip(settings))]
pub fn run(cli: &Cli, settings: &Settings) -> AppResult<String> {
    let mut matching = settings.matching.clone();
    if let Some(timezone) = &cli.timezone {
        matching.floating_timezone.clone_from(timezone);
    }
    let tz = matching.timezone()?;

    let body = std::fs::read(&cli.query).map_err(|e| AppError::io(&cli.query, e))?;
    let query = parse_calendar_query(&body)
        .map_err(RfcError::from)?
        .with_timezone(tz);

    let objects = load_objects(&cli.directory, &settings.store)?;
    let total = objects.len();
    let matched = filter(Some(&query), objects).map_err(RfcError::from)?;

    tracing::info!(total, matched = matched.len(), timezone = %tz, "Query evaluated");
    render(&matched, cli.format)
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
