use thiserror::Error;

use crate::rfc::dav::parse::ParseError as DavParseError;
use crate::rfc::ical::core::DataFormatError;
use crate::rfc::ical::parse::ParseError as IcalParseError;

/// RFC parsing and evaluation errors
#[derive(Error, Debug)]
pub enum RfcError {
    #[error("iCalendar parse error: {0}")]
    IcalParse(#[from] IcalParseError),

    #[error("DAV request parse error: {0}")]
    DavParse(#[from] DavParseError),

    #[error(transparent)]
    DataFormat(#[from] DataFormatError),
}

pub type RfcResult<T> = std::result::Result<T, RfcError>;
