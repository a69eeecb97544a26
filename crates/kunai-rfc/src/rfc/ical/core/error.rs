use thiserror::Error;

use crate::rfc::ical::expand::ConversionError;

/// Failure to interpret a property value as a date, date-time or duration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataFormatError {
    #[error("{property}: invalid DATE value {value:?}")]
    InvalidDate { property: String, value: String },

    #[error("{property}: invalid DATE-TIME value {value:?}")]
    InvalidDateTime { property: String, value: String },

    #[error("{property}: invalid DURATION value {value:?}")]
    InvalidDuration { property: String, value: String },

    #[error("{property}: unsupported VALUE type {value_type:?}")]
    UnsupportedValueType {
        property: String,
        value_type: String,
    },

    #[error("{property}: {source}")]
    Conversion {
        property: String,
        #[source]
        source: ConversionError,
    },

    #[error("{component} has no {property} property")]
    MissingProperty { component: String, property: String },
}

pub type DataFormatResult<T> = std::result::Result<T, DataFormatError>;
