//! Parsing for the date strings that clients send.

use time::{
    Date, OffsetDateTime, UtcOffset,
    format_description::well_known::Rfc3339,
    macros::{format_description, time},
};

/// A client supplied date: either an exact timestamp or a whole calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateInput {
    /// An RFC 3339 timestamp, normalised to UTC.
    DateTime(OffsetDateTime),
    /// A `YYYY-MM-DD` calendar date, interpreted in UTC.
    Date(Date),
}

impl DateInput {
    /// Parse an RFC 3339 timestamp or a `YYYY-MM-DD` date.
    ///
    /// Returns `None` for anything else, including blank strings.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
            return Some(Self::DateTime(date_time.to_offset(UtcOffset::UTC)));
        }

        Date::parse(text, format_description!("[year]-[month]-[day]"))
            .ok()
            .map(Self::Date)
    }

    /// The earliest instant covered by the input.
    pub fn start(self) -> OffsetDateTime {
        match self {
            Self::DateTime(date_time) => date_time,
            Self::Date(date) => date.midnight().assume_utc(),
        }
    }

    /// The latest instant covered by the input.
    pub fn end(self) -> OffsetDateTime {
        match self {
            Self::DateTime(date_time) => date_time,
            Self::Date(date) => date.with_time(time!(23:59:59.999_999_999)).assume_utc(),
        }
    }
}
