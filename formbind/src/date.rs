use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::coerce::{FormValue, ValueKind};
use crate::error::CoerceError;

const LAYOUT: &str = "%Y-%m-%d";

/// A calendar date stored as seconds since the Unix epoch (UTC midnight).
///
/// Always parsed from `YYYY-MM-DD`; a field's `format` annotation is ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DateTs(pub u32);

impl DateTs {
    pub fn timestamp(self) -> u32 {
        self.0
    }

    pub fn to_date(self) -> Option<NaiveDate> {
        DateTime::<Utc>::from_timestamp(i64::from(self.0), 0).map(|dt| dt.date_naive())
    }
}

impl FromStr for DateTs {
    type Err = CoerceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let date = NaiveDate::parse_from_str(value, LAYOUT).map_err(|source| {
            CoerceError::Temporal {
                value: value.to_string(),
                format: LAYOUT.to_string(),
                source,
            }
        })?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| CoerceError::custom(format!("invalid date {value:?}")))?;
        let seconds = Utc.from_utc_datetime(&midnight).timestamp();
        u32::try_from(seconds)
            .map(DateTs)
            .map_err(|_| CoerceError::custom(format!("date {value:?} is outside the supported range")))
    }
}

impl fmt::Display for DateTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_date() {
            Some(date) => write!(f, "{}", date.format(LAYOUT)),
            None => write!(f, "{}", self.0),
        }
    }
}

impl FormValue for DateTs {
    const KIND: ValueKind = ValueKind::Temporal;

    fn from_form_value(value: &str, _format: &str) -> Result<Self, CoerceError> {
        value.parse()
    }
}
