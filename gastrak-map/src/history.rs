pub mod decoder;

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Utc};
use gastrak_quantities::Dollars;

use crate::grade::Grade;

/// Key of a history lookup. Never cached: every activation fetches again.
#[must_use]
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct HistoryQuery {
    pub station_name: String,
    pub grade: Grade,
}

impl HistoryQuery {
    pub fn new(station_name: impl Into<String>, grade: Grade) -> Self {
        Self { station_name: station_name.into(), grade }
    }
}

/// Chart title form: `NAME (grade)`.
impl Display for HistoryQuery {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.station_name, self.grade)
    }
}

/// One price observation.
#[must_use]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HistoryPoint {
    pub timestamp: DateTime<Utc>,
    pub price: Dollars,
}

impl HistoryPoint {
    pub const fn new(timestamp: DateTime<Utc>, price: Dollars) -> Self {
        Self { timestamp, price }
    }
}
