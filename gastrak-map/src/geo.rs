use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// A WGS 84 coordinate pair.
///
/// No range checks: out-of-range values are handed to the map surface as is.
#[must_use]
#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl Display for Coordinates {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}
