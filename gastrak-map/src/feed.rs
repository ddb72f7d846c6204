//! Bootstrap snapshot of the stations around the map origin.

use std::io::Read;

use chrono::{DateTime, Utc};
use gastrak_quantities::Dollars;
use serde::{Deserialize, Deserializer};
use serde_with::serde_as;

use crate::{geo::Coordinates, grade::Grade, prelude::*};

#[must_use]
#[serde_as]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct FeedEnvelope {
    #[serde(rename = "Latitude")]
    pub origin_latitude: f64,

    #[serde(rename = "Longitude")]
    pub origin_longitude: f64,

    /// When the snapshot was taken, serialized as Unix milliseconds.
    #[serde_as(as = "Option<serde_with::TimestampMilliSeconds<i64>>")]
    #[serde(rename = "Time")]
    pub captured_at: Option<DateTime<Utc>>,

    #[serde(rename = "Data")]
    pub stations: Vec<StationSnapshot>,
}

impl FeedEnvelope {
    pub fn from_json(body: &[u8]) -> Result<Self> {
        serde_json::from_slice(body).context("failed to deserialize the station feed")
    }

    /// Read the raw snapshot CSV: `time,id,name,latitude,longitude,regular,premium,diesel`.
    ///
    /// The CSV carries no origin, so it comes from the caller.
    pub fn from_csv(
        origin: Coordinates,
        captured_at: Option<DateTime<Utc>>,
        reader: impl Read,
    ) -> Result<Self> {
        let stations = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(reader)
            .deserialize::<SnapshotRecord>()
            .map(|record| record.map(StationSnapshot::from))
            .collect::<Result<Vec<_>, _>>()
            .context("failed to read the station snapshot")?;
        debug!(n_stations = stations.len(), "read the snapshot");
        Ok(Self {
            origin_latitude: origin.latitude,
            origin_longitude: origin.longitude,
            captured_at,
            stations,
        })
    }

    pub const fn origin(&self) -> Coordinates {
        Coordinates::new(self.origin_latitude, self.origin_longitude)
    }
}

#[must_use]
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct StationSnapshot {
    /// Unique key for the history lookups.
    #[serde(rename = "Name")]
    pub name: String,

    #[serde(rename = "Latitude")]
    pub latitude: f64,

    #[serde(rename = "Longitude")]
    pub longitude: f64,

    #[serde(rename = "RegularPrice", default, deserialize_with = "deserialize_price")]
    pub current_price: Option<Dollars>,
}

impl StationSnapshot {
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

impl From<SnapshotRecord> for StationSnapshot {
    fn from(record: SnapshotRecord) -> Self {
        Self {
            current_price: record.price(Grade::Regular),
            name: record.name,
            latitude: record.latitude,
            longitude: record.longitude,
        }
    }
}

/// Zero stands for «this grade is not sold here».
fn deserialize_price<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Dollars>, D::Error> {
    Ok(Option::<Dollars>::deserialize(deserializer)?.filter(|price| !price.is_zero()))
}

/// One row of the snapshot CSV, shared by the feed and the CSV history encoding.
#[serde_as]
#[derive(Deserialize)]
pub(crate) struct SnapshotRecord {
    #[serde_as(as = "serde_with::TimestampSeconds<i64>")]
    pub timestamp: DateTime<Utc>,

    pub _id: u64,

    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub regular_price: Option<f64>,
    pub premium_price: Option<f64>,
    pub diesel_price: Option<f64>,
}

impl SnapshotRecord {
    pub fn price(&self, grade: Grade) -> Option<Dollars> {
        match grade {
            Grade::Regular => self.regular_price,
            Grade::Premium => self.premium_price,
            Grade::Diesel => self.diesel_price,
        }
        .filter(|price| *price != 0.0)
        .map(Dollars::from)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_deserialize_feed_ok() -> Result {
        // language=JSON
        const FEED: &str = r#"
            {
                "Latitude": 40.0,
                "Longitude": -75.0,
                "Time": 1704067200000,
                "Data": [
                    {
                        "Id": 1,
                        "Name": "A",
                        "Latitude": 40.1,
                        "Longitude": -75.1,
                        "Timestamp": "2024-01-01T00:00:00Z",
                        "RegularPrice": 3.49,
                        "PremiumPrice": 3.89
                    },
                    {
                        "Id": 2,
                        "Name": "B",
                        "Latitude": 40.2,
                        "Longitude": -75.2,
                        "DieselPrice": 4.19
                    },
                    {
                        "Name": "C",
                        "Latitude": 40.3,
                        "Longitude": -75.3,
                        "RegularPrice": 0
                    }
                ]
            }
        "#;
        let feed = FeedEnvelope::from_json(FEED.as_bytes())?;
        assert_eq!(feed.origin(), Coordinates::new(40.0, -75.0));
        assert_eq!(feed.captured_at, Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()));
        assert_eq!(feed.stations.len(), 3);
        assert_eq!(feed.stations[0].name, "A");
        assert_eq!(feed.stations[0].coordinates(), Coordinates::new(40.1, -75.1));
        assert_eq!(feed.stations[0].current_price, Some(Dollars::from(3.49)));
        assert_eq!(feed.stations[1].current_price, None);
        assert_eq!(feed.stations[2].current_price, None);
        Ok(())
    }

    #[test]
    fn test_deserialize_feed_without_time() -> Result {
        // language=JSON
        const FEED: &str = r#"
            {
                "Latitude": 40.0,
                "Longitude": -75.0,
                "Data": [{"Name": "A", "Latitude": 40.1, "Longitude": -75.1, "RegularPrice": 3.49}]
            }
        "#;
        let feed = FeedEnvelope::from_json(FEED.as_bytes())?;
        assert_eq!(feed.captured_at, None);
        assert_eq!(feed.stations.len(), 1);
        Ok(())
    }

    #[test]
    fn test_deserialize_feed_malformed() {
        assert!(FeedEnvelope::from_json(br#"{"Latitude": 40.0}"#).is_err());
    }

    #[test]
    fn test_from_csv_ok() -> Result {
        const SNAPSHOT: &str = "\
            1704067200,1,A,40.1,-75.1,3.49,3.89,\n\
            1704067200,2,\"B, Main St\",40.2,-75.2,,,4.19\n\
        ";
        let feed =
            FeedEnvelope::from_csv(Coordinates::new(40.0, -75.0), None, SNAPSHOT.as_bytes())?;
        assert_eq!(feed.stations.len(), 2);
        assert_eq!(feed.stations[0].name, "A");
        assert_eq!(feed.stations[0].current_price, Some(Dollars::from(3.49)));
        assert_eq!(feed.stations[1].name, "B, Main St");
        assert_eq!(feed.stations[1].current_price, None);
        assert_eq!(feed.stations[1].coordinates(), Coordinates::new(40.2, -75.2));
        Ok(())
    }

    #[test]
    fn test_from_csv_wrong_column_count() {
        let result = FeedEnvelope::from_csv(
            Coordinates::new(40.0, -75.0),
            None,
            "1704067200,1,A,40.1\n".as_bytes(),
        );
        assert!(result.is_err());
    }
}
