//! Response encodings of the history endpoint.
//!
//! The endpoint speaks several encodings, picked by the `format` query
//! parameter. Each one has its own [`HistoryDecoder`], and the configuration
//! chooses which one a client uses.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use gastrak_quantities::Dollars;
use itertools::Itertools;
use serde::Deserialize;
use serde_with::serde_as;

use crate::{feed::SnapshotRecord, grade::Grade, history::HistoryPoint, prelude::*};

pub trait HistoryDecoder {
    fn format(&self) -> HistoryFormat;

    /// Decode the body into a series ordered by time.
    fn decode(&self, body: &[u8], grade: Grade) -> Result<Vec<HistoryPoint>>;
}

#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq, derive_more::Display)]
pub enum HistoryFormat {
    /// Array of snapshot objects: `[{"Timestamp": "…", "RegularPrice": 3.1, …}]`.
    #[default]
    #[display("json")]
    Json,

    /// Array of pairs: `[[unix_seconds, price], …]`.
    #[display("timeseries")]
    Timeseries,

    /// Pair of columns: `[[unix_seconds, …], [price, …]]`.
    #[display("timeseries-transposed")]
    TimeseriesTransposed,

    /// Snapshot CSV rows.
    #[display("csv")]
    Csv,
}

impl HistoryFormat {
    pub const ALL: [Self; 4] = [Self::Json, Self::Timeseries, Self::TimeseriesTransposed, Self::Csv];

    #[must_use]
    pub fn decoder(self) -> Box<dyn HistoryDecoder> {
        match self {
            Self::Json => Box::new(JsonDecoder),
            Self::Timeseries => Box::new(TimeseriesDecoder),
            Self::TimeseriesTransposed => Box::new(TransposedDecoder),
            Self::Csv => Box::new(CsvDecoder),
        }
    }
}

impl FromStr for HistoryFormat {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|format| format.to_string().eq_ignore_ascii_case(value))
            .ok_or_else(|| anyhow!("unknown history format `{value}`"))
    }
}

pub struct JsonDecoder;

impl HistoryDecoder for JsonDecoder {
    fn format(&self) -> HistoryFormat {
        HistoryFormat::Json
    }

    fn decode(&self, body: &[u8], grade: Grade) -> Result<Vec<HistoryPoint>> {
        #[derive(Deserialize)]
        struct Record {
            #[serde(rename = "Timestamp")]
            timestamp: DateTime<Utc>,

            #[serde(rename = "RegularPrice")]
            regular_price: Option<Dollars>,

            #[serde(rename = "PremiumPrice")]
            premium_price: Option<Dollars>,

            #[serde(rename = "DieselPrice")]
            diesel_price: Option<Dollars>,
        }

        let records: Vec<Record> =
            serde_json::from_slice(body).context("failed to deserialize the history records")?;
        Ok(into_series(records.into_iter().filter_map(|record| {
            let price = match grade {
                Grade::Regular => record.regular_price,
                Grade::Premium => record.premium_price,
                Grade::Diesel => record.diesel_price,
            };
            price
                .filter(|price| !price.is_zero())
                .map(|price| HistoryPoint::new(record.timestamp, price))
        })))
    }
}

pub struct TimeseriesDecoder;

impl HistoryDecoder for TimeseriesDecoder {
    fn format(&self) -> HistoryFormat {
        HistoryFormat::Timeseries
    }

    fn decode(&self, body: &[u8], _grade: Grade) -> Result<Vec<HistoryPoint>> {
        let pairs: Vec<(f64, f64)> =
            serde_json::from_slice(body).context("failed to deserialize the time series")?;
        let points = pairs
            .into_iter()
            .filter_map(|(seconds, price)| priced_point(seconds, price))
            .collect::<Result<Vec<_>>>()?;
        Ok(into_series(points))
    }
}

pub struct TransposedDecoder;

impl HistoryDecoder for TransposedDecoder {
    fn format(&self) -> HistoryFormat {
        HistoryFormat::TimeseriesTransposed
    }

    fn decode(&self, body: &[u8], _grade: Grade) -> Result<Vec<HistoryPoint>> {
        /// Empty columns come as `null`.
        #[serde_as]
        #[derive(Deserialize)]
        struct Columns(
            #[serde_as(as = "serde_with::DefaultOnNull")] Vec<f64>,
            #[serde_as(as = "serde_with::DefaultOnNull")] Vec<f64>,
        );

        let Columns(timestamps, prices) =
            serde_json::from_slice(body).context("failed to deserialize the time series columns")?;
        ensure!(
            timestamps.len() == prices.len(),
            "the time series columns differ in length: {} timestamps, {} prices",
            timestamps.len(),
            prices.len(),
        );
        let points = timestamps
            .into_iter()
            .zip(prices)
            .filter_map(|(seconds, price)| priced_point(seconds, price))
            .collect::<Result<Vec<_>>>()?;
        Ok(into_series(points))
    }
}

pub struct CsvDecoder;

impl HistoryDecoder for CsvDecoder {
    fn format(&self) -> HistoryFormat {
        HistoryFormat::Csv
    }

    fn decode(&self, body: &[u8], grade: Grade) -> Result<Vec<HistoryPoint>> {
        let records = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_reader(body)
            .deserialize()
            .collect::<Result<Vec<SnapshotRecord>, _>>()
            .context("failed to read the history rows")?;
        Ok(into_series(records.into_iter().filter_map(|record| {
            record.price(grade).map(|price| HistoryPoint::new(record.timestamp, price))
        })))
    }
}

/// A zero price means the grade was not on sale: no point.
fn priced_point(seconds: f64, price: f64) -> Option<Result<HistoryPoint>> {
    let price = Dollars::from(price);
    if price.is_zero() {
        return None;
    }
    Some(from_unix_seconds(seconds).map(|timestamp| HistoryPoint::new(timestamp, price)))
}

#[allow(clippy::cast_possible_truncation)]
fn from_unix_seconds(seconds: f64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis((seconds * 1000.0).round() as i64)
        .with_context(|| format!("timestamp `{seconds}` is out of range"))
}

fn into_series(points: impl IntoIterator<Item = HistoryPoint>) -> Vec<HistoryPoint> {
    points.into_iter().sorted_by_key(|point| point.timestamp).collect()
}
