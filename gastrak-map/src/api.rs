//! History endpoint client.

use std::time::Duration;

use async_trait::async_trait;
use bon::bon;
use reqwest::Url;

use crate::{
    history::{
        HistoryPoint,
        HistoryQuery,
        decoder::{HistoryDecoder, HistoryFormat},
    },
    prelude::*,
};

/// Where the history panel gets its series from.
#[async_trait(?Send)]
pub trait HistorySource {
    async fn fetch(&self, query: &HistoryQuery) -> Result<Vec<HistoryPoint>>;
}

/// `GET <base>/history?name=…&grade=…&format=…`.
pub struct Client {
    inner: reqwest::Client,
    base_url: Url,
    decoder: Box<dyn HistoryDecoder>,
}

#[bon]
impl Client {
    #[builder]
    pub fn new(
        base_url: Url,
        #[builder(default)] format: HistoryFormat,
        #[builder(default = Duration::from_secs(10))] timeout: Duration,
    ) -> Result<Self> {
        ensure!(!base_url.cannot_be_a_base(), "`{base_url}` cannot be a base URL");
        let inner = reqwest::Client::builder().user_agent("gastrak").timeout(timeout).build()?;
        Ok(Self { inner, base_url, decoder: format.decoder() })
    }
}

impl Client {
    pub fn url(&self, query: &HistoryQuery) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| anyhow!("invalid base URL"))?
            .pop_if_empty()
            .push("history");
        url.query_pairs_mut()
            .append_pair("name", &query.station_name)
            .append_pair("grade", &query.grade.to_string())
            .append_pair("format", &self.decoder.format().to_string());
        Ok(url)
    }
}

#[async_trait(?Send)]
impl HistorySource for Client {
    #[instrument(skip_all, fields(station = %query.station_name, grade = %query.grade))]
    async fn fetch(&self, query: &HistoryQuery) -> Result<Vec<HistoryPoint>> {
        let url = self.url(query)?;
        let body = self
            .inner
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request the history from `{url}`"))?
            .error_for_status()?
            .bytes()
            .await
            .with_context(|| format!("failed to read the history from `{url}`"))?;
        let points = self
            .decoder
            .decode(&body, query.grade)
            .with_context(|| format!("failed to decode the history from `{url}`"))?;
        info!(n_points = points.len(), "fetched");
        Ok(points)
    }
}
