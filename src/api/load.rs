//! [AESO](https://developer-apim.aeso.ca) Alberta Internal Load report client.
//!
//! Older date ranges are often missing from this report, callers treat any failure as non-fatal.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    api::{
        FetchError,
        LoadSource,
        RetryPolicy,
        client,
        envelope::{Response, deserialize_market_time, require_report},
    },
    core::{point::LoadRecord, range::DateChunk},
    prelude::*,
};

pub const DEFAULT_URL: &str =
    "https://apimgw.aeso.ca/public/actualforecast-api/v1/load/albertaInternalLoad";

const REPORT_KEY: &str = "Actual Forecast Report";

pub struct Api {
    client: Client,
    url: Url,
    retry_policy: RetryPolicy,
}

impl Api {
    pub const fn new(client: Client, url: Url, retry_policy: RetryPolicy) -> Self {
        Self { client, url, retry_policy }
    }
}

#[async_trait]
impl LoadSource for Api {
    #[instrument(skip_all, fields(start = %window.start, end = %window.end))]
    async fn get_load(&self, window: DateChunk) -> Result<Vec<LoadRecord>, FetchError> {
        debug!("fetching…");
        let body = Result::<Body, _>::from(
            client::get_window::<Response<Body>>(&self.client, &self.url, window, self.retry_policy)
                .await?,
        )?;
        let records: Vec<_> = require_report(body.report, REPORT_KEY)?
            .into_iter()
            .map(|row| LoadRecord {
                timestamp: row.begin_at,
                load: row.internal_load,
                generation: row.net_generation,
            })
            .collect();
        debug!(n_records = records.len(), "fetched");
        Ok(records)
    }
}

#[serde_as]
#[derive(Deserialize)]
struct Body {
    #[serde_as(as = "Option<serde_with::VecSkipError<_>>")]
    #[serde(rename = "Actual Forecast Report")]
    report: Option<Vec<Row>>,
}

#[serde_as]
#[derive(Deserialize)]
struct Row {
    #[serde(rename = "begin_datetime_mpt", deserialize_with = "deserialize_market_time")]
    begin_at: NaiveDateTime,

    /// Megawatts.
    #[serde_as(as = "Option<serde_with::PickFirst<(_, serde_with::DisplayFromStr)>>")]
    #[serde(rename = "alberta_internal_load")]
    internal_load: Option<f64>,

    /// Megawatts.
    #[serde_as(as = "Option<serde_with::PickFirst<(_, serde_with::DisplayFromStr)>>")]
    #[serde(rename = "total_net_generation")]
    net_generation: Option<f64>,
}
