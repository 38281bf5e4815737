//! [AESO](https://developer-apim.aeso.ca) pool price report client.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_with::serde_as;

use crate::{
    api::{
        FetchError,
        PriceSource,
        RetryPolicy,
        client,
        envelope::{Response, deserialize_market_time, require_report},
    },
    core::{point::PricePoint, range::DateChunk},
    prelude::*,
};

pub const DEFAULT_URL: &str = "https://apimgw.aeso.ca/public/poolprice-api/v1.1/price/poolPrice";

const REPORT_KEY: &str = "Pool Price Report";

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
impl PriceSource for Api {
    #[instrument(skip_all, fields(start = %window.start, end = %window.end))]
    async fn get_pool_prices(&self, window: DateChunk) -> Result<Vec<PricePoint>, FetchError> {
        info!("fetching…");
        let body = Result::<Body, _>::from(
            client::get_window::<Response<Body>>(&self.client, &self.url, window, self.retry_policy)
                .await?,
        )?;
        let points: Vec<_> = require_report(body.report, REPORT_KEY)?
            .into_iter()
            .map(|row| PricePoint::new(row.begin_at, row.pool_price))
            .collect();
        info!(n_points = points.len(), "fetched");
        Ok(points)
    }
}

#[serde_as]
#[derive(Deserialize)]
struct Body {
    #[serde_as(as = "Option<serde_with::VecSkipError<_>>")]
    #[serde(rename = "Pool Price Report")]
    report: Option<Vec<Row>>,
}

#[serde_as]
#[derive(Deserialize)]
struct Row {
    #[serde(rename = "begin_datetime_mpt", deserialize_with = "deserialize_market_time")]
    begin_at: NaiveDateTime,

    /// Dollars per megawatt-hour. The report gives it as a string.
    #[serde_as(as = "serde_with::PickFirst<(_, serde_with::DisplayFromStr)>")]
    #[serde(rename = "pool_price")]
    pool_price: f64,
}
