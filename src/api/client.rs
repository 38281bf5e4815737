use std::time::Duration;

use reqwest::{
    Client,
    Url,
    header::{HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};

use crate::{
    api::{FetchError, RetryPolicy},
    core::range::DateChunk,
    prelude::*,
};

/// Build a client which authenticates every call with the API key.
pub fn try_new(api_key: &str, timeout: Duration) -> Result<Client> {
    let mut api_key = HeaderValue::from_str(api_key).context("the API key is not a valid header")?;
    api_key.set_sensitive(true);
    let mut headers = HeaderMap::new();
    headers.insert("api-key", api_key);
    Ok(Client::builder()
        .user_agent(concat!("poolprice/", env!("CARGO_PKG_VERSION")))
        .default_headers(headers)
        .timeout(timeout)
        .build()?)
}

#[derive(Serialize)]
struct WindowQuery {
    #[serde(rename = "startDate")]
    start_date: chrono::NaiveDate,

    #[serde(rename = "endDate")]
    end_date: chrono::NaiveDate,
}

/// Build the endpoint URL for the date window, both ends are inclusive.
pub fn window_url(base_url: &Url, window: DateChunk) -> Result<Url, FetchError> {
    let query = serde_qs::to_string(&WindowQuery { start_date: window.start, end_date: window.end })
        .map_err(|error| FetchError::Validation { message: error.to_string() })?;
    let mut url = base_url.clone();
    url.set_query(Some(&query));
    Ok(url)
}

/// Call the windowed endpoint and deserialize the JSON response.
#[instrument(skip_all, level = Level::DEBUG, fields(path = base_url.path()))]
pub async fn get_window<R: DeserializeOwned>(
    client: &Client,
    base_url: &Url,
    window: DateChunk,
    retry_policy: RetryPolicy,
) -> Result<R, FetchError> {
    let url = &window_url(base_url, window)?;
    retry_policy
        .run(move || async move {
            let response = client.get(url.clone()).send().await?;
            let status = response.status();
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(FetchError::from_status(status, message));
            }
            let body = response.text().await?;
            debug!(n_bytes = body.len(), "received");
            serde_json::from_str::<R>(&body).map_err(|error| FetchError::envelope(error.to_string()))
        })
        .await
}
