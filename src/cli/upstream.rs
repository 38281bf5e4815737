use clap::Parser;
use reqwest::{Client, Url};

use crate::{
    api::{RetryPolicy, client, load, pool_price},
    prelude::*,
};

#[derive(Parser)]
pub struct UpstreamArgs {
    /// AESO API gateway subscription key.
    #[clap(long = "api-key", env = "AESO_API_KEY", hide_env_values = true)]
    api_key: String,

    #[clap(long = "pool-price-url", env = "POOL_PRICE_URL", default_value = pool_price::DEFAULT_URL)]
    pool_price_url: Url,

    #[clap(long = "load-url", env = "LOAD_URL", default_value = load::DEFAULT_URL)]
    load_url: Url,

    /// Timeout of a single upstream call.
    #[clap(long = "request-timeout", env = "REQUEST_TIMEOUT", default_value = "30s")]
    request_timeout: humantime::Duration,

    /// Maximum attempts per call, including the first one.
    #[clap(long = "retry-attempts", env = "RETRY_ATTEMPTS", default_value = "3")]
    retry_attempts: u32,

    /// Backoff before the first retry, doubled for each next one.
    #[clap(long = "retry-delay", env = "RETRY_DELAY", default_value = "1s")]
    retry_delay: humantime::Duration,

    /// Do not fetch the load to enrich the prices.
    #[clap(long = "no-enrichment", env = "NO_ENRICHMENT")]
    no_enrichment: bool,
}

impl UpstreamArgs {
    pub fn client(&self) -> Result<Client> {
        client::try_new(&self.api_key, self.request_timeout.into())
    }

    pub fn pool_price_api(&self, client: Client) -> pool_price::Api {
        pool_price::Api::new(client, self.pool_price_url.clone(), self.retry_policy())
    }

    pub fn load_api(&self, client: Client) -> Option<load::Api> {
        if self.no_enrichment {
            info!("the load enrichment is disabled");
            return None;
        }
        Some(load::Api::new(client, self.load_url.clone(), self.retry_policy()))
    }

    fn retry_policy(&self) -> RetryPolicy {
        if self.retry_attempts <= 1 {
            return RetryPolicy::NONE;
        }
        RetryPolicy::builder()
            .max_attempts(self.retry_attempts)
            .initial_delay(self.retry_delay)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn parse(extra: &[&str]) -> Result<UpstreamArgs> {
        let args = ["poolprice", "--api-key", "secret"].iter().chain(extra);
        Ok(UpstreamArgs::try_parse_from(args)?)
    }

    #[test]
    fn test_single_attempt_disables_retries() -> Result {
        for attempts in ["0", "1"] {
            let args = parse(&["--retry-attempts", attempts, "--retry-delay", "5s"])?;
            assert_eq!(args.retry_policy(), RetryPolicy::NONE);
        }
        Ok(())
    }

    #[test]
    fn test_retry_policy_from_args() -> Result {
        let args = parse(&["--retry-attempts", "5", "--retry-delay", "250ms"])?;
        let expected = RetryPolicy::builder()
            .max_attempts(5)
            .initial_delay(Duration::from_millis(250))
            .build();
        assert_eq!(args.retry_policy(), expected);
        Ok(())
    }
}
