use async_trait::async_trait;

use crate::{
    api::FetchError,
    core::{
        point::{LoadRecord, PricePoint},
        range::DateChunk,
    },
};

/// Primary hourly pool price source.
#[async_trait]
pub trait PriceSource: Sync {
    /// Fetch all hourly prices within the inclusive window.
    async fn get_pool_prices(&self, window: DateChunk) -> Result<Vec<PricePoint>, FetchError>;
}

/// Secondary hourly load source used for the best-effort enrichment.
#[async_trait]
pub trait LoadSource: Sync {
    async fn get_load(&self, window: DateChunk) -> Result<Vec<LoadRecord>, FetchError>;
}
