pub mod client;
mod envelope;
mod error;
pub mod load;
pub mod pool_price;
mod retry;
mod source;

pub use self::{
    error::FetchError,
    retry::RetryPolicy,
    source::{LoadSource, PriceSource},
};
