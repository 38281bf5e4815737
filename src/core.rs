pub mod analytics;
pub mod engine;
pub mod enrich;
mod error;
pub mod forecast;
pub mod historical;
mod pacer;
pub mod patterns;
pub mod point;
pub mod range;
pub mod request;
pub mod response;
pub mod rollup;
pub mod seasonal;
pub mod statistics;
pub mod uptime;

pub use self::{
    engine::{Engine, EngineSettings},
    error::{ErrorBody, PipelineError},
};
