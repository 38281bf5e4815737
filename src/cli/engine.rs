use clap::Parser;

use crate::core::{EngineSettings, range::RangePlanner};

#[derive(Parser)]
pub struct EngineArgs {
    /// Widest date window the pool price API accepts in one call.
    #[clap(long = "max-window-days", env = "MAX_WINDOW_DAYS", default_value = "366", global = true)]
    max_window_days: u32,

    /// Days per planned chunk when a range does not fit into the window.
    #[clap(long = "chunk-days", env = "CHUNK_DAYS", default_value = "334", global = true)]
    chunk_days: u32,

    /// Widest date window the load API accepts in one call.
    #[clap(
        long = "load-max-window-days",
        env = "LOAD_MAX_WINDOW_DAYS",
        default_value = "31",
        global = true
    )]
    load_max_window_days: u32,

    /// Pause between successive upstream calls.
    #[clap(long = "chunk-delay", env = "CHUNK_DELAY", default_value = "500ms", global = true)]
    chunk_delay: humantime::Duration,

    /// Number of calendar years in the historical scan, including the current one.
    #[clap(long = "years", env = "HISTORICAL_YEARS", default_value = "8", global = true)]
    historical_years: u32,
}

impl From<&EngineArgs> for EngineSettings {
    fn from(args: &EngineArgs) -> Self {
        Self {
            planner: RangePlanner::new(args.max_window_days, args.chunk_days),
            chunk_delay: args.chunk_delay.into(),
            load_max_window_days: args.load_max_window_days,
            historical_years: args.historical_years,
        }
    }
}
