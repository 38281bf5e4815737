mod engine;
mod output;
mod upstream;

use chrono::Local;
use clap::{Parser, Subcommand};

pub use self::output::OutputFormat;
use crate::{
    api::LoadSource,
    cli::{engine::EngineArgs, upstream::UpstreamArgs},
    core::{
        Engine,
        EngineSettings,
        PipelineError,
        request::{Request, Timeframe},
        response::Response,
    },
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    /// Output format of the response.
    #[clap(long, env = "OUTPUT_FORMAT", value_enum, default_value = "json", global = true)]
    format: OutputFormat,

    #[clap(flatten)]
    upstream: UpstreamArgs,

    #[clap(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub async fn run(self) -> Result {
        match self.respond().await {
            Ok(response) => self.format.print_response(&response),
            Err(error) => {
                self.format.print_error(&error)?;
                Err(error.into())
            }
        }
    }

    async fn respond(&self) -> Result<Response, PipelineError> {
        let request = self.command.to_request()?;
        let client = self
            .upstream
            .client()
            .map_err(|error| PipelineError::Authentication(format!("{error:#}")))?;
        let prices = self.upstream.pool_price_api(client.clone());
        let loads = self.upstream.load_api(client);
        Engine::builder()
            .prices(&prices)
            .maybe_loads(loads.as_ref().map(|api| api as &dyn LoadSource))
            .settings(EngineSettings::from(&self.engine))
            .run(request, Local::now())
            .await
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Trailing 30 days with the full analytics.
    Monthly(UptimeArgs),

    /// Trailing 12 months with the full analytics and the seasonal breakdown.
    Yearly(UptimeArgs),

    /// Raw hourly prices of an explicit date range.
    Custom(CustomArgs),

    /// Year-by-year summaries of the last calendar years.
    Historical(UptimeArgs),

    /// Run a JSON request, for example: `{"timeframe": "monthly", "uptimePercentage": 95}`.
    Query {
        request: String,
    },
}

impl Command {
    fn to_request(&self) -> Result<Request, PipelineError> {
        match self {
            Self::Monthly(args) => Ok(args.to_request(Timeframe::Monthly)),
            Self::Yearly(args) => Ok(args.to_request(Timeframe::Yearly)),
            Self::Historical(args) => Ok(args.to_request(Timeframe::Historical)),
            Self::Custom(args) => Ok(Request {
                start_date: Some(args.start.clone()),
                end_date: Some(args.end.clone()),
                ..Request::new(Timeframe::Custom)
            }),
            Self::Query { request } => serde_json::from_str(request).map_err(|error| {
                PipelineError::validation(format!("the request is not valid: {error}"))
            }),
        }
    }
}

#[derive(Parser)]
pub struct UptimeArgs {
    /// Share of the cheapest hours to keep, in percent.
    #[clap(long = "uptime")]
    uptime_percentage: Option<f64>,
}

impl UptimeArgs {
    fn to_request(&self, timeframe: Timeframe) -> Request {
        Request { uptime_percentage: self.uptime_percentage, ..Request::new(timeframe) }
    }
}

#[derive(Parser)]
pub struct CustomArgs {
    /// First date, `YYYY-MM-DD`.
    #[clap(long)]
    start: String,

    /// Last date, `YYYY-MM-DD`, inclusive.
    #[clap(long)]
    end: String,
}
