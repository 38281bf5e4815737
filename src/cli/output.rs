use clap::ValueEnum;

use crate::{
    core::{ErrorBody, PipelineError, response::Response},
    prelude::*,
    tables::{
        build_predictions_table,
        build_raw_table,
        build_seasons_table,
        build_statistics_table,
        build_yearly_table,
    },
};

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON response.
    Json,

    /// Human-readable tables with the headline numbers.
    Table,
}

impl OutputFormat {
    pub fn print_response(self, response: &Response) -> Result {
        match self {
            Self::Json => {
                println!("{}", serde_json::to_string_pretty(response)?);
            }
            Self::Table => match response {
                Response::Raw(rows) => {
                    println!("{}", build_raw_table(rows));
                }
                Response::Analytics(report) => {
                    println!(
                        "{}",
                        build_statistics_table(&report.statistics, report.uptime_statistics.as_ref())
                    );
                    if let Some(seasons) = &report.seasonal_patterns {
                        println!("{}", build_seasons_table(seasons));
                    }
                    println!("{}", build_predictions_table(&report.predictions));
                    for pattern in &report.patterns {
                        println!("{}", pattern.description);
                    }
                }
                Response::Historical(report) => {
                    println!("{}", build_yearly_table(&report.historical_years));
                    println!(
                        "{} of {} years with real data",
                        report.real_data_years, report.total_years
                    );
                }
            },
        }
        Ok(())
    }

    /// Print the structured error in the JSON mode, the table mode leaves it to the logs.
    pub fn print_error(self, error: &PipelineError) -> Result {
        error!("{}", error.details());
        if matches!(self, Self::Json) {
            println!("{}", serde_json::to_string_pretty(&ErrorBody::from(error))?);
        }
        Ok(())
    }
}
