use average::Mean;
use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};

use crate::{
    core::{
        forecast::Prediction,
        historical::YearlySummary,
        response::RawRow,
        seasonal::SeasonalSummary,
        statistics::{SeriesStatistics, Trend},
    },
    fmt::{FormattedPercentage, FormattedPrice},
};

fn new_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .apply_modifier(modifiers::UTF8_ROUND_CORNERS)
        .enforce_styling();
    table
}

fn price_cell(price: f64, average: f64) -> Cell {
    Cell::new(FormattedPrice(price))
        .set_alignment(CellAlignment::Right)
        .fg(if price > average { Color::Red } else { Color::Green })
}

pub fn build_raw_table(rows: &[RawRow]) -> Table {
    let average = {
        let estimate: Mean = rows.iter().map(|row| row.price).collect();
        if estimate.is_empty() { 0.0 } else { estimate.mean() }
    };
    let mut table = new_table();
    table.set_header(vec!["Date", "Hour", "Price", "Load", "Generation"]);
    for row in rows {
        table.add_row(vec![
            Cell::new(row.ts.format("%b %d %Y")).add_attribute(Attribute::Dim),
            Cell::new(row.ts.format("%H:%M")),
            price_cell(row.price, average),
            Cell::new(row.ail.map_or_else(String::new, |load| format!("{load:.0} MW")))
                .set_alignment(CellAlignment::Right),
            Cell::new(
                row.generation.map_or_else(String::new, |generation| format!("{generation:.0} MW")),
            )
            .set_alignment(CellAlignment::Right)
            .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_statistics_table(
    statistics: &SeriesStatistics,
    uptime_statistics: Option<&SeriesStatistics>,
) -> Table {
    let mut table = new_table();
    table.set_header(vec!["", "Average", "Peak", "Low", "Volatility", "Trend"]);
    let rows = [("All hours", Some(statistics)), ("Uptime", uptime_statistics)];
    for (label, statistics) in rows {
        let Some(statistics) = statistics else {
            continue;
        };
        table.add_row(vec![
            Cell::new(label).add_attribute(Attribute::Bold),
            Cell::new(FormattedPrice(statistics.average)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPrice(statistics.peak))
                .set_alignment(CellAlignment::Right)
                .fg(Color::Red),
            Cell::new(FormattedPrice(statistics.low))
                .set_alignment(CellAlignment::Right)
                .fg(Color::Green),
            Cell::new(FormattedPercentage(statistics.volatility_percent))
                .set_alignment(CellAlignment::Right),
            Cell::new(format!("{:?}", statistics.trend)).fg(match statistics.trend {
                Trend::Up => Color::Red,
                Trend::Down => Color::Green,
                Trend::Stable => Color::Reset,
            }),
        ]);
    }
    table
}

pub fn build_seasons_table(seasons: &[SeasonalSummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Season", "Average", "Peak", "95% uptime"]);
    for season in seasons {
        table.add_row(vec![
            Cell::new(format!("{:?}", season.season)),
            Cell::new(FormattedPrice(season.average)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPrice(season.peak)).set_alignment(CellAlignment::Right),
            price_cell(season.uptime_95_price, season.average),
        ]);
    }
    table
}

pub fn build_predictions_table(predictions: &[Prediction]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Hour", "Predicted", "Confidence"]);
    for prediction in predictions {
        table.add_row(vec![
            Cell::new(prediction.timestamp.format("%b %d %H:%M")),
            Cell::new(FormattedPrice(prediction.predicted_price))
                .set_alignment(CellAlignment::Right),
            Cell::new(FormattedPercentage(prediction.confidence * 100.0))
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
        ]);
    }
    table
}

pub fn build_yearly_table(summaries: &[YearlySummary]) -> Table {
    let mut table = new_table();
    table.set_header(vec![
        "Year", "Average", "Peak", "Low", "Volatility", "Hours", "Kept", "Status",
    ]);
    for summary in summaries {
        if !summary.is_real {
            let mut row = vec![Cell::new(summary.year).add_attribute(Attribute::Dim)];
            row.extend((0..6).map(|_| Cell::new("")));
            row.push(
                Cell::new(summary.error.as_deref().unwrap_or("no data")).fg(Color::DarkYellow),
            );
            table.add_row(row);
            continue;
        }
        table.add_row(vec![
            Cell::new(summary.year).add_attribute(Attribute::Bold),
            Cell::new(FormattedPrice(summary.average)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPrice(summary.peak)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPrice(summary.low)).set_alignment(CellAlignment::Right),
            Cell::new(FormattedPercentage(summary.volatility_percent))
                .set_alignment(CellAlignment::Right),
            Cell::new(summary.data_point_count).set_alignment(CellAlignment::Right),
            Cell::new(summary.filtered_data_point_count)
                .set_alignment(CellAlignment::Right)
                .add_attribute(Attribute::Dim),
            Cell::new("real").fg(Color::Green),
        ]);
    }
    table
}
