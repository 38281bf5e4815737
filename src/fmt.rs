use derive_more::{Display, From};

/// Value which is already in percent.
#[derive(Copy, Clone, Display, From)]
#[display("{_0:.1}%")]
pub struct FormattedPercentage(pub f64);

/// Dollars per megawatt-hour.
#[derive(Copy, Clone, Display, From)]
#[display("${_0:.2}")]
pub struct FormattedPrice(pub f64);
