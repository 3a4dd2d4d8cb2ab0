pub mod macd;

pub use macd::{calculate_macd_series, MacdCalculator};
