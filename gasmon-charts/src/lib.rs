//! Data shaping and chart rendering for the gasmon service

pub mod aggregate;
pub mod render;

pub use aggregate::{
    daily_mean, is_high_reading, DailyPoint, DailySeries, ValueHistogram, HIGH_THRESHOLD,
};
pub use render::{bar_color, render_daily_mean_line, render_histogram_bars, ChartDimensions};
