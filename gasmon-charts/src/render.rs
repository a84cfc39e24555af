//! Chart rendering to in-memory PNG buffers
//!
//! Both charts draw onto an RGB buffer through plotters' bitmap backend and
//! encode the result as PNG bytes. No temporary files.

use crate::aggregate::{is_high_reading, DailyPoint, ValueHistogram};
use gasmon_common::{GasmonError, Result};
use image::{DynamicImage, ImageFormat, RgbImage};
use plotters::prelude::*;
use plotters::style::FontTransform;
use std::io::Cursor;
use tracing::debug;

/// Canvas size for a rendered chart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for ChartDimensions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
        }
    }
}

const BACKGROUND: RGBColor = WHITE;
const SERIES_COLOR: RGBColor = RGBColor(31, 119, 180);
const HIGH_BAR_COLOR: RGBColor = RED;
const NORMAL_BAR_COLOR: RGBColor = BLUE;

const CAPTION_FONT_FAMILY: &str = "sans-serif";
const CAPTION_FONT_SIZE: i32 = 28;
const LABEL_FONT_SIZE: i32 = 12;
const MARGIN: i32 = 20;
const X_LABEL_AREA_SIZE: u32 = 90;
const Y_LABEL_AREA_SIZE: u32 = 60;
const MARKER_RADIUS: i32 = 4;
const BAR_HALF_WIDTH: f64 = 0.4;
const MAX_X_LABELS: usize = 30;

/// Fill color for one histogram bar under the fixed threshold rule
pub fn bar_color(value: i64) -> RGBColor {
    if is_high_reading(value) {
        HIGH_BAR_COLOR
    } else {
        NORMAL_BAR_COLOR
    }
}

/// Render the daily mean series as a line chart with point markers.
///
/// X ticks carry rotated date labels; grid lines are enabled.
pub fn render_daily_mean_line(series: &[DailyPoint], dims: ChartDimensions) -> Result<Vec<u8>> {
    if series.is_empty() {
        return Err(GasmonError::render("No data to render"));
    }

    let mut buffer = rgb_buffer(dims);
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (dims.width, dims.height)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let y_max = padded_max(series.iter().map(|point| point.mean));
        let x_max = series.len() as f64 - 0.5;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Daily mean of gas sensor readings",
                (CAPTION_FONT_FAMILY, CAPTION_FONT_SIZE),
            )
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(-0.5..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Date")
            .y_desc("Gas sensor value")
            .x_labels(series.len().min(MAX_X_LABELS))
            .x_label_style(
                (CAPTION_FONT_FAMILY, LABEL_FONT_SIZE)
                    .into_font()
                    .transform(FontTransform::Rotate90),
            )
            .x_label_formatter(&|x| {
                index_label(*x, series.len(), |i| {
                    series[i].date.format("%Y-%m-%d").to_string()
                })
            })
            .draw()?;

        chart.draw_series(LineSeries::new(
            series
                .iter()
                .enumerate()
                .map(|(i, point)| (i as f64, point.mean)),
            &SERIES_COLOR,
        ))?;

        chart.draw_series(series.iter().enumerate().map(|(i, point)| {
            Circle::new((i as f64, point.mean), MARKER_RADIUS, SERIES_COLOR.filled())
        }))?;

        root.present()?;
    }

    debug!("Rendered daily mean line chart with {} points", series.len());
    encode_png(buffer, dims)
}

/// Render the value histogram as a bar chart.
///
/// One bar per distinct value in first-observed order, red above the high
/// threshold and blue otherwise; grid lines are enabled.
pub fn render_histogram_bars(histogram: &ValueHistogram, dims: ChartDimensions) -> Result<Vec<u8>> {
    if histogram.is_empty() {
        return Err(GasmonError::render("No data to render"));
    }

    let labels = histogram.labels();
    let mut buffer = rgb_buffer(dims);
    {
        let root =
            BitMapBackend::with_buffer(&mut buffer, (dims.width, dims.height)).into_drawing_area();
        root.fill(&BACKGROUND)?;

        let y_max = padded_max(histogram.iter().map(|(_, count)| count as f64));
        let x_max = labels.len() as f64 - 0.5;

        let mut chart = ChartBuilder::on(&root)
            .caption(
                "Gas sensor readings",
                (CAPTION_FONT_FAMILY, CAPTION_FONT_SIZE),
            )
            .margin(MARGIN)
            .x_label_area_size(X_LABEL_AREA_SIZE)
            .y_label_area_size(Y_LABEL_AREA_SIZE)
            .build_cartesian_2d(-0.5..x_max, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Reading value")
            .y_desc("Count")
            .x_labels(labels.len().min(MAX_X_LABELS))
            .x_label_formatter(&|x| index_label(*x, labels.len(), |i| labels[i].to_string()))
            .draw()?;

        for (i, (value, count)) in histogram.iter().enumerate() {
            let center = i as f64;
            chart.draw_series(std::iter::once(Rectangle::new(
                [
                    (center - BAR_HALF_WIDTH, 0.0),
                    (center + BAR_HALF_WIDTH, count as f64),
                ],
                bar_color(value).filled(),
            )))?;
        }

        root.present()?;
    }

    debug!("Rendered histogram bar chart with {} bars", labels.len());
    encode_png(buffer, dims)
}

fn rgb_buffer(dims: ChartDimensions) -> Vec<u8> {
    vec![255u8; dims.width as usize * dims.height as usize * 3]
}

/// Max of the inputs with 10% headroom, never collapsing to an empty range
fn padded_max(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0, f64::max) * 1.1;
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Tick label for an index-positioned axis; off-index ticks stay blank
fn index_label(x: f64, len: usize, label: impl Fn(usize) -> String) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 0.01 || rounded < 0.0 {
        return String::new();
    }
    let index = rounded as usize;
    if index < len {
        label(index)
    } else {
        String::new()
    }
}

fn encode_png(buffer: Vec<u8>, dims: ChartDimensions) -> Result<Vec<u8>> {
    let rgb_image = RgbImage::from_raw(dims.width, dims.height, buffer)
        .ok_or_else(|| GasmonError::render("Image buffer conversion failed"))?;

    let mut output = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(rgb_image)
        .write_to(&mut output, ImageFormat::Png)
        .map_err(|e| GasmonError::render_with_source("PNG encoding failed", e))?;

    Ok(output.into_inner())
}
