//! Chart rendering for alert attachments

use crate::models::indicators::IndicatorFrame;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;
use tracing::{error, warn};

pub trait ChartRenderer: Send + Sync {
    /// Encoded image, or an empty vec when nothing could be drawn
    fn render_chart(&self, frame: &IndicatorFrame, title: &str) -> Vec<u8>;

    /// File extension of the encoded image
    fn extension(&self) -> &'static str;
}

mod colors {
    use image::Rgb;

    pub const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
    pub const BULLISH: Rgb<u8> = Rgb([38, 166, 154]);
    pub const BEARISH: Rgb<u8> = Rgb([239, 83, 80]);
    pub const ZERO_LINE: Rgb<u8> = Rgb([153, 153, 153]);
    pub const HISTOGRAM: Rgb<u8> = Rgb([200, 200, 200]);
    pub const MACD: Rgb<u8> = Rgb([33, 150, 243]);
    pub const SIGNAL: Rgb<u8> = Rgb([255, 152, 0]);
    pub const MARKER: Rgb<u8> = Rgb([255, 0, 0]);
}

/// Canvas layout
#[derive(Debug, Clone)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub margin: u32,
    pub panel_gap: u32,
    /// Share of the plot height given to the price panel
    pub price_share: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 800,
            margin: 40,
            panel_gap: 30,
            price_share: 0.6,
        }
    }
}

/// Candles on top, MACD below, encoded as PNG
#[derive(Debug, Default, Clone)]
pub struct PngChartRenderer {
    config: ChartConfig,
}

impl PngChartRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ChartConfig) -> Self {
        Self { config }
    }
}

/// Linear mapping from a value range to a vertical pixel band
struct Scale {
    min: f64,
    max: f64,
    top: f64,
    bottom: f64,
}

impl Scale {
    fn new<I: IntoIterator<Item = f64>>(values: I, top: f64, bottom: f64) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        if !min.is_finite() || !max.is_finite() {
            return None;
        }
        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        Some(Self {
            min: min - pad,
            max: max + pad,
            top,
            bottom,
        })
    }

    fn y(&self, value: f64) -> i32 {
        (self.bottom - (value - self.min) / (self.max - self.min) * (self.bottom - self.top))
            .round() as i32
    }
}

fn put(img: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>) {
    if x >= 0 && y >= 0 && (x as u32) < img.width() && (y as u32) < img.height() {
        img.put_pixel(x as u32, y as u32, color);
    }
}

/// Bresenham line, clipped to the canvas
fn draw_line(img: &mut RgbImage, (x1, y1): (i32, i32), (x2, y2): (i32, i32), color: Rgb<u8>) {
    let dx = (x2 - x1).abs();
    let dy = (y2 - y1).abs();
    let sx = if x1 < x2 { 1 } else { -1 };
    let sy = if y1 < y2 { 1 } else { -1 };
    let mut err = dx - dy;
    let (mut x, mut y) = (x1, y1);

    loop {
        put(img, x, y, color);
        if x == x2 && y == y2 {
            break;
        }
        let e2 = 2 * err;
        if e2 > -dy {
            err -= dy;
            x += sx;
        }
        if e2 < dx {
            err += dx;
            y += sy;
        }
    }
}

fn fill_rect(img: &mut RgbImage, left: i32, top: i32, right: i32, bottom: i32, color: Rgb<u8>) {
    for y in top.min(bottom)..=top.max(bottom) {
        for x in left.min(right)..=left.max(right) {
            put(img, x, y, color);
        }
    }
}

fn draw_ring(img: &mut RgbImage, (cx, cy): (i32, i32), radius: i32, color: Rgb<u8>) {
    for y in -radius - 1..=radius + 1 {
        for x in -radius - 1..=radius + 1 {
            let d = ((x * x + y * y) as f64).sqrt();
            if (d - radius as f64).abs() <= 1.0 {
                put(img, cx + x, cy + y, color);
            }
        }
    }
}

/// Connect consecutive finite points; gaps break the line
fn draw_series(img: &mut RgbImage, xs: &[i32], values: &[f64], scale: &Scale, color: Rgb<u8>) {
    let mut previous: Option<(i32, i32)> = None;
    for (x, value) in xs.iter().zip(values) {
        if !value.is_finite() {
            previous = None;
            continue;
        }
        let point = (*x, scale.y(*value));
        if let Some(from) = previous {
            draw_line(img, from, point, color);
        }
        previous = Some(point);
    }
}

fn encode_png(img: RgbImage) -> Result<Vec<u8>, image::ImageError> {
    let mut bytes = Vec::new();
    DynamicImage::ImageRgb8(img).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

impl PngChartRenderer {
    fn draw(&self, frame: &IndicatorFrame) -> Option<RgbImage> {
        let candles = &frame.candles;
        let macd = frame.macd.as_ref()?;
        let n = candles.len();
        if n == 0 || macd.len() != n {
            return None;
        }

        let cfg = &self.config;
        let (width, height) = (cfg.width as f64, cfg.height as f64);
        let margin = cfg.margin as f64;
        let plot_width = width - 2.0 * margin;
        let plot_height = height - 2.0 * margin - cfg.panel_gap as f64;
        let price_top = margin;
        let price_bottom = price_top + plot_height * cfg.price_share;
        let macd_top = price_bottom + cfg.panel_gap as f64;
        let macd_bottom = height - margin;

        let step = plot_width / n as f64;
        let xs: Vec<i32> = (0..n)
            .map(|i| (margin + step * (i as f64 + 0.5)).round() as i32)
            .collect();
        let half_body = ((step * 0.3).round() as i32).max(0);

        let price = Scale::new(
            candles.iter().flat_map(|c| [c.low, c.high]),
            price_top,
            price_bottom,
        )?;
        let osc = Scale::new(
            macd.main
                .iter()
                .chain(&macd.signal)
                .chain(&macd.histogram)
                .copied()
                .chain([0.0]),
            macd_top,
            macd_bottom,
        )?;

        let mut img = RgbImage::from_pixel(cfg.width, cfg.height, colors::BACKGROUND);

        for (candle, &x) in candles.iter().zip(&xs) {
            let color = if candle.close >= candle.open {
                colors::BULLISH
            } else {
                colors::BEARISH
            };
            draw_line(
                &mut img,
                (x, price.y(candle.high)),
                (x, price.y(candle.low)),
                color,
            );
            fill_rect(
                &mut img,
                x - half_body,
                price.y(candle.open.max(candle.close)),
                x + half_body,
                price.y(candle.open.min(candle.close)),
                color,
            );
        }

        let zero = osc.y(0.0);
        for (hist, &x) in macd.histogram.iter().zip(&xs) {
            if hist.is_finite() {
                fill_rect(&mut img, x - half_body, osc.y(*hist), x + half_body, zero, colors::HISTOGRAM);
            }
        }
        // Dashed zero line
        let (left, right) = (margin as i32, (width - margin) as i32);
        for x in (left..right).step_by(8) {
            draw_line(&mut img, (x, zero), ((x + 4).min(right), zero), colors::ZERO_LINE);
        }
        draw_series(&mut img, &xs, &macd.main, &osc, colors::MACD);
        draw_series(&mut img, &xs, &macd.signal, &osc, colors::SIGNAL);

        if let (Some(last), Some(&x)) = (candles.last(), xs.last()) {
            draw_ring(&mut img, (x, price.y(last.close)), 6, colors::MARKER);
        }

        Some(img)
    }
}

impl ChartRenderer for PngChartRenderer {
    fn render_chart(&self, frame: &IndicatorFrame, title: &str) -> Vec<u8> {
        if frame.is_empty() {
            warn!("Attempted to generate chart from an empty series.");
            return Vec::new();
        }
        let Some(img) = self.draw(frame) else {
            error!(
                title = title,
                candles = frame.len(),
                "Failed to generate chart image"
            );
            return Vec::new();
        };
        match encode_png(img) {
            Ok(bytes) => bytes,
            Err(e) => {
                error!(title = title, error = %e, "Failed to encode chart image");
                Vec::new()
            }
        }
    }

    fn extension(&self) -> &'static str {
        "png"
    }
}
