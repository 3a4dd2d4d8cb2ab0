//! Unit tests for the PNG chart renderer

use chrono::{Duration, TimeZone, Utc};
use zerozoro::config::MacdParams;
use zerozoro::indicators::momentum::MacdCalculator;
use zerozoro::models::indicators::{Candle, IndicatorFrame};
use zerozoro::services::charting::{ChartConfig, ChartRenderer, PngChartRenderer};

fn frame(len: usize) -> IndicatorFrame {
    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let candles = (0..len)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.4).sin() * 5.0;
            Candle::new(
                close - 1.0,
                close + 2.0,
                close - 2.0,
                close,
                1.0,
                start + Duration::days(i as i64),
            )
        })
        .collect();
    MacdCalculator::new(MacdParams::default()).apply(candles)
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[test]
fn test_renders_png_image() {
    let renderer = PngChartRenderer::new();
    let bytes = renderer.render_chart(&frame(60), "BTC-USD 1D: MACD Line Crossed ABOVE Zero");
    assert!(bytes.len() > PNG_SIGNATURE.len());
    assert_eq!(bytes[..8], PNG_SIGNATURE);
    assert_eq!(renderer.extension(), "png");
}

#[test]
fn test_png_has_configured_dimensions() {
    let renderer = PngChartRenderer::with_config(ChartConfig {
        width: 320,
        height: 200,
        ..ChartConfig::default()
    });
    let bytes = renderer.render_chart(&frame(30), "small");
    assert_eq!(bytes[..8], PNG_SIGNATURE);
    // IHDR width and height, big-endian, right after the chunk header
    assert_eq!(u32::from_be_bytes([bytes[16], bytes[17], bytes[18], bytes[19]]), 320);
    assert_eq!(u32::from_be_bytes([bytes[20], bytes[21], bytes[22], bytes[23]]), 200);
}

#[test]
fn test_renders_with_undefined_signal_line() {
    let renderer = PngChartRenderer::new();
    // Enough history for the main line only
    let bytes = renderer.render_chart(&frame(16), "warming up");
    assert_eq!(bytes[..8], PNG_SIGNATURE);
}

#[test]
fn test_empty_or_bare_frames_render_nothing() {
    let renderer = PngChartRenderer::new();
    assert!(renderer
        .render_chart(&IndicatorFrame::default(), "empty")
        .is_empty());

    let bare = IndicatorFrame::new(frame(10).candles);
    assert!(renderer.render_chart(&bare, "bare").is_empty());
}
