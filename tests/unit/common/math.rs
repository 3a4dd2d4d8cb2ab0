//! Unit tests for moving-average helpers

use zerozoro::common::math::{ema_from_previous, ema_series, sma};

#[test]
fn test_sma_uses_last_window() {
    assert_eq!(sma(&[1.0, 2.0, 3.0, 4.0], 2), Some(3.5));
    assert_eq!(sma(&[1.0], 2), None);
    assert_eq!(sma(&[1.0, 2.0], 0), None);
}

#[test]
fn test_ema_from_previous_smoothing() {
    // period 3 -> alpha 0.5
    assert_eq!(ema_from_previous(4.0, 2.0, 3), 3.0);
}

#[test]
fn test_ema_series_seeded_with_sma() {
    let ema = ema_series(&[1.0, 2.0, 3.0, 4.0, 5.0], 3).unwrap();
    assert_eq!(ema.len(), 5);
    assert!(ema[0].is_nan());
    assert!(ema[1].is_nan());
    assert_eq!(&ema[2..], &[2.0, 3.0, 4.0]);
}

#[test]
fn test_ema_series_skips_leading_nan() {
    let ema = ema_series(&[f64::NAN, 2.0, 4.0, 6.0], 2).unwrap();
    assert!(ema[0].is_nan());
    assert!(ema[1].is_nan());
    assert_eq!(ema[2], 3.0);
    assert!((ema[3] - 5.0).abs() < 1e-12);
}

#[test]
fn test_ema_series_insufficient_data() {
    assert!(ema_series(&[1.0, 2.0], 3).is_none());
    assert!(ema_series(&[], 3).is_none());
    assert!(ema_series(&[f64::NAN, f64::NAN], 1).is_none());
}
