//! Integration tests for end-to-end EAN-13 recovery
//!
//! These tests render synthetic labels, disturb them the way a handheld
//! photograph would (rotation, inverted polarity, upside down, oversized)
//! and check that the scanner returns the printed code or nothing at all.

use image::{GrayImage, Luma, imageops};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use imageproc::rect::Rect;
use rust_ean::decoder::checksum::{append_check, check_digit, is_valid};
use rust_ean::tools::synth::{RenderOptions, render_ean13};
use rust_ean::{CodeError, Ean13, ScanConfig, ScanError, Scanner, scan, scan_path};

const KNOWN: &str = "4006381333931";

fn code(text: &str) -> Ean13 {
    text.parse().expect("valid test code")
}

fn rotation_options() -> RenderOptions {
    RenderOptions {
        module: 5,
        bar_height: 150,
        margin: 90,
        ..RenderOptions::default()
    }
}

fn rotated(degrees: f32) -> GrayImage {
    rotate_label(&rotation_options(), degrees)
}

fn rotate_label(options: &RenderOptions, degrees: f32) -> GrayImage {
    let gray = render_ean13(&code(KNOWN), options);
    rotate_about_center(
        &gray,
        degrees.to_radians(),
        Interpolation::Bilinear,
        Luma([255u8]),
    )
}

#[test]
fn test_clean_label() {
    let gray = render_ean13(&code(KNOWN), &RenderOptions::default());
    let detection = Scanner::default().detect(&gray).expect("code found");
    assert_eq!(detection.code.to_string(), KNOWN);
    assert!(!detection.reversed);
    assert!(detection.downscaled.is_none());
    assert!(detection.band_rows.0 < detection.band_rows.1);
}

#[test]
fn test_other_codes() {
    for text in ["5901234123457", "0012345678905", "9780201379624"] {
        let gray = render_ean13(&code(text), &RenderOptions::default());
        assert_eq!(scan(&gray).map(|c| c.to_string()), Some(text.to_string()));
    }
}

#[test]
fn test_small_rotations() {
    for degrees in [5.0f32, -5.0] {
        assert_eq!(scan(&rotated(degrees)), Some(code(KNOWN)), "rotation {degrees}");
    }
}

#[test]
fn test_moderate_rotations() {
    for degrees in [10.0f32, -10.0] {
        assert_eq!(scan(&rotated(degrees)), Some(code(KNOWN)), "rotation {degrees}");
    }
}

#[test]
fn test_rotated_inverted_labels() {
    let options = RenderOptions {
        invert: true,
        ..rotation_options()
    };
    for degrees in [-10.0f32, -5.5, 5.0, 8.5, 10.0] {
        let gray = rotate_label(&options, degrees);
        assert_eq!(scan(&gray), Some(code(KNOWN)), "rotation {degrees}");
    }
}

#[test]
fn test_small_modules() {
    for module in [2, 3] {
        for invert in [false, true] {
            let options = RenderOptions {
                module,
                invert,
                ..RenderOptions::default()
            };
            let gray = render_ean13(&code(KNOWN), &options);
            assert_eq!(scan(&gray), Some(code(KNOWN)), "module {module} invert {invert}");
        }
    }
}

#[test]
fn test_clutter_below_bars() {
    let mut gray = render_ean13(&code(KNOWN), &RenderOptions::default());
    for x in (48..428).step_by(4) {
        draw_filled_rect_mut(&mut gray, Rect::at(x, 196).of_size(2, 20), Luma([0u8]));
    }
    let (detection, tel) = Scanner::default().detect_with_telemetry(&gray);
    let detection = detection.expect("code found");
    assert_eq!(detection.code, code(KNOWN));
    assert!(tel.scanlines_tried >= 1);
    assert!(tel.scanlines_tried <= ScanConfig::default().scanline_attempts);
}

#[test]
fn test_inverted_label() {
    let options = RenderOptions {
        invert: true,
        ..RenderOptions::default()
    };
    let gray = render_ean13(&code(KNOWN), &options);
    assert_eq!(scan(&gray), Some(code(KNOWN)));
}

#[test]
fn test_upside_down_label() {
    let gray = imageops::rotate180(&render_ean13(&code(KNOWN), &RenderOptions::default()));
    let detection = Scanner::default().detect(&gray).expect("code found");
    assert_eq!(detection.code, code(KNOWN));
    assert!(detection.reversed);
}

#[test]
fn test_upside_down_needs_reversed_pass() {
    let gray = imageops::rotate180(&render_ean13(&code(KNOWN), &RenderOptions::default()));
    let config = ScanConfig {
        try_reversed: false,
        ..ScanConfig::default()
    };
    assert_eq!(Scanner::new(config).scan(&gray), None);
}

#[test]
fn test_oversized_label_is_downscaled() {
    let options = RenderOptions {
        module: 12,
        bar_height: 360,
        margin: 200,
        ..RenderOptions::default()
    };
    let gray = render_ean13(&code(KNOWN), &options);
    assert!(gray.width() > 1200);
    let detection = Scanner::default().detect(&gray).expect("code found");
    assert_eq!(detection.code, code(KNOWN));
    let (w, h) = detection.downscaled.expect("downscaled");
    assert_eq!(w.max(h), 1000);
}

#[test]
fn test_no_barcode() {
    assert_eq!(scan(&GrayImage::new(0, 0)), None);
    assert_eq!(scan(&GrayImage::from_pixel(640, 480, Luma([255u8]))), None);
    assert_eq!(scan(&GrayImage::from_pixel(640, 480, Luma([0u8]))), None);
    assert_eq!(scan(&GrayImage::from_pixel(15, 90, Luma([255u8]))), None);
}

#[test]
fn test_scan_is_deterministic() {
    let gray = rotated(5.0);
    let scanner = Scanner::default();
    let first = scanner.detect_with_telemetry(&gray);
    let second = scanner.detect_with_telemetry(&gray);
    assert_eq!(first, second);
}

#[test]
fn test_checksum_contract() {
    let data = [4, 0, 0, 6, 3, 8, 1, 3, 3, 3, 9, 3];
    assert_eq!(check_digit(&data), 1);
    let full = append_check(&data);
    assert!(is_valid(&full));

    // Recomputing the check digit of a valid code reproduces it
    let decoded = code(KNOWN);
    assert_eq!(check_digit(&decoded.data_digits()), decoded.check());

    // Any single-digit substitution is detected
    for position in 0..13 {
        for delta in 1..10u8 {
            let mut corrupted = full;
            corrupted[position] = (corrupted[position] + delta) % 10;
            assert!(!is_valid(&corrupted), "position {position} delta {delta}");
        }
    }
}

#[test]
fn test_code_parsing_errors() {
    assert!(matches!("400638133393".parse::<Ean13>(), Err(CodeError::Length(12))));
    assert!(matches!("40063813339x1".parse::<Ean13>(), Err(CodeError::NonDigit('x'))));
    assert!(matches!(
        "4006381333932".parse::<Ean13>(),
        Err(CodeError::CheckDigit { expected: 1, found: 2 })
    ));
}

#[test]
fn test_unreadable_path() {
    let err = scan_path("/no/such/dir/label.png").unwrap_err();
    assert!(matches!(err, ScanError::Unreadable { .. }));
}
