#![allow(clippy::items_after_test_module)]

/// Synthetic barcode rendering
pub mod synth;

use crate::error::ScanError;
use crate::models::{BitMatrix, Ean13};
use image::GrayImage;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Load an image from disk as 8-bit grayscale.
pub fn load_gray<P: AsRef<Path>>(path: P) -> Result<GrayImage, ScanError> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| ScanError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_luma8())
}

/// Summary statistics for grayscale data.
#[derive(Debug, Clone, Copy)]
pub struct GrayStats {
    /// Minimum grayscale value.
    pub min: u8,
    /// Maximum grayscale value.
    pub max: u8,
    /// Average grayscale value.
    pub avg: u8,
}

/// Summary statistics for a binary matrix.
#[derive(Debug, Clone, Copy)]
pub struct BinaryStats {
    /// Count of ink pixels.
    pub ink_pixels: usize,
    /// Total pixels in the matrix.
    pub total_pixels: usize,
    /// Ratio of ink pixels to total pixels.
    pub ink_ratio: f64,
}

/// Compute min/max/avg for grayscale values.
pub fn grayscale_stats(gray: &GrayImage) -> GrayStats {
    let mut min = u8::MAX;
    let mut max = u8::MIN;
    let mut sum: u64 = 0;
    for &v in gray.as_raw() {
        min = min.min(v);
        max = max.max(v);
        sum += v as u64;
    }
    let len = gray.as_raw().len();
    let avg = if len == 0 { 0 } else { (sum / len as u64) as u8 };
    GrayStats { min, max, avg }
}

/// Compute ink pixel stats for a binary matrix.
pub fn binary_stats(binary: &BitMatrix) -> BinaryStats {
    BinaryStats {
        ink_pixels: binary.count_ink(),
        total_pixels: binary.width() * binary.height(),
        ink_ratio: binary.ink_fraction(),
    }
}

/// Default dataset root from environment variables.
pub fn dataset_root_from_env() -> PathBuf {
    env::var("EAN_DATASET_ROOT")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("benches/images/ean13"))
}

/// Default bench limit from environment variables.
///
/// Returns `None` (full dataset) when `EAN_BENCH_LIMIT` is unset or set to `0`.
pub fn bench_limit_from_env() -> Option<usize> {
    match env::var("EAN_BENCH_LIMIT") {
        Ok(value) => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|v| if v == 0 { None } else { Some(v) }),
        Err(_) => None,
    }
}

/// Smoke test flag from environment variables.
pub fn smoke_from_env() -> bool {
    matches!(
        env::var("EAN_SMOKE").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes") | Ok("YES")
    )
}

/// First 13-digit token in `text` that is a valid code.
fn find_code(text: &str) -> Option<Ean13> {
    text.split(|c: char| !c.is_ascii_digit())
        .filter(|token| token.len() == 13)
        .find_map(|token| token.parse::<Ean13>().ok())
}

/// Expected code for a dataset image.
///
/// Reads a sidecar `<stem>.txt` next to the image first, then falls back to
/// a 13-digit code embedded in the file name.
pub fn expected_code_for<P: AsRef<Path>>(image_path: P) -> Option<Ean13> {
    let path = image_path.as_ref();
    let sidecar = path.with_extension("txt");
    if let Ok(contents) = fs::read_to_string(&sidecar) {
        let code = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .find_map(find_code);
        if code.is_some() {
            return code;
        }
    }
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .and_then(find_code)
}


/// Iterate dataset image paths with optional smoke list and limit.
pub fn dataset_iter<P: AsRef<Path>>(
    root: P,
    limit: Option<usize>,
    smoke: bool,
) -> impl Iterator<Item = PathBuf> {
    let root = root.as_ref();
    let mut images = if smoke {
        load_smoke_list(root).unwrap_or_else(|| collect_images(root))
    } else {
        collect_images(root)
    };

    images.sort();
    if let Some(limit) = limit {
        images.truncate(limit);
    }
    images.into_iter()
}

fn load_smoke_list(root: &Path) -> Option<Vec<PathBuf>> {
    let smoke_path = root.join("_smoke.txt");
    let contents = fs::read_to_string(&smoke_path).ok()?;
    let mut paths = Vec::new();
    for line in contents.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let candidate = Path::new(line);
        let path = if candidate.is_absolute() {
            candidate.to_path_buf()
        } else {
            root.join(candidate)
        };
        if path.exists() {
            paths.push(path);
        }
    }
    if paths.is_empty() { None } else { Some(paths) }
}

/// Recursively collect raster images under `root`.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
                continue;
            }
            if let Some(ext) = path.extension() {
                let ext = ext.to_string_lossy().to_lowercase();
                if matches!(ext.as_str(), "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp") {
                    images.push(path);
                }
            }
        }
    }

    images
}
