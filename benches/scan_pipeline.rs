use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use image::{GrayImage, Luma};
use imageproc::geometric_transformations::{Interpolation, rotate_about_center};
use rust_ean::tools::synth::{RenderOptions, render_ean13};
use rust_ean::{Ean13, Scanner};

mod common;

fn sample_code() -> Ean13 {
    "4006381333931".parse().unwrap()
}

fn bench_scan_rendered(c: &mut Criterion) {
    let gray = render_ean13(&sample_code(), &RenderOptions::default());
    let scanner = Scanner::default();
    c.bench_function("scan_rendered_476x260", |b| {
        b.iter(|| scanner.scan(black_box(&gray)))
    });
}

fn bench_scan_rotated(c: &mut Criterion) {
    let options = RenderOptions {
        module: 5,
        bar_height: 150,
        margin: 90,
        ..RenderOptions::default()
    };
    let gray = render_ean13(&sample_code(), &options);
    let rotated = rotate_about_center(
        &gray,
        8f32.to_radians(),
        Interpolation::Bilinear,
        Luma([255u8]),
    );
    let scanner = Scanner::default();
    c.bench_function("scan_rotated_8deg", |b| {
        b.iter(|| scanner.scan(black_box(&rotated)))
    });
}

fn bench_scan_downscaled(c: &mut Criterion) {
    let options = RenderOptions {
        module: 12,
        bar_height: 360,
        margin: 200,
        ..RenderOptions::default()
    };
    let gray = render_ean13(&sample_code(), &options);
    let scanner = Scanner::default();
    c.bench_function("scan_rendered_1428x760", |b| {
        b.iter(|| scanner.scan(black_box(&gray)))
    });
}

fn bench_scan_blank(c: &mut Criterion) {
    let gray = GrayImage::from_pixel(640, 480, Luma([200u8]));
    let scanner = Scanner::default();
    c.bench_function("scan_blank_640x480", |b| {
        b.iter(|| scanner.scan(black_box(&gray)))
    });
}

fn bench_dataset(c: &mut Criterion) {
    let (root, images) = common::collect_dataset_images();
    if images.is_empty() {
        println!("Warning: No test images found under {:?}", root);
        return;
    }

    let scanner = Scanner::from_env();
    let mut group = c.benchmark_group("dataset");
    for path in images {
        let name = path.strip_prefix(&root).unwrap_or(&path).to_string_lossy().to_string();
        let Ok(img) = image::open(&path) else {
            continue;
        };
        let gray = img.to_luma8();
        group.bench_with_input(BenchmarkId::new("scan", &name), &gray, |b, gray| {
            b.iter(|| scanner.scan(black_box(gray)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_scan_rendered,
    bench_scan_rotated,
    bench_scan_downscaled,
    bench_scan_blank,
    bench_dataset
);
criterion_main!(benches);
