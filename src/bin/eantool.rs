use clap::{Parser, Subcommand};
use rust_ean::detector::{binarize_candidates, deskew};
use rust_ean::tools::synth::{RenderOptions, render_ean13};
use rust_ean::tools::{
    bench_limit_from_env, binary_stats, dataset_iter, dataset_root_from_env, expected_code_for,
    grayscale_stats, load_gray, smoke_from_env,
};
use rust_ean::{Ean13, ScanConfig, Scanner};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eantool", version, about = "EAN-13 scanner CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan a single image and print the code
    Scan {
        #[arg(long)]
        image: PathBuf,
    },
    /// Print grayscale stats, candidates and stage telemetry for an image
    Diagnose {
        #[arg(long)]
        image: PathBuf,
    },
    /// Render a synthetic barcode to a PNG file
    Render {
        #[arg(long)]
        code: String,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 4)]
        module: u32,
        #[arg(long, default_value_t = 12)]
        quiet: u32,
        #[arg(long, default_value_t = 120)]
        bar_height: u32,
        #[arg(long, default_value_t = 70)]
        margin: u32,
        #[arg(long)]
        invert: bool,
    },
    /// Compute reading rate on a labeled dataset
    ReadingRate {
        #[arg(long)]
        root: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long)]
        smoke: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Scan { image } => scan_cmd(&image),
        Command::Diagnose { image } => diagnose_cmd(&image),
        Command::Render {
            code,
            output,
            module,
            quiet,
            bar_height,
            margin,
            invert,
        } => {
            let options = RenderOptions {
                module,
                quiet_zone: quiet,
                bar_height,
                margin,
                invert,
            };
            render_cmd(&code, &output, &options)
        }
        Command::ReadingRate { root, limit, smoke } => reading_rate_cmd(root, limit, smoke),
    }
}

fn scan_cmd(image: &Path) -> ExitCode {
    match Scanner::from_env().scan_path(image) {
        Ok(Some(code)) => {
            println!("{}", code);
            ExitCode::SUCCESS
        }
        Ok(None) => {
            eprintln!("No barcode found in {}", image.display());
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("{}", err);
            ExitCode::from(2)
        }
    }
}

fn diagnose_cmd(image: &Path) -> ExitCode {
    let gray = match load_gray(image) {
        Ok(gray) => gray,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::from(2);
        }
    };

    println!("Image: {} ({}x{})", image.display(), gray.width(), gray.height());
    let stats = grayscale_stats(&gray);
    println!(
        "Grayscale range: {}-{}, average: {}",
        stats.min, stats.max, stats.avg
    );

    let scanner = Scanner::from_env();
    let config: &ScanConfig = scanner.config();
    let (detection, tel) = scanner.detect_with_telemetry(&gray);
    println!("Working size: {}x{}", tel.working_size.0, tel.working_size.1);

    // Candidates are recomputed at full resolution for inspection only
    let candidates = binarize_candidates(&gray, config);
    println!("Candidates: {}", candidates.len());
    for candidate in &candidates {
        let ink = binary_stats(&candidate.binary);
        let corrected = deskew(&candidate.binary, config);
        println!(
            "  {:<15} ink={:>8} ({:.2}%) deskew={:+.2}deg",
            candidate.strategy.name(),
            ink.ink_pixels,
            ink.ink_ratio * 100.0,
            corrected.degrees
        );
    }

    println!("Last stage: {}", tel.stage.name());
    if let Some(score) = tel.band_score {
        println!("Band score: {:.3}", score);
    }
    if let (Some(row), Some(transitions)) = (tel.scanline_row, tel.scanline_transitions) {
        println!(
            "Scanline: row={} transitions={} tried={}",
            row, transitions, tel.scanlines_tried
        );
    }
    if let (Some(runs), Some(module)) = (tel.run_count, tel.module) {
        println!("Runs: {} module={:.2}", runs, module);
    }

    match detection {
        Some(d) => {
            println!(
                "Code: {} via {} (band {}..{}, start run {}, reversed={})",
                d.code,
                d.strategy.name(),
                d.band_rows.0,
                d.band_rows.1,
                d.start_run,
                d.reversed
            );
            ExitCode::SUCCESS
        }
        None => {
            println!("Code: none");
            ExitCode::from(1)
        }
    }
}

fn render_cmd(code: &str, output: &Path, options: &RenderOptions) -> ExitCode {
    let code: Ean13 = match code.parse() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Invalid code {:?}: {}", code, err);
            return ExitCode::from(2);
        }
    };
    let image = render_ean13(&code, options);
    if let Err(err) = image.save(output) {
        eprintln!("Failed to write {}: {}", output.display(), err);
        return ExitCode::from(2);
    }
    println!(
        "Wrote {} ({}x{})",
        output.display(),
        image.width(),
        image.height()
    );
    ExitCode::SUCCESS
}

fn reading_rate_cmd(root: Option<PathBuf>, limit: Option<usize>, smoke: bool) -> ExitCode {
    let root = root.unwrap_or_else(dataset_root_from_env);
    let limit = limit.or_else(bench_limit_from_env);
    let smoke = smoke || smoke_from_env();

    if !root.exists() {
        eprintln!("Dataset root not found: {}", root.display());
        return ExitCode::from(2);
    }

    let scanner = Scanner::from_env();
    let mut total = 0usize;
    let mut successful = 0usize;
    let mut unreadable = 0usize;

    for path in dataset_iter(&root, limit, smoke) {
        let Some(expected) = expected_code_for(&path) else {
            continue;
        };
        total += 1;

        let start = Instant::now();
        let outcome = scanner.scan_path(&path);
        let elapsed = start.elapsed();
        let label = match &outcome {
            Ok(Some(code)) if *code == expected => {
                successful += 1;
                "OK".to_string()
            }
            Ok(Some(code)) => format!("WRONG {}", code),
            Ok(None) => "MISS".to_string(),
            Err(_) => {
                unreadable += 1;
                "UNREADABLE".to_string()
            }
        };
        println!(
            "  [{}] {} -> {} ({:.2?})",
            label,
            path.display(),
            expected,
            elapsed
        );
    }

    if total == 0 {
        println!("No labeled images found under {}", root.display());
        return ExitCode::from(1);
    }
    let rate = (successful as f64 / total as f64) * 100.0;
    println!("Reading rate: {}/{} = {:.2}%", successful, total, rate);
    if unreadable > 0 {
        println!("Unreadable files: {}", unreadable);
    }
    ExitCode::SUCCESS
}
