//! CLI tool to run a saved screenshot through each chart stage and print what it found.
//! Usage: cargo run -p st-vision --features cli --bin analyze_chart -- <screenshot.png> [output_dir] [config.json]

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use st_vision::{analyze_chart, ChartConfig, DebugRenderer, OverlayWriter};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <screenshot.png> [output_dir] [config.json]", args[0]);
        std::process::exit(1);
    }

    let input_path = PathBuf::from(&args[1]);
    let output_dir = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("./debug_output"));
    let config = match args.get(3) {
        Some(path) => ChartConfig::load(Path::new(path))?,
        None => ChartConfig::default(),
    };
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create {}", output_dir.display()))?;

    println!("Loading image: {}", input_path.display());
    let img = image::open(&input_path)
        .with_context(|| format!("Failed to open {}", input_path.display()))?
        .to_rgb8();
    println!("Image size: {}x{}", img.width(), img.height());

    let analysis = match analyze_chart(&img, &config) {
        Ok(analysis) => analysis,
        Err(e) => {
            println!("\nExtraction failed: {}", e);
            return Ok(());
        }
    };

    println!("\n=== Theme ===");
    println!("Mode: {:?}", analysis.mode);

    println!("\n=== Chart Region ===");
    println!(
        "y={}..{} (height {})",
        analysis.region.top,
        analysis.region.bottom,
        analysis.region.height()
    );

    println!("\n=== Gridlines ===");
    println!("Rows: {:?}", analysis.gridlines.rows);
    println!(
        "Top line: {}  Bottom line: {}  Scale: {}px",
        analysis.frame.top_line,
        analysis.frame.bottom_line,
        analysis.frame.scale()
    );

    println!("\n=== Axes ===");
    println!("Left: {}  Right: {}", analysis.frame.left, analysis.frame.right);

    println!("\n=== Bars ===");
    for bar in &analysis.bars {
        let slot = &analysis.slots.slots()[bar.slot];
        println!(
            "  x={}..={} center={:.1} -> {:>4} (slot center {:.1}): overall={} top1={} top2={} top3={} other={}",
            bar.segment.x1,
            bar.segment.x2,
            bar.segment.center(),
            slot.label(),
            slot.center(),
            bar.record.overall,
            bar.record.top1,
            bar.record.top2,
            bar.record.top3,
            bar.record.other,
        );
    }

    let stem = input_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "chart".to_string());
    let writer = OverlayWriter::new(output_dir.join(format!("{}_debug.png", stem)));
    writer.render(&img, &analysis, config.palette(analysis.mode))?;

    println!("\n=== Result ===");
    println!("{}", serde_json::to_string_pretty(&analysis.result())?);
    println!("\nDebug overlay saved to: {}", writer.path().display());
    Ok(())
}
