use anyhow::{Context, Result};
use std::path::Path;
use tracing::info;

use st_data::CategoryRegistry;
use st_usage::CategoryAssignment;
use st_vision::ChartConfig;

use super::ExtractArgs;
use crate::pipeline::{Pipeline, PipelineOptions, ScreenshotReport};

pub async fn extract(args: ExtractArgs, config: ChartConfig) -> Result<()> {
    let screenshots = st_capture::collect_screenshots(&args.inputs)?;

    let categories = match &args.categories {
        Some(labels) => {
            let registry = match &args.data_dir {
                Some(dir) => CategoryRegistry::load(dir)?,
                None => CategoryRegistry::builtin(),
            };
            Some(CategoryAssignment::from_labels(labels.as_slice(), &registry))
        }
        None => None,
    };

    if let Some(dir) = &args.debug_dir {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create debug directory {}", dir.display()))?;
    }

    let pipeline = Pipeline::new(PipelineOptions {
        config,
        categories,
        full_scale_minutes: args.full_scale,
        debug_dir: args.debug_dir,
        jobs: args.jobs,
    });
    let reports = pipeline.run(&screenshots).await;

    write_reports(&reports, args.out.as_deref())
}

fn write_reports(reports: &[ScreenshotReport], out: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(reports)?;
    match out {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use st_vision::synthetic::SyntheticChart;
    use st_vision::Mode;

    #[tokio::test]
    async fn test_extract_directory_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let shots = dir.path().join("shots");
        std::fs::create_dir(&shots).unwrap();
        SyntheticChart::new(Mode::Dark)
            .with_heights(&[90; 24])
            .render()
            .save(shots.join("b.png"))
            .unwrap();
        SyntheticChart::new(Mode::Light)
            .with_heights(&[45; 24])
            .render()
            .save(shots.join("a.png"))
            .unwrap();
        std::fs::write(shots.join("notes.txt"), b"ignored").unwrap();

        let out = dir.path().join("report.json");
        let args = ExtractArgs {
            inputs: vec![shots.clone()],
            out: Some(out.clone()),
            categories: Some(vec!["Entertainment".into()]),
            data_dir: None,
            full_scale: 60,
            debug_dir: Some(dir.path().join("overlays")),
            jobs: 2,
        };
        extract(args, ChartConfig::default()).await.unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        let entries = report.as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            PathBuf::from(entries[0]["source"].as_str().unwrap()),
            shots.join("a.png")
        );
        assert_eq!(entries[0]["hourly_usage"]["5pm"]["overall"], 45);
        assert_eq!(entries[1]["hourly_usage"]["5pm"]["top1"], 90);

        let hours = entries[1]["usage"]["hours"].as_array().unwrap();
        assert_eq!(hours[17]["categories"]["entertainment"]["minutes"], 27);
        assert!(dir.path().join("overlays").join("a_debug.png").is_file());
    }

    #[tokio::test]
    async fn test_extract_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let args = ExtractArgs {
            inputs: vec![dir.path().join("nope")],
            out: None,
            categories: None,
            data_dir: None,
            full_scale: 60,
            debug_dir: None,
            jobs: 1,
        };
        assert!(extract(args, ChartConfig::default()).await.is_err());
    }
}
