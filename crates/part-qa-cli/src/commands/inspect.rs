//! Inspect command - score part images and report pass/fail verdicts.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use part_qa_adapters::{default_history_path, FsImageSource, JsonlRecordStore};
use part_qa_core::{
    DefectDetector, DetectionConfig, ImageSource, InspectionReport, Inspector, ProgressEvent,
    ProgressSink, RecordStore, ResultOutput,
};
use tracing::{debug, info, warn};

use super::ExitCode;
use crate::config::AppConfig;
use crate::output::{JsonOutput, OutputFormat, ProgressBar};

/// Parse and validate a pass threshold (0-100).
fn parse_pass_threshold(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=100.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0..=100"))
    }
}

/// Shared arguments for part inspection.
#[derive(Args, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct InspectArgs {
    /// Image files or directories to inspect
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Include the raw feature vector in each report
    #[arg(long)]
    pub features: bool,

    /// Minimum quality score for a pass (0-100)
    #[arg(long, value_parser = parse_pass_threshold)]
    pub pass_threshold: Option<f64>,

    /// Append every verdict to the inspection history
    #[arg(long)]
    pub record: bool,

    /// History file (overrides config and default location)
    #[arg(long, value_name = "FILE")]
    pub history_file: Option<PathBuf>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl InspectArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (`DetectionConfig::default()`)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_deref()
                .and_then(OutputFormat::from_name);
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.features {
            args.features = config.output.features.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        if !args.record {
            args.record = config.history.enabled.unwrap_or(false);
        }
        if args.history_file.is_none() {
            args.history_file.clone_from(&config.history.file);
        }

        args.config = Some(config.clone());

        args
    }

    /// Detector configuration: defaults, then config file, then CLI.
    pub fn detection_config(&self) -> DetectionConfig {
        let mut detection = self
            .config
            .as_ref()
            .map(AppConfig::detection_config)
            .unwrap_or_default();
        if let Some(t) = self.pass_threshold {
            detection.pass_threshold = t;
        }
        detection
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Per-run options for [`process_images`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessOptions {
    /// Attach the feature vector to each report.
    pub features: bool,
}

/// Result of running the inspect command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InspectOutcome {
    /// Number of images inspected.
    pub processed: usize,
    /// Number of inspected parts that failed.
    pub failed: usize,
    /// Number of images that could not be loaded or inspected.
    pub skipped: usize,
}

impl InspectOutcome {
    /// Exit status: failed parts first, then unreadable images.
    pub const fn exit_code(&self) -> ExitCode {
        if self.failed > 0 {
            ExitCode::Failed
        } else if self.skipped > 0 {
            ExitCode::Error
        } else {
            ExitCode::Success
        }
    }
}

/// Run the inspect command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &InspectArgs) -> Result<InspectOutcome> {
    info!("Running inspect command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout(args.format(), args.pretty);

    let detector = DefectDetector::new(&args.detection_config())
        .context("Failed to configure the defect detector")?;
    debug!(
        inspector = detector.name(),
        pass_threshold = detector.pass_threshold(),
        "Detector configured"
    );

    let store = args.record.then(|| {
        let path = args
            .history_file
            .clone()
            .unwrap_or_else(default_history_path);
        info!("Recording verdicts to {}", path.display());
        JsonlRecordStore::new(path)
    });

    let options = ProcessOptions {
        features: args.features,
    };

    process_images(
        &source,
        &detector,
        &output,
        &progress_bar,
        store.as_ref().map(|s| s as &dyn RecordStore),
        options,
    )
}

/// Inspect every image of `source`, reporting each verdict to `output`.
///
/// Images that fail to load or inspect are reported as skipped and do not
/// stop the run. A verdict is recorded only once its report has been
/// written; a failure to record is logged and does not stop the run.
pub fn process_images(
    source: &dyn ImageSource,
    detector: &DefectDetector,
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
    store: Option<&dyn RecordStore>,
    options: ProcessOptions,
) -> Result<InspectOutcome> {
    let total = source.count_hint();
    let mut outcome = InspectOutcome {
        processed: 0,
        failed: 0,
        skipped: 0,
    };

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(failure) => {
                progress.on_event(ProgressEvent::Skipped {
                    path: failure.path,
                    reason: failure.reason,
                });
                outcome.skipped += 1;
                continue;
            }
        };

        let path = image.source.clone();

        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let assessment = match detector.inspect(&image) {
            Ok(a) => a,
            Err(e) => {
                progress.on_event(ProgressEvent::Skipped {
                    path,
                    reason: e.to_string(),
                });
                outcome.skipped += 1;
                continue;
            }
        };

        let features = if options.features {
            match detector.features(&image) {
                Ok(f) => Some(f.into_inner()),
                Err(e) => {
                    warn!("Feature extraction failed for {path}: {e}");
                    None
                }
            }
        } else {
            None
        };

        if !assessment.qualified {
            outcome.failed += 1;
        }

        let report = InspectionReport {
            path,
            timestamp: iso_timestamp(),
            dimensions: image.dimensions(),
            assessment,
            features,
        };

        output.write(&report)?;

        if let Some(store) = store {
            match store.add(&report.assessment, Some(&report.path)) {
                Ok(id) => debug!("Recorded verdict for {} as #{id}", report.path),
                Err(e) => warn!("Failed to record verdict for {}: {e:#}", report.path),
            }
        }

        progress.on_event(ProgressEvent::Completed { report });

        outcome.processed += 1;
    }

    output.flush()?;

    if outcome.processed == 0 && outcome.skipped == 0 {
        warn!("No images found in the given paths");
    }

    progress.on_event(ProgressEvent::Finished {
        processed: outcome.processed,
        failed: outcome.failed,
        skipped: outcome.skipped,
    });

    Ok(outcome)
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use part_qa_core::{AnomalyKind, DefectType};
    use part_qa_test_support::{
        MockImageSource, MockProgressSink, MockRecordStore, MockResultOutput,
        SyntheticImageBuilder,
    };

    fn strict_detector() -> DefectDetector {
        DefectDetector::new(&DetectionConfig {
            pass_threshold: 99.0,
            ..DetectionConfig::default()
        })
        .unwrap()
    }

    /// Output whose writes always fail, as on a closed pipe.
    struct BrokenOutput;

    impl ResultOutput for BrokenOutput {
        fn write(&self, _report: &InspectionReport) -> Result<()> {
            anyhow::bail!("Broken pipe")
        }

        fn flush(&self) -> Result<()> {
            Ok(())
        }
    }

    fn run_default(source: &MockImageSource, output: &dyn ResultOutput) -> InspectOutcome {
        process_images(
            source,
            &DefectDetector::default(),
            output,
            &MockProgressSink::new(),
            None,
            ProcessOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_parse_pass_threshold() {
        assert_eq!(parse_pass_threshold("60"), Ok(60.0));
        assert_eq!(parse_pass_threshold("0"), Ok(0.0));
        assert_eq!(parse_pass_threshold("100"), Ok(100.0));
        assert!(parse_pass_threshold("100.5").is_err());
        assert!(parse_pass_threshold("-1").is_err());
        assert!(parse_pass_threshold("high").is_err());
    }

    #[test]
    fn test_clean_parts_pass() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::uniform_gray(64, 64, 128),
            SyntheticImageBuilder::uniform_gray(32, 48, 100),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let outcome = process_images(
            &source,
            &DefectDetector::default(),
            &output,
            &progress,
            None,
            ProcessOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.exit_code(), ExitCode::Success);

        let reports = output.reports();
        assert_eq!(reports.len(), 2);
        assert!(reports[0].assessment.qualified);
        assert_eq!(reports[0].assessment.quality_score, 100.0);
        assert_eq!(reports[1].dimensions.height, 48);
        assert!(reports[0].features.is_none());
        assert_eq!(output.flush_count(), 1);

        assert_eq!(progress.started_count(), 2);
        assert_eq!(progress.completed_count(), 2);
        assert_eq!(progress.finished_counts(), Some((2, 0, 0)));
    }

    #[test]
    fn test_failed_part_sets_exit_code() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::checkerboard(64, 64)]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let outcome = process_images(
            &source,
            &strict_detector(),
            &output,
            &progress,
            None,
            ProcessOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.exit_code(), ExitCode::Failed);
        let report = &output.reports()[0];
        assert!(!report.assessment.qualified);
        assert!(report.assessment.defect_type.is_some());
    }

    #[test]
    fn test_load_failures_are_skipped() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::uniform_gray(16, 16, 128)])
            .with_failure("line1/broken.png", "Failed to open image: line1/broken.png");
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let outcome = process_images(
            &source,
            &DefectDetector::default(),
            &output,
            &progress,
            None,
            ProcessOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.processed, 1);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.exit_code(), ExitCode::Error);
        assert_eq!(progress.skipped_count(), 1);
        assert_eq!(progress.finished_counts(), Some((1, 0, 1)));
        assert_eq!(output.reports().len(), 1);

        let skipped = progress.events().into_iter().find_map(|e| match e {
            ProgressEvent::Skipped { path, .. } => Some(path),
            _ => None,
        });
        assert_eq!(skipped.as_deref(), Some("line1/broken.png"));
    }

    #[test]
    fn test_zero_sized_image_is_skipped() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::empty()]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let outcome = process_images(
            &source,
            &DefectDetector::default(),
            &output,
            &progress,
            None,
            ProcessOptions::default(),
        )
        .unwrap();

        assert_eq!(outcome.processed, 0);
        assert_eq!(outcome.skipped, 1);
        assert!(output.reports().is_empty());
        let skipped = progress.events().into_iter().find_map(|e| match e {
            ProgressEvent::Skipped { reason, .. } => Some(reason),
            _ => None,
        });
        assert!(skipped.unwrap().contains("zero-sized"));
    }

    #[test]
    fn test_failure_outranks_skip() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::checkerboard(32, 32)])
            .with_failure("part.png", "unreadable");
        let outcome = process_images(
            &source,
            &strict_detector(),
            &MockResultOutput::new(),
            &MockProgressSink::new(),
            None,
            ProcessOptions::default(),
        )
        .unwrap();
        assert_eq!(outcome.exit_code(), ExitCode::Failed);
    }

    #[test]
    fn test_features_attached_when_requested() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::horizontal_gradient(40, 30)]);
        let output = MockResultOutput::new();

        process_images(
            &source,
            &DefectDetector::default(),
            &output,
            &MockProgressSink::new(),
            None,
            ProcessOptions { features: true },
        )
        .unwrap();

        let features = output.reports()[0].features.clone().unwrap();
        assert_eq!(features.len(), part_qa_core::FeatureVector::LEN);
    }

    #[test]
    fn test_verdicts_recorded() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::uniform_gray(32, 32, 128),
            SyntheticImageBuilder::checkerboard(32, 32),
        ]);
        let output = MockResultOutput::new();
        let store = MockRecordStore::new();

        process_images(
            &source,
            &strict_detector(),
            &output,
            &MockProgressSink::new(),
            Some(&store),
            ProcessOptions::default(),
        )
        .unwrap();

        let reports = output.reports();
        let records = store.all();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].id, 2);
        assert_eq!(records[0].result, "Passed");
        assert_eq!(records[1].result, "Failed");
        assert_eq!(records[0].image_path.as_deref(), Some(reports[0].path.as_str()));
    }

    #[test]
    fn test_unwritten_verdict_is_not_recorded() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::uniform_gray(32, 32, 128)]);
        let store = MockRecordStore::new();

        let result = process_images(
            &source,
            &DefectDetector::default(),
            &BrokenOutput,
            &MockProgressSink::new(),
            Some(&store),
            ProcessOptions::default(),
        );

        assert!(result.unwrap_err().to_string().contains("Broken pipe"));
        assert!(store.all().is_empty());
    }

    #[test]
    fn test_dot_grid_fails_as_multi_indicator() {
        let source = MockImageSource::new(vec![SyntheticImageBuilder::dot_grid(120, 120, 12, 6)]);
        let output = MockResultOutput::new();

        let outcome = run_default(&source, &output);

        assert_eq!(outcome.failed, 1);
        assert_eq!(outcome.exit_code(), ExitCode::Failed);
        let assessment = &output.reports()[0].assessment;
        assert!(!assessment.qualified);
        assert!(assessment.defect_details.contains(AnomalyKind::ContourAnomaly));
        assert!(assessment
            .defect_details
            .contains(AnomalyKind::ContourDiscontinuity));
        assert_eq!(assessment.defect_type, Some(DefectType::MultiIndicator));
    }

    #[test]
    fn test_exposure_penalty_alone_still_passes() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::underexposed(48, 48),
            SyntheticImageBuilder::overexposed(48, 48),
        ]);
        let output = MockResultOutput::new();

        let outcome = run_default(&source, &output);

        assert_eq!(outcome.exit_code(), ExitCode::Success);
        for report in output.reports() {
            let assessment = &report.assessment;
            assert!(assessment.defect_details.is_empty());
            assert_eq!(assessment.defect_score, 0.1);
            assert_eq!(assessment.quality_score, 95.0);
            assert!(assessment.qualified);
            assert!(assessment.defect_type.is_none());
        }
    }

    #[test]
    fn test_single_pixel_part_is_inspected() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::single_pixel(128),
            SyntheticImageBuilder::single_pixel(0),
        ]);
        let output = MockResultOutput::new();

        let outcome = run_default(&source, &output);

        assert_eq!(outcome.processed, 2);
        assert_eq!(outcome.skipped, 0);
        let reports = output.reports();
        assert_eq!(reports[0].dimensions.width, 1);
        assert_eq!(reports[0].assessment.quality_score, 100.0);
        // A lone black pixel only picks up the dark penalty.
        assert_eq!(reports[1].assessment.defect_score, 0.1);
        assert!(reports[1].assessment.qualified);
    }

    #[test]
    fn test_with_config_cli_takes_precedence() {
        let config: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[detection]
pass_threshold = 75.0

[output]
format = 'json'
features = true

[history]
enabled = true
file = 'from-config.jsonl'
",
        )
        .unwrap();

        let args = InspectArgs {
            paths: vec![PathBuf::from("part.png")],
            recursive: false,
            format: Some(OutputFormat::Jsonl),
            pretty: false,
            features: false,
            pass_threshold: Some(50.0),
            record: false,
            history_file: Some(PathBuf::from("from-cli.jsonl")),
            progress: false,
            quiet: true,
            config: None,
        };
        let merged = InspectArgs::with_config(args, &config);

        assert!(merged.recursive);
        assert!(merged.features);
        assert!(merged.record);
        assert_eq!(merged.format(), OutputFormat::Jsonl);
        assert_eq!(merged.history_file, Some(PathBuf::from("from-cli.jsonl")));
        assert_eq!(merged.detection_config().pass_threshold, 50.0);
    }

    #[test]
    fn test_with_config_fills_unset_values() {
        let config: AppConfig = toml::from_str(
            r"
[detection]
pass_threshold = 75.0

[output]
format = 'json'
",
        )
        .unwrap();

        let args = InspectArgs {
            paths: vec![],
            recursive: false,
            format: None,
            pretty: false,
            features: false,
            pass_threshold: None,
            record: false,
            history_file: None,
            progress: false,
            quiet: false,
            config: None,
        };
        let merged = InspectArgs::with_config(args, &config);

        assert_eq!(merged.format(), OutputFormat::Json);
        assert!(!merged.record);
        assert_eq!(merged.detection_config().pass_threshold, 75.0);
    }
}
