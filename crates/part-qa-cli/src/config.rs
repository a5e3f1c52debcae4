//! Configuration file support for part-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/part-qa/config.toml` (lowest priority)
//! - Project-local: `.part-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use part_qa_core::detection::{DetectionConfig, RuleThreshold};
use part_qa_core::AnomalyKind;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Detector settings.
    pub detection: DetectionSection,
    /// Per-detector rule overrides, keyed by anomaly kind name.
    pub rules: BTreeMap<String, RuleConfig>,
    /// Output formatting settings.
    pub output: OutputConfig,
    /// Inspection history settings.
    pub history: HistoryConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Detector configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DetectionSection {
    /// Minimum quality score for a pass (0-100).
    pub pass_threshold: Option<f64>,
    /// Weak-edge threshold of the anomaly edge map.
    pub edge_low: Option<f32>,
    /// Strong-edge threshold of the anomaly edge map.
    pub edge_high: Option<f32>,
    /// Box filter size for the texture detector.
    pub texture_kernel: Option<u32>,
}

/// Threshold and span override for one detector.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Raw statistic above which the detector fires.
    pub threshold: Option<f64>,
    /// Excess over the threshold that maps to a score of 1.0.
    pub span: Option<f64>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
    /// Include the feature vector in each report.
    pub features: Option<bool>,
}

/// History configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Record every inspection.
    pub enabled: Option<bool>,
    /// History file location.
    pub file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/part-qa/config.toml`
    /// 2. Project-local: `.part-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. A merged configuration with
    /// invalid values is reported and replaced by the defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            eprintln!("warning: {e}; ignoring configuration files");
            return Self::default();
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(t) = self.detection.pass_threshold {
            if !(0.0..=100.0).contains(&t) {
                return Err(format!("detection.pass_threshold must be 0-100, got {t}"));
            }
        }
        for (name, value) in [
            ("edge_low", self.detection.edge_low),
            ("edge_high", self.detection.edge_high),
        ] {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    return Err(format!(
                        "detection.{name} must be a non-negative number, got {v}"
                    ));
                }
            }
        }
        // A value left unset falls back to its default, so check the pair
        // the detector will actually run with.
        let defaults = DetectionConfig::default().anomaly_edges;
        let low = self.detection.edge_low.unwrap_or(defaults.low);
        let high = self.detection.edge_high.unwrap_or(defaults.high);
        if low > high {
            return Err(format!(
                "detection.edge_low ({low}) must not exceed detection.edge_high ({high})"
            ));
        }
        if self.detection.texture_kernel == Some(0) {
            return Err("detection.texture_kernel must be at least 1".to_string());
        }

        for (name, rule) in &self.rules {
            if AnomalyKind::from_name(name).is_none() {
                return Err(format!("rules.{name} is not a known anomaly kind"));
            }
            if let Some(t) = rule.threshold {
                if !t.is_finite() {
                    return Err(format!("rules.{name}.threshold must be finite, got {t}"));
                }
            }
            if let Some(s) = rule.span {
                if !s.is_finite() || s <= 0.0 {
                    return Err(format!("rules.{name}.span must be positive, got {s}"));
                }
            }
        }

        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Detection
        let d = other.detection;
        self.detection.pass_threshold = d.pass_threshold.or(self.detection.pass_threshold);
        self.detection.edge_low = d.edge_low.or(self.detection.edge_low);
        self.detection.edge_high = d.edge_high.or(self.detection.edge_high);
        self.detection.texture_kernel = d.texture_kernel.or(self.detection.texture_kernel);

        // Rules merge per field, so a project file can adjust only a span.
        for (name, rule) in other.rules {
            let entry = self.rules.entry(name).or_default();
            entry.threshold = rule.threshold.or(entry.threshold);
            entry.span = rule.span.or(entry.span);
        }

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
        self.output.features = other.output.features.or(self.output.features);

        // History
        self.history.enabled = other.history.enabled.or(self.history.enabled);
        self.history.file = other.history.file.or_else(|| self.history.file.take());
    }

    /// Builds the detector configuration from the defaults and this file.
    ///
    /// The pass threshold is left for the caller, since a CLI flag may
    /// override it.
    pub fn detection_config(&self) -> DetectionConfig {
        let mut config = DetectionConfig::default();
        if let Some(t) = self.detection.pass_threshold {
            config.pass_threshold = t;
        }
        if let Some(low) = self.detection.edge_low {
            config.anomaly_edges.low = low;
        }
        if let Some(high) = self.detection.edge_high {
            config.anomaly_edges.high = high;
        }
        if let Some(k) = self.detection.texture_kernel {
            config.texture_kernel = k;
        }
        for (name, rule) in &self.rules {
            let Some(kind) = AnomalyKind::from_name(name) else {
                warn!("Ignoring rule for unknown anomaly kind: {name}");
                continue;
            };
            let current = config.rules.get(kind);
            config.rules.set(
                kind,
                RuleThreshold::new(
                    rule.threshold.unwrap_or(current.threshold),
                    rule.span.unwrap_or(current.span),
                ),
            );
        }
        config
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("part-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.part-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".part-qa.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
