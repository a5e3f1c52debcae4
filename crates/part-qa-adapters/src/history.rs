//! Inspection history kept as a JSON Lines file.

use anyhow::{Context, Result};
use part_qa_core::{DefectAssessment, HistoryStats, InspectionRecord, RecordStore};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, warn};

/// Returns the default history file path.
///
/// Uses `XDG_DATA_HOME/part-qa/history.jsonl` or
/// `~/.local/share/part-qa/history.jsonl`.
#[must_use]
pub fn default_history_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("part-qa")
        .join("history.jsonl")
}

/// Record store appending one JSON object per line.
///
/// Identifiers increase from 1. A missing file is an empty history; lines
/// that do not parse are skipped with a warning.
pub struct JsonlRecordStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlRecordStore {
    /// Creates a store backed by `path`. The file is created on first write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Creates a store at [`default_history_path`].
    #[must_use]
    pub fn open_default() -> Self {
        Self::new(default_history_path())
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Vec<InspectionRecord>> {
        let file = match fs::File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to open history file: {}", self.path.display())
                })
            }
        };

        let mut records = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line = line
                .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<InspectionRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(
                    "Skipping malformed history line {} in {}: {e}",
                    line_no + 1,
                    self.path.display()
                ),
            }
        }
        Ok(records)
    }
}

impl RecordStore for JsonlRecordStore {
    #[allow(clippy::significant_drop_tightening)]
    fn add(&self, assessment: &DefectAssessment, image_path: Option<&str>) -> Result<u64> {
        let _guard = self
            .lock
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;

        let id = self.read_all()?.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        let record = InspectionRecord {
            id,
            timestamp: OffsetDateTime::now_utc().format(&Rfc3339)?,
            result: assessment.verdict().to_string(),
            confidence: assessment.confidence,
            image_path: image_path.map(str::to_string),
            defect_type: assessment.defect_type.map(|t| t.label().to_string()),
            quality_score: assessment.quality_score,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open history file: {}", self.path.display()))?;
        writeln!(file, "{}", serde_json::to_string(&record)?)?;

        debug!("Recorded inspection {id} in {}", self.path.display());
        Ok(id)
    }

    fn records(&self, limit: usize) -> Result<Vec<InspectionRecord>> {
        let mut records = self.read_all()?;
        records.sort_by(|a, b| b.id.cmp(&a.id));
        records.truncate(limit);
        Ok(records)
    }

    fn statistics(&self) -> Result<HistoryStats> {
        Ok(HistoryStats::from_records(&self.read_all()?))
    }
}
