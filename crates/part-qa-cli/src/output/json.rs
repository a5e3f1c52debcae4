//! JSON output adapter.

use anyhow::Result;
use part_qa_core::{InspectionReport, ResultOutput};
use std::io::{self, Write};
use std::sync::Mutex;

use super::OutputFormat;

/// JSON output adapter.
///
/// In [`OutputFormat::Jsonl`] every report is written as soon as it arrives.
/// In [`OutputFormat::Json`] reports are held back and written as one array
/// on [`ResultOutput::flush`].
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    format: OutputFormat,
    pretty: bool,
    pending: Mutex<Vec<InspectionReport>>,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer: Mutex::new(writer),
            format,
            pretty,
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Writes a batch of reports as a JSON array.
    #[allow(clippy::significant_drop_tightening)]
    fn write_array(&self, reports: &[InspectionReport]) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(reports)?
        } else {
            serde_json::to_string(reports)?
        };
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResultOutput for JsonOutput {
    #[allow(clippy::significant_drop_tightening)]
    fn write(&self, report: &InspectionReport) -> Result<()> {
        if self.format == OutputFormat::Json {
            self.pending
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                .push(report.clone());
            return Ok(());
        }

        let json = serde_json::to_string(report)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }

    #[allow(clippy::significant_drop_tightening)]
    fn flush(&self) -> Result<()> {
        if self.format == OutputFormat::Json {
            let reports = std::mem::take(
                &mut *self
                    .pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            self.write_array(&reports)?;
        }

        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writer.flush()?;
        Ok(())
    }
}
