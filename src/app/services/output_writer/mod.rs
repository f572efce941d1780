//! Output file writing
//!
//! Each country partition of a sheet becomes one file with the canonical
//! column order. Files are named `<batch_id>_<sheet>[_<country>].<ext>`;
//! the country suffix is only added when a sheet is split across countries.

pub mod frame;

#[cfg(test)]
pub mod tests;

pub use frame::records_to_dataframe;

use crate::app::models::Country;
use crate::app::services::sheet_processor::SheetOutput;
use crate::app::services::workbook_reader::sanitize_sheet_name;
use crate::config::OutputFormat;
use crate::{Error, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Writes processed sheets into the output directory
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
    format: OutputFormat,
    batch_id: String,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>, format: OutputFormat, batch_id: impl Into<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            format,
            batch_id: batch_id.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// File path for a sheet, optionally suffixed with a country
    pub fn output_path(&self, sheet_name: &str, country: Option<Country>) -> PathBuf {
        let mut stem = format!("{}_{}", self.batch_id, sanitize_sheet_name(sheet_name));
        if let Some(country) = country {
            stem.push('_');
            stem.push_str(country.partition_suffix());
        }
        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }

    /// Write every partition of a sheet; returns the files written
    pub async fn write_sheet(&self, output: &SheetOutput) -> Result<Vec<PathBuf>> {
        let split = output.partitions.len() > 1;
        let mut jobs = Vec::with_capacity(output.partitions.len());
        for partition in &output.partitions {
            let path = self.output_path(&output.sheet_name, split.then_some(partition.country));
            let frame = records_to_dataframe(&partition.records)?;
            jobs.push((path, frame));
        }

        let format = self.format;
        tokio::task::spawn_blocking(move || {
            jobs.into_iter()
                .map(|(path, mut frame)| {
                    write_frame(&path, &mut frame, format)?;
                    Ok(path)
                })
                .collect::<Result<Vec<_>>>()
        })
        .await
        .map_err(|e| Error::output_writing("Output writer task failed", Box::new(e)))?
    }
}

/// Write a frame to disk in the requested format
pub fn write_frame(path: &Path, frame: &mut DataFrame, format: OutputFormat) -> Result<()> {
    let mut file = File::create(path)
        .map_err(|e| Error::io(format!("Failed to create {}", path.display()), e))?;

    match format {
        OutputFormat::Csv => {
            CsvWriter::new(&mut file)
                .include_header(true)
                .finish(frame)
                .map_err(|e| {
                    Error::output_writing(format!("Failed to write {}", path.display()), Box::new(e))
                })?;
        }
        OutputFormat::Parquet => {
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(frame)
                .map_err(|e| {
                    Error::output_writing(format!("Failed to write {}", path.display()), Box::new(e))
                })?;
        }
    }

    debug!("Wrote {} rows to {}", frame.height(), path.display());
    Ok(())
}
