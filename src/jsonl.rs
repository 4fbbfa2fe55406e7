//! JSONL row streaming.
//!
//! Each input line is one JSON object. Table columns are read through the
//! table definition and masked. Only the columns the pipeline writes are
//! put back into the original object; every other key passes through as
//! it was read.

use crate::pipeline::MaskPipeline;
use anyhow::{bail, Context, Result};
use mask_core::json::{record_from_object, record_to_object};
use serde_json::Value;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone, Copy, Default)]
pub struct MaskOptions {
    /// Drop rows that fail with a row-scoped error instead of aborting
    pub skip_failed_rows: bool,
}

/// Row counts of one masking run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MaskStats {
    pub rows_read: u64,
    pub rows_written: u64,
    pub rows_skipped: u64,
}

/// Mask every line of `reader` into `writer`.
///
/// A row that fails is never written in its unmasked form: it either aborts
/// the run or, with [`MaskOptions::skip_failed_rows`], is dropped.
pub fn mask_stream<R: BufRead, W: Write>(
    pipeline: &mut MaskPipeline,
    reader: R,
    mut writer: W,
    options: MaskOptions,
    cancel: &CancellationToken,
) -> Result<MaskStats> {
    let mut stats = MaskStats::default();

    for (line_index, line) in reader.lines().enumerate() {
        if cancel.is_cancelled() {
            bail!("Masking cancelled after {} rows", stats.rows_read);
        }
        let line = line.context("Failed to read input")?;
        let line_number = line_index + 1;

        if line.trim().is_empty() {
            continue;
        }

        let mut object = match serde_json::from_str::<Value>(&line)
            .with_context(|| format!("Error parsing JSON at line {line_number}"))?
        {
            Value::Object(object) => object,
            other => bail!("Line {line_number}: expected a JSON object, found {other}"),
        };
        stats.rows_read += 1;

        let mut record = record_from_object(pipeline.table(), line_number as u64, &object)
            .with_context(|| format!("Line {line_number}"))?;

        match pipeline.process(&mut record, cancel) {
            Ok(()) => {}
            Err(e) if options.skip_failed_rows && e.is_row_scoped() => {
                tracing::warn!("Skipping line {line_number}: {e}");
                stats.rows_skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(
                    anyhow::Error::new(e).context(format!("Failed to mask line {line_number}"))
                );
            }
        }

        let mut masked = record_to_object(pipeline.table(), &record);
        for column in pipeline.affected_columns().values() {
            if let Some(value) = masked.remove(column) {
                if object.contains_key(column) || !value.is_null() {
                    object.insert(column.clone(), value);
                }
            }
        }
        serde_json::to_writer(&mut writer, &Value::Object(object))?;
        writer.write_all(b"\n")?;
        stats.rows_written += 1;

        if stats.rows_written % 10_000 == 0 {
            tracing::debug!("Masked {} rows", stats.rows_written);
        }
    }

    writer.flush().context("Failed to flush output")?;
    Ok(stats)
}

/// Mask a file (or stdin) into a file (or stdout) on a blocking worker.
pub async fn mask_path(
    mut pipeline: MaskPipeline,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    options: MaskOptions,
    cancel: CancellationToken,
) -> Result<MaskStats> {
    tokio::task::spawn_blocking(move || {
        let reader: Box<dyn BufRead + Send> = match &input {
            Some(path) => Box::new(BufReader::new(
                File::open(path).with_context(|| format!("Failed to open input {path:?}"))?,
            )),
            None => Box::new(BufReader::new(std::io::stdin())),
        };
        let writer: Box<dyn Write + Send> = match &output {
            Some(path) => Box::new(BufWriter::new(
                File::create(path).with_context(|| format!("Failed to create output {path:?}"))?,
            )),
            None => Box::new(BufWriter::new(std::io::stdout())),
        };
        mask_stream(&mut pipeline, reader, writer, options, &cancel)
    })
    .await
    .context("Masking task failed")?
}
