//! Batch orchestration over a bounded worker pool

use super::gauge::ConcurrencyGauge;
use super::job::{BatchJob, FileStatus, FileTask};
use super::results::{BatchResult, FileResult, FileResultStatus, SheetResult};
use crate::app::models::RawSheet;
use crate::app::services::geocoding::{GeocodeCache, GeocodingResolver};
use crate::app::services::output_writer::OutputWriter;
use crate::app::services::sheet_processor::{SheetOutput, SheetProcessor};
use crate::app::services::termination_filter::{
    TerminationSet, load_termination_file, termination_entries_from_sheet,
};
use crate::app::services::workbook_reader::{classify_sheets, read_workbook};
use crate::config::{CacheScope, Config, LimitsConfig};
use crate::{Error, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Batch deadlines measured from submission
#[derive(Debug, Clone, Copy)]
struct Deadlines {
    /// No file or sheet starts after this
    soft: Instant,
    /// In-flight files are abandoned at this point
    hard: Instant,
    batch_timeout_secs: u64,
}

impl Deadlines {
    fn starting_now(limits: &LimitsConfig) -> Self {
        let soft = Instant::now() + limits.batch_timeout();
        Self {
            soft,
            hard: soft + limits.batch_grace(),
            batch_timeout_secs: limits.batch_timeout_secs,
        }
    }

    fn soft_expired(&self) -> bool {
        Instant::now() >= self.soft
    }

    fn remaining_hard(&self) -> Duration {
        self.hard.saturating_duration_since(Instant::now())
    }
}

/// Either a processed sheet waiting to be written or a failed one
enum SheetOutcome {
    Processed(SheetOutput),
    Failed { sheet: String, error: Error },
}

/// Everything a file task needs, shared across workers
struct FileContext {
    processor: SheetProcessor,
    writer: OutputWriter,
    terminations: Arc<TerminationSet>,
    deadlines: Deadlines,
    file_timeout: Duration,
    max_file_size_bytes: u64,
    gauge: Option<Arc<ConcurrencyGauge>>,
    cancellation: CancellationToken,
}

/// Accepts batches of spreadsheets and runs them through the sheet pipeline
///
/// Files of a batch run concurrently up to the configured worker count; the
/// sheets of one file run in order. The worker pool is shared by every batch
/// submitted to the same orchestrator.
pub struct BatchOrchestrator {
    config: Config,
    processor: SheetProcessor,
    terminations: Arc<TerminationSet>,
    workers: Arc<Semaphore>,
    admission: Arc<Semaphore>,
    gauge: Option<Arc<ConcurrencyGauge>>,
    cancellation: CancellationToken,
}

impl BatchOrchestrator {
    pub fn new(config: Config, resolver: GeocodingResolver) -> Self {
        let workers = config.limits.workers.max(1);
        let capacity = workers + config.limits.queue_capacity;
        let processor = SheetProcessor::new(&config, resolver);

        Self {
            config,
            processor,
            terminations: Arc::new(TerminationSet::new()),
            workers: Arc::new(Semaphore::new(workers)),
            admission: Arc::new(Semaphore::new(capacity)),
            gauge: None,
            cancellation: CancellationToken::new(),
        }
    }

    /// Build an orchestrator with the postal index, external client and
    /// termination lists named by the configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let resolver = GeocodingResolver::from_config(&config)?;
        let orchestrator = Self::new(config, resolver);
        let mut terminations = TerminationSet::new();
        for path in &orchestrator.config.processing.termination_files {
            terminations.extend(load_termination_file(
                path,
                orchestrator.processor.detector(),
                orchestrator.processor.mapper(),
            )?);
        }

        Ok(orchestrator.with_terminations(terminations))
    }

    /// Observe in-flight file tasks through a gauge
    pub fn with_gauge(mut self, gauge: Arc<ConcurrencyGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    /// Termination entries applied to every panel sheet
    pub fn with_terminations(mut self, terminations: TerminationSet) -> Self {
        self.terminations = Arc::new(terminations);
        self
    }

    /// Stop starting work and abandon in-flight files when the token fires
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn processor(&self) -> &SheetProcessor {
        &self.processor
    }

    /// Process a batch of files
    ///
    /// Fails only when the batch is rejected or the output directory cannot be
    /// created; everything else is reported per file in the result.
    pub async fn submit(&self, files: Vec<PathBuf>, batch_id: Option<String>) -> Result<BatchResult> {
        let limits = &self.config.limits;
        if files.is_empty() {
            return Err(Error::batch_rejected("batch contains no files"));
        }
        if files.len() > limits.max_files_per_batch {
            return Err(Error::batch_rejected(format!(
                "batch has {} files, the limit is {}",
                files.len(),
                limits.max_files_per_batch
            )));
        }

        let _admission = Arc::clone(&self.admission)
            .try_acquire_owned()
            .map_err(|_| Error::batch_rejected("too many batches running or queued"))?;

        let batch_id = batch_id.unwrap_or_else(new_batch_id);
        let mut job = BatchJob::new(batch_id.clone(), files);
        let started_at = job.created_at;

        let output_dir = &self.config.processing.output_dir;
        tokio::fs::create_dir_all(output_dir).await.map_err(|e| {
            Error::io(
                format!("Failed to create output directory {}", output_dir.display()),
                e,
            )
        })?;

        let processor = match self.config.geocoding.cache_scope {
            CacheScope::Batch => self.processor.with_resolver(
                self.processor
                    .resolver()
                    .with_cache(Arc::new(GeocodeCache::new())),
            ),
            CacheScope::Process => self.processor.clone(),
        };

        let context = Arc::new(FileContext {
            processor,
            writer: OutputWriter::new(
                output_dir.clone(),
                self.config.processing.output_format,
                batch_id.clone(),
            ),
            terminations: Arc::clone(&self.terminations),
            deadlines: Deadlines::starting_now(limits),
            file_timeout: limits.file_timeout(),
            max_file_size_bytes: limits.max_file_size_bytes(),
            gauge: self.gauge.clone(),
            cancellation: self.cancellation.clone(),
        });

        info!(
            "Batch {}: {} files, {} workers",
            batch_id,
            job.len(),
            limits.workers
        );

        let results = if limits.workers <= 1 {
            self.run_sequential(&mut job, &context).await
        } else {
            self.run_parallel(&mut job, &context).await
        };

        let result = BatchResult {
            batch_id,
            started_at,
            finished_at: Utc::now(),
            results,
        };

        info!(
            "Batch {} finished: {} succeeded, {} partial, {} failed, {} records in {}ms",
            result.batch_id,
            result.count(FileResultStatus::Success),
            result.count(FileResultStatus::Partial),
            result.count(FileResultStatus::Failed),
            result.records_processed(),
            result.duration().num_milliseconds()
        );
        Ok(result)
    }

    async fn run_sequential(&self, job: &mut BatchJob, context: &Arc<FileContext>) -> Vec<FileResult> {
        let mut results = Vec::with_capacity(job.len());
        for task in job.tasks.iter_mut() {
            task.advance(FileStatus::Processing);
            let result = match Arc::clone(&self.workers).acquire_owned().await {
                Ok(_permit) => {
                    let _guard = context.gauge.as_ref().map(|gauge| gauge.enter());
                    run_file(context, task).await
                }
                Err(e) => FileResult::failed(
                    task.display_name(),
                    &Error::processing_interrupted(format!("worker pool closed: {}", e)),
                ),
            };
            finish_task(task, &result);
            results.push(result);
        }
        results
    }

    async fn run_parallel(&self, job: &mut BatchJob, context: &Arc<FileContext>) -> Vec<FileResult> {
        let mut workers = JoinSet::new();

        for task in job.tasks.iter_mut() {
            task.advance(FileStatus::Processing);
            let task = task.clone();
            let context = Arc::clone(context);
            let semaphore = Arc::clone(&self.workers);

            workers.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => {
                        let _guard = context.gauge.as_ref().map(|gauge| gauge.enter());
                        run_file(&context, &task).await
                    }
                    Err(e) => FileResult::failed(
                        task.display_name(),
                        &Error::processing_interrupted(format!("worker pool closed: {}", e)),
                    ),
                };
                (task.index, result)
            });
        }

        let mut slots: Vec<Option<FileResult>> = vec![None; job.len()];
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((index, result)) => slots[index] = Some(result),
                Err(e) => error!("File task ended abnormally: {}", e),
            }
        }

        job.tasks
            .iter_mut()
            .zip(slots)
            .map(|(task, slot)| {
                let result = slot.unwrap_or_else(|| {
                    FileResult::failed(
                        task.display_name(),
                        &Error::processing_interrupted("file task aborted"),
                    )
                });
                finish_task(task, &result);
                result
            })
            .collect()
    }
}

fn finish_task(task: &mut FileTask, result: &FileResult) {
    let status = match result.status {
        FileResultStatus::Failed => FileStatus::Failed,
        FileResultStatus::Success | FileResultStatus::Partial => FileStatus::Completed,
    };
    task.advance(status);
}

/// Short random batch identifier
fn new_batch_id() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    id[..8].to_string()
}

/// Run one file end to end: checks, processing under its time budget, then writing
async fn run_file(context: &FileContext, task: &FileTask) -> FileResult {
    let name = task.display_name();

    if context.cancellation.is_cancelled() {
        return FileResult::failed(name, &Error::processing_interrupted("batch cancelled"));
    }
    if context.deadlines.soft_expired() {
        debug!("Batch deadline passed before {} started", name);
        return FileResult::failed(
            name.clone(),
            &Error::timeout(name, context.deadlines.batch_timeout_secs),
        );
    }

    if let Err(e) = check_file_size(task, context.max_file_size_bytes).await {
        warn!("Skipping {}: {}", name, e);
        return FileResult::failed(name, &e);
    }

    let budget = context.file_timeout.min(context.deadlines.remaining_hard());
    let started = Instant::now();
    let processed = tokio::select! {
        _ = context.cancellation.cancelled() => {
            Err(Error::processing_interrupted("batch cancelled"))
        }
        outcome = tokio::time::timeout(budget, process_file(context, task)) => match outcome {
            Ok(processed) => enforce_budget(processed, started.elapsed(), budget, &name),
            Err(_) => Err(Error::timeout(name.clone(), budget.as_secs())),
        }
    };

    let outcomes = match processed {
        Ok(outcomes) => outcomes,
        Err(e) => {
            error!("File {} failed: {}", name, e);
            return FileResult::failed(name, &e);
        }
    };

    let mut sheets = Vec::with_capacity(outcomes.len());
    for outcome in outcomes {
        let sheet = match outcome {
            SheetOutcome::Processed(output) => match context.writer.write_sheet(&output).await {
                Ok(files) => SheetResult::success(&output, files),
                Err(e) => {
                    error!("Writing sheet '{}' of {} failed: {}", output.sheet_name, name, e);
                    SheetResult::failed(output.sheet_name.clone(), &e)
                }
            },
            SheetOutcome::Failed { sheet, error } => SheetResult::failed(sheet, &error),
        };
        sheets.push(sheet);
    }

    let result = FileResult::from_sheets(name, sheets);
    info!(
        "File {}: {} ({} records)",
        result.file,
        result.status,
        result.records_processed()
    );
    result
}

/// A file that finished after its budget ran out still counts as timed out
pub(super) fn enforce_budget<T>(
    processed: Result<T>,
    elapsed: Duration,
    budget: Duration,
    name: &str,
) -> Result<T> {
    if elapsed > budget {
        warn!(
            "File {} finished in {:.2?}, past its {:.2?} budget",
            name, elapsed, budget
        );
        return Err(Error::timeout(name, budget.as_secs()));
    }
    processed
}

async fn check_file_size(task: &FileTask, max_bytes: u64) -> Result<()> {
    let metadata = tokio::fs::metadata(&task.path).await.map_err(|e| {
        Error::io(format!("Cannot access {}", task.path.display()), e)
    })?;
    if metadata.len() > max_bytes {
        return Err(Error::input(
            task.display_name(),
            format!(
                "file is {:.1} MB, above the {} MB limit",
                metadata.len() as f64 / (1024.0 * 1024.0),
                max_bytes / (1024 * 1024)
            ),
        ));
    }
    Ok(())
}

/// Read the workbook and run every panel sheet; nothing is written here
async fn process_file(context: &FileContext, task: &FileTask) -> Result<Vec<SheetOutcome>> {
    let path = task.path.clone();
    let name = task.display_name();
    let workbook = tokio::task::spawn_blocking(move || read_workbook(&path))
        .await
        .map_err(|e| Error::input(name.clone(), format!("reader task failed: {}", e)))??;

    let names = workbook.sheet_names();
    let classification = classify_sheets(&names);
    debug!(
        "{}: {} panel, {} termination, {} ignored sheets",
        name,
        classification.panel.len(),
        classification.termination.len(),
        classification.ignored.len()
    );

    let terminations = file_terminations(
        context,
        classification
            .termination
            .iter()
            .filter_map(|sheet| workbook.sheet(sheet)),
    );

    let mut outcomes = Vec::with_capacity(classification.panel.len());
    for sheet_name in &classification.panel {
        if context.deadlines.soft_expired() {
            outcomes.push(SheetOutcome::Failed {
                sheet: sheet_name.clone(),
                error: Error::timeout(sheet_name.clone(), context.deadlines.batch_timeout_secs),
            });
            continue;
        }

        let Some(sheet) = workbook.sheet(sheet_name) else {
            let reason = workbook
                .unreadable
                .iter()
                .find(|u| &u.name == sheet_name)
                .map(|u| u.reason.clone())
                .unwrap_or_else(|| "sheet not found".to_string());
            outcomes.push(SheetOutcome::Failed {
                sheet: sheet_name.clone(),
                error: Error::input(name.clone(), format!("sheet '{}': {}", sheet_name, reason)),
            });
            continue;
        };

        match context.processor.process(sheet, &terminations).await {
            Ok(output) => outcomes.push(SheetOutcome::Processed(output)),
            Err(error) => outcomes.push(SheetOutcome::Failed {
                sheet: sheet_name.clone(),
                error,
            }),
        }
    }

    Ok(outcomes)
}

/// Shared termination entries plus those listed inside the file itself
fn file_terminations<'a>(
    context: &FileContext,
    sheets: impl Iterator<Item = &'a RawSheet>,
) -> TerminationSet {
    let mut terminations = (*context.terminations).clone();
    for sheet in sheets {
        match termination_entries_from_sheet(
            sheet,
            context.processor.detector(),
            context.processor.mapper(),
        ) {
            Ok(entries) => terminations.extend(entries),
            Err(e) => warn!("Ignoring termination sheet '{}': {}", sheet.name, e),
        }
    }
    terminations
}
