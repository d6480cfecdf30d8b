//! Record processing loop.
//!
//! [`ContentExtractProcessor`] is the stage itself: it validates its
//! configuration at startup, then for every record opens `/fileRef`, runs the
//! extractor and either emits the reshaped record or routes a classified
//! [`RecordError`] to the sink. One bad record never stops the batch.

use crate::core::classify::RecordError;
use crate::core::config::StageConfig;
use crate::core::engine::{AutoDetectExtractor, ContentExtractor};
use crate::core::validation::{ConfigIssue, validate};
use crate::record::{FILE_REF_FIELD, Record, reshape};
use crate::{BlobtextError, Result};
use std::io::Read;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Destination of processed records and failures.
pub trait BatchSink {
    fn add_record(&mut self, record: Record);

    fn report_error(&mut self, error: RecordError);
}

/// In-memory sink collecting outputs and errors in arrival order.
#[derive(Debug, Default)]
pub struct VecBatch {
    pub records: Vec<Record>,
    pub errors: Vec<RecordError>,
}

impl BatchSink for VecBatch {
    fn add_record(&mut self, record: Record) {
        self.records.push(record);
    }

    fn report_error(&mut self, error: RecordError) {
        self.errors.push(error);
    }
}

/// Counters for one call to [`ContentExtractProcessor::process_batch`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessingStats {
    pub processed: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Content extraction stage.
///
/// Shared across workers behind an `Arc`; every method takes `&self`.
pub struct ContentExtractProcessor {
    config: Arc<StageConfig>,
    extractor: Arc<dyn ContentExtractor>,
    span: tracing::Span,
}

impl ContentExtractProcessor {
    /// Build the stage with the built-in auto-detecting extractor.
    pub fn new(config: StageConfig) -> Result<Self> {
        let extractor = AutoDetectExtractor::new(config.limits())?;
        Ok(Self::with_extractor(config, Arc::new(extractor)))
    }

    /// Build the stage around a caller-supplied extractor.
    pub fn with_extractor(config: StageConfig, extractor: Arc<dyn ContentExtractor>) -> Self {
        let span = tracing::info_span!("content_extract", config = %config.config);
        Self {
            config: Arc::new(config),
            extractor,
            span,
        }
    }

    /// Emit all events of this stage inside `span`.
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Validate the configuration before any record flows.
    ///
    /// Issues are logged and returned; the stage never aborts on its own.
    pub fn init(&self) -> Vec<ConfigIssue> {
        let _guard = self.span.enter();
        let issues = validate(&self.config);
        for issue in &issues {
            warn!(
                error.code = %issue.error_code,
                config.group = issue.group.id(),
                config.field = %issue.config_field,
                "Invalid stage configuration: {}",
                issue.message
            );
        }
        issues
    }

    /// Release extractor resources at stage shutdown.
    pub fn destroy(&self) -> Result<()> {
        let _guard = self.span.enter();
        debug!("Shutting down content extractor");
        self.extractor.shutdown()
    }

    /// Extract and reshape one record.
    ///
    /// The input record is never modified. On failure the error is logged with
    /// the record id and code, then returned.
    pub fn process_record(&self, record: &Record) -> std::result::Result<Record, RecordError> {
        let _guard = self.span.enter();

        match self.extract_content(record) {
            Ok(content) => Ok(reshape(record, content)),
            Err(source) => {
                let err = RecordError::new(record.clone(), source);
                error!(
                    record.id = record.id(),
                    error.code = %err.code(),
                    retryable = err.code().is_retryable(),
                    "Content extraction failed: {}",
                    err.message()
                );
                Err(err)
            }
        }
    }

    /// Process one record into `sink`. Returns whether it succeeded.
    pub fn process(&self, record: &Record, sink: &mut dyn BatchSink) -> bool {
        match self.process_record(record) {
            Ok(output) => {
                sink.add_record(output);
                true
            }
            Err(err) => {
                sink.report_error(err);
                false
            }
        }
    }

    /// Process `records` in order, continuing past failures.
    pub fn process_batch<I>(&self, records: I, sink: &mut dyn BatchSink) -> ProcessingStats
    where
        I: IntoIterator<Item = Record>,
    {
        let mut stats = ProcessingStats::default();
        for record in records {
            stats.processed += 1;
            if self.process(&record, sink) {
                stats.succeeded += 1;
            } else {
                stats.failed += 1;
            }
        }

        let _guard = self.span.enter();
        debug!(
            processed = stats.processed,
            succeeded = stats.succeeded,
            failed = stats.failed,
            "Batch processed"
        );
        stats
    }

    /// Run [`process_record`](Self::process_record) on the runtime's blocking pool.
    #[cfg(feature = "tokio-runtime")]
    pub async fn process_async(self: Arc<Self>, record: Record) -> std::result::Result<Record, RecordError> {
        let worker = Arc::clone(&self);
        let input = record.clone();
        match tokio::task::spawn_blocking(move || worker.process_record(&input)).await {
            Ok(result) => result,
            Err(join_err) => {
                let err = RecordError::new(
                    record,
                    BlobtextError::Other(format!("Extraction task failed: {}", join_err)),
                );
                let _guard = self.span.enter();
                error!(
                    record.id = err.record_id(),
                    error.code = %err.code(),
                    "Content extraction task failed: {}",
                    err.message()
                );
                Err(err)
            }
        }
    }

    fn extract_content(&self, record: &Record) -> Result<String> {
        let stream = open_stream(record)?;
        let extractor = Arc::clone(&self.extractor);

        let result = catch_unwind(AssertUnwindSafe(move || extractor.extract(stream)))
            .map_err(|payload| BlobtextError::Other(format!("Extractor panicked: {}", panic_message(payload.as_ref()))))??;

        debug!(
            record.id = record.id(),
            mime_type = %result.mime_type,
            content.chars = result.content.chars().count(),
            "Extracted content"
        );
        Ok(result.content)
    }
}

fn open_stream(record: &Record) -> Result<Box<dyn Read + Send>> {
    let path = format!("/{}", FILE_REF_FIELD);
    let field = record
        .get(&path)
        .ok_or_else(|| BlobtextError::validation(format!("Record has no '{}' field", path)))?;

    let file_ref = field.as_file_ref().ok_or_else(|| {
        BlobtextError::validation(format!(
            "Field '{}' must be of type FILE_REF, found {}",
            path,
            field.field_type()
        ))
    })?;

    Ok(file_ref.open()?)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
