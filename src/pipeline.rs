/*!
 * Bounded-concurrency file pipeline over an extracted mod archive.
 *
 * The entry point is [`translate_archive`]: extract the input archive into
 * an ephemeral working tree, rewrite every qualifying config file with a
 * bounded number of concurrent workers, then repack the tree into the
 * output archive. The working tree is removed on every exit path.
 */

use std::io::{Read, Seek, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use futures::stream::{self, StreamExt};
use log::{info, warn, debug};
use tempfile::TempDir;
use tokio::sync::Semaphore;

use crate::app_config::MergeMode;
use crate::archive::{extract_archive, pack_archive};
use crate::config_rewriter::{ConfigRewriter, FieldFailure};
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::translation_service::TranslationService;

/// File extensions subject to text transformation (case-insensitive).
/// Everything else passes through the archive round-trip unmodified.
pub const QUALIFYING_EXTENSIONS: [&str; 3] = ["ini", "template", "txt"];

/// Progress callback invoked with (completed, total) as files finish
pub type ProgressCallback = Box<dyn Fn(usize, usize) + Send + Sync>;

/// Parameters of one archive translation operation
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    /// Source language code
    pub source_language: String,
    /// Target language code
    pub target_language: String,
    /// How translated values are merged back
    pub mode: MergeMode,
}

/// Outcome for a single processed file
#[derive(Debug)]
pub struct FileReport {
    /// Path of the file inside the working tree
    pub path: PathBuf,
    /// Number of fields successfully translated
    pub translated_fields: usize,
    /// Per-field translation failures (original lines were preserved)
    pub failures: Vec<FieldFailure>,
    /// Fatal per-file error (read/write), if any
    pub error: Option<String>,
}

/// Aggregated outcome of a whole batch
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of qualifying files found
    pub total_files: usize,
    /// Files processed without a fatal error
    pub processed_files: usize,
    /// Files that could not be read or written back
    pub failed_files: usize,
    /// Total fields translated across all files
    pub translated_fields: usize,
    /// Per-file reports, for diagnostics
    pub reports: Vec<FileReport>,
}

impl BatchReport {
    /// Total count of isolated per-field failures across all files
    pub fn field_failures(&self) -> usize {
        self.reports.iter().map(|r| r.failures.len()).sum()
    }

    /// One-line human summary of the batch
    pub fn summary(&self) -> String {
        format!(
            "{} of {} files processed, {} fields translated, {} field failures, {} file errors",
            self.processed_files,
            self.total_files,
            self.translated_fields,
            self.field_failures(),
            self.failed_files
        )
    }
}

// @struct: Shared progress accounting across workers
//
// The counter and callback live behind one mutex so completions from
// concurrent workers are delivered serialized and non-decreasing.
struct ProgressTracker {
    total: usize,
    completed: StdMutex<usize>,
    callback: ProgressCallback,
}

impl ProgressTracker {
    fn file_done(&self) {
        let mut completed = self.completed.lock().unwrap();
        *completed += 1;
        (self.callback)(*completed, self.total);
    }
}

/// Translate a whole mod archive from an input stream to an output stream.
///
/// Extracts into a temporary working tree (always removed, success or
/// failure), rewrites qualifying config files with bounded parallelism,
/// and repacks. Archive read/write errors are fatal; per-file failures are
/// recorded in the returned [`BatchReport`] and do not abort the batch.
pub async fn translate_archive<R: Read + Seek, W: Write + Seek>(
    input: R,
    output: W,
    service: &TranslationService,
    request: &TranslationRequest,
    concurrency: usize,
    progress: ProgressCallback,
) -> Result<BatchReport, AppError> {
    // TempDir removes the working tree on drop, covering every exit path
    let workdir = TempDir::new().map_err(|e| AppError::File(e.to_string()))?;

    let entries = extract_archive(input, workdir.path())?;
    debug!("Working tree ready with {} archive entries", entries);

    let report = process_tree(workdir.path(), service, request, concurrency, progress).await?;

    pack_archive(workdir.path(), output)?;
    info!("Archive translation finished: {}", report.summary());

    Ok(report)
}

/// Rewrite every qualifying file under a working tree root.
///
/// Fan-out is bounded by a semaphore; completion order across files is
/// unspecified. Each completion, success or failure, advances the shared
/// progress counter exactly once.
pub async fn process_tree(
    root: &Path,
    service: &TranslationService,
    request: &TranslationRequest,
    concurrency: usize,
    progress: ProgressCallback,
) -> Result<BatchReport, AppError> {
    let files = FileManager::find_files_with_extensions(root, &QUALIFYING_EXTENSIONS)
        .map_err(AppError::from)?;
    let total = files.len();
    debug!("Found {} qualifying files under {:?}", total, root);

    let workers = concurrency.max(1);
    let semaphore = Arc::new(Semaphore::new(workers));
    let tracker = Arc::new(ProgressTracker {
        total,
        completed: StdMutex::new(0),
        callback: progress,
    });

    let reports = stream::iter(files)
        .map(|path| {
            let service = service.clone();
            let request = request.clone();
            let semaphore = semaphore.clone();
            let tracker = tracker.clone();

            async move {
                // Acquire a permit from the semaphore
                let _permit = semaphore.acquire().await.unwrap();
                let report = process_file(&path, &service, &request).await;
                tracker.file_done();
                report
            }
        })
        .buffer_unordered(workers)
        .collect::<Vec<_>>()
        .await;

    let mut batch = BatchReport {
        total_files: total,
        ..BatchReport::default()
    };
    for report in reports {
        if report.error.is_some() {
            batch.failed_files += 1;
        } else {
            batch.processed_files += 1;
        }
        batch.translated_fields += report.translated_fields;
        batch.reports.push(report);
    }

    Ok(batch)
}

/// Rewrite a single config file in place.
///
/// Read/write errors become the file's fatal error; translation failures
/// inside the rewriter are already isolated per field.
async fn process_file(
    path: &Path,
    service: &TranslationService,
    request: &TranslationRequest,
) -> FileReport {
    debug!("Processing file: {:?}", path);

    let content = match FileManager::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("Failed to read {:?}: {}", path, e);
            return FileReport {
                path: path.to_path_buf(),
                translated_fields: 0,
                failures: Vec::new(),
                error: Some(e.to_string()),
            };
        }
    };

    let rewriter = ConfigRewriter::new(
        service,
        &request.source_language,
        &request.target_language,
        request.mode,
    );
    let outcome = rewriter.rewrite(&content).await;

    if let Err(e) = FileManager::write_to_file(path, &outcome.content) {
        warn!("Failed to write {:?}: {}", path, e);
        return FileReport {
            path: path.to_path_buf(),
            translated_fields: outcome.translated_fields,
            failures: outcome.failures,
            error: Some(e.to_string()),
        };
    }

    FileReport {
        path: path.to_path_buf(),
        translated_fields: outcome.translated_fields,
        failures: outcome.failures,
        error: None,
    }
}
