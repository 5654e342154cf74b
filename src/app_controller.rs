use anyhow::{Result, Context};
use log::{error, warn, info};
use std::fs::File;
use std::path::{Path, PathBuf};
use indicatif::{ProgressBar, ProgressStyle};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::pipeline::{translate_archive, BatchReport, TranslationRequest, ProgressCallback};
use crate::translation_service::TranslationService;

// @module: Application controller for mod archive translation

/// Main application controller driving one archive translation run
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Run the main workflow: translate one mod archive file to another
    pub async fn run(&self, input_file: PathBuf, output_file: PathBuf, force_overwrite: bool) -> Result<()> {
        // Start timing the process
        let start_time = std::time::Instant::now();

        if !input_file.exists() {
            return Err(anyhow::anyhow!("Input archive does not exist: {:?}", input_file));
        }

        if output_file.exists() && !force_overwrite {
            warn!("Skipping, output already exists (use -f to force overwrite)");
            return Ok(());
        }

        if let Some(parent) = output_file.parent() {
            FileManager::ensure_dir(parent)?;
        }

        let input = File::open(&input_file)
            .with_context(|| format!("Failed to open input archive: {:?}", input_file))?;
        let output = File::create(&output_file)
            .with_context(|| format!("Failed to create output archive: {:?}", output_file))?;

        let service = TranslationService::new(&self.config.translation);

        // Probe the backend once up front so connectivity problems surface
        // before the archive is unpacked
        if let Err(e) = service.test_connection().await {
            warn!("Translation backend connectivity check failed: {}", e);
        }

        let request = TranslationRequest {
            source_language: self.config.source_language.clone(),
            target_language: self.config.target_language.clone(),
            mode: self.config.merge_mode,
        };

        info!(
            "Translating archive {:?} ({} -> {}, mode: {})",
            input_file, request.source_language, request.target_language, request.mode
        );

        // Progress bar driven by the pipeline's (completed, total) callback;
        // the total is only known once the working tree has been enumerated
        let progress_bar = ProgressBar::new(0);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));
        progress_bar.set_message("Translating");

        let pb = progress_bar.clone();
        let progress: ProgressCallback = Box::new(move |completed, total| {
            pb.set_length(total as u64);
            pb.set_position(completed as u64);
        });

        let report = translate_archive(
            input,
            output,
            &service,
            &request,
            self.config.translation.concurrent_files,
            progress,
        )
        .await
        .map_err(|e| anyhow::anyhow!("Archive translation failed: {}", e))?;

        progress_bar.finish_and_clear();

        let elapsed = start_time.elapsed();
        info!(
            "Translation complete in {}: {}",
            Self::format_duration(elapsed),
            report.summary()
        );

        if report.failed_files > 0 || report.field_failures() > 0 {
            error!(
                "Completed with {} file errors and {} field failures",
                report.failed_files,
                report.field_failures()
            );
            self.write_issues_log(&report, &output_file)?;
        }

        info!("Success: {}", output_file.display());

        Ok(())
    }

    /// Write per-file failure details to an issues log next to the output
    fn write_issues_log(&self, report: &BatchReport, output_file: &Path) -> Result<()> {
        let log_path = output_file.with_extension("issues.log");

        let mut log_content = String::new();
        log_content.push_str(&format!(
            "Translation issues - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ));
        log_content.push_str(&format!(
            "Language pair: {} -> {}\n\n",
            self.config.source_language, self.config.target_language
        ));

        for file_report in &report.reports {
            if file_report.error.is_none() && file_report.failures.is_empty() {
                continue;
            }
            log_content.push_str(&format!("{}\n", file_report.path.display()));
            if let Some(err) = &file_report.error {
                log_content.push_str(&format!("  [FILE] {}\n", err));
            }
            for failure in &file_report.failures {
                log_content.push_str(&format!("  [{}] {}\n", failure.field, failure.error));
            }
        }

        FileManager::write_to_file(&log_path, &log_content)?;
        info!("Issues written to {}", log_path.display());

        Ok(())
    }

    // Format duration in a human-readable format
    fn format_duration(duration: std::time::Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
