/*!
 * # rwmodtrans - Rusted Warfare Mod Translator
 *
 * A Rust library for batch translation of the text fields embedded in
 * game-mod archives, preserving archive structure and formatting tokens.
 *
 * ## Features
 *
 * - Extract and repack zip-compatible mod archives
 * - Rewrite translatable fields in ini-like config files
 * - Preserve interpolation placeholders (`${..}`, `%{..}`) and escape
 *   sequences byte-for-byte
 * - Skip dotted reference keys that must never be translated
 * - `add` and `replace` merge modes for translated values
 * - Bounded-concurrency batch processing with progress reporting
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `segmenter`: Placeholder-aware value segmentation
 * - `config_rewriter`: Per-file line rewriting state machine
 * - `pipeline`: Bounded-concurrency file pipeline and archive round-trip
 * - `archive`: Archive extraction and repacking
 * - `translation_service`: Retry-wrapped translation capability
 * - `providers`: Translation backend clients:
 *   - `providers::google`: Google web translation endpoint
 *   - `providers::mock`: Offline backend for tests
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `language_utils`: ISO language code utilities
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod archive;
pub mod config_rewriter;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod providers;
pub mod segmenter;
pub mod translation_service;

// Re-export main types for easier usage
pub use app_config::{Config, MergeMode};
pub use config_rewriter::{ConfigRewriter, RewriteOutcome, TRANSLATABLE_FIELDS};
pub use pipeline::{translate_archive, BatchReport, TranslationRequest, QUALIFYING_EXTENSIONS};
pub use segmenter::{segment_value, is_reference_token, Segment};
pub use translation_service::TranslationService;
pub use errors::{AppError, ArchiveError, ProviderError, TranslationError};
