/*!
 * # ttml2srt
 *
 * A Rust library and CLI for converting TTML timed-text subtitle documents
 * to SubRip (SRT).
 *
 * ## Features
 *
 * - Classify and resolve every TTML time notation: clock+frame,
 *   clock+fraction, and unit-tagged offsets (ticks, seconds, minutes,
 *   hours, milliseconds, frames)
 * - Frame rate, tick rate, clock mode and time base taken from document
 *   metadata, with CLI fallbacks
 * - Global shift and duration-based retiming (scale)
 * - Deterministic consolidation of overlapping cues
 * - Single file or whole directory conversion
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `time_resolver`: time expression classification, conversion and
 *   SubRip timestamp formatting
 * - `subtitle_processor`: cue model, overlap merging and SRT output
 * - `ttml_document`: TTML parsing and dialogue extraction
 * - `app_config`: Configuration management
 * - `app_controller`: Main application controller
 * - `file_utils`: File system operations
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
pub mod errors;
pub mod file_utils;
pub mod subtitle_processor;
pub mod time_resolver;
pub mod ttml_document;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{AppError, DocumentError, TimeExpressionError};
pub use subtitle_processor::{Cue, CueCollection};
pub use time_resolver::{TimeNotation, TimingContext};
pub use ttml_document::TtmlDocument;
