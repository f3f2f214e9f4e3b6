/*!
 * # dramatis - drama corpus tooling
 *
 * A Rust toolkit for a TEI drama corpus of works by female authors.
 *
 * ## Features
 *
 * - Extract per-character speech text from TEI play transcripts
 * - Group speech by act or scene for single plays with ordinal headings
 * - Aggregate works metadata into chart-data series:
 *   - Genre distribution
 *   - Author ranking
 *   - Decade distribution
 * - Enrich works tables with Wikidata person identifiers
 * - Batch processing of whole corpus directories
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `speech_extractor`: TEI document handling and speech accumulation
 * - `ordinal_utils`: Act and scene heading normalization
 * - `works_stats`: Works metadata aggregation
 * - `wikidata`: Wikidata entity lookups and table enrichment
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
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
pub mod file_utils;
pub mod speech_extractor;
pub mod ordinal_utils;
pub mod works_stats;
pub mod wikidata;
pub mod app_controller;
pub mod errors;

// Re-export main types for easier usage
pub use app_config::{Config, GenderLabelMode};
pub use app_controller::{Controller, ExtractionMode};
pub use speech_extractor::{Gender, PersonRegistry, SpeechAccumulator, SpeechKey};
pub use errors::{AppError, ExtractionError, StatsError, WikidataError};
