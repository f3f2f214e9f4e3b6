use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use roxmltree::Document;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::ExtractionError;
use crate::file_utils::FileManager;
use crate::speech_extractor::{self, PersonRegistry, SpeechKey};
use crate::wikidata::WikidataClient;
use crate::works_stats::{self, WorksTable};

// @module: Application controller for the batch pipelines

/// Which grouping the extractor applies to a play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// One artifact per speaker over the whole play
    FullPlay,
    /// One artifact per speaker per act (or per scene of a single-act play)
    Segmented,
}

/// Main application controller for the batch pipelines
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        Ok(Self { config })
    }

    /// Process every TEI document in the input directory independently.
    ///
    /// A failing document is logged and the batch moves on to the next file.
    /// Returns the number of documents that produced artifacts.
    pub fn run_extraction(&self, mode: ExtractionMode) -> Result<usize> {
        let input_dir = Path::new(&self.config.input_directory);
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow::anyhow!(
                "Input directory does not exist: {:?}",
                input_dir
            ));
        }

        let output_dir = PathBuf::from(&self.config.output_directory);
        FileManager::ensure_dir(&output_dir)?;

        let files = FileManager::find_files(input_dir, "xml")?;
        if files.is_empty() {
            warn!("No XML documents found in {:?}", input_dir);
            return Ok(0);
        }

        let progress = ProgressBar::new(files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} documents {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress.set_style(template_result);

        let mut processed = 0;
        for file in &files {
            let name = file
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            progress.set_message(name);

            match self.process_document(file, &output_dir, mode) {
                Ok(artifacts) => {
                    debug!("{:?}: {} artifacts", file, artifacts);
                    processed += 1;
                }
                Err(e) => error!("Failed to process {:?}: {}", file, e),
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        info!(
            "Processed {}/{} documents, results saved in {:?}",
            processed,
            files.len(),
            output_dir
        );
        Ok(processed)
    }

    /// Extract one play document and write its artifacts.
    ///
    /// Returns the number of artifacts written. A parse failure aborts this
    /// document only.
    pub fn process_document(
        &self,
        file: &Path,
        output_dir: &Path,
        mode: ExtractionMode,
    ) -> Result<usize> {
        let content = FileManager::read_to_string(file)?;
        let document =
            Document::parse(&content).map_err(|e| ExtractionError::Parse(e.to_string()))?;

        let registry = PersonRegistry::from_document(&document);
        let accumulator = match mode {
            ExtractionMode::FullPlay => speech_extractor::collect_speeches(&document),
            ExtractionMode::Segmented => speech_extractor::collect_speeches_segmented(&document),
        };

        let title = FileManager::sanitize_filename(&speech_extractor::play_title(&document));

        let mut written = 0;
        for (key, blocks) in accumulator {
            let artifact = self.artifact_name(&key, &title, mode, &registry);
            FileManager::write_to_file(output_dir.join(artifact), &blocks.join("\n\n"))?;
            written += 1;
        }
        Ok(written)
    }

    /// Artifact name for one accumulator bucket.
    ///
    /// Full-play: `{Gender}_{Title}_{SpeakerName}.txt`.
    /// Segmented: `{Gender}_{SpeakerName}_{UnitKey}.txt`.
    fn artifact_name(
        &self,
        key: &SpeechKey,
        title: &str,
        mode: ExtractionMode,
        registry: &PersonRegistry,
    ) -> String {
        let gender = self
            .config
            .extraction
            .gender_labels
            .render(registry.gender(&key.speaker));
        let speaker = FileManager::sanitize_filename(registry.display_name(&key.speaker));

        match mode {
            ExtractionMode::FullPlay => format!("{}_{}_{}.txt", gender, title, speaker),
            ExtractionMode::Segmented => {
                let unit =
                    FileManager::sanitize_filename(key.unit.as_deref().unwrap_or("Unknown"));
                format!("{}_{}_{}.txt", gender, speaker, unit)
            }
        }
    }

    /// Aggregate the works metadata tables into chart-data artifacts.
    pub fn run_stats<P1: AsRef<Path>, P2: AsRef<Path>>(
        &self,
        outside_corpus: P1,
        in_corpus: P2,
    ) -> Result<()> {
        let output_dir = PathBuf::from(&self.config.output_directory);
        FileManager::ensure_dir(&output_dir)?;

        let outside = WorksTable::from_csv_file(outside_corpus.as_ref())?;
        let corpus = WorksTable::from_csv_file(in_corpus.as_ref())?;
        info!(
            "Loaded {} works outside the corpus and {} in it",
            outside.records.len(),
            corpus.records.len()
        );

        let genres = works_stats::genre_distribution(&outside, &corpus)?;
        Self::write_series(&output_dir.join("genre_distribution.json"), &genres)?;

        let authors = works_stats::top_authors(&outside, &corpus)?;
        Self::write_series(&output_dir.join("top_authors.json"), &authors)?;

        let decades = works_stats::works_by_decade(&outside, &corpus)?;
        Self::write_series(&output_dir.join("works_by_decade.json"), &decades)?;

        info!("Chart data saved in {:?}", output_dir);
        Ok(())
    }

    fn write_series<T: Serialize>(path: &Path, series: &T) -> Result<()> {
        let json =
            serde_json::to_string_pretty(series).context("Failed to serialize chart data")?;
        FileManager::write_to_file(path, &json)
    }

    /// Enrich a works table with Wikidata person identifiers.
    ///
    /// When no output path is given the enriched table lands next to the
    /// other artifacts, named after the input.
    pub async fn run_enrichment<P: AsRef<Path>>(
        &self,
        input: P,
        output: Option<PathBuf>,
    ) -> Result<()> {
        let input = input.as_ref();
        if !FileManager::file_exists(input) {
            return Err(anyhow::anyhow!("Input table does not exist: {:?}", input));
        }

        let output = match output {
            Some(path) => path,
            None => {
                let stem = input
                    .file_stem()
                    .map(|s| s.to_string_lossy().to_string())
                    .unwrap_or_else(|| "works".to_string());
                let output_dir = PathBuf::from(&self.config.output_directory);
                FileManager::ensure_dir(&output_dir)?;
                output_dir.join(format!("{}_enriched.csv", stem))
            }
        };

        let client = WikidataClient::from_config(&self.config.wikidata)?;
        let fetched = client.enrich_works_table(input, &output).await?;
        info!("Enriched {} rows, results saved in {:?}", fetched, output);
        Ok(())
    }
}
