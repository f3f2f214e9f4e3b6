use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use url::Url;

use crate::speech_extractor::Gender;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Directory scanned for TEI XML documents
    #[serde(default = "default_input_directory")]
    pub input_directory: String,

    /// Directory artifacts are written to
    #[serde(default = "default_output_directory")]
    pub output_directory: String,

    /// Speech extraction settings
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Wikidata lookup settings
    #[serde(default)]
    pub wikidata: WikidataConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Artifact-name prefix style for a speaker's gender
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum GenderLabelMode {
    // @mode: Human-readable prefix (Male / Female / Unknown)
    Full,
    // @mode: Single-letter prefix (M / F / U)
    #[default]
    Abbreviated,
}

impl GenderLabelMode {
    // @returns: Prefix for a gender in this mode
    pub fn render(&self, gender: Gender) -> &'static str {
        match self {
            Self::Full => gender.label(),
            Self::Abbreviated => gender.abbreviation(),
        }
    }

    // @returns: Lowercase mode identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Full => "full".to_string(),
            Self::Abbreviated => "abbreviated".to_string(),
        }
    }
}

// Implement Display trait for GenderLabelMode
impl std::fmt::Display for GenderLabelMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for GenderLabelMode
impl std::str::FromStr for GenderLabelMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "abbreviated" => Ok(Self::Abbreviated),
            _ => Err(anyhow!("Invalid gender label mode: {}", s)),
        }
    }
}

/// Speech extraction configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Artifact-name prefix style for the speaker's gender
    #[serde(default)]
    pub gender_labels: GenderLabelMode,

    /// Group speech by act or scene instead of whole-play
    #[serde(default)]
    pub segmented: bool,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            gender_labels: GenderLabelMode::default(),
            segmented: false,
        }
    }
}

/// Wikidata entity-data service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WikidataConfig {
    /// Service base URL
    #[serde(default = "default_wikidata_endpoint")]
    pub endpoint: String,

    /// Delay between consecutive lookups in milliseconds
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for WikidataConfig {
    fn default() -> Self {
        Self {
            endpoint: default_wikidata_endpoint(),
            request_delay_ms: default_request_delay_ms(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_input_directory() -> String {
    "input".to_string()
}

fn default_output_directory() -> String {
    "output".to_string()
}

fn default_wikidata_endpoint() -> String {
    "https://www.wikidata.org".to_string()
}

fn default_request_delay_ms() -> u64 {
    100 // matches the pause the entity-data endpoint is comfortable with
}

fn default_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.input_directory.trim().is_empty() {
            return Err(anyhow!("Input directory must not be empty"));
        }

        if self.output_directory.trim().is_empty() {
            return Err(anyhow!("Output directory must not be empty"));
        }

        Url::parse(&self.wikidata.endpoint).map_err(|e| {
            anyhow!(
                "Invalid Wikidata endpoint '{}': {}",
                self.wikidata.endpoint,
                e
            )
        })?;

        if self.wikidata.timeout_secs == 0 {
            return Err(anyhow!("Wikidata timeout must be at least one second"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            input_directory: default_input_directory(),
            output_directory: default_output_directory(),
            extraction: ExtractionConfig::default(),
            wikidata: WikidataConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
