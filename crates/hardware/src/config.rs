//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize a run.
//! It provides:
//! 1. **Defaults:** Baseline run limits and the default processor.
//! 2. **Structures:** General run settings and pipeline selection.
//! 3. **Loading:** JSON parsing from a string or a file.
//!
//! A pipeline is selected either by catalog name or by an explicit shape; an
//! explicit shape wins when both are given.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::{self, ProcessorId};
use crate::common::error::{ConfigError, SimError};
use crate::core::pipeline::shape::PipelineShape;

/// Default configuration constants for the simulator.
mod defaults {
    use crate::catalog::ProcessorId;

    /// Cycle budget of a run before it is abandoned.
    pub const MAX_CYCLES: u64 = 1_000_000;

    /// Processor used when none is named.
    pub const PROCESSOR: ProcessorId = ProcessorId::RV32_5S;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use pipesim_core::config::Config;
///
/// let json = r#"{
///     "general": { "trace": true, "max_cycles": 500 },
///     "pipeline": { "processor": "RV64_5S_2S_DB" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace);
/// assert_eq!(config.general.max_cycles, 500);
/// assert_eq!(config.shape().unwrap().branch_delay_slots, 2);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// General run settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Pipeline selection.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reads and parses a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SimError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_json(&text)?)
    }

    /// Validated pipeline shape this configuration selects.
    pub fn shape(&self) -> Result<PipelineShape, ConfigError> {
        let shape = self
            .pipeline
            .shape
            .unwrap_or_else(|| catalog::describe(self.pipeline.processor).shape());
        shape.validate()?;
        Ok(shape)
    }
}

/// General run settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneralConfig {
    /// Emit a trace event for every cycle.
    #[serde(default)]
    pub trace: bool,

    /// Stop after this many cycles if the program has not finished.
    #[serde(default = "GeneralConfig::default_max_cycles")]
    pub max_cycles: u64,

    /// Initial stack pointer; `sp` starts at 0 when unset.
    #[serde(default)]
    pub initial_sp: Option<u64>,
}

impl GeneralConfig {
    fn default_max_cycles() -> u64 {
        defaults::MAX_CYCLES
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            max_cycles: defaults::MAX_CYCLES,
            initial_sp: None,
        }
    }
}

/// Pipeline selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Catalog processor.
    #[serde(default = "PipelineConfig::default_processor")]
    pub processor: ProcessorId,

    /// Explicit shape overriding the catalog entry.
    #[serde(default)]
    pub shape: Option<PipelineShape>,
}

impl PipelineConfig {
    fn default_processor() -> ProcessorId {
        defaults::PROCESSOR
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            processor: defaults::PROCESSOR,
            shape: None,
        }
    }
}
