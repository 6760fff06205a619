use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::BatchError;
use crate::mapmatte::color_quantizer::ColorQuantizer;
use crate::mapmatte::extraction::ExtractionConfig;

const CONFIG_FILE_NAME: &str = "config.yaml";

/// Batch settings, as stored in `config.yaml`
///
/// Every section and key is optional and falls back to its default.
///
/// ```yaml
/// paths:
///   input_dir: input
///   output_dir: output
/// processing:
///   kmeans_clusters: 4
///   alpha_threshold: 127
/// flatten_colors:
///   enabled: true
///   target_luminance: 200
/// files:
///   extensions: [".png", ".jpg"]
/// logging:
///   show_progress: true
///   show_stats: true
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    pub paths: PathsConfig,
    pub processing: ProcessingConfig,
    pub flatten_colors: FlattenConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("input"),
            output_dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    pub kmeans_clusters: usize,
    pub alpha_threshold: u8,
    pub max_iterations: usize,
    pub seed: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        let extraction = ExtractionConfig::default();
        Self {
            kmeans_clusters: extraction.cluster_count,
            alpha_threshold: extraction.alpha_threshold,
            max_iterations: extraction.max_iterations,
            seed: extraction.seed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlattenConfig {
    pub enabled: bool,
    pub target_luminance: u8,
}

impl Default for FlattenConfig {
    fn default() -> Self {
        let extraction = ExtractionConfig::default();
        Self {
            enabled: extraction.flatten_enabled,
            target_luminance: extraction.target_luminance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Accepted extensions, matched case-insensitively, with or without the dot
    pub extensions: Vec<String>,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            extensions: [".png", ".jpg", ".jpeg", ".bmp", ".webp"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub show_progress: bool,
    pub show_stats: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            show_progress: true,
            show_stats: true,
        }
    }
}

impl BatchConfig {
    /// Loads a YAML config file
    ///
    /// Relative `paths` are resolved against the directory containing the file.
    ///
    /// # Errors
    ///
    /// * `BatchError::Config` - the file cannot be read or is not valid YAML
    ///   for this layout (including out-of-range values)
    pub fn load(path: &Path) -> Result<Self, BatchError> {
        let content = fs::read_to_string(path).map_err(|e| BatchError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        let mut config = Self::from_yaml_str(&content).map_err(|reason| BatchError::Config {
            path: path.to_path_buf(),
            reason,
        })?;

        config.resolve_paths(path);
        Ok(config)
    }

    /// `config.yaml` in the directory of the running executable
    ///
    /// Falls back to `config.yaml` in the working directory when the
    /// executable path is unavailable.
    pub fn default_path() -> PathBuf {
        env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(CONFIG_FILE_NAME)))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Loads `path`, or uses the defaults if the file does not exist
    ///
    /// Either way relative `paths` are resolved against the directory of
    /// `path`, so the default `input`/`output` directories sit next to it.
    ///
    /// # Errors
    ///
    /// * `BatchError::Config` - the file exists but cannot be read or parsed
    pub fn load_or_default(path: &Path) -> Result<Self, BatchError> {
        if path.exists() {
            return Self::load(path);
        }
        warn!("Config {} not found, using defaults", path.display());
        let mut config = Self::default();
        config.resolve_paths(path);
        Ok(config)
    }

    /// Parses a config from YAML text without touching the paths.
    pub fn from_yaml_str(content: &str) -> Result<Self, String> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(|e| e.to_string())
    }

    /// The parameters handed to [`MapExtractor`](crate::MapExtractor).
    pub fn extraction_config(&self) -> ExtractionConfig {
        ExtractionConfig {
            cluster_count: self.processing.kmeans_clusters,
            alpha_threshold: self.processing.alpha_threshold,
            flatten_enabled: self.flatten_colors.enabled,
            target_luminance: self.flatten_colors.target_luminance,
            max_iterations: self.processing.max_iterations,
            tolerance: ColorQuantizer::DEFAULT_TOLERANCE,
            seed: self.processing.seed,
        }
    }

    fn resolve_paths(&mut self, config_path: &Path) {
        let base = config_path.parent().unwrap_or_else(|| Path::new(""));
        self.paths.input_dir = resolve(base, &self.paths.input_dir);
        self.paths.output_dir = resolve(base, &self.paths.output_dir);
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
