//! Build configuration management for `ampcss.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # [source], [output], [svg], [watch]
//! ├── types/         # ConfigError, ConfigDiagnostics, FieldPath
//! └── mod.rs         # Config (this file)
//! ```
//!
//! The config file is optional. Without one every section takes its
//! defaults, which reproduce the classic layout: `_sass/**/site.scss`
//! compiled into `assets/css/site.css` and `assets/css/amp.css`.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{
    MalformedPolicy, MediaBucket, OutputConfig, SourceConfig, SplitConfig, SvgConfig, WatchConfig,
};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath};

use crate::cli::{BuildArgs, Cli};
use crate::utils::path::normalize_path;
use crate::{debug, log};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name looked up from the working directory.
pub const DEFAULT_CONFIG: &str = "ampcss.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing ampcss.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Absolute path to the config file, if one was found
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    pub source: SourceConfig,
    pub output: OutputConfig,
    pub svg: SvgConfig,
    pub watch: WatchConfig,
}

impl Config {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. A missing default
    /// config is not an error; a missing file passed with `-C` is.
    pub fn load(cli: &Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        let mut config = match find_config_file(&cli.config) {
            Some(path) => {
                let mut config = Self::from_path(&path)?;
                config.root = path.parent().map(Path::to_path_buf).unwrap_or(cwd);
                config.config_path = Some(path);
                config
            }
            None if cli.config != Path::new(DEFAULT_CONFIG) => {
                return Err(ConfigError::NotFound(cli.config.clone()).into());
            }
            None => {
                debug!("config"; "no {} found, using defaults", DEFAULT_CONFIG);
                Self {
                    root: cwd,
                    ..Self::default()
                }
            }
        };

        config.apply_args(cli.build_args());
        config.finalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides.
    fn apply_args(&mut self, args: &BuildArgs) {
        if let Some(source) = &args.source {
            self.source.dir = source.clone();
        }
        if let Some(output) = &args.output {
            self.output.dir = output.clone();
        }
        if let Some(minify) = args.minify {
            self.output.minify = minify;
        }
    }

    /// Resolve every configured path against the project root.
    pub fn finalize(&mut self) {
        let root = self.root.clone();
        let resolve = |path: &Path| normalize_path(&root.join(path));

        self.source.dir = resolve(self.source.dir.as_path());
        self.output.dir = resolve(self.output.dir.as_path());
        self.source.load_paths = self
            .source
            .load_paths
            .iter()
            .map(|p| resolve(p.as_path()))
            .collect();
    }

    /// Validate all sections, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();
        self.source.validate(&mut diag);
        self.output.validate(&mut diag);
        self.watch.validate(&mut diag);
        diag.into_result()
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {field}");
        }
    }

    /// Get path relative to the project root, for display.
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Directories the watcher attaches to.
    pub fn watch_roots(&self) -> Vec<PathBuf> {
        let mut roots = vec![self.source.dir.clone()];
        for path in &self.source.load_paths {
            if !roots.iter().any(|root| path.starts_with(root)) {
                roots.push(path.clone());
            }
        }
        roots
    }
}

#[cfg(test)]
pub fn test_parse_config(extra: &str) -> Config {
    let (parsed, ignored) = Config::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
