//! Host configuration management for `spa-host.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── host       # [host]
//! │   ├── mount      # [[mount]]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics
//! │   ├── field      # FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # AppConfig (this file)
//! ```

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{HostConfig, MountConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config};

use crate::{
    cli::{Cli, Commands, HostArgs},
    log,
    manifest::ManifestLocator,
    utils::path::{normalize_path, resolve_against},
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing spa-host.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    #[serde(default)]
    pub host: HostConfig,

    #[serde(default)]
    pub serve: ServeConfig,

    /// Single-page app mounts, in declaration order
    #[serde(default, rename = "mount")]
    pub mounts: Vec<MountConfig>,
}

impl AppConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file; its parent directory
    /// becomes the root relative paths resolve against.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let config_path = find_config_file(&cli.config)
            .ok_or_else(|| ConfigError::NotFound(cli.config.clone()))?;

        let mut config = Self::from_path(&config_path)?;
        config.config_path = config_path;
        config.finalize(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)
            .with_context(|| format!("failed to parse `{}`", path.display()))?;

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

    /// Resolve paths against the config directory and apply CLI overrides.
    fn finalize(&mut self, cli: &Cli) {
        let root = self
            .config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let root = normalize_path(&root);

        self.config_path = normalize_path(&self.config_path);
        self.apply_command_options(cli);
        self.normalize_paths(&root);
    }

    fn apply_command_options(&mut self, cli: &Cli) {
        if let Commands::Serve {
            interface, port, ..
        } = &cli.command
        {
            Self::update_option(&mut self.serve.interface, interface.as_ref());
            Self::update_option(&mut self.serve.port, port.as_ref());
        }
        self.apply_host_args(cli.host_args());
    }

    fn apply_host_args(&mut self, args: &HostArgs) {
        crate::logger::set_verbose(args.verbose);

        Self::update_option(&mut self.host.environment, args.environment.as_ref());
        if let Some(manifest) = &args.manifest {
            // relative to cwd, not to the config file
            let cwd = std::env::current_dir().unwrap_or_default();
            self.host.static_assets_manifest = Some(resolve_against(manifest, &cwd));
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    fn normalize_paths(&mut self, root: &Path) {
        self.host.web_root = normalize_path(&resolve_against(&self.host.web_root, root));
        if let Some(manifest) = self.host.static_assets_manifest.take() {
            self.host.static_assets_manifest =
                Some(normalize_path(&resolve_against(&manifest, root)));
        }
    }

    /// Validate all sections, collecting every error before failing.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.host.validate(&mut diag);
        self.serve.validate(&mut diag);
        MountConfig::validate_all(&self.mounts, &mut diag);

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }

    /// Where this host looks for the development manifest.
    pub fn manifest_locator(&self) -> ManifestLocator {
        ManifestLocator::for_current_exe(
            self.host.application_name.as_str(),
            self.host.static_assets_manifest.clone(),
        )
    }
}

/// Parse a config, panicking on unknown fields to catch typos in tests.
#[cfg(test)]
pub fn test_parse_config(content: &str) -> AppConfig {
    let (parsed, ignored) = AppConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}
