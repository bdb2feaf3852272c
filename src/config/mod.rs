pub mod persist;
mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Default config locations, in search order
const DEFAULT_PATHS: &[&str] = &[
    "./hlsdeck.toml",
    "./config.toml",
    "~/.config/hlsdeck/config.toml",
    "/etc/hlsdeck/config.toml",
];

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    match find_config() {
        Some(path) => load_config(&path),
        None => Ok(Config::default()),
    }
}

/// First existing file among the default locations
pub fn find_config() -> Option<PathBuf> {
    DEFAULT_PATHS.iter().find_map(|path_str| {
        let path = PathBuf::from(shellexpand::tilde(path_str).as_ref());
        path.exists().then_some(path)
    })
}

/// Where `hlsdeck login` writes when no config file exists yet
pub fn user_config_path() -> PathBuf {
    PathBuf::from(shellexpand::tilde("~/.config/hlsdeck/config.toml").as_ref())
}

impl Config {
    /// Resolve the bearer identity: explicit value, then the configured
    /// environment variable, then the stored token. Blank values are ignored.
    pub fn resolve_token(&self, explicit: Option<&str>) -> Option<String> {
        let from_env = std::env::var(&self.auth.token_env).ok();
        explicit
            .map(str::to_string)
            .into_iter()
            .chain(from_env)
            .chain(self.auth.token.clone())
            .map(|t| t.trim().to_string())
            .find(|t| !t.is_empty())
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    // Validate API config
    let base = config.api.base_url.trim();
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        anyhow::bail!(
            "API base URL must start with http:// or https://: {}",
            config.api.base_url
        );
    }
    if config.api.timeout_secs == 0 {
        anyhow::bail!("API timeout cannot be 0");
    }

    // Validate player config
    if config.player.width == 0 || config.player.height == 0 {
        anyhow::bail!("Player width and height must be non-zero");
    }
    if config.player.playback_rates.is_empty() {
        anyhow::bail!("At least one playback rate is required");
    }
    for rate in &config.player.playback_rates {
        if !rate.is_finite() || *rate <= 0.0 {
            anyhow::bail!("Invalid playback rate: {}", rate);
        }
    }
    if let Some(ref program) = config.player.program {
        if program.is_absolute() && !program.exists() {
            tracing::warn!("Player program does not exist: {:?}", program);
        }
    }

    // Validate catalog config
    if config.catalog.quality_labels.is_empty() {
        tracing::warn!("No quality labels configured; catalog videos will play in auto quality only");
    }
    for label in &config.catalog.quality_labels {
        if label.trim().is_empty() {
            anyhow::bail!("Quality labels cannot be blank");
        }
    }

    Ok(())
}
