//! Configuration persistence using toml_edit to preserve formatting and comments.

use anyhow::{Context, Result};
use std::path::Path;
use toml_edit::{value, DocumentMut, Item, Table};

/// Save the entire config to a TOML file, creating parent directories
pub fn save_config(path: &Path, config: &super::Config) -> Result<()> {
    let content =
        toml::to_string_pretty(config).with_context(|| "Failed to serialize config")?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}

/// Store (or with `None`, remove) the bearer token in the `[auth]` section,
/// leaving the rest of the file untouched
pub fn update_token(path: &Path, token: Option<&str>) -> Result<()> {
    if !path.exists() {
        let mut config = super::Config::default();
        config.auth.token = token.map(str::to_string);
        return save_config(path, &config);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let mut doc: DocumentMut = content
        .parse()
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    // `auth` may be a `[auth]` section or an inline `auth = { ... }` table
    if doc.get("auth").and_then(Item::as_table_like).is_none() {
        doc.insert("auth", Item::Table(Table::new()));
    }

    if let Some(auth) = doc.get_mut("auth").and_then(Item::as_table_like_mut) {
        match token {
            Some(token) => {
                auth.insert("token", value(token));
            }
            None => {
                auth.remove("token");
            }
        }
    }

    std::fs::write(path, doc.to_string())
        .with_context(|| format!("Failed to write config file: {:?}", path))?;

    Ok(())
}
