use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use crate::config::{AggregatorConfig, CONFIG_FILE_NAME};

/// Render the default configuration as TOML.
pub fn default_config_toml() -> Result<String> {
    let body = toml::to_string_pretty(&AggregatorConfig::default())
        .context("Failed to serialize default config")?;
    Ok(format!(
        "# crash-aggregates configuration\n# Every key is optional; removing one restores its default.\n\n{body}"
    ))
}

/// Write the default configuration into `dir`.
pub fn init_config(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!(
            "{} already exists. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, default_config_toml()?)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    println!("Created {}", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_and_validate_config;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_round_trips() {
        let text = default_config_toml().unwrap();
        let parsed = parse_and_validate_config(&text).unwrap();
        assert_eq!(parsed, AggregatorConfig::default());
    }

    #[test]
    fn test_init_refuses_overwrite() {
        let dir = TempDir::new().unwrap();
        init_config(dir.path(), false).unwrap();
        assert!(init_config(dir.path(), false).is_err());
        assert!(init_config(dir.path(), true).is_ok());
    }
}
