//! Handler functions for `folio config {path,show,init,export}`.

use std::path::{Path, PathBuf};

use folio_core::{Error, Result};

use crate::cli::ConfigAction;
use crate::config::FolioConfig;

/// Handle a config subcommand.
///
/// Receives the raw `--config` path (not a loaded config) because `path`
/// and `init` work before a config file exists.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => cmd_config_path(config_path),
        ConfigAction::Show => {
            let config = FolioConfig::load(config_path)?;
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = match file {
                Some(p) => PathBuf::from(p),
                None => FolioConfig::default_config_path()
                    .ok_or_else(|| Error::config("Could not determine config directory"))?,
            };
            write_default_config(&path, force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
        ConfigAction::Export { docker_env } => {
            let config = FolioConfig::load(config_path)?;
            for line in export_lines(&config, docker_env)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn cmd_config_path(config_path: Option<&str>) -> Result<()> {
    match FolioConfig::resolve_config_path(config_path) {
        Some(path) => {
            println!("{}", path.display());
            if !path.exists() {
                eprintln!("(file does not exist; run `folio config init` to create it)");
            }
            Ok(())
        }
        None => Err(Error::config(
            "Could not determine config directory for this platform",
        )),
    }
}

/// Write the default configuration to `path`, creating parent directories.
///
/// Refuses to replace an existing file unless `force` is set.
pub fn write_default_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = FolioConfig::default().to_toml_string()?;
    std::fs::write(path, toml_str).map_err(|e| Error::io_with_path(e, path))
}

/// `KEY=value` lines (or `--env KEY=value` for Docker) for a config.
pub fn export_lines(config: &FolioConfig, docker_env: bool) -> Result<Vec<String>> {
    Ok(config
        .to_env_vars()?
        .into_iter()
        .map(|(key, value)| {
            if docker_env {
                format!("--env {key}={value}")
            } else {
                format!("{key}={value}")
            }
        })
        .collect())
}
