//! `trowel config` subcommands.
//!
//! `get` reads the effective configuration (file plus `TROWEL_*`
//! overrides); `set` edits the file itself and refuses values that would no
//! longer load as a [`TrowelConfig`].

use std::path::PathBuf;

use trowel_core::config::TrowelConfig;
use trowel_core::{Error, Result};

use crate::cli::ConfigAction;

/// Runs a config subcommand.
pub fn handle_config_command(config_path: Option<&str>, action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Path => print_config_path(config_path),
        ConfigAction::Get { key } => {
            let value = config_value(config_path, &key)?;
            println!("{}", format_toml_value(&value));
            Ok(())
        }
        ConfigAction::Set { key, value } => {
            let path = set_config_value(config_path, &key, &value)?;
            println!("Set {key} = {value} in {}", path.display());
            Ok(())
        }
        ConfigAction::Init { file, force } => {
            let path = init_config_file(file.as_deref().or(config_path), force)?;
            println!("Config file created at {}", path.display());
            Ok(())
        }
        ConfigAction::Export { docker_env } => {
            let config = TrowelConfig::load(config_path)?;
            for line in export_lines(&config, docker_env)? {
                println!("{line}");
            }
            Ok(())
        }
    }
}

fn config_file(config_path: Option<&str>) -> Result<PathBuf> {
    TrowelConfig::resolve_config_path(config_path)
        .ok_or_else(|| Error::config("Could not determine config directory for this platform"))
}

fn print_config_path(config_path: Option<&str>) -> Result<()> {
    let path = config_file(config_path)?;
    println!("{}", path.display());
    if !path.exists() {
        eprintln!("(file does not exist, run `trowel config init` to create it)");
    }
    Ok(())
}

/// Looks up a value of the effective configuration by dotted key.
pub fn config_value(config_path: Option<&str>, key: &str) -> Result<toml::Value> {
    let config = TrowelConfig::load(config_path)?;
    let value = toml::Value::try_from(&config).map_err(|e| Error::config(e.to_string()))?;
    get_nested_value(&value, key)
        .cloned()
        .ok_or_else(|| Error::config(format!("Key '{key}' not found in configuration")))
}

/// Sets a value by dotted key in an existing config file and returns the
/// file's path. The file is left untouched when the edited document no
/// longer loads.
pub fn set_config_value(config_path: Option<&str>, key: &str, value: &str) -> Result<PathBuf> {
    let path = config_file(config_path)?;
    if !path.exists() {
        return Err(Error::config(format!(
            "Config file does not exist at {}. Run `trowel config init` first.",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(&path).map_err(|e| Error::io_with_path(e, &path))?;
    let mut doc: toml::Value = toml::from_str(&content)
        .map_err(|e| Error::config(format!("Failed to parse {}: {e}", path.display())))?;
    set_nested_value(&mut doc, key, parse_value(value))?;
    doc.clone()
        .try_into::<TrowelConfig>()
        .map_err(|e| Error::config(format!("Invalid value for {key}: {e}")))?;

    let toml_str = toml::to_string_pretty(&doc).map_err(|e| Error::config(e.to_string()))?;
    std::fs::write(&path, toml_str).map_err(|e| Error::io_with_path(e, &path))?;
    Ok(path)
}

/// Writes the default configuration to `file` or the platform location.
pub fn init_config_file(file: Option<&str>, force: bool) -> Result<PathBuf> {
    let path = match file {
        Some(p) => PathBuf::from(p),
        None => config_file(None)?,
    };
    if path.exists() && !force {
        return Err(Error::config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| Error::io_with_path(e, parent))?;
    }

    let toml_str = TrowelConfig::default().to_toml_string()?;
    std::fs::write(&path, &toml_str).map_err(|e| Error::io_with_path(e, &path))?;
    Ok(path)
}

/// `KEY=VALUE` lines, or `--env KEY=VALUE` for `docker run`.
pub fn export_lines(config: &TrowelConfig, docker_env: bool) -> Result<Vec<String>> {
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

// ============================================================================
// TOML dotted-key helpers
// ============================================================================

/// Follows a dotted key through nested tables.
pub fn get_nested_value<'a>(value: &'a toml::Value, key: &str) -> Option<&'a toml::Value> {
    key.split('.')
        .try_fold(value, |current, part| current.as_table()?.get(part))
}

/// Sets a value at a dotted key, creating intermediate tables as needed.
pub fn set_nested_value(root: &mut toml::Value, key: &str, value: toml::Value) -> Result<()> {
    let parts: Vec<&str> = key.split('.').collect();
    let Some((last, parents)) = parts.split_last().filter(|(last, _)| !last.is_empty()) else {
        return Err(Error::config("Empty key path"));
    };

    let mut current = root;
    for part in parents {
        let table = current
            .as_table_mut()
            .ok_or_else(|| Error::config("Cannot navigate into a non-table value"))?;
        current = table
            .entry(part.to_string())
            .or_insert_with(|| toml::Value::Table(toml::map::Map::new()));
    }
    current
        .as_table_mut()
        .ok_or_else(|| Error::config("Cannot set key on a non-table value"))?
        .insert(last.to_string(), value);
    Ok(())
}

/// Parses a command-line value: bool, then integer, then float, then string.
pub fn parse_value(s: &str) -> toml::Value {
    match s {
        "true" => return toml::Value::Boolean(true),
        "false" => return toml::Value::Boolean(false),
        _ => {}
    }
    if let Ok(i) = s.parse::<i64>() {
        return toml::Value::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return toml::Value::Float(f);
    }
    toml::Value::String(s.to_string())
}

/// Renders a value for stdout; strings print without quotes.
pub fn format_toml_value(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => b.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(_) | toml::Value::Table(_) => {
            toml::to_string_pretty(value).unwrap_or_else(|_| format!("{value:?}"))
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
