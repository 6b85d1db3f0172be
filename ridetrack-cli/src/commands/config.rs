//! Configuration management CLI commands.
//!
//! `config get`, `config set`, `config list` and `config path` operate on the
//! selected configuration file (`--config`, or the default location).

use std::path::Path;

use clap::Subcommand;
use ridetrack::config::{ConfigFile, ConfigKey};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Get a configuration value
    Get {
        /// Configuration key in format section.key (e.g., backend.api_base_url)
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key in format section.key (e.g., tracking.poll_interval_secs)
        key: String,

        /// Value to set
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// List all configuration settings
    List,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            println!("{}", get_value(path, &key)?);
            Ok(())
        }
        ConfigCommands::Set { key, value } => {
            let key = set_value(path, &key, &value)?;
            println!("Set {} = {}", key, value.trim());
            Ok(())
        }
        ConfigCommands::List => {
            print!("{}", list(path)?);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        CliError::Config(format!(
            "Unknown configuration key '{}'. Use 'ridetrack config list' to see available keys.",
            key
        ))
    })
}

fn get_value(path: &Path, key: &str) -> Result<String, CliError> {
    let key = parse_key(key)?;
    let config = ConfigFile::load_from(path)?;
    let value = key.get(&config);

    Ok(if value.is_empty() {
        "(not set)".to_string()
    } else {
        value
    })
}

fn set_value(path: &Path, key: &str, value: &str) -> Result<ConfigKey, CliError> {
    let key = parse_key(key)?;
    let mut config = ConfigFile::load_from(path)?;
    key.set(&mut config, value)?;
    config.save_to(path)?;
    Ok(key)
}

fn list(path: &Path) -> Result<String, CliError> {
    let config = ConfigFile::load_from(path)?;
    let mut out = String::from("Configuration Settings\n======================\n");
    let mut current_section = "";

    for key in ConfigKey::all() {
        let section = key.section();
        if section != current_section {
            out.push_str(&format!("\n[{}]\n", section));
            current_section = section;
        }

        let value = key.get(&config);
        if value.is_empty() {
            out.push_str(&format!("  {} = (not set)\n", key.key_name()));
        } else {
            out.push_str(&format!("  {} = {}\n", key.key_name(), value));
        }
    }

    Ok(out)
}
