use anyhow::{Context, Result};
use toml_edit::DocumentMut;

use gamelog_tracker::{config, Config};

const VALID_KEYS: &str = "database_path, cover_max_dimension, logging.level";

/// Show the current effective configuration.
pub fn show_config(config: &Config) -> Result<()> {
    println!("Current Configuration");
    println!("=====================\n");

    println!("Config file: {}", config::config_file_path().display());

    let exists = config::config_file_path().exists();
    println!("File exists: {}\n", if exists { "yes" } else { "no (using defaults)" });

    println!("Settings:");
    println!("  database_path: {}", config.database_path.display());
    println!("  cover_max_dimension: {}", config.cover_max_dimension);
    println!("  logging.level: {:?}", config.logging.level());
    println!("  logging.coloured: {}", config.logging.coloured());
    println!("  logging.output: {:?}", config.logging.output());

    println!("\nPriority: CLI args > ENV vars (GAMELOG_*) > Config file > Defaults");

    Ok(())
}

/// Get a specific config value, or print the whole file.
pub fn get_config(config: &Config, key: Option<String>) -> Result<()> {
    let Some(key) = key else {
        let config_path = config::config_file_path();

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            print!("{}", contents);
        } else {
            println!("Config file does not exist: {}", config_path.display());
            println!("\nRun 'gamelog config init' to create it.");
        }
        return Ok(());
    };

    match key.as_str() {
        "database_path" => println!("{}", config.database_path.display()),
        "cover_max_dimension" => println!("{}", config.cover_max_dimension),
        "logging.level" => println!("{:?}", config.logging.level()),
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    Ok(())
}

/// Set a config value, keeping the rest of the file (comments included)
/// as it is.
pub fn set_config(key: &str, value: &str) -> Result<()> {
    let config_path = config::config_file_path();

    config::ensure_config_file()?;

    let contents = std::fs::read_to_string(&config_path).context("Failed to read config file")?;
    let updated = set_value(&contents, key, value)?;

    std::fs::write(&config_path, updated).context("Failed to write config file")?;

    println!("✓ Updated {} = {}", key, value);
    println!("  in {}", config_path.display());

    Ok(())
}

fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    let mut doc: DocumentMut = contents.parse().context("Failed to parse config file")?;

    match key {
        "database_path" => {
            doc["database_path"] = toml_edit::value(value);
        }
        "cover_max_dimension" => {
            let pixels: u32 = value
                .parse()
                .with_context(|| format!("cover_max_dimension must be a whole number, got {:?}", value))?;
            if pixels == 0 {
                anyhow::bail!("cover_max_dimension must be at least 1");
            }
            doc["cover_max_dimension"] = toml_edit::value(i64::from(pixels));
        }
        "logging.level" => {
            if !doc.contains_key("logging") {
                doc["logging"] = toml_edit::table();
            }
            doc["logging"]["level"] = toml_edit::value(value);
        }
        _ => anyhow::bail!("Unknown config key: {}\n\nValid keys: {}", key, VALID_KEYS),
    }

    Ok(doc.to_string())
}

/// Show the config file path.
pub fn show_path() -> Result<()> {
    println!("{}", config::config_file_path().display());
    Ok(())
}

/// Show example configuration.
pub fn show_example() -> Result<()> {
    print!("{}", config::example_config());
    Ok(())
}

/// Initialize config file with defaults.
pub fn init_config() -> Result<()> {
    let created = config::ensure_config_file()?;
    let config_path = config::config_file_path();

    if created {
        println!("✓ Created config file: {}", config_path.display());
        println!("\nEdit this file to configure gamelog.");
    } else {
        println!("Config file already exists: {}", config_path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_value_keeps_comments() {
        let updated = set_value(config::example_config(), "database_path", "/tmp/games.db").unwrap();

        assert!(updated.contains("# Gamelog Configuration File"));
        assert!(updated.contains("database_path = \"/tmp/games.db\""));
        assert!(updated.contains("cover_max_dimension = 400"));
    }

    #[test]
    fn test_set_value_replaces_existing_key() {
        let updated = set_value("cover_max_dimension = 400\n", "cover_max_dimension", "256").unwrap();
        assert_eq!(updated.trim(), "cover_max_dimension = 256");
    }

    #[test]
    fn test_set_value_creates_logging_table() {
        let updated = set_value("", "logging.level", "debug").unwrap();
        assert!(updated.contains("[logging]"));
        assert!(updated.contains("level = \"debug\""));
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        assert!(set_value("", "cover_max_dimension", "big").is_err());
        assert!(set_value("", "cover_max_dimension", "0").is_err());
        assert!(set_value("", "acoustid_api_key", "x").is_err());
    }
}
