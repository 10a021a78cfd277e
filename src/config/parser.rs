use crate::config::types::ExtractionConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// Files ending in `.json` are read as JSON, everything else as TOML.
///
/// # Arguments
///
/// * `path` - Path to the configuration file
///
/// # Returns
///
/// * `Ok(ExtractionConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use webscrape::config::load_config;
///
/// let config = load_config(Path::new("scrape.toml")).unwrap();
/// println!("Start URL: {}", config.url);
/// ```
pub fn load_config(path: &Path) -> Result<ExtractionConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        parse_config_json(&content)
    } else {
        parse_config_toml(&content)
    }
}

/// Parses and validates a TOML configuration
pub fn parse_config_toml(content: &str) -> Result<ExtractionConfig, ConfigError> {
    let config: ExtractionConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Parses and validates a JSON configuration
pub fn parse_config_json(content: &str) -> Result<ExtractionConfig, ConfigError> {
    let config: ExtractionConfig = serde_json::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 fingerprint of an in-memory configuration
///
/// The configuration is hashed through its canonical JSON form, so two
/// configs that differ only in file formatting share a fingerprint.
pub fn config_fingerprint(config: &ExtractionConfig) -> Result<String, ConfigError> {
    let canonical = serde_json::to_vec(config)?;
    Ok(hash_hex(&canonical))
}

/// Loads a configuration and returns both the config and its fingerprint
///
/// The fingerprint is the one `config_fingerprint` computes, so it matches
/// the key the CLI stores records under.
pub fn load_config_with_hash(path: &Path) -> Result<(ExtractionConfig, String), ConfigError> {
    let config = load_config(path)?;
    let hash = config_fingerprint(&config)?;
    Ok((config, hash))
}

fn hash_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
