use std::{env, fs};
use std::path::Path;
use log::{warn, LevelFilter};
use serde::Deserialize;
use crate::errors::ConfigError;
use crate::models::location::LocationCode;

const DEFAULT_BASE_URL: &str = "https://opendata.aemet.es/opendata/api/prediccion/especifica/municipio/diaria";

#[derive(Deserialize)]
pub struct AemetParameters {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    pub api_key_file: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Deserialize)]
pub struct Files {
    pub population_file: String,
    pub favorite_file: String,
    pub icon_dir: String,
}

#[derive(Deserialize)]
pub struct General {
    #[serde(default)]
    pub default_location: LocationCode,
    pub log_path: String,
    pub log_level: LevelFilter,
    pub log_to_stdout: bool,
}

#[derive(Deserialize)]
pub struct Config {
    pub aemet: AemetParameters,
    pub files: Files,
    pub general: General,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

/// Loads the configuration file and returns a struct with all configuration items
///
/// # Arguments
///
/// * 'config_path' - path to the configuration file
pub fn load_config(config_path: &str) -> Result<Config, ConfigError> {
    if !Path::new(config_path).exists() {
        return Err(ConfigError(format!("configuration file {} not found", config_path)));
    }

    let toml = fs::read_to_string(config_path)?;
    let config: Config = toml::from_str(&toml)?;

    if config.aemet.base_url.is_empty() {
        return Err(ConfigError::from("aemet.base_url must not be empty"));
    }

    Ok(config)
}

/// Returns the AEMET OpenData API key.
///
/// The AEMET_API_KEY environment variable takes precedence over the key file. A missing
/// key is not an error at this point, AEMET will answer with 401 and the user is told so.
///
/// # Arguments
///
/// * 'aemet' - the aemet section of the configuration
pub fn load_api_key(aemet: &AemetParameters) -> String {
    if let Ok(key) = env::var("AEMET_API_KEY") {
        if !key.trim().is_empty() {
            return key.trim().to_string();
        }
    }

    match fs::read_to_string(&aemet.api_key_file) {
        Ok(key) => key.trim().to_string(),
        Err(e) => {
            warn!("API key file {} not readable ({}), it must hold an AEMET OpenData API key", aemet.api_key_file, e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, r#"
[aemet]
api_key_file = "res/api_key.txt"

[files]
population_file = "res/poblaciones.json"
favorite_file = "res/poblacion_favorita.txt"
icon_dir = "res/img"

[general]
default_location = "15030"
log_path = "meteocloud.log"
log_level = "debug"
log_to_stdout = true
"#).unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();

        assert_eq!(config.aemet.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.aemet.timeout_secs, 30);
        assert_eq!(config.general.default_location.as_str(), "15030");
        assert_eq!(config.general.log_level, LevelFilter::Debug);
        assert!(config.general.log_to_stdout);
    }

    #[test]
    fn test_load_config_rejects_bad_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, r#"
[aemet]
api_key_file = "k"

[files]
population_file = "p"
favorite_file = "f"
icon_dir = "i"

[general]
default_location = "Madrid"
log_path = "l"
log_level = "info"
log_to_stdout = false
"#).unwrap();

        assert!(load_config(path.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        assert!(load_config("/nonexistent/meteocloud.toml").is_err());
    }

    #[test]
    fn test_load_api_key_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let key_file = dir.path().join("api_key.txt");
        fs::write(&key_file, "eyJhbGciOiJIUzI1NiJ9.test\n").unwrap();

        let aemet = AemetParameters {
            base_url: default_base_url(),
            api_key_file: key_file.to_str().unwrap().to_string(),
            timeout_secs: 30,
        };

        if env::var("AEMET_API_KEY").is_err() {
            assert_eq!(load_api_key(&aemet), "eyJhbGciOiJIUzI1NiJ9.test");
        }
    }
}
