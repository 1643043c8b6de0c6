//! TOML configuration.
//!
//! Read from `<config dir>/flashcards-cli-rs/config.toml` when present; every
//! key is optional. Command line flags are applied on top by `main`.
use crate::narration::google::DEFAULT_ENDPOINT;
use crate::store::DEFAULT_CARDS_FILE;
use anyhow::{Context, Result};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrationConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// program and leading arguments; the audio file path is appended
    #[serde(default = "default_player")]
    pub player: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_cards_file")]
    pub cards_file: PathBuf,
    /// fixed practice shuffle, mostly for reproducing a session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default)]
    pub narration: NarrationConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_true() -> bool {
    true
}
fn default_language() -> String {
    "en".into()
}
fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.into()
}
fn default_player() -> Vec<String> {
    vec!["mpg123".into(), "-q".into()]
}
fn default_addr() -> String {
    "127.0.0.1:3333".into()
}
fn default_cards_file() -> PathBuf {
    PathBuf::from(DEFAULT_CARDS_FILE)
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            language: default_language(),
            endpoint: default_endpoint(),
            player: default_player(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cards_file: default_cards_file(),
            seed: None,
            narration: NarrationConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Largest seed a TOML file can hold; TOML integers are signed 64-bit.
pub const MAX_SEED: u64 = i64::MAX as u64;

pub fn get_config_path() -> Result<PathBuf> {
    let mut path = config_dir().with_context(|| "Couldn't find config directory")?;
    path.push("flashcards-cli-rs");
    path.push("config.toml");
    Ok(path)
}

impl Config {
    /// Defaults when the file does not exist; a file that exists but does not
    /// parse is an error.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::debug!("no config at {:?}, using defaults", path);
                return Ok(Self::default());
            }
            Err(e) => return Err(e).with_context(|| format!("Failed to read {:?}", path)),
        };
        toml::from_str(&contents).with_context(|| format!("Failed to parse config {:?}", path))
    }

    pub fn to_toml(&self) -> Result<String> {
        if let Some(seed) = self.seed.filter(|&seed| seed > MAX_SEED) {
            anyhow::bail!("seed {seed} is larger than {MAX_SEED}");
        }
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.cards_file, PathBuf::from("flashcards.json"));
        assert!(config.narration.enabled);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
seed = 7

[narration]
language = "fr"
player = ["ffplay", "-nodisp", "-autoexit"]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.narration.language, "fr");
        assert_eq!(config.narration.player[0], "ffplay");
        assert!(config.narration.enabled);
        assert_eq!(config.narration.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.server.addr, "127.0.0.1:3333");
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seed = \"seven\"").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn printed_config_reloads() {
        let config = Config {
            seed: Some(3),
            ..Config::default()
        };
        let printed = config.to_toml().unwrap();
        assert_eq!(toml::from_str::<Config>(&printed).unwrap(), config);
    }

    #[test]
    fn largest_seed_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = Config {
            seed: Some(MAX_SEED),
            ..Config::default()
        };
        fs::write(&path, config.to_toml().unwrap()).unwrap();
        assert_eq!(Config::load(&path).unwrap().seed, Some(MAX_SEED));
    }

    #[test]
    fn oversized_seed_is_reported() {
        let config = Config {
            seed: Some(MAX_SEED + 1),
            ..Config::default()
        };
        let err = config.to_toml().unwrap_err();
        assert!(err.to_string().contains("larger than"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "seed = -1").unwrap();
        assert!(Config::load(&path).is_err());
    }
}
