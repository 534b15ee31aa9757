use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use contact_model::{is_valid_tag_name, normalize_tag_name, DEFAULT_TAGS};
use serde::Deserialize;

pub const DEFAULT_CONFIG_FILE: &str = "contact-finder.toml";
pub const DATA_FILE_ENV: &str = "CONTACT_FINDER_DATA";
pub const DEFAULT_DATA_FILE: &str = "data/contacts.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_file: Option<PathBuf>,
    /// Registry contents for a data file that does not exist yet.
    pub seed_tags: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_file: None,
            seed_tags: DEFAULT_TAGS.iter().map(ToString::to_string).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    #[serde(default)]
    data_file: Option<PathBuf>,
    #[serde(default)]
    seed_tags: Option<Vec<String>>,
}

impl AppConfig {
    /// Read `explicit` if given (it must exist), otherwise `contact-finder.toml`
    /// in the working directory if present, otherwise defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let text = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config =
            Self::parse(&text).with_context(|| format!("Invalid config {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let raw: RawConfig = toml::from_str(text)?;
        let defaults = Self::default();

        let seed_tags = match raw.seed_tags {
            Some(tags) => {
                let invalid: Vec<&str> = tags
                    .iter()
                    .filter(|tag| !is_valid_tag_name(&normalize_tag_name(tag)))
                    .map(String::as_str)
                    .collect();
                if !invalid.is_empty() {
                    return Err(anyhow!(
                        "seed_tags must be alphanumeric, got: {}",
                        invalid.join(", ")
                    ));
                }
                tags
            }
            None => defaults.seed_tags,
        };

        Ok(Self {
            data_file: raw.data_file,
            seed_tags,
        })
    }

    /// `--data-file` (or its env var) wins over the config file, which wins
    /// over the built-in default.
    pub fn resolve_data_file(&self, flag: Option<PathBuf>) -> PathBuf {
        flag.or_else(|| self.data_file.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_FILE))
    }
}
