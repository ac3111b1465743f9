use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default, rename = "repos-dir")]
    pub repos_dir: Option<PathBuf>,
    #[serde(rename = "repo")]
    pub repos: Vec<RepoSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RepoSpec {
    pub name: String,
    pub url: String,
    #[serde(default, rename = "base-branch")]
    pub base_branch: Option<String>,
}

/// Read and validate the repository configuration.
///
/// # Errors
/// Returns an error when the file cannot be read or parsed, or when it fails validation.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let config_text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = parse_config(&config_text).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    validate(&config)?;
    Ok(config)
}

fn parse_config(text: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(text)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.repos.is_empty() {
        return Err(invalid("at least one [[repo]] entry is required".to_string()));
    }
    let mut seen = HashSet::new();
    for repo in &config.repos {
        let name = repo.name.as_str();
        if name.trim().is_empty() {
            return Err(invalid("repo name must not be empty".to_string()));
        }
        if name.trim() != name {
            return Err(invalid(format!(
                "repo name {name:?} has leading or trailing whitespace"
            )));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(invalid(format!(
                "repo name {name} must be a single path component"
            )));
        }
        if !seen.insert(name) {
            return Err(invalid(format!("repo {name} is defined more than once")));
        }
        if repo.url.trim().is_empty() {
            return Err(invalid(format!("repo {name} has an empty url")));
        }
        if repo
            .base_branch
            .as_deref()
            .is_some_and(|b| b.trim().is_empty())
        {
            return Err(invalid(format!("repo {name} has an empty base-branch")));
        }
    }
    Ok(())
}

fn invalid(message: String) -> ConfigError {
    ConfigError::Invalid { message }
}
