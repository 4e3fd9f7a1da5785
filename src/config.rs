use crate::{parse::LoadOptions, proof::IndentStyle, strings};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;

const DEFAULT_TAB_SIZE: usize = 2;

/// Search for fitch.toml starting from the current directory and moving up the directory tree
pub fn find_config_file() -> Result<PathBuf, ConfigError> {
    let current_dir =
        env::current_dir().map_err(|e| ConfigError::IoError(PathBuf::from("."), e))?;

    let start_dir = current_dir
        .canonicalize()
        .map_err(|e| ConfigError::IoError(current_dir.to_path_buf(), e))?;

    let mut current = start_dir.as_path();

    loop {
        let candidate = current.join(strings::CONFIG_FILE_NAME.as_str());
        if candidate.exists() {
            return Ok(candidate);
        }

        current = match current.parent() {
            Some(parent) => parent,
            None => return Err(ConfigError::NotFound),
        };
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FitchConfig {
    tab_size: usize,
    indent: IndentKind,
}

impl Default for FitchConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            indent: IndentKind::Spaces,
        }
    }
}

impl FitchConfig {
    /// Use the given file if any, otherwise look for one. A missing file means defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match find_config_file() {
                Ok(path) => Self::from_file(&path),
                Err(ConfigError::NotFound) => Ok(Self::default()),
                Err(e) => Err(e),
            },
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            fs::read_to_string(path).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Self::from_toml(&contents).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e))
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        let file: FitchConfigFile = toml::from_str(contents)?;
        let defaults = Self::default();

        Ok(Self {
            tab_size: file
                .load
                .and_then(|l| l.tab_size)
                .filter(|&n| n > 0)
                .unwrap_or(defaults.tab_size),
            indent: file.format.and_then(|f| f.indent).unwrap_or(defaults.indent),
        })
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    pub fn load_options(&self) -> LoadOptions {
        LoadOptions::new(self.tab_size)
    }

    pub fn indent_style(&self) -> IndentStyle {
        match self.indent {
            IndentKind::Spaces => IndentStyle::Spaces(self.tab_size),
            IndentKind::Bars => IndentStyle::Bars,
        }
    }

    pub fn with_bars(mut self) -> Self {
        self.indent = IndentKind::Bars;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum IndentKind {
    Spaces,
    Bars,
}

#[derive(Debug, Deserialize)]
struct FitchConfigFile {
    load: Option<LoadSection>,
    format: Option<FormatSection>,
}

#[derive(Debug, Deserialize)]
struct LoadSection {
    tab_size: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct FormatSection {
    indent: Option<IndentKind>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no fitch.toml found")]
    NotFound,
    #[error("could not read {}: {1}", .0.display())]
    IoError(PathBuf, std::io::Error),
    #[error("could not parse {}: {1}", .0.display())]
    ParseError(PathBuf, toml::de::Error),
}
