use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub attributes: AttributeConfig,
    pub headers: HeaderConfig,
    pub snippets: SnippetConfig,
    pub replay: ReplayConfig,
}

/// DOM attribute names read from openers and their forms.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AttributeConfig {
    pub modal: String,
    pub abort: String,
    pub prevent_redraw: String,
    pub history: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            modal: "data-naja-modal".to_string(),
            abort: "data-naja-abort".to_string(),
            prevent_redraw: "data-naja-modal-prevent-redraw".to_string(),
            history: "data-naja-history".to_string(),
        }
    }
}

impl AttributeConfig {
    /// Name of a per-open option attribute, e.g. `data-naja-modal-size`.
    pub fn modal_option(&self, suffix: &str) -> String {
        format!("{}-{suffix}", self.modal)
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HeaderConfig {
    pub modal_opened: String,
    pub prevent_redraw: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            modal_opened: "Pd-Modal-Opened".to_string(),
            prevent_redraw: "Pd-Modal-Prevent-Redraw".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SnippetConfig {
    pub id_prefix: String,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            id_prefix: "snippet-".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReplayConfig {
    pub max_ticks: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { max_ticks: 256 }
    }
}

impl Config {
    pub fn load() -> AppResult<Self> {
        let Some(path) = default_config_path() else {
            return Ok(Self::default());
        };
        Self::load_from_path(path)
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        if !path.is_file() {
            return Err(AppError::invalid_argument(format!(
                "config path is not a regular file: {}",
                path.display()
            )));
        }

        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(source, format!("failed to read config: {}", path.display()))
        })?;
        Self::from_toml(&raw).map_err(|err| {
            AppError::invalid_argument(format!("failed to parse config {}: {err}", path.display()))
        })
    }

    pub fn from_toml(raw: &str) -> AppResult<Self> {
        let parsed = toml::from_str::<Self>(raw)
            .map_err(|source| AppError::invalid_argument(source.to_string()))?;
        Ok(parsed.sanitized())
    }

    fn sanitized(mut self) -> Self {
        let attributes = AttributeConfig::default();
        fill_if_blank(&mut self.attributes.modal, attributes.modal);
        fill_if_blank(&mut self.attributes.abort, attributes.abort);
        fill_if_blank(&mut self.attributes.prevent_redraw, attributes.prevent_redraw);
        fill_if_blank(&mut self.attributes.history, attributes.history);

        let headers = HeaderConfig::default();
        fill_if_blank(&mut self.headers.modal_opened, headers.modal_opened);
        fill_if_blank(&mut self.headers.prevent_redraw, headers.prevent_redraw);

        fill_if_blank(
            &mut self.snippets.id_prefix,
            SnippetConfig::default().id_prefix,
        );
        self.replay.max_ticks = self.replay.max_ticks.max(1);
        self
    }
}

fn fill_if_blank(value: &mut String, fallback: String) {
    if value.trim().is_empty() {
        *value = fallback;
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    if let Some(explicit) = std::env::var_os("MHX_CONFIG_PATH")
        && !explicit.is_empty()
    {
        return Some(PathBuf::from(explicit));
    }

    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME")
        && !xdg.is_empty()
    {
        return Some(PathBuf::from(xdg).join("mhx").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME")
        && !home.is_empty()
    {
        return Some(
            PathBuf::from(home)
                .join(".config")
                .join("mhx")
                .join("config.toml"),
        );
    }
    if let Some(appdata) = std::env::var_os("APPDATA")
        && !appdata.is_empty()
    {
        return Some(PathBuf::from(appdata).join("mhx").join("config.toml"));
    }
    None
}
