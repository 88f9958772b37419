//! Settings infrastructure for embedlsp.
//!
//! This module provides support for loading and parsing settings.toml files
//! to configure which block key introduces the embedded language, what
//! language id is announced to the analysis service, and which file
//! extensions count as host documents.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tower_lsp::lsp_types::Url;

/// Root settings structure loaded from settings.toml.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    /// Embedding configuration.
    pub embed: Option<EmbedSettings>,
}

impl Settings {
    /// Resolve the effective embed settings, falling back to defaults.
    pub fn embed_or_default(self) -> EmbedSettings {
        self.embed.unwrap_or_default()
    }
}

/// Configuration of the embedded block and host format.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EmbedSettings {
    /// Key whose block scalar holds the embedded language.
    #[serde(default = "default_key")]
    pub key: String,

    /// Language id announced to the analysis service in synthetic opens.
    #[serde(default = "default_language_id")]
    pub language_id: String,

    /// File extensions treated as host documents.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for EmbedSettings {
    fn default() -> Self {
        Self {
            key: default_key(),
            language_id: default_language_id(),
            extensions: default_extensions(),
        }
    }
}

impl EmbedSettings {
    /// Whether a URI refers to a host-format document.
    ///
    /// Anything else is treated as a document purely in the embedded
    /// language and bypasses masking and gating entirely.
    pub fn is_host_document(&self, uri: &Url) -> bool {
        let path = uri.path();
        self.extensions
            .iter()
            .any(|ext| path.ends_with(&format!(".{ext}")))
    }
}

fn default_key() -> String {
    "source".to_string()
}

fn default_language_id() -> String {
    "cel".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["yaml".to_string(), "yml".to_string()]
}

/// Load settings from a settings.toml file.
///
/// Returns default settings if the file doesn't exist or can't be parsed.
pub fn load_settings(path: &Path) -> Settings {
    match std::fs::read_to_string(path) {
        Ok(content) => match toml::from_str(&content) {
            Ok(settings) => settings,
            Err(err) => {
                eprintln!("Warning: failed to parse settings.toml: {err}");
                Settings::default()
            }
        },
        Err(_) => Settings::default(),
    }
}

/// Discover settings.toml by searching up the directory tree.
///
/// Returns `(settings, settings_dir)` where `settings_dir` is the directory
/// containing the found settings.toml. If not found, returns
/// `(Settings::default(), start_dir)`.
pub fn discover_settings(start_dir: &Path) -> (Settings, PathBuf) {
    let mut current = Some(start_dir);
    while let Some(dir) = current {
        let candidate = dir.join("settings.toml");
        if candidate.is_file() {
            return (load_settings(&candidate), dir.to_path_buf());
        }
        current = dir.parent();
    }

    (Settings::default(), start_dir.to_path_buf())
}
