use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub snapshot: SnapshotConfig,
    pub archive: ArchiveConfig,
    #[serde(default)]
    pub extraction: ExtractionConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default = "default_categories")]
    pub categories: BTreeMap<String, String>,
}

/// Location of the persisted snapshot. A single explicit path, resolved once
/// at startup — there is no working-directory fallback guessing.
#[derive(Debug, Deserialize, Clone)]
pub struct SnapshotConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ArchiveConfig {
    /// Root of the document archive; XML and PDF files live under
    /// `data_root/<CATEGORY>/...`.
    pub data_root: PathBuf,
    /// Root of the image artwork archive, laid out per category like
    /// `data_root`.
    pub art_root: PathBuf,
    /// Containment root for the file-serving endpoint. When unset, only
    /// files under `data_root` or `art_root` are served.
    #[serde(default)]
    pub serve_root: Option<PathBuf>,
}

impl ArchiveConfig {
    /// Directories the file-serving endpoint is allowed to read from.
    pub fn serve_roots(&self) -> Vec<PathBuf> {
        match &self.serve_root {
            Some(root) => vec![root.clone()],
            None => vec![self.data_root.clone(), self.art_root.clone()],
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExtractionConfig {
    /// Enables the permissive text-scan pass. Disable to keep only
    /// high-confidence structured records in the snapshot.
    #[serde(default = "default_text_scan")]
    pub text_scan: bool,
    /// Optional semicolon-delimited service bulletin index file.
    #[serde(default)]
    pub sb_index: Option<PathBuf>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            text_scan: default_text_scan(),
            sb_index: None,
        }
    }
}

fn default_text_scan() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8600".to_string()
}

/// The standard engine-manual document classes. Static configuration, not
/// derived from data; overridable via `[categories]`.
fn default_categories() -> BTreeMap<String, String> {
    [
        ("EIPC", "Engine Illustrated Parts Catalog"),
        ("ESM", "Engine Shop Manual"),
        ("SB", "Service Bulletins"),
        ("CMM", "Component Maintenance Manual"),
        ("CPM", "Component Parts Manual"),
        ("ITEM", "Item Documentation"),
        ("NDTM", "Non-Destructive Testing Manual"),
        ("LLP", "Life Limited Parts"),
        ("SOLUTIONS", "Technical Solutions"),
        ("SPM", "Special Procedures Manual"),
        ("TSP", "Technical Service Publications"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    if config.categories.is_empty() {
        anyhow::bail!("[categories] must contain at least one entry");
    }

    if config.server.bind.trim().is_empty() {
        anyhow::bail!("server.bind must not be empty");
    }

    if config.snapshot.path.as_os_str().is_empty() {
        anyhow::bail!("snapshot.path must not be empty");
    }

    Ok(config)
}
