//! Snapshot persistence.
//!
//! The snapshot is one JSON document with top-level keys `parts`,
//! `documents`, `categories`, and `stats`. A missing or unreadable file
//! loads as the empty snapshot so the search service degrades to "no
//! results" instead of crashing.

use anyhow::{Context, Result};
use std::path::Path;

use crate::models::Snapshot;

/// Writes the snapshot as pretty-printed JSON, creating parent directories
/// as needed.
pub fn save(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create {}", parent.display()))?;
        }
    }

    let json = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, json).with_context(|| format!("write snapshot {}", path.display()))?;
    Ok(())
}

pub fn load(path: &Path) -> Result<Snapshot> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read snapshot {}", path.display()))?;
    let snapshot: Snapshot = serde_json::from_str(&content)
        .with_context(|| format!("parse snapshot {}", path.display()))?;
    Ok(snapshot)
}

/// Loads the snapshot, falling back to an empty database when the file is
/// missing or unreadable.
pub fn load_or_empty(path: &Path) -> Snapshot {
    match load(path) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            eprintln!("warning: {:#} (treating as empty database)", err);
            Snapshot::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Origin, Part};
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();
        let mut part = Part::new("9324M60G01", "EIPC");
        part.description = "Fan Disk Bolt".to_string();
        part.chapter = "72".to_string();
        part.pdf_file = Some("/archive/data/EIPC/fig01.pdf".to_string());
        part.origin = Origin::Structured;
        snapshot.parts.push(part);
        snapshot
            .categories
            .insert("EIPC".to_string(), "Engine Illustrated Parts Catalog".to_string());
        snapshot.recompute_stats();
        snapshot
    }

    #[test]
    fn round_trip_preserves_every_field() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("data").join("partdex.json");

        let original = sample_snapshot();
        save(&path, &original).unwrap();
        let loaded = load(&path).unwrap();

        assert_eq!(loaded, original);
    }

    #[test]
    fn wire_format_top_level_keys() {
        let json = serde_json::to_value(sample_snapshot()).unwrap();
        for key in ["parts", "documents", "categories", "stats"] {
            assert!(json.get(key).is_some(), "missing top-level key {}", key);
        }
        assert_eq!(json["stats"]["total_parts"], 1);
        assert_eq!(json["stats"]["total_documents"], 0);
        assert_eq!(json["stats"]["total_categories"], 1);
    }

    #[test]
    fn missing_file_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let snapshot = load_or_empty(&tmp.path().join("nope.json"));
        assert!(snapshot.parts.is_empty());
        assert_eq!(snapshot.stats.total_parts, 0);
    }

    #[test]
    fn corrupt_file_loads_as_empty() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("partdex.json");
        std::fs::write(&path, "{not json").unwrap();
        let snapshot = load_or_empty(&path);
        assert!(snapshot.parts.is_empty());
    }
}
