use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Image extensions recognized by the scanner. The archives are mostly TIFF
/// artwork with the occasional raster export.
pub const IMAGE_EXTENSIONS: &[&str] = &["tif", "tiff", "png", "jpg", "jpeg", "gif"];

/// Files of interest found beneath one directory tree, classified by kind.
#[derive(Debug, Default)]
pub struct CategoryFiles {
    pub xml: Vec<PathBuf>,
    pub pdf: Vec<PathBuf>,
    pub image: Vec<PathBuf>,
}

impl CategoryFiles {
    pub fn is_empty(&self) -> bool {
        self.xml.is_empty() && self.pdf.is_empty() && self.image.is_empty()
    }
}

/// Enumerates XML/PDF/image files for one category under `data_root`.
///
/// A missing category directory yields zero files, not an error.
pub fn scan_category(data_root: &Path, category: &str) -> CategoryFiles {
    scan_tree(&data_root.join(category))
}

/// Walks `root` recursively and collects files of interest.
///
/// Lists are sorted so a single run is deterministic; callers must not rely
/// on the order for correctness (filesystem enumeration order is not stable
/// across platforms).
pub fn scan_tree(root: &Path) -> CategoryFiles {
    let mut files = CategoryFiles::default();
    if !root.exists() {
        return files;
    }

    for entry in WalkDir::new(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                eprintln!(
                    "warning: skipping unreadable entry under {}: {}",
                    root.display(),
                    err
                );
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.into_path();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "xml" => files.xml.push(path),
            "pdf" => files.pdf.push(path),
            e if IMAGE_EXTENSIONS.contains(&e) => files.image.push(path),
            _ => {}
        }
    }

    files.xml.sort();
    files.pdf.sort();
    files.image.sort();

    files
}
