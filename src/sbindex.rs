//! Service bulletin index reader.
//!
//! The SB archive ships a semicolon-delimited index file (one bulletin per
//! row) that predates the XML data and is typically Windows-1252 encoded.
//! Rows become low-confidence part records namespaced with
//! `origin = "sb_index"`.

use std::path::Path;

use crate::models::{Origin, Part};

/// Row layout of the delimited index: reference code, issue date, title.
const FIELD_REFERENCE: usize = 0;
const FIELD_DATE: usize = 3;
const FIELD_TITLE: usize = 6;
const MIN_FIELDS: usize = 7;

/// Reads the delimited service bulletin index. A missing or undecodable file
/// yields zero records with a warning; this source is auxiliary and must not
/// fail the build.
pub fn read_index(path: &Path, category: &str) -> Vec<Part> {
    let bytes = match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            eprintln!(
                "warning: service bulletin index unavailable at {}: {}",
                path.display(),
                err
            );
            return Vec::new();
        }
    };

    let content = match decode(&bytes) {
        Some(content) => content,
        None => {
            eprintln!(
                "warning: could not decode service bulletin index {}",
                path.display()
            );
            return Vec::new();
        }
    };

    let source = path.to_string_lossy().into_owned();
    let mut parts = Vec::new();

    for line in content.lines() {
        let fields: Vec<&str> = line.split(';').collect();
        if fields.len() < MIN_FIELDS {
            continue;
        }

        let reference = fields[FIELD_REFERENCE].trim();
        let title = fields[FIELD_TITLE].trim();
        if reference.is_empty() || title.is_empty() {
            continue;
        }

        let date = fields[FIELD_DATE].trim();
        let mut part = Part::new(reference, category);
        part.description = if date.is_empty() {
            title.to_string()
        } else {
            format!("{} ({})", title, date)
        };
        part.document_title = title.to_string();
        part.source_file = Some(source.clone());
        part.origin = Origin::SbIndex;
        parts.push(part);
    }

    parts
}

/// UTF-8 first, then Windows-1252 (the index files predate Unicode tooling).
fn decode(bytes: &[u8]) -> Option<String> {
    if let Ok(text) = std::str::from_utf8(bytes) {
        return Some(text.to_string());
    }
    let (text, _, had_errors) = encoding_rs::WINDOWS_1252.decode(bytes);
    if had_errors {
        None
    } else {
        Some(text.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn parses_well_formed_rows() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sbindex.csv");
        fs::write(
            &path,
            "SB72-0123;x;x;2003-05-12;x;x;Fan Blade Inspection\nshort;row\n",
        )
        .unwrap();

        let parts = read_index(&path, "SB");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].part_number, "SB72-0123");
        assert_eq!(
            parts[0].description,
            "Fan Blade Inspection (2003-05-12)"
        );
        assert_eq!(parts[0].category, "SB");
        assert_eq!(parts[0].origin, Origin::SbIndex);
    }

    #[test]
    fn decodes_windows_1252_fallback() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("sbindex.csv");
        // 0xE9 is 'é' in Windows-1252 and invalid standalone UTF-8.
        let mut row = b"SB72-0456;x;x;;x;x;Inspection d".to_vec();
        row.push(0xE9);
        row.extend_from_slice(b"taill");
        row.push(0xE9);
        row.push(b'e');
        fs::write(&path, row).unwrap();

        let parts = read_index(&path, "SB");
        assert_eq!(parts.len(), 1);
        assert_eq!(parts[0].description, "Inspection détaillée");
    }

    #[test]
    fn missing_file_yields_zero_records() {
        let parts = read_index(Path::new("/nonexistent/sbindex.csv"), "SB");
        assert!(parts.is_empty());
    }
}
