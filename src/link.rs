//! Filename-heuristic document linking.
//!
//! Each XML file gets a best-guess PDF counterpart: an exact basename match,
//! then a basename-prefix match, then any PDF in the same category. The last
//! step is a known precision limitation — it mislinks when a category holds
//! several unrelated PDFs — so every link carries a [`LinkQuality`] and the
//! category fallback is surfaced to consumers as a best-effort match rather
//! than presented as authoritative.

use std::path::{Path, PathBuf};

use crate::models::LinkQuality;

/// Finds the most plausible PDF counterpart for an XML file among the PDFs
/// of its category. Returns `None` (never an error) when nothing is found.
pub fn link_pdf(xml_path: &Path, category_pdfs: &[PathBuf]) -> Option<(PathBuf, LinkQuality)> {
    let stem = xml_path.file_stem()?.to_string_lossy();

    if let Some(exact) = category_pdfs
        .iter()
        .find(|p| p.file_stem().map(|s| s.to_string_lossy() == stem) == Some(true))
    {
        return Some((exact.clone(), LinkQuality::Exact));
    }

    if let Some(prefixed) = category_pdfs.iter().find(|p| {
        p.file_stem()
            .map(|s| s.to_string_lossy().starts_with(stem.as_ref()))
            == Some(true)
    }) {
        return Some((prefixed.clone(), LinkQuality::Prefix));
    }

    category_pdfs
        .first()
        .map(|any| (any.clone(), LinkQuality::Category))
}

/// Finds a related image: the first image in the category's art directory,
/// else the first image anywhere in the archive. Even looser than the PDF
/// heuristic, by design.
pub fn link_image(category_images: &[PathBuf], archive_images: &[PathBuf]) -> Option<PathBuf> {
    category_images
        .first()
        .or_else(|| archive_images.first())
        .cloned()
}
