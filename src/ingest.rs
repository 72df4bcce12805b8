//! Snapshot build orchestration.
//!
//! Coordinates the full pipeline: scan → extract → link → aggregate.
//! Deterministic given identical filesystem state; file enumeration order
//! is not promised to consumers.

use anyhow::Result;

use crate::config::Config;
use crate::extract::{self, ExtractOptions};
use crate::link;
use crate::models::{DocumentRecord, LinkQuality, Snapshot};
use crate::sbindex;
use crate::scan;
use crate::snapshot;

/// Builds one immutable snapshot from the configured archive. Stats are
/// recomputed from the accumulated lists, never hardcoded.
pub fn build_snapshot(config: &Config) -> Result<Snapshot> {
    let options = ExtractOptions {
        text_scan: config.extraction.text_scan,
    };

    let archive_art = scan::scan_tree(&config.archive.art_root);

    let mut result = Snapshot {
        categories: config.categories.clone(),
        ..Snapshot::default()
    };

    for (cat_key, cat_name) in &config.categories {
        let files = scan::scan_category(&config.archive.data_root, cat_key);
        let art = scan::scan_category(&config.archive.art_root, cat_key);
        println!(
            "{} ({}): {} xml, {} pdf, {} images",
            cat_name,
            cat_key,
            files.xml.len(),
            files.pdf.len(),
            art.image.len()
        );

        for xml_path in &files.xml {
            let mut parts = extract::extract_parts(xml_path, cat_key, &options);

            let linked_pdf = link::link_pdf(xml_path, &files.pdf);
            let linked_image = link::link_image(&art.image, &archive_art.image);

            for part in &mut parts {
                if let Some((pdf, quality)) = &linked_pdf {
                    part.pdf_file = Some(pdf.to_string_lossy().into_owned());
                    part.link_quality = *quality;
                } else {
                    part.link_quality = LinkQuality::None;
                }
                // Inline image references from the XML win over the linked
                // archive image.
                if part.image_file.is_none() {
                    part.image_file = linked_image
                        .as_ref()
                        .map(|p| p.to_string_lossy().into_owned());
                }
            }

            result.parts.extend(parts);
        }

        for pdf_path in &files.pdf {
            let size = std::fs::metadata(pdf_path).map(|m| m.len()).unwrap_or(0);
            result.documents.push(DocumentRecord {
                name: pdf_path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                path: pdf_path.to_string_lossy().into_owned(),
                category: cat_key.clone(),
                category_name: cat_name.clone(),
                size_mb: round2(size as f64 / (1024.0 * 1024.0)),
            });
        }
    }

    if let Some(index_path) = &config.extraction.sb_index {
        let bulletins = sbindex::read_index(index_path, "SB");
        println!("SB index: {} bulletins", bulletins.len());
        result.parts.extend(bulletins);
    }

    result.recompute_stats();
    Ok(result)
}

/// Runs the `build` command: build the snapshot and persist it.
pub fn run_build(config: &Config) -> Result<()> {
    let snapshot = build_snapshot(config)?;
    snapshot::save(&config.snapshot.path, &snapshot)?;

    println!();
    println!("snapshot written to {}", config.snapshot.path.display());
    println!("  parts: {}", snapshot.stats.total_parts);
    println!("  documents: {}", snapshot.stats.total_documents);
    println!("  categories: {}", snapshot.stats.total_categories);
    println!("ok");

    Ok(())
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
