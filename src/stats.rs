//! Snapshot statistics overview.
//!
//! Quick summary of what one build run produced: totals plus a per-category
//! part/document breakdown. Used by `partdex stats` to sanity-check a build
//! before serving it.

use anyhow::Result;
use std::collections::BTreeMap;
use std::path::Path;

use crate::snapshot;

/// Runs the `stats` command: load the snapshot and print a summary.
pub fn run_stats(snapshot_path: &Path) -> Result<()> {
    let snapshot = snapshot::load_or_empty(snapshot_path);

    let size = std::fs::metadata(snapshot_path).map(|m| m.len()).unwrap_or(0);

    println!("Partdex — Snapshot Stats");
    println!("========================");
    println!();
    println!("  Snapshot:    {}", snapshot_path.display());
    println!("  Size:        {}", format_bytes(size));
    println!();
    println!("  Parts:       {}", snapshot.stats.total_parts);
    println!("  Documents:   {}", snapshot.stats.total_documents);
    println!("  Categories:  {}", snapshot.stats.total_categories);

    let mut part_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for part in &snapshot.parts {
        *part_counts.entry(part.category.as_str()).or_default() += 1;
    }
    let mut doc_counts: BTreeMap<&str, usize> = BTreeMap::new();
    for doc in &snapshot.documents {
        *doc_counts.entry(doc.category.as_str()).or_default() += 1;
    }

    if !snapshot.categories.is_empty() {
        println!();
        println!("  By category:");
        println!("  {:<12} {:>8} {:>6}   {}", "CATEGORY", "PARTS", "PDFS", "NAME");
        println!("  {}", "-".repeat(64));
        for (key, name) in &snapshot.categories {
            println!(
                "  {:<12} {:>8} {:>6}   {}",
                key,
                part_counts.get(key.as_str()).copied().unwrap_or(0),
                doc_counts.get(key.as_str()).copied().unwrap_or(0),
                name
            );
        }
    }

    println!();
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
