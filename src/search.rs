//! Substring search over the snapshot.
//!
//! A full linear scan: a part matches when the category filter passes and
//! the lowercased query is a substring of its part number, description, or
//! document title. No index structure and no ranking — results preserve
//! snapshot order. O(parts × field length) per query, acceptable at the
//! tens of thousands of records these archives produce.

use anyhow::Result;
use std::path::Path;

use crate::models::{Action, LinkQuality, Part, SearchMatch, Snapshot};
use crate::snapshot;

/// Queries shorter than this (after trimming) return an empty result set.
/// Bounds scan cost and avoids trivially massive result sets.
pub const MIN_QUERY_LEN: usize = 2;

/// The category value meaning "no filter".
pub const ALL_CATEGORIES: &str = "all";

/// Runs a search against an in-memory snapshot.
pub fn search_parts(snapshot: &Snapshot, query: &str, category: &str) -> Vec<SearchMatch> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    snapshot
        .parts
        .iter()
        .filter(|part| category == ALL_CATEGORIES || part.category == category)
        .filter(|part| {
            part.part_number.to_lowercase().contains(&needle)
                || part.description.to_lowercase().contains(&needle)
                || part.document_title.to_lowercase().contains(&needle)
        })
        .map(to_match)
        .collect()
}

fn to_match(part: &Part) -> SearchMatch {
    SearchMatch {
        document_title: part.document_title.clone(),
        part_number: part.part_number.clone(),
        description: part.description.clone(),
        details: format!(
            "Category: {} | Chapter: {}-{}-{} | Figure: {}",
            part.category, part.chapter, part.section, part.unit, part.figure
        ),
        category: part.category.clone(),
        actions: part_actions(part),
    }
}

/// Derives action links in fixed priority: PDF, then image, then source XML.
/// Category-fallback PDF links are labelled as best-effort matches.
fn part_actions(part: &Part) -> Vec<Action> {
    let mut actions = Vec::new();

    if let Some(pdf) = &part.pdf_file {
        let text = if part.link_quality == LinkQuality::Category {
            "View PDF Document (best match)"
        } else {
            "View PDF Document"
        };
        actions.push(action(text, pdf, "pdf"));
    }
    if let Some(image) = &part.image_file {
        actions.push(action("View Image", image, "image"));
    }
    if let Some(source) = &part.source_file {
        actions.push(action("View Source XML", source, "xml"));
    }

    actions
}

fn action(text: &str, path: &str, style: &str) -> Action {
    Action {
        text: text.to_string(),
        url: format!("/api/file?path={}", urlencoding::encode(path)),
        style: style.to_string(),
    }
}

/// Runs the `search` command: load the snapshot and print matches.
pub fn run_search(snapshot_path: &Path, query: &str, category: &str) -> Result<()> {
    let snapshot = snapshot::load_or_empty(snapshot_path);
    let results = search_parts(&snapshot, query, category);

    if results.is_empty() {
        println!("No results.");
        return Ok(());
    }

    for (i, result) in results.iter().enumerate() {
        println!("{}. {} / {}", i + 1, result.part_number, result.document_title);
        if !result.description.is_empty() {
            println!("    {}", result.description);
        }
        println!("    {}", result.details);
        for action in &result.actions {
            println!("    [{}] {}", action.style, action.url);
        }
        println!();
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Part;

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::default();

        let mut bolt = Part::new("9324M60G01", "EIPC");
        bolt.description = "Fan Disk Bolt".to_string();
        bolt.document_title = "Engine Illustrated Parts Catalog".to_string();
        bolt.pdf_file = Some("/archive/data/EIPC/fig01.pdf".to_string());
        bolt.image_file = Some("/archive/art/EIPC/g7221.tif".to_string());
        bolt.source_file = Some("/archive/data/EIPC/fig01.xml".to_string());
        bolt.link_quality = LinkQuality::Exact;
        snapshot.parts.push(bolt);

        let mut seal = Part::new("335-006-114-0", "ESM");
        seal.description = "Stage 1 Seal".to_string();
        seal.document_title = "Engine Shop Manual".to_string();
        snapshot.parts.push(seal);

        snapshot.recompute_stats();
        snapshot
    }

    #[test]
    fn short_queries_return_nothing() {
        let snapshot = sample_snapshot();
        assert!(search_parts(&snapshot, "", "all").is_empty());
        assert!(search_parts(&snapshot, "9", "all").is_empty());
        assert!(search_parts(&snapshot, "  9  ", "all").is_empty());
    }

    #[test]
    fn exact_part_number_hit() {
        let snapshot = sample_snapshot();
        let results = search_parts(&snapshot, "9324M60G01", "all");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].part_number, "9324M60G01");
    }

    #[test]
    fn matching_is_case_insensitive_across_fields() {
        let snapshot = sample_snapshot();
        assert_eq!(search_parts(&snapshot, "fan disk", "all").len(), 1);
        assert_eq!(search_parts(&snapshot, "SHOP MANUAL", "all").len(), 1);
        assert_eq!(search_parts(&snapshot, "9324m60", "all").len(), 1);
    }

    #[test]
    fn every_match_contains_the_query() {
        let snapshot = sample_snapshot();
        let query = "engine";
        for result in search_parts(&snapshot, query, "all") {
            let hit = result.part_number.to_lowercase().contains(query)
                || result.description.to_lowercase().contains(query)
                || result.document_title.to_lowercase().contains(query);
            assert!(hit, "match does not contain query: {:?}", result);
        }
    }

    #[test]
    fn category_filter_is_sound() {
        let snapshot = sample_snapshot();
        let results = search_parts(&snapshot, "engine", "ESM");
        assert!(!results.is_empty());
        assert!(results.iter().all(|r| r.category == "ESM"));
    }

    #[test]
    fn nonexistent_query_returns_empty() {
        let snapshot = sample_snapshot();
        assert!(search_parts(&snapshot, "zz-nonexistent-zz", "all").is_empty());
    }

    #[test]
    fn actions_follow_pdf_image_source_priority() {
        let snapshot = sample_snapshot();
        let results = search_parts(&snapshot, "9324M60G01", "all");
        let styles: Vec<&str> = results[0].actions.iter().map(|a| a.style.as_str()).collect();
        assert_eq!(styles, vec!["pdf", "image", "xml"]);
        assert_eq!(results[0].actions[0].text, "View PDF Document");
        assert!(results[0].actions[0]
            .url
            .starts_with("/api/file?path=%2Farchive"));
    }

    #[test]
    fn category_fallback_link_is_labelled_best_match() {
        let mut snapshot = sample_snapshot();
        snapshot.parts[0].link_quality = LinkQuality::Category;
        let results = search_parts(&snapshot, "9324M60G01", "all");
        assert_eq!(results[0].actions[0].text, "View PDF Document (best match)");
    }

    #[test]
    fn part_without_references_has_empty_actions() {
        let snapshot = sample_snapshot();
        let results = search_parts(&snapshot, "335-006-114-0", "all");
        assert_eq!(results.len(), 1);
        assert!(results[0].actions.is_empty());
    }

    #[test]
    fn results_preserve_snapshot_order() {
        let mut snapshot = Snapshot::default();
        for i in 0..5 {
            let mut part = Part::new(format!("PART-{:02}", i), "EIPC");
            part.description = "washer".to_string();
            snapshot.parts.push(part);
        }
        let results = search_parts(&snapshot, "washer", "all");
        let numbers: Vec<&str> = results.iter().map(|r| r.part_number.as_str()).collect();
        assert_eq!(
            numbers,
            vec!["PART-00", "PART-01", "PART-02", "PART-03", "PART-04"]
        );
    }
}
