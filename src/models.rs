//! Core data models for the part index.
//!
//! These types define the persisted snapshot format, which is the wire
//! contract between the offline builder (`partdex build`) and the online
//! search service. Field names are load-bearing: the JSON keys `parts`,
//! `documents`, `categories`, `stats`, `total_parts`, `total_documents`,
//! and `total_categories` must not change.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Which extraction pass produced a part record.
///
/// Structured extraction reads part-bearing XML elements; the text scan is a
/// permissive regex pass over all text content (high recall, low precision);
/// the SB index pass reads the delimited service bulletin index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    Structured,
    TextScan,
    SbIndex,
}

impl Default for Origin {
    fn default() -> Self {
        Origin::Structured
    }
}

/// How confident the linker was when attaching a PDF to a part.
///
/// `Category` means "some PDF in the same category directory" — a known-weak
/// fallback that is surfaced to callers rather than presented as authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkQuality {
    Exact,
    Prefix,
    Category,
    None,
}

impl Default for LinkQuality {
    fn default() -> Self {
        LinkQuality::None
    }
}

/// One extracted part-number-and-metadata entry tied to a source document.
///
/// Created once during extraction and never mutated. The file fields are weak
/// references: stored paths whose existence is checked at use time, not at
/// record-creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    pub part_number: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub chapter: String,
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub unit: String,
    #[serde(default)]
    pub figure: String,
    pub category: String,
    #[serde(default)]
    pub document_title: String,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub image_file: Option<String>,
    #[serde(default)]
    pub source_file: Option<String>,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub link_quality: LinkQuality,
}

impl Part {
    /// An empty record for the given category; extraction passes fill in
    /// whichever fields they produce.
    pub fn new(part_number: impl Into<String>, category: impl Into<String>) -> Self {
        Part {
            part_number: part_number.into(),
            description: String::new(),
            chapter: String::new(),
            section: String::new(),
            unit: String::new(),
            figure: String::new(),
            category: category.into(),
            document_title: String::new(),
            pdf_file: None,
            image_file: None,
            source_file: None,
            origin: Origin::Structured,
            link_quality: LinkQuality::None,
        }
    }
}

/// A PDF document discovered in the archive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub name: String,
    pub path: String,
    pub category: String,
    pub category_name: String,
    pub size_mb: f64,
}

/// Derived counts; always recomputed from the list lengths at build time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub total_parts: usize,
    pub total_documents: usize,
    pub total_categories: usize,
}

/// The complete, immutable aggregate produced by one build run.
///
/// The search service treats a loaded snapshot as read-only input; there is
/// no shared mutable state across requests.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub parts: Vec<Part>,
    pub documents: Vec<DocumentRecord>,
    pub categories: BTreeMap<String, String>,
    pub stats: Stats,
}

impl Snapshot {
    /// Recomputes `stats` from the current list lengths.
    pub fn recompute_stats(&mut self) {
        self.stats = Stats {
            total_parts: self.parts.len(),
            total_documents: self.documents.len(),
            total_categories: self.categories.len(),
        };
    }
}

/// An action link attached to a search match (serialized key is `class`
/// because the front end uses it as a CSS class).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub text: String,
    pub url: String,
    #[serde(rename = "class")]
    pub style: String,
}

/// One search result row, serializable to a flat key/value structure with
/// string fields plus the `actions` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    pub document_title: String,
    pub part_number: String,
    pub description: String,
    pub details: String,
    pub category: String,
    pub actions: Vec<Action>,
}
