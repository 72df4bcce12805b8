//! # Partdex
//!
//! Indexes aviation technical-publication archives (XML manuals, PDF
//! documents, scanned artwork) into a flat JSON snapshot and serves
//! case-insensitive substring search over it via a CLI and a small JSON
//! HTTP API.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────┐   ┌──────────┐   ┌────────┐   ┌──────────┐
//! │ Scanner │──▶│ Extractor │──▶│ Linker │──▶│ Snapshot │
//! │ walkdir │   │ quick-xml │   │        │   │  (JSON)  │
//! └─────────┘   └──────────┘   └────────┘   └────┬─────┘
//!                                                │
//!                                ┌───────────────┤
//!                                ▼               ▼
//!                           ┌─────────┐    ┌──────────┐
//!                           │   CLI   │    │   HTTP   │
//!                           │(partdex)│    │  (axum)  │
//!                           └─────────┘    └──────────┘
//! ```
//!
//! The build side runs offline and emits one immutable snapshot; the search
//! side reloads that snapshot per request and filters it with a linear scan.
//! No inverted index, no ranking, no incremental updates.
//!
//! ## Quick Start
//!
//! ```bash
//! partdex build                       # scan the archive, write the snapshot
//! partdex search "9324M60G01"         # substring search from the CLI
//! partdex search "fan blade" --category EIPC
//! partdex stats                       # snapshot summary
//! partdex serve                       # start the HTTP API + search page
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Snapshot data types (the JSON wire contract) |
//! | [`scan`] | Directory scanning per category |
//! | [`extract`] | XML part extraction |
//! | [`sbindex`] | Delimited service bulletin index reader |
//! | [`link`] | Filename-heuristic PDF/image linking |
//! | [`ingest`] | Snapshot build orchestration |
//! | [`snapshot`] | Snapshot persistence |
//! | [`search`] | Substring search and action derivation |
//! | [`stats`] | Snapshot statistics summary |
//! | [`server`] | JSON HTTP API |

pub mod config;
pub mod extract;
pub mod ingest;
pub mod link;
pub mod models;
pub mod sbindex;
pub mod scan;
pub mod search;
pub mod server;
pub mod snapshot;
pub mod stats;
