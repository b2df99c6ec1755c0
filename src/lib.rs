//! Chunkpot - per-chunk translation extraction for Vite-built WordPress projects
//!
//! Chunkpot is a CLI tool and library that statically extracts WordPress-style
//! translation calls (`__`, `_x`, `_n`, `_nx`) from the TypeScript/JavaScript
//! sources of Vite projects and maps each entry point's translations to the
//! output chunk recorded in the Vite build manifest, so a downstream step can
//! emit per-chunk translation catalogs for `.pot` generation.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (argument parsing, commands)
//! - `config`: Project configuration file loading and parsing
//! - `core`: Core extraction pipeline (discovery, collection, extraction,
//!   manifest mapping)
//! - `report`: Output assembly and domain filtering
//! - `utils`: Shared path utilities

pub mod cli;
pub mod config;
pub mod core;
pub mod report;
pub mod utils;
