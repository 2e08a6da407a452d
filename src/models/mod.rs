//! Data models for tresor-manifests

pub mod bib_record;
pub mod metadata;
pub mod shelf_entry;

// Re-export commonly used types
pub use bib_record::BibRecord;
pub use metadata::MetadataEntry;
pub use shelf_entry::{RawShelfEntry, ShelfEntry};
