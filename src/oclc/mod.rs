//! WorldCat record handling
//!
//! Turns WorldCat bibliographic records into IIIF metadata entries.

pub mod anomaly;
pub mod formats;
pub mod normalizer;

pub use anomaly::Anomaly;
pub use normalizer::{MetadataNormalizer, Normalized};
