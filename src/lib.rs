//! Tresor manifests
//!
//! Builds IIIF Presentation manifests for the shelf items of a mapping file,
//! combining DLCS skeleton manifests with WorldCat bibliographic metadata.

pub mod audit;
pub mod config;
pub mod error;
pub mod models;
pub mod oclc;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};
