//! Collaborators and the manifest pipeline

pub mod cache;
pub mod dlcs;
pub mod input;
pub mod manifests;
pub mod worldcat;

use crate::{config::AppConfig, error::AppResult, oclc::MetadataNormalizer};

/// Pipeline wired to the live DLCS and WorldCat services
pub type LivePipeline = manifests::ManifestPipeline<worldcat::WorldCatClient, dlcs::DlcsClient>;

/// Create the live pipeline from configuration
pub async fn live_pipeline(config: &AppConfig) -> AppResult<LivePipeline> {
    let cache = cache::JsonCache::open(&config.paths.cache_dir).await?;
    tracing::info!("Loaded {} cached records", cache.len());

    Ok(manifests::ManifestPipeline::new(
        worldcat::WorldCatClient::new(config.worldcat.clone()),
        dlcs::DlcsClient::new(config.dlcs.base_url.clone()),
        cache,
        MetadataNormalizer::new(config.worldcat.public_base_url.clone()),
        config.paths.output_dir.clone(),
    ))
}
