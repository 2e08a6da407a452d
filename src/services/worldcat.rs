//! WorldCat Search API v2 client
//!
//! Fetches bibliographic records with an OAuth client-credentials token that is
//! acquired on the first request and reused until it is about to expire.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::{DateTime, Duration, Utc};
use reqwest::{header, StatusCode};
use serde::Deserialize;
use tokio::sync::Mutex;

use crate::{
    config::WorldCatConfig,
    error::{AppError, AppResult},
};

/// Seconds before expiry at which a token is replaced
const TOKEN_EXPIRY_MARGIN_SECONDS: i64 = 60;

/// Source of raw bibliographic records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BibliographicSource: Send + Sync {
    /// Fetch the record for an OCLC number, `None` when the catalog has none
    async fn fetch_bib(&self, oclc_number: u64) -> AppResult<Option<serde_json::Value>>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expires_at {
            Some(expires_at) => now + Duration::seconds(TOKEN_EXPIRY_MARGIN_SECONDS) < expires_at,
            None => true,
        }
    }
}

pub struct WorldCatClient {
    http: reqwest::Client,
    config: WorldCatConfig,
    token: Mutex<Option<AccessToken>>,
}

impl WorldCatClient {
    pub fn new(config: WorldCatConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
            token: Mutex::new(None),
        }
    }

    /// Current token, requesting a new one when none is held or it expired
    async fn access_token(&self) -> AppResult<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_valid_at(Utc::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> AppResult<AccessToken> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| AppError::Auth("No API key found in environment variables".to_string()))?;

        tracing::debug!("Requesting WorldCat access token");

        let response = self
            .http
            .post(&self.config.token_url)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(header::ACCEPT, "application/json")
            .header(header::AUTHORIZATION, format!("Basic {}", BASE64.encode(api_key)))
            .body(format!("grant_type=client_credentials&scope={}", self.config.scope))
            .send()
            .await?;

        let status = response.status();
        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Auth(format!("Invalid token response ({}): {}", status, e)))?;

        let value = body
            .access_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Auth(format!("Could not fetch access token ({})", status)))?;

        Ok(AccessToken {
            value,
            expires_at: body
                .expires_in
                .map(|seconds| Utc::now() + Duration::seconds(seconds)),
        })
    }
}

#[async_trait]
impl BibliographicSource for WorldCatClient {
    async fn fetch_bib(&self, oclc_number: u64) -> AppResult<Option<serde_json::Value>> {
        let token = self.access_token().await?;
        let url = format!(
            "{}/bibs/{}",
            self.config.api_base_url.trim_end_matches('/'),
            oclc_number
        );

        tracing::debug!("Fetching {}", url);

        let response = self.http.get(&url).bearer_auth(token).send().await?;
        match response.status() {
            status if status.is_success() => Ok(Some(response.json().await?)),
            StatusCode::NOT_FOUND => {
                tracing::warn!("OCLC number {} not found in WorldCat", oclc_number);
                Ok(None)
            }
            status => Err(AppError::Http(format!(
                "WorldCat returned {} for {}",
                status, oclc_number
            ))),
        }
    }
}
