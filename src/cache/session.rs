use crate::error::{Result, SwitchError};
use crate::models::SsoSession;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// Reader over the SSO session cache at ~/.aws/sso/cache/
pub struct SsoSessionCache {
    cache_dir: PathBuf,
}

impl SsoSessionCache {
    pub fn new() -> Result<Self> {
        let cache_dir = dirs::home_dir()
            .ok_or_else(|| SwitchError::CacheError("Could not determine home directory".to_string()))?
            .join(".aws")
            .join("sso")
            .join("cache");

        Ok(Self { cache_dir })
    }

    /// Override the cache location (tests)
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Find a valid session for the given SSO portal URL.
    ///
    /// Fails when the URL is malformed, the cache directory is missing, or
    /// it holds no JSON files at all. Candidates match on the host of their
    /// `startUrl`; when several files qualify the last one in scan order
    /// wins. Unparseable files are skipped.
    pub fn get_session(&self, sso_url: &str) -> Result<Option<SsoSession>> {
        self.get_session_at(sso_url, Utc::now())
    }

    pub fn get_session_at(
        &self,
        sso_url: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<SsoSession>> {
        let target_host = Url::parse(sso_url)?
            .host_str()
            .map(str::to_string)
            .ok_or_else(|| {
                SwitchError::CacheError(format!(
                    "The SSO portal URL {} is not a valid URL.",
                    sso_url
                ))
            })?;

        if !self.cache_dir.exists() {
            return Err(SwitchError::CacheError(format!(
                "AWS SSO folder {} not found.",
                self.cache_dir.display()
            )));
        }

        let files = super::json_files(&self.cache_dir)?;
        if files.is_empty() {
            return Err(SwitchError::CacheError(format!(
                "AWS SSO folder {} contains no credentials.",
                self.cache_dir.display()
            )));
        }

        let mut session = None;
        for path in files {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("Skipping unreadable cache file {}: {}", path.display(), e);
                    continue;
                }
            };

            // Registration files and partial sessions fail to parse; skip them
            let candidate: SsoSession = match serde_json::from_str(&contents) {
                Ok(candidate) => candidate,
                Err(_) => continue,
            };

            let candidate_host = candidate
                .start_url
                .as_deref()
                .and_then(|u| Url::parse(u).ok())
                .and_then(|u| u.host_str().map(str::to_string));

            if candidate_host.as_deref() == Some(target_host.as_str())
                && candidate.is_valid_at(now)
            {
                tracing::debug!("Matching SSO session in {}", path.display());
                session = Some(candidate);
            }
        }

        Ok(session)
    }
}
