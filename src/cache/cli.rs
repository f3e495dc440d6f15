use crate::error::{Result, SwitchError};
use crate::models::{CliCacheEntry, CredentialSet};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::PathBuf;

/// Reader over the exported-credential cache at ~/.aws/cli/cache/
///
/// `aws configure list` only prints masked keys, so the full credential
/// material has to be picked up from the cache files it refreshes, matched
/// by the last-4 fingerprint of each key.
pub struct CliCredentialCache {
    cache_dir: PathBuf,
}

impl CliCredentialCache {
    pub fn new() -> Result<Self> {
        let cache_dir = dirs::home_dir()
            .ok_or_else(|| SwitchError::CacheError("Could not determine home directory".to_string()))?
            .join(".aws")
            .join("cli")
            .join("cache");

        Ok(Self { cache_dir })
    }

    /// Override the cache location (tests)
    pub fn with_dir(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    /// Find cached SSO credentials whose key fingerprints match.
    ///
    /// Empty suffix arguments are a validation error. A missing or empty
    /// cache directory yields None. The first qualifying entry in scan
    /// order wins.
    pub fn get_credentials(
        &self,
        access_key_suffix: &str,
        secret_key_suffix: &str,
    ) -> Result<Option<CredentialSet>> {
        self.get_credentials_at(access_key_suffix, secret_key_suffix, Utc::now())
    }

    pub fn get_credentials_at(
        &self,
        access_key_suffix: &str,
        secret_key_suffix: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<CredentialSet>> {
        if access_key_suffix.is_empty() {
            return Err(SwitchError::Validation(
                "Missing required argument 'access_key_suffix'.".to_string(),
            ));
        }
        if secret_key_suffix.is_empty() {
            return Err(SwitchError::Validation(
                "Missing required argument 'secret_key_suffix'.".to_string(),
            ));
        }

        if !self.cache_dir.exists() {
            return Ok(None);
        }

        for path in super::json_files(&self.cache_dir)? {
            let contents = match fs::read_to_string(&path) {
                Ok(contents) => contents,
                Err(e) => {
                    tracing::warn!("Skipping unreadable cache file {}: {}", path.display(), e);
                    continue;
                }
            };

            let entry: CliCacheEntry = match serde_json::from_str(&contents) {
                Ok(entry) => entry,
                Err(_) => continue,
            };

            if entry.provider_type.as_deref() != Some("sso") {
                continue;
            }
            let creds = match entry.credentials {
                Some(creds) => creds,
                None => continue,
            };
            if !creds.is_valid_at(now) {
                continue;
            }

            let matches = key_suffix(&creds.access_key_id) == access_key_suffix
                && key_suffix(&creds.secret_access_key) == secret_key_suffix;
            if matches {
                tracing::debug!("Matching CLI credentials in {}", path.display());
                return Ok(Some(creds.into_credential_set()));
            }
        }

        Ok(None)
    }
}

fn key_suffix(key: &str) -> &str {
    let n = key.len().saturating_sub(4);
    &key[n..]
}
