// Credential resolution: static profiles read straight from the
// credentials text; SSO profiles drive the AWS CLI refresh protocol.
use crate::aws_cli::AwsCli;
use crate::cache::{CliCredentialCache, SsoSessionCache};
use crate::error::{Result, SwitchError};
use crate::models::{CredentialSet, Profile, SsoSession};
use crate::profiles::ProfileStore;
use crate::section::{self, SectionForm};
use std::time::{Duration, Instant};

/// Poll cadence for the post-login session wait. Injectable so tests run
/// without real delays.
#[derive(Debug, Clone)]
pub struct ResolverOptions {
    pub poll_interval: Duration,
    pub login_timeout: Duration,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(2),
            login_timeout: Duration::from_secs(5 * 60),
        }
    }
}

pub struct CredentialResolver<'a> {
    cli: &'a dyn AwsCli,
    store: &'a ProfileStore,
    sessions: SsoSessionCache,
    cli_cache: CliCredentialCache,
    options: ResolverOptions,
}

impl<'a> CredentialResolver<'a> {
    pub fn new(cli: &'a dyn AwsCli, store: &'a ProfileStore) -> Result<Self> {
        Ok(Self {
            cli,
            store,
            sessions: SsoSessionCache::new()?,
            cli_cache: CliCredentialCache::new()?,
            options: ResolverOptions::default(),
        })
    }

    pub fn with_parts(
        cli: &'a dyn AwsCli,
        store: &'a ProfileStore,
        sessions: SsoSessionCache,
        cli_cache: CliCredentialCache,
        options: ResolverOptions,
    ) -> Self {
        Self {
            cli,
            store,
            sessions,
            cli_cache,
            options,
        }
    }

    /// Produce usable credentials for a profile, refreshing the SSO session
    /// and caches as needed.
    pub async fn resolve(&self, profile: &Profile) -> Result<CredentialSet> {
        match &profile.sso_start_url {
            Some(url) => self.resolve_sso(&profile.name, url).await,
            None => self.resolve_static(&profile.name),
        }
    }

    async fn resolve_sso(&self, name: &str, sso_url: &str) -> Result<CredentialSet> {
        self.cli.ensure_v2()?;
        self.refresh_session(name, sso_url, false).await?;

        let cached = match self.cached_cli_credentials(name) {
            Ok(cached) => cached,
            Err(SwitchError::StaleSession(_)) => {
                // The CLI considers the session dead even though the cache
                // looked valid; force a fresh login and try once more.
                tracing::debug!("Stale session reported for '{}', forcing re-login", name);
                self.refresh_session(name, sso_url, true).await?;
                self.cached_cli_credentials(name)?
            }
            Err(e) => return Err(e),
        };
        if let Some(creds) = cached {
            return Ok(creds);
        }

        tracing::debug!("CLI cache lookup failed for '{}', trying direct export", name);
        if let Some(creds) = self.cli.export_credentials(name)? {
            return Ok(creds);
        }

        Err(SwitchError::NoCredentials(name.to_string()))
    }

    /// Make sure a valid session exists for the portal, running the
    /// interactive login and polling the cache until it lands.
    async fn refresh_session(&self, name: &str, sso_url: &str, force: bool) -> Result<()> {
        if !force && self.lookup_session(sso_url)?.is_some() {
            return Ok(());
        }

        self.cli.login(name)?;

        let start = Instant::now();
        loop {
            if self.lookup_session(sso_url)?.is_some() {
                return Ok(());
            }
            if start.elapsed() >= self.options.login_timeout {
                return Err(SwitchError::LoginTimeout {
                    profile: name.to_string(),
                    timeout_secs: self.options.login_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.options.poll_interval).await;
        }
    }

    /// A missing or empty session cache just means no login has happened
    /// yet; a malformed portal URL is still fatal.
    fn lookup_session(&self, sso_url: &str) -> Result<Option<SsoSession>> {
        match self.sessions.get_session(sso_url) {
            Ok(session) => Ok(session),
            Err(SwitchError::CacheError(msg)) => {
                tracing::debug!("No usable session cache yet: {}", msg);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Step 3: scrape the masked key fingerprints from `configure list`,
    /// then pull the full material from the CLI cache.
    fn cached_cli_credentials(&self, name: &str) -> Result<Option<CredentialSet>> {
        let suffixes = self.cli.masked_key_suffixes(name)?;
        match suffixes {
            Some((access_suffix, secret_suffix)) => self
                .cli_cache
                .get_credentials(&access_suffix, &secret_suffix),
            None => Ok(None),
        }
    }

    /// Static keys never expire in this model; an absent file or section
    /// yields empty fields rather than an error.
    fn resolve_static(&self, name: &str) -> Result<CredentialSet> {
        let text = self.store.read_credentials()?;
        let body = section::find_section(&text, name, SectionForm::Bare)
            .map(|span| section::section_text(&text, &span).to_string())
            .unwrap_or_default();

        Ok(CredentialSet {
            access_key_id: section::get_param(&body, "aws_access_key_id").unwrap_or_default(),
            secret_access_key: section::get_param(&body, "aws_secret_access_key")
                .unwrap_or_default(),
            session_token: section::get_param(&body, "aws_session_token"),
            expiry: None,
        })
    }
}
