// Profile catalog and default-profile writer over ~/.aws/config and
// ~/.aws/credentials
use crate::aws_cli::AwsCli;
use crate::error::{Result, SwitchError};
use crate::models::{CredentialSet, Profile};
use crate::section::{self, SectionForm};
use chrono::{DateTime, SecondsFormat, Utc};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// The `[default]` section of the credentials file, parsed leniently: an
/// absent default is a normal state, not a failure, so every field is
/// optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefaultProfile {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub expiry: Option<DateTime<Utc>>,
    /// Which named profile this default mirrors
    pub profile: Option<String>,
}

/// Fields for a profile being created.
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub name: String,
    pub region: String,
    pub kind: NewProfileKind,
}

#[derive(Debug, Clone)]
pub enum NewProfileKind {
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
    Sso {
        start_url: String,
        sso_region: String,
        account_id: String,
        role_name: String,
    },
}

/// Owns the paths of the two config texts. Files are read whole and written
/// whole; a missing file reads as an empty document.
pub struct ProfileStore {
    config_path: PathBuf,
    credentials_path: PathBuf,
}

impl ProfileStore {
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or_else(|| {
            SwitchError::ConfigError("Could not determine home directory".to_string())
        })?;
        Ok(Self::with_root(&home.join(".aws")))
    }

    /// Point the store at an explicit directory (tests)
    pub fn with_root(dir: &Path) -> Self {
        Self {
            config_path: dir.join("config"),
            credentials_path: dir.join("credentials"),
        }
    }

    pub fn read_config(&self) -> Result<String> {
        read_or_empty(&self.config_path)
    }

    pub fn read_credentials(&self) -> Result<String> {
        read_or_empty(&self.credentials_path)
    }

    fn write_config(&self, text: &str) -> Result<()> {
        write_text(&self.config_path, text)
    }

    fn write_credentials(&self, text: &str) -> Result<()> {
        write_text(&self.credentials_path, text)
    }

    /// Every non-default profile in the config file, in file order.
    pub fn list_profiles(&self, cli: &dyn AwsCli) -> Result<Vec<Profile>> {
        cli.ensure_v2()?;

        let text = self.read_config()?;
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let mut profiles = Vec::new();
        for (raw_name, body) in section::list_sections(&text) {
            let name = raw_name
                .strip_prefix("profile ")
                .unwrap_or(&raw_name)
                .trim()
                .to_string();
            if name == "default" {
                continue;
            }

            let sso_region = section::get_param(&body, "sso_region");
            // sso_region overrides region for display
            let region = sso_region
                .clone()
                .or_else(|| section::get_param(&body, "region"));

            profiles.push(Profile {
                name,
                sso_start_url: section::get_param(&body, "sso_start_url"),
                sso_region,
                sso_account_id: section::get_param(&body, "sso_account_id"),
                sso_role_name: section::get_param(&body, "sso_role_name"),
                region,
                output: section::get_param(&body, "output"),
            });
        }
        Ok(profiles)
    }

    /// Rewrite the `[default]` section of both files with resolved
    /// credentials. The two writes are sequenced but not transactional.
    pub fn set_default(
        &self,
        creds: &CredentialSet,
        profile_name: &str,
        region: &str,
    ) -> Result<()> {
        let mut creds_body = format!(
            "[default]\naws_access_key_id = {}\naws_secret_access_key = {}\n",
            creds.access_key_id, creds.secret_access_key
        );
        if let Some(token) = &creds.session_token {
            creds_body.push_str(&format!("aws_session_token = {}\n", token));
        }
        if let Some(expiry) = &creds.expiry {
            creds_body.push_str(&format!(
                "expiry_date = {}\n",
                expiry.to_rfc3339_opts(SecondsFormat::Millis, true)
            ));
        }
        creds_body.push_str(&format!("profile = {}\n\n", profile_name));

        let creds_text = self.read_credentials()?;
        self.write_credentials(&upsert_default(&creds_text, &creds_body))?;

        let config_body = format!("[default]\nregion = {}\noutput = json\n\n", region);
        let config_text = self.read_config()?;
        self.write_config(&upsert_default(&config_text, &config_body))?;

        tracing::debug!("Default profile now mirrors '{}'", profile_name);
        Ok(())
    }

    /// Read back the `[default]` section of the credentials file. None when
    /// the file or section is absent.
    pub fn get_default(&self) -> Result<Option<DefaultProfile>> {
        let text = self.read_credentials()?;
        let span = match section::find_section(&text, "default", SectionForm::Bare) {
            Some(span) => span,
            None => return Ok(None),
        };
        let body = section::section_text(&text, &span);

        let expiry = section::get_param(body, "expiry_date")
            .and_then(|raw| DateTime::parse_from_rfc3339(&raw).ok())
            .map(|dt| dt.with_timezone(&Utc));

        Ok(Some(DefaultProfile {
            access_key_id: section::get_param(body, "aws_access_key_id"),
            secret_access_key: section::get_param(body, "aws_secret_access_key"),
            session_token: section::get_param(body, "aws_session_token"),
            expiry,
            profile: section::get_param(body, "profile"),
        }))
    }

    /// Delete the named profiles from both files. Rejects the whole batch
    /// before touching anything when it includes `default` or the profile
    /// the default currently mirrors.
    pub fn delete_profiles(&self, names: &[String]) -> Result<()> {
        if names.is_empty() {
            return Ok(());
        }
        if names.iter().any(|n| n == "default") {
            return Err(SwitchError::Validation(
                "The 'default' profile cannot be deleted.".to_string(),
            ));
        }
        if let Some(current) = self.get_default()?.and_then(|d| d.profile) {
            if names.contains(&current) {
                return Err(SwitchError::Validation(format!(
                    "Profile '{}' is currently set as the default profile. Switch to another profile before deleting it.",
                    current
                )));
            }
        }

        let mut config_text = self.read_config()?;
        let mut creds_text = self.read_credentials()?;
        let had_config = !config_text.is_empty();
        let had_creds = !creds_text.is_empty();

        // A profile may exist in only one of the two files (SSO profiles
        // have no credentials entry); missing sections are no-ops.
        for name in names {
            if let Some(span) = section::find_section(&config_text, name, SectionForm::ProfilePrefixed)
            {
                config_text = section::delete_section(&config_text, &span);
            }
            if let Some(span) = section::find_section(&creds_text, name, SectionForm::Bare) {
                creds_text = section::delete_section(&creds_text, &span);
            }
        }

        if had_config {
            self.write_config(&config_text)?;
        }
        if had_creds {
            self.write_credentials(&creds_text)?;
        }
        Ok(())
    }

    /// Append a new profile to the files. Never replaces an existing
    /// section; name collisions are rejected.
    pub fn create_profile(&self, new: &NewProfile) -> Result<()> {
        validate_profile_name(&new.name)?;
        require_field(&new.region, "region")?;
        match &new.kind {
            NewProfileKind::Static {
                access_key_id,
                secret_access_key,
            } => {
                require_field(access_key_id, "aws_access_key_id")?;
                require_field(secret_access_key, "aws_secret_access_key")?;
            }
            NewProfileKind::Sso {
                start_url,
                sso_region,
                account_id,
                role_name,
            } => {
                require_field(start_url, "sso_start_url")?;
                require_field(sso_region, "sso_region")?;
                require_field(account_id, "sso_account_id")?;
                require_field(role_name, "sso_role_name")?;
            }
        }

        let config_text = self.read_config()?;
        let creds_text = self.read_credentials()?;
        if self.profile_exists(&config_text, &creds_text, &new.name) {
            return Err(SwitchError::Validation(format!(
                "Profile '{}' already exists.",
                new.name
            )));
        }

        let mut config_section = format!("[profile {}]\n", new.name);
        if let NewProfileKind::Sso {
            start_url,
            sso_region,
            account_id,
            role_name,
        } = &new.kind
        {
            config_section.push_str(&format!("sso_start_url = {}\n", start_url));
            config_section.push_str(&format!("sso_region = {}\n", sso_region));
            config_section.push_str(&format!("sso_account_id = {}\n", account_id));
            config_section.push_str(&format!("sso_role_name = {}\n", role_name));
        }
        config_section.push_str(&format!("region = {}\noutput = json\n\n", new.region));

        self.write_config(&append_section(&config_text, &config_section))?;

        if let NewProfileKind::Static {
            access_key_id,
            secret_access_key,
        } = &new.kind
        {
            let creds_section = format!(
                "[{}]\naws_access_key_id = {}\naws_secret_access_key = {}\n\n",
                new.name, access_key_id, secret_access_key
            );
            self.write_credentials(&append_section(&creds_text, &creds_section))?;
        }
        Ok(())
    }

    fn profile_exists(&self, config_text: &str, creds_text: &str, name: &str) -> bool {
        let in_config = section::list_sections(config_text)
            .into_iter()
            .any(|(raw, _)| raw.strip_prefix("profile ").unwrap_or(&raw).trim() == name);
        let in_creds = section::list_sections(creds_text)
            .into_iter()
            .any(|(raw, _)| raw == name);
        in_config || in_creds
    }
}

/// Profile names: lowercase alphanumeric plus hyphen, at least two
/// characters. `default` is reserved.
pub fn validate_profile_name(name: &str) -> Result<()> {
    let valid = Regex::new(r"^[a-z0-9-]{2,}$")
        .map(|re| re.is_match(name))
        .unwrap_or(false);
    if !valid {
        return Err(SwitchError::Validation(format!(
            "Invalid profile name '{}'. Use at least 2 lowercase letters, digits or hyphens.",
            name
        )));
    }
    if name == "default" {
        return Err(SwitchError::Validation(
            "The name 'default' is reserved.".to_string(),
        ));
    }
    Ok(())
}

fn require_field(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        Err(SwitchError::Validation(format!(
            "Missing required argument '{}'.",
            field
        )))
    } else {
        Ok(())
    }
}

/// Replace an existing `[default]` section in place, or prepend one.
fn upsert_default(text: &str, body: &str) -> String {
    match section::find_section(text, "default", SectionForm::Bare) {
        Some(span) => section::replace_section(text, &span, body),
        None => format!("{}{}", body, text),
    }
}

/// Append a section, seeding an empty document with a placeholder
/// `[default]` anchor first.
fn append_section(text: &str, section: &str) -> String {
    let mut result = if text.trim().is_empty() {
        "[default]\n\n".to_string()
    } else {
        let mut t = text.to_string();
        if !t.ends_with('\n') {
            t.push('\n');
        }
        t
    };
    result.push_str(section);
    result
}

fn read_or_empty(path: &Path) -> Result<String> {
    if path.exists() {
        Ok(fs::read_to_string(path)?)
    } else {
        Ok(String::new())
    }
}

fn write_text(path: &Path, text: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aws_cli::MockAwsCli;
    use tempfile::TempDir;

    fn ready_cli() -> MockAwsCli {
        let mut cli = MockAwsCli::new();
        cli.expect_ensure_v2().returning(|| Ok(()));
        cli
    }

    fn static_profile(name: &str) -> NewProfile {
        NewProfile {
            name: name.to_string(),
            region: "us-east-1".to_string(),
            kind: NewProfileKind::Static {
                access_key_id: "AKIA1234".to_string(),
                secret_access_key: "secret1".to_string(),
            },
        }
    }

    #[test]
    fn test_create_then_list_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());

        store.create_profile(&static_profile("alice")).unwrap();

        let profiles = store.list_profiles(&ready_cli()).unwrap();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].name, "alice");
        assert_eq!(profiles[0].friendly_name(), "alice");
        assert_eq!(profiles[0].region.as_deref(), Some("us-east-1"));

        // The credentials file gained both the anchor and the new section
        let creds = store.read_credentials().unwrap();
        assert!(creds.starts_with("[default]"));
        assert!(creds.contains("[alice]\naws_access_key_id = AKIA1234"));
    }

    #[test]
    fn test_create_sso_profile_single_section() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());

        store
            .create_profile(&NewProfile {
                name: "sso-dev".to_string(),
                region: "us-east-1".to_string(),
                kind: NewProfileKind::Sso {
                    start_url: "https://cloudless.awsapps.com/start".to_string(),
                    sso_region: "ap-southeast-2".to_string(),
                    account_id: "111".to_string(),
                    role_name: "admin".to_string(),
                },
            })
            .unwrap();

        let config = store.read_config().unwrap();
        assert_eq!(config.matches("[profile sso-dev]").count(), 1);
        // SSO profiles get no credentials-file entry
        assert!(store.read_credentials().unwrap().is_empty());

        let profiles = store.list_profiles(&ready_cli()).unwrap();
        assert_eq!(
            profiles[0].friendly_name(),
            "sso-dev (SSO [role:admin - account:111])"
        );
        assert_eq!(profiles[0].region.as_deref(), Some("ap-southeast-2"));
    }

    #[test]
    fn test_list_profiles_empty_config() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        assert!(store.list_profiles(&ready_cli()).unwrap().is_empty());
    }

    #[test]
    fn test_list_profiles_filters_default_and_keeps_order() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        std::fs::write(
            dir.path().join("config"),
            "[default]\nregion = us-east-1\n\n[profile bravo]\nregion = eu-west-1\n\n[profile alpha]\nregion = us-west-2\n",
        )
        .unwrap();

        let names: Vec<_> = store
            .list_profiles(&ready_cli())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["bravo", "alpha"]);
    }

    #[test]
    fn test_list_profiles_requires_cli() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        let mut cli = MockAwsCli::new();
        cli.expect_ensure_v2()
            .returning(|| Err(SwitchError::UnsupportedCliVersion(1)));
        assert!(store.list_profiles(&cli).is_err());
    }

    #[test]
    fn test_set_then_get_default() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());

        let creds = CredentialSet {
            access_key_id: "K".to_string(),
            secret_access_key: "S".to_string(),
            session_token: None,
            expiry: None,
        };
        store.set_default(&creds, "alice", "us-east-1").unwrap();

        let default = store.get_default().unwrap().unwrap();
        assert_eq!(default.access_key_id.as_deref(), Some("K"));
        assert_eq!(default.secret_access_key.as_deref(), Some("S"));
        assert_eq!(default.profile.as_deref(), Some("alice"));
        assert_eq!(default.session_token, None);
        assert_eq!(default.expiry, None);

        let config = store.read_config().unwrap();
        assert!(config.contains("[default]\nregion = us-east-1\noutput = json\n"));
    }

    #[test]
    fn test_set_default_replaces_in_place() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        std::fs::write(
            dir.path().join("credentials"),
            "[default]\naws_access_key_id = OLD\n\n[alice]\naws_access_key_id = KEEP\n",
        )
        .unwrap();

        let creds = CredentialSet {
            access_key_id: "NEW".to_string(),
            secret_access_key: "S".to_string(),
            session_token: Some("tok".to_string()),
            expiry: Some(Utc::now() + chrono::Duration::hours(1)),
        };
        store.set_default(&creds, "alice", "us-east-1").unwrap();

        let text = store.read_credentials().unwrap();
        assert!(!text.contains("OLD"));
        assert!(text.contains("aws_session_token = tok"));
        assert!(text.contains("expiry_date = "));
        assert!(text.contains("[alice]\naws_access_key_id = KEEP"));

        let default = store.get_default().unwrap().unwrap();
        assert!(default.expiry.is_some());
    }

    #[test]
    fn test_get_default_absent() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        assert!(store.get_default().unwrap().is_none());
    }

    #[test]
    fn test_delete_default_rejected_files_untouched() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        let config = "[default]\nregion = us-east-1\n";
        std::fs::write(dir.path().join("config"), config).unwrap();

        let err = store.delete_profiles(&["default".to_string()]);
        assert!(err.is_err());
        assert_eq!(store.read_config().unwrap(), config);
    }

    #[test]
    fn test_delete_current_default_profile_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        store.create_profile(&static_profile("alice")).unwrap();
        let creds = CredentialSet {
            access_key_id: "K".to_string(),
            secret_access_key: "S".to_string(),
            session_token: None,
            expiry: None,
        };
        store.set_default(&creds, "alice", "us-east-1").unwrap();

        let config_before = store.read_config().unwrap();
        let creds_before = store.read_credentials().unwrap();

        let result = store.delete_profiles(&["alice".to_string()]);
        assert!(matches!(result, Err(SwitchError::Validation(_))));
        assert_eq!(store.read_config().unwrap(), config_before);
        assert_eq!(store.read_credentials().unwrap(), creds_before);
    }

    #[test]
    fn test_delete_profile_from_both_files() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        store.create_profile(&static_profile("alice")).unwrap();
        store.create_profile(&static_profile("bob")).unwrap();

        store.delete_profiles(&["alice".to_string()]).unwrap();

        let names: Vec<_> = store
            .list_profiles(&ready_cli())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["bob"]);
        assert!(!store.read_credentials().unwrap().contains("[alice]"));
        assert!(store.read_credentials().unwrap().contains("[bob]"));
    }

    #[test]
    fn test_delete_missing_profile_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        store.create_profile(&static_profile("alice")).unwrap();
        let before = store.read_config().unwrap();

        store.delete_profiles(&["ghost".to_string()]).unwrap();
        assert_eq!(store.read_config().unwrap(), before);
    }

    #[test]
    fn test_create_duplicate_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());
        store.create_profile(&static_profile("alice")).unwrap();
        assert!(store.create_profile(&static_profile("alice")).is_err());
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_profile_name("A").is_err());
        assert!(validate_profile_name("").is_err());
        assert!(validate_profile_name("a").is_err());
        assert!(validate_profile_name("name_with_ünïcode").is_err());
        assert!(validate_profile_name("default").is_err());
        assert!(validate_profile_name("my-profile2").is_ok());
    }

    #[test]
    fn test_create_missing_fields_rejected() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::with_root(dir.path());

        let mut p = static_profile("alice");
        p.region = String::new();
        assert!(store.create_profile(&p).is_err());

        let mut p = static_profile("alice");
        p.kind = NewProfileKind::Static {
            access_key_id: String::new(),
            secret_access_key: "s".to_string(),
        };
        assert!(store.create_profile(&p).is_err());

        let p = NewProfile {
            name: "sso-dev".to_string(),
            region: "us-east-1".to_string(),
            kind: NewProfileKind::Sso {
                start_url: "https://x.awsapps.com/start".to_string(),
                sso_region: "us-east-1".to_string(),
                account_id: String::new(),
                role_name: "admin".to_string(),
            },
        };
        assert!(store.create_profile(&p).is_err());
    }
}
