use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Safety margin subtracted from every expiry check so we never hand out
/// credentials that die mid-operation.
pub const EXPIRY_SKEW_MINUTES: i64 = 2;

pub fn expiry_skew() -> Duration {
    Duration::minutes(EXPIRY_SKEW_MINUTES)
}

/// A named profile parsed from ~/.aws/config
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Profile {
    pub name: String,
    pub sso_start_url: Option<String>,
    pub sso_region: Option<String>,
    pub sso_account_id: Option<String>,
    pub sso_role_name: Option<String>,
    pub region: Option<String>,
    pub output: Option<String>,
}

impl Profile {
    pub fn is_sso(&self) -> bool {
        self.sso_start_url.is_some()
    }

    /// Display name: the raw name, annotated with role/account for SSO profiles
    pub fn friendly_name(&self) -> String {
        if self.is_sso() {
            format!(
                "{} (SSO [role:{} - account:{}])",
                self.name,
                self.sso_role_name.as_deref().unwrap_or("unknown"),
                self.sso_account_id.as_deref().unwrap_or("unknown"),
            )
        } else {
            self.name.clone()
        }
    }
}

/// A resolved, usable set of credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
    /// None means the credentials do not expire (static long-lived keys)
    pub expiry: Option<DateTime<Utc>>,
}

impl CredentialSet {
    pub fn is_expired(&self) -> bool {
        match self.expiry {
            Some(expiry) => Utc::now() >= expiry,
            None => false,
        }
    }

    pub fn expires_in_minutes(&self) -> Option<i64> {
        self.expiry
            .map(|expiry| (expiry - Utc::now()).num_minutes().max(0))
    }
}

/// Cached SSO session from ~/.aws/sso/cache/ (AWS CLI v2 format)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoSession {
    #[serde(rename = "accessToken", alias = "access_token")]
    pub access_token: String,

    #[serde(rename = "expiresAt", alias = "expires_at")]
    pub expires_at: DateTime<Utc>,

    #[serde(
        rename = "startUrl",
        alias = "start_url",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

impl SsoSession {
    /// Valid while the expiry is more than the skew in the future
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now + expiry_skew()
    }
}

/// Cached credential export from ~/.aws/cli/cache/ (AWS CLI v2 format)
#[derive(Debug, Clone, Deserialize)]
pub struct CliCacheEntry {
    #[serde(rename = "ProviderType", default)]
    pub provider_type: Option<String>,

    #[serde(rename = "Credentials")]
    pub credentials: Option<CachedCredentials>,
}

/// Credentials block shared by the CLI cache files and the
/// `aws configure export-credentials` output
#[derive(Debug, Clone, Deserialize)]
pub struct CachedCredentials {
    #[serde(rename = "AccessKeyId")]
    pub access_key_id: String,

    #[serde(rename = "SecretAccessKey")]
    pub secret_access_key: String,

    #[serde(rename = "SessionToken")]
    pub session_token: Option<String>,

    #[serde(rename = "Expiration")]
    pub expiration: Option<DateTime<Utc>>,
}

impl CachedCredentials {
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match self.expiration {
            Some(expiration) => expiration > now + expiry_skew(),
            None => false,
        }
    }

    pub fn into_credential_set(self) -> CredentialSet {
        CredentialSet {
            access_key_id: self.access_key_id,
            secret_access_key: self.secret_access_key,
            session_token: self.session_token,
            expiry: self.expiration,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sso_profile() -> Profile {
        Profile {
            name: "sso-dev".to_string(),
            sso_start_url: Some("https://cloudless.awsapps.com/start".to_string()),
            sso_region: Some("ap-southeast-2".to_string()),
            sso_account_id: Some("111".to_string()),
            sso_role_name: Some("admin".to_string()),
            region: Some("ap-southeast-2".to_string()),
            output: Some("json".to_string()),
        }
    }

    #[test]
    fn test_friendly_name_static() {
        let profile = Profile {
            name: "alice".to_string(),
            sso_start_url: None,
            sso_region: None,
            sso_account_id: None,
            sso_role_name: None,
            region: Some("us-east-1".to_string()),
            output: None,
        };
        assert_eq!(profile.friendly_name(), "alice");
    }

    #[test]
    fn test_friendly_name_sso() {
        assert_eq!(
            sso_profile().friendly_name(),
            "sso-dev (SSO [role:admin - account:111])"
        );
    }

    #[test]
    fn test_friendly_name_sso_missing_fields() {
        let mut profile = sso_profile();
        profile.sso_role_name = None;
        assert_eq!(
            profile.friendly_name(),
            "sso-dev (SSO [role:unknown - account:111])"
        );
    }

    #[test]
    fn test_sso_session_skew() {
        let now = Utc::now();
        let session = SsoSession {
            access_token: "token".to_string(),
            expires_at: now + Duration::minutes(10),
            start_url: Some("https://cloudless.awsapps.com/start".to_string()),
            region: None,
        };
        assert!(session.is_valid_at(now));

        let expiring = SsoSession {
            expires_at: now + Duration::minutes(1),
            ..session
        };
        assert!(!expiring.is_valid_at(now));
    }

    #[test]
    fn test_credential_set_no_expiry_never_expires() {
        let creds = CredentialSet {
            access_key_id: "AKIA1234".to_string(),
            secret_access_key: "secret".to_string(),
            session_token: None,
            expiry: None,
        };
        assert!(!creds.is_expired());
        assert_eq!(creds.expires_in_minutes(), None);
    }

    #[test]
    fn test_cli_cache_entry_parse() {
        let json = r#"{
            "ProviderType": "sso",
            "Credentials": {
                "AccessKeyId": "ASIA00000000ABCD",
                "SecretAccessKey": "wJalrXUtnFEMI0000000000000000000EFGH",
                "SessionToken": "abc...def",
                "Expiration": "2031-07-17T11:33:12Z"
            }
        }"#;
        let entry: CliCacheEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.provider_type.as_deref(), Some("sso"));
        let creds = entry.credentials.unwrap();
        assert!(creds.is_valid_at(Utc::now()));
        assert!(creds.access_key_id.ends_with("ABCD"));
    }
}
