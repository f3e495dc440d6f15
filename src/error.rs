use thiserror::Error;

#[derive(Error, Debug)]
pub enum SwitchError {
    #[error("AWS CLI not found: {0}\n\nTo fix this issue, try installing the AWS CLI v2: https://docs.aws.amazon.com/cli/latest/userguide/getting-started-install.html")]
    CliNotFound(String),

    #[error("AWS CLI version {0} is not supported. Please upgrade to AWS CLI v2 or greater.")]
    UnsupportedCliVersion(u32),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("The SSO session associated with profile '{0}' has expired")]
    StaleSession(String),

    #[error("Timeout - waited more than {timeout_secs}s for the SSO session of profile '{profile}' to refresh")]
    LoginTimeout { profile: String, timeout_secs: u64 },

    #[error("Failed to resolve credentials for profile '{0}'")]
    NoCredentials(String),

    #[error("Invalid SSO portal URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SwitchError>;
