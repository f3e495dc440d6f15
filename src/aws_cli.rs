// Narrow interface over the AWS CLI v2 subprocess.
//
// Two of these calls scrape the CLI's human-readable output with fixed
// patterns; a pattern miss is reported as "no result" so callers can fall
// back instead of aborting.
use crate::error::{Result, SwitchError};
use crate::models::{CachedCredentials, CredentialSet};
use regex::Regex;
use std::process::Command;
use std::sync::OnceLock;

/// Capabilities the credential engine needs from the external tool.
#[cfg_attr(test, mockall::automock)]
pub trait AwsCli {
    /// Verify the tool is installed and is v2 or newer.
    fn ensure_v2(&self) -> Result<()>;

    /// Run the interactive SSO login flow for a profile. Blocks until the
    /// subprocess exits; its prompts and browser hand-off inherit our stdio.
    fn login(&self, profile: &str) -> Result<()>;

    /// Last-4 fingerprints of the (masked) access and secret keys reported
    /// by `configure list`. Ok(None) when the output carries no keys;
    /// `StaleSession` when the tool reports the profile's session expired.
    fn masked_key_suffixes(&self, profile: &str) -> Result<Option<(String, String)>>;

    /// Direct credential export, the last-resort resolution path.
    fn export_credentials(&self, profile: &str) -> Result<Option<CredentialSet>>;

    /// Run the tool's interactive SSO profile wizard for a new profile.
    fn configure_sso(&self, profile: &str) -> Result<()>;
}

#[derive(Debug, Clone)]
enum VersionProbe {
    Major(u32),
    NotFound(String),
    Unparseable(String),
}

/// The real `aws` binary. The version probe runs once per instance; tests
/// reset it by constructing a fresh tool.
pub struct AwsCliTool {
    program: String,
    version_probe: OnceLock<VersionProbe>,
}

impl AwsCliTool {
    pub fn new() -> Self {
        Self::with_program("aws")
    }

    pub fn with_program(program: &str) -> Self {
        Self {
            program: program.to_string(),
            version_probe: OnceLock::new(),
        }
    }

    fn probe_version(&self) -> VersionProbe {
        tracing::debug!("Probing '{} --version'", self.program);
        let output = match Command::new(&self.program).arg("--version").output() {
            Ok(output) => output,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return VersionProbe::NotFound(format!("command '{}' not found", self.program));
            }
            Err(e) => {
                return VersionProbe::Unparseable(format!(
                    "failed to run '{} --version': {}",
                    self.program, e
                ));
            }
        };

        // v1 printed its banner to stderr, v2 to stdout
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        match parse_major_version(&text) {
            Some(major) => VersionProbe::Major(major),
            None => VersionProbe::Unparseable(format!(
                "Fail to test the AWS CLI version. Please try to run \"{} --version\" manually to debug this issue.",
                self.program
            )),
        }
    }

    fn run_captured(&self, args: &[&str]) -> Result<std::process::Output> {
        tracing::debug!("Running '{} {}'", self.program, args.join(" "));
        Ok(Command::new(&self.program).args(args).output()?)
    }

    fn run_interactive(&self, args: &[&str]) -> Result<std::process::ExitStatus> {
        tracing::debug!("Running interactive '{} {}'", self.program, args.join(" "));
        Ok(Command::new(&self.program).args(args).status()?)
    }
}

impl Default for AwsCliTool {
    fn default() -> Self {
        Self::new()
    }
}

impl AwsCli for AwsCliTool {
    fn ensure_v2(&self) -> Result<()> {
        let probe = self.version_probe.get_or_init(|| self.probe_version());
        match probe {
            VersionProbe::Major(major) if *major >= 2 => Ok(()),
            VersionProbe::Major(major) => Err(SwitchError::UnsupportedCliVersion(*major)),
            VersionProbe::NotFound(msg) => Err(SwitchError::CliNotFound(msg.clone())),
            VersionProbe::Unparseable(msg) => Err(SwitchError::ConfigError(msg.clone())),
        }
    }

    fn login(&self, profile: &str) -> Result<()> {
        let status = self.run_interactive(&["sso", "login", "--profile", profile])?;
        if status.success() {
            Ok(())
        } else {
            Err(SwitchError::ConfigError(format!(
                "'{} sso login --profile {}' exited with {}",
                self.program, profile, status
            )))
        }
    }

    fn masked_key_suffixes(&self, profile: &str) -> Result<Option<(String, String)>> {
        let output = self.run_captured(&["configure", "list", "--profile", profile])?;
        let text = format!(
            "{}{}",
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );

        if text.contains("session associated with this profile has expired") {
            return Err(SwitchError::StaleSession(profile.to_string()));
        }
        if !output.status.success() {
            tracing::debug!("'configure list' failed for {}: {}", profile, text.trim());
            return Ok(None);
        }

        Ok(parse_masked_suffixes(&text))
    }

    fn export_credentials(&self, profile: &str) -> Result<Option<CredentialSet>> {
        let output = self.run_captured(&["configure", "export-credentials", "--profile", profile])?;
        if !output.status.success() {
            tracing::debug!(
                "'configure export-credentials' failed for {}: {}",
                profile,
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        match serde_json::from_slice::<CachedCredentials>(&output.stdout) {
            Ok(creds) => Ok(Some(creds.into_credential_set())),
            Err(e) => {
                tracing::debug!("Unexpected export-credentials output for {}: {}", profile, e);
                Ok(None)
            }
        }
    }

    fn configure_sso(&self, profile: &str) -> Result<()> {
        let status = self.run_interactive(&["configure", "sso", "--profile", profile])?;
        if status.success() {
            Ok(())
        } else {
            Err(SwitchError::ConfigError(format!(
                "'{} configure sso --profile {}' exited with {}",
                self.program, profile, status
            )))
        }
    }
}

fn parse_major_version(text: &str) -> Option<u32> {
    let re = Regex::new(r"aws-cli/(\d+)\.").ok()?;
    re.captures(text)?[1].parse().ok()
}

/// Pull the last-4 characters shown after the masked key columns of
/// `aws configure list` output.
fn parse_masked_suffixes(text: &str) -> Option<(String, String)> {
    let access = Regex::new(r"access_key\s*\*+(.{4})").ok()?;
    let secret = Regex::new(r"secret_key\s*\*+(.{4})").ok()?;
    let access_suffix = access.captures(text)?[1].to_string();
    let secret_suffix = secret.captures(text)?[1].to_string();
    Some((access_suffix, secret_suffix))
}
