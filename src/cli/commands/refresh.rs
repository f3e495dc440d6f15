use crate::aws_cli::AwsCliTool;
use crate::error::{Result, SwitchError};
use crate::profiles::ProfileStore;
use crate::resolver::CredentialResolver;

pub async fn execute() -> Result<()> {
    let store = ProfileStore::new()?;
    let cli = AwsCliTool::new();

    let current = store
        .get_default()?
        .and_then(|d| d.profile)
        .ok_or_else(|| {
            SwitchError::ConfigError(
                "No default profile set yet. Run 'switch-cloud' to pick one first.".to_string(),
            )
        })?;

    let profile = store
        .list_profiles(&cli)?
        .into_iter()
        .find(|p| p.name == current)
        .ok_or_else(|| {
            SwitchError::ConfigError(format!(
                "Profile '{}' no longer exists in ~/.aws/config.",
                current
            ))
        })?;

    let resolver = CredentialResolver::new(&cli, &store)?;
    let creds = resolver.resolve(&profile).await?;

    store.set_default(
        &creds,
        &profile.name,
        profile.region.as_deref().unwrap_or("us-east-1"),
    )?;

    println!("✓ Refreshed credentials for default profile '{}'.", profile.name);
    Ok(())
}
