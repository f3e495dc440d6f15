use crate::aws_cli::AwsCliTool;
use crate::error::Result;
use crate::profiles::ProfileStore;

pub fn execute(format: &str) -> Result<()> {
    let store = ProfileStore::new()?;
    let cli = AwsCliTool::new();
    let profiles = store.list_profiles(&cli)?;

    if format == "json" {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("No profiles configured.");
        return Ok(());
    }

    println!("Configured profiles:\n");
    for profile in &profiles {
        match &profile.region {
            Some(region) => println!("  {} [{}]", profile.friendly_name(), region),
            None => println!("  {}", profile.friendly_name()),
        }
    }
    Ok(())
}
