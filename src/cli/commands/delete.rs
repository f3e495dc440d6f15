use crate::aws_cli::AwsCliTool;
use crate::error::Result;
use crate::profiles::ProfileStore;
use dialoguer::{theme::ColorfulTheme, Confirm, MultiSelect};

pub fn execute() -> Result<()> {
    let store = ProfileStore::new()?;
    let cli = AwsCliTool::new();

    let profiles = store.list_profiles(&cli)?;
    if profiles.is_empty() {
        println!("No profiles to delete.");
        return Ok(());
    }

    let theme = ColorfulTheme::default();
    let labels: Vec<String> = profiles.iter().map(|p| p.friendly_name()).collect();
    let picks = MultiSelect::with_theme(&theme)
        .with_prompt("Select profiles to delete")
        .items(&labels)
        .interact()?;

    if picks.is_empty() {
        println!("Nothing selected.");
        return Ok(());
    }

    let names: Vec<String> = picks.iter().map(|&i| profiles[i].name.clone()).collect();
    let confirmed = Confirm::with_theme(&theme)
        .with_prompt(format!("Delete {}?", names.join(", ")))
        .default(false)
        .interact()?;
    if !confirmed {
        return Ok(());
    }

    store.delete_profiles(&names)?;
    println!("✓ Deleted {}.", names.join(", "));
    Ok(())
}
