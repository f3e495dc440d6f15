use crate::aws_cli::{AwsCli, AwsCliTool};
use crate::error::Result;
use crate::profiles::{validate_profile_name, NewProfile, NewProfileKind, ProfileStore};
use crate::regions;
use dialoguer::{theme::ColorfulTheme, Input, Select};

pub fn execute() -> Result<()> {
    let store = ProfileStore::new()?;
    let cli = AwsCliTool::new();
    cli.ensure_v2()?;

    let theme = ColorfulTheme::default();

    let kinds = [
        "Static credentials (access key + secret)",
        "SSO (federated login)",
    ];
    let kind = Select::with_theme(&theme)
        .with_prompt("Profile type")
        .items(&kinds)
        .default(0)
        .interact()?;

    let name: String = Input::with_theme(&theme)
        .with_prompt("Profile name")
        .validate_with(|input: &String| validate_profile_name(input).map_err(|e| e.to_string()))
        .interact_text()?;

    if kind == 1 {
        // The AWS CLI's own wizard collects the sso_* fields and writes the
        // config section itself.
        cli.configure_sso(&name)?;
        println!("✓ SSO profile '{}' configured.", name);
        return Ok(());
    }

    let access_key_id: String = Input::with_theme(&theme)
        .with_prompt("AWS access key id")
        .validate_with(non_empty)
        .interact_text()?;
    let secret_access_key: String = Input::with_theme(&theme)
        .with_prompt("AWS secret access key")
        .validate_with(non_empty)
        .interact_text()?;

    let labels: Vec<String> = regions::REGIONS.iter().map(regions::display_label).collect();
    let region_index = Select::with_theme(&theme)
        .with_prompt("Region")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact()?;

    store.create_profile(&NewProfile {
        name: name.clone(),
        region: regions::REGIONS[region_index].code.to_string(),
        kind: NewProfileKind::Static {
            access_key_id,
            secret_access_key,
        },
    })?;

    println!("✓ Profile '{}' created.", name);
    Ok(())
}

fn non_empty(input: &String) -> std::result::Result<(), String> {
    if input.trim().is_empty() {
        Err("A value is required.".to_string())
    } else {
        Ok(())
    }
}
