use crate::aws_cli::AwsCliTool;
use crate::error::Result;
use crate::expiry;
use crate::profiles::ProfileStore;
use crate::resolver::CredentialResolver;
use dialoguer::{theme::ColorfulTheme, FuzzySelect};

pub async fn execute() -> Result<()> {
    let store = ProfileStore::new()?;
    let cli = AwsCliTool::new();

    print_banner(&store)?;

    let profiles = store.list_profiles(&cli)?;
    if profiles.is_empty() {
        println!("No profiles configured yet. Run 'switch-cloud create' to add one.");
        return Ok(());
    }

    let labels: Vec<String> = profiles.iter().map(|p| p.friendly_name()).collect();
    let selection = FuzzySelect::with_theme(&ColorfulTheme::default())
        .with_prompt("Choose a profile (type to filter)")
        .items(&labels)
        .default(0)
        .max_length(20)
        .interact_opt()?;

    let profile = match selection {
        Some(index) => &profiles[index],
        None => return Ok(()),
    };

    let resolver = CredentialResolver::new(&cli, &store)?;
    let creds = resolver.resolve(profile).await?;

    store.set_default(
        &creds,
        &profile.name,
        profile.region.as_deref().unwrap_or("us-east-1"),
    )?;

    println!("AWS profile {} successfully set up as default.", profile.name);
    Ok(())
}

fn print_banner(store: &ProfileStore) -> Result<()> {
    match store.get_default()? {
        Some(default) => match default.profile {
            Some(name) => {
                match default.expiry {
                    Some(expiry) => println!(
                        "\nCurrent default profile: {} ({})\n",
                        name,
                        expiry::expiry_notice(&expiry)
                    ),
                    None => println!("\nCurrent default profile: {}\n", name),
                }
                Ok(())
            }
            None => {
                print_unknown_banner();
                Ok(())
            }
        },
        None => {
            print_unknown_banner();
            Ok(())
        }
    }
}

fn print_unknown_banner() {
    println!(
        "\nCurrent default profile: unknown (pick one in the list below and we'll remember next time)\n"
    );
}
