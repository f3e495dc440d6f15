use crate::error::Result;
use crate::expiry;
use crate::profiles::ProfileStore;

pub fn execute() -> Result<()> {
    let store = ProfileStore::new()?;

    let default = match store.get_default()? {
        Some(default) => default,
        None => {
            println!("No default profile set. Run 'switch-cloud' to pick one.");
            return Ok(());
        }
    };

    match default.profile {
        Some(name) => println!("Current default profile: {}", name),
        None => println!("Current default profile: unknown"),
    }
    if let Some(expiry) = default.expiry {
        println!("{}", expiry::expiry_notice(&expiry));
    }
    Ok(())
}
