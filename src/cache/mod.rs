// Readers for the two cache directories maintained by the AWS CLI v2
mod cli;
mod session;

pub use cli::CliCredentialCache;
pub use session::SsoSessionCache;

use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// All JSON files directly under `dir`, sorted by file name so scan order
/// is deterministic across platforms.
fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|s| s.to_str()) == Some("json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
