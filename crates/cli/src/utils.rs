use anyhow::{bail, Result};
use std::path::Path;

/// Refuse to clobber an existing file unless `force` is set.
pub fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }
    Ok(())
}
