use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Resolve the server home directory into an absolute path.
///
/// `None` means "use the platform default" (`$HOME/<default_subdir>`, or
/// `%APPDATA%/<default_subdir>` on Windows). A leading `~` is expanded and
/// relative paths are anchored at the current directory.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let path = match configured {
        Some(raw) => expand_tilde(raw.trim())?,
        None => user_base_dir()?.join(default_subdir),
    };

    let path = if path.is_absolute() {
        path
    } else {
        env::current_dir()
            .context("current directory is not accessible")?
            .join(path)
    };

    if create {
        std::fs::create_dir_all(&path)
            .with_context(|| format!("cannot create home_dir {}", path.display()))?;
    }
    Ok(path)
}

fn expand_tilde(raw: &str) -> Result<PathBuf> {
    if raw == "~" {
        return user_base_dir();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => Ok(user_base_dir()?.join(rest)),
        None => Ok(PathBuf::from(raw)),
    }
}

fn user_base_dir() -> Result<PathBuf> {
    let var = if cfg!(windows) { "APPDATA" } else { "HOME" };
    env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("{var} is not set; configure server.home_dir explicitly"))
}
