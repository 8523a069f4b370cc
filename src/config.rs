//! Locations of the files the tools read.
//!
//! Every path can be given on the command line or through the environment;
//! `~` is expanded against `$HOME`.

use std::path::{Path, PathBuf};

pub const RANKING_DB_ENV: &str = "AMTOOLS_RANKING_DB";
pub const COMPDB_DIR_ENV: &str = "AMTOOLS_COMPDB_DIR";

/// Where the activity manager keeps its ranking database.
pub const DEFAULT_RANKING_DB: &str = "~/.kde/share/apps/activitymanager/activityranking/database";

/// Expand a leading `~` using `$HOME`. Paths are returned as given when
/// `$HOME` is unset or there is nothing to expand.
pub fn expand_home(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME");
    match (path, home) {
        ("~", Some(home)) => PathBuf::from(home),
        (path, Some(home)) if path.starts_with("~/") => PathBuf::from(home).join(&path[2..]),
        (path, _) => PathBuf::from(path),
    }
}

pub fn ranking_db_path(configured: Option<&str>) -> PathBuf {
    expand_home(configured.unwrap_or(DEFAULT_RANKING_DB))
}

/// An unset or empty directory means flags come from the built-in list.
pub fn compdb_dir(configured: Option<&str>) -> Option<PathBuf> {
    configured
        .map(str::trim)
        .filter(|dir| !dir.is_empty())
        .map(expand_home)
}

/// Directory the built-in flags are resolved against. Always absolute; a
/// relative directory is taken from the current one.
pub fn base_dir(configured: Option<&Path>) -> std::io::Result<PathBuf> {
    match configured {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        Some(dir) => Ok(std::env::current_dir()?.join(dir)),
        None => std::env::current_dir(),
    }
}
