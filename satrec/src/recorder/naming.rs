//! Output path and latest-alias derivation.
//!
//! Output files are named `<prefix>_<name>_<YYYYmmdd>_<HHMMSS>.<ext>`
//! with the timestamp rendered in the configured timezone. The latest
//! alias is a stable `<name>.<ext>` symlink next to the recordings
//! that always points at the most recent output file for that name.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::config::Settings;

/// Derive the destination file path for a capture started at `start`.
pub fn output_path(settings: &Settings, name: &str, start: DateTime<Utc>) -> PathBuf {
    let local = start.with_timezone(&settings.timezone);
    settings.recordings_dir.join(format!(
        "{}_{}_{}.{}",
        settings.file_prefix,
        name,
        local.format("%Y%m%d_%H%M%S"),
        settings.media_extension
    ))
}

/// Stable alias path for a name.
pub fn alias_path(settings: &Settings, name: &str) -> PathBuf {
    settings
        .recordings_dir
        .join(format!("{}.{}", name, settings.media_extension))
}

/// Replace the alias so it points at `target_name` (a file name in
/// the same directory; the link is relative, as the files may be on a
/// mount whose absolute path differs between host and container).
pub fn update_alias(alias: &Path, target_name: &str) -> std::io::Result<()> {
    match std::fs::symlink_metadata(alias) {
        Ok(_) => std::fs::remove_file(alias)?,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    #[cfg(unix)]
    return std::os::unix::fs::symlink(target_name, alias);

    #[cfg(windows)]
    return std::os::windows::fs::symlink_file(target_name, alias);

    #[cfg(not(any(unix, windows)))]
    {
        let _ = target_name;
        Err(std::io::Error::other("symlinks unsupported on this platform"))
    }
}
