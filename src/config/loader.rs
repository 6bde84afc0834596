// src/config/loader.rs

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::model::{EmailSettings, MailSettings, SettingsFile};
use crate::config::validate::settings_from_file;
use crate::errors::{Result, TaskmailError};
use crate::fs::FileSystem;
use crate::identity;
use crate::mail::MailAddress;

const APP_DIR: &str = "taskmail";
const FILE_NAME: &str = "config.toml";

/// Where the persisted settings layers live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigPaths {
    /// Machine-wide settings, read only.
    pub system: Option<PathBuf>,
    /// Per-user settings; this is the file `--configure` writes.
    pub user: Option<PathBuf>,
}

impl ConfigPaths {
    /// Platform defaults, with the user file optionally overridden
    /// (`--config <PATH>`).
    pub fn discover(user_override: Option<PathBuf>) -> Self {
        Self {
            system: default_system_path(),
            user: user_override.or_else(default_user_path),
        }
    }
}

/// `<config dir>/taskmail/config.toml` for the current user.
pub fn default_user_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_DIR).join(FILE_NAME))
}

#[cfg(windows)]
pub fn default_system_path() -> Option<PathBuf> {
    std::env::var_os("PROGRAMDATA").map(|d| PathBuf::from(d).join(APP_DIR).join(FILE_NAME))
}

#[cfg(not(windows))]
pub fn default_system_path() -> Option<PathBuf> {
    Some(PathBuf::from("/etc").join(APP_DIR).join(FILE_NAME))
}

/// Read a settings file without interpreting it.
///
/// A missing or unreadable file is an empty file; only malformed TOML is an
/// error.
pub fn read_settings_file(fs: &dyn FileSystem, path: &Path) -> Result<SettingsFile> {
    if !fs.exists(path) {
        debug!(file = %path.display(), "settings file not present");
        return Ok(SettingsFile::default());
    }

    let contents = match fs.read_to_string(path) {
        Ok(contents) => contents,
        Err(err) => {
            warn!(file = %path.display(), error = %err, "cannot read settings file; ignoring it");
            return Ok(SettingsFile::default());
        }
    };

    toml::from_str(&contents)
        .map_err(|e| TaskmailError::Config(format!("{}: {e}", path.display())))
}

/// Load one settings layer from `path`.
pub fn load_layer(fs: &dyn FileSystem, path: &Path) -> Result<EmailSettings> {
    let file = read_settings_file(fs, path)?;
    Ok(settings_from_file(file, path))
}

/// Lowest layer: send as `<user>@<machine>` with the user as display name.
pub fn system_defaults() -> EmailSettings {
    let user = identity::user_name();
    let from = MailAddress::parse(&format!("{user}@{}", identity::machine_name()))
        .map(|a| a.with_display_name(user));
    EmailSettings::new(None, from, None)
}

/// Merge defaults, the system file, the user file and the command line, in
/// that order of increasing priority. No completeness check.
pub fn merge_layers(
    fs: &dyn FileSystem,
    paths: &ConfigPaths,
    defaults: EmailSettings,
    cmdline: &EmailSettings,
) -> Result<EmailSettings> {
    let mut settings = defaults;

    for path in [&paths.system, &paths.user].into_iter().flatten() {
        settings = settings.merge_in(load_layer(fs, path)?);
    }

    Ok(settings.merge_in(cmdline.clone()))
}

/// Resolve the settings to use for this run and check they are complete.
pub fn resolve(
    fs: &dyn FileSystem,
    paths: &ConfigPaths,
    cmdline: &EmailSettings,
) -> Result<MailSettings> {
    let merged = merge_layers(fs, paths, system_defaults(), cmdline)?;
    MailSettings::try_from(merged)
}

/// The user file with the command-line settings merged in, rendered as
/// TOML, and the path it belongs at. Nothing is written.
///
/// Fields not given on the command line keep whatever the file already had.
pub fn updated_user_settings(
    fs: &dyn FileSystem,
    paths: &ConfigPaths,
    cmdline: &EmailSettings,
) -> Result<(PathBuf, String)> {
    let path = paths.user.clone().ok_or_else(|| {
        TaskmailError::Config("cannot determine a user configuration directory; use --config".to_string())
    })?;

    let mut file = read_settings_file(fs, &path)?;
    if let Some(host) = &cmdline.host {
        file.host = Some(host.clone());
    }
    if let Some(from) = &cmdline.from {
        file.from = Some(from.to_string());
    }
    if let Some(to) = &cmdline.to {
        file.to = Some(to.to_string());
    }

    let text = toml::to_string_pretty(&file)?;
    Ok((path, text))
}

/// Persist the command-line settings into the user file.
pub fn write_user_settings(
    fs: &dyn FileSystem,
    paths: &ConfigPaths,
    cmdline: &EmailSettings,
) -> Result<PathBuf> {
    let (path, text) = updated_user_settings(fs, paths, cmdline)?;
    fs.write(&path, text.as_bytes())?;
    debug!(file = %path.display(), "wrote user settings");

    Ok(path)
}
