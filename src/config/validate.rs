// src/config/validate.rs

use std::path::Path;

use tracing::warn;

use crate::config::model::{EmailSettings, MailSettings, SettingsFile};
use crate::errors::{Result, TaskmailError};
use crate::mail::MailAddress;

impl TryFrom<EmailSettings> for MailSettings {
    type Error = TaskmailError;

    fn try_from(settings: EmailSettings) -> std::result::Result<Self, Self::Error> {
        match settings {
            EmailSettings {
                host: Some(host),
                from: Some(from),
                to: Some(to),
            } => Ok(MailSettings { host, from, to }),
            _ => Err(TaskmailError::argument(
                "Not all e-mail settings have been provided",
            )),
        }
    }
}

/// Turn a settings file into a layer.
///
/// Addresses that don't parse are logged and dropped, so the field falls
/// through to the next layer down.
pub fn settings_from_file(file: SettingsFile, source: &Path) -> EmailSettings {
    let host = file.host.filter(|h| !h.trim().is_empty());
    let from = file.from.and_then(|s| lenient_address(&s, "from", source));
    let to = file.to.and_then(|s| lenient_address(&s, "to", source));
    EmailSettings::new(host, from, to)
}

/// Strict parse for a command-line switch value.
pub fn switch_address(value: &str, which: &str) -> Result<MailAddress> {
    MailAddress::parse(value).ok_or_else(|| {
        TaskmailError::argument(format!("Invalid '{which}' e-mail address: \"{value}\""))
    })
}

fn lenient_address(value: &str, field: &str, source: &Path) -> Option<MailAddress> {
    let parsed = MailAddress::parse(value);
    if parsed.is_none() {
        warn!(
            file = %source.display(),
            field,
            value,
            "ignoring invalid e-mail address in settings file"
        );
    }
    parsed
}
