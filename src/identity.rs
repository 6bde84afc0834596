// src/identity.rs

//! Who and where we are running, for e-mail headers and bodies.

use std::env;

/// Machine and user strings as they appear in notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub machine: String,
    pub user: String,
}

impl Identity {
    /// Identity of the current process.
    pub fn current() -> Self {
        Self {
            machine: machine_name(),
            user: qualified_user(),
        }
    }
}

/// Host name of this machine.
///
/// Falls back to `COMPUTERNAME` / `HOSTNAME` and finally `localhost` if the
/// OS call fails or returns something that is not UTF-8.
pub fn machine_name() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| non_empty_var("COMPUTERNAME"))
        .or_else(|| non_empty_var("HOSTNAME"))
        .unwrap_or_else(|| "localhost".to_string())
}

/// Login name of the current user.
pub fn user_name() -> String {
    non_empty_var("USER")
        .or_else(|| non_empty_var("USERNAME"))
        .unwrap_or_else(|| "unknown".to_string())
}

/// `DOMAIN\user` where a user domain is known (Windows), else `user`.
pub fn qualified_user() -> String {
    format_qualified_user(non_empty_var("USERDOMAIN").as_deref(), &user_name())
}

fn format_qualified_user(domain: Option<&str>, user: &str) -> String {
    match domain {
        Some(domain) => format!("{domain}\\{user}"),
        None => user.to_string(),
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
