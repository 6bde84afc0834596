// src/mail/address.rs

//! E-mail address parsing.
//!
//! Accepts the two forms people actually type on a command line:
//!
//! - `joe.bloggs@example.com`
//! - `Joe Bloggs <joe.bloggs@example.com>` (the name may be quoted)

use std::fmt;
use std::str::FromStr;

use crate::errors::TaskmailError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MailAddress {
    display_name: String,
    user: String,
    host: String,
}

impl MailAddress {
    /// Parse `text`, returning `None` if it is not a usable address.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.chars().any(char::is_control) {
            return None;
        }

        let (display_name, addr) = match text.strip_suffix('>') {
            Some(rest) => {
                let (name, addr) = rest.rsplit_once('<')?;
                (unquote(name.trim())?, addr.trim())
            }
            None => (String::new(), text),
        };

        let (user, host) = split_addr_spec(addr)?;
        Some(Self {
            display_name,
            user: user.to_string(),
            host: host.to_string(),
        })
    }

    /// Address with an explicit display name. Control characters in
    /// `name` become spaces.
    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name
            .into()
            .chars()
            .map(|c| if c.is_control() { ' ' } else { c })
            .collect();
        self
    }

    /// `user@host`, without the display name.
    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Empty when the address was given without a name.
    pub fn display_name(&self) -> &str {
        &self.display_name
    }
}

impl fmt::Display for MailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.display_name.is_empty() {
            write!(f, "{}@{}", self.user, self.host)
        } else if needs_quoting(&self.display_name) {
            write!(
                f,
                "\"{}\" <{}@{}>",
                self.display_name.replace('\\', "\\\\").replace('"', "\\\""),
                self.user,
                self.host
            )
        } else {
            write!(f, "{} <{}@{}>", self.display_name, self.user, self.host)
        }
    }
}

impl FromStr for MailAddress {
    type Err = TaskmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| TaskmailError::argument(format!("Invalid e-mail address: \"{s}\"")))
    }
}

fn split_addr_spec(addr: &str) -> Option<(&str, &str)> {
    if addr.chars().any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | ',' | ';')) {
        return None;
    }

    let (user, host) = addr.rsplit_once('@')?;
    if user.is_empty() || host.is_empty() || user.contains('@') {
        return None;
    }
    if host.starts_with('.') || host.ends_with('.') || host.contains("..") {
        return None;
    }

    Some((user, host))
}

/// Strip surrounding quotes and resolve `\x` quoted pairs. An unquoted
/// name is returned as is; `None` for an unterminated quoted pair.
fn unquote(name: &str) -> Option<String> {
    let Some(inner) = name
        .strip_prefix('"')
        .and_then(|n| n.strip_suffix('"'))
    else {
        return Some(name.to_string());
    };

    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(chars.next()?);
        } else {
            out.push(c);
        }
    }
    Some(out)
}

fn needs_quoting(name: &str) -> bool {
    name.chars()
        .any(|c| matches!(c, '(' | ')' | '<' | '>' | '[' | ']' | ':' | ';' | '@' | '\\' | ',' | '.' | '"'))
}
