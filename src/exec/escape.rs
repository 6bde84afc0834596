// src/exec/escape.rs

//! Re-quoting an argument vector into a single command line.
//!
//! Two variants:
//! - [`escape_arguments`] follows the MSVC runtime / `CommandLineToArgvW`
//!   parsing rules and is what actually gets handed to `cmd /C` on Windows.
//! - [`display_command_line`] is a readable approximation for e-mail
//!   subjects and logs: quote an argument only if it contains a space.

use std::sync::LazyLock;

use regex::Regex;

/// Backslashes (possibly none) immediately followed by a double quote.
static QUOTE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(\\*)""#).expect("quote-run pattern is valid"));

/// An argument containing whitespace, split into body and trailing
/// backslashes.
static NEEDS_QUOTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(.*\s.*?)(\\*)$").expect("needs-quotes pattern is valid")
});

/// Escape one argument.
///
/// An empty argument becomes `""`.
pub fn escape_argument(arg: &str) -> String {
    if arg.is_empty() {
        return "\"\"".to_string();
    }

    // `\"` -> `\\\"`: double the backslashes and escape the quote itself.
    let escaped = QUOTE_RUN.replace_all(arg, r"${1}\${0}");

    // Wrap in quotes if there is whitespace; trailing backslashes are
    // doubled so they don't escape the closing quote.
    NEEDS_QUOTES
        .replace(&escaped, "\"${1}${2}${2}\"")
        .into_owned()
}

/// Escape every argument and join them with single spaces.
pub fn escape_arguments<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| escape_argument(a.as_ref()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Human readable command line: arguments containing a space are wrapped in
/// double quotes, nothing else is touched.
pub fn display_command_line<S: AsRef<str>>(args: &[S]) -> String {
    args.iter()
        .map(|a| {
            let a = a.as_ref();
            if a.contains(' ') {
                format!("\"{a}\"")
            } else {
                a.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
