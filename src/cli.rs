// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `-h` is the mail host, so clap's automatic `-h` help flag is disabled
//! and help is `--help` only.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

use crate::config::{EmailSettings, switch_address};
use crate::errors::{Result, TaskmailError};
use crate::exec::TargetCommand;
use crate::policy::{ExitRangeSet, NotificationPolicy};
use crate::types::SendMode;

/// Command-line arguments for `taskmail`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskmail",
    version,
    about = "Run a command and e-mail its output when it fails or prints something.",
    long_about = None,
    disable_help_flag = true,
    override_usage = "taskmail [OPTIONS] -- <COMMAND> [ARGS]..."
)]
pub struct CliArgs {
    /// SMTP relay host, optionally `host:port`.
    #[arg(short = 'h', long, value_name = "HOST")]
    pub host: Option<String>,

    /// Sender address, e.g. `Build Bot <bot@example.com>`.
    #[arg(short = 'f', long, value_name = "ADDRESS")]
    pub from: Option<String>,

    /// Recipient address.
    #[arg(short = 't', long, value_name = "ADDRESS")]
    pub to: Option<String>,

    /// Save the given host/from/to to the user settings file.
    #[arg(short = 'c', long)]
    pub configure: bool,

    /// Exit codes that count as success, e.g. `0,2,10-20`.
    #[arg(short = 's', long, value_name = "LIST", default_value = "0")]
    pub success_codes: String,

    /// When to send an e-mail (on-failure, on-failure-or-output, always).
    #[arg(short = 'm', long, value_name = "MODE", default_value = "on-failure-or-output")]
    pub send_mode: SendMode,

    /// User settings file to read (and write with `--configure`).
    ///
    /// Default: `<config dir>/taskmail/config.toml`.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKMAIL_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Resolve settings and print what would run, without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// The command to run and its arguments (after `--`).
    #[arg(last = true, value_name = "COMMAND")]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Validated view of the switches.
#[derive(Debug, Clone)]
pub struct Invocation {
    /// Settings given on the command line (highest priority layer).
    pub settings: EmailSettings,
    pub configure: bool,
    pub dry_run: bool,
    pub config_path: Option<PathBuf>,
    pub policy: NotificationPolicy,
    /// `None` only when `--configure` was given without a command.
    pub target: Option<TargetCommand>,
}

impl CliArgs {
    /// Check switch values and turn them into an [`Invocation`].
    ///
    /// All failures are argument errors.
    pub fn into_invocation(self) -> Result<Invocation> {
        let from = self
            .from
            .as_deref()
            .map(|v| switch_address(v, "from"))
            .transpose()?;
        let to = self
            .to
            .as_deref()
            .map(|v| switch_address(v, "to"))
            .transpose()?;
        let success_codes = ExitRangeSet::parse_list(&self.success_codes)?;

        let target = TargetCommand::from_argv(self.command);
        if target.is_none() && !self.configure {
            return Err(TaskmailError::argument("No program to run was specified"));
        }

        Ok(Invocation {
            settings: EmailSettings::new(self.host, from, to),
            configure: self.configure,
            dry_run: self.dry_run,
            config_path: self.config,
            policy: NotificationPolicy::new(success_codes, self.send_mode),
            target,
        })
    }
}

/// Parse the process arguments.
pub fn try_parse() -> std::result::Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse an explicit argument list (first item is the binary name).
pub fn try_parse_from<I, T>(args: I) -> std::result::Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
