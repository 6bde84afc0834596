// src/exec/target.rs

use crate::exec::escape::{display_command_line, escape_arguments};

/// The program to launch plus its arguments, exactly as given after `--`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetCommand {
    argv: Vec<String>,
}

impl TargetCommand {
    pub fn new(program: impl Into<String>, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut argv = vec![program.into()];
        argv.extend(args.into_iter().map(Into::into));
        Self { argv }
    }

    /// `None` when `argv` is empty.
    pub fn from_argv(argv: Vec<String>) -> Option<Self> {
        if argv.is_empty() {
            None
        } else {
            Some(Self { argv })
        }
    }

    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Readable form for e-mails and logs.
    pub fn display(&self) -> String {
        display_command_line(&self.argv)
    }

    /// Fully escaped form as parsed by `cmd.exe` / the MSVC runtime.
    pub fn escaped(&self) -> String {
        escape_arguments(&self.argv)
    }
}
