// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod identity;
pub mod logging;
pub mod mail;
pub mod policy;
pub mod types;

use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigPaths, EmailSettings, MailSettings};
use crate::errors::Result;
use crate::exec::{ProcessRunner, RunnerBackend, TargetCommand};
use crate::fs::RealFileSystem;
use crate::identity::Identity;
use crate::mail::{Email, MailTransport, SmtpTransport};
use crate::policy::NotificationPolicy;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - switch validation
/// - `--configure` write-back (printed instead under `--dry-run`)
/// - settings resolution (defaults, system file, user file, switches)
/// - the process runner and the SMTP transport
///
/// Returns the exit code the tool should exit with.
pub async fn run(args: CliArgs) -> Result<i32> {
    let invocation = args.into_invocation()?;
    let fs = RealFileSystem;
    let paths = ConfigPaths::discover(invocation.config_path.clone());

    if invocation.configure {
        if invocation.dry_run {
            let (path, text) = config::updated_user_settings(&fs, &paths, &invocation.settings)?;
            println!("taskmail dry-run: would write {}", path.display());
            print!("{text}");
        } else {
            let path = config::write_user_settings(&fs, &paths, &invocation.settings)?;
            info!(file = %path.display(), "saved e-mail settings");
        }
    }

    let Some(target) = invocation.target else {
        return Ok(0);
    };

    if invocation.dry_run {
        let merged = config::merge_layers(
            &fs,
            &paths,
            config::system_defaults(),
            &invocation.settings,
        )?;
        print_dry_run(&merged, &invocation.policy, &target);
        return Ok(0);
    }

    // Settings are checked before launching anything, so a misconfigured
    // tool fails fast instead of after a long-running task.
    let settings = config::resolve(&fs, &paths, &invocation.settings)?;
    let identity = Identity::current();

    let mut runner = ProcessRunner::new();
    let mut transport = SmtpTransport::new(&settings.host, identity.machine.clone())?;

    execute(
        &target,
        &invocation.policy,
        &settings,
        &identity,
        &mut runner,
        &mut transport,
    )
    .await
}

/// Run `target`, decide whether to notify, send if so, and return the
/// target's exit code.
///
/// A target that could not be started is reported like any other failed
/// run. A failed delivery is an error: the caller exits with 1.
pub async fn execute<R, T>(
    target: &TargetCommand,
    policy: &NotificationPolicy,
    settings: &MailSettings,
    identity: &Identity,
    runner: &mut R,
    transport: &mut T,
) -> Result<i32>
where
    R: RunnerBackend,
    T: MailTransport,
{
    let result = runner.run(target).await?;
    let notify = policy.should_notify(&result);

    info!(
        exit_code = result.exit_code(),
        summary = %result,
        send_mode = %policy.send_mode,
        notify,
        "task finished"
    );

    if notify {
        let email = Email::compose(
            settings.from.clone(),
            settings.to.clone(),
            identity,
            &target.display(),
            &result,
            policy.is_success(&result),
        );
        transport.send(&email).await?;
        debug!(subject = %email.subject, "notification sent");
    }

    Ok(result.exit_code())
}

/// Dry-run output: resolved settings, policy and the command line.
fn print_dry_run(settings: &EmailSettings, policy: &NotificationPolicy, target: &TargetCommand) {
    fn or_unset(value: Option<String>) -> String {
        value.unwrap_or_else(|| "<unset>".to_string())
    }

    println!("taskmail dry-run");
    println!("  host = {}", or_unset(settings.host.clone()));
    println!("  from = {}", or_unset(settings.from.as_ref().map(ToString::to_string)));
    println!("  to = {}", or_unset(settings.to.as_ref().map(ToString::to_string)));
    println!("  success_codes = {}", policy.success_codes);
    println!("  send_mode = {}", policy.send_mode);
    println!();
    println!("command: {}", target.display());
    if cfg!(windows) {
        println!("cmd.exe: /C \"{}\"", target.escaped());
    }

    debug!("dry-run complete (no execution)");
}
