// src/mail/message.rs

//! Subject and body of the notification e-mail.

use crate::exec::RunResult;
use crate::identity::Identity;
use crate::mail::MailAddress;

const SEPARATOR: &str =
    "------------------------------------------------------------------------";

/// A fully composed message, ready for a [`super::MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: MailAddress,
    pub to: MailAddress,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// Build the notification for one run.
    ///
    /// `command_line` is the display form of the target; `succeeded` is the
    /// policy's verdict on the exit code.
    pub fn compose(
        from: MailAddress,
        to: MailAddress,
        identity: &Identity,
        command_line: &str,
        result: &RunResult,
        succeeded: bool,
    ) -> Self {
        let status = if succeeded { "succeeded" } else { "failed" };
        let subject = format!("[{}] Task {status} : {command_line}", identity.machine);

        let mut lines = vec![
            format!("Computer: {}", identity.machine),
            format!("Username: {}", identity.user),
            format!("Command line: {command_line}"),
            format!("Exit code: {}", result.exit_code()),
        ];

        if result.has_output() {
            lines.extend([
                String::new(),
                "Output:".to_string(),
                SEPARATOR.to_string(),
                result.output().trim().to_string(),
                SEPARATOR.to_string(),
            ]);
        }

        Self {
            from,
            to,
            subject,
            body: lines.join("\r\n"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> Identity {
        Identity {
            machine: "build01".to_string(),
            user: "CORP\\ci".to_string(),
        }
    }

    fn addr(s: &str) -> MailAddress {
        MailAddress::parse(s).unwrap()
    }

    #[test]
    fn failure_without_output() {
        let email = Email::compose(
            addr("ci@example.com"),
            addr("ops@example.com"),
            &identity(),
            "backup.exe \"D:\\My Files\"",
            &RunResult::with_exit_code(5),
            false,
        );

        assert_eq!(email.subject, "[build01] Task failed : backup.exe \"D:\\My Files\"");
        assert_eq!(
            email.body,
            "Computer: build01\r\nUsername: CORP\\ci\r\nCommand line: backup.exe \"D:\\My Files\"\r\nExit code: 5"
        );
    }

    #[test]
    fn success_with_output_includes_trimmed_block() {
        let email = Email::compose(
            addr("ci@example.com"),
            addr("ops@example.com"),
            &identity(),
            "sync",
            &RunResult::new(0, "\n  copied 3 files\nwarning: slow disk\n"),
            true,
        );

        assert_eq!(email.subject, "[build01] Task succeeded : sync");
        let expected_tail = format!(
            "Exit code: 0\r\n\r\nOutput:\r\n{SEPARATOR}\r\ncopied 3 files\nwarning: slow disk\r\n{SEPARATOR}"
        );
        assert!(email.body.ends_with(&expected_tail), "body was: {}", email.body);
    }
}
