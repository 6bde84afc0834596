// src/mail/transport.rs

//! Delivering a composed [`Email`].
//!
//! [`MailTransport`] is the seam between the orchestration and the network:
//! production uses [`SmtpTransport`], tests swap in a recording fake.
//!
//! `SmtpTransport` speaks just enough plain SMTP (RFC 5321) to hand one
//! message to a relay: no TLS, no AUTH. That matches the usual deployment of
//! an internal relay that accepts mail from the local network.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::{debug, info};

use crate::errors::{Result, TaskmailError};
use crate::mail::address::MailAddress;
use crate::mail::message::Email;

pub const DEFAULT_SMTP_PORT: u16 = 25;
const REPLY_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait abstracting how a composed e-mail is delivered.
pub trait MailTransport: Send {
    fn send<'a>(
        &'a mut self,
        email: &'a Email,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>>;
}

/// Plain SMTP client for a single relay host.
#[derive(Debug, Clone)]
pub struct SmtpTransport {
    host: String,
    port: u16,
    helo_name: String,
    timeout: Duration,
}

impl SmtpTransport {
    /// `host` is `name` or `name:port`; `helo_name` is what we announce in
    /// `EHLO` (normally the machine name).
    pub fn new(host: &str, helo_name: impl Into<String>) -> Result<Self> {
        let (host, port) = split_host_port(host)?;
        Ok(Self {
            host,
            port,
            helo_name: helo_name.into(),
            timeout: REPLY_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    async fn send_inner(&self, email: &Email) -> Result<()> {
        info!(host = %self.host, port = self.port, to = %email.to, "sending notification e-mail");

        let stream = tokio::time::timeout(
            self.timeout,
            TcpStream::connect((self.host.as_str(), self.port)),
        )
        .await
        .map_err(|_| mail_error(format!("timed out connecting to {}:{}", self.host, self.port)))?
        .map_err(|e| mail_error(format!("connecting to {}:{}: {e}", self.host, self.port)))?;

        deliver(stream, &self.helo_name, email, self.timeout).await
    }
}

impl MailTransport for SmtpTransport {
    fn send<'a>(
        &'a mut self,
        email: &'a Email,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + Send + 'a>> {
        Box::pin(self.send_inner(email))
    }
}

/// Run one SMTP transaction for `email` over an already connected stream.
pub async fn deliver<S>(stream: S, helo_name: &str, email: &Email, timeout: Duration) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut session = SmtpSession::new(stream, timeout);

    session.expect(220).await?;
    session.command(&format!("EHLO {helo_name}"), 250).await?;
    session
        .command(&format!("MAIL FROM:<{}>", email.from.address()), 250)
        .await?;
    session
        .command(&format!("RCPT TO:<{}>", email.to.address()), 250)
        .await?;
    session.command("DATA", 354).await?;
    session.write_raw(&render_data(email)).await?;
    session.command(".", 250).await?;

    // The message is accepted at this point; a failed QUIT is not worth
    // reporting.
    if let Err(e) = session.command("QUIT", 221).await {
        debug!(error = %e, "QUIT not acknowledged");
    }

    Ok(())
}

struct SmtpSession<S> {
    stream: BufReader<S>,
    timeout: Duration,
}

impl<S> SmtpSession<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    fn new(stream: S, timeout: Duration) -> Self {
        Self {
            stream: BufReader::new(stream),
            timeout,
        }
    }

    async fn command(&mut self, line: &str, expected: u16) -> Result<()> {
        debug!(command = %line, "smtp >");
        self.write_raw(&format!("{line}\r\n")).await?;
        self.expect(expected).await
    }

    async fn write_raw(&mut self, data: &str) -> Result<()> {
        let inner = self.stream.get_mut();
        inner.write_all(data.as_bytes()).await?;
        inner.flush().await?;
        Ok(())
    }

    async fn expect(&mut self, expected: u16) -> Result<()> {
        let (code, text) = self.read_reply().await?;
        debug!(code, reply = %text, "smtp <");
        if code == expected {
            Ok(())
        } else {
            Err(mail_error(format!(
                "expected {expected} from server, got {code} {text}"
            )))
        }
    }

    /// Read a (possibly multi-line) reply and return its code and the text
    /// of the last line.
    async fn read_reply(&mut self) -> Result<(u16, String)> {
        loop {
            let mut line = String::new();
            let read = tokio::time::timeout(self.timeout, self.stream.read_line(&mut line))
                .await
                .map_err(|_| mail_error("timed out waiting for server reply"))??;
            if read == 0 {
                return Err(mail_error("connection closed by server"));
            }

            let line = line.trim_end_matches(['\r', '\n']);
            let code = line
                .get(..3)
                .and_then(|c| c.parse::<u16>().ok())
                .ok_or_else(|| mail_error(format!("malformed server reply: {line:?}")))?;

            // "250-..." continues, "250 ..." (or bare "250") ends the reply.
            if line.as_bytes().get(3) != Some(&b'-') {
                return Ok((code, line.get(4..).unwrap_or_default().to_string()));
            }
        }
    }
}

/// Headers and dot-stuffed body, CRLF line endings, without the final `.`.
fn render_data(email: &Email) -> String {
    let mut data = String::new();
    data.push_str(&format!("From: {}\r\n", encode_address(&email.from)));
    data.push_str(&format!("To: {}\r\n", encode_address(&email.to)));
    data.push_str(&format!("Subject: {}\r\n", encode_header(&email.subject)));
    data.push_str("MIME-Version: 1.0\r\n");
    data.push_str("Content-Type: text/plain; charset=utf-8\r\n");
    data.push_str("Content-Transfer-Encoding: 8bit\r\n");
    data.push_str("\r\n");

    for line in email.body.split('\n') {
        let line = line.strip_suffix('\r').unwrap_or(line);
        if line.starts_with('.') {
            data.push('.');
        }
        data.push_str(line);
        data.push_str("\r\n");
    }

    data
}

/// Address header value; a non-ASCII display name becomes encoded words.
fn encode_address(addr: &MailAddress) -> String {
    if addr.display_name().is_ascii() {
        addr.to_string()
    } else {
        format!("{} <{}>", encode_header(addr.display_name()), addr.address())
    }
}

/// Single-line header value; RFC 2047 encoded words when not plain ASCII.
fn encode_header(value: &str) -> String {
    let value: String = value
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();

    if value.is_ascii() {
        return value;
    }

    // Keep each encoded word under the 75 character limit.
    const CHUNK_BYTES: usize = 45;
    let mut words = Vec::new();
    let mut chunk = String::new();
    for c in value.chars() {
        if chunk.len() + c.len_utf8() > CHUNK_BYTES {
            words.push(format!("=?utf-8?B?{}?=", STANDARD.encode(&chunk)));
            chunk.clear();
        }
        chunk.push(c);
    }
    if !chunk.is_empty() {
        words.push(format!("=?utf-8?B?{}?=", STANDARD.encode(&chunk)));
    }

    words.join("\r\n ")
}

fn split_host_port(host: &str) -> Result<(String, u16)> {
    let host = host.trim();
    let invalid = || TaskmailError::argument(format!("Invalid mail host: \"{host}\""));

    if host.is_empty() {
        return Err(invalid());
    }

    // "[::1]:2525" or "[::1]"
    if let Some(rest) = host.strip_prefix('[') {
        let (addr, tail) = rest.split_once(']').ok_or_else(invalid)?;
        let port = match tail.strip_prefix(':') {
            Some(p) => p.parse().map_err(|_| invalid())?,
            None if tail.is_empty() => DEFAULT_SMTP_PORT,
            None => return Err(invalid()),
        };
        return Ok((addr.to_string(), port));
    }

    match host.split_once(':') {
        Some((name, port)) if !name.is_empty() && !port.contains(':') => {
            Ok((name.to_string(), port.parse().map_err(|_| invalid())?))
        }
        Some(_) => Err(invalid()),
        None => Ok((host.to_string(), DEFAULT_SMTP_PORT)),
    }
}

fn mail_error(msg: impl Into<String>) -> TaskmailError {
    TaskmailError::Mail(msg.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, duplex};

    fn email(subject: &str, body: &str) -> Email {
        Email {
            from: MailAddress::parse("CI <ci@example.com>").unwrap(),
            to: MailAddress::parse("ops@example.com").unwrap(),
            subject: subject.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn host_port_parsing() {
        assert_eq!(
            split_host_port("mail.example.com").unwrap(),
            ("mail.example.com".to_string(), 25)
        );
        assert_eq!(
            split_host_port("mail.example.com:2525").unwrap(),
            ("mail.example.com".to_string(), 2525)
        );
        assert_eq!(split_host_port("[::1]:587").unwrap(), ("::1".to_string(), 587));
        assert_eq!(split_host_port("[::1]").unwrap(), ("::1".to_string(), 25));

        for bad in ["", ":25", "mail:port", "mail:99999", "[::1", "a:b:c"] {
            assert!(split_host_port(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn ascii_subject_is_left_alone() {
        assert_eq!(encode_header("[build01] Task failed : a"), "[build01] Task failed : a");
    }

    #[test]
    fn header_newlines_are_flattened() {
        assert_eq!(encode_header("a\r\nBcc: x"), "a  Bcc: x");
    }

    #[test]
    fn non_ascii_subject_is_encoded() {
        let encoded = encode_header("Tâche échouée");
        assert!(encoded.starts_with("=?utf-8?B?"));
        assert!(encoded.ends_with("?="));
        assert!(encoded.is_ascii());
    }

    #[test]
    fn data_is_dot_stuffed_with_crlf() {
        let data = render_data(&email("s", "line one\n.hidden\r\nend"));
        assert!(data.contains("Subject: s\r\n"));
        assert!(data.contains("From: CI <ci@example.com>\r\n"));
        assert!(data.ends_with("\r\n\r\nline one\r\n..hidden\r\nend\r\n"));
    }

    #[test]
    fn non_ascii_display_names_are_encoded() {
        let mut message = email("s", "body");
        message.from = MailAddress::parse("José <jose@example.com>").unwrap();
        let data = render_data(&message);

        let (headers, _) = data.split_once("\r\n\r\n").unwrap();
        assert!(headers.is_ascii(), "{headers}");
        assert!(headers.contains("From: =?utf-8?B?"));
        assert!(headers.contains("?= <jose@example.com>\r\n"));
        assert!(headers.contains("To: ops@example.com\r\n"));
    }

    #[test]
    fn display_name_cannot_add_headers() {
        let mut message = email("s", "body");
        message.to = MailAddress::parse("ops@example.com")
            .unwrap()
            .with_display_name("Ops\r\nBcc: evil@attacker.com");
        let data = render_data(&message);

        let (headers, _) = data.split_once("\r\n\r\n").unwrap();
        assert!(!headers.lines().any(|l| l.starts_with("Bcc:")), "{headers}");
        assert!(headers.contains("To: \"Ops  Bcc: evil@attacker.com\" <ops@example.com>\r\n"));
    }

    /// Minimal scripted SMTP server on the other end of a duplex pipe.
    async fn fake_server(
        stream: tokio::io::DuplexStream,
        rcpt_reply: &'static str,
    ) -> Vec<String> {
        let (read, mut write) = tokio::io::split(stream);
        let mut reader = BufReader::new(read);
        let mut received = Vec::new();

        write.write_all(b"220 fake ESMTP\r\n").await.unwrap();
        let mut in_data = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).await.unwrap() == 0 {
                break;
            }
            let line = line.trim_end().to_string();
            received.push(line.clone());

            let reply: &[u8] = if in_data {
                if line == "." {
                    in_data = false;
                    b"250 queued\r\n"
                } else {
                    continue;
                }
            } else if line.starts_with("EHLO") {
                b"250-fake\r\n250 8BITMIME\r\n"
            } else if line.starts_with("RCPT") {
                rcpt_reply.as_bytes()
            } else if line == "DATA" {
                in_data = true;
                b"354 go ahead\r\n"
            } else if line == "QUIT" {
                write.write_all(b"221 bye\r\n").await.unwrap();
                break;
            } else {
                b"250 ok\r\n"
            };
            write.write_all(reply).await.unwrap();
        }

        // Drain anything left so the client never blocks on write.
        let mut rest = Vec::new();
        let _ = reader.read_to_end(&mut rest).await;
        received
    }

    #[tokio::test]
    async fn delivers_a_message() {
        let (client, server) = duplex(64 * 1024);
        let server = tokio::spawn(fake_server(server, "250 ok\r\n"));

        deliver(client, "build01", &email("hello", "body"), REPLY_TIMEOUT)
            .await
            .unwrap();

        let received = server.await.unwrap();
        assert_eq!(received[0], "EHLO build01");
        assert_eq!(received[1], "MAIL FROM:<ci@example.com>");
        assert_eq!(received[2], "RCPT TO:<ops@example.com>");
        assert_eq!(received[3], "DATA");
        assert!(received.contains(&"Subject: hello".to_string()));
        assert!(received.contains(&"body".to_string()));
        assert_eq!(received.last().unwrap(), "QUIT");
    }

    #[tokio::test]
    async fn rejected_recipient_is_a_mail_error() {
        let (client, server) = duplex(64 * 1024);
        let server = tokio::spawn(fake_server(server, "550 no such user\r\n"));

        let err = deliver(client, "build01", &email("s", "b"), REPLY_TIMEOUT)
            .await
            .unwrap_err();

        assert!(matches!(err, TaskmailError::Mail(_)), "got {err:?}");
        assert!(err.to_string().contains("550"));
        drop(server);
    }
}
