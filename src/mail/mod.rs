// src/mail/mod.rs

//! Notification e-mail: addresses, composition and delivery.

pub mod address;
pub mod message;
pub mod transport;

pub use address::MailAddress;
pub use message::Email;
pub use transport::{MailTransport, SmtpTransport};
