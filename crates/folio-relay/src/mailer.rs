//! Outbound mail delivery.

use std::sync::{Mutex, PoisonError};

use lettre::{
    Message, SmtpTransport, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use crate::error::MailError;
use crate::submission::Notification;

/// Something that can deliver a [`Notification`].
pub trait Mailer: Send + Sync {
    fn send(&self, notification: &Notification) -> Result<(), MailError>;
}

/// Build the MIME message for a notification.
///
/// Fails if any address does not parse.
fn compose(notification: &Notification) -> Result<Message, MailError> {
    let message = Message::builder()
        .from(notification.from.parse::<Mailbox>()?)
        .to(notification.to.parse::<Mailbox>()?)
        .reply_to(notification.reply_to.parse::<Mailbox>()?)
        .subject(notification.subject.as_str())
        .header(ContentType::TEXT_HTML)
        .body(notification.html.clone())?;
    Ok(message)
}

/// Delivers through an authenticated SMTP relay over TLS.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl std::fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpMailer").finish_non_exhaustive()
    }
}

impl SmtpMailer {
    /// Connect lazily to `host`, authenticating as `user`.
    pub fn new(host: &str, user: &str, password: &str) -> Result<Self, MailError> {
        let transport = SmtpTransport::relay(host)?
            .credentials(Credentials::new(user.to_string(), password.to_string()))
            .build();
        Ok(Self { transport })
    }
}

impl Mailer for SmtpMailer {
    fn send(&self, notification: &Notification) -> Result<(), MailError> {
        let message = compose(notification)?;
        let response = self.transport.send(&message)?;
        tracing::debug!(code = %response.code(), "smtp accepted message");
        Ok(())
    }
}

/// Keeps notifications in memory instead of sending them.
///
/// Messages are still composed, so bad addresses fail the same way they
/// would over SMTP.
#[derive(Debug, Default)]
pub struct OutboxMailer {
    sent: Mutex<Vec<Notification>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, oldest first.
    pub fn sent(&self) -> Vec<Notification> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Mailer for OutboxMailer {
    fn send(&self, notification: &Notification) -> Result<(), MailError> {
        compose(notification)?;
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification.clone());
        Ok(())
    }
}
