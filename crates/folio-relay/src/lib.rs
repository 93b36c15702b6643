//! Contact-form mail relay.
//!
//! A submission is validated and escaped into an HTML notification by the
//! pure [`build_notification`], handed to a [`Mailer`], and the outcome is
//! mapped to an HTTP-style response by [`Relay::handle`]. [`RelayServer`]
//! adapts that handler to a real HTTP listener.

mod error;
mod handler;
mod mailer;
mod server;
mod submission;

pub use error::{MailError, RelayError, ServerError};
pub use handler::{HEALTH_PATH, Method, Relay, RelayRequest, RelayResponse, SEND_EMAIL_PATH};
pub use mailer::{Mailer, OutboxMailer, SmtpMailer};
pub use server::{MAX_BODY_BYTES, RelayServer};
pub use submission::{Notification, Submission, build_notification, build_notification_at, escape_html};
