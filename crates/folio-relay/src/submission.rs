//! Contact-form submissions and the notification built from them.

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::error::RelayError;

/// A contact-form submission as posted by the site.
///
/// Every field is optional at the wire level; [`build_notification`] decides
/// which ones are required.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub project_type: Option<String>,
    pub message: Option<String>,
}

/// An email ready to hand to a [`Mailer`](crate::Mailer).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub html: String,
}

/// Escape text for inclusion in an HTML body.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// A present, non-blank field.
fn field(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Build the owner notification for a submission received now.
pub fn build_notification(submission: &Submission, owner: &str) -> Result<Notification, RelayError> {
    build_notification_at(submission, owner, Local::now())
}

/// Build the owner notification for a submission.
///
/// Fails with [`RelayError::MissingFields`] unless name, email and message
/// are all present. The notification goes from the owner's account to
/// itself with the submitter as reply-to.
pub fn build_notification_at(
    submission: &Submission,
    owner: &str,
    received_at: DateTime<Local>,
) -> Result<Notification, RelayError> {
    let (Some(name), Some(email), Some(message)) = (
        field(&submission.name),
        field(&submission.email),
        field(&submission.message),
    ) else {
        return Err(RelayError::MissingFields);
    };

    let subject = match field(&submission.subject) {
        Some(subject) => subject.replace(['\r', '\n'], " "),
        None => format!("New Contact Form Submission from {}", name.replace(['\r', '\n'], " ")),
    };

    let rule = r#"<hr style="border: none; border-top: 1px solid #ddd; margin: 20px 0;">"#;
    let email_html = escape_html(email);

    let mut html = String::new();
    html.push_str(r#"<div style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">"#);
    html.push_str("<h2>New Contact Form Submission</h2>");
    html.push_str(rule);
    html.push_str(&format!("<p><strong>Name:</strong> {}</p>", escape_html(name)));
    html.push_str(&format!(
        r#"<p><strong>Email:</strong> <a href="mailto:{email_html}">{email_html}</a></p>"#
    ));
    if let Some(phone) = field(&submission.phone) {
        html.push_str(&format!("<p><strong>Phone:</strong> {}</p>", escape_html(phone)));
    }
    if let Some(subject) = field(&submission.subject) {
        html.push_str(&format!("<p><strong>Subject:</strong> {}</p>", escape_html(subject)));
    }
    if let Some(project_type) = field(&submission.project_type) {
        html.push_str(&format!(
            "<p><strong>Project Type:</strong> {}</p>",
            escape_html(project_type)
        ));
    }
    html.push_str(rule);
    html.push_str("<h3>Message:</h3>");
    let body = escape_html(message).replace("\r\n", "\n").replace('\n', "<br>");
    html.push_str(&format!("<p>{body}</p>"));
    html.push_str(rule);
    html.push_str(&format!(
        r#"<p style="color: #666; font-size: 12px;">This email was sent from your portfolio contact form on {}.</p>"#,
        received_at.format("%Y-%m-%d %H:%M:%S %:z")
    ));
    html.push_str("</div>");

    Ok(Notification {
        from: owner.to_string(),
        to: owner.to_string(),
        reply_to: email.trim().to_string(),
        subject,
        html,
    })
}
