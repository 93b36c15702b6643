//! Transport-agnostic request handling.

use serde_json::{Value, json};

use crate::error::RelayError;
use crate::mailer::Mailer;
use crate::submission::{Submission, build_notification};

/// Route accepting contact-form submissions.
pub const SEND_EMAIL_PATH: &str = "/api/send-email";

/// Liveness route.
pub const HEALTH_PATH: &str = "/api/health";

/// Headers sent with every response.
const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Options,
    Other,
}

impl Method {
    /// Parse a request method name, case-insensitively.
    pub fn parse(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "GET" => Method::Get,
            "POST" => Method::Post,
            "OPTIONS" => Method::Options,
            _ => Method::Other,
        }
    }
}

/// An incoming request, stripped down to what the relay looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    pub method: Method,
    /// Request target; a query string is ignored when routing.
    pub path: String,
    pub body: Vec<u8>,
}

impl RelayRequest {
    pub fn new(method: Method, path: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            method,
            path: path.into(),
            body: body.into(),
        }
    }
}

/// Status plus optional JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: u16,
    pub body: Option<Value>,
}

impl RelayResponse {
    fn json(status: u16, body: Value) -> Self {
        Self {
            status,
            body: Some(body),
        }
    }

    fn empty(status: u16) -> Self {
        Self { status, body: None }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(status, json!({ "error": message.into() }))
    }

    /// The error response for a failed request.
    pub fn rejected(err: &RelayError) -> Self {
        Self::error(err.status(), err.to_string())
    }

    /// Response headers: CORS always, `Content-Type` when there is a body.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = CORS_HEADERS.to_vec();
        if self.body.is_some() {
            headers.push(("Content-Type", "application/json"));
        }
        headers
    }

    /// Serialized body, empty when there is none.
    pub fn body_bytes(&self) -> Vec<u8> {
        self.body
            .as_ref()
            .map(|body| body.to_string().into_bytes())
            .unwrap_or_default()
    }
}

/// Routes requests and relays valid submissions to the site owner.
#[derive(Debug)]
pub struct Relay<M> {
    mailer: M,
    /// Owner address; notifications go from and to it.
    owner: String,
}

impl<M: Mailer> Relay<M> {
    pub fn new(mailer: M, owner: impl Into<String>) -> Self {
        Self {
            mailer,
            owner: owner.into(),
        }
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    /// Produce the response for one request.
    pub fn handle(&self, request: &RelayRequest) -> RelayResponse {
        let path = request.path.split('?').next().unwrap_or_default();
        match (path, request.method) {
            (SEND_EMAIL_PATH, Method::Options) => RelayResponse::empty(200),
            (SEND_EMAIL_PATH, Method::Post) => match self.submit(&request.body) {
                Ok(()) => RelayResponse::json(
                    200,
                    json!({ "success": true, "message": "Email sent successfully" }),
                ),
                Err(err) => RelayResponse::rejected(&err),
            },
            (SEND_EMAIL_PATH, _) => RelayResponse::error(405, "Method not allowed"),
            (HEALTH_PATH, Method::Get) => {
                RelayResponse::json(200, json!({ "status": "Server is running" }))
            }
            (HEALTH_PATH, Method::Options) => RelayResponse::empty(200),
            (HEALTH_PATH, _) => RelayResponse::error(405, "Method not allowed"),
            _ => RelayResponse::error(404, "Not found"),
        }
    }

    /// Parse, validate and send one submission.
    ///
    /// An empty body is read as `{}`.
    pub fn submit(&self, body: &[u8]) -> Result<(), RelayError> {
        let submission: Submission = if body.iter().all(u8::is_ascii_whitespace) {
            Submission::default()
        } else {
            serde_json::from_slice(body).map_err(RelayError::InvalidBody)?
        };

        tracing::info!(
            name = submission.name.as_deref().unwrap_or_default(),
            email = submission.email.as_deref().unwrap_or_default(),
            subject = submission.subject.as_deref().unwrap_or_default(),
            "contact form submission received"
        );

        let notification = build_notification(&submission, &self.owner).inspect_err(|err| {
            tracing::warn!(error = %err, "rejected submission");
        })?;

        self.mailer.send(&notification).map_err(|err| {
            tracing::error!(error = %err, "failed to send notification");
            RelayError::from(err)
        })?;

        tracing::info!(reply_to = %notification.reply_to, "notification sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mailer::OutboxMailer;

    fn relay() -> Relay<OutboxMailer> {
        Relay::new(OutboxMailer::new(), "owner@example.com")
    }

    fn post(body: &str) -> RelayRequest {
        RelayRequest::new(Method::Post, SEND_EMAIL_PATH, body)
    }

    #[test]
    fn test_method_parse() {
        assert_eq!(Method::parse("post"), Method::Post);
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("Options"), Method::Options);
        assert_eq!(Method::parse("DELETE"), Method::Other);
    }

    #[test]
    fn test_valid_submission_sends_once() {
        let relay = relay();
        let response = relay.handle(&post(r#"{"name":"A","email":"a@b.com","message":"hi"}"#));
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            Some(json!({ "success": true, "message": "Email sent successfully" }))
        );

        let sent = relay.mailer().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].reply_to, "a@b.com");
        assert_eq!(sent[0].to, "owner@example.com");
        assert_eq!(sent[0].subject, "New Contact Form Submission from A");
    }

    #[test]
    fn test_missing_field_sends_nothing() {
        let relay = relay();
        let response = relay.handle(&post(r#"{"name":"A","message":"hi"}"#));
        assert_eq!(response.status, 400);
        assert_eq!(response.body, Some(json!({ "error": "Missing required fields" })));
        assert!(relay.mailer().sent().is_empty());
    }

    #[test]
    fn test_empty_body_is_missing_fields() {
        let relay = relay();
        let response = relay.handle(&post(""));
        assert_eq!(response.status, 400);
        assert_eq!(response.body, Some(json!({ "error": "Missing required fields" })));
    }

    #[test]
    fn test_malformed_json() {
        let relay = relay();
        let response = relay.handle(&post("{name:"));
        assert_eq!(response.status, 400);
        assert_eq!(response.body, Some(json!({ "error": "Invalid JSON body" })));
        assert!(relay.mailer().sent().is_empty());
    }

    #[test]
    fn test_preflight_is_empty_and_sends_nothing() {
        let relay = relay();
        let response = relay.handle(&RelayRequest::new(Method::Options, SEND_EMAIL_PATH, ""));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, None);
        assert!(response.body_bytes().is_empty());
        assert!(relay.mailer().sent().is_empty());
    }

    #[test]
    fn test_wrong_method() {
        let relay = relay();
        let response = relay.handle(&RelayRequest::new(Method::Get, SEND_EMAIL_PATH, ""));
        assert_eq!(response.status, 405);
        assert_eq!(response.body, Some(json!({ "error": "Method not allowed" })));
    }

    #[test]
    fn test_unknown_route() {
        let response = relay().handle(&RelayRequest::new(Method::Post, "/api/other", "{}"));
        assert_eq!(response.status, 404);
        assert_eq!(response.body, Some(json!({ "error": "Not found" })));
    }

    #[test]
    fn test_health() {
        let response = relay().handle(&RelayRequest::new(Method::Get, "/api/health?probe=1", ""));
        assert_eq!(response.status, 200);
        assert_eq!(response.body, Some(json!({ "status": "Server is running" })));
    }

    #[test]
    fn test_mail_failure_is_500() {
        let relay = relay();
        let response = relay.handle(&post(r#"{"name":"A","email":"not an address","message":"hi"}"#));
        assert_eq!(response.status, 500);
        let error = response.body.as_ref().and_then(|b| b["error"].as_str()).unwrap();
        assert!(error.starts_with("Failed to send email: "));
        assert!(relay.mailer().sent().is_empty());
    }

    #[test]
    fn test_body_errors_map_to_responses() {
        let too_large = RelayResponse::rejected(&RelayError::BodyTooLarge);
        assert_eq!(too_large.status, 413);
        assert_eq!(too_large.body, Some(json!({ "error": "Request body too large" })));

        let unreadable = RelayResponse::rejected(&RelayError::BodyRead(std::io::Error::other("reset")));
        assert_eq!(unreadable.status, 400);
        assert_eq!(unreadable.body, Some(json!({ "error": "Failed to read request body" })));
        assert_eq!(unreadable.headers().len(), 4);
    }

    #[test]
    fn test_headers() {
        let relay = relay();
        let json_headers = relay.handle(&RelayRequest::new(Method::Get, HEALTH_PATH, "")).headers();
        assert!(json_headers.contains(&("Access-Control-Allow-Origin", "*")));
        assert!(json_headers.contains(&("Access-Control-Allow-Methods", "POST, OPTIONS")));
        assert!(json_headers.contains(&("Access-Control-Allow-Headers", "Content-Type")));
        assert!(json_headers.contains(&("Content-Type", "application/json")));

        let preflight = relay
            .handle(&RelayRequest::new(Method::Options, SEND_EMAIL_PATH, ""))
            .headers();
        assert_eq!(preflight.len(), 3);
    }
}
