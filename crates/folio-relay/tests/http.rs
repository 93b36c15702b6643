//! End-to-end checks against a relay listening on a loopback port.

use std::sync::Arc;
use std::thread;

use folio_relay::{MAX_BODY_BYTES, OutboxMailer, Relay, RelayServer};
use ureq::Agent;

struct Running {
    server: Arc<RelayServer<OutboxMailer>>,
    handle: Option<thread::JoinHandle<()>>,
    base: String,
}

impl Running {
    fn start() -> Self {
        let relay = Relay::new(OutboxMailer::new(), "owner@example.com");
        let server = Arc::new(RelayServer::bind("127.0.0.1:0", relay).unwrap());
        let base = format!("http://{}", server.local_addr().unwrap());
        let serving = Arc::clone(&server);
        let handle = thread::spawn(move || serving.serve());
        Self {
            server,
            handle: Some(handle),
            base,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    fn sent(&self) -> usize {
        self.server.relay().mailer().sent().len()
    }
}

impl Drop for Running {
    fn drop(&mut self) {
        self.server.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

fn agent() -> Agent {
    Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .into()
}

#[test]
fn test_post_submission() {
    let running = Running::start();
    let mut response = agent()
        .post(&running.url("/api/send-email"))
        .header("Content-Type", "application/json")
        .send(r#"{"name":"A","email":"a@b.com","message":"hi","projectType":"Web"}"#)
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
    let body: serde_json::Value = response.body_mut().read_json().unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Email sent successfully");

    let sent = running.server.relay().mailer().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].reply_to, "a@b.com");
    assert!(sent[0].html.contains("Project Type:"));
}

#[test]
fn test_missing_fields_over_http() {
    let running = Running::start();
    let mut response = agent()
        .post(&running.url("/api/send-email"))
        .header("Content-Type", "application/json")
        .send(r#"{"name":"A","message":"hi"}"#)
        .unwrap();

    assert_eq!(response.status().as_u16(), 400);
    let body: serde_json::Value = response.body_mut().read_json().unwrap();
    assert_eq!(body["error"], "Missing required fields");
    assert_eq!(running.sent(), 0);
}

#[test]
fn test_preflight_over_http() {
    let running = Running::start();
    let mut response = agent()
        .options(&running.url("/api/send-email"))
        .call()
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    let headers = response.headers();
    assert_eq!(
        headers
            .get("access-control-allow-methods")
            .and_then(|v| v.to_str().ok()),
        Some("POST, OPTIONS")
    );
    assert_eq!(
        headers
            .get("access-control-allow-headers")
            .and_then(|v| v.to_str().ok()),
        Some("Content-Type")
    );
    assert!(response.body_mut().read_to_string().unwrap().is_empty());
    assert_eq!(running.sent(), 0);
}

#[test]
fn test_health_and_unknown_routes() {
    let running = Running::start();
    let agent = agent();

    let mut health = agent.get(&running.url("/api/health")).call().unwrap();
    assert_eq!(health.status().as_u16(), 200);
    let body: serde_json::Value = health.body_mut().read_json().unwrap();
    assert_eq!(body["status"], "Server is running");

    let missing = agent.get(&running.url("/nope")).call().unwrap();
    assert_eq!(missing.status().as_u16(), 404);

    let wrong = agent.delete(&running.url("/api/send-email")).call().unwrap();
    assert_eq!(wrong.status().as_u16(), 405);
}

fn submission_with_message_len(len: usize) -> String {
    format!(
        r#"{{"name":"A","email":"a@b.com","message":"{}"}}"#,
        "x".repeat(len)
    )
}

#[test]
fn test_long_message_is_delivered() {
    let running = Running::start();
    let body = submission_with_message_len(70 * 1024);
    assert!((body.len() as u64) < MAX_BODY_BYTES);

    let response = agent()
        .post(&running.url("/api/send-email"))
        .header("Content-Type", "application/json")
        .send(body.as_str())
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(running.sent(), 1);
}

#[test]
fn test_oversized_body_is_rejected() {
    let running = Running::start();
    let body = submission_with_message_len(MAX_BODY_BYTES as usize + 16);

    let mut response = agent()
        .post(&running.url("/api/send-email"))
        .header("Content-Type", "application/json")
        .send(body.as_str())
        .unwrap();

    assert_eq!(response.status().as_u16(), 413);
    let reply: serde_json::Value = response.body_mut().read_json().unwrap();
    assert_eq!(reply["error"], "Request body too large");
    assert_eq!(running.sent(), 0);
}
