//! HTTP listener wrapping [`Relay`].

use std::io::Read;
use std::net::SocketAddr;

use tiny_http::{Header, Request, Response, Server};

use crate::error::{RelayError, ServerError};
use crate::handler::{Method, Relay, RelayRequest, RelayResponse};
use crate::mailer::Mailer;

/// Largest request body accepted; anything bigger is answered with 413.
pub const MAX_BODY_BYTES: u64 = 100 * 1024;

/// Read a whole body of at most `limit` bytes.
fn read_body<R: Read>(reader: R, limit: u64) -> Result<Vec<u8>, RelayError> {
    let mut body = Vec::new();
    reader
        .take(limit + 1)
        .read_to_end(&mut body)
        .map_err(RelayError::BodyRead)?;
    if body.len() as u64 > limit {
        return Err(RelayError::BodyTooLarge);
    }
    Ok(body)
}

/// Serves a [`Relay`] over HTTP, one request at a time.
pub struct RelayServer<M> {
    server: Server,
    relay: Relay<M>,
}

impl<M: Mailer> RelayServer<M> {
    /// Bind to `addr` (`host:port`; port 0 picks a free one).
    pub fn bind(addr: &str, relay: Relay<M>) -> Result<Self, ServerError> {
        let server = Server::http(addr).map_err(|err| ServerError::Bind {
            addr: addr.to_string(),
            message: err.to_string(),
        })?;
        Ok(Self { server, relay })
    }

    /// The bound address, if listening on TCP.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    pub fn relay(&self) -> &Relay<M> {
        &self.relay
    }

    /// Handle requests until [`shutdown`](Self::shutdown) is called.
    pub fn serve(&self) {
        if let Some(addr) = self.local_addr() {
            tracing::info!(%addr, "relay listening");
        }
        for request in self.server.incoming_requests() {
            self.respond(request);
        }
        tracing::info!("relay stopped");
    }

    /// Stop a running [`serve`](Self::serve) loop.
    pub fn shutdown(&self) {
        self.server.unblock();
    }

    fn respond(&self, mut request: Request) {
        let declared_too_large = request
            .body_length()
            .is_some_and(|len| len as u64 > MAX_BODY_BYTES);
        let body = if declared_too_large {
            Err(RelayError::BodyTooLarge)
        } else {
            read_body(request.as_reader(), MAX_BODY_BYTES)
        };

        let reply = match body {
            Ok(body) => {
                let relay_request = RelayRequest::new(
                    Method::parse(request.method().as_str()),
                    request.url(),
                    body,
                );
                self.relay.handle(&relay_request)
            }
            Err(err) => {
                tracing::warn!(error = %err, path = %request.url(), "unusable request body");
                RelayResponse::rejected(&err)
            }
        };
        tracing::debug!(
            method = %request.method(),
            path = %request.url(),
            status = reply.status,
            "handled request"
        );

        let mut response = Response::from_data(reply.body_bytes()).with_status_code(reply.status);
        for (name, value) in reply.headers() {
            if let Ok(header) = Header::from_bytes(name.as_bytes(), value.as_bytes()) {
                response.add_header(header);
            }
        }
        if let Err(err) = request.respond(response) {
            tracing::warn!(error = %err, "failed to write response");
        }
    }
}
