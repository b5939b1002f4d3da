//! Minimal HTTP server exposing activities as JSON.
//!
//! Only the tiny request surface the viewer needs is implemented: a list
//! endpoint and a by-identifier activity endpoint. Connections are served
//! one at a time.

use crate::activity::store::ActivityStore;
use crate::error::StoreError;
use anyhow::Context;
use log::{debug, error, info};
use regex::Regex;
use std::net::{Ipv4Addr, SocketAddr};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Maximum size of an incoming request, in bytes.
const MAX_REQUEST_BYTES: usize = 4096;

/// Regex matching the request line of the requests we serve.
const REQUEST_LINE: &str = r"^GET ([^ ]+) HTTP/1\.[01]\r\n";

/// An HTTP response about to be written out.
struct Response {
    status: u16,
    reason: &'static str,
    body: Vec<u8>,
}

impl Response {
    /// Builds an OK response with the given JSON body.
    fn ok(body: Vec<u8>) -> Self {
        Self {
            status: 200,
            reason: "OK",
            body,
        }
    }

    /// Builds an error response with a JSON error body.
    fn error(status: u16, reason: &'static str) -> Self {
        Self {
            status,
            reason,
            body: format!("{{\"error\":\"{}\"}}", reason.to_ascii_lowercase()).into_bytes(),
        }
    }
}

/// HTTP server serving activities from a store.
pub struct Server<S: ActivityStore> {
    store: S,
    listener: TcpListener,
}

impl<S: ActivityStore> Server<S> {
    /// Binds a server over the given store, on the given port on all
    /// interfaces.
    pub async fn bind(store: S, port: u16) -> anyhow::Result<Self> {
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .with_context(|| format!("Failed to bind on port {port}"))?;
        Ok(Self { store, listener })
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        self.listener
            .local_addr()
            .context("Failed to get the local address of the listener")
    }

    /// Accepts and serves connections until the surrounding task is dropped.
    pub async fn serve(&self) -> anyhow::Result<()> {
        let re = Regex::new(REQUEST_LINE).unwrap();
        info!("Serving activities on {}", self.local_addr()?);
        loop {
            let (socket, addr) = self.listener.accept().await?;
            debug!("Request from: {addr}");
            if let Err(e) = self.handle(socket, &re).await {
                error!("Failed to serve request: {e:?}");
            }
        }
    }

    /// Serves a single connection.
    async fn handle(&self, mut socket: TcpStream, re: &Regex) -> anyhow::Result<()> {
        let mut buf = vec![0; MAX_REQUEST_BYTES];
        let len = socket.read(&mut buf).await?;
        let request = String::from_utf8_lossy(&buf[..len]);

        let response = match re.captures(&request) {
            Some(captures) => route(&self.store, &captures[1]),
            None => Response::error(400, "Bad Request"),
        };

        let header = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            response.status,
            response.reason,
            response.body.len()
        );
        socket.write_all(header.as_bytes()).await?;
        socket.write_all(&response.body).await?;
        socket.shutdown().await?;
        Ok(())
    }
}

/// Routes a request target to a response against the given store.
fn route<S: ActivityStore>(store: &S, target: &str) -> Response {
    if target == "/activities" {
        return match store.list() {
            Ok(ids) => json_response(&ids),
            Err(e) => {
                error!("Failed to list activities: {e}");
                Response::error(500, "Internal Server Error")
            }
        };
    }

    if let Some(raw) = target.strip_prefix("/activity?fit=") {
        let Some(id) = decode_query_value(raw) else {
            debug!("Undecodable query value: {raw}");
            return Response::error(400, "Bad Request");
        };
        return match store.load(&id) {
            Ok(activity) => json_response(&activity),
            Err(StoreError::NotFound(id)) => {
                debug!("No such activity: {id}");
                Response::error(404, "Not Found")
            }
            Err(StoreError::InvalidId(id)) => {
                debug!("Invalid activity identifier: {id}");
                Response::error(400, "Bad Request")
            }
            Err(e) => {
                error!("Failed to load activity {id}: {e}");
                Response::error(500, "Internal Server Error")
            }
        };
    }

    Response::error(404, "Not Found")
}

/// Decodes a percent-encoded query value, `+` included. Clients encode
/// reserved characters in identifiers, so the raw value cannot be compared
/// against store identifiers directly.
fn decode_query_value(value: &str) -> Option<String> {
    let bytes = value.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => decoded.push(b' '),
            b'%' => {
                let hex = std::str::from_utf8(bytes.get(i + 1..i + 3)?).ok()?;
                decoded.push(u8::from_str_radix(hex, 16).ok()?);
                i += 2;
            }
            b => decoded.push(b),
        }
        i += 1;
    }
    String::from_utf8(decoded).ok()
}

/// Serializes a value into an OK response.
fn json_response<T: serde::Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => Response::ok(body),
        Err(e) => {
            error!("Failed to encode response: {e}");
            Response::error(500, "Internal Server Error")
        }
    }
}
