//! HTTP client for the PSU relay processor
//!
//! The relay exposes `GET /switch` taking a JSON body
//! `{"index": <channel>, "state": <bool>}`. Any 2xx answer counts as done.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::power::{PowerState, PowerSwitch};

/// Default relay processor port
pub const DEFAULT_RELAY_PORT: u16 = 8001;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("relay I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("relay address {0} did not resolve")]
    Unresolved(String),
    #[error("failed to encode relay request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("malformed relay response: {0:?}")]
    MalformedResponse(String),
    #[error("relay answered with status {0}")]
    Status(u16),
}

#[derive(Debug, Serialize)]
struct SwitchRequest {
    index: u32,
    state: bool,
}

/// Relay processor switching one numbered power channel
#[derive(Debug, Clone)]
pub struct RelayClient {
    host: String,
    port: u16,
    index: u32,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(host: impl Into<String>, port: u16, index: u32, timeout: Duration) -> Self {
        Self {
            host: host.into(),
            port,
            index,
            timeout,
        }
    }

    pub const fn index(&self) -> u32 {
        self.index
    }

    /// Send one switch request and wait for the status line
    pub fn request(&self, state: PowerState) -> Result<(), RelayError> {
        let body = serde_json::to_string(&SwitchRequest {
            index: self.index,
            state: state.is_on(),
        })?;

        let addr = self.resolve()?;
        let mut stream = TcpStream::connect_timeout(&addr, self.timeout)?;
        stream.set_read_timeout(Some(self.timeout))?;
        stream.set_write_timeout(Some(self.timeout))?;

        write!(
            stream,
            "GET /switch HTTP/1.1\r\nHost: {}:{}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.host,
            self.port,
            body.len(),
            body
        )?;
        stream.flush()?;

        let mut status_line = String::new();
        BufReader::new(stream).read_line(&mut status_line)?;
        let status = parse_status(&status_line)?;
        if !(200..300).contains(&status) {
            return Err(RelayError::Status(status));
        }
        Ok(())
    }

    fn resolve(&self) -> Result<SocketAddr, RelayError> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| RelayError::Unresolved(format!("{}:{}", self.host, self.port)))
    }
}

impl PowerSwitch for RelayClient {
    type Error = RelayError;

    fn switch(&mut self, state: PowerState) -> Result<(), RelayError> {
        self.request(state)
    }
}

/// Parse the status code out of `HTTP/1.x NNN Reason`
fn parse_status(line: &str) -> Result<u16, RelayError> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or("");
    if !version.starts_with("HTTP/") {
        return Err(RelayError::MalformedResponse(line.trim_end().to_owned()));
    }
    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or_else(|| RelayError::MalformedResponse(line.trim_end().to_owned()))
}
