//! HTTP front end
//!
//! A small blocking HTTP/1.1 server that decodes client requests into
//! [`Bridge`] calls. One thread serves each connection; arguments travel as
//! JSON request bodies, on `GET` requests as well.
//!
//! | Method | Path | Body |
//! |---|---|---|
//! | `GET` | `/pixels` | |
//! | `PUT`/`GET` | `/arbitration` | `{"id"}` |
//! | `GET`/`POST` | `/absolutefade` | `{"rgb", "indexes", "fadetime"}` |
//! | `GET`/`POST` | `/multicommand` | `{"commandlist": [[indexes, rgb, fadetime]]}` |
//! | `GET`/`POST` | `/relativefade` | `{"magnitude", "indexes", "fadetime"}` |

use std::io::{self, Read, Write};
use std::net::{IpAddr, SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use log::{debug, info, warn};
use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::bridge::Bridge;
use crate::color::{Rgb, from_rgb};
use crate::command::FadeEntry;

const MAX_REQUEST_SIZE: usize = 64 * 1024;
const SOCKET_TIMEOUT: Duration = Duration::from_secs(10);

const ROUTES: [&str; 5] = [
    "/pixels",
    "/arbitration",
    "/absolutefade",
    "/multicommand",
    "/relativefade",
];

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Blocking HTTP listener
pub struct HttpServer {
    listener: TcpListener,
}

impl HttpServer {
    pub fn bind(address: &str) -> Result<Self, HttpError> {
        Ok(Self {
            listener: TcpListener::bind(address)?,
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, HttpError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections forever, serving each on its own thread
    pub fn serve(self, bridge: Bridge<'static>) -> Result<(), HttpError> {
        for stream in self.listener.incoming() {
            let stream = match stream {
                Ok(stream) => stream,
                Err(err) => {
                    warn!("HTTP accept error: {}", err);
                    continue;
                }
            };
            let bridge = bridge.clone();
            thread::spawn(move || {
                if let Err(err) = handle_connection(stream, &bridge) {
                    warn!("HTTP connection handling error: {}", err);
                }
            });
        }
        Ok(())
    }
}

/// Serve a single request on `stream`
pub fn handle_connection(mut stream: TcpStream, bridge: &Bridge<'_>) -> Result<(), HttpError> {
    stream.set_read_timeout(Some(SOCKET_TIMEOUT))?;
    stream.set_write_timeout(Some(SOCKET_TIMEOUT))?;
    let peer = stream.peer_addr()?.ip();

    let response = match read_request(&mut stream) {
        Ok(Some(request)) => route(&request, peer, bridge),
        Ok(None) => return Ok(()),
        Err(ReadError::Io(err)) => return Err(err.into()),
        Err(ReadError::Malformed(reason)) => Response::error("400 Bad Request", reason),
    };

    write_response(&mut stream, &response)?;
    Ok(())
}

struct Request {
    method: String,
    path: String,
    body: Vec<u8>,
}

#[derive(Debug)]
enum ReadError {
    Io(io::Error),
    Malformed(&'static str),
}

impl From<io::Error> for ReadError {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

/// Read the request head and body
///
/// Returns `None` if the peer closed the connection before sending anything.
fn read_request(stream: &mut impl Read) -> Result<Option<Request>, ReadError> {
    let mut buf = Vec::with_capacity(1024);
    let mut chunk = [0u8; 1024];

    // Read until we see the end of headers or the limit is reached.
    let header_end = loop {
        if let Some(idx) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break idx + 4;
        }
        if buf.len() >= MAX_REQUEST_SIZE {
            return Err(ReadError::Malformed("request headers too large"));
        }
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            if buf.is_empty() {
                return Ok(None);
            }
            return Err(ReadError::Malformed("malformed HTTP headers"));
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = core::str::from_utf8(&buf[..header_end])
        .map_err(|_| ReadError::Malformed("request is not valid UTF-8"))?;
    let mut lines = head.lines();
    let mut parts = lines.next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("").to_owned();
    let path = parts
        .next()
        .and_then(|target| target.split('?').next())
        .unwrap_or("")
        .to_owned();
    if method.is_empty() || path.is_empty() {
        return Err(ReadError::Malformed("malformed request line"));
    }

    let mut content_length = 0usize;
    for line in lines {
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                content_length = value
                    .trim()
                    .parse()
                    .map_err(|_| ReadError::Malformed("invalid Content-Length"))?;
            }
        }
    }

    let request_len = header_end
        .checked_add(content_length)
        .filter(|len| *len <= MAX_REQUEST_SIZE)
        .ok_or(ReadError::Malformed("request body too large"))?;
    while buf.len() < request_len {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Err(ReadError::Malformed("truncated HTTP request body"));
        }
        buf.extend_from_slice(&chunk[..n]);
    }

    Ok(Some(Request {
        method,
        path,
        body: buf[header_end..request_len].to_vec(),
    }))
}

#[derive(Debug, Deserialize)]
struct ArbitrationBody {
    id: String,
}

#[derive(Debug, Deserialize)]
struct AbsoluteFadeBody {
    rgb: [u8; 3],
    indexes: Vec<usize>,
    #[serde(default)]
    fadetime: f64,
}

#[derive(Debug, Deserialize)]
struct MultiCommandBody {
    commandlist: Vec<(Vec<usize>, [u8; 3], f64)>,
}

#[derive(Debug, Deserialize)]
struct RelativeFadeBody {
    magnitude: f32,
    indexes: Vec<usize>,
    #[serde(default)]
    fadetime: f64,
}

fn route(request: &Request, peer: IpAddr, bridge: &Bridge<'_>) -> Response {
    let address = peer.to_string();
    debug!("{} {} from {}", request.method, request.path, address);

    match (request.method.as_str(), request.path.as_str()) {
        ("GET", "/pixels") => {
            info!("sending pixels to {}", address);
            let pixels: Vec<[u8; 3]> = bridge
                .pixels()
                .pixels
                .iter()
                .map(|p| [p.r, p.g, p.b])
                .collect();
            Response::json(&pixels)
        }
        ("PUT", "/arbitration") => with_body(request, |body: ArbitrationBody| {
            info!("giving arbitration to {} from {}", body.id, address);
            bridge.claim_arbitration(&body.id, &address);
            Response::null()
        }),
        ("GET", "/arbitration") => with_body(request, |body: ArbitrationBody| {
            debug!("sending arbitration to {} for {}", address, body.id);
            Response::json(&bridge.check_arbitration(&body.id, &address))
        }),
        ("GET" | "POST", "/absolutefade") => with_body(request, |body: AbsoluteFadeBody| {
            bridge.absolute_fade(rgb(body.rgb), body.indexes, body.fadetime);
            Response::null()
        }),
        ("GET" | "POST", "/multicommand") => with_body(request, |body: MultiCommandBody| {
            let entries = body
                .commandlist
                .into_iter()
                .map(|(indexes, color, fadetime)| {
                    FadeEntry::new(indexes, from_rgb(rgb(color)), fadetime)
                })
                .collect();
            bridge.multi_command(entries);
            Response::null()
        }),
        ("GET" | "POST", "/relativefade") => with_body(request, |body: RelativeFadeBody| {
            bridge.relative_fade(body.magnitude, body.indexes, body.fadetime);
            Response::null()
        }),
        (_, path) if ROUTES.contains(&path) => {
            Response::error("405 Method Not Allowed", "method not allowed")
        }
        _ => Response::error("404 Not Found", "unknown path"),
    }
}

/// Decode the JSON body and hand it to `handle`, answering 400 on failure
fn with_body<T: DeserializeOwned>(request: &Request, handle: impl FnOnce(T) -> Response) -> Response {
    match serde_json::from_slice::<T>(&request.body) {
        Ok(body) => handle(body),
        Err(err) => Response::error("400 Bad Request", &err.to_string()),
    }
}

const fn rgb([r, g, b]: [u8; 3]) -> Rgb {
    Rgb { r, g, b }
}

struct Response {
    status: &'static str,
    body: String,
}

impl Response {
    fn json<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self {
                status: "200 OK",
                body,
            },
            Err(err) => Self::error("500 Internal Server Error", &err.to_string()),
        }
    }

    fn null() -> Self {
        Self {
            status: "200 OK",
            body: "null".to_string(),
        }
    }

    fn error(status: &'static str, message: &str) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message }).to_string(),
        }
    }
}

fn write_response(stream: &mut impl Write, response: &Response) -> io::Result<()> {
    write!(
        stream,
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    )?;
    stream.flush()
}
