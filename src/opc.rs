//! Open Pixel Control client
//!
//! Frames go out as OPC "set pixel colours" messages over TCP:
//! `[channel, 0x00, len_hi, len_lo]` followed by `r, g, b` per pixel.

use std::io::{self, Write};
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::info;
use thiserror::Error;

use crate::PixelSink;
use crate::color::Rgb;

/// OPC command byte for "set pixel colours"
pub const SET_PIXEL_COLORS: u8 = 0x00;

const HEADER_LEN: usize = 4;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("OPC sink I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("OPC address {0} did not resolve")]
    Unresolved(String),
    #[error("frame of {0} bytes does not fit an OPC message")]
    FrameTooLarge(usize),
}

/// Encode `colors` as a "set pixel colours" message into `out`
pub fn encode_frame(channel: u8, colors: &[Rgb], out: &mut Vec<u8>) -> Result<(), SinkError> {
    let len = colors.len() * 3;
    let len_bytes = u16::try_from(len)
        .map_err(|_| SinkError::FrameTooLarge(len))?
        .to_be_bytes();

    out.clear();
    out.reserve(HEADER_LEN + len);
    out.extend_from_slice(&[channel, SET_PIXEL_COLORS, len_bytes[0], len_bytes[1]]);
    for color in colors {
        out.extend_from_slice(&[color.r, color.g, color.b]);
    }
    Ok(())
}

/// Push-only OPC client
///
/// Connects lazily and keeps the connection between frames. A failed write
/// drops the connection; the next frame connects again. Both connect and
/// write are bounded by `timeout`.
#[derive(Debug)]
pub struct OpcClient {
    address: String,
    channel: u8,
    timeout: Duration,
    stream: Option<TcpStream>,
    buffer: Vec<u8>,
}

impl OpcClient {
    pub fn new(address: impl Into<String>, channel: u8, timeout: Duration) -> Self {
        Self {
            address: address.into(),
            channel,
            timeout,
            stream: None,
            buffer: Vec::new(),
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub const fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn resolve(&self) -> Result<SocketAddr, SinkError> {
        self.address
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| SinkError::Unresolved(self.address.clone()))
    }

    fn connect(&self) -> Result<TcpStream, SinkError> {
        let addr = self.resolve()?;
        let stream = TcpStream::connect_timeout(&addr, self.timeout)?;
        stream.set_write_timeout(Some(self.timeout))?;
        stream.set_nodelay(true)?;
        info!("connected to OPC sink at {}", addr);
        Ok(stream)
    }
}

impl PixelSink for OpcClient {
    type Error = SinkError;

    fn write(&mut self, colors: &[Rgb]) -> Result<(), SinkError> {
        encode_frame(self.channel, colors, &mut self.buffer)?;

        let mut stream = match self.stream.take() {
            Some(stream) => stream,
            None => self.connect()?,
        };
        // A failed write returns early and drops the connection
        stream.write_all(&self.buffer)?;
        self.stream = Some(stream);
        Ok(())
    }
}
