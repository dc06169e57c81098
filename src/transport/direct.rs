// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, error, info, warn};

use crate::constants::{MAX_PENDING_LINE_BYTES, READ_BUFFER_SIZE};
use crate::error::{BridgeError, Result};
use crate::transport::Connection;

/// Direct TCP connection to mochad's event port.
///
/// Reads are returned on line boundaries: a line split across two TCP
/// segments is held back until its newline arrives.
pub struct MochadTcpConnection<S = TcpStream> {
    stream: Option<S>,
    buf: Vec<u8>,
    leftover: Vec<u8>,
}

impl MochadTcpConnection<TcpStream> {
    /// Connect to mochad at `host:port`.
    pub async fn connect(host: &str, port: u16) -> Result<Self> {
        info!("Connecting to mochad at {}:{}", host, port);

        let stream = TcpStream::connect((host, port)).await.map_err(|e| {
            error!("TCP connect failed: {}", e);
            BridgeError::Io(e)
        })?;

        debug!("TCP socket connected");
        Ok(Self::from_stream(stream))
    }
}

impl<S> MochadTcpConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Wrap an already-connected stream.
    pub fn from_stream(stream: S) -> Self {
        Self {
            stream: Some(stream),
            buf: vec![0u8; READ_BUFFER_SIZE],
            leftover: Vec::new(),
        }
    }
}

impl<S> Connection for MochadTcpConnection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_data(&mut self) -> Result<String> {
        loop {
            if let Some(text) = take_complete_lines(&mut self.leftover) {
                return Ok(text);
            }

            let Some(stream) = self.stream.as_mut() else {
                return Err(BridgeError::Disconnected);
            };

            let n = stream.read(&mut self.buf).await?;
            if n == 0 {
                debug!("Reader: connection closed by mochad");
                self.stream = None;
                if self.leftover.is_empty() {
                    return Err(BridgeError::Disconnected);
                }
                // Flush a final unterminated line before reporting the close
                let text = String::from_utf8_lossy(&self.leftover).into_owned();
                self.leftover.clear();
                return Ok(text);
            }
            self.leftover.extend_from_slice(&self.buf[..n]);
            if self.leftover.len() > MAX_PENDING_LINE_BYTES && !self.leftover.contains(&b'\n') {
                warn!(
                    "Discarding {} bytes from mochad with no line break",
                    self.leftover.len()
                );
                self.leftover.clear();
            }
        }
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            info!("Disconnecting from mochad");
            stream.shutdown().await?;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.stream.is_some()
    }
}

/// Remove everything up to and including the last newline from `pending`
/// and return it as text. Returns `None` if there is no complete line yet.
fn take_complete_lines(pending: &mut Vec<u8>) -> Option<String> {
    let end = pending.iter().rposition(|&b| b == b'\n')? + 1;
    let rest = pending.split_off(end);
    let complete = std::mem::replace(pending, rest);
    Some(String::from_utf8_lossy(&complete).into_owned())
}
