// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

pub mod direct;

use std::future::Future;

use crate::error::Result;

/// A connection to the mochad daemon.
///
/// The read loop owns its connection exclusively and is the only caller of
/// [`Connection::disconnect`].
pub trait Connection: Send {
    /// Block until mochad has data, returning one or more complete lines.
    ///
    /// An `Ok` with an empty string is possible but unexpected; transport
    /// failures are returned as errors for which
    /// [`BridgeError::is_retryable`](crate::error::BridgeError::is_retryable) holds.
    fn read_data(&mut self) -> impl Future<Output = Result<String>> + Send;

    /// Close the underlying socket.
    fn disconnect(&mut self) -> impl Future<Output = Result<()>> + Send;

    /// Whether the socket is still open.
    fn is_connected(&self) -> bool;
}
