// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

//! Wires a mochad connection, the decoder and an MQTT publisher together
//! and runs the read loop on its own task.
//!
//! ```no_run
//! use mochad_bridge::{bridge, BridgeConfig};
//!
//! # async fn example() -> mochad_bridge::Result<()> {
//! let config = BridgeConfig::builder().mochad_host("192.168.1.20").build();
//! let mut handle = bridge::start(&config);
//! handle.wait_ready().await?;
//! handle.join().await
//! # }
//! ```

use std::future::Future;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::config::{BridgeConfig, IngestPolicy};
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::ingest::{IngestLoop, LoopState};
use crate::publish::{MqttPublisher, Publisher};
use crate::transport::Connection;
use crate::transport::direct::MochadTcpConnection;

/// Handle to a running bridge task.
pub struct BridgeHandle {
    state: watch::Receiver<LoopState>,
    task: JoinHandle<Result<()>>,
}

impl BridgeHandle {
    /// Wait until the mochad connection is up and the loop is reading.
    ///
    /// Fails with [`BridgeError::Disconnected`] if the task ended first; call
    /// [`join`](Self::join) to get the underlying error.
    pub async fn wait_ready(&mut self) -> Result<()> {
        let state = self
            .state
            .wait_for(|s| *s != LoopState::Connecting)
            .await
            .map_err(|_| BridgeError::ChannelClosed)?;
        if *state == LoopState::Terminated {
            return Err(BridgeError::Disconnected);
        }
        Ok(())
    }

    pub fn state(&self) -> LoopState {
        *self.state.borrow()
    }

    /// Wait for the bridge task to finish and return its result.
    ///
    /// Must not be called again once it has returned.
    pub async fn join(&mut self) -> Result<()> {
        (&mut self.task).await?
    }

    /// Stop the task. Dropping the connection closes the socket.
    pub fn abort(&self) {
        self.task.abort();
    }
}

/// Spawn a bridge over any connection and publisher.
pub fn spawn<F, C, P>(connect: F, publisher: P, policy: IngestPolicy) -> BridgeHandle
where
    F: Future<Output = Result<C>> + Send + 'static,
    C: Connection + 'static,
    P: Publisher + 'static,
{
    let (state_tx, state_rx) = watch::channel(LoopState::Connecting);

    let task = tokio::spawn(async move {
        let conn = match connect.await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to connect to mochad: {e}");
                state_tx.send_replace(LoopState::Terminated);
                return Err(e);
            }
        };
        info!("Connected to mochad");

        IngestLoop::with_state(conn, Dispatcher::new(publisher), policy, state_tx)
            .run()
            .await
    });

    BridgeHandle {
        state: state_rx,
        task,
    }
}

/// Connect to mochad over TCP and publish to the configured MQTT broker.
pub fn start(config: &BridgeConfig) -> BridgeHandle {
    let host = config.mochad_host.clone();
    let port = config.mochad_port;
    let connect = async move { MochadTcpConnection::connect(&host, port).await };

    spawn(connect, MqttPublisher::from_config(config), config.ingest_policy())
}
