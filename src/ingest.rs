// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

use crate::config::IngestPolicy;
use crate::dispatch::Dispatcher;
use crate::error::{BridgeError, Result};
use crate::protocol::decode_line;
use crate::publish::Publisher;
use crate::transport::Connection;

/// Lifecycle of the read loop, observable through [`IngestLoop::subscribe_state`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Waiting for the mochad connection
    Connecting,
    /// Connected and reading events
    Reading,
    /// The last read failed; waiting before retry `attempt`
    Retrying { attempt: u32 },
    /// The loop has exited and the connection is closed
    Terminated,
}

/// What happened to a single received line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome {
    /// Not an RF receive line
    Ignored,
    /// Decoded and handed to the dispatcher; `published` messages were accepted
    Dispatched { published: usize },
    /// Could not be parsed or decoded; skipped
    Failed,
}

/// Reads mochad output, decodes each line and dispatches the resulting events.
///
/// Owns the connection for its whole lifetime and closes it on every exit path.
pub struct IngestLoop<C, P> {
    conn: C,
    dispatcher: Dispatcher<P>,
    policy: IngestPolicy,
    state_tx: watch::Sender<LoopState>,
}

impl<C: Connection, P: Publisher> IngestLoop<C, P> {
    pub fn new(conn: C, dispatcher: Dispatcher<P>, policy: IngestPolicy) -> Self {
        let (state_tx, _) = watch::channel(LoopState::Connecting);
        Self::with_state(conn, dispatcher, policy, state_tx)
    }

    /// Build a loop that reports its state on an existing channel.
    pub fn with_state(
        conn: C,
        dispatcher: Dispatcher<P>,
        policy: IngestPolicy,
        state_tx: watch::Sender<LoopState>,
    ) -> Self {
        Self {
            conn,
            dispatcher,
            policy,
            state_tx,
        }
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LoopState> {
        self.state_tx.subscribe()
    }

    /// Run until reads have failed `max_retries` times in a row, or a
    /// non-transport error escapes the read.
    ///
    /// Never returns `Ok`: the loop is meant to live as long as the process.
    pub async fn run(mut self) -> Result<()> {
        info!("Entering mochad event listening loop");

        let result = self.read_loop().await;
        if let Err(e) = &result {
            error!("Failed to read from the socket. {e}");
        }
        error!("Loop exited. No more X10 msgs will be received.");

        if self.conn.is_connected()
            && let Err(e) = self.conn.disconnect().await
        {
            warn!("Error disconnecting from mochad: {e}");
        }
        self.state_tx.send_replace(LoopState::Terminated);

        result
    }

    async fn read_loop(&mut self) -> Result<()> {
        let mut failures: u32 = 0;
        self.state_tx.send_replace(LoopState::Reading);

        loop {
            match self.conn.read_data().await {
                Ok(content) if content.is_empty() => {
                    // read_data() blocks until there is data, so this is a hiccup
                    debug!("Empty read from mochad");
                    sleep(self.policy.idle_delay).await;
                }
                Ok(content) => {
                    if failures > 0 {
                        info!("Reading from mochad again after {failures} failed attempts");
                        self.state_tx.send_replace(LoopState::Reading);
                    }
                    failures = 0;
                    process_block(&self.dispatcher, &content).await;
                }
                Err(e) if e.is_retryable() => {
                    error!("Failed to read from the socket. {e}");
                    failures += 1;
                    if failures >= self.policy.max_retries {
                        return Err(BridgeError::RetryLimitExceeded {
                            limit: self.policy.max_retries,
                        });
                    }
                    self.state_tx.send_replace(LoopState::Retrying { attempt: failures });
                    sleep(self.policy.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Handle every line of one read. A bad line never affects the others.
///
/// Only the dispatcher is borrowed here, so the read loop's future does not
/// need the connection to be `Sync`.
async fn process_block<P: Publisher>(dispatcher: &Dispatcher<P>, content: &str) {
    for line in content.lines() {
        process_line(dispatcher, line.trim_end()).await;
    }
}

pub(crate) async fn process_line<P: Publisher>(dispatcher: &Dispatcher<P>, line: &str) -> LineOutcome {
    debug!("Line received: {line}");

    match decode_line(line) {
        Ok(Some(event)) => {
            debug!("Dispatching {}: {:?}", event.address, event.attributes);
            let published = dispatcher.dispatch(&event).await;
            LineOutcome::Dispatched { published }
        }
        Ok(None) => LineOutcome::Ignored,
        Err(e @ BridgeError::MalformedLine { .. }) => {
            debug!("Failed to parse mochad msg {line}: {e}");
            LineOutcome::Failed
        }
        Err(e) if e.is_decode_error() => {
            warn!("Failed to decode mochad msg {line}: {e}");
            LineOutcome::Failed
        }
        Err(e) => {
            error!("Failed to handle mochad msg {line}: {e}");
            LineOutcome::Failed
        }
    }
}
