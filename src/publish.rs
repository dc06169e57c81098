// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use std::future::Future;
use std::time::Duration;

use rumqttc::{AsyncClient, Event, MqttOptions, Outgoing, QoS};
use tracing::{debug, trace};

use crate::config::{BridgeConfig, MqttCredentials};
use crate::error::Result;

/// Sink for outbound messages.
///
/// Delivery is best-effort: callers log failures and move on.
pub trait Publisher: Send + Sync {
    fn publish(&self, topic: &str, payload: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Publishes each message over its own short-lived MQTT connection
/// (connect, publish at QoS 0 without retain, disconnect).
///
/// No connection is held between messages, so there is no shared session
/// state to recover when the broker restarts.
#[derive(Debug, Clone)]
pub struct MqttPublisher {
    host: String,
    port: u16,
    client_id: String,
    keep_alive: Duration,
    credentials: Option<MqttCredentials>,
}

impl MqttPublisher {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        let defaults = BridgeConfig::default();
        Self {
            host: host.into(),
            port,
            client_id: defaults.mqtt_client_id,
            keep_alive: Duration::from_secs(defaults.mqtt_keep_alive_secs),
            credentials: None,
        }
    }

    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            host: config.mqtt_host.clone(),
            port: config.mqtt_port,
            client_id: config.mqtt_client_id.clone(),
            keep_alive: Duration::from_secs(config.mqtt_keep_alive_secs),
            credentials: config.mqtt_credentials.clone(),
        }
    }

    fn options(&self) -> MqttOptions {
        let mut opts = MqttOptions::new(&self.client_id, &self.host, self.port);
        opts.set_keep_alive(self.keep_alive);
        if let Some(creds) = &self.credentials {
            opts.set_credentials(&creds.username, &creds.password);
        }
        opts
    }
}

impl Publisher for MqttPublisher {
    async fn publish(&self, topic: &str, payload: &str) -> Result<()> {
        let (client, mut eventloop) = AsyncClient::new(self.options(), 10);

        // Both requests are queued; the event loop sends them once connected
        client.publish(topic, QoS::AtMostOnce, false, payload).await?;
        client.disconnect().await?;

        loop {
            match eventloop.poll().await? {
                Event::Outgoing(Outgoing::Disconnect) => break,
                event => trace!("MQTT event: {:?}", event),
            }
        }

        debug!("Published to {topic}");
        Ok(())
    }
}
