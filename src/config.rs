// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use std::time::Duration;

use crate::constants::{
    DEFAULT_IDLE_READ_DELAY_MS, DEFAULT_MAX_READ_RETRIES, DEFAULT_MOCHAD_HOST, DEFAULT_MOCHAD_PORT,
    DEFAULT_MQTT_CLIENT_ID, DEFAULT_MQTT_HOST, DEFAULT_MQTT_KEEP_ALIVE_SECS, DEFAULT_MQTT_PORT,
    DEFAULT_READ_RETRY_DELAY_MS,
};

/// Broker username/password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MqttCredentials {
    pub username: String,
    pub password: String,
}

/// Configuration for the mochad → MQTT bridge.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Host running the mochad daemon
    pub mochad_host: String,
    /// mochad TCP port (default: 1099)
    pub mochad_port: u16,
    /// MQTT broker host
    pub mqtt_host: String,
    /// MQTT broker port (default: 1883)
    pub mqtt_port: u16,
    /// Optional broker credentials
    pub mqtt_credentials: Option<MqttCredentials>,
    /// Client ID used for each short-lived publish connection
    pub mqtt_client_id: String,
    /// MQTT keep-alive in seconds (default: 15)
    pub mqtt_keep_alive_secs: u64,
    /// Delay after a failed read in milliseconds (default: 10000)
    pub read_retry_delay_ms: u64,
    /// Consecutive failed reads before the read loop gives up (default: 300)
    pub max_read_retries: u32,
    /// Delay after an empty read in milliseconds (default: 1000)
    pub idle_read_delay_ms: u64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            mochad_host: DEFAULT_MOCHAD_HOST.to_string(),
            mochad_port: DEFAULT_MOCHAD_PORT,
            mqtt_host: DEFAULT_MQTT_HOST.to_string(),
            mqtt_port: DEFAULT_MQTT_PORT,
            mqtt_credentials: None,
            mqtt_client_id: DEFAULT_MQTT_CLIENT_ID.to_string(),
            mqtt_keep_alive_secs: DEFAULT_MQTT_KEEP_ALIVE_SECS,
            read_retry_delay_ms: DEFAULT_READ_RETRY_DELAY_MS,
            max_read_retries: DEFAULT_MAX_READ_RETRIES,
            idle_read_delay_ms: DEFAULT_IDLE_READ_DELAY_MS,
        }
    }
}

impl BridgeConfig {
    /// Create a new config builder starting from defaults.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Timing and retry limits for the read loop.
    pub fn ingest_policy(&self) -> IngestPolicy {
        IngestPolicy {
            retry_delay: Duration::from_millis(self.read_retry_delay_ms),
            max_retries: self.max_read_retries,
            idle_delay: Duration::from_millis(self.idle_read_delay_ms),
        }
    }
}

/// Retry/backoff limits applied by [`crate::ingest::IngestLoop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestPolicy {
    pub retry_delay: Duration,
    pub max_retries: u32,
    pub idle_delay: Duration,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        BridgeConfig::default().ingest_policy()
    }
}

/// Builder for BridgeConfig.
#[derive(Debug, Clone, Default)]
pub struct BridgeConfigBuilder {
    config: BridgeConfig,
}

impl BridgeConfigBuilder {
    pub fn mochad_host(mut self, host: impl Into<String>) -> Self {
        self.config.mochad_host = host.into();
        self
    }

    pub fn mochad_port(mut self, port: u16) -> Self {
        self.config.mochad_port = port;
        self
    }

    pub fn mqtt_host(mut self, host: impl Into<String>) -> Self {
        self.config.mqtt_host = host.into();
        self
    }

    pub fn mqtt_port(mut self, port: u16) -> Self {
        self.config.mqtt_port = port;
        self
    }

    pub fn mqtt_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.config.mqtt_credentials = Some(MqttCredentials {
            username: username.into(),
            password: password.into(),
        });
        self
    }

    pub fn mqtt_client_id(mut self, client_id: impl Into<String>) -> Self {
        self.config.mqtt_client_id = client_id.into();
        self
    }

    pub fn mqtt_keep_alive_secs(mut self, secs: u64) -> Self {
        self.config.mqtt_keep_alive_secs = secs;
        self
    }

    pub fn read_retry_delay_ms(mut self, ms: u64) -> Self {
        self.config.read_retry_delay_ms = ms;
        self
    }

    pub fn max_read_retries(mut self, retries: u32) -> Self {
        self.config.max_read_retries = retries;
        self
    }

    pub fn idle_read_delay_ms(mut self, ms: u64) -> Self {
        self.config.idle_read_delay_ms = ms;
        self
    }

    pub fn build(self) -> BridgeConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::builder().build();
        assert_eq!(config.mochad_host, "localhost");
        assert_eq!(config.mochad_port, 1099);
        assert_eq!(config.mqtt_host, "localhost");
        assert_eq!(config.mqtt_port, 1883);
        assert_eq!(config.mqtt_keep_alive_secs, 15);
        assert!(config.mqtt_credentials.is_none());
    }

    #[test]
    fn test_default_ingest_policy() {
        let policy = IngestPolicy::default();
        assert_eq!(policy.retry_delay, Duration::from_secs(10));
        assert_eq!(policy.max_retries, 300);
        assert_eq!(policy.idle_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_config_builder() {
        let config = BridgeConfig::builder()
            .mochad_host("10.0.0.5")
            .mochad_port(2000)
            .mqtt_host("broker.lan")
            .mqtt_port(8883)
            .mqtt_credentials("x10", "secret")
            .read_retry_delay_ms(500)
            .max_read_retries(3)
            .build();

        assert_eq!(config.mochad_host, "10.0.0.5");
        assert_eq!(config.mochad_port, 2000);
        assert_eq!(config.mqtt_host, "broker.lan");
        assert_eq!(config.mqtt_port, 8883);
        assert_eq!(
            config.mqtt_credentials,
            Some(MqttCredentials {
                username: "x10".to_string(),
                password: "secret".to_string(),
            })
        );
        let policy = config.ingest_policy();
        assert_eq!(policy.retry_delay, Duration::from_millis(500));
        assert_eq!(policy.max_retries, 3);
    }
}
