// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;
use tokio::signal::unix::{SignalKind, signal};
use tracing::{error, info};

use mochad_bridge::constants::{
    DEFAULT_IDLE_READ_DELAY_MS, DEFAULT_MAX_READ_RETRIES, DEFAULT_MOCHAD_HOST, DEFAULT_MOCHAD_PORT,
    DEFAULT_MQTT_CLIENT_ID, DEFAULT_MQTT_HOST, DEFAULT_MQTT_KEEP_ALIVE_SECS, DEFAULT_MQTT_PORT,
    DEFAULT_READ_RETRY_DELAY_MS,
};
use mochad_bridge::{BridgeConfig, bridge};

// ---------------------------------------------------------------------------
// CLI
// ---------------------------------------------------------------------------

#[derive(Parser)]
#[command(name = "mochad2mqtt")]
#[command(about = "Bridge between a mochad X10 controller and MQTT")]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: String,
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct Config {
    #[serde(default)]
    mochad: MochadToml,
    #[serde(default)]
    mqtt: MqttToml,
    #[serde(default)]
    ingest: IngestToml,
}

#[derive(Debug, Deserialize)]
struct MochadToml {
    #[serde(default = "default_mochad_host")]
    host: String,
    #[serde(default = "default_mochad_port")]
    port: u16,
}

impl Default for MochadToml {
    fn default() -> Self {
        Self {
            host: default_mochad_host(),
            port: default_mochad_port(),
        }
    }
}

fn default_mochad_host() -> String {
    DEFAULT_MOCHAD_HOST.to_string()
}
fn default_mochad_port() -> u16 {
    DEFAULT_MOCHAD_PORT
}

#[derive(Debug, Deserialize)]
struct MqttToml {
    #[serde(default = "default_mqtt_url")]
    url: String,
    username: Option<String>,
    password: Option<String>,
    #[serde(default = "default_client_id")]
    client_id: String,
    #[serde(default = "default_keep_alive")]
    keep_alive_secs: u64,
}

impl Default for MqttToml {
    fn default() -> Self {
        Self {
            url: default_mqtt_url(),
            username: None,
            password: None,
            client_id: default_client_id(),
            keep_alive_secs: default_keep_alive(),
        }
    }
}

fn default_mqtt_url() -> String {
    format!("mqtt://{DEFAULT_MQTT_HOST}:{DEFAULT_MQTT_PORT}")
}
fn default_client_id() -> String {
    DEFAULT_MQTT_CLIENT_ID.to_string()
}
fn default_keep_alive() -> u64 {
    DEFAULT_MQTT_KEEP_ALIVE_SECS
}

#[derive(Debug, Deserialize)]
struct IngestToml {
    #[serde(default = "default_retry_delay")]
    retry_delay_ms: u64,
    #[serde(default = "default_max_retries")]
    max_retries: u32,
    #[serde(default = "default_idle_delay")]
    idle_delay_ms: u64,
}

impl Default for IngestToml {
    fn default() -> Self {
        Self {
            retry_delay_ms: default_retry_delay(),
            max_retries: default_max_retries(),
            idle_delay_ms: default_idle_delay(),
        }
    }
}

fn default_retry_delay() -> u64 {
    DEFAULT_READ_RETRY_DELAY_MS
}
fn default_max_retries() -> u32 {
    DEFAULT_MAX_READ_RETRIES
}
fn default_idle_delay() -> u64 {
    DEFAULT_IDLE_READ_DELAY_MS
}

fn build_bridge_config(config: &Config) -> Result<BridgeConfig> {
    let (mqtt_host, mqtt_port) = parse_mqtt_url(&config.mqtt.url)?;

    if config.ingest.max_retries == 0 {
        anyhow::bail!("ingest.max_retries must be at least 1");
    }

    let mut builder = BridgeConfig::builder()
        .mochad_host(&config.mochad.host)
        .mochad_port(config.mochad.port)
        .mqtt_host(mqtt_host)
        .mqtt_port(mqtt_port)
        .mqtt_client_id(&config.mqtt.client_id)
        .mqtt_keep_alive_secs(config.mqtt.keep_alive_secs)
        .read_retry_delay_ms(config.ingest.retry_delay_ms)
        .max_read_retries(config.ingest.max_retries)
        .idle_read_delay_ms(config.ingest.idle_delay_ms);

    match (&config.mqtt.username, &config.mqtt.password) {
        (Some(user), password) => {
            builder = builder.mqtt_credentials(user, password.as_deref().unwrap_or_default());
        }
        (None, Some(_)) => anyhow::bail!("mqtt.password is set without mqtt.username"),
        (None, None) => {}
    }

    Ok(builder.build())
}

/// Parse an MQTT URL like "mqtt://host:port" into (host, port).
fn parse_mqtt_url(url: &str) -> Result<(String, u16)> {
    let stripped = url
        .strip_prefix("mqtt://")
        .or_else(|| url.strip_prefix("tcp://"))
        .unwrap_or(url);

    let (host, port_str) = stripped
        .rsplit_once(':')
        .context("MQTT URL must be in format mqtt://host:port")?;

    let port: u16 = port_str.parse().context("Invalid MQTT port number")?;

    Ok((host.to_string(), port))
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main]
async fn main() -> Result<()> {
    // RUST_LOG controls verbosity (e.g. RUST_LOG=debug or RUST_LOG=mochad_bridge=debug).
    // Default: info.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    // systemd journal already adds timestamps, so omit them when running under systemd
    if std::env::var_os("JOURNAL_STREAM").is_some() {
        tracing_subscriber::fmt().without_time().with_env_filter(env_filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let cli = Cli::parse();

    let config_text =
        std::fs::read_to_string(&cli.config).context("Failed to read config file")?;
    let config: Config = toml::from_str(&config_text).context("Failed to parse config file")?;
    let bridge_config = build_bridge_config(&config)?;

    info!(
        "Bridging mochad at {}:{} to MQTT broker {}:{}",
        bridge_config.mochad_host,
        bridge_config.mochad_port,
        bridge_config.mqtt_host,
        bridge_config.mqtt_port
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut handle = bridge::start(&bridge_config);

    if handle.wait_ready().await.is_err() {
        handle.join().await.context("Failed to connect to mochad")?;
        anyhow::bail!("mochad bridge stopped before it was ready");
    }
    info!("Bridge running. Send SIGINT/SIGTERM to stop.");

    let finished = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Received SIGINT, shutting down...");
            None
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down...");
            None
        }
        result = handle.join() => Some(result),
    };

    match finished {
        None => {
            handle.abort();
            info!("Shutdown complete");
            Ok(())
        }
        Some(result) => {
            if let Err(e) = &result {
                error!("Bridge stopped: {e}");
            }
            result.context("mochad bridge stopped")
        }
    }
}
