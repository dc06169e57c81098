// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge
//
//! # mochad_bridge
//!
//! Forwards X10 RF events received by a [mochad](https://sourceforge.net/projects/mochad/)
//! daemon to an MQTT broker.
//!
//! mochad reports every RF frame it hears on its TCP port (1099) as a line
//! of text. Button presses (`Rx RF`) and security sensor/remote events
//! (`Rx RFSEC`) are decoded into key/value attributes and published as
//! JSON to `X10/button/{address}` and `X10/security/{address}`. Events
//! whose value is `on` are followed by a synthesized `off`, so buttons and
//! motion sensors behave like momentary switches.
//!
//! ## Quick Start
//!
//! ```no_run
//! use mochad_bridge::{bridge, BridgeConfig};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = BridgeConfig::builder()
//!         .mochad_host("192.168.0.100")
//!         .mqtt_host("broker.lan")
//!         .build();
//!
//!     let mut handle = bridge::start(&config);
//!     handle.wait_ready().await?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     handle.abort();
//!     Ok(())
//! }
//! ```

pub mod bridge;
pub mod config;
pub mod constants;
pub mod decoder;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod ingest;
pub mod protocol;
pub mod publish;
pub mod transport;

// Re-exports for convenience
pub use bridge::BridgeHandle;
pub use config::{BridgeConfig, BridgeConfigBuilder, IngestPolicy, MqttCredentials};
pub use constants::{DeviceClass, DeviceType};
pub use decoder::decode_func;
pub use dispatch::{Dispatcher, OutboundMessage, messages_for};
pub use error::{BridgeError, Result};
pub use event::{Attribute, Attributes, Category, DecodedEvent, Delay, SecurityCommand};
pub use ingest::{IngestLoop, LoopState};
pub use protocol::{RfKind, decode_line, parse_line};
pub use publish::{MqttPublisher, Publisher};
pub use transport::Connection;
pub use transport::direct::MochadTcpConnection;
