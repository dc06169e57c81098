// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

/// All errors that can occur in the mochad bridge library.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Connection to mochad lost")]
    Disconnected,

    #[error("Malformed line (expected at least {expected} fields, got {found}): {line}")]
    MalformedLine {
        line: String,
        expected: usize,
        found: usize,
    },

    #[error("Unknown device type in {func}: {device_type}")]
    UnknownDeviceType { func: String, device_type: String },

    #[error("Unknown func parameter in {func}: {parameter}")]
    UnknownFuncParameter { func: String, parameter: String },

    #[error("Malformed func {func}: {details}")]
    MalformedFunc { func: String, details: String },

    #[error("MQTT client error: {0}")]
    Mqtt(#[from] rumqttc::ClientError),

    #[error("MQTT connection error: {0}")]
    MqttConnection(#[from] rumqttc::ConnectionError),

    #[error("Failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Retry attempts exceeded ({limit}). Failed to read from the socket")]
    RetryLimitExceeded { limit: u32 },

    #[error("Channel closed")]
    ChannelClosed,

    #[error("Bridge task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl BridgeError {
    /// Whether this error is a transport failure that the read loop should retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, BridgeError::Io(_) | BridgeError::Disconnected)
    }

    /// Whether this error came from decoding a single line or func token.
    ///
    /// Decode errors are confined to the offending line and never stop ingestion.
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            BridgeError::MalformedLine { .. }
                | BridgeError::UnknownDeviceType { .. }
                | BridgeError::UnknownFuncParameter { .. }
                | BridgeError::MalformedFunc { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
