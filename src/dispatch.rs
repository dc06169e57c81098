// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use tracing::{debug, error, info};

use crate::constants::PULSE_TRIGGER;
use crate::error::Result;
use crate::event::DecodedEvent;
use crate::publish::Publisher;

/// A single message bound for the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub topic: String,
    pub payload: String,
}

/// Build the messages for one event: the event itself, plus a synthesized
/// "off" when the event's significant value is `on`.
///
/// X10 motion sensors and buttons only ever report `on`; the follow-up models
/// them as momentary. The off payload is the on payload with every `on`
/// substring textually replaced by `off`, which also rewrites unrelated
/// values containing `on` (e.g. `contact` → `cofftact`).
pub fn messages_for(event: &DecodedEvent) -> Result<Vec<OutboundMessage>> {
    let topic = event.topic();
    let payload = serde_json::to_string(&event.attributes)?;

    let pulse = event.significant_value() == Some(PULSE_TRIGGER);
    let mut messages = Vec::with_capacity(2);
    if pulse {
        let off_payload = payload.replace("on", "off");
        messages.push(OutboundMessage {
            topic: topic.clone(),
            payload,
        });
        messages.push(OutboundMessage {
            topic,
            payload: off_payload,
        });
    } else {
        messages.push(OutboundMessage { topic, payload });
    }
    Ok(messages)
}

/// Turns decoded events into published messages.
pub struct Dispatcher<P> {
    publisher: P,
}

impl<P: Publisher> Dispatcher<P> {
    pub fn new(publisher: P) -> Self {
        Self { publisher }
    }

    /// Publish an event. Failures are logged and never returned.
    ///
    /// Returns the number of messages the broker accepted.
    pub async fn dispatch(&self, event: &DecodedEvent) -> usize {
        let messages = match messages_for(event) {
            Ok(messages) => messages,
            Err(e) => {
                error!("Failed to build MQTT payload for {}: {e}", event.topic());
                return 0;
            }
        };

        let value = event.significant_value().unwrap_or("-");
        let mut published = 0;
        for (i, msg) in messages.iter().enumerate() {
            if i == 0 {
                info!("Publish {} : {} to mqtt", msg.topic, value);
            } else {
                debug!("Publish {} : off to mqtt", msg.topic);
            }
            match self.publisher.publish(&msg.topic, &msg.payload).await {
                Ok(()) => published += 1,
                Err(e) => error!("Failed to publish mqtt message {}:{}. {e}", msg.topic, msg.payload),
            }
        }
        published
    }
}
