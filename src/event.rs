// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::constants::{DeviceType, TOPIC_ROOT};

/// Event category, also the middle segment of the published topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Plain X10 RF transmitter (`Rx RF`)
    Button,
    /// X10 security sensor or remote (`Rx RFSEC`)
    Security,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Button => "button",
            Self::Security => "security",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry/exit delay setting reported by a sensor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delay {
    Min,
    Max,
}

impl Delay {
    pub fn from_token(s: &str) -> Option<Self> {
        match s {
            "min" => Some(Self::Min),
            "max" => Some(Self::Max),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
        }
    }
}

/// Command issued by a security remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityCommand {
    Arm,
    ArmHome,
    ArmAway,
    Disarm,
    Panic,
    LightsOn,
    LightsOff,
}

impl SecurityCommand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::ArmHome => "arm_home",
            Self::ArmAway => "arm_away",
            Self::Disarm => "disarm",
            Self::Panic => "panic",
            Self::LightsOn => "lights_on",
            Self::LightsOff => "lights_off",
        }
    }
}

/// A single decoded attribute. The payload key is given by [`Attribute::key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attribute {
    /// `func`: lower-cased button command (`on`, `off`, `bright`, `dim`, ...)
    Func(String),
    /// `device_type`
    DeviceType(DeviceType),
    /// `event_type`: e.g. `contact`, `motion`
    EventType(String),
    /// `event_state`: e.g. `alert`, `normal`
    EventState(String),
    /// `delay`
    Delay(Delay),
    /// `tamper: true`
    Tamper,
    /// `low_battery: true`
    LowBattery,
    /// `home_away: true`
    HomeAway,
    /// `command`
    Command(SecurityCommand),
}

impl Attribute {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Func(_) => "func",
            Self::DeviceType(_) => "device_type",
            Self::EventType(_) => "event_type",
            Self::EventState(_) => "event_state",
            Self::Delay(_) => "delay",
            Self::Tamper => "tamper",
            Self::LowBattery => "low_battery",
            Self::HomeAway => "home_away",
            Self::Command(_) => "command",
        }
    }
}

/// Ordered attribute mapping carried by a [`DecodedEvent`].
///
/// Serializes as a JSON object whose keys appear in insertion order.
/// Setting a key that is already present replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<Attribute>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, attr: Attribute) {
        match self.0.iter_mut().find(|a| a.key() == attr.key()) {
            Some(existing) => *existing = attr,
            None => self.0.push(attr),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.0.iter().find(|a| a.key() == key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(Attribute::key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn func(&self) -> Option<&str> {
        match self.get("func") {
            Some(Attribute::Func(f)) => Some(f),
            _ => None,
        }
    }

    pub fn device_type(&self) -> Option<DeviceType> {
        match self.get("device_type") {
            Some(Attribute::DeviceType(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn event_state(&self) -> Option<&str> {
        match self.get("event_state") {
            Some(Attribute::EventState(s)) => Some(s),
            _ => None,
        }
    }

    pub fn command(&self) -> Option<SecurityCommand> {
        match self.get("command") {
            Some(Attribute::Command(c)) => Some(*c),
            _ => None,
        }
    }
}

impl Serialize for Attributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for attr in &self.0 {
            match attr {
                Attribute::Func(v) | Attribute::EventType(v) | Attribute::EventState(v) => {
                    map.serialize_entry(attr.key(), v)?
                }
                Attribute::DeviceType(t) => map.serialize_entry(attr.key(), t.as_str())?,
                Attribute::Delay(d) => map.serialize_entry(attr.key(), d.as_str())?,
                Attribute::Command(c) => map.serialize_entry(attr.key(), c.as_str())?,
                Attribute::Tamper | Attribute::LowBattery | Attribute::HomeAway => {
                    map.serialize_entry(attr.key(), &true)?
                }
            }
        }
        map.end()
    }
}

/// A fully decoded, dispatchable event.
///
/// Lives for one ingestion cycle: created by the parser, handed to the
/// dispatcher, then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    /// Normalized device address (`212680`, `080`, `B1`, ...)
    pub address: String,
    pub category: Category,
    pub attributes: Attributes,
}

impl DecodedEvent {
    /// `X10/<category>/<address>`
    pub fn topic(&self) -> String {
        format!("{}/{}/{}", TOPIC_ROOT, self.category, self.address)
    }

    /// The attribute whose value decides pulse behaviour:
    /// `func` for buttons, `event_state` for security devices.
    ///
    /// Remotes issuing bare commands carry no `event_state`, so this can be `None`.
    pub fn significant_value(&self) -> Option<&str> {
        match self.category {
            Category::Button => self.attributes.func(),
            Category::Security => self.attributes.event_state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn button(address: &str, func: &str) -> DecodedEvent {
        let mut attributes = Attributes::new();
        attributes.set(Attribute::Func(func.to_string()));
        DecodedEvent {
            address: address.to_string(),
            category: Category::Button,
            attributes,
        }
    }

    #[test]
    fn test_topic() {
        assert_eq!(button("B1", "on").topic(), "X10/button/B1");

        let event = DecodedEvent {
            address: "212680".to_string(),
            category: Category::Security,
            attributes: Attributes::new(),
        };
        assert_eq!(event.topic(), "X10/security/212680");
    }

    #[test]
    fn test_attributes_serialize_in_insertion_order() {
        let mut attrs = Attributes::new();
        attrs.set(Attribute::DeviceType(DeviceType::DS10A));
        attrs.set(Attribute::EventType("contact".to_string()));
        attrs.set(Attribute::EventState("alert".to_string()));
        attrs.set(Attribute::LowBattery);
        attrs.set(Attribute::Delay(Delay::Min));

        assert_eq!(
            serde_json::to_string(&attrs).unwrap(),
            r#"{"device_type":"DS10A","event_type":"contact","event_state":"alert","low_battery":true,"delay":"min"}"#
        );
    }

    #[test]
    fn test_attributes_set_replaces_in_place() {
        let mut attrs = Attributes::new();
        attrs.set(Attribute::Delay(Delay::Min));
        attrs.set(Attribute::Tamper);
        attrs.set(Attribute::Delay(Delay::Max));

        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["delay", "tamper"]);
        assert_eq!(attrs.get("delay"), Some(&Attribute::Delay(Delay::Max)));
    }

    #[test]
    fn test_significant_value() {
        assert_eq!(button("A8", "on").significant_value(), Some("on"));

        let mut attributes = Attributes::new();
        attributes.set(Attribute::DeviceType(DeviceType::KR10A));
        attributes.set(Attribute::Command(SecurityCommand::Disarm));
        let remote = DecodedEvent {
            address: "080".to_string(),
            category: Category::Security,
            attributes,
        };
        assert_eq!(remote.significant_value(), None);
        assert_eq!(remote.attributes.command(), Some(SecurityCommand::Disarm));
    }
}
