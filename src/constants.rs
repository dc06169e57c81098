// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use std::fmt;
use std::ops::Range;

/// mochad prefixes every line with a fixed-width `MM/DD HH:MM:SS ` timestamp,
/// so the message kind always starts at this character offset.
pub const MESSAGE_KIND_OFFSET: usize = 15;

/// `Rx RFSEC`: received RF security message (sensors and remotes).
pub const RX_RFSEC: &str = "Rx RFSEC";

/// `Rx RF`: received RF message from a plain X10 transmitter.
pub const RX_RF: &str = "Rx RF";

/// Character window holding [`RX_RFSEC`] (`15..23`).
pub const RX_RFSEC_WINDOW: Range<usize> = MESSAGE_KIND_OFFSET..MESSAGE_KIND_OFFSET + RX_RFSEC.len();

/// Character window holding [`RX_RF`] (`15..20`).
pub const RX_RF_WINDOW: Range<usize> = MESSAGE_KIND_OFFSET..MESSAGE_KIND_OFFSET + RX_RF.len();

/// Space-separated field holding the address (`Addr:` / `HouseUnit:` value).
pub const ADDRESS_FIELD: usize = 5;

/// Space-separated field holding the `Func:` value.
pub const FUNC_FIELD: usize = 7;

/// Minimum number of space-separated fields in a dispatchable RF line.
pub const MIN_RF_FIELDS: usize = FUNC_FIELD + 1;

/// Separator between tokens of an RFSEC func, e.g. `Contact_alert_min_DS10A`.
pub const FUNC_TOKEN_SEPARATOR: char = '_';

/// Characters removed from RFSEC addresses (`21:26:80` → `212680`, `0x80` → `080`).
pub const ADDRESS_STRIP_CHARS: [char; 2] = [':', 'x'];

/// Root of every published topic.
pub const TOPIC_ROOT: &str = "X10";

/// Value of the significant attribute that triggers an on→off pulse.
pub const PULSE_TRIGGER: &str = "on";

pub const DEFAULT_MOCHAD_HOST: &str = "localhost";
pub const DEFAULT_MOCHAD_PORT: u16 = 1099;
pub const DEFAULT_MQTT_HOST: &str = "localhost";
pub const DEFAULT_MQTT_PORT: u16 = 1883;
pub const DEFAULT_MQTT_CLIENT_ID: &str = "mochad2mqtt";
pub const DEFAULT_MQTT_KEEP_ALIVE_SECS: u64 = 15;

/// Delay after a failed read before trying again.
pub const DEFAULT_READ_RETRY_DELAY_MS: u64 = 10_000;

/// Consecutive failed reads after which the read loop gives up.
pub const DEFAULT_MAX_READ_RETRIES: u32 = 300;

/// Delay after a read that returned no data.
pub const DEFAULT_IDLE_READ_DELAY_MS: u64 = 1_000;

/// Size of the socket read buffer; mochad lines are far shorter.
pub const READ_BUFFER_SIZE: usize = 1024;

/// Unterminated input kept while waiting for a newline. Anything longer is
/// not a mochad line and is dropped.
pub const MAX_PENDING_LINE_BYTES: usize = 4 * READ_BUFFER_SIZE;

/// X10 security device models reported in the last token of an RFSEC func.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    /// DS10A door/window sensor
    DS10A,
    /// DS12A door/window sensor
    DS12A,
    /// MS10A motion sensor
    MS10A,
    /// SP554A motion sensor
    SP554A,
    /// KR10A security keychain remote
    KR10A,
    /// KR15A big-button security remote
    KR15A,
    /// SH624 security console
    SH624,
}

/// Motion and door/window sensors: their funcs start with `<event type>_<event state>`.
pub const MOTION_DOOR_WINDOW_SENSORS: [DeviceType; 4] = [
    DeviceType::DS10A,
    DeviceType::DS12A,
    DeviceType::MS10A,
    DeviceType::SP554A,
];

/// Security remotes: their funcs carry commands only.
pub const SECURITY_REMOTES: [DeviceType; 3] = [DeviceType::KR10A, DeviceType::KR15A, DeviceType::SH624];

/// How the tokens in front of the device type are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceClass {
    Sensor,
    Remote,
}

impl DeviceType {
    /// Look up a device type by the name mochad reports (case-sensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        MOTION_DOOR_WINDOW_SENSORS
            .iter()
            .chain(SECURITY_REMOTES.iter())
            .copied()
            .find(|t| t.as_str() == s)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DS10A => "DS10A",
            Self::DS12A => "DS12A",
            Self::MS10A => "MS10A",
            Self::SP554A => "SP554A",
            Self::KR10A => "KR10A",
            Self::KR15A => "KR15A",
            Self::SH624 => "SH624",
        }
    }

    pub fn class(&self) -> DeviceClass {
        if MOTION_DOOR_WINDOW_SENSORS.contains(self) {
            DeviceClass::Sensor
        } else {
            DeviceClass::Remote
        }
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_windows() {
        assert_eq!(RX_RFSEC_WINDOW, 15..23);
        assert_eq!(RX_RF_WINDOW, 15..20);
        assert_eq!(MIN_RF_FIELDS, 8);
    }

    #[test]
    fn test_device_type_from_name() {
        assert_eq!(DeviceType::from_name("DS10A"), Some(DeviceType::DS10A));
        assert_eq!(DeviceType::from_name("SP554A"), Some(DeviceType::SP554A));
        assert_eq!(DeviceType::from_name("SH624"), Some(DeviceType::SH624));
        assert_eq!(DeviceType::from_name("ds10a"), None);
        assert_eq!(DeviceType::from_name("XYZ"), None);
    }

    #[test]
    fn test_device_class() {
        for t in MOTION_DOOR_WINDOW_SENSORS {
            assert_eq!(t.class(), DeviceClass::Sensor, "{t}");
        }
        for t in SECURITY_REMOTES {
            assert_eq!(t.class(), DeviceClass::Remote, "{t}");
        }
    }

    #[test]
    fn test_device_type_name_roundtrip() {
        for t in MOTION_DOOR_WINDOW_SENSORS.iter().chain(SECURITY_REMOTES.iter()) {
            assert_eq!(DeviceType::from_name(t.as_str()), Some(*t));
        }
    }
}
