// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

//! Decoder for the `Func:` token of `Rx RFSEC` lines.
//!
//! mochad reports security events as a single underscore-joined token whose
//! last element is the device model, e.g. `Contact_alert_min_tamper_low_DS10A`
//! or `Arm_Home_KR10A`.

use crate::constants::{DeviceClass, DeviceType, FUNC_TOKEN_SEPARATOR};
use crate::error::{BridgeError, Result};
use crate::event::{Attribute, Attributes, Delay, SecurityCommand};

/// Decode an RFSEC func string into its attribute set.
///
/// The result always starts with `device_type`; sensors follow it with
/// `event_type` and `event_state`, then any flags and commands in the order
/// they appear in the func.
pub fn decode_func(raw_func: &str) -> Result<Attributes> {
    let mut tokens: Vec<&str> = raw_func.split(FUNC_TOKEN_SEPARATOR).collect();
    // split() always yields at least one element
    let device_name = tokens.pop().unwrap_or_default();

    let device_type = DeviceType::from_name(device_name).ok_or_else(|| BridgeError::UnknownDeviceType {
        func: raw_func.to_string(),
        device_type: device_name.to_string(),
    })?;

    let mut attrs = Attributes::new();
    attrs.set(Attribute::DeviceType(device_type));

    let start = match device_type.class() {
        DeviceClass::Sensor => {
            let [event_type, event_state, ..] = tokens.as_slice() else {
                return Err(BridgeError::MalformedFunc {
                    func: raw_func.to_string(),
                    details: format!("{device_type} requires an event type and state"),
                });
            };
            attrs.set(Attribute::EventType(event_type.to_lowercase()));
            attrs.set(Attribute::EventState(event_state.to_lowercase()));
            2
        }
        DeviceClass::Remote => 0,
    };

    let mut i = start;
    while i < tokens.len() {
        let (attr, consumed) = match_parameter(&tokens[i..]).ok_or_else(|| BridgeError::UnknownFuncParameter {
            func: raw_func.to_string(),
            parameter: tokens[i].to_string(),
        })?;
        attrs.set(attr);
        i += consumed;
    }

    Ok(attrs)
}

/// Match the parameter at the head of `rest`, returning the attribute and
/// how many tokens it consumed. `rest` is never empty.
///
/// Rules are tried in order and the first match wins. A rule that needs a
/// following token does not match when there is none.
fn match_parameter(rest: &[&str]) -> Option<(Attribute, usize)> {
    let next = rest.get(1).copied();
    let at_end = rest.len() == 1;

    match (rest[0], next) {
        ("min" | "max", _) => Delay::from_token(rest[0]).map(|d| (Attribute::Delay(d), 1)),
        ("tamper", _) => Some((Attribute::Tamper, 1)),
        ("low", _) => Some((Attribute::LowBattery, 1)),
        ("Home", Some("Away")) => Some((Attribute::HomeAway, 2)),
        ("Arm", _) if at_end => Some((Attribute::Command(SecurityCommand::Arm), 1)),
        ("Arm", Some("Home")) => Some((Attribute::Command(SecurityCommand::ArmHome), 2)),
        ("Arm", Some("Away")) => Some((Attribute::Command(SecurityCommand::ArmAway), 2)),
        ("Disarm", _) => Some((Attribute::Command(SecurityCommand::Disarm), 1)),
        ("Panic", _) => Some((Attribute::Command(SecurityCommand::Panic), 1)),
        ("Lights", Some("on")) => Some((Attribute::Command(SecurityCommand::LightsOn), 2)),
        ("Lights", Some("off")) => Some((Attribute::Command(SecurityCommand::LightsOff), 2)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(func: &str) -> String {
        serde_json::to_string(&decode_func(func).unwrap()).unwrap()
    }

    #[test]
    fn test_sensor_with_all_flags() {
        let attrs = decode_func("Contact_alert_min_tamper_low_DS10A").unwrap();
        assert_eq!(
            attrs.keys().collect::<Vec<_>>(),
            vec!["device_type", "event_type", "event_state", "delay", "tamper", "low_battery"]
        );
        assert_eq!(attrs.device_type(), Some(DeviceType::DS10A));
        assert_eq!(attrs.get("event_type"), Some(&Attribute::EventType("contact".to_string())));
        assert_eq!(attrs.event_state(), Some("alert"));
        assert_eq!(attrs.get("delay"), Some(&Attribute::Delay(Delay::Min)));
        assert!(attrs.contains_key("tamper"));
        assert!(attrs.contains_key("low_battery"));

        assert_eq!(
            payload("Contact_alert_min_tamper_low_DS10A"),
            r#"{"device_type":"DS10A","event_type":"contact","event_state":"alert","delay":"min","tamper":true,"low_battery":true}"#
        );
    }

    #[test]
    fn test_sensor_event_fields_lowercased() {
        let attrs = decode_func("Motion_ALERT_SP554A").unwrap();
        assert_eq!(attrs.get("event_type"), Some(&Attribute::EventType("motion".to_string())));
        assert_eq!(attrs.event_state(), Some("alert"));
        assert_eq!(attrs.len(), 3);
    }

    #[test]
    fn test_sensor_normal_max_low() {
        assert_eq!(
            payload("Contact_normal_max_low_DS10A"),
            r#"{"device_type":"DS10A","event_type":"contact","event_state":"normal","delay":"max","low_battery":true}"#
        );
    }

    #[test]
    fn test_sensor_home_away() {
        let attrs = decode_func("Motion_normal_Home_Away_SP554A").unwrap();
        assert!(attrs.contains_key("home_away"));
        assert_eq!(attrs.len(), 4);
    }

    #[test]
    fn test_sensor_missing_event_fields() {
        assert!(matches!(decode_func("DS10A"), Err(BridgeError::MalformedFunc { .. })));
        assert!(matches!(decode_func("Contact_DS10A"), Err(BridgeError::MalformedFunc { .. })));
    }

    #[test]
    fn test_remote_arm_home_consumes_both_tokens() {
        let attrs = decode_func("Arm_Home_KR10A").unwrap();
        assert_eq!(attrs.device_type(), Some(DeviceType::KR10A));
        assert_eq!(attrs.command(), Some(SecurityCommand::ArmHome));
        assert_eq!(attrs.len(), 2);
        assert!(!attrs.contains_key("home_away"));
    }

    #[test]
    fn test_remote_arm_away() {
        let attrs = decode_func("Arm_Away_KR15A").unwrap();
        assert_eq!(attrs.command(), Some(SecurityCommand::ArmAway));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_remote_bare_arm_at_end() {
        let attrs = decode_func("Arm_SH624").unwrap();
        assert_eq!(attrs.command(), Some(SecurityCommand::Arm));
    }

    #[test]
    fn test_remote_arm_followed_by_unknown_token() {
        let err = decode_func("Arm_Now_KR10A").unwrap_err();
        match err {
            BridgeError::UnknownFuncParameter { parameter, .. } => assert_eq!(parameter, "Arm"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remote_simple_commands() {
        assert_eq!(decode_func("Disarm_KR10A").unwrap().command(), Some(SecurityCommand::Disarm));
        assert_eq!(decode_func("Panic_KR10A").unwrap().command(), Some(SecurityCommand::Panic));
        assert_eq!(
            decode_func("Lights_on_SH624").unwrap().command(),
            Some(SecurityCommand::LightsOn)
        );
        assert_eq!(
            decode_func("Lights_off_SH624").unwrap().command(),
            Some(SecurityCommand::LightsOff)
        );
        assert_eq!(
            payload("Lights_on_KR10A"),
            r#"{"device_type":"KR10A","command":"lights_on"}"#
        );
    }

    #[test]
    fn test_remote_with_flags() {
        assert_eq!(
            payload("Disarm_max_low_KR10A"),
            r#"{"device_type":"KR10A","command":"disarm","delay":"max","low_battery":true}"#
        );
    }

    #[test]
    fn test_lookahead_at_end_falls_through() {
        assert!(matches!(
            decode_func("Lights_KR10A"),
            Err(BridgeError::UnknownFuncParameter { .. })
        ));
        assert!(matches!(
            decode_func("Motion_alert_Home_SP554A"),
            Err(BridgeError::UnknownFuncParameter { .. })
        ));
    }

    #[test]
    fn test_unknown_device_type() {
        let err = decode_func("Motion_alert_XX99").unwrap_err();
        match err {
            BridgeError::UnknownDeviceType { device_type, func } => {
                assert_eq!(device_type, "XX99");
                assert_eq!(func, "Motion_alert_XX99");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(decode_func(""), Err(BridgeError::UnknownDeviceType { .. })));
    }

    #[test]
    fn test_unknown_parameter() {
        let err = decode_func("Contact_alert_bogus_DS10A").unwrap_err();
        match err {
            BridgeError::UnknownFuncParameter { parameter, .. } => assert_eq!(parameter, "bogus"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remote_with_no_parameters() {
        let attrs = decode_func("KR10A").unwrap();
        assert_eq!(attrs.len(), 1);
        assert_eq!(attrs.command(), None);
    }
}
