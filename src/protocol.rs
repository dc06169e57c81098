// MIT License - Copyright (c) 2026 Peter Wright
// mochad X10 bridge

use crate::constants::{
    ADDRESS_FIELD, ADDRESS_STRIP_CHARS, FUNC_FIELD, MIN_RF_FIELDS, RX_RF, RX_RF_WINDOW, RX_RFSEC,
    RX_RFSEC_WINDOW,
};
use crate::decoder::decode_func;
use crate::error::{BridgeError, Result};
use crate::event::{Attribute, Attributes, Category, DecodedEvent};

/// Receive lines mochad reports for RF traffic.
///
/// mochad emits one status line per event, prefixed with a fixed-width
/// timestamp. Only two kinds are dispatchable:
///
/// ```text
/// 02/13 23:54:28 Rx RF HouseUnit: B1 Func: On
/// 09/22 15:39:07 Rx RFSEC Addr: 21:26:80 Func: Contact_alert_min_DS10A
/// 09/22 15:39:07 Rx RFSEC Addr: 0x80 Func: Motion_alert_SP554A
/// ```
///
/// Everything else (raw hex dumps, checksum warnings, unknown camera
/// commands, powerline traffic, ...) is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfKind {
    /// `Rx RF`: plain X10 transmitter
    Button,
    /// `Rx RFSEC`: X10 security device
    Security,
}

impl RfKind {
    pub fn category(&self) -> Category {
        match self {
            Self::Button => Category::Button,
            Self::Security => Category::Security,
        }
    }
}

/// A dispatchable line split into its fields, before func decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfLine<'a> {
    pub kind: RfKind,
    /// Normalized address: RFSEC addresses with `:` and `x` removed,
    /// house/unit codes verbatim.
    pub address: String,
    /// Raw `Func:` value.
    pub func: &'a str,
}

/// Work out which kind of RF line this is from the fixed-offset kind window.
///
/// `Rx RFSEC` is checked first since `Rx RF` is its prefix.
pub fn classify(line: &str) -> Option<RfKind> {
    if line.get(RX_RFSEC_WINDOW) == Some(RX_RFSEC) {
        Some(RfKind::Security)
    } else if line.get(RX_RF_WINDOW) == Some(RX_RF) {
        Some(RfKind::Button)
    } else {
        None
    }
}

/// Strip separators from an RFSEC address.
/// e.g., "21:26:80" → "212680", "0x80" → "080"
pub fn normalize_address(raw: &str) -> String {
    raw.chars().filter(|c| !ADDRESS_STRIP_CHARS.contains(c)).collect()
}

/// Split a line into address and func fields.
///
/// Returns `Ok(None)` for lines that are not RF receive lines; these are
/// never errors. An RF line with too few fields is a [`BridgeError::MalformedLine`].
pub fn parse_line(line: &str) -> Result<Option<RfLine<'_>>> {
    let Some(kind) = classify(line) else {
        return Ok(None);
    };

    let fields: Vec<&str> = line.split(' ').collect();
    if fields.len() < MIN_RF_FIELDS {
        return Err(BridgeError::MalformedLine {
            line: line.to_string(),
            expected: MIN_RF_FIELDS,
            found: fields.len(),
        });
    }

    let address = match kind {
        RfKind::Security => normalize_address(fields[ADDRESS_FIELD]),
        RfKind::Button => fields[ADDRESS_FIELD].to_string(),
    };

    Ok(Some(RfLine {
        kind,
        address,
        func: fields[FUNC_FIELD],
    }))
}

/// Parse a line and decode its func into a dispatchable event.
///
/// `Ok(None)` means "nothing to dispatch". Errors are confined to this line.
pub fn decode_line(line: &str) -> Result<Option<DecodedEvent>> {
    let Some(rf) = parse_line(line)? else {
        return Ok(None);
    };

    let attributes = match rf.kind {
        RfKind::Security => decode_func(rf.func)?,
        RfKind::Button => {
            let mut attrs = Attributes::new();
            attrs.set(Attribute::Func(rf.func.to_lowercase()));
            attrs
        }
    };

    Ok(Some(DecodedEvent {
        address: rf.address,
        category: rf.kind.category(),
        attributes,
    }))
}
