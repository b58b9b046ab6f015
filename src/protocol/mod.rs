//! # Wire Protocol Module
//!
//! Shared wire-level types for the badge radio link: the frame MTU, the
//! control-message marker, peer addresses, and the JSON control message
//! exchanged between gateway and badge.
//!
//! ## Wire formats
//!
//! The radio delivers opaque frames of at most [`MAX_FRAME_PAYLOAD`] bytes.
//! Two payload kinds share the link, distinguished by the first byte only:
//!
//! - **Control message**: a JSON object (first byte `{`) with optional string
//!   keys `clear`, `first_name`, `last_name`, `additional_info`.
//! - **Bitmap fragment**: raw bytes, no header. Fragments of one transfer
//!   arrive in order from a single sender; there is no sequence numbering.
//!
//! The image upload path into the gateway prefixes the raw bitmap with a
//! fixed-width textual address header (`AA:BB:CC:DD:EE:FF`) and a single
//! newline; see [`crate::gateway::sender`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod queue;
pub mod reassembly;

pub use queue::{frame_queue, FrameQueue, FrameReceiver};
pub use reassembly::{ReassemblyBuffer, ReassemblyResult};

/// Maximum payload the radio transport can deliver in a single frame.
pub const MAX_FRAME_PAYLOAD: usize = 250;

/// First byte of a structured control message on the wire. Anything else is
/// treated as a bitmap fragment.
pub const CONTROL_MARKER: u8 = b'{';

/// Length of the textual form of a [`PeerAddress`]: `AA:BB:CC:DD:EE:FF`.
pub const ADDR_STR_LEN: usize = 17;

/// Wire-level protocol errors.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The textual peer address did not parse as six colon-separated hex octets.
    #[error("invalid peer address: {0}")]
    InvalidAddress(String),

    /// A frame payload exceeded the transport MTU.
    #[error("frame payload of {len} bytes exceeds MTU of {MAX_FRAME_PAYLOAD}")]
    OversizeFrame { len: usize },
}

/// 6-byte hardware address of a badge or gateway radio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerAddress(pub [u8; 6]);

impl PeerAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for PeerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.0;
        write!(
            f,
            "{:02X}:{:02X}:{:02X}:{:02X}:{:02X}:{:02X}",
            b[0], b[1], b[2], b[3], b[4], b[5]
        )
    }
}

impl FromStr for PeerAddress {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut octets = [0u8; 6];
        let mut parts = s.split(':');
        for octet in octets.iter_mut() {
            let part = parts
                .next()
                .ok_or_else(|| ProtocolError::InvalidAddress(s.to_string()))?;
            if part.len() != 2 {
                return Err(ProtocolError::InvalidAddress(s.to_string()));
            }
            *octet = u8::from_str_radix(part, 16)
                .map_err(|_| ProtocolError::InvalidAddress(s.to_string()))?;
        }
        if parts.next().is_some() {
            return Err(ProtocolError::InvalidAddress(s.to_string()));
        }
        Ok(PeerAddress(octets))
    }
}

/// One MTU-bounded unit of data delivered by the radio transport.
///
/// Produced by the receive callback, copied into the frame queue at receipt,
/// consumed exactly once by the badge worker.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Hardware address of the sender.
    pub source: PeerAddress,
    /// Raw payload, at most [`MAX_FRAME_PAYLOAD`] bytes.
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(source: PeerAddress, payload: Vec<u8>) -> Self {
        Self { source, payload }
    }
}

/// Structured display command carried in a JSON payload.
///
/// All fields are optional on the wire. `clear` is a presence flag: any value
/// means "clear the display". The three text fields drive the text render
/// path. Transient; exists only for the duration of one dispatch call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ControlMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clear: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl ControlMessage {
    /// A clear command, as the gateway emits it.
    pub fn clear() -> Self {
        ControlMessage {
            clear: Some("1".to_string()),
            ..Default::default()
        }
    }

    /// A text command. Empty fields are still serialized so the badge sees
    /// explicit empty strings rather than absent keys.
    pub fn text(first_name: &str, last_name: &str, additional_info: &str) -> Self {
        ControlMessage {
            clear: None,
            first_name: Some(first_name.to_string()),
            last_name: Some(last_name.to_string()),
            additional_info: Some(additional_info.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_roundtrip() {
        let addr: PeerAddress = "34:5F:45:2D:B1:68".parse().unwrap();
        assert_eq!(addr.octets(), [0x34, 0x5F, 0x45, 0x2D, 0xB1, 0x68]);
        assert_eq!(addr.to_string(), "34:5F:45:2D:B1:68");
        assert_eq!(addr.to_string().len(), ADDR_STR_LEN);
    }

    #[test]
    fn address_parse_is_case_insensitive() {
        let lower: PeerAddress = "aa:bb:cc:dd:ee:ff".parse().unwrap();
        let upper: PeerAddress = "AA:BB:CC:DD:EE:FF".parse().unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn address_parse_rejects_malformed() {
        assert!("AA:BB:CC:DD:EE".parse::<PeerAddress>().is_err());
        assert!("AA:BB:CC:DD:EE:FF:00".parse::<PeerAddress>().is_err());
        assert!("AA-BB-CC-DD-EE-FF".parse::<PeerAddress>().is_err());
        assert!("AA:BB:CC:DD:EE:GG".parse::<PeerAddress>().is_err());
        assert!("A:BB:CC:DD:EE:FFF".parse::<PeerAddress>().is_err());
    }

    #[test]
    fn control_message_wire_shape() {
        let msg = ControlMessage::text("Jana", "Novakova", "Booth 12");
        let wire = serde_json::to_vec(&msg).unwrap();
        assert_eq!(wire[0], CONTROL_MARKER);
        assert!(!String::from_utf8(wire).unwrap().contains("clear"));

        let clear = serde_json::to_string(&ControlMessage::clear()).unwrap();
        assert!(clear.contains("\"clear\""));
        assert!(!clear.contains("first_name"));
    }
}
