//! Inbound payload classification.
//!
//! A payload that is non-empty and starts with [`CONTROL_MARKER`] is a JSON
//! control message; everything else is a bitmap fragment for the reassembly
//! state machine. Decode failures are logged and produce no action at all -
//! a malformed control message never leaks into the bitmap path.

use log::{debug, error};

use crate::logutil::escape_log;
use crate::protocol::{ControlMessage, CONTROL_MARKER};

use super::textnorm::remove_diacritics;

/// Operator reset codeword. A text send whose cleaned additional-info field
/// equals this string soft-restarts the badge instead of rendering. Legacy
/// out-of-band control channel; surfaced here as an explicit action so call
/// sites never sniff the string themselves.
pub const RESET_CODEWORD: &str = "reset666";

/// What the worker should do with one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchAction {
    /// Clear the display and defensively abandon any partial bitmap transfer.
    Clear,
    /// Soft-restart the device (reset codeword).
    Restart,
    /// Render the cleaned text fields.
    RenderText {
        first_name: String,
        last_name: String,
        additional_info: String,
    },
    /// Opaque binary fragment; feed it to the reassembly buffer.
    BitmapFragment,
}

/// Classify one payload. Returns `None` for a malformed or empty control
/// message, which is a logged no-op.
pub fn dispatch(payload: &[u8]) -> Option<DispatchAction> {
    if payload.is_empty() || payload[0] != CONTROL_MARKER {
        return Some(DispatchAction::BitmapFragment);
    }

    let msg: ControlMessage = match serde_json::from_slice(payload) {
        Ok(msg) => msg,
        Err(e) => {
            error!(
                "malformed control message ({}): {}",
                e,
                escape_log(&String::from_utf8_lossy(payload))
            );
            return None;
        }
    };

    if msg.clear.is_some() {
        return Some(DispatchAction::Clear);
    }

    let first_name = remove_diacritics(msg.first_name.as_deref().unwrap_or(""));
    let last_name = remove_diacritics(msg.last_name.as_deref().unwrap_or(""));
    let additional_info = remove_diacritics(msg.additional_info.as_deref().unwrap_or(""));

    if additional_info == RESET_CODEWORD {
        return Some(DispatchAction::Restart);
    }

    if first_name.is_empty() && last_name.is_empty() && additional_info.is_empty() {
        debug!("control message with no clear flag and no text fields; ignoring");
        return None;
    }

    Some(DispatchAction::RenderText {
        first_name,
        last_name,
        additional_info,
    })
}
