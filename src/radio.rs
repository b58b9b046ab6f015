//! The radio transport seam.
//!
//! The physical link is fire-and-forget and connectionless: a send either gets
//! accepted by the transport or it does not, with no partial-send semantics.
//! Everything above this trait treats the outcome as plain success/failure.

use thiserror::Error;

use crate::protocol::PeerAddress;

#[derive(Debug, Error)]
pub enum RadioError {
    /// No radio device is attached to this gateway.
    #[error("no radio device attached")]
    NotConnected,

    /// The transport refused the frame.
    #[error("transport rejected frame: {0}")]
    Rejected(String),
}

/// Send-side interface the gateway consumes.
///
/// Implementations wrap whatever physically moves frames; the gateway only
/// requires that `send` returns promptly and never delivers more than one
/// frame per call.
pub trait RadioTransport: Send + Sync {
    /// Announce a receiver so the transport will accept frames addressed to it.
    fn register_peer(&self, peer: PeerAddress) -> Result<(), RadioError>;

    /// Transmit one frame, best effort.
    fn send(&self, destination: PeerAddress, payload: &[u8]) -> Result<(), RadioError>;
}

/// Placeholder transport used when the gateway starts without a radio device,
/// so the HTTP surface stays available. Every send fails with
/// [`RadioError::NotConnected`] and the failure is echoed to HTTP callers.
pub struct DisconnectedRadio;

impl RadioTransport for DisconnectedRadio {
    fn register_peer(&self, _peer: PeerAddress) -> Result<(), RadioError> {
        Ok(())
    }

    fn send(&self, _destination: PeerAddress, _payload: &[u8]) -> Result<(), RadioError> {
        Err(RadioError::NotConnected)
    }
}
