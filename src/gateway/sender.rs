//! Upload framing and the paced chunk sender.
//!
//! The upload body on the HTTP boundary is a fixed-width textual address
//! header (`AA:BB:CC:DD:EE:FF`), one newline, then the raw bitmap bytes. The
//! header is validated here before any radio activity; a malformed header is
//! a client error.
//!
//! Transmission runs on a spawned task that owns its job exclusively, so the
//! HTTP handler returns as soon as the job is validated and spawned. Chunks
//! go out back to back with a fixed inter-frame delay to respect the
//! transport duty cycle; a failed chunk is logged and the sequence continues
//! (best effort - the receiver's reassembly will overflow or stall, and the
//! next full transfer supersedes it).

use std::sync::Arc;
use std::time::Duration;

use log::{error, info};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tokio_util::task::TaskTracker;

use crate::protocol::{PeerAddress, ADDR_STR_LEN};
use crate::radio::RadioTransport;

/// Address header plus the newline delimiter.
pub const UPLOAD_HEADER_LEN: usize = ADDR_STR_LEN + 1;

/// Client-side errors in an upload body, rejected before the radio is touched.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("payload of {len} bytes outside [{min}, {max}]")]
    BadLength { len: usize, min: usize, max: usize },

    #[error("missing newline after address header")]
    MissingDelimiter,

    #[error("invalid address in header: {0}")]
    InvalidAddress(String),
}

/// Split an upload body into its destination address and bitmap bytes.
///
/// `max_bitmap` is the full-frame bitmap size; a body longer than header +
/// bitmap cannot belong to this panel.
pub fn split_upload(body: &[u8], max_bitmap: usize) -> Result<(PeerAddress, &[u8]), UploadError> {
    if body.len() < UPLOAD_HEADER_LEN || body.len() > UPLOAD_HEADER_LEN + max_bitmap {
        return Err(UploadError::BadLength {
            len: body.len(),
            min: UPLOAD_HEADER_LEN,
            max: UPLOAD_HEADER_LEN + max_bitmap,
        });
    }
    if body[ADDR_STR_LEN] != b'\n' {
        return Err(UploadError::MissingDelimiter);
    }
    let header = std::str::from_utf8(&body[..ADDR_STR_LEN])
        .map_err(|_| UploadError::InvalidAddress("non-utf8 header".to_string()))?;
    let destination = header
        .parse()
        .map_err(|_| UploadError::InvalidAddress(header.to_string()))?;
    Ok((destination, &body[UPLOAD_HEADER_LEN..]))
}

/// Fragments bitmaps into MTU-sized frames and paces their transmission on a
/// background task, decoupling the radio path from the HTTP request thread.
#[derive(Clone)]
pub struct ChunkedSender {
    radio: Arc<dyn RadioTransport>,
    chunk_size: usize,
    chunk_delay: Duration,
    transfers: TaskTracker,
}

impl ChunkedSender {
    pub fn new(radio: Arc<dyn RadioTransport>, chunk_size: usize, chunk_delay: Duration) -> Self {
        Self {
            radio,
            chunk_size,
            chunk_delay,
            transfers: TaskTracker::new(),
        }
    }

    /// Number of frames a bitmap of `len` bytes will occupy.
    pub fn chunk_count(&self, len: usize) -> usize {
        len.div_ceil(self.chunk_size)
    }

    /// Spawn the pacing task for one bitmap. Returns immediately; the task
    /// owns the job and terminates once every chunk has been attempted.
    pub fn send_bitmap(&self, destination: PeerAddress, bitmap: Vec<u8>) -> JoinHandle<()> {
        let radio = Arc::clone(&self.radio);
        let chunk_size = self.chunk_size;
        let delay = self.chunk_delay;
        self.transfers.spawn(async move {
            let mut sent = 0usize;
            for (index, chunk) in bitmap.chunks(chunk_size).enumerate() {
                if let Err(e) = radio.send(destination, chunk) {
                    error!("chunk {} to {} failed: {}", index, destination, e);
                } else {
                    sent += 1;
                }
                sleep(delay).await;
            }
            info!(
                "bitmap transfer to {} finished: {}/{} chunks accepted",
                destination,
                sent,
                bitmap.len().div_ceil(chunk_size)
            );
        })
    }

    /// Wait for in-flight transfers to drain. Called once on shutdown; new
    /// jobs must not be spawned afterwards.
    pub async fn shutdown(&self) {
        self.transfers.close();
        self.transfers.wait().await;
    }
}
