//! Bounded handoff queue between the radio receive callback and the worker.
//!
//! The receive callback runs in the transport's interrupt-like context: it
//! must never block and never allocate beyond copying the frame it was handed.
//! [`FrameQueue::try_enqueue`] is therefore non-blocking and returns a plain
//! `bool` - a full queue or an oversize frame means the frame is silently
//! dropped, because that context has no meaningful way to report failure.
//!
//! The worker is the sole consumer and has no other duty, so
//! [`FrameReceiver::dequeue`] simply waits until a frame arrives. Overflow
//! under sustained load is accepted lossy degradation, not an error: the
//! capacity only needs to absorb bursts between worker scheduling slices.

use tokio::sync::mpsc;

use super::{Frame, MAX_FRAME_PAYLOAD};

/// Default queue depth, sized for bursty arrival between worker slices.
pub const DEFAULT_QUEUE_DEPTH: usize = 30;

/// Producer half, handed to the radio receive callback.
#[derive(Clone)]
pub struct FrameQueue {
    tx: mpsc::Sender<Frame>,
}

/// Consumer half, owned by the badge worker.
pub struct FrameReceiver {
    rx: mpsc::Receiver<Frame>,
}

/// Create a bounded frame queue of the given capacity.
pub fn frame_queue(capacity: usize) -> (FrameQueue, FrameReceiver) {
    let (tx, rx) = mpsc::channel(capacity);
    (FrameQueue { tx }, FrameReceiver { rx })
}

impl FrameQueue {
    /// Enqueue a received frame without blocking.
    ///
    /// Returns `false` when the queue is full or the payload exceeds the
    /// transport MTU; the frame is dropped in both cases.
    pub fn try_enqueue(&self, frame: Frame) -> bool {
        if frame.payload.len() > MAX_FRAME_PAYLOAD {
            return false;
        }
        self.tx.try_send(frame).is_ok()
    }
}

impl FrameReceiver {
    /// Wait for the next frame. Returns `None` once every producer handle has
    /// been dropped, which ends the worker loop.
    pub async fn dequeue(&mut self) -> Option<Frame> {
        self.rx.recv().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::PeerAddress;

    fn frame(payload: Vec<u8>) -> Frame {
        Frame::new(PeerAddress([0x34, 0x5F, 0x45, 0x2D, 0xB1, 0x68]), payload)
    }

    #[tokio::test]
    async fn delivers_in_arrival_order() {
        let (q, mut rx) = frame_queue(4);
        assert!(q.try_enqueue(frame(vec![1])));
        assert!(q.try_enqueue(frame(vec![2])));
        assert_eq!(rx.dequeue().await.unwrap().payload, vec![1]);
        assert_eq!(rx.dequeue().await.unwrap().payload, vec![2]);
    }

    #[tokio::test]
    async fn drops_when_full() {
        let (q, mut rx) = frame_queue(2);
        assert!(q.try_enqueue(frame(vec![1])));
        assert!(q.try_enqueue(frame(vec![2])));
        assert!(!q.try_enqueue(frame(vec![3])));
        // Draining makes room again.
        let _ = rx.dequeue().await.unwrap();
        assert!(q.try_enqueue(frame(vec![4])));
    }

    #[tokio::test]
    async fn drops_oversize_payloads() {
        let (q, mut rx) = frame_queue(4);
        assert!(!q.try_enqueue(frame(vec![0u8; MAX_FRAME_PAYLOAD + 1])));
        assert!(q.try_enqueue(frame(vec![0u8; MAX_FRAME_PAYLOAD])));
        assert_eq!(rx.dequeue().await.unwrap().payload.len(), MAX_FRAME_PAYLOAD);
    }
}
