//! Incremental reassembly of a chunked bitmap transfer.
//!
//! Bitmap fragments carry no header and no sequence number: fragment order is
//! arrival order, which holds because the transport delivers frames from a
//! single sender without reordering within one transfer. The receiver just
//! appends each fragment at the current write offset until the buffer is
//! exactly full.
//!
//! A fragment that would run past the end of the buffer means the transfer is
//! corrupt (a dropped fragment desynchronized the offset, or two senders
//! interleaved). There is no retransmission; the buffer resets and the next
//! fragment that arrives starts a fresh accumulation.

use std::fmt;

/// Outcome of appending one fragment.
pub enum ReassemblyResult {
    /// Fragment copied; the transfer is still in progress.
    Accepted,
    /// Fragment copied and the buffer is exactly full. Carries the complete
    /// bitmap; the internal state has already reset for the next transfer.
    Completed(Vec<u8>),
    /// Fragment would have exceeded capacity. Nothing was copied and the
    /// write offset has reset to zero.
    Overflowed,
}

impl fmt::Debug for ReassemblyResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReassemblyResult::Accepted => write!(f, "Accepted"),
            ReassemblyResult::Completed(data) => write!(f, "Completed({} bytes)", data.len()),
            ReassemblyResult::Overflowed => write!(f, "Overflowed"),
        }
    }
}

/// Fixed-capacity accumulation buffer for one in-flight bitmap transfer.
///
/// Owned by the badge worker; the write offset never exceeds the capacity and
/// a rejected fragment is never partially written.
pub struct ReassemblyBuffer {
    data: Vec<u8>,
    write_offset: usize,
}

impl ReassemblyBuffer {
    /// Allocate a buffer for a bitmap of exactly `capacity` bytes
    /// (display width x height / 8 for one bit per pixel).
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity],
            write_offset: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// True while a transfer is partially accumulated.
    pub fn in_progress(&self) -> bool {
        self.write_offset > 0
    }

    /// Abandon any partial transfer.
    pub fn reset(&mut self) {
        self.write_offset = 0;
    }

    /// Append the next fragment of the current transfer.
    pub fn append(&mut self, fragment: &[u8]) -> ReassemblyResult {
        let capacity = self.capacity();
        if self.write_offset + fragment.len() > capacity {
            self.write_offset = 0;
            return ReassemblyResult::Overflowed;
        }

        self.data[self.write_offset..self.write_offset + fragment.len()].copy_from_slice(fragment);
        self.write_offset += fragment.len();

        if self.write_offset == capacity {
            self.write_offset = 0;
            ReassemblyResult::Completed(self.data.clone())
        } else {
            ReassemblyResult::Accepted
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_fragments_in_order() {
        let mut buf = ReassemblyBuffer::new(6);
        assert!(matches!(buf.append(&[1, 2]), ReassemblyResult::Accepted));
        assert_eq!(buf.write_offset(), 2);
        assert!(matches!(buf.append(&[3, 4, 5]), ReassemblyResult::Accepted));
        match buf.append(&[6]) {
            ReassemblyResult::Completed(data) => assert_eq!(data, vec![1, 2, 3, 4, 5, 6]),
            other => panic!("expected completion, got {:?}", other),
        }
        assert_eq!(buf.write_offset(), 0);
    }

    #[test]
    fn overflow_copies_nothing_and_resets() {
        let mut buf = ReassemblyBuffer::new(4);
        assert!(matches!(buf.append(&[9, 9, 9]), ReassemblyResult::Accepted));
        assert!(matches!(buf.append(&[1, 1]), ReassemblyResult::Overflowed));
        assert_eq!(buf.write_offset(), 0);
        // A fresh transfer after the reset completes with its own bytes only.
        match buf.append(&[5, 6, 7, 8]) {
            ReassemblyResult::Completed(data) => assert_eq!(data, vec![5, 6, 7, 8]),
            other => panic!("expected completion, got {:?}", other),
        }
    }

    #[test]
    fn exact_fit_completes_rather_than_overflows() {
        let mut buf = ReassemblyBuffer::new(5);
        assert!(matches!(buf.append(&[1, 2, 3]), ReassemblyResult::Accepted));
        // Fragment of length capacity - write_offset is a completion.
        assert!(matches!(
            buf.append(&[4, 5]),
            ReassemblyResult::Completed(_)
        ));
    }

    #[test]
    fn single_full_fragment_completes() {
        let mut buf = ReassemblyBuffer::new(3);
        assert!(matches!(
            buf.append(&[7, 8, 9]),
            ReassemblyResult::Completed(_)
        ));
        assert_eq!(buf.write_offset(), 0);
    }

    #[test]
    fn reset_abandons_partial_transfer() {
        let mut buf = ReassemblyBuffer::new(4);
        assert!(matches!(buf.append(&[1]), ReassemblyResult::Accepted));
        assert!(buf.in_progress());
        buf.reset();
        assert!(!buf.in_progress());
        assert_eq!(buf.write_offset(), 0);
    }
}
