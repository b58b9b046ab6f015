//! # Peer Address Persistence
//!
//! The gateway remembers which badge addresses have been registered so they
//! survive restarts and can be re-registered with the radio transport at
//! startup. Backed by a sled tree keyed on the canonical uppercase textual
//! address; values are empty.

use std::path::Path;

use thiserror::Error;

use crate::protocol::PeerAddress;

/// Errors from the peer address store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Wrapper around sled's error type.
    #[error("sled error: {0}")]
    Sled(#[from] sled::Error),

    /// Wrapper around IO errors (directory creation).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored key did not parse back into an address. Indicates external
    /// tampering with the database.
    #[error("corrupt peer record: {0}")]
    CorruptRecord(String),
}

/// Persisted set of known badge addresses.
pub struct PeerStore {
    _db: sled::Db,
    peers: sled::Tree,
}

impl PeerStore {
    /// Open (or create) the store under `data_dir`.
    pub fn open<P: AsRef<Path>>(data_dir: P) -> Result<Self, StoreError> {
        let path = data_dir.as_ref().join("peers");
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = sled::open(&path)?;
        let peers = db.open_tree("peers")?;
        Ok(Self { _db: db, peers })
    }

    /// All known addresses, in stored (lexical) order.
    pub fn list(&self) -> Result<Vec<PeerAddress>, StoreError> {
        let mut out = Vec::new();
        for entry in self.peers.iter() {
            let (key, _) = entry?;
            let text = String::from_utf8(key.to_vec())
                .map_err(|e| StoreError::CorruptRecord(e.to_string()))?;
            let addr = text
                .parse()
                .map_err(|_| StoreError::CorruptRecord(text.clone()))?;
            out.push(addr);
        }
        Ok(out)
    }

    /// Add an address. Returns `false` when it was already registered.
    pub fn add(&self, addr: PeerAddress) -> Result<bool, StoreError> {
        let previous = self.peers.insert(Self::key(addr), &[])?;
        self.peers.flush()?;
        Ok(previous.is_none())
    }

    /// Remove an address. Returns `false` when it was not registered.
    pub fn remove(&self, addr: PeerAddress) -> Result<bool, StoreError> {
        let previous = self.peers.remove(Self::key(addr))?;
        self.peers.flush()?;
        Ok(previous.is_some())
    }

    pub fn contains(&self, addr: PeerAddress) -> Result<bool, StoreError> {
        Ok(self.peers.contains_key(Self::key(addr))?)
    }

    // Parsing canonicalizes case, so lookups are case-insensitive for free.
    fn key(addr: PeerAddress) -> Vec<u8> {
        addr.to_string().into_bytes()
    }
}
