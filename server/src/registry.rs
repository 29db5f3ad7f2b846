//! Live-connection registry for the authoritative server
//!
//! Tracks the delayed-send handle for every connected client. The registry
//! lives inside the same lock as the game state so that decisions which
//! depend on the connection count (coin spawning, the WAITING/PLAYING
//! status) are made atomically with the state they guard.

use log::info;
use shared::latency::DelayedWriter;
use std::collections::HashMap;

/// Connected clients indexed by their player id.
///
/// The registry never performs network I/O itself: it only stores the
/// [`DelayedWriter`] handles. The broadcast loop clones the handles out,
/// releases the state lock, and performs the fan-out without it.
pub struct ConnectionRegistry {
    connections: HashMap<u32, DelayedWriter>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: HashMap::new(),
        }
    }

    /// Registers the outbound handle for a newly connected player.
    pub fn insert(&mut self, id: u32, writer: DelayedWriter) {
        info!("Connection registered for player {}", id);
        self.connections.insert(id, writer);
    }

    /// Removes a connection, returning its handle so the caller can close
    /// it. Removing an already-gone connection is a no-op; both the reader
    /// task and the broadcast loop may race to clean up the same client.
    pub fn remove(&mut self, id: u32) -> Option<DelayedWriter> {
        let removed = self.connections.remove(&id);
        if removed.is_some() {
            info!("Connection removed for player {}", id);
        }
        removed
    }

    /// Snapshot of every outbound handle, cloned so the broadcast fan-out
    /// can run outside the state lock.
    pub fn senders(&self) -> Vec<(u32, DelayedWriter)> {
        self.connections
            .iter()
            .map(|(id, writer)| (*id, writer.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::latency::SEND_DELAY;

    fn test_writer() -> DelayedWriter {
        let (tx, _rx) = tokio::io::duplex(64);
        DelayedWriter::new(tx, SEND_DELAY)
    }

    #[tokio::test]
    async fn test_insert_and_len() {
        let mut registry = ConnectionRegistry::new();
        assert!(registry.is_empty());

        registry.insert(1, test_writer());
        registry.insert(2, test_writer());

        assert_eq!(registry.len(), 2);
        assert!(!registry.is_empty());
    }

    #[tokio::test]
    async fn test_remove_returns_handle_once() {
        let mut registry = ConnectionRegistry::new();
        registry.insert(1, test_writer());

        assert!(registry.remove(1).is_some());
        assert!(registry.remove(1).is_none());
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_senders_are_clones_of_all_handles() {
        let mut registry = ConnectionRegistry::new();
        registry.insert(1, test_writer());
        registry.insert(2, test_writer());

        let senders = registry.senders();
        assert_eq!(senders.len(), 2);

        let mut ids: Vec<u32> = senders.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }
}
