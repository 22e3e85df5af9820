//! Connection state tracking
//!
//! `Unconnected → Connecting → Connected → Disconnected`. There is no
//! reconnect, so `Disconnected` is terminal.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Lifecycle state of a [`super::MongoHandle`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// No connection attempt yet
    Unconnected,
    /// Connect or ping in progress
    Connecting,
    /// Connect and ping both succeeded
    Connected,
    /// Released, or setup failed
    Disconnected,
}

impl ConnectionState {
    fn as_u8(self) -> u8 {
        match self {
            Self::Unconnected => 0,
            Self::Connecting => 1,
            Self::Connected => 2,
            Self::Disconnected => 3,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Unconnected,
            1 => Self::Connecting,
            2 => Self::Connected,
            _ => Self::Disconnected,
        }
    }

    /// Human readable label for logs and health responses
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconnected => "unconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Disconnected => "disconnected",
        }
    }

    /// Commands may only be sent in this state
    pub fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

/// Shared, cloneable view of a handle's state (for health checks)
#[derive(Debug, Clone)]
pub struct ConnectionStatus {
    inner: Arc<AtomicU8>,
}

impl ConnectionStatus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(ConnectionState::Unconnected.as_u8())),
        }
    }

    pub fn get(&self) -> ConnectionState {
        ConnectionState::from_u8(self.inner.load(Ordering::SeqCst))
    }

    /// Move to `next`. Leaving `Disconnected` is refused.
    ///
    /// Returns the previous state.
    pub fn transition(&self, next: ConnectionState) -> ConnectionState {
        let mut current = self.inner.load(Ordering::SeqCst);
        loop {
            if ConnectionState::from_u8(current) == ConnectionState::Disconnected {
                return ConnectionState::Disconnected;
            }
            match self.inner.compare_exchange(
                current,
                next.as_u8(),
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(prev) => return ConnectionState::from_u8(prev),
                Err(actual) => current = actual,
            }
        }
    }

    pub fn is_connected(&self) -> bool {
        self.get().is_connected()
    }
}

impl Default for ConnectionStatus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unconnected() {
        let status = ConnectionStatus::new();
        assert_eq!(status.get(), ConnectionState::Unconnected);
        assert!(!status.is_connected());
    }

    #[test]
    fn test_happy_path_transitions() {
        let status = ConnectionStatus::new();
        assert_eq!(
            status.transition(ConnectionState::Connecting),
            ConnectionState::Unconnected
        );
        status.transition(ConnectionState::Connected);
        assert!(status.is_connected());

        assert_eq!(
            status.transition(ConnectionState::Disconnected),
            ConnectionState::Connected
        );
        assert_eq!(status.get(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_disconnected_is_terminal() {
        let status = ConnectionStatus::new();
        status.transition(ConnectionState::Disconnected);

        assert_eq!(
            status.transition(ConnectionState::Connecting),
            ConnectionState::Disconnected
        );
        assert_eq!(status.get(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_clones_share_state() {
        let status = ConnectionStatus::new();
        let view = status.clone();
        status.transition(ConnectionState::Connected);
        assert!(view.is_connected());
    }

    #[test]
    fn test_state_labels() {
        assert_eq!(ConnectionState::Connected.as_str(), "connected");
        assert_eq!(ConnectionState::Disconnected.as_str(), "disconnected");
    }
}
