use crate::net::SyncMessage;
use anyhow::Result;
use async_trait::async_trait;

/// Trait for the peer-to-peer sync transport.
///
/// Implementations:
/// - UDP broadcast on the local network (production)
/// - Mock channel for tests and for running offline when the port
///   cannot be bound
#[async_trait]
pub trait SyncChannel: Send {
    /// Opaque identity stamped on outbound messages
    fn device_id(&self) -> &str;

    /// Broadcast one message, best effort. Failures are transient; the
    /// caller logs and retries on the next tick.
    async fn send(&mut self, message: &SyncMessage) -> Result<()>;

    /// Take the most recent inbound message, if one arrived since the
    /// last call. Latest wins; older unread messages are gone.
    fn take_latest(&mut self) -> Option<SyncMessage>;

    /// Whether anything was heard within the timeout window
    fn has_recent_message(&self) -> bool;
}
