use crate::net::channel::SyncChannel;
use crate::net::SyncMessage;
use anyhow::Result;
use async_trait::async_trait;

/// In-memory sync channel for testing the protocol without sockets.
///
/// Also serves as the offline fallback: when the UDP port cannot be
/// bound, the coordinator runs against a channel that hears nothing, so
/// the process elects itself host and plays standalone.
pub struct MockSyncChannel {
    device_id: String,
    latest: Option<SyncMessage>,
    sent: Vec<SyncMessage>,
    recent: bool,
}

impl MockSyncChannel {
    pub fn new(device_id: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            latest: None,
            sent: Vec::new(),
            recent: false,
        }
    }

    /// Deliver an inbound message, overwriting any unread one
    pub fn inject_message(&mut self, message: SyncMessage) {
        self.latest = Some(message);
        self.recent = true;
    }

    /// Simulate the receipt timer expiring (or recovering)
    pub fn set_recent(&mut self, recent: bool) {
        self.recent = recent;
    }

    /// Everything broadcast so far, for verification
    pub fn take_sent_messages(&mut self) -> Vec<SyncMessage> {
        std::mem::take(&mut self.sent)
    }
}

#[async_trait]
impl SyncChannel for MockSyncChannel {
    fn device_id(&self) -> &str {
        &self.device_id
    }

    async fn send(&mut self, message: &SyncMessage) -> Result<()> {
        self.sent.push(message.clone());
        Ok(())
    }

    fn take_latest(&mut self) -> Option<SyncMessage> {
        self.latest.take()
    }

    fn has_recent_message(&self) -> bool {
        self.recent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_send_and_take() {
        let mut channel = MockSyncChannel::new("test");
        let msg = SyncMessage {
            device_id: "test".to_string(),
            ball_time: 1.0,
            ..SyncMessage::default()
        };
        channel.send(&msg).await.unwrap();
        assert_eq!(channel.take_sent_messages(), vec![msg]);
    }

    #[test]
    fn test_inject_overwrites_unread() {
        let mut channel = MockSyncChannel::new("test");
        channel.inject_message(SyncMessage {
            ball_time: 1.0,
            ..SyncMessage::default()
        });
        channel.inject_message(SyncMessage {
            ball_time: 2.0,
            ..SyncMessage::default()
        });
        assert_eq!(channel.take_latest().unwrap().ball_time, 2.0);
        assert!(channel.take_latest().is_none());
        assert!(channel.has_recent_message());
    }
}
