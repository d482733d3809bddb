pub mod channel;
pub mod coordinator;
pub mod message;
pub mod mock;
pub mod role;
pub mod transport;

pub use channel::SyncChannel;
pub use coordinator::{SyncCoordinator, SyncEvent};
pub use message::SyncMessage;
pub use mock::MockSyncChannel;
pub use role::{PeerRole, RoleNegotiator};
pub use transport::UdpSyncChannel;
