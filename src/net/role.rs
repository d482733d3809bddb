use tracing::info;

/// The mutually exclusive roles in the synchronization protocol.
///
/// A process decides exactly once per session: silence for the whole
/// discovery window makes it Host, any inbound peer message makes it
/// Client. There is no later transition in either direction. If two
/// processes start inside the same window without hearing each other,
/// both become Host; that race is accepted, not resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerRole {
    Undecided,
    Host,
    Client,
}

/// Startup election state
pub struct RoleNegotiator {
    role: PeerRole,
    started_at: f64,
    discovery_window: f64,
}

impl RoleNegotiator {
    pub fn new(discovery_window: f64, now: f64) -> Self {
        Self {
            role: PeerRole::Undecided,
            started_at: now,
            discovery_window,
        }
    }

    pub fn role(&self) -> PeerRole {
        self.role
    }

    /// A peer message arrived. Returns the new role if this decided it.
    pub fn on_message(&mut self) -> Option<PeerRole> {
        if self.role == PeerRole::Undecided {
            self.role = PeerRole::Client;
            info!("became CLIENT, following host");
            return Some(PeerRole::Client);
        }
        None
    }

    /// Check the discovery window. Returns the new role if silence just
    /// promoted this process to host.
    pub fn poll(&mut self, now: f64) -> Option<PeerRole> {
        if self.role == PeerRole::Undecided && now - self.started_at > self.discovery_window {
            self.role = PeerRole::Host;
            info!("became HOST, broadcasting replay state");
            return Some(PeerRole::Host);
        }
        None
    }
}
