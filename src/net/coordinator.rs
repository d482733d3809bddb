use crate::config::SyncConfig;
use crate::net::channel::SyncChannel;
use crate::net::role::{PeerRole, RoleNegotiator};
use crate::net::SyncMessage;
use crate::replay::ReplaySession;
use anyhow::Result;
use tracing::{debug, info, warn};

/// Protocol events surfaced to the caller once per occurrence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncEvent {
    BecameHost,
    BecameClient,
    /// The start gesture fired, locally or on the host. One-shot per
    /// session.
    SwipeTriggered,
    /// The host stopped broadcasting; local playback was paused
    HostLost,
}

/// Wires the role negotiator, the transport and the replay session
/// together. Runs on the main tick path, never on the receive task.
///
/// The host is the timing authority and ignores every inbound message.
/// Clients follow, but only correct drift above a hysteresis threshold so
/// playback does not visibly snap every broadcast.
pub struct SyncCoordinator<C: SyncChannel> {
    channel: C,
    negotiator: RoleNegotiator,
    config: SyncConfig,
    next_broadcast: f64,
    remote_was_playing: bool,
    swipe_latched: bool,
    host_lost_reported: bool,
}

impl<C: SyncChannel> SyncCoordinator<C> {
    pub fn new(channel: C, config: SyncConfig, now: f64) -> Self {
        let negotiator = RoleNegotiator::new(config.discovery_window, now);
        Self {
            channel,
            negotiator,
            config,
            next_broadcast: now,
            remote_was_playing: false,
            swipe_latched: false,
            host_lost_reported: false,
        }
    }

    pub fn role(&self) -> PeerRole {
        self.negotiator.role()
    }

    /// Latch the start gesture locally (host side). Broadcasts carry the
    /// flag from now on.
    pub fn trigger_swipe(&mut self) {
        self.swipe_latched = true;
    }

    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    /// Run one protocol step. Call once per tick with the same `now`
    /// passed to the session.
    pub async fn tick(&mut self, now: f64, session: &mut ReplaySession) -> Vec<SyncEvent> {
        let mut events = Vec::new();

        // Reject self-echo before it can influence anything.
        let inbound = self
            .channel
            .take_latest()
            .filter(|m| m.device_id != self.channel.device_id());

        if inbound.is_some() {
            self.host_lost_reported = false;
            if self.negotiator.on_message().is_some() {
                events.push(SyncEvent::BecameClient);
            }
        }
        if self.negotiator.poll(now).is_some() {
            events.push(SyncEvent::BecameHost);
        }

        match self.negotiator.role() {
            PeerRole::Host => {
                // The authority never corrects toward a peer.
                if now >= self.next_broadcast {
                    if let Err(e) = self.broadcast(now, session).await {
                        warn!("broadcast failed, will retry next tick: {e:#}");
                    }
                    self.next_broadcast = now + self.config.broadcast_interval;
                }
            }
            PeerRole::Client => {
                if let Some(message) = inbound {
                    self.apply_remote(&message, now, session, &mut events);
                } else if !self.channel.has_recent_message() && !self.host_lost_reported {
                    // Edge-triggered: pause once, not every tick.
                    session.pause();
                    self.remote_was_playing = false;
                    self.host_lost_reported = true;
                    info!("host timeout, pausing replay");
                    events.push(SyncEvent::HostLost);
                }
            }
            PeerRole::Undecided => {}
        }

        events
    }

    async fn broadcast(&mut self, now: f64, session: &ReplaySession) -> Result<()> {
        let time = session.current_time(now);
        let message = SyncMessage {
            device_id: self.channel.device_id().to_string(),
            ball_time: time,
            car_time: time,
            is_playing: session.is_playing(),
            swipe_triggered: self.swipe_latched,
        };
        self.channel.send(&message).await
    }

    fn apply_remote(
        &mut self,
        message: &SyncMessage,
        now: f64,
        session: &mut ReplaySession,
        events: &mut Vec<SyncEvent>,
    ) {
        if message.swipe_triggered && !self.swipe_latched {
            self.swipe_latched = true;
            events.push(SyncEvent::SwipeTriggered);
        }

        if message.is_playing {
            if !session.is_playing() {
                session.seek(message.ball_time, now);
                debug!(ball_time = message.ball_time, "resumed from host state");
            } else {
                let local = session.current_time(now);
                let ball_drift = (message.ball_time - local).abs();
                let car_drift = (message.car_time - local).abs();
                if ball_drift > self.config.sync_threshold
                    || car_drift > self.config.sync_threshold
                {
                    debug!(ball_drift, car_drift, "drift over threshold, resyncing");
                    session.seek(message.ball_time, now);
                }
            }
            self.remote_was_playing = true;
        } else if self.remote_was_playing {
            // Only on the transition into the paused state.
            session.pause();
            self.remote_was_playing = false;
            info!("host paused, pausing replay");
        }
    }
}
