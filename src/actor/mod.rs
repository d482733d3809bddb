#[cfg(test)]
pub mod recording;

#[cfg(test)]
pub use recording::{ActorLog, RecordingActor};

use glam::{Quat, Vec3};
use tracing::trace;

/// Position and orientation computed for one actor at one tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorPose {
    pub position: Vec3,
    pub rotation: Quat,
}

/// Capability seam toward whatever renders an actor.
///
/// The replay engine only pushes state through this trait; it never
/// depends on a concrete rendering type. Team material assignment happens
/// once at setup and is a no-op for bindings that have no materials.
pub trait VisualActor: Send {
    /// Push the interpolated pose for this tick
    fn set_pose(&mut self, pose: &ActorPose);

    /// Show or hide the actor (recording gaps hide it)
    fn set_visible(&mut self, visible: bool);

    /// Assign the team material, called once when the actor is created
    fn set_material(&mut self, _team: i32) {}
}

/// Headless actor binding that reports state through tracing.
///
/// Pose updates are throttled; visibility changes are always logged.
pub struct TraceActor {
    name: String,
    visible: bool,
    ticks: u64,
}

/// Log one pose line out of this many updates
const POSE_LOG_STRIDE: u64 = 60;

impl TraceActor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            visible: true,
            ticks: 0,
        }
    }
}

impl VisualActor for TraceActor {
    fn set_pose(&mut self, pose: &ActorPose) {
        self.ticks += 1;
        if self.ticks % POSE_LOG_STRIDE == 1 {
            trace!(
                actor = %self.name,
                x = pose.position.x,
                y = pose.position.y,
                z = pose.position.z,
                "pose"
            );
        }
    }

    fn set_visible(&mut self, visible: bool) {
        if self.visible != visible {
            trace!(actor = %self.name, visible, "visibility changed");
            self.visible = visible;
        }
    }

    fn set_material(&mut self, team: i32) {
        trace!(actor = %self.name, team, "material assigned");
    }
}
