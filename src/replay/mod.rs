pub mod cursor;
pub mod session;

pub use cursor::PlaybackCursor;
pub use session::ReplaySession;

use crate::actor::ActorPose;

/// Result of querying a cursor at one playback time
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    /// Interpolated pose to push to the visual actor
    Pose(ActorPose),
    /// Query time falls inside a recording gap, actor is hidden
    Hidden,
    /// Query time is past the last recorded sample
    Finished,
}
