pub mod keyframe;
pub mod track;

pub use keyframe::{Keyframe, RecordedRotation};
pub use track::KeyframeTrack;
