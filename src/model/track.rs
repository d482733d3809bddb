use crate::model::Keyframe;

/// The full recorded motion of one actor, sorted ascending by time.
///
/// Sorting happens once at construction regardless of input order; the
/// track is immutable afterwards. An empty track is legal and means the
/// actor has no recorded motion.
#[derive(Debug, Clone, Default)]
pub struct KeyframeTrack {
    keyframes: Vec<Keyframe>,
}

impl KeyframeTrack {
    pub fn new(mut keyframes: Vec<Keyframe>) -> Self {
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self { keyframes }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Timestamp of the first recorded sample
    pub fn first_time(&self) -> Option<f32> {
        self.keyframes.first().map(|k| k.time)
    }

    /// Timestamp of the last recorded sample
    pub fn last_time(&self) -> Option<f32> {
        self.keyframes.last().map(|k| k.time)
    }

    /// Recorded duration in seconds, zero for empty tracks
    pub fn duration(&self) -> f32 {
        match (self.first_time(), self.last_time()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }
}

impl std::ops::Index<usize> for KeyframeTrack {
    type Output = Keyframe;

    fn index(&self, index: usize) -> &Keyframe {
        &self.keyframes[index]
    }
}
