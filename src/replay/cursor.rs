use crate::model::KeyframeTrack;
use crate::replay::Sample;
use std::sync::Arc;

/// Gap between consecutive samples beyond which the actor is treated as
/// hidden (a respawn/despawn hole in the recording).
const HIDE_GAP_SECONDS: f32 = 1.0;

/// Mutable playback position within one track.
///
/// `index` is a forward-only hint for the current sweep: query times must
/// be non-decreasing between resets. A seek or loop wrap resets the index
/// to 0 and the next sample re-sweeps from the start. This is not a binary
/// search; it exploits the monotonic query times of normal playback.
pub struct PlaybackCursor {
    track: Arc<KeyframeTrack>,
    index: usize,
    finished: bool,
}

impl PlaybackCursor {
    pub fn new(track: Arc<KeyframeTrack>) -> Self {
        Self {
            track,
            index: 0,
            finished: false,
        }
    }

    /// Restart the sweep from the first keyframe
    pub fn reset(&mut self) {
        self.index = 0;
        self.finished = false;
    }

    /// Whether this cursor's sweep has run past its last sample
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Whether this cursor has nothing left to play. Empty tracks are
    /// vacuously complete: they can never finish a sweep of their own.
    pub fn is_complete(&self) -> bool {
        self.track.is_empty() || self.finished
    }

    /// Query the track at `elapsed` seconds since playback start.
    ///
    /// `elapsed` is an offset from the first recorded sample, not an
    /// absolute recording time. `scale` is applied uniformly to position
    /// components only.
    pub fn sample(&mut self, elapsed: f32, scale: f32) -> Sample {
        let len = self.track.len();
        if len == 0 {
            return Sample::Hidden;
        }

        // Single-sample tracks pin to their only keyframe forever.
        if len == 1 {
            return Sample::Pose(self.track[0].pose(scale));
        }

        let adjusted = self.track[0].time + elapsed;

        // Forward-only scan to the sample pair bracketing `adjusted`.
        while self.index < len - 1 && self.track[self.index + 1].time <= adjusted {
            self.index += 1;
        }

        if self.index == len - 1 {
            if adjusted > self.track[self.index].time {
                self.finished = true;
                return Sample::Finished;
            }
            // Landed exactly on the last sample: no next sample to
            // interpolate toward.
            return Sample::Pose(self.track[self.index].pose(scale));
        }

        let cur = &self.track[self.index];
        let next = &self.track[self.index + 1];

        if next.time - cur.time > HIDE_GAP_SECONDS {
            return Sample::Hidden;
        }

        let span = next.time - cur.time;
        let frac = if span <= 0.0 {
            1.0
        } else {
            ((adjusted - cur.time) / span).clamp(0.0, 1.0)
        };

        Sample::Pose(cur.interpolate(next, frac, scale))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Keyframe;
    use glam::Vec3;

    fn track(points: &[(f32, f32)]) -> Arc<KeyframeTrack> {
        Arc::new(KeyframeTrack::new(
            points
                .iter()
                .map(|&(t, x)| Keyframe::new(t, Vec3::new(x, 0.0, 0.0)))
                .collect(),
        ))
    }

    fn pose_x(sample: Sample) -> f32 {
        match sample {
            Sample::Pose(pose) => pose.position.x,
            other => panic!("expected pose, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_track_is_hidden() {
        let mut cursor = PlaybackCursor::new(Arc::new(KeyframeTrack::empty()));
        assert_eq!(cursor.sample(0.0, 1.0), Sample::Hidden);
        assert!(!cursor.is_finished());
        assert!(cursor.is_complete());
    }

    #[test]
    fn test_exact_sample_offsets_return_recorded_pose() {
        let mut cursor = PlaybackCursor::new(track(&[(0.0, 0.0), (1.0, 10.0), (2.0, 4.0)]));
        assert_eq!(pose_x(cursor.sample(0.0, 1.0)), 0.0);
        assert_eq!(pose_x(cursor.sample(1.0, 1.0)), 10.0);
        assert_eq!(pose_x(cursor.sample(2.0, 1.0)), 4.0);
    }

    #[test]
    fn test_interpolation_is_linear_between_samples() {
        let mut cursor = PlaybackCursor::new(track(&[(0.0, 0.0), (1.0, 10.0)]));
        assert!((pose_x(cursor.sample(0.25, 1.0)) - 2.5).abs() < 1e-5);
        assert!((pose_x(cursor.sample(0.5, 1.0)) - 5.0).abs() < 1e-5);
        assert!((pose_x(cursor.sample(0.75, 1.0)) - 7.5).abs() < 1e-5);
    }

    #[test]
    fn test_colinearity_in_three_dimensions() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(-5.0, 8.0, 0.5);
        let mut cursor = PlaybackCursor::new(Arc::new(KeyframeTrack::new(vec![
            Keyframe::new(0.0, a),
            Keyframe::new(0.8, b),
        ])));
        let pose = match cursor.sample(0.4, 1.0) {
            Sample::Pose(pose) => pose,
            other => panic!("expected pose, got {:?}", other),
        };
        // Midpoint of the segment, within floating tolerance.
        assert!((pose.position - (a + b) * 0.5).length() < 1e-4);
    }

    #[test]
    fn test_gap_over_one_second_hides_actor() {
        let mut cursor = PlaybackCursor::new(track(&[(0.0, 0.0), (1.0, 10.0), (3.0, 10.0)]));
        assert_eq!(pose_x(cursor.sample(0.5, 1.0)), 5.0);
        assert_eq!(cursor.sample(2.0, 1.0), Sample::Hidden);
        // At the last sample's offset the actor reappears.
        assert_eq!(pose_x(cursor.sample(3.0, 1.0)), 10.0);
    }

    #[test]
    fn test_finishes_past_last_sample() {
        let mut cursor = PlaybackCursor::new(track(&[(0.0, 0.0), (1.0, 10.0)]));
        assert_eq!(cursor.sample(1.5, 1.0), Sample::Finished);
        assert!(cursor.is_finished());
        assert!(cursor.is_complete());
    }

    #[test]
    fn test_forward_only_scan_is_idempotent() {
        let points = [(0.0, 0.0), (0.5, 5.0), (1.0, 10.0), (1.5, 2.0)];
        let times = [0.1, 0.3, 0.6, 0.6, 0.9, 1.2, 1.4];

        let mut once = PlaybackCursor::new(track(&points));
        let expected: Vec<f32> = times.iter().map(|&t| pose_x(once.sample(t, 1.0))).collect();

        let mut twice = PlaybackCursor::new(track(&points));
        for (&t, &want) in times.iter().zip(&expected) {
            // Repeating the same query must not move the cursor.
            let _ = twice.sample(t, 1.0);
            assert_eq!(pose_x(twice.sample(t, 1.0)), want);
        }
    }

    #[test]
    fn test_single_keyframe_pins_forever() {
        let mut cursor = PlaybackCursor::new(track(&[(2.0, 7.0)]));
        assert_eq!(pose_x(cursor.sample(0.0, 1.0)), 7.0);
        assert_eq!(pose_x(cursor.sample(100.0, 1.0)), 7.0);
        assert!(!cursor.is_finished());
    }

    #[test]
    fn test_degenerate_equal_times_resolve_to_next() {
        let mut cursor = PlaybackCursor::new(track(&[(0.0, 0.0), (1.0, 3.0), (1.0, 9.0)]));
        // Both samples at t=1.0: the scan lands on the later one.
        assert_eq!(pose_x(cursor.sample(1.0, 1.0)), 9.0);
    }

    #[test]
    fn test_nonzero_first_time_is_an_offset_base() {
        // Query times are offsets from the first sample, not absolutes.
        let mut cursor = PlaybackCursor::new(track(&[(10.0, 0.0), (11.0, 10.0)]));
        assert!((pose_x(cursor.sample(0.5, 1.0)) - 5.0).abs() < 1e-5);
    }
}
