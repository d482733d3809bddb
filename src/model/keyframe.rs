use crate::actor::ActorPose;
use glam::{EulerRot, Quat, Vec3};

/// Below this magnitude the quaternion `w` is considered unset and the
/// Euler fields are authoritative instead. Some initial-frame records only
/// populate yaw/pitch/roll; this mirrors the recorded format exactly.
const QUAT_W_EPSILON: f32 = 1e-4;

/// Recorded orientation carrying both representations found in the data.
///
/// Update samples carry a unit quaternion; initial samples carry Euler
/// angles in degrees with a zero quaternion. Which one applies is decided
/// per sample by `resolve`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RecordedRotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
    /// Degrees, about the recorded-space up axis
    pub yaw: f32,
    /// Degrees
    pub pitch: f32,
    /// Degrees
    pub roll: f32,
}

impl RecordedRotation {
    /// Resolve the recorded fields into a single orientation
    pub fn resolve(&self) -> Quat {
        if self.w.abs() > QUAT_W_EPSILON {
            Quat::from_xyzw(self.x, self.y, self.z, self.w)
        } else if self.yaw.abs() > QUAT_W_EPSILON
            || self.pitch.abs() > QUAT_W_EPSILON
            || self.roll.abs() > QUAT_W_EPSILON
        {
            Quat::from_euler(
                EulerRot::ZYX,
                self.yaw.to_radians(),
                self.pitch.to_radians(),
                self.roll.to_radians(),
            )
        } else {
            Quat::IDENTITY
        }
    }
}

/// One recorded sample of an actor's pose at a specific time offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Keyframe {
    /// Seconds, in the recording's own timebase
    pub time: f32,
    /// Recorded-space units
    pub position: Vec3,
    pub rotation: Option<RecordedRotation>,
    pub linear_velocity: Option<Vec3>,
    pub angular_velocity: Option<Vec3>,
}

impl Keyframe {
    /// Create a position-only keyframe
    pub fn new(time: f32, position: Vec3) -> Self {
        Self {
            time,
            position,
            ..Self::default()
        }
    }

    /// Resolved orientation, identity when the sample has none
    pub fn orientation(&self) -> Quat {
        self.rotation.map(|r| r.resolve()).unwrap_or(Quat::IDENTITY)
    }

    /// Pose for this sample alone, with the uniform position scale applied
    pub fn pose(&self, scale: f32) -> ActorPose {
        ActorPose {
            position: self.position * scale,
            rotation: self.orientation(),
        }
    }

    /// Pose interpolated toward `next` by fraction `frac` in [0, 1].
    ///
    /// Position is interpolated component-wise, orientation is slerped
    /// between each sample's resolved quaternion.
    pub fn interpolate(&self, next: &Keyframe, frac: f32, scale: f32) -> ActorPose {
        ActorPose {
            position: self.position.lerp(next.position, frac) * scale,
            rotation: self.orientation().slerp(next.orientation(), frac),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quaternion_wins_when_w_set() {
        let rot = RecordedRotation {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            w: 1.0,
            yaw: 90.0,
            pitch: 45.0,
            roll: 10.0,
        };
        assert_eq!(rot.resolve(), Quat::IDENTITY);
    }

    #[test]
    fn test_euler_used_when_w_zero() {
        let rot = RecordedRotation {
            yaw: 90.0,
            ..RecordedRotation::default()
        };
        let q = rot.resolve();
        let expected = Quat::from_euler(EulerRot::ZYX, 90f32.to_radians(), 0.0, 0.0);
        assert!((q.dot(expected).abs() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_all_zero_rotation_is_identity() {
        assert_eq!(RecordedRotation::default().resolve(), Quat::IDENTITY);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = Keyframe::new(0.0, Vec3::new(0.0, 0.0, 0.0));
        let b = Keyframe::new(1.0, Vec3::new(10.0, -4.0, 2.0));
        let pose = a.interpolate(&b, 0.5, 1.0);
        assert_eq!(pose.position, Vec3::new(5.0, -2.0, 1.0));
    }

    #[test]
    fn test_position_scale_applied() {
        let a = Keyframe::new(0.0, Vec3::new(100.0, 200.0, 300.0));
        let pose = a.pose(0.01);
        assert!((pose.position - Vec3::new(1.0, 2.0, 3.0)).length() < 1e-5);
    }
}
