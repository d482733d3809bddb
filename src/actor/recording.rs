//! Recording actor binding used by unit tests to assert on what the
//! replay engine pushed.

use crate::actor::{ActorPose, VisualActor};
use std::sync::{Arc, Mutex};

/// Shared view into what a `RecordingActor` was told to do
#[derive(Clone, Default)]
pub struct ActorLog {
    inner: Arc<Mutex<ActorLogInner>>,
}

#[derive(Default)]
struct ActorLogInner {
    poses: Vec<ActorPose>,
    visible: Option<bool>,
    material: Option<i32>,
}

impl ActorLog {
    pub fn last_pose(&self) -> Option<ActorPose> {
        self.inner.lock().unwrap().poses.last().copied()
    }

    pub fn pose_count(&self) -> usize {
        self.inner.lock().unwrap().poses.len()
    }

    pub fn visible(&self) -> Option<bool> {
        self.inner.lock().unwrap().visible
    }

    pub fn material(&self) -> Option<i32> {
        self.inner.lock().unwrap().material
    }
}

/// Actor binding that records every call
pub struct RecordingActor {
    log: ActorLog,
}

impl RecordingActor {
    pub fn new() -> (Self, ActorLog) {
        let log = ActorLog::default();
        (Self { log: log.clone() }, log)
    }
}

impl VisualActor for RecordingActor {
    fn set_pose(&mut self, pose: &ActorPose) {
        self.log.inner.lock().unwrap().poses.push(*pose);
    }

    fn set_visible(&mut self, visible: bool) {
        self.log.inner.lock().unwrap().visible = Some(visible);
    }

    fn set_material(&mut self, team: i32) {
        self.log.inner.lock().unwrap().material = Some(team);
    }
}
