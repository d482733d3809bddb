use crate::actor::VisualActor;
use crate::model::KeyframeTrack;
use crate::replay::{PlaybackCursor, Sample};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// One playback cursor bound to its visual actor
struct ActorSlot {
    cursor: PlaybackCursor,
    actor: Box<dyn VisualActor>,
}

impl ActorSlot {
    fn new(track: KeyframeTrack, actor: Box<dyn VisualActor>) -> Self {
        Self {
            cursor: PlaybackCursor::new(Arc::new(track)),
            actor,
        }
    }

    /// Query the cursor and push the result to the actor. Finished sweeps
    /// push nothing: the actor freezes at its last state.
    fn apply(&mut self, elapsed: f32, scale: f32) {
        match self.cursor.sample(elapsed, scale) {
            Sample::Pose(pose) => {
                self.actor.set_visible(true);
                self.actor.set_pose(&pose);
            }
            Sample::Hidden => self.actor.set_visible(false),
            Sample::Finished => {}
        }
    }
}

/// Drives the ball cursor and every car cursor from one shared wall clock.
///
/// All operations take `now` in monotonic seconds supplied by the caller;
/// the session never reads a clock itself.
pub struct ReplaySession {
    ball: ActorSlot,
    cars: HashMap<String, ActorSlot>,
    wall_clock_start: f64,
    playing: bool,
    loop_playback: bool,
    position_scale: f32,
}

impl ReplaySession {
    pub fn new(
        ball_track: KeyframeTrack,
        ball_actor: Box<dyn VisualActor>,
        loop_playback: bool,
        position_scale: f32,
    ) -> Self {
        Self {
            ball: ActorSlot::new(ball_track, ball_actor),
            cars: HashMap::new(),
            wall_clock_start: 0.0,
            playing: false,
            loop_playback,
            position_scale,
        }
    }

    /// Register one car actor. `team` is forwarded to the actor's material
    /// binding once, at creation.
    pub fn add_car(
        &mut self,
        player_id: &str,
        track: KeyframeTrack,
        team: i32,
        mut actor: Box<dyn VisualActor>,
    ) {
        actor.set_material(team);
        debug!(player = player_id, team, samples = track.len(), "car added");
        self.cars.insert(player_id.to_string(), ActorSlot::new(track, actor));
    }

    pub fn car_count(&self) -> usize {
        self.cars.len()
    }

    /// Start (or restart) playback from the first keyframe
    pub fn start(&mut self, now: f64) {
        self.wall_clock_start = now;
        self.playing = true;
        self.reset_cursors();
        self.apply_all(0.0);
        info!("replay started");
    }

    /// Advance every cursor to the current elapsed time. Call once per
    /// tick; a no-op while paused.
    pub fn advance(&mut self, now: f64) {
        if !self.playing {
            return;
        }

        let elapsed = (now - self.wall_clock_start) as f32;
        self.apply_all(elapsed);

        // Finishing is a session-level, all-or-nothing event: the ball
        // running out, or every car running out, ends the sweep for all.
        let cars_complete =
            !self.cars.is_empty() && self.cars.values().all(|c| c.cursor.is_complete());
        let sweep_over = self.ball.cursor.is_finished() || cars_complete;

        if self.loop_playback {
            if sweep_over {
                self.wall_clock_start = now;
                self.reset_cursors();
                self.apply_all(0.0);
                debug!("replay wrapped to start");
            }
        } else if self.ball.cursor.is_complete()
            && self.cars.values().all(|c| c.cursor.is_complete())
        {
            self.playing = false;
            info!("replay finished");
        }
    }

    /// Jump playback to `t` seconds. Cursor indices reset to 0 and the
    /// next advance re-sweeps forward, so backward jumps are safe.
    pub fn seek(&mut self, t: f32, now: f64) {
        self.wall_clock_start = now - t as f64;
        self.reset_cursors();
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        self.playing = true;
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Elapsed playback time, zero while paused
    pub fn current_time(&self, now: f64) -> f32 {
        if self.playing {
            (now - self.wall_clock_start) as f32
        } else {
            0.0
        }
    }

    fn reset_cursors(&mut self) {
        self.ball.cursor.reset();
        for car in self.cars.values_mut() {
            car.cursor.reset();
        }
    }

    fn apply_all(&mut self, elapsed: f32) {
        self.ball.apply(elapsed, self.position_scale);
        for car in self.cars.values_mut() {
            car.apply(elapsed, self.position_scale);
        }
    }
}
