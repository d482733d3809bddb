use crate::model::{Keyframe, KeyframeTrack, RecordedRotation};
use anyhow::{Context, Result};
use glam::Vec3;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

/// One recorded sample as it appears in the replay files.
///
/// Initial-frame entries only carry position and sometimes Euler rotation
/// fields; update entries carry the quaternion and velocities. Every field
/// except `time` is optional on the wire.
#[derive(Debug, Deserialize)]
struct RawSample {
    time: f32,
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    z: f32,
    rotation: Option<RawRotation>,
    linear_velocity: Option<RawVec3>,
    angular_velocity: Option<RawVec3>,
}

#[derive(Debug, Deserialize, Default)]
struct RawRotation {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    z: f32,
    #[serde(default)]
    w: f32,
    #[serde(default)]
    yaw: f32,
    #[serde(default)]
    pitch: f32,
    #[serde(default)]
    roll: f32,
}

#[derive(Debug, Deserialize, Default)]
struct RawVec3 {
    #[serde(default)]
    x: f32,
    #[serde(default)]
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Debug, Deserialize)]
struct BallFile {
    #[serde(default)]
    total_positions: usize,
    #[serde(default)]
    positions: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct CarsFile {
    #[serde(default)]
    total_players: usize,
    #[serde(default)]
    players: HashMap<String, RawPlayer>,
}

#[derive(Debug, Deserialize)]
struct RawPlayer {
    #[serde(default)]
    player_info: RawPlayerInfo,
    #[serde(default)]
    positions: Vec<RawSample>,
}

#[derive(Debug, Deserialize, Default)]
struct RawPlayerInfo {
    #[serde(default)]
    team: i32,
}

/// One parsed car: its track plus the static team index used only for
/// material assignment.
pub struct CarEntry {
    pub track: KeyframeTrack,
    pub team: i32,
}

impl From<RawVec3> for Vec3 {
    fn from(v: RawVec3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<RawSample> for Keyframe {
    fn from(raw: RawSample) -> Self {
        let mut keyframe = Keyframe::new(raw.time, Vec3::new(raw.x, raw.y, raw.z));
        keyframe.rotation = raw.rotation.map(|r| RecordedRotation {
            x: r.x,
            y: r.y,
            z: r.z,
            w: r.w,
            yaw: r.yaw,
            pitch: r.pitch,
            roll: r.roll,
        });
        keyframe.linear_velocity = raw.linear_velocity.map(Into::into);
        keyframe.angular_velocity = raw.angular_velocity.map(Into::into);
        keyframe
    }
}

fn parse_ball(path: &Path) -> Result<KeyframeTrack> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: BallFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    let track = KeyframeTrack::new(file.positions.into_iter().map(Into::into).collect());
    info!(
        samples = track.len(),
        declared = file.total_positions,
        duration = track.duration(),
        "loaded ball replay"
    );
    Ok(track)
}

fn parse_cars(path: &Path) -> Result<HashMap<String, CarEntry>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let file: CarsFile = serde_json::from_str(&data)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(
        players = file.players.len(),
        declared = file.total_players,
        "loaded cars replay"
    );
    Ok(file
        .players
        .into_iter()
        .map(|(name, player)| {
            let entry = CarEntry {
                track: KeyframeTrack::new(player.positions.into_iter().map(Into::into).collect()),
                team: player.player_info.team,
            };
            (name, entry)
        })
        .collect())
}

/// Load the ball track. A file that fails to read or parse yields an
/// empty track: the actor stays present but motionless and invisible.
pub fn load_ball_track(path: &Path) -> KeyframeTrack {
    match parse_ball(path) {
        Ok(track) => track,
        Err(e) => {
            warn!("ball replay unusable, playing empty track: {e:#}");
            KeyframeTrack::empty()
        }
    }
}

/// Load the per-player car tracks, keyed by player id. Unusable files
/// yield an empty map rather than an error.
pub fn load_car_tracks(path: &Path) -> HashMap<String, CarEntry> {
    match parse_cars(path) {
        Ok(cars) => cars,
        Err(e) => {
            warn!("cars replay unusable, playing without cars: {e:#}");
            HashMap::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ball_samples() {
        let json = r#"{
            "total_positions": 2,
            "positions": [
                {"time": 1.0, "x": 3.0, "y": 4.0, "z": 5.0, "type": "initial",
                 "rotation": {"yaw": 90.0, "pitch": 0.0, "roll": 0.0}},
                {"time": 0.5, "x": 1.0, "y": 2.0, "z": 3.0,
                 "rotation": {"x": 0.0, "y": 0.0, "z": 0.0, "w": 1.0},
                 "linear_velocity": {"x": 10.0, "y": 0.0, "z": 0.0}}
            ]
        }"#;
        let file: BallFile = serde_json::from_str(json).unwrap();
        let track = KeyframeTrack::new(file.positions.into_iter().map(Into::into).collect());

        // Sorted on load despite out-of-order input.
        assert_eq!(track[0].time, 0.5);
        assert_eq!(track[1].time, 1.0);
        assert_eq!(track[0].linear_velocity.unwrap().x, 10.0);
        assert_eq!(track[1].rotation.unwrap().yaw, 90.0);
        assert_eq!(track[1].rotation.unwrap().w, 0.0);
    }

    #[test]
    fn test_parse_cars_with_teams() {
        let json = r#"{
            "replay_info": {"map_name": "arena", "team_size": 1},
            "total_players": 2,
            "players": {
                "alice": {
                    "player_info": {"team": 0, "score": 100, "is_bot": false},
                    "positions": [{"time": 0.0, "x": 1.0, "y": 2.0, "z": 3.0}]
                },
                "bob": {
                    "player_info": {"team": 1},
                    "positions": []
                }
            }
        }"#;
        let file: CarsFile = serde_json::from_str(json).unwrap();
        assert_eq!(file.players.len(), 2);
        assert_eq!(file.players["alice"].player_info.team, 0);
        assert_eq!(file.players["bob"].player_info.team, 1);
        assert!(file.players["bob"].positions.is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_track() {
        let track = load_ball_track(Path::new("/nonexistent/replay.json"));
        assert!(track.is_empty());
    }

    #[test]
    fn test_malformed_file_yields_empty_track() {
        let dir = std::env::temp_dir().join("arena-sync-test-malformed");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("ball.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(load_ball_track(&path).is_empty());
        assert!(load_car_tracks(&path).is_empty());
    }
}
