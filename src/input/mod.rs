pub mod json;

pub use json::{load_ball_track, load_car_tracks, CarEntry};
