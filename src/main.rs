mod actor;
mod config;
mod input;
mod model;
mod net;
mod replay;

use actor::TraceActor;
use anyhow::Result;
use config::SyncConfig;
use net::{MockSyncChannel, SyncChannel, SyncCoordinator, SyncEvent, UdpSyncChannel};
use replay::ReplaySession;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use uuid::Uuid;

/// Tick period for the update loop, roughly 60 Hz
const TICK_MILLIS: u64 = 16;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let ball_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| usage("missing ball replay path")),
    );
    let cars_path = PathBuf::from(
        args.next()
            .unwrap_or_else(|| usage("missing cars replay path")),
    );
    let config = match args.next() {
        Some(path) => SyncConfig::load_from(Path::new(&path))?,
        None => SyncConfig::load(),
    };

    let session = build_session(&ball_path, &cars_path, &config);
    let device_id = Uuid::new_v4().to_string();

    // A port that cannot be bound must not stop playback: fall back to a
    // channel that hears nothing, so this process elects itself host and
    // plays standalone.
    match UdpSyncChannel::bind(&config, device_id.clone()).await {
        Ok(channel) => {
            let coordinator = SyncCoordinator::new(channel, config, 0.0);
            run(session, coordinator).await
        }
        Err(e) => {
            warn!("sync unavailable, running offline: {e:#}");
            let coordinator =
                SyncCoordinator::new(MockSyncChannel::new(&device_id), config, 0.0);
            run(session, coordinator).await
        }
    }
}

fn usage(reason: &str) -> String {
    eprintln!("{reason}\nusage: arena-sync <ball.json> <cars.json> [config.json]");
    std::process::exit(2);
}

fn build_session(ball_path: &Path, cars_path: &Path, config: &SyncConfig) -> ReplaySession {
    let ball_track = input::load_ball_track(ball_path);
    let cars = input::load_car_tracks(cars_path);

    let mut session = ReplaySession::new(
        ball_track,
        Box::new(TraceActor::new("ball")),
        config.loop_playback,
        config.position_scale,
    );
    for (player_id, entry) in cars {
        let actor = Box::new(TraceActor::new(&player_id));
        session.add_car(&player_id, entry.track, entry.team, actor);
    }
    info!(cars = session.car_count(), "session ready");
    session
}

async fn run<C: SyncChannel>(
    mut session: ReplaySession,
    mut coordinator: SyncCoordinator<C>,
) -> Result<()> {
    let epoch = Instant::now();
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_MILLIS));

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("shutting down");
                return Ok(());
            }
            _ = ticker.tick() => {
                let now = epoch.elapsed().as_secs_f64();
                session.advance(now);

                for event in coordinator.tick(now, &mut session).await {
                    match event {
                        SyncEvent::BecameHost => {
                            // The host starts playback on its own clock.
                            session.start(now);
                        }
                        SyncEvent::BecameClient => {
                            info!("following host state");
                        }
                        SyncEvent::SwipeTriggered => {
                            info!("start gesture received");
                            if !session.is_playing() {
                                session.start(now);
                            }
                        }
                        SyncEvent::HostLost => {
                            warn!("host lost, playback paused until it returns");
                        }
                    }
                }
            }
        }
    }
}
