/*
 * Leader Flock
 *
 * A flock of boids follows a player-controlled leader around a small 3D
 * terrain. Each boid steers by four rules plus a floor guard:
 * 1. Separation: Avoid crowding neighbors
 * 2. Alignment: Steer towards the average heading of neighbors
 * 3. Cohesion: Steer towards the average position of neighbors
 * 4. Goal: Seek the leader
 *
 * Tuning parameters are read from flock.toml (or LEADER_FLOCK_CONFIG) and
 * reloaded whenever the file changes. Set RUST_LOG to adjust logging.
 */

use leader_flock::app;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("leader_flock=info")),
        )
        .init();

    nannou::app(app::model).update(app::update).run();
}
