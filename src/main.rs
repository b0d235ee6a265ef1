//! Windshield Crack entry point
//!
//! The web build is driven from JS through `windshield_crack::web`. Natively
//! this runs a headless session on simulated 60 Hz time and logs what happens
//! to the glass.

#[cfg(not(target_arch = "wasm32"))]
use windshield_crack::{SimRng, Simulation, Settings};

/// Simulated frame interval (ms)
#[cfg(not(target_arch = "wasm32"))]
const FRAME_MS: f64 = 1000.0 / 60.0;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Windshield Crack (native) starting...");
    log::info!("Native mode is headless - serve the wasm build for the interactive version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(7);
    let settings = Settings::load();
    let mut sim = Simulation::with_rng(800.0, 420.0, settings, SimRng::seeded(seed));
    log::info!("Session seeded with {}", seed);

    let viewport = sim.viewport();
    let mut now = 0.0;

    // Chip the glass and let it settle
    sim.pointer_impact_at(viewport.center.x - 60.0, viewport.center.y);
    now = run(&mut sim, now, 60);
    summary(&sim, "after chip");

    // A rock on the other side
    sim.throw_rock_at(viewport.center.x + 120.0, viewport.center.y - 10.0);
    now = run(&mut sim, now, 120);
    summary(&sim, "after rock");

    // Door slam turns chips into fracture
    sim.trigger_door_slam();
    now = run(&mut sim, now, 240);
    summary(&sim, "after door slam");

    sim.toggle_road_shock();
    now = run(&mut sim, now, 180);
    sim.toggle_road_shock();
    summary(&sim, "after road shock");

    sim.repair();
    run(&mut sim, now, 70);
    summary(&sim, "after repair");
}

#[cfg(not(target_arch = "wasm32"))]
fn run(sim: &mut Simulation, from: f64, frames: usize) -> f64 {
    let mut now = from;
    for _ in 0..frames {
        now += FRAME_MS;
        sim.tick(now);
    }
    now
}

#[cfg(not(target_arch = "wasm32"))]
fn summary(sim: &Simulation, label: &str) {
    let state = sim.state();
    log::info!(
        "[{:>6.0} ms] {}: {} impacts, {} cracks ({} growing), {} rings, ignited={}",
        state.now,
        label,
        state.impact_count,
        state.cracks.len(),
        state.cracks.live_count(),
        state.rings.len(),
        state.ignited
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is the `web` module, this is just to satisfy the compiler
}
