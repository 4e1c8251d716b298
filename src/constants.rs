// --- File: constants.rs ---
// --- Global Simulation Constants ---
pub const BACKGROUND_COLOR: wgpu::Color = wgpu::Color {
    r: 1.0,
    g: 1.0,
    b: 1.0,
    a: 1.0,
};

pub const GRID_WIDTH: u32 = 800;
pub const GRID_HEIGHT: u32 = 800;
pub const PARTICLE_RADIUS: f32 = 1.0;

// Walkers placed per ring at startup; the ring count multiplies this.
pub const WALKERS_PER_RING: usize = 5000;
pub const RING_SCALE: f32 = 80.0;
pub const RING_FACTORS: [f32; 6] = [1.0, 1.5, 2.0, 2.5, 3.0, 3.5];

pub const INITIAL_AGGREGATE_SIZE: usize = 400;
// Fraction of the grid half-width at which the seed ring sits.
pub const SEED_RING_FRACTION: f32 = 0.8;
pub const ANCHOR_MARGIN: u32 = 20;

pub const ATTEMPTS_PER_TICK: u32 = 100;
pub const MIN_ATTEMPTS: u32 = 0;
pub const MAX_ATTEMPTS: u32 = 1000;
pub const ATTEMPTS_ADJUST_STEP: u32 = 10;

// offset = WALK_MAGNITUDE * (0.5 - U[0,1)) + WALK_BIAS, uniform on (-0.5, 1.5].
// See `RandomWalk` for what truncation makes of it.
pub const WALK_MAGNITUDE: f32 = 2.0;
pub const WALK_BIAS: f32 = 0.5;

pub const SPAWN_BATCH: usize = 100;

// Largest grid whose occupancy counts are kept in a flat table (64 MiB of u32).
pub const DENSE_INDEX_MAX_CELLS: usize = 1 << 24;

// Walkers per RNG stream when stepping in parallel. Changing it changes seeded runs.
pub const WALK_CHUNK_SIZE: usize = 1024;

pub const FPS_UPDATE_INTERVAL_SECS: f64 = 0.5;
pub const TELEMETRY_LOG_INTERVAL_SECS: f64 = 4.0;

// --- End of File: constants.rs ---
