// --- File: simulation.rs ---
use crate::aggregate::Aggregate;
use crate::config::SimulationConfig;
use crate::constants::{ATTEMPTS_ADJUST_STEP, MAX_ATTEMPTS, MIN_ATTEMPTS};
use crate::display::{DisplayMode, InputEvent, RenderView, Telemetry};
use crate::error::ConfigError;
use crate::particle::Particle;
use crate::population::WalkerPopulation;
use crate::seed::SeedGenerator;
use crate::spatial::CellEncoding;
use rand::SeedableRng;
use rand::rngs::StdRng;

pub type SimRng = StdRng;

/// Owns the walkers, the aggregate and its index, and advances them one frame at a time.
pub struct AggregationEngine {
    config: SimulationConfig,
    encoding: CellEncoding,
    walkers: WalkerPopulation,
    aggregate: Aggregate,
    rng: SimRng,
    attempts_per_tick: u32,
    display_mode: DisplayMode,
    is_paused: bool,
    iteration: u64,
    // Walkers added after construction and walkers dropped by clears.
    spawned: u64,
    cleared: u64,
    initial_total: usize,
}

impl AggregationEngine {
    pub fn new(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let encoding = CellEncoding::new(config.grid_width, config.grid_height, config.neighborhood)?;
        let mut engine = Self {
            encoding,
            walkers: WalkerPopulation::default(),
            aggregate: Aggregate::default(),
            rng: Self::make_rng(config.rng_seed),
            attempts_per_tick: config.attempts_per_tick,
            display_mode: DisplayMode::default(),
            is_paused: false,
            iteration: 0,
            spawned: 0,
            cleared: 0,
            initial_total: 0,
            config,
        };
        engine.initialize_particles();
        log::info!(
            "Engine ready: grid {}x{}, {} walkers, {} aggregate seeds, {} attempts per tick",
            engine.config.grid_width,
            engine.config.grid_height,
            engine.walkers.len(),
            engine.aggregate.len(),
            engine.attempts_per_tick
        );
        Ok(engine)
    }

    fn make_rng(seed: Option<u64>) -> SimRng {
        match seed {
            Some(seed) => SimRng::seed_from_u64(seed),
            None => SimRng::from_entropy(),
        }
    }

    fn initialize_particles(&mut self) {
        let seeds = SeedGenerator::new(&self.config);
        let walkers = seeds.initial_walkers(&mut self.rng);
        let tree = seeds.initial_aggregate(&mut self.rng);

        self.walkers = WalkerPopulation::with_capacity(walkers.len());
        self.walkers.extend(walkers);
        self.aggregate = Aggregate::new(&self.encoding, tree.len() + self.walkers.len());
        for seed in tree {
            self.seed_aggregate(seed);
        }
        self.initial_total = self.walkers.len() + self.aggregate.len();
    }

    /// Freezes `particle` straight into the aggregate. Returns `false` (and leaves the
    /// aggregate untouched) if its cell has no key under the current encoding.
    pub fn seed_aggregate(&mut self, particle: Particle) -> bool {
        match self.encoding.key(particle.x, particle.y) {
            Some(key) => {
                self.aggregate.freeze(particle, key);
                true
            }
            None => {
                log::warn!(
                    "Dropping aggregate seed at ({}, {}): cell is outside the encodable area",
                    particle.x,
                    particle.y
                );
                false
            }
        }
    }

    /// Adds a hand-placed walker. Counted as spawned.
    pub fn add_walker(&mut self, walker: Particle) {
        self.walkers.push(walker);
        self.spawned += 1;
    }

    /// One frame: `attempts_per_tick` micro-steps. Returns how many walkers froze.
    pub fn tick(&mut self) -> usize {
        if self.is_paused {
            return 0;
        }
        let mut frozen = 0;
        for _ in 0..self.attempts_per_tick {
            frozen += self.micro_step();
        }
        self.iteration += 1;
        log::debug!(
            "iter {} Tree {} Walkers {} (+{})",
            self.iteration,
            self.aggregate.len(),
            self.walkers.len(),
            frozen
        );
        frozen
    }

    /// Walk every walker once, then run the aggregation pass.
    pub fn micro_step(&mut self) -> usize {
        self.walkers
            .step_all(&mut self.rng, &self.config.walk, self.config.walk_scheduling);
        self.aggregation_pass()
    }

    /// Tests every walker against the aggregate in order and moves the adjacent ones
    /// across, registering each at its own cell. The index is live during the pass, so a
    /// walker frozen early can capture a later one in the same pass.
    pub fn aggregation_pass(&mut self) -> usize {
        let encoding = self.encoding;
        let aggregate = &mut self.aggregate;
        self.walkers.retain_mobile(|walker| {
            if aggregate.adjacent_cell(&encoding, walker).is_none() {
                return false;
            }
            // A hit implies the walker's own cell has a key.
            match encoding.key(walker.x, walker.y) {
                Some(own_cell) => {
                    aggregate.freeze(*walker, own_cell);
                    true
                }
                None => false,
            }
        })
    }

    pub fn is_adjacent(&self, walker: &Particle) -> bool {
        self.aggregate
            .adjacent_cell(&self.encoding, walker)
            .is_some()
    }

    pub fn clear_walkers(&mut self) -> usize {
        let removed = self.walkers.clear();
        self.cleared += removed as u64;
        if removed > 0 {
            log::info!("Cleared {} walkers", removed);
        }
        removed
    }

    /// Spawns a batch on the circle through the pointer (grid coordinates).
    pub fn spawn_at_pointer(&mut self, x: f64, y: f64) -> usize {
        let batch = SeedGenerator::new(&self.config).spawn_ring(&mut self.rng, (x, y));
        let count = batch.len();
        self.walkers.extend(batch);
        self.spawned += count as u64;
        count
    }

    pub fn toggle_display_mode(&mut self) {
        self.display_mode = self.display_mode.cycle();
        log::info!(
            "Display: aggregate {}, walkers {}",
            if self.display_mode.show_aggregate { "on" } else { "off" },
            if self.display_mode.show_walkers { "on" } else { "off" }
        );
    }

    pub fn toggle_pause(&mut self) {
        self.is_paused = !self.is_paused;
        log::info!(
            "Simulation {}",
            if self.is_paused { "Paused" } else { "Resumed" }
        );
    }

    pub fn adjust_attempts(&mut self, increase: bool) {
        self.attempts_per_tick = if increase {
            self.attempts_per_tick
                .saturating_add(ATTEMPTS_ADJUST_STEP)
                .min(MAX_ATTEMPTS)
        } else {
            self.attempts_per_tick
                .saturating_sub(ATTEMPTS_ADJUST_STEP)
                .max(MIN_ATTEMPTS)
        };
        log::info!("Attempts per tick: {}", self.attempts_per_tick);
    }

    pub fn set_attempts_per_tick(&mut self, attempts: u32) {
        self.attempts_per_tick = attempts;
    }

    /// Starts over with fresh seeds. A configured `rng_seed` replays the same run.
    pub fn restart(&mut self) {
        log::info!("Restarting simulation...");
        self.rng = Self::make_rng(self.config.rng_seed);
        self.initialize_particles();
        self.attempts_per_tick = self.config.attempts_per_tick;
        self.is_paused = false;
        self.iteration = 0;
        self.spawned = 0;
        self.cleared = 0;
    }

    pub fn handle_input(&mut self, event: InputEvent) {
        match event {
            InputEvent::ToggleDisplayMode => self.toggle_display_mode(),
            InputEvent::ClearWalkers => {
                self.clear_walkers();
            }
            InputEvent::PointerHeld { x, y } => {
                self.spawn_at_pointer(x, y);
            }
            InputEvent::TogglePause => self.toggle_pause(),
            InputEvent::Restart => self.restart(),
            InputEvent::AdjustAttempts { increase } => self.adjust_attempts(increase),
        }
    }

    pub fn view(&self) -> RenderView<'_> {
        RenderView {
            aggregate: self.aggregate.as_slice(),
            walkers: self.walkers.as_slice(),
            mode: self.display_mode,
        }
    }

    pub fn telemetry(&self) -> Telemetry {
        Telemetry {
            iteration: self.iteration,
            aggregate_len: self.aggregate.len(),
            walker_len: self.walkers.len(),
            spawned: self.spawned,
            cleared: self.cleared,
            attempts_per_tick: self.attempts_per_tick,
            paused: self.is_paused,
        }
    }

    #[inline]
    pub fn walkers(&self) -> &[Particle] {
        self.walkers.as_slice()
    }

    #[inline]
    pub fn aggregate(&self) -> &Aggregate {
        &self.aggregate
    }

    #[inline]
    pub fn encoding(&self) -> &CellEncoding {
        &self.encoding
    }

    #[inline]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn display_mode(&self) -> DisplayMode {
        self.display_mode
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn attempts_per_tick(&self) -> u32 {
        self.attempts_per_tick
    }

    /// Walkers plus aggregate members right after (re)initialisation.
    pub fn initial_total(&self) -> usize {
        self.initial_total
    }
}

// --- End of File: simulation.rs ---
