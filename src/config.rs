// --- File: config.rs ---
use crate::constants::*;
use crate::error::ConfigError;
use crate::particle::RandomWalk;
use crate::spatial::{CellEncoding, NeighborhoodMode};

/// Initial shape of the frozen aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeedMode {
    /// One particle at the grid centre.
    Point,
    /// Four particles `margin` cells in from the middle of each edge.
    EdgeAnchors { margin: u32 },
    /// `count` particles on a circle of `radius_fraction * W/2` about the centre.
    Ring { count: usize, radius_fraction: f32 },
}

impl Default for SeedMode {
    fn default() -> Self {
        SeedMode::Ring {
            count: INITIAL_AGGREGATE_SIZE,
            radius_fraction: SEED_RING_FRACTION,
        }
    }
}

/// How the per-walker random-walk phase of a micro-step is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalkScheduling {
    Sequential,
    /// Chunked across the rayon pool, one RNG stream per chunk.
    #[default]
    Parallel,
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub grid_width: u32,
    pub grid_height: u32,
    pub walkers_per_ring: usize,
    pub ring_scale: f32,
    pub ring_factors: Vec<f32>,
    pub seed_mode: SeedMode,
    pub attempts_per_tick: u32,
    pub walk: RandomWalk,
    pub spawn_batch: usize,
    pub particle_radius: f32,
    pub neighborhood: NeighborhoodMode,
    pub walk_scheduling: WalkScheduling,
    // None seeds from entropy.
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_width: GRID_WIDTH,
            grid_height: GRID_HEIGHT,
            walkers_per_ring: WALKERS_PER_RING,
            ring_scale: RING_SCALE,
            ring_factors: RING_FACTORS.to_vec(),
            seed_mode: SeedMode::default(),
            attempts_per_tick: ATTEMPTS_PER_TICK,
            walk: RandomWalk::default(),
            spawn_batch: SPAWN_BATCH,
            particle_radius: PARTICLE_RADIUS,
            neighborhood: NeighborhoodMode::default(),
            walk_scheduling: WalkScheduling::default(),
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    /// A small, seeded configuration with no initial walkers and a single centre seed.
    /// Useful as a starting point when the caller places walkers by hand.
    pub fn empty(width: u32, height: u32, seed: u64) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            walkers_per_ring: 0,
            seed_mode: SeedMode::Point,
            rng_seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn total_initial_walkers(&self) -> usize {
        self.walkers_per_ring * self.ring_factors.len()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let (width, height) = (self.grid_width, self.grid_height);
        CellEncoding::new(width, height, self.neighborhood)?;

        match self.seed_mode {
            SeedMode::Point => {}
            SeedMode::EdgeAnchors { margin } => {
                if margin == 0 || margin.saturating_mul(2) > width.min(height) {
                    return Err(ConfigError::AnchorMargin {
                        margin,
                        width,
                        height,
                    });
                }
            }
            SeedMode::Ring {
                radius_fraction, ..
            } => {
                if !(radius_fraction > 0.0 && radius_fraction <= 1.0) {
                    return Err(ConfigError::RingFraction(radius_fraction));
                }
            }
        }

        if !self.walk.magnitude.is_finite() {
            return Err(ConfigError::NonFiniteWalk {
                field: "magnitude",
                value: self.walk.magnitude,
            });
        }
        if !self.walk.bias.is_finite() {
            return Err(ConfigError::NonFiniteWalk {
                field: "bias",
                value: self.walk.bias,
            });
        }
        if !(self.particle_radius.is_finite() && self.particle_radius > 0.0) {
            return Err(ConfigError::ParticleRadius(self.particle_radius));
        }
        if !(self.ring_scale.is_finite() && self.ring_scale > 0.0) {
            return Err(ConfigError::RingScale(self.ring_scale));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.total_initial_walkers(), 30_000);
    }

    #[test]
    fn rejects_empty_grid() {
        let config = SimulationConfig {
            grid_width: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::EmptyGrid {
                width: 0,
                height: 800
            })
        );
    }

    #[test]
    fn rejects_grid_that_overflows_cell_key() {
        let config = SimulationConfig {
            grid_width: 65_536,
            grid_height: 65_536,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::KeyOverflow { bits: 32, .. })
        ));
    }

    #[test]
    fn accepts_largest_square_grid_that_fits() {
        // 46_340 * 46_341 < 2^31 - 1
        let config = SimulationConfig {
            grid_width: 46_340,
            grid_height: 46_340,
            ..SimulationConfig::default()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn rejects_bad_seed_geometry() {
        let ring = SimulationConfig {
            seed_mode: SeedMode::Ring {
                count: 10,
                radius_fraction: 1.5,
            },
            ..SimulationConfig::default()
        };
        assert_eq!(ring.validate(), Err(ConfigError::RingFraction(1.5)));

        let anchors = SimulationConfig {
            seed_mode: SeedMode::EdgeAnchors { margin: 500 },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            anchors.validate(),
            Err(ConfigError::AnchorMargin { margin: 500, .. })
        ));
    }

    #[test]
    fn rejects_non_finite_walk() {
        let config = SimulationConfig {
            walk: RandomWalk {
                magnitude: f32::NAN,
                bias: 0.5,
            },
            ..SimulationConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonFiniteWalk {
                field: "magnitude",
                ..
            })
        ));
    }
}
// --- End of File: config.rs ---
