// --- File: seed.rs ---
use crate::config::{SeedMode, SimulationConfig};
use crate::particle::{Category, Particle};
use crate::utils::{circle_offset, circle_point, random_angle};
use rand::Rng;

/// Places the initial aggregate, the initial walker rings, and pointer spawns.
/// Everything is placed relative to the grid centre.
#[derive(Debug, Clone, Copy)]
pub struct SeedGenerator<'a> {
    config: &'a SimulationConfig,
}

impl<'a> SeedGenerator<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config }
    }

    #[inline]
    fn half_extent(&self) -> (i32, i32) {
        (
            (self.config.grid_width / 2) as i32,
            (self.config.grid_height / 2) as i32,
        )
    }

    #[inline]
    fn center(&self) -> (f64, f64) {
        (
            f64::from(self.config.grid_width) / 2.0,
            f64::from(self.config.grid_height) / 2.0,
        )
    }

    fn particle(&self, (x, y): (i32, i32), category: Category) -> Particle {
        Particle::new(x, y, self.config.particle_radius, category)
    }

    pub fn initial_aggregate<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        let (half_w, half_h) = self.half_extent();
        match self.config.seed_mode {
            SeedMode::Point => vec![self.particle((half_w, half_h), Category::Seed)],
            SeedMode::EdgeAnchors { margin } => {
                let (width, height) = (
                    self.config.grid_width as i32,
                    self.config.grid_height as i32,
                );
                let margin = margin as i32;
                [
                    (half_w, height - margin),
                    (half_w, margin),
                    (margin, half_h),
                    (width - margin, half_h),
                ]
                .into_iter()
                .map(|position| self.particle(position, Category::Seed))
                .collect()
            }
            SeedMode::Ring {
                count,
                radius_fraction,
            } => {
                let radius = f64::from(half_w) * f64::from(radius_fraction);
                let center = self.center();
                (0..count)
                    .map(|_| {
                        let position = circle_point(center, radius, random_angle(rng));
                        self.particle(position, Category::Seed)
                    })
                    .collect()
            }
        }
    }

    /// `walkers_per_ring` rounds, each placing one walker on every ring at its own
    /// random angle. Walkers come out interleaved by ring.
    pub fn initial_walkers<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<Particle> {
        let (half_w, half_h) = self.half_extent();
        let scale = f64::from(self.config.ring_scale);
        let rings = &self.config.ring_factors;
        let mut walkers = Vec::with_capacity(self.config.total_initial_walkers());
        for _ in 0..self.config.walkers_per_ring {
            for (ring, &factor) in rings.iter().enumerate() {
                let (dx, dy) = circle_offset(f64::from(factor) * scale, random_angle(rng));
                let category = Category::Ring(u8::try_from(ring).unwrap_or(u8::MAX));
                walkers.push(self.particle((half_w + dx, half_h + dy), category));
            }
        }
        walkers
    }

    /// A batch of walkers on the circle about the grid centre that passes through
    /// `pointer` (grid coordinates). A pointer on the centre puts the whole batch there.
    pub fn spawn_ring<R: Rng + ?Sized>(&self, rng: &mut R, pointer: (f64, f64)) -> Vec<Particle> {
        let center = self.center();
        let radius = (pointer.0 - center.0).hypot(pointer.1 - center.1);
        (0..self.config.spawn_batch)
            .map(|_| {
                let position = circle_point(center, radius, random_angle(rng));
                self.particle(position, Category::Spawned)
            })
            .collect()
    }
}

// --- End of File: seed.rs ---
