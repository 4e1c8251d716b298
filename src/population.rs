// --- File: population.rs ---
use crate::config::WalkScheduling;
use crate::constants::WALK_CHUNK_SIZE;
use crate::particle::{Particle, RandomWalk};
use rand::{Rng, RngCore, SeedableRng};
use rand::rngs::StdRng;
use rayon::prelude::*;

// Odd constant used to spread chunk indices across seed space.
const CHUNK_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// The mobile particles, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct WalkerPopulation {
    walkers: Vec<Particle>,
}

impl WalkerPopulation {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            walkers: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.walkers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.walkers.is_empty()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Particle] {
        &self.walkers
    }

    pub fn push(&mut self, walker: Particle) {
        self.walkers.push(walker);
    }

    pub fn extend<I: IntoIterator<Item = Particle>>(&mut self, walkers: I) {
        self.walkers.extend(walkers);
    }

    /// Drops every walker and returns how many there were.
    pub fn clear(&mut self) -> usize {
        let removed = self.walkers.len();
        self.walkers.clear();
        removed
    }

    /// Advances every walker by one random-walk step.
    ///
    /// Parallel scheduling draws a single base seed from `rng` and gives each
    /// `WALK_CHUNK_SIZE` slice its own stream derived from it, so a seeded run produces
    /// the same positions whatever the size of the rayon pool.
    pub fn step_all<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        walk: &RandomWalk,
        scheduling: WalkScheduling,
    ) {
        match scheduling {
            WalkScheduling::Sequential => {
                for walker in &mut self.walkers {
                    walker.step(rng, walk);
                }
            }
            WalkScheduling::Parallel => {
                if self.walkers.is_empty() {
                    return;
                }
                let base_seed = rng.next_u64();
                self.walkers
                    .par_chunks_mut(WALK_CHUNK_SIZE)
                    .enumerate()
                    .for_each(|(chunk_index, chunk)| {
                        let stream = (chunk_index as u64).wrapping_mul(CHUNK_SEED_STRIDE);
                        let mut chunk_rng = StdRng::seed_from_u64(base_seed ^ stream);
                        for walker in chunk {
                            walker.step(&mut chunk_rng, walk);
                        }
                    });
            }
        }
    }

    /// Stable compaction: visits walkers in order, hands each to `capture`, and keeps
    /// exactly those for which it returns `false`. Returns the number removed.
    pub fn retain_mobile<F>(&mut self, mut capture: F) -> usize
    where
        F: FnMut(&Particle) -> bool,
    {
        let before = self.walkers.len();
        self.walkers.retain(|walker| !capture(walker));
        before - self.walkers.len()
    }
}

// --- End of File: population.rs ---
