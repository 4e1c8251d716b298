// --- File: particle.rs ---
use crate::constants::{WALK_BIAS, WALK_MAGNITUDE};
use rand::Rng;

/// Display tag of a particle. Has no effect on aggregation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    /// Part of the initial aggregate.
    Seed,
    /// Initial walker placed on the n-th concentric ring.
    Ring(u8),
    /// Walker injected by a pointer spawn.
    Spawned,
}

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const BLUE: [f32; 4] = [0.0, 0.475, 0.945, 1.0];
// Ring colours, innermost first; outer rings cycle through them again.
const RING_PALETTE: [[f32; 4]; 6] = [
    [0.0, 0.459, 0.173, 1.0], // dark green
    BLUE,
    [0.902, 0.161, 0.216, 1.0], // red
    [0.784, 0.478, 1.0, 1.0],   // purple
    [0.0, 0.894, 0.188, 1.0],   // green
    BLACK,
];

impl Category {
    pub fn color(self) -> [f32; 4] {
        match self {
            Category::Seed => BLACK,
            Category::Ring(ring) => RING_PALETTE[usize::from(ring) % RING_PALETTE.len()],
            Category::Spawned => BLUE,
        }
    }
}

/// Per-axis step distribution: `offset = magnitude * (0.5 - U[0,1)) + bias`, after which
/// the moved coordinate is truncated toward zero.
///
/// With the defaults (magnitude 2, bias 0.5) the offset lies in `(-0.5, 1.5]` and has mean
/// +0.5. Truncation floors non-negative coordinates, which turns that into a step of
/// -1, 0, +1 with odds 1/4, 1/2, 1/4. Negative coordinates are ceiled instead, so walkers
/// left or above the grid are pushed back toward zero by about one cell per step.
/// The bias is kept at +0.5 by default because the aggregate's shape depends on it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalk {
    pub magnitude: f32,
    pub bias: f32,
}

impl Default for RandomWalk {
    fn default() -> Self {
        Self {
            magnitude: WALK_MAGNITUDE,
            bias: WALK_BIAS,
        }
    }
}

impl RandomWalk {
    /// A walk that never moves a particle.
    pub const fn still() -> Self {
        Self {
            magnitude: 0.0,
            bias: 0.0,
        }
    }

    #[inline]
    pub fn offset<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        self.magnitude * (0.5 - rng.gen_range(0.0f32..1.0)) + self.bias
    }

    // `as` truncates toward zero and saturates, so far-flung walkers never wrap.
    #[inline]
    fn advance<R: Rng + ?Sized>(&self, coord: i32, rng: &mut R) -> i32 {
        (coord as f32 + self.offset(rng)) as i32
    }
}

/// A point entity on the integer grid. Mobile while it is a walker, frozen once it
/// joins the aggregate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Particle {
    pub x: i32,
    pub y: i32,
    pub radius: f32,
    pub category: Category,
}

impl Particle {
    pub fn new(x: i32, y: i32, radius: f32, category: Category) -> Self {
        Self {
            x,
            y,
            radius,
            category,
        }
    }

    /// One random-walk step. No clamping: walkers may leave the grid.
    #[inline]
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R, walk: &RandomWalk) {
        self.x = walk.advance(self.x, rng);
        self.y = walk.advance(self.y, rng);
    }

    #[inline]
    pub fn position(&self) -> (i32, i32) {
        (self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn still_walk_leaves_particle_in_place() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particle = Particle::new(-7, 12, 1.0, Category::Spawned);
        for _ in 0..100 {
            particle.step(&mut rng, &RandomWalk::still());
        }
        assert_eq!(particle.position(), (-7, 12));
    }

    #[test]
    fn default_walk_moves_at_most_one_cell_on_non_negative_coordinates() {
        let mut rng = StdRng::seed_from_u64(7);
        let walk = RandomWalk::default();
        let mut particle = Particle::new(100, 100, 1.0, Category::Ring(0));
        for _ in 0..1000 {
            let (x, y) = particle.position();
            particle.step(&mut rng, &walk);
            assert!((-1..=1).contains(&(particle.x - x)));
            assert!((-1..=1).contains(&(particle.y - y)));
        }
    }

    #[test]
    fn default_offset_carries_half_cell_bias() {
        let mut rng = StdRng::seed_from_u64(11);
        let walk = RandomWalk::default();
        let mean: f32 = (0..10_000).map(|_| walk.offset(&mut rng)).sum::<f32>() / 10_000.0;
        assert!((mean - 0.5).abs() < 0.05, "mean offset {mean}");
    }

    #[test]
    fn default_walk_is_symmetric_after_truncation_on_the_grid() {
        let mut rng = StdRng::seed_from_u64(13);
        let walk = RandomWalk::default();
        let mut particle = Particle::new(400, 400, 1.0, Category::Ring(0));
        for _ in 0..2000 {
            particle.step(&mut rng, &walk);
        }
        // Step variance is 1/2, so 2000 steps spread about 32 cells.
        assert!((particle.x - 400).abs() < 200, "x = {}", particle.x);
        assert!((particle.y - 400).abs() < 200, "y = {}", particle.y);
    }

    #[test]
    fn unbiased_walk_has_zero_mean_offset() {
        let mut rng = StdRng::seed_from_u64(3);
        let walk = RandomWalk {
            magnitude: 2.0,
            bias: 0.0,
        };
        let offsets: f32 = (0..10_000).map(|_| walk.offset(&mut rng)).sum();
        assert!((offsets / 10_000.0).abs() < 0.05);
    }

    #[test]
    fn negative_coordinates_are_pushed_toward_zero() {
        let mut rng = StdRng::seed_from_u64(5);
        let walk = RandomWalk::default();
        let mut particle = Particle::new(-50, -50, 1.0, Category::Spawned);
        while particle.x < -2 {
            let x = particle.x;
            particle.step(&mut rng, &walk);
            assert!((0..=2).contains(&(particle.x - x)));
        }
        for _ in 0..200 {
            particle.step(&mut rng, &walk);
        }
        assert!(particle.x > -20 && particle.y > -20);
    }

    #[test]
    fn categories_have_distinct_ring_colours() {
        let colours: Vec<[f32; 4]> = (0..6).map(|ring| Category::Ring(ring).color()).collect();
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert_eq!(Category::Ring(6).color(), Category::Ring(0).color());
    }
}
// --- End of File: particle.rs ---
