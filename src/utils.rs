use rand::Rng;
use std::f64::consts::TAU;

// --- Helper Functions ---

#[inline]
pub fn random_angle<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..TAU)
}

/// Offset from a centre to a point on a circle, each component truncated toward zero.
#[inline]
pub fn circle_offset(radius: f64, angle: f64) -> (i32, i32) {
    ((radius * angle.cos()) as i32, (radius * angle.sin()) as i32)
}

/// Point on a circle about a (possibly fractional) centre, truncated toward zero after
/// the centre is added.
#[inline]
pub fn circle_point(center: (f64, f64), radius: f64, angle: f64) -> (i32, i32) {
    (
        (center.0 + radius * angle.cos()) as i32,
        (center.1 + radius * angle.sin()) as i32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn zero_radius_lands_on_centre() {
        assert_eq!(circle_point((400.0, 400.0), 0.0, 1.234), (400, 400));
        assert_eq!(circle_offset(0.0, 5.0), (0, 0));
    }

    #[test]
    fn quarter_turn_points_down_the_y_axis() {
        assert_eq!(circle_point((10.0, 10.0), 5.0, FRAC_PI_2), (10, 15));
        assert_eq!(circle_offset(80.0, 0.0), (80, 0));
    }
}
