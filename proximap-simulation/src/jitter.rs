//! Random position jitter used to simulate a click on a marker.

use proximap_core::Coordinate;
use rand::Rng;

/// Default jitter span in degrees (about ±555 m of latitude)
pub const DEFAULT_SPAN_DEGREES: f64 = 0.01;

/// Offsets a position by `(r - 0.5) × span` degrees on each axis, with `r`
/// drawn uniformly from `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Jitter {
    span_degrees: f64,
}

impl Default for Jitter {
    fn default() -> Self {
        Self { span_degrees: DEFAULT_SPAN_DEGREES }
    }
}

impl Jitter {
    pub fn new(span_degrees: f64) -> Self {
        Self { span_degrees }
    }

    pub fn span_degrees(&self) -> f64 {
        self.span_degrees
    }

    /// Returns a jittered copy of `origin`. Latitude is clamped to the poles
    /// and longitude wraps across the antimeridian, so the result is always a
    /// valid coordinate.
    pub fn apply<R: Rng + ?Sized>(&self, origin: Coordinate, rng: &mut R) -> Coordinate {
        let latitude = origin.latitude() + (rng.gen::<f64>() - 0.5) * self.span_degrees;
        let longitude = origin.longitude() + (rng.gen::<f64>() - 0.5) * self.span_degrees;

        let latitude = latitude.clamp(-90.0, 90.0);
        let longitude = if (-180.0..=180.0).contains(&longitude) {
            longitude
        } else {
            (longitude + 180.0).rem_euclid(360.0) - 180.0
        };

        // Only a non-finite span can still fail here; stay put in that case.
        Coordinate::new(latitude, longitude).unwrap_or(origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn stays_within_half_span() {
        let jitter = Jitter::default();
        let origin = Coordinate::new(40.7128, -74.006).unwrap();
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..1_000 {
            let moved = jitter.apply(origin, &mut rng);
            assert!((moved.latitude() - origin.latitude()).abs() <= 0.005 + 1e-9);
            assert!((moved.longitude() - origin.longitude()).abs() <= 0.005 + 1e-9);
        }
    }

    #[test]
    fn same_seed_same_path() {
        let jitter = Jitter::new(0.02);
        let origin = Coordinate::new(1.0, 2.0).unwrap();
        let mut a = StdRng::seed_from_u64(42);
        let mut b = StdRng::seed_from_u64(42);
        assert_eq!(jitter.apply(origin, &mut a), jitter.apply(origin, &mut b));
    }

    #[test]
    fn clamps_at_pole_and_wraps_antimeridian() {
        let jitter = Jitter::new(10.0);
        let origin = Coordinate::new(90.0, 180.0).unwrap();
        let mut rng = StdRng::seed_from_u64(3);

        for _ in 0..200 {
            let moved = jitter.apply(origin, &mut rng);
            assert!(Coordinate::is_valid(moved.latitude(), moved.longitude()));
        }
    }

    #[test]
    fn zero_span_is_a_no_op() {
        let origin = Coordinate::new(-33.8688, 151.2093).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(Jitter::new(0.0).apply(origin, &mut rng), origin);
    }
}
