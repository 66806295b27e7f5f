//! Geographic coordinates and great-circle distance.

use serde::Serialize;

use crate::RosterError;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A validated latitude/longitude pair, in degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate, rejecting NaN, infinities and out-of-range degrees.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, RosterError> {
        if !Self::is_valid(latitude, longitude) {
            return Err(RosterError::InvalidCoordinate { latitude, longitude });
        }
        Ok(Self { latitude, longitude })
    }

    /// Checks whether a latitude/longitude pair is usable as a `Coordinate`.
    #[inline]
    pub fn is_valid(latitude: f64, longitude: f64) -> bool {
        latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to `other`, in meters.
    #[inline]
    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        haversine_distance(*self, *other)
    }
}

/// Great-circle distance between two points using the haversine formula.
/// Returns meters.
pub fn haversine_distance(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.latitude.to_radians();
    let phi2 = b.latitude.to_radians();
    let delta_phi = (b.latitude - a.latitude).to_radians();
    let delta_lambda = (b.longitude - a.longitude).to_radians();

    let h = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    // Rounding can push h just past 1 for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_M * c
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn distance_to_self_is_zero() {
        let p = coord(40.7128, -74.006);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = coord(40.7128, -74.006);
        let b = coord(-33.8688, 151.2093);
        assert_eq!(haversine_distance(a, b), haversine_distance(b, a));
    }

    #[test]
    fn one_degree_of_longitude_at_equator() {
        let d = haversine_distance(coord(0.0, 0.0), coord(0.0, 1.0));
        assert!((d - 111_195.0).abs() <= 1.0, "got {d}");
    }

    #[test]
    fn nearby_manhattan_points() {
        let d = coord(40.7128, -74.006).distance_to(&coord(40.7138, -74.007));
        assert!((d - 139.5).abs() < 1.0, "got {d}");
        // Well inside the 1000 m trigger of a 500 m threshold
        assert!(d <= 2.0 * 500.0);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let half = std::f64::consts::PI * EARTH_RADIUS_M;

        let d = haversine_distance(coord(0.0, 10.0), coord(0.0, -170.0));
        assert!((d - half).abs() < 1.0, "got {d}");

        for step in 0..1800 {
            let lat = -89.95 + f64::from(step) * 0.1;
            let d = haversine_distance(coord(lat, 10.0), coord(-lat, -170.0));
            assert!(d.is_finite(), "NaN at lat {lat}");
            assert!((d - half).abs() < 1.0, "lat {lat}: got {d}");
        }
    }

    #[test]
    fn rejects_out_of_range_and_nan() {
        assert!(Coordinate::new(90.5, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.1).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }
}
