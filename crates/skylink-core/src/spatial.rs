//! Spatial math for collision detection and distance calculations.

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Kilometers per nautical mile, for range queries expressed in NM.
pub const KM_PER_NM: f64 = 1.852;

/// Great-circle distance between two points in kilometers using the
/// Haversine formula.
///
/// Valid for points arbitrarily far apart, including near the poles and
/// across the antimeridian.
///
/// Any non-finite input (NaN or infinity) yields `f64::INFINITY` so a
/// single malformed record can never abort a batch scan. Out-of-range
/// finite coordinates are passed through to the formula unchecked.
///
/// # Arguments
/// * `lat1`, `lon1` - First point coordinates in decimal degrees
/// * `lat2`, `lon2` - Second point coordinates in decimal degrees
///
/// # Returns
/// Distance in kilometers
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if !(lat1.is_finite() && lon1.is_finite() && lat2.is_finite() && lon2.is_finite()) {
        return f64::INFINITY;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Absolute altitude difference in meters.
///
/// No unit conversion is performed; both altitudes must already be in
/// meters.
pub fn vertical_distance_m(altitude1_m: f64, altitude2_m: f64) -> f64 {
    (altitude1_m - altitude2_m).abs()
}

/// Initial bearing from point 1 to point 2 in degrees, normalized to
/// [0, 360). 0 = north, 90 = east.
pub fn bearing_deg(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let y = dlambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlambda.cos();

    (y.atan2(x).to_degrees() + 360.0) % 360.0
}

/// Map a bearing in degrees to one of the eight compass points.
pub fn compass_point(bearing_deg: f64) -> &'static str {
    let bearing = bearing_deg.rem_euclid(360.0);
    match bearing {
        b if !(22.5..337.5).contains(&b) => "N",
        b if b < 67.5 => "NE",
        b if b < 112.5 => "E",
        b if b < 157.5 => "SE",
        b if b < 202.5 => "S",
        b if b < 247.5 => "SW",
        b if b < 292.5 => "W",
        _ => "NW",
    }
}

/// Offset a position by distance and bearing.
///
/// # Arguments
/// * `lat`, `lon` - Starting position in degrees
/// * `distance_m` - Distance in meters
/// * `bearing_rad` - Bearing in radians (0 = north, π/2 = east)
///
/// # Returns
/// (new_lat, new_lon) in degrees
pub fn offset_by_bearing(lat: f64, lon: f64, distance_m: f64, bearing_rad: f64) -> (f64, f64) {
    if distance_m.abs() <= f64::EPSILON {
        return (lat, lon);
    }

    let lat1 = lat.to_radians();
    let lon1 = lon.to_radians();
    let angular_distance = distance_m / (EARTH_RADIUS_KM * 1000.0);

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * bearing_rad.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = bearing_rad.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let mut lon2 = lon1 + y.atan2(x);
    lon2 =
        (lon2 + std::f64::consts::PI).rem_euclid(2.0 * std::f64::consts::PI) - std::f64::consts::PI;

    (lat2.to_degrees(), lon2.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn haversine_known_distance() {
        // ~111km between these points (1 degree latitude)
        let dist = haversine_km(0.0, 0.0, 1.0, 0.0);
        assert!((dist - 111.19).abs() < 0.1);
    }

    #[test]
    fn haversine_same_point() {
        let dist = haversine_km(33.6846, -117.8265, 33.6846, -117.8265);
        assert!(dist < 1e-9);
    }

    #[test]
    fn haversine_is_symmetric() {
        let d1 = haversine_km(40.7128, -74.0060, 51.5074, -0.1278);
        let d2 = haversine_km(51.5074, -0.1278, 40.7128, -74.0060);
        assert!((d1 - d2).abs() < 1e-9);
    }

    #[test]
    fn haversine_across_antimeridian() {
        // Two points straddling the 180th meridian are ~222km apart, not
        // most of the way around the planet.
        let dist = haversine_km(0.0, 179.0, 0.0, -179.0);
        assert!((dist - 222.39).abs() < 1.0);
    }

    #[test]
    fn haversine_non_finite_returns_infinity() {
        assert!(haversine_km(f64::NAN, 0.0, 1.0, 1.0).is_infinite());
        assert!(haversine_km(0.0, f64::INFINITY, 1.0, 1.0).is_infinite());
        assert!(haversine_km(0.0, 0.0, f64::NEG_INFINITY, 1.0).is_infinite());
    }

    #[test]
    fn haversine_non_negative() {
        assert!(haversine_km(-89.9, -179.9, 89.9, 179.9) >= 0.0);
        assert!(haversine_km(12.5, 77.6, 12.5, 77.6) >= 0.0);
    }

    #[test]
    fn vertical_distance_absolute_and_symmetric() {
        assert_eq!(vertical_distance_m(200.0, 190.0), 10.0);
        assert_eq!(vertical_distance_m(190.0, 200.0), 10.0);
        // Negative altitudes near sea level are valid inputs
        assert_eq!(vertical_distance_m(-5.0, 10.0), 15.0);
    }

    #[test]
    fn bearing_cardinal_directions() {
        assert!(bearing_deg(0.0, 0.0, 1.0, 0.0).abs() < 0.1); // due north
        assert!((bearing_deg(0.0, 0.0, 0.0, 1.0) - 90.0).abs() < 0.1); // due east
        assert!((bearing_deg(0.0, 0.0, -1.0, 0.0) - 180.0).abs() < 0.1); // due south
        assert!((bearing_deg(0.0, 0.0, 0.0, -1.0) - 270.0).abs() < 0.1); // due west
    }

    #[test]
    fn compass_points_cover_all_sectors() {
        assert_eq!(compass_point(0.0), "N");
        assert_eq!(compass_point(350.0), "N");
        assert_eq!(compass_point(45.0), "NE");
        assert_eq!(compass_point(90.0), "E");
        assert_eq!(compass_point(135.0), "SE");
        assert_eq!(compass_point(180.0), "S");
        assert_eq!(compass_point(225.0), "SW");
        assert_eq!(compass_point(270.0), "W");
        assert_eq!(compass_point(315.0), "NW");
    }

    #[test]
    fn offset_by_bearing_round_trips_through_haversine() {
        let (lat, lon) = offset_by_bearing(40.0, -74.0, 500.0, std::f64::consts::FRAC_PI_2);
        let dist_km = haversine_km(40.0, -74.0, lat, lon);
        assert!((dist_km - 0.5).abs() < 0.001);
    }
}
