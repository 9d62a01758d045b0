/// Meters per degree of latitude. Longitude degrees shrink with the cosine
/// of the latitude.
pub const METERS_PER_DEGREE: f64 = 111_300.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Approximate distance in meters between two coordinates, using an
/// equirectangular projection. Good enough for points within a single
/// transit region; undefined across the antimeridian.
pub fn distance_meters(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let mean_lat = to_radians((latitude_1 + latitude_2) / 2.0);
    let dy = (latitude_2 - latitude_1) * METERS_PER_DEGREE;
    let dx = (longitude_2 - longitude_1) * METERS_PER_DEGREE * mean_lat.cos();
    (dx * dx + dy * dy).sqrt()
}

/// Projects point `p` onto the segment from `a` to `b` in plain lat/lng
/// space, clamping the projection parameter to [0, 1]. Returns `a` when the
/// segment is degenerate.
pub fn nearest_on_segment(
    a_lat: f64,
    a_lng: f64,
    b_lat: f64,
    b_lng: f64,
    p_lat: f64,
    p_lng: f64,
) -> (f64, f64) {
    let d_lat = b_lat - a_lat;
    let d_lng = b_lng - a_lng;
    let length_squared = d_lat * d_lat + d_lng * d_lng;
    if length_squared == 0.0 {
        return (a_lat, a_lng);
    }
    let t = ((p_lat - a_lat) * d_lat + (p_lng - a_lng) * d_lng) / length_squared;
    let t = t.clamp(0.0, 1.0);
    (a_lat + t * d_lat, a_lng + t * d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_of_point_to_itself_is_zero() {
        assert_eq!(
            distance_meters(45.523062, -122.676482, 45.523062, -122.676482),
            0.0
        );
    }

    #[test]
    fn distance_of_nearby_points() {
        // two points roughly 9.84 meters apart
        let distance =
            distance_meters(45.523062, -122.676482, 45.523150, -122.676495);
        assert!((distance - 9.84).abs() < 0.5, "got {}", distance);
    }

    #[test]
    fn projection_inside_segment() {
        let (lat, lng) =
            nearest_on_segment(45.0, -122.0, 45.0, -121.0, 45.2, -121.5);
        assert!((lat - 45.0).abs() < 1e-12);
        assert!((lng - -121.5).abs() < 1e-12);
    }

    #[test]
    fn projection_clamps_to_endpoints() {
        let (lat, lng) =
            nearest_on_segment(45.0, -122.0, 45.0, -121.0, 45.1, -120.0);
        assert_eq!((lat, lng), (45.0, -121.0));
        let (lat, lng) =
            nearest_on_segment(45.0, -122.0, 45.0, -121.0, 44.9, -123.0);
        assert_eq!((lat, lng), (45.0, -122.0));
    }

    #[test]
    fn degenerate_segment_returns_start() {
        let (lat, lng) =
            nearest_on_segment(45.0, -122.0, 45.0, -122.0, 46.0, -121.0);
        assert_eq!((lat, lng), (45.0, -122.0));
    }
}
