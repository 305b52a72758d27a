//! WGS84 ellipsoid conversions between ECEF and geodetic coordinates.

const WGS84_A: f64 = 6_378_137.0;
const WGS84_F: f64 = 1.0 / 298.257_223_563;
const MAX_ITERATIONS: usize = 16;

fn eccentricity_sq() -> f64 {
    WGS84_F * (2.0 - WGS84_F)
}

/// ECEF metres to `(lon, lat, height)` with angles in degrees and height in metres.
pub fn xyz2llh(x: f64, y: f64, z: f64) -> (f64, f64, f64) {
    let e2 = eccentricity_sq();
    let lon = y.atan2(x);
    let p = x.hypot(y);

    if p < 1e-9 {
        let b = WGS84_A * (1.0 - WGS84_F);
        let lat = if z >= 0.0 { 90.0 } else { -90.0 };
        return (lon.to_degrees(), lat, z.abs() - b);
    }

    let mut lat = z.atan2(p * (1.0 - e2));
    let mut height = 0.0;
    for _ in 0..MAX_ITERATIONS {
        let sin_lat = lat.sin();
        let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
        height = p / lat.cos() - n;
        let next = z.atan2(p * (1.0 - e2 * n / (n + height)));
        let converged = (next - lat).abs() < 1e-14;
        lat = next;
        if converged {
            break;
        }
    }

    (lon.to_degrees(), lat.to_degrees(), height)
}

/// Geodetic `(lon, lat)` in degrees and height in metres to ECEF metres.
pub fn llh2xyz(lon: f64, lat: f64, height: f64) -> (f64, f64, f64) {
    let e2 = eccentricity_sq();
    let (sin_lon, cos_lon) = lon.to_radians().sin_cos();
    let (sin_lat, cos_lat) = lat.to_radians().sin_cos();
    let n = WGS84_A / (1.0 - e2 * sin_lat * sin_lat).sqrt();
    (
        (n + height) * cos_lat * cos_lon,
        (n + height) * cos_lat * sin_lon,
        (n * (1.0 - e2) + height) * sin_lat,
    )
}
