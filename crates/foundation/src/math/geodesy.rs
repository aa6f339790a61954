//! Spherical globe geometry.
//!
//! The globe is a sphere centred at the origin with Y up. Every renderable
//! position in the engine goes through [`to_cartesian`], so its sign and
//! offset convention fixes where the prime meridian faces:
//!
//! ```text
//! phi   = (90 - lat) * PI / 180
//! theta = (lon + 180) * PI / 180
//! x = -r * sin(phi) * cos(theta)
//! y =  r * cos(phi)
//! z =  r * sin(phi) * sin(theta)
//! ```

use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Vec3;

/// Mean Earth radius used for surface distances (kilometres).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default globe radius in render units.
pub const GLOBE_RADIUS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum GeoPointError {
    #[error("latitude {0} is not a finite value in [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} is not a finite value in [-180, 180]")]
    Longitude(f64),
}

/// A validated geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeoPointRepr")]
pub struct GeoPoint {
    #[serde(rename = "lat")]
    lat_deg: f64,
    #[serde(rename = "lon")]
    lon_deg: f64,
}

#[derive(Deserialize)]
struct GeoPointRepr {
    #[serde(alias = "latitude")]
    lat: f64,
    #[serde(alias = "lng", alias = "longitude")]
    lon: f64,
}

impl TryFrom<GeoPointRepr> for GeoPoint {
    type Error = GeoPointError;

    fn try_from(repr: GeoPointRepr) -> Result<Self, Self::Error> {
        GeoPoint::new(repr.lat, repr.lon)
    }
}

impl GeoPoint {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Result<Self, GeoPointError> {
        if !lat_deg.is_finite() || !(-90.0..=90.0).contains(&lat_deg) {
            return Err(GeoPointError::Latitude(lat_deg));
        }
        if !lon_deg.is_finite() || !(-180.0..=180.0).contains(&lon_deg) {
            return Err(GeoPointError::Longitude(lon_deg));
        }
        Ok(Self { lat_deg, lon_deg })
    }

    /// Builds a point from computed angles: latitude is clamped and longitude
    /// wrapped into `[-180, 180)`. Inputs must be finite.
    fn normalized(lat_deg: f64, lon_deg: f64) -> Self {
        Self {
            lat_deg: lat_deg.clamp(-90.0, 90.0),
            lon_deg: wrap_longitude(lon_deg),
        }
    }

    pub fn lat_deg(&self) -> f64 {
        self.lat_deg
    }

    pub fn lon_deg(&self) -> f64 {
        self.lon_deg
    }
}

fn wrap_longitude(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Projects a geographic point onto the globe surface of the given radius.
pub fn to_cartesian(point: GeoPoint, radius: f64) -> Vec3 {
    let phi = (90.0 - point.lat_deg).to_radians();
    let theta = (point.lon_deg + 180.0).to_radians();

    Vec3::new(
        -radius * phi.sin() * theta.cos(),
        radius * phi.cos(),
        radius * phi.sin() * theta.sin(),
    )
}

/// Inverse of [`to_cartesian`].
///
/// Only the direction of `v` matters; `radius` is accepted so callers can pass
/// the same arguments both ways. Longitude is undefined at the poles, and the
/// zero vector maps to `(0, 0)`.
pub fn to_geo(v: Vec3, _radius: f64) -> GeoPoint {
    let Some(n) = v.try_normalize() else {
        return GeoPoint::normalized(0.0, 0.0);
    };

    let phi = n.y.clamp(-1.0, 1.0).acos();
    let theta = n.z.atan2(-n.x);

    GeoPoint::normalized(90.0 - phi.to_degrees(), theta.to_degrees() - 180.0)
}

/// Great-circle distance in kilometres (haversine).
pub fn haversine_distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

fn central_angle(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * h.sqrt().clamp(0.0, 1.0).asin()
}

/// `n + 1` evenly spaced points along the great circle from `a` to `b`,
/// endpoints included.
///
/// Identical points repeat `a`. Antipodal points have no unique great circle;
/// the path then leaves `a` towards the north pole (or along the prime
/// meridian plane when `a` is a pole) and always finishes on `b`.
pub fn great_circle_points(a: GeoPoint, b: GeoPoint, n: usize) -> Vec<GeoPoint> {
    if n == 0 {
        return vec![a];
    }

    let d = central_angle(a, b);
    let ua = unit_vector(a);
    let mut out = Vec::with_capacity(n.saturating_add(1));
    out.push(a);

    if d.sin().abs() < 1e-12 {
        if d < FRAC_PI_2 {
            out.extend(std::iter::repeat_n(a, n - 1));
        } else {
            let axis = perpendicular_towards_north(ua);
            out.extend((1..n).map(|i| {
                let angle = d * i as f64 / n as f64;
                from_unit_vector(ua.scale(angle.cos()) + axis.scale(angle.sin()))
            }));
        }
    } else {
        let ub = unit_vector(b);
        let sin_d = d.sin();
        out.extend((1..n).map(|i| {
            let f = i as f64 / n as f64;
            let wa = ((1.0 - f) * d).sin() / sin_d;
            let wb = (f * d).sin() / sin_d;
            from_unit_vector(ua.scale(wa) + ub.scale(wb))
        }));
    }

    out.push(b);
    out
}

/// Earth-centred unit vector with z towards the north pole.
fn unit_vector(p: GeoPoint) -> Vec3 {
    let (lat, lon) = (p.lat_deg.to_radians(), p.lon_deg.to_radians());
    Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
}

fn from_unit_vector(v: Vec3) -> GeoPoint {
    let lat = v.z.atan2(v.x.hypot(v.y));
    let lon = v.y.atan2(v.x);
    GeoPoint::normalized(lat.to_degrees(), lon.to_degrees())
}

/// Unit vector orthogonal to `u`, leaning north. Falls back to +x at the poles.
fn perpendicular_towards_north(u: Vec3) -> Vec3 {
    let north = Vec3::new(0.0, 0.0, 1.0);
    (north - u.scale(u.dot(north)))
        .try_normalize()
        .unwrap_or(Vec3::new(1.0, 0.0, 0.0))
}

/// Initial bearing from `a` towards `b`, degrees clockwise from north in `[0, 360)`.
pub fn bearing_deg(a: GeoPoint, b: GeoPoint) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let dlon = (b.lon_deg - a.lon_deg).to_radians();

    let y = dlon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();
    y.atan2(x).to_degrees().rem_euclid(360.0)
}

/// Point reached by travelling `angular_distance_deg` of arc from `start`
/// along `bearing_deg`.
pub fn destination_point(start: GeoPoint, bearing_deg: f64, angular_distance_deg: f64) -> GeoPoint {
    let lat1 = start.lat_deg.to_radians();
    let lon1 = start.lon_deg.to_radians();
    let theta = bearing_deg.to_radians();
    let delta = angular_distance_deg.to_radians();

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * theta.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1
        + (theta.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    GeoPoint::normalized(lat2.to_degrees(), lon2.to_degrees())
}
