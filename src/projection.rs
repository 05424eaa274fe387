//! Lambert conformal conic projection on a spherical Earth

use crate::error::{Error, Result};
use crate::types::{GeoPoint, PlanarPoint};
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

/// Mean Earth radius in meters
pub const EARTH_RADIUS: f64 = 6_371_000.0;

const EPSILON: f64 = 1e-12;

/// Projection parameters, all in radians
///
/// Supplied once at startup by the configuration collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectionConfig {
    pub parallel1: f64,
    pub parallel2: f64,
    pub ref_lat: f64,
    pub ref_lon: f64,
}

/// Lambert conformal conic projection with two standard parallels
///
/// Maps geodetic coordinates to meters east (`x`) and north (`y`) of the reference point.
/// Immutable after construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    config: ProjectionConfig,
    n: f64,
    f: f64,
    rho0: f64,
}

fn cone_term(lat: f64) -> f64 {
    (FRAC_PI_4 + lat / 2.0).tan()
}

impl Projection {
    /// Create a projection from two standard parallels and a reference point
    ///
    /// Fails if the parallels coincide or either lies on a pole.
    pub fn new(parallel1: f64, parallel2: f64, ref_lat: f64, ref_lon: f64) -> Result<Self> {
        Self::from_config(ProjectionConfig {
            parallel1,
            parallel2,
            ref_lat,
            ref_lon,
        })
    }

    pub fn from_config(config: ProjectionConfig) -> Result<Self> {
        let ProjectionConfig {
            parallel1,
            parallel2,
            ref_lat,
            ..
        } = config;

        if (parallel1 - parallel2).abs() < EPSILON {
            return Err(Error::ParallelsCoincide);
        }
        if parallel1.cos().abs() < EPSILON || parallel2.cos().abs() < EPSILON {
            return Err(Error::PolarParallel);
        }

        let n = (parallel1.cos() / parallel2.cos()).ln()
            / (cone_term(parallel2) / cone_term(parallel1)).ln();
        let f = parallel1.cos() * cone_term(parallel1).powf(n) / n;

        if !n.is_finite() || n.abs() < EPSILON || !f.is_finite() {
            return Err(Error::DegenerateProjection { n, f });
        }

        let rho0 = EARTH_RADIUS * f / cone_term(ref_lat).powf(n);
        if !rho0.is_finite() {
            return Err(Error::DegenerateProjection { n, f });
        }

        Ok(Self { config, n, f, rho0 })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Cone constant
    pub fn n(&self) -> f64 {
        self.n
    }

    fn rho(&self, lat: f64) -> f64 {
        EARTH_RADIUS * self.f / cone_term(lat).powf(self.n)
    }

    /// Ratio of planar to ground distance at `lat`
    ///
    /// Exactly one on both standard parallels, below one between them.
    pub fn scale_factor(&self, lat: f64) -> f64 {
        self.n * self.rho(lat) / (EARTH_RADIUS * lat.cos())
    }

    /// Convert latitude/longitude (radians) to planar meters
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let rho = self.rho(lat);
        let theta = self.n * (lon - self.config.ref_lon);

        (rho * theta.sin(), self.rho0 - rho * theta.cos())
    }

    /// Convert planar meters back to latitude/longitude (radians)
    pub fn reverse(&self, x: f64, y: f64) -> (f64, f64) {
        let sign = self.n.signum();
        let dy = self.rho0 - y;

        let rho = sign * x.hypot(dy);
        let theta = (sign * x).atan2(sign * dy);

        let lat = 2.0 * (EARTH_RADIUS * self.f / rho).powf(1.0 / self.n).atan() - FRAC_PI_2;
        let lon = theta / self.n + self.config.ref_lon;

        (lat, lon)
    }

    pub fn project(&self, point: GeoPoint) -> PlanarPoint {
        let (x, y) = self.forward(point.lat, point.lon);
        PlanarPoint::new(x, y)
    }

    pub fn unproject(&self, point: PlanarPoint) -> GeoPoint {
        let (lat, lon) = self.reverse(point.x, point.y);
        GeoPoint::new(lat, lon)
    }

    /// Great-circle distance in meters between two planar points
    pub fn dist(&self, p1: PlanarPoint, p2: PlanarPoint) -> f64 {
        let a = self.unproject(p1);
        let b = self.unproject(p2);

        let dlat = b.lat - a.lat;
        let dlon = b.lon - a.lon;
        let h = (dlat / 2.0).sin().powi(2) + a.lat.cos() * b.lat.cos() * (dlon / 2.0).sin().powi(2);

        2.0 * EARTH_RADIUS * h.sqrt().min(1.0).asin()
    }

    /// Initial great-circle bearing from `p1` to `p2`, radians in `[0, 2pi)`
    pub fn course(&self, p1: PlanarPoint, p2: PlanarPoint) -> f64 {
        let a = self.unproject(p1);
        let b = self.unproject(p2);

        let dlon = b.lon - a.lon;
        let y = dlon.sin() * b.lat.cos();
        let x = a.lat.cos() * b.lat.sin() - a.lat.sin() * b.lat.cos() * dlon.cos();

        let course = y.atan2(x).rem_euclid(TAU);
        // rem_euclid can round up to exactly TAU for tiny negative inputs
        if course >= TAU { 0.0 } else { course }
    }
}
