use serde::{Deserialize, Serialize};

/// One knot in meters per second
pub const KNOT: f64 = 1852.0 / 3600.0;

/// Quadratic glider polar
///
/// `sink = -(a v^2 + b v + c)` with speed and sink in m/s, sink positive downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PolarCoefficients {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

/// Pilot settings applied to the polar
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GlideSettings {
    /// Expected climb rate in m/s
    pub maccready: f64,
    /// Polar degradation factor, 1 for a clean wing
    pub bugs: f64,
    /// Ratio of flying weight to reference weight
    pub ballast: f64,
    /// Required arrival height reserve in meters
    pub safety_height: f64,
}

impl Default for GlideSettings {
    fn default() -> Self {
        Self {
            maccready: 0.0,
            bugs: 1.0,
            ballast: 1.0,
            safety_height: 0.0,
        }
    }
}

impl GlideSettings {
    pub fn with_maccready(mut self, maccready: f64) -> Self {
        self.maccready = maccready;
        self
    }

    pub fn with_bugs(mut self, bugs: f64) -> Self {
        self.bugs = bugs;
        self
    }

    pub fn with_ballast(mut self, ballast: f64) -> Self {
        self.ballast = ballast;
        self
    }

    pub fn with_safety_height(mut self, safety_height: f64) -> Self {
        self.safety_height = safety_height;
        self
    }
}

/// Best speed to fly and the sink rate at that speed, both in m/s
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedToFly {
    pub speed: f64,
    pub sink: f64,
}

impl SpeedToFly {
    /// Still-air glide ratio
    pub fn glide_ratio(&self) -> f64 {
        self.speed / self.sink
    }
}

impl PolarCoefficients {
    pub fn new(a: f64, b: f64, c: f64) -> Self {
        Self { a, b, c }
    }

    /// Polar scaled for ballast and bugs
    pub fn adjusted(&self, settings: &GlideSettings) -> Self {
        let ballast = settings.ballast.sqrt();
        Self {
            a: self.a / ballast * settings.bugs,
            b: self.b * settings.bugs,
            c: self.c * ballast * settings.bugs,
        }
    }

    /// Sink rate at airspeed `v`
    pub fn sink(&self, v: f64) -> f64 {
        -(self.a * v * v + self.b * v + self.c)
    }

    /// MacCready speed to fly for this (already adjusted) polar
    ///
    /// Returns `None` when the polar has no real tangent point for `maccready`.
    pub fn speed_to_fly(&self, maccready: f64) -> Option<SpeedToFly> {
        let square = (self.c - maccready) / self.a;
        if !square.is_finite() || square <= 0.0 {
            return None;
        }

        let speed = square.sqrt();
        Some(SpeedToFly {
            speed,
            sink: self.sink(speed),
        })
    }

    /// Adjust the polar for `settings` and solve for the speed to fly
    pub fn solve(&self, settings: &GlideSettings) -> Option<SpeedToFly> {
        self.adjusted(settings).speed_to_fly(settings.maccready)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_none, assert_some};

    fn polar() -> PolarCoefficients {
        PolarCoefficients::new(-0.002117, 0.08998, -1.560)
    }

    #[test]
    fn best_glide_in_still_air() {
        let stf = assert_some!(polar().solve(&GlideSettings::default()));

        assert!((stf.speed / KNOT - 52.8).abs() < 0.2, "{}", stf.speed / KNOT);
        assert!((stf.glide_ratio() - 40.1).abs() < 0.2, "{}", stf.glide_ratio());
    }

    #[test]
    fn maccready_two_knots() {
        let settings = GlideSettings::default().with_maccready(2.0 * KNOT);
        let stf = assert_some!(polar().solve(&settings));

        assert!((stf.speed / KNOT - 68.0).abs() < 0.2, "{}", stf.speed / KNOT);
        assert!((stf.glide_ratio() - 34.9).abs() < 0.2, "{}", stf.glide_ratio());
    }

    #[test]
    fn ballast_speeds_up_without_changing_best_glide() {
        let clean = assert_some!(polar().solve(&GlideSettings::default()));
        let ballasted = assert_some!(polar().solve(&GlideSettings::default().with_ballast(1.44)));

        assert!((ballasted.speed - clean.speed * 1.2).abs() < 1e-9);
        assert!((ballasted.glide_ratio() - clean.glide_ratio()).abs() < 1e-9);
    }

    #[test]
    fn bugs_increase_sink() {
        let clean = assert_some!(polar().solve(&GlideSettings::default()));
        let dirty = assert_some!(polar().solve(&GlideSettings::default().with_bugs(1.1)));

        assert!(dirty.glide_ratio() < clean.glide_ratio());
    }

    #[test]
    fn no_tangent_point() {
        // Upward-curving polar has no maximum
        assert_none!(PolarCoefficients::new(0.002, 0.09, -1.56).speed_to_fly(0.0));
        assert_none!(PolarCoefficients::new(0.0, 0.09, -1.56).speed_to_fly(0.0));
    }
}
