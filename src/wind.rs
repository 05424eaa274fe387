//! Wind and thermal climb estimation from circling flight
//!
//! While circling, the ground track is an air-mass circle displaced by the wind. The
//! centroid of the fixes over one full revolution follows the air mass, so successive
//! centroids give the drift, and the drift is the wind.

use crate::task::WindVector;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::f64::consts::{FRAC_PI_2, PI, TAU};
use tracing::{debug, trace};

/// Position fix in the projected plane
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FixSample {
    pub x: f64,
    pub y: f64,
    /// Altitude in meters
    pub z: f64,
    /// Time in seconds
    pub t: f64,
}

impl FixSample {
    pub fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    /// Longest time one revolution may take, in seconds
    pub max_circling_duration: f64,
    /// Age limit of drift samples used for the wind, in seconds
    pub max_drift_duration: f64,
    /// Time without turning after which a thermal is left, in seconds
    pub thermal_timeout: f64,
    /// Turn rate below which flight counts as straight, in degrees per second
    pub straight_turn_rate: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            max_circling_duration: 60.0,
            max_drift_duration: 600.0,
            thermal_timeout: 20.0,
            straight_turn_rate: 2.0,
        }
    }
}

impl WindConfig {
    pub fn with_max_circling_duration(mut self, seconds: f64) -> Self {
        self.max_circling_duration = seconds;
        self
    }

    pub fn with_max_drift_duration(mut self, seconds: f64) -> Self {
        self.max_drift_duration = seconds;
        self
    }

    pub fn with_thermal_timeout(mut self, seconds: f64) -> Self {
        self.thermal_timeout = seconds;
        self
    }

    pub fn with_straight_turn_rate(mut self, degrees_per_second: f64) -> Self {
        self.straight_turn_rate = degrees_per_second;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy)]
struct WindowSample {
    fix: FixSample,
    /// Turn between the displacement ending at this fix and the one before it
    turn: f64,
}

#[derive(Debug, Clone, Copy)]
struct DriftSample {
    x: f64,
    y: f64,
    t: f64,
}

/// Streaming wind and climb estimator
///
/// Feed fixes in time order through [`update`](Self::update). Reversing the turn
/// direction throws away the current revolution and the drift history.
#[derive(Debug, Clone)]
pub struct WindDriftEstimator {
    config: WindConfig,
    last_fix: Option<FixSample>,
    last_vector: Option<(f64, f64)>,
    turn: Option<Turn>,
    window: VecDeque<WindowSample>,
    accumulated: f64,
    drift: VecDeque<DriftSample>,
    wind: Option<WindVector>,
    thermal_entry: Option<FixSample>,
    last_turning: f64,
    climb_rate: Option<f64>,
}

impl Default for WindDriftEstimator {
    fn default() -> Self {
        Self::new(WindConfig::default())
    }
}

impl WindDriftEstimator {
    pub fn new(config: WindConfig) -> Self {
        Self {
            config,
            last_fix: None,
            last_vector: None,
            turn: None,
            window: VecDeque::new(),
            accumulated: 0.0,
            drift: VecDeque::new(),
            wind: None,
            thermal_entry: None,
            last_turning: f64::NEG_INFINITY,
            climb_rate: None,
        }
    }

    pub fn config(&self) -> &WindConfig {
        &self.config
    }

    /// Latest wind estimate
    pub fn wind(&self) -> Option<WindVector> {
        self.wind
    }

    /// Average climb since thermal entry in m/s, while circling in a thermal
    pub fn climb_rate(&self) -> Option<f64> {
        self.climb_rate
    }

    pub fn thermal_entry(&self) -> Option<FixSample> {
        self.thermal_entry
    }

    /// Number of revolution centroids in the drift history
    pub fn drift_samples(&self) -> usize {
        self.drift.len()
    }

    /// Forget everything, including the current wind estimate
    pub fn reset(&mut self) {
        *self = Self::new(self.config);
    }

    /// Feed the next fix
    ///
    /// Returns the new wind estimate when this fix completed a revolution and enough
    /// drift history was available.
    pub fn update(&mut self, fix: FixSample) -> Option<WindVector> {
        let Some(last) = self.last_fix else {
            self.last_fix = Some(fix);
            return None;
        };

        let dt = fix.t - last.t;
        let vector = (fix.x - last.x, fix.y - last.y);
        if dt <= 0.0 || (vector.0 == 0.0 && vector.1 == 0.0) {
            return None;
        }
        self.last_fix = Some(fix);

        let Some(previous) = self.last_vector.replace(vector) else {
            self.restart_window(last);
            self.window.push_back(WindowSample { fix, turn: 0.0 });
            return None;
        };

        let norms = previous.0.hypot(previous.1) * vector.0.hypot(vector.1);
        let dot = previous.0 * vector.0 + previous.1 * vector.1;
        let cross = previous.0 * vector.1 - previous.1 * vector.0;
        let turn_angle = (dot / norms).clamp(-1.0, 1.0).acos();

        if turn_angle.to_degrees() / dt >= self.config.straight_turn_rate {
            self.last_turning = fix.t;
        }

        // With x east and y north a positive cross product is an anticlockwise turn
        let direction = match cross {
            c if c > 0.0 => Some(Turn::Left),
            c if c < 0.0 => Some(Turn::Right),
            _ => self.turn,
        };

        if self.turn.is_some() && direction != self.turn {
            trace!(t = fix.t, "Turn direction changed, discarding window and drift");
            self.drift.clear();
            self.restart_window(fix);
        } else {
            self.window.push_back(WindowSample {
                fix,
                turn: turn_angle,
            });
            self.accumulated += turn_angle;
            self.drop_stale(fix.t);
        }
        self.turn = direction;

        self.update_thermal(fix);

        if self.accumulated >= TAU {
            return self.complete_revolution(fix);
        }
        None
    }

    fn restart_window(&mut self, fix: FixSample) {
        self.window.clear();
        self.window.push_back(WindowSample { fix, turn: 0.0 });
        self.accumulated = 0.0;
    }

    /// Drop fixes older than one revolution may last
    fn drop_stale(&mut self, now: f64) {
        let mut dropped = false;
        while let Some(front) = self.window.front() {
            if front.fix.t >= now - self.config.max_circling_duration {
                break;
            }
            self.accumulated -= front.turn;
            self.window.pop_front();
            dropped = true;
        }

        if dropped && !self.drift.is_empty() {
            trace!(t = now, "Circle took too long, discarding drift");
            self.drift.clear();
        }
        self.accumulated = self.accumulated.max(0.0);
    }

    fn complete_revolution(&mut self, fix: FixSample) -> Option<WindVector> {
        let count = self.window.len() as f64;
        let (sx, sy, st) = self
            .window
            .iter()
            .fold((0.0, 0.0, 0.0), |(x, y, t), sample| {
                (x + sample.fix.x, y + sample.fix.y, t + sample.fix.t)
            });
        let centroid = DriftSample {
            x: sx / count,
            y: sy / count,
            t: st / count,
        };
        debug!(x = centroid.x, y = centroid.y, t = centroid.t, "Circle completed");

        self.drift.push_back(centroid);
        while let Some(front) = self.drift.front() {
            if front.t >= centroid.t - self.config.max_drift_duration {
                break;
            }
            self.drift.pop_front();
        }

        self.restart_window(fix);

        let (oldest, newest) = (self.drift.front()?, self.drift.back()?);
        let elapsed = newest.t - oldest.t;
        if self.drift.len() < 2 || elapsed <= 0.0 {
            return None;
        }

        let wind = WindVector::from_drift(
            (newest.x - oldest.x) / elapsed,
            (newest.y - oldest.y) / elapsed,
        );
        debug!(
            speed = wind.speed,
            direction = wind.direction.to_degrees(),
            samples = self.drift.len(),
            "Wind estimate"
        );
        self.wind = Some(wind);
        Some(wind)
    }

    fn update_thermal(&mut self, fix: FixSample) {
        if let Some(entry) = self.thermal_entry {
            if fix.t - self.last_turning > self.config.thermal_timeout {
                debug!(t = fix.t, "Left thermal");
                self.thermal_entry = None;
                self.climb_rate = None;
            } else if fix.t > entry.t {
                self.climb_rate = Some((fix.z - entry.z) / (fix.t - entry.t));
            }
            return;
        }

        if self.accumulated <= PI {
            return;
        }

        // Entry is a quarter revolution back from here
        let mut turned = 0.0;
        let mut entry = fix;
        for sample in self.window.iter().rev() {
            entry = sample.fix;
            if turned >= FRAC_PI_2 {
                break;
            }
            turned += sample.turn;
        }

        debug!(t = entry.t, z = entry.z, "Entered thermal");
        self.thermal_entry = Some(entry);
        if fix.t > entry.t {
            self.climb_rate = Some((fix.z - entry.z) / (fix.t - entry.t));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_none, assert_some};

    const RADIUS: f64 = 100.0;
    const AIRSPEED: f64 = 25.0;
    const DT: f64 = 0.25;

    /// Synthetic circling flight through a uniformly moving air mass
    struct Flight {
        x: f64,
        y: f64,
        z: f64,
        t: f64,
        heading: f64,
        wind: (f64, f64),
        climb: f64,
    }

    impl Flight {
        fn new(wind: WindVector, climb: f64) -> Self {
            Self {
                x: 0.0,
                y: 0.0,
                z: 1000.0,
                t: 0.0,
                heading: 0.0,
                wind: (wind.speed * wind.direction.sin(), wind.speed * wind.direction.cos()),
                climb,
            }
        }

        /// Circle for `turns` revolutions, clockwise when `right`
        fn circle(
            &mut self,
            estimator: &mut WindDriftEstimator,
            turns: f64,
            right: bool,
        ) -> Vec<WindVector> {
            let rate = if right { AIRSPEED / RADIUS } else { -AIRSPEED / RADIUS };
            let steps = (turns * TAU / (AIRSPEED / RADIUS) / DT).round() as usize;
            let mut estimates = Vec::new();

            for _ in 0..steps {
                let next_heading = self.heading + rate * DT;
                let radius = AIRSPEED / rate;
                self.x += -radius * (next_heading.cos() - self.heading.cos()) + self.wind.0 * DT;
                self.y += radius * (next_heading.sin() - self.heading.sin()) + self.wind.1 * DT;
                self.z += self.climb * DT;
                self.t += DT;
                self.heading = next_heading;

                estimates.extend(estimator.update(FixSample::new(self.x, self.y, self.z, self.t)));
            }
            estimates
        }

        fn straight(&mut self, estimator: &mut WindDriftEstimator, seconds: f64) {
            let steps = (seconds / DT).round() as usize;
            for _ in 0..steps {
                self.x += AIRSPEED * self.heading.sin() * DT + self.wind.0 * DT;
                self.y += AIRSPEED * self.heading.cos() * DT + self.wind.1 * DT;
                self.t += DT;
                estimator.update(FixSample::new(self.x, self.y, self.z, self.t));
            }
        }
    }

    fn assert_wind(actual: WindVector, expected: WindVector) {
        let direction_error = (actual.direction - expected.direction + PI).rem_euclid(TAU) - PI;
        assert!(
            direction_error.to_degrees().abs() < 5.0,
            "direction {} != {}",
            actual.direction.to_degrees(),
            expected.direction.to_degrees()
        );
        assert!(
            (actual.speed - expected.speed).abs() < expected.speed * 0.05,
            "speed {} != {}",
            actual.speed,
            expected.speed
        );
    }

    #[test]
    fn recovers_wind_from_drifting_circles() {
        let wind = WindVector::new(5.0, 60f64.to_radians());
        let mut estimator = WindDriftEstimator::default();
        let mut flight = Flight::new(wind, 0.0);

        let estimates = flight.circle(&mut estimator, 1.2, true);
        assert!(estimates.is_empty());
        assert_eq!(estimator.drift_samples(), 1);

        let estimates = flight.circle(&mut estimator, 4.0, true);
        assert!(estimates.len() >= 3);
        assert_wind(*estimates.last().unwrap(), wind);
        assert_wind(assert_some!(estimator.wind()), wind);
    }

    #[test]
    fn recovers_wind_circling_left() {
        let wind = WindVector::new(4.0, 250f64.to_radians());
        let mut estimator = WindDriftEstimator::default();
        let mut flight = Flight::new(wind, 0.0);

        let estimates = flight.circle(&mut estimator, 5.2, false);
        assert_wind(*estimates.last().unwrap(), wind);
    }

    #[test]
    fn reversal_discards_pending_estimate() {
        let wind = WindVector::new(5.0, 60f64.to_radians());
        let mut estimator = WindDriftEstimator::default();
        let mut flight = Flight::new(wind, 0.0);

        assert!(flight.circle(&mut estimator, 1.5, true).is_empty());
        assert_eq!(estimator.drift_samples(), 1);

        // The first revolution after the reversal must not pair with the old centroid
        assert!(flight.circle(&mut estimator, 1.5, false).is_empty());
        assert_none!(estimator.wind());
        assert_eq!(estimator.drift_samples(), 1);

        let estimates = flight.circle(&mut estimator, 3.0, false);
        assert_wind(*estimates.last().unwrap(), wind);
    }

    #[test]
    fn straight_flight_gives_no_wind() {
        let mut estimator = WindDriftEstimator::default();
        let mut flight = Flight::new(WindVector::new(5.0, 1.0), 0.0);

        flight.straight(&mut estimator, 300.0);
        assert_none!(estimator.wind());
        assert_eq!(estimator.drift_samples(), 0);
    }

    #[test]
    fn thermal_climb_rate() {
        let mut estimator = WindDriftEstimator::default();
        let mut flight = Flight::new(WindVector::new(2.0, 0.0), 1.5);

        flight.circle(&mut estimator, 0.4, true);
        assert_none!(estimator.climb_rate());

        flight.circle(&mut estimator, 3.0, true);
        let climb = assert_some!(estimator.climb_rate());
        assert!((climb - 1.5).abs() < 1e-6, "{climb}");
        let entry = assert_some!(estimator.thermal_entry());
        // Half a revolution takes about 12.6 s, entry is a quarter of that back
        assert!((entry.t - 6.3).abs() < 1.0, "{}", entry.t);

        flight.straight(&mut estimator, 30.0);
        assert_none!(estimator.climb_rate());
        assert_none!(estimator.thermal_entry());
    }

    #[test]
    fn repeated_or_stationary_fixes_are_ignored() {
        let mut estimator = WindDriftEstimator::default();
        assert_none!(estimator.update(FixSample::new(0.0, 0.0, 0.0, 0.0)));
        assert_none!(estimator.update(FixSample::new(0.0, 0.0, 0.0, 1.0)));
        assert_none!(estimator.update(FixSample::new(10.0, 0.0, 0.0, 1.0)));
        assert_none!(estimator.update(FixSample::new(10.0, 0.0, 0.0, 0.5)));
        assert_eq!(estimator.drift_samples(), 0);
    }

    #[test]
    fn config_defaults_from_json() {
        let config: WindConfig = serde_json::from_str(r#"{"thermal_timeout": 30.0}"#).unwrap();
        assert_eq!(config, WindConfig::default().with_thermal_timeout(30.0));
    }
}
