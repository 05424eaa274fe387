use crate::task::polar::SpeedToFly;
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Wind speed in m/s and the bearing (radians) the air moves towards
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub speed: f64,
    pub direction: f64,
}

impl WindVector {
    pub fn new(speed: f64, direction: f64) -> Self {
        Self {
            speed,
            direction: direction.rem_euclid(TAU),
        }
    }

    pub fn calm() -> Self {
        Self::default()
    }

    /// Wind from a drift velocity, `dx` east and `dy` north in m/s
    pub fn from_drift(dx: f64, dy: f64) -> Self {
        Self::new(dx.hypot(dy), dx.atan2(dy))
    }
}

/// One leg of the remaining route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlideLeg {
    /// Leg length in meters
    pub distance: f64,
    /// Course over ground in radians, clockwise from north
    pub course: f64,
}

/// Why no final glide could be computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidGlide {
    /// The polar has no speed to fly for the current settings
    NoSpeedToFly,
    /// The wind is at least as fast as the speed to fly
    WindTooStrong,
    /// A leg of the route has no length
    ZeroLengthLeg,
}

/// Final glide over the remaining route
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FinalGlide {
    pub speed_to_fly: SpeedToFly,
    /// Height needed for the whole route in meters
    pub height_loss: f64,
    /// Estimated time en route in seconds
    pub ete: f64,
    /// Height above the destination on arrival
    pub arrival_height: f64,
    /// `(arrival_height - safety_height) / height_loss`, `None` without height loss
    pub glide_margin: Option<f64>,
}

/// Height loss and time for one leg flown at `stf` through `wind`
fn leg_cost(
    leg: &GlideLeg,
    stf: &SpeedToFly,
    wind: WindVector,
) -> Result<(f64, f64), InvalidGlide> {
    if leg.distance <= 0.0 {
        return Err(InvalidGlide::ZeroLengthLeg);
    }

    let relative = wind.direction - leg.course;
    let crosswind = wind.speed / stf.speed * relative.sin();
    let ground_speed =
        stf.speed * (1.0 - crosswind * crosswind).sqrt() + wind.speed * relative.cos();

    Ok((leg.distance * stf.sink / ground_speed, leg.distance / ground_speed))
}

/// Fold the legs from the destination backwards into a final glide solution
///
/// `altitude` and `destination_altitude` are in meters above sea level.
pub fn final_glide(
    legs: &[GlideLeg],
    stf: SpeedToFly,
    wind: WindVector,
    altitude: f64,
    destination_altitude: f64,
    safety_height: f64,
) -> Result<FinalGlide, InvalidGlide> {
    if stf.speed.is_nan() || stf.speed <= 0.0 {
        return Err(InvalidGlide::NoSpeedToFly);
    }
    if stf.speed <= wind.speed {
        return Err(InvalidGlide::WindTooStrong);
    }

    let (height_loss, ete) = legs
        .iter()
        .rev()
        .try_fold((0.0, 0.0), |(loss, time), leg| {
            let (leg_loss, leg_time) = leg_cost(leg, &stf, wind)?;
            Ok((loss + leg_loss, time + leg_time))
        })?;

    let arrival_height = altitude - height_loss - destination_altitude;
    let glide_margin = (height_loss != 0.0).then(|| (arrival_height - safety_height) / height_loss);

    Ok(FinalGlide {
        speed_to_fly: stf,
        height_loss,
        ete,
        arrival_height,
        glide_margin,
    })
}
