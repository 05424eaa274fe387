//! Live update loop tying projection, task, wind and airspace together

use crate::airspace::{AirspaceBuilder, AirspaceSet};
use crate::error::{Result, Warning};
use crate::projection::Projection;
use crate::task::{FinalGlide, GlideSettings, InvalidGlide, Task, WindVector};
use crate::tnp::TnpReader;
use crate::types::{GeoPoint, PlanarPoint};
use crate::wind::{FixSample, WindConfig, WindDriftEstimator};
use std::f64::consts::{PI, TAU};
use std::io::Read;
use tracing::debug;

/// One position and vario update from the instruments
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveFix {
    /// Seconds
    pub timestamp: f64,
    /// Radians
    pub lat: f64,
    /// Radians
    pub lon: f64,
    /// Meters above sea level
    pub altitude: f64,
    /// Track over ground, radians clockwise from north
    pub track: f64,
    /// m/s
    pub ground_speed: f64,
    /// m/s
    pub maccready: f64,
    pub bugs: f64,
    pub ballast: f64,
}

/// Active target as shown to the pilot
#[derive(Debug, Clone, PartialEq)]
pub struct TargetInfo {
    pub id: String,
    pub name: String,
    /// Meters
    pub distance: f64,
    /// Radians clockwise from north
    pub bearing: f64,
    /// Bearing relative to the current track, radians in `[-pi, pi)`
    pub relative_bearing: f64,
}

/// Everything the display needs after one update
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationDisplay {
    pub position: PlanarPoint,
    pub wind: Option<WindVector>,
    pub climb_rate: Option<f64>,
    /// `None` without a task
    pub target: Option<TargetInfo>,
    /// `None` without a task
    pub glide: Option<std::result::Result<FinalGlide, InvalidGlide>>,
    pub in_start_sector: bool,
    /// Ids of the airspaces containing the position
    pub airspaces: Vec<u32>,
}

impl NavigationDisplay {
    pub fn glide_margin(&self) -> Option<f64> {
        self.final_glide()?.glide_margin
    }

    pub fn arrival_height(&self) -> Option<f64> {
        Some(self.final_glide()?.arrival_height)
    }

    /// Estimated time en route in seconds
    pub fn ete(&self) -> Option<f64> {
        Some(self.final_glide()?.ete)
    }

    fn final_glide(&self) -> Option<&FinalGlide> {
        self.glide.as_ref()?.as_ref().ok()
    }
}

pub struct Navigator {
    projection: Projection,
    task: Option<Task>,
    wind: WindDriftEstimator,
    airspace: AirspaceSet,
}

impl Navigator {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            task: None,
            wind: WindDriftEstimator::default(),
            airspace: AirspaceSet::default(),
        }
    }

    pub fn with_wind_config(mut self, config: WindConfig) -> Self {
        self.wind = WindDriftEstimator::new(config);
        self
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Install a task, computing its zone geometry for this projection
    pub fn set_task(&mut self, mut task: Task) {
        task.update_geometry(&self.projection);
        self.task = Some(task);
    }

    pub fn clear_task(&mut self) -> Option<Task> {
        self.task.take()
    }

    pub fn task(&self) -> Option<&Task> {
        self.task.as_ref()
    }

    pub fn task_mut(&mut self) -> Option<&mut Task> {
        self.task.as_mut()
    }

    pub fn wind_estimator(&self) -> &WindDriftEstimator {
        &self.wind
    }

    pub fn airspace(&self) -> &AirspaceSet {
        &self.airspace
    }

    pub fn set_airspace(&mut self, airspace: AirspaceSet) {
        self.airspace = airspace;
    }

    /// Import a TNP file, replacing the loaded airspace
    ///
    /// The current set stays in place if the file fails to parse.
    pub fn load_airspace<R: Read>(
        &mut self,
        mut reader: TnpReader<R>,
        warnings: &mut Vec<Warning>,
    ) -> Result<usize> {
        let mut builder = AirspaceBuilder::new(&self.projection);
        reader.read_into(&mut builder, warnings)?;
        warnings.extend_from_slice(builder.warnings());

        let regions = builder.finish();
        let count = regions.len();
        self.airspace.replace(regions);
        Ok(count)
    }

    pub fn update(&mut self, fix: &LiveFix) -> NavigationDisplay {
        let position = self.projection.project(GeoPoint::new(fix.lat, fix.lon));

        self.wind.update(FixSample::new(
            position.x,
            position.y,
            fix.altitude,
            fix.timestamp,
        ));
        let wind = self.wind.wind();

        let airspaces = self
            .airspace
            .containing(position)
            .into_iter()
            .map(|region| region.id)
            .collect();

        let mut display = NavigationDisplay {
            position,
            wind,
            climb_rate: self.wind.climb_rate(),
            target: None,
            glide: None,
            in_start_sector: false,
            airspaces,
        };

        let Some(task) = self.task.as_mut() else {
            return display;
        };

        let settings = GlideSettings {
            maccready: fix.maccready,
            bugs: fix.bugs,
            ballast: fix.ballast,
            ..*task.settings()
        };
        task.set_settings(settings);

        let target = task.active_target();
        let bearing = self.projection.course(position, target.position);
        display.target = Some(TargetInfo {
            id: target.id.clone(),
            name: target.name.clone(),
            distance: self.projection.dist(position, target.position),
            bearing,
            relative_bearing: (bearing - fix.track + PI).rem_euclid(TAU) - PI,
        });

        let wind = wind.unwrap_or_default();
        let glide = task.final_glide(&self.projection, position, fix.altitude, wind);
        if let Err(reason) = glide {
            debug!(?reason, "No final glide");
        }
        display.glide = Some(glide);
        display.in_start_sector = task.in_start_sector(&self.projection, position);

        display
    }
}
