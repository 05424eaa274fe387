#![doc = include_str!("../README.md")]

pub use crate::error::{Error, Result, Warning};
pub use crate::navigator::{LiveFix, NavigationDisplay, Navigator, TargetInfo};
pub use crate::projection::{EARTH_RADIUS, Projection, ProjectionConfig};
pub use crate::types::*;
pub use crate::wind::{FixSample, WindConfig, WindDriftEstimator};

pub mod airspace;
mod error;
pub mod navigator;
mod projection;
pub mod task;
pub mod tnp;
mod types;
pub mod utils;
pub mod wind;
pub mod writer;
