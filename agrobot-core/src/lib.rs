//! agrobot-core: per-robot configuration model
//!
//! Typed configuration bundles (camera, crop, circle-sight rig, mechanics),
//! their validation, and loading them per robot identity.

pub mod error;
pub mod schema;
pub mod circle_sight;
pub mod crop;
pub mod config;
pub mod catalog;

pub use error::{ConfigError, ConfigErrorKind, Error, Result};
pub use schema::{CameraParameters, ConfigEntry, ConfigSchema, MechanicalParameters, Tool};
pub use circle_sight::{CircleSightResolver, Slot, SlotIndexTable};
pub use crop::{Crop, CropRegion};
pub use config::{BundleFormat, RuntimeSettings};
pub use catalog::RobotCatalog;
