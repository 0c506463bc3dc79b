//! Robot session: validated configuration plus camera wiring
//!
//! A session only exists for a robot whose bundle validated. There is no
//! fallback to defaults; automation must not start otherwise.

use crate::camera::CameraProvider;
use crate::error::VisionError;
use crate::rig::CameraRig;
use agrobot_core::{ConfigEntry, RobotCatalog, RuntimeSettings, Slot, SlotIndexTable};
use tracing::info;

pub struct RobotSession {
    robot: String,
    entry: ConfigEntry,
    rig: CameraRig,
}

impl RobotSession {
    /// Start a session for `robot` from an already loaded catalog
    pub fn start(catalog: &RobotCatalog, robot: &str) -> Result<Self, VisionError> {
        let entry = catalog.get(robot)?.clone();
        info!(
            "Robot {} configured: camera={}, circle-sight slots={}",
            robot,
            entry.camera().is_some(),
            entry.circle_sight().map_or(0, SlotIndexTable::len)
        );
        Ok(Self {
            robot: robot.to_string(),
            entry,
            rig: CameraRig::new(),
        })
    }

    /// Start `settings.robot_id` from its bundle in `settings.config_dir`
    ///
    /// Only that robot's bundle is read; bundles of other robots in the same
    /// directory do not affect start-up.
    pub fn from_settings(settings: &RuntimeSettings) -> Result<Self, VisionError> {
        let robot = settings.robot_id.as_deref().ok_or(VisionError::MissingRobotId)?;
        let entry = RobotCatalog::load_robot(&settings.config_dir, robot)?;
        let mut catalog = RobotCatalog::new();
        catalog.insert(robot, entry)?;
        Self::start(&catalog, robot)
    }

    /// Feed the session's camera rig from `provider`
    pub fn attach(&self, provider: &dyn CameraProvider) {
        self.rig.attach(provider);
    }

    pub fn robot(&self) -> &str {
        &self.robot
    }

    pub fn entry(&self) -> &ConfigEntry {
        &self.entry
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Device index of the circle-sight camera mounted at `slot`
    pub fn index_for(&self, slot: Slot) -> Option<i32> {
        self.entry.circle_sight()?.index_for(slot)
    }
}
