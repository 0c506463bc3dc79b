//! Robot catalog: one validated configuration bundle per robot identity
//!
//! Bundles are loaded from a directory holding one file per robot. The file
//! stem is the robot identity (`rb12.toml` → `rb12`). [`RobotCatalog::load_dir`]
//! is all or nothing: a single invalid bundle fails the whole load. Nothing is
//! ever defaulted. Use [`RobotCatalog::load_robot`] to read one robot's bundle.

use crate::config::BundleFormat;
use crate::error::{Error, Result};
use crate::schema::{ConfigEntry, ConfigSchema};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone, Default)]
pub struct RobotCatalog {
    entries: BTreeMap<String, ConfigEntry>,
}

impl RobotCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every `.json`, `.toml`, `.yaml` and `.yml` file in `dir`
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut catalog = Self::new();
        for path in Self::bundle_paths(dir)? {
            let (robot, entry) = Self::load_file(&path)?;
            catalog.insert(robot, entry)?;
        }

        info!("Loaded {} robot configuration(s) from {}", catalog.len(), dir.display());
        Ok(catalog)
    }

    /// Load only the bundle of `robot` from `dir`
    pub fn load_robot(dir: impl AsRef<Path>, robot: &str) -> Result<ConfigEntry> {
        let mut found = None;
        for path in Self::bundle_paths(dir.as_ref())? {
            if Self::robot_id(&path).as_deref() != Some(robot) {
                continue;
            }
            if found.is_some() {
                return Err(Error::DuplicateRobot(robot.to_string()));
            }
            found = Some(path);
        }
        let path = found.ok_or_else(|| Error::UnknownRobot(robot.to_string()))?;
        let (_, entry) = Self::load_file(&path)?;
        Ok(entry)
    }

    /// Bundle files in `dir`, sorted by path
    pub fn bundle_paths(dir: &Path) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for dirent in fs::read_dir(dir)? {
            let path = dirent?.path();
            if path.is_file() && BundleFormat::from_path(&path).is_some() {
                paths.push(path);
            } else {
                debug!("Skipping {}", path.display());
            }
        }
        // Directory order is platform dependent
        paths.sort();
        Ok(paths)
    }

    /// Robot identity implied by a bundle path (its file stem)
    pub fn robot_id(path: &Path) -> Option<String> {
        path.file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .map(str::to_string)
    }

    /// Load and validate a single bundle file, returning its robot identity
    pub fn load_file(path: impl AsRef<Path>) -> Result<(String, ConfigEntry)> {
        let path = path.as_ref();
        let format = BundleFormat::from_path(path).ok_or_else(|| {
            Error::Parse(format!("Unsupported bundle file extension: {}", path.display()))
        })?;
        let robot = Self::robot_id(path).ok_or_else(|| {
            Error::Parse(format!("Cannot derive robot identity from {}", path.display()))
        })?;

        let content = fs::read_to_string(path)?;
        let raw = format.parse(&content)?;
        let entry = Self::validate_bundle(&robot, &raw)?;
        debug!("Validated bundle for robot {} from {}", robot, path.display());
        Ok((robot, entry))
    }

    /// Validate a raw bundle on behalf of `robot`
    pub fn validate_bundle(robot: &str, raw: &Value) -> Result<ConfigEntry> {
        ConfigSchema::validate(raw).map_err(|source| Error::InvalidBundle {
            robot: robot.to_string(),
            source,
        })
    }

    /// Add a validated entry; identities are unique
    pub fn insert(&mut self, robot: impl Into<String>, entry: ConfigEntry) -> Result<()> {
        let robot = robot.into();
        if self.entries.contains_key(&robot) {
            return Err(Error::DuplicateRobot(robot));
        }
        self.entries.insert(robot, entry);
        Ok(())
    }

    pub fn get(&self, robot: &str) -> Result<&ConfigEntry> {
        self.entries
            .get(robot)
            .ok_or_else(|| Error::UnknownRobot(robot.to_string()))
    }

    /// Robot identities in sorted order
    pub fn robots(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries.iter().map(|(robot, entry)| (robot.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle_sight::Slot;
    use crate::error::ConfigErrorKind;
    use crate::schema::Tool;

    const RB12_TOML: &str = r#"
[camera_parameters]
width = 1280
height = 720
auto_exposure = true

[crop]
left = 60
right = 200
up = 20
down = 0

[mechanical_parameters]
motor_gear_ratio = 18.75
tooth_count = 15
pitch = 0.005
wheel_distance = 0.96
antenna_offset = 0.48
tool = "dual_mechanism"
"#;

    const RB14_YAML: &str = "circle_sight_positions:\n  front: \"-1\"\n  back: 2\n";

    const RB15_JSON: &str = r#"{"camera_parameters": {"width": 640, "height": 480, "auto_exposure": false, "fps": 15}}"#;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_dir_reads_all_formats() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb12.toml", RB12_TOML);
        write(dir.path(), "rb14.yaml", RB14_YAML);
        write(dir.path(), "rb15.json", RB15_JSON);
        write(dir.path(), "notes.txt", "not a bundle");

        let catalog = RobotCatalog::load_dir(dir.path()).unwrap();
        assert_eq!(catalog.robots().collect::<Vec<_>>(), vec!["rb12", "rb14", "rb15"]);

        let rb12 = catalog.get("rb12").unwrap();
        assert_eq!(rb12.mechanical().unwrap().tool, Tool::DualMechanism);
        assert_eq!(rb12.crop().unwrap().right, 200);

        let rb14 = catalog.get("rb14").unwrap();
        assert!(rb14.camera().is_none());
        assert_eq!(rb14.circle_sight().unwrap().index_for(Slot::Front), Some(-1));

        assert_eq!(catalog.get("rb15").unwrap().camera().unwrap().fps, Some(15));
    }

    #[test]
    fn test_invalid_bundle_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb12.toml", RB12_TOML);
        write(dir.path(), "rb13.toml", &RB12_TOML.replace("dual_mechanism", "laser"));

        match RobotCatalog::load_dir(dir.path()) {
            Err(Error::InvalidBundle { robot, source }) => {
                assert_eq!(robot, "rb13");
                assert_eq!(source.kind, ConfigErrorKind::UnknownEnumValue);
                assert_eq!(source.path, "mechanical_parameters.tool");
            }
            other => panic!("Expected InvalidBundle, got {:?}", other),
        }
    }

    #[test]
    fn test_same_robot_in_two_formats() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb15.json", RB15_JSON);
        write(dir.path(), "rb15.yml", RB14_YAML);
        assert!(matches!(
            RobotCatalog::load_dir(dir.path()),
            Err(Error::DuplicateRobot(robot)) if robot == "rb15"
        ));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb16.json", "{ not json");
        assert!(matches!(RobotCatalog::load_dir(dir.path()), Err(Error::Parse(_))));
    }

    #[test]
    fn test_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        assert!(matches!(RobotCatalog::load_dir(missing), Err(Error::Io(_))));
    }

    #[test]
    fn test_load_robot_ignores_other_bundles() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb12.toml", RB12_TOML);
        write(dir.path(), "rb13.toml", &RB12_TOML.replace("dual_mechanism", "laser"));

        let entry = RobotCatalog::load_robot(dir.path(), "rb12").unwrap();
        assert_eq!(entry.mechanical().unwrap().tool, Tool::DualMechanism);
        assert!(matches!(
            RobotCatalog::load_robot(dir.path(), "rb13"),
            Err(Error::InvalidBundle { .. })
        ));
        assert!(matches!(
            RobotCatalog::load_robot(dir.path(), "rb14"),
            Err(Error::UnknownRobot(_))
        ));
    }

    #[test]
    fn test_unknown_robot() {
        let catalog = RobotCatalog::new();
        assert!(catalog.is_empty());
        assert!(matches!(catalog.get("rb99"), Err(Error::UnknownRobot(r)) if r == "rb99"));
    }

    #[test]
    fn test_load_file_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "rb12.ini", "width=1");
        assert!(matches!(
            RobotCatalog::load_file(dir.path().join("rb12.ini")),
            Err(Error::Parse(_))
        ));
    }
}
