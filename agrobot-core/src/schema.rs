//! Robot configuration schema
//!
//! A bundle is a mapping of named sections to field mappings:
//!
//! ```text
//! camera_parameters        width, height, auto_exposure, [fps]
//! crop                     left, right, up, down          (needs camera_parameters)
//! circle_sight_positions   front, back, left, right       (any subset)
//! mechanical_parameters    motor_gear_ratio, tooth_count, pitch, wheel_distance,
//!                          antenna_offset, tool, [work_x, work_y, drill_radius,
//!                          chop_radius, teltonika]
//! ```
//!
//! Every section may be absent; a robot without a camera is valid.
//! [`ConfigSchema::validate`] is the only way to obtain a [`ConfigEntry`].

use crate::circle_sight::{CircleSightResolver, SlotIndexTable};
use crate::crop::{Crop, CropRegion};
use crate::error::{ConfigError, ConfigErrorKind};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

pub const CAMERA_PARAMETERS: &str = "camera_parameters";
pub const CROP: &str = "crop";
pub const CIRCLE_SIGHT_POSITIONS: &str = CircleSightResolver::SECTION;
pub const MECHANICAL_PARAMETERS: &str = "mechanical_parameters";

const SECTIONS: [&str; 4] = [
    CAMERA_PARAMETERS,
    CROP,
    CIRCLE_SIGHT_POSITIONS,
    MECHANICAL_PARAMETERS,
];

const CAMERA_REQUIRED: [&str; 3] = ["width", "height", "auto_exposure"];
const CAMERA_OPTIONAL: [&str; 1] = ["fps"];
const CROP_REQUIRED: [&str; 4] = ["left", "right", "up", "down"];
const MECHANICAL_REQUIRED: [&str; 6] = [
    "motor_gear_ratio",
    "tooth_count",
    "pitch",
    "wheel_distance",
    "antenna_offset",
    "tool",
];
const MECHANICAL_OPTIONAL: [&str; 5] = ["work_x", "work_y", "drill_radius", "chop_radius", "teltonika"];

/// Implement mounted on the robot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    None,
    WeedScrew,
    DualMechanism,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::None, Tool::WeedScrew, Tool::DualMechanism];

    pub const NAMES: [&'static str; 3] = ["none", "weed_screw", "dual_mechanism"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::None => "none",
            Tool::WeedScrew => "weed_screw",
            Tool::DualMechanism => "dual_mechanism",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CameraParameters {
    pub width: u32,
    pub height: u32,
    pub auto_exposure: bool,
    /// Frame rate; `None` leaves it to the camera driver
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fps: Option<u32>,
}

/// Drive and tool geometry. Lengths are in meters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MechanicalParameters {
    pub motor_gear_ratio: f64,
    pub tooth_count: u32,
    pub pitch: f64,
    pub wheel_distance: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub work_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub drill_radius: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chop_radius: Option<f64>,
    pub antenna_offset: f64,
    pub tool: Tool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teltonika: Option<bool>,
}

/// Validated configuration of one robot
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ConfigEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    camera_parameters: Option<CameraParameters>,
    #[serde(skip_serializing_if = "Option::is_none")]
    crop: Option<Crop>,
    #[serde(skip_serializing_if = "Option::is_none")]
    circle_sight_positions: Option<SlotIndexTable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mechanical_parameters: Option<MechanicalParameters>,
}

impl ConfigEntry {
    pub fn camera(&self) -> Option<&CameraParameters> {
        self.camera_parameters.as_ref()
    }

    pub fn crop(&self) -> Option<&Crop> {
        self.crop.as_ref()
    }

    pub fn circle_sight(&self) -> Option<&SlotIndexTable> {
        self.circle_sight_positions.as_ref()
    }

    pub fn mechanical(&self) -> Option<&MechanicalParameters> {
        self.mechanical_parameters.as_ref()
    }

    /// Frame region kept after cropping. The full frame when no crop is set.
    pub fn crop_region(&self) -> Option<CropRegion> {
        let camera = self.camera_parameters.as_ref()?;
        self.crop
            .unwrap_or_default()
            .region(camera.width, camera.height)
    }

    /// Raw mapping form; [`ConfigSchema::validate`] accepts it and returns an equal entry
    pub fn to_raw(&self) -> Value {
        let mut root = Map::new();

        if let Some(camera) = &self.camera_parameters {
            let mut fields = Map::new();
            fields.insert("width".into(), camera.width.into());
            fields.insert("height".into(), camera.height.into());
            fields.insert("auto_exposure".into(), camera.auto_exposure.into());
            if let Some(fps) = camera.fps {
                fields.insert("fps".into(), fps.into());
            }
            root.insert(CAMERA_PARAMETERS.into(), Value::Object(fields));
        }

        if let Some(crop) = &self.crop {
            let mut fields = Map::new();
            fields.insert("left".into(), crop.left.into());
            fields.insert("right".into(), crop.right.into());
            fields.insert("up".into(), crop.up.into());
            fields.insert("down".into(), crop.down.into());
            root.insert(CROP.into(), Value::Object(fields));
        }

        if let Some(table) = &self.circle_sight_positions {
            root.insert(CIRCLE_SIGHT_POSITIONS.into(), table.to_raw());
        }

        if let Some(mech) = &self.mechanical_parameters {
            let mut fields = Map::new();
            fields.insert("motor_gear_ratio".into(), mech.motor_gear_ratio.into());
            fields.insert("tooth_count".into(), mech.tooth_count.into());
            fields.insert("pitch".into(), mech.pitch.into());
            fields.insert("wheel_distance".into(), mech.wheel_distance.into());
            let optional = [
                ("work_x", mech.work_x),
                ("work_y", mech.work_y),
                ("drill_radius", mech.drill_radius),
                ("chop_radius", mech.chop_radius),
            ];
            for (key, value) in optional {
                if let Some(value) = value {
                    fields.insert(key.into(), value.into());
                }
            }
            fields.insert("antenna_offset".into(), mech.antenna_offset.into());
            fields.insert("tool".into(), mech.tool.as_str().into());
            if let Some(teltonika) = mech.teltonika {
                fields.insert("teltonika".into(), teltonika.into());
            }
            root.insert(MECHANICAL_PARAMETERS.into(), Value::Object(fields));
        }

        Value::Object(root)
    }
}

/// Validation entry point for raw configuration bundles
pub struct ConfigSchema;

impl ConfigSchema {
    /// Validate a raw bundle.
    ///
    /// Checks run in four passes across all sections: required keys, field
    /// types (circle-sight values included), enum names (tool and slot names),
    /// then range, cross-field and uniqueness invariants. The first failure is
    /// returned with the path of the offending field.
    pub fn validate(raw: &Value) -> Result<ConfigEntry, ConfigError> {
        let root = raw.as_object().ok_or_else(|| {
            ConfigError::type_mismatch("$", format!("expected a mapping of sections, got {}", kind_of(raw)))
        })?;

        for key in root.keys() {
            if !SECTIONS.contains(&key.as_str()) {
                warn!("Ignoring unknown configuration section `{}`", key);
            }
        }

        let camera = Section::from_root(root, CAMERA_PARAMETERS)?;
        let crop = Section::from_root(root, CROP)?;
        let mechanical = Section::from_root(root, MECHANICAL_PARAMETERS)?;

        // Required keys
        if let Some(section) = &camera {
            section.require_keys(&CAMERA_REQUIRED)?;
            section.warn_unknown(&[&CAMERA_REQUIRED[..], &CAMERA_OPTIONAL[..]]);
        }
        if let Some(section) = &crop {
            if camera.is_none() {
                return Err(ConfigError::new(
                    ConfigErrorKind::MissingField,
                    CAMERA_PARAMETERS,
                    "camera parameters are required when a crop is configured",
                ));
            }
            section.require_keys(&CROP_REQUIRED)?;
            section.warn_unknown(&[&CROP_REQUIRED[..]]);
        }
        if let Some(section) = &mechanical {
            section.require_keys(&MECHANICAL_REQUIRED)?;
            section.warn_unknown(&[&MECHANICAL_REQUIRED[..], &MECHANICAL_OPTIONAL[..]]);
        }

        // Types
        let camera_parameters = camera.as_ref().map(Self::camera).transpose()?;
        let crop = crop.as_ref().map(Self::crop).transpose()?;
        let mechanical = mechanical.as_ref().map(Self::mechanical).transpose()?;
        let circle_sight = match root.get(CIRCLE_SIGHT_POSITIONS) {
            None | Some(Value::Null) => None,
            Some(raw) => Some(CircleSightResolver::read_indices(raw)?),
        };

        // Enums
        let mechanical_parameters = mechanical.map(MechanicalDraft::resolve_tool).transpose()?;
        let circle_sight_positions = circle_sight.map(CircleSightResolver::assign_slots).transpose()?;

        // Invariants
        if let Some(camera) = &camera_parameters {
            Self::check_camera(camera)?;
            if let Some(crop) = &crop {
                Self::check_crop(crop, camera)?;
            }
        }
        if let Some(mech) = &mechanical_parameters {
            Self::check_mechanical(mech)?;
        }
        if let Some(table) = &circle_sight_positions {
            CircleSightResolver::check_unique(table)?;
        }

        let entry = ConfigEntry {
            camera_parameters,
            crop,
            circle_sight_positions,
            mechanical_parameters,
        };
        debug!(
            camera = entry.camera_parameters.is_some(),
            circle_sight_slots = entry.circle_sight_positions.as_ref().map_or(0, |t| t.len()),
            tool = ?entry.mechanical_parameters.as_ref().map(|m| m.tool.as_str()),
            "Configuration bundle validated"
        );
        Ok(entry)
    }

    fn camera(section: &Section<'_>) -> Result<CameraParameters, ConfigError> {
        Ok(CameraParameters {
            width: section.req_u32("width")?,
            height: section.req_u32("height")?,
            auto_exposure: section.req_bool("auto_exposure")?,
            fps: section.u32("fps")?,
        })
    }

    fn crop(section: &Section<'_>) -> Result<Crop, ConfigError> {
        Ok(Crop {
            left: section.req_u32("left")?,
            right: section.req_u32("right")?,
            up: section.req_u32("up")?,
            down: section.req_u32("down")?,
        })
    }

    fn mechanical<'a>(section: &Section<'a>) -> Result<MechanicalDraft<'a>, ConfigError> {
        let params = MechanicalParameters {
            motor_gear_ratio: section.req_f64("motor_gear_ratio")?,
            tooth_count: section.req_u32("tooth_count")?,
            pitch: section.req_f64("pitch")?,
            wheel_distance: section.req_f64("wheel_distance")?,
            work_x: section.f64("work_x")?,
            work_y: section.f64("work_y")?,
            drill_radius: section.f64("drill_radius")?,
            chop_radius: section.f64("chop_radius")?,
            antenna_offset: section.req_f64("antenna_offset")?,
            tool: Tool::None,
            teltonika: section.bool("teltonika")?,
        };
        Ok(MechanicalDraft {
            params,
            tool_name: section.req_str("tool")?,
            tool_path: section.path("tool"),
        })
    }

    fn check_camera(camera: &CameraParameters) -> Result<(), ConfigError> {
        let fields = [("width", Some(camera.width)), ("height", Some(camera.height)), ("fps", camera.fps)];
        for (key, value) in fields {
            if value == Some(0) {
                return Err(ConfigError::invariant(
                    format!("{}.{}", CAMERA_PARAMETERS, key),
                    "must be greater than zero",
                ));
            }
        }
        Ok(())
    }

    fn check_crop(crop: &Crop, camera: &CameraParameters) -> Result<(), ConfigError> {
        if crop.horizontal() >= camera.width as u64 {
            return Err(ConfigError::invariant(
                CROP,
                format!(
                    "left + right ({}) must be less than {}.width ({})",
                    crop.horizontal(),
                    CAMERA_PARAMETERS,
                    camera.width
                ),
            ));
        }
        if crop.vertical() >= camera.height as u64 {
            return Err(ConfigError::invariant(
                CROP,
                format!(
                    "up + down ({}) must be less than {}.height ({})",
                    crop.vertical(),
                    CAMERA_PARAMETERS,
                    camera.height
                ),
            ));
        }
        Ok(())
    }

    fn check_mechanical(mech: &MechanicalParameters) -> Result<(), ConfigError> {
        let path = |key: &str| format!("{}.{}", MECHANICAL_PARAMETERS, key);

        let positive = [
            ("motor_gear_ratio", mech.motor_gear_ratio),
            ("pitch", mech.pitch),
            ("wheel_distance", mech.wheel_distance),
        ];
        for (key, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::invariant(path(key), format!("must be a positive length or ratio, got {}", value)));
            }
        }
        if mech.tooth_count == 0 {
            return Err(ConfigError::invariant(path("tooth_count"), "must be greater than zero"));
        }

        let radii = [("drill_radius", mech.drill_radius), ("chop_radius", mech.chop_radius)];
        for (key, value) in radii {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::invariant(path(key), format!("must be a non-negative radius, got {}", value)));
                }
            }
        }

        let offsets = [("work_x", mech.work_x), ("work_y", mech.work_y), ("antenna_offset", Some(mech.antenna_offset))];
        for (key, value) in offsets {
            if let Some(value) = value {
                if !value.is_finite() {
                    return Err(ConfigError::invariant(path(key), "must be finite"));
                }
            }
        }
        Ok(())
    }
}

/// Mechanical section with typed fields whose tool name is not resolved yet.
/// `params.tool` is a placeholder until [`MechanicalDraft::resolve_tool`].
struct MechanicalDraft<'a> {
    params: MechanicalParameters,
    tool_name: &'a str,
    tool_path: String,
}

impl MechanicalDraft<'_> {
    fn resolve_tool(self) -> Result<MechanicalParameters, ConfigError> {
        let tool = Tool::from_name(self.tool_name).ok_or_else(|| {
            ConfigError::unknown_value(self.tool_path.as_str(), self.tool_name, &Tool::NAMES)
        })?;
        Ok(MechanicalParameters { tool, ..self.params })
    }
}

/// Typed view over one section of a raw bundle
struct Section<'a> {
    name: &'static str,
    fields: &'a Map<String, Value>,
}

impl<'a> Section<'a> {
    fn from_root(root: &'a Map<String, Value>, name: &'static str) -> Result<Option<Self>, ConfigError> {
        match root.get(name) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Object(fields)) => Ok(Some(Self { name, fields })),
            Some(other) => Err(ConfigError::type_mismatch(
                name,
                format!("expected a mapping, got {}", kind_of(other)),
            )),
        }
    }

    fn path(&self, key: &str) -> String {
        format!("{}.{}", self.name, key)
    }

    fn get(&self, key: &str) -> Option<&'a Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => None,
            Some(value) => Some(value),
        }
    }

    fn require_keys(&self, keys: &[&str]) -> Result<(), ConfigError> {
        match keys.iter().find(|key| self.get(key).is_none()) {
            Some(key) => Err(ConfigError::missing(self.path(key))),
            None => Ok(()),
        }
    }

    fn warn_unknown(&self, known: &[&[&str]]) {
        for key in self.fields.keys() {
            if !known.iter().any(|group| group.contains(&key.as_str())) {
                warn!("Ignoring unknown field `{}`", self.path(key));
            }
        }
    }

    fn mismatch(&self, key: &str, expected: &str, value: &Value) -> ConfigError {
        ConfigError::type_mismatch(self.path(key), format!("expected {}, got {}", expected, kind_of(value)))
    }

    fn u32(&self, key: &str) -> Result<Option<u32>, ConfigError> {
        self.get(key)
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| self.mismatch(key, "a non-negative integer", value))
            })
            .transpose()
    }

    fn f64(&self, key: &str) -> Result<Option<f64>, ConfigError> {
        self.get(key)
            .map(|value| value.as_f64().ok_or_else(|| self.mismatch(key, "a number", value)))
            .transpose()
    }

    fn bool(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        self.get(key)
            .map(|value| value.as_bool().ok_or_else(|| self.mismatch(key, "a boolean", value)))
            .transpose()
    }

    fn str(&self, key: &str) -> Result<Option<&'a str>, ConfigError> {
        self.get(key)
            .map(|value| value.as_str().ok_or_else(|| self.mismatch(key, "a string", value)))
            .transpose()
    }

    fn req_u32(&self, key: &str) -> Result<u32, ConfigError> {
        self.u32(key)?.ok_or_else(|| ConfigError::missing(self.path(key)))
    }

    fn req_f64(&self, key: &str) -> Result<f64, ConfigError> {
        self.f64(key)?.ok_or_else(|| ConfigError::missing(self.path(key)))
    }

    fn req_bool(&self, key: &str) -> Result<bool, ConfigError> {
        self.bool(key)?.ok_or_else(|| ConfigError::missing(self.path(key)))
    }

    fn req_str(&self, key: &str) -> Result<&'a str, ConfigError> {
        self.str(key)?.ok_or_else(|| ConfigError::missing(self.path(key)))
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(n) if n.is_f64() => "a fractional number",
        Value::Number(n) if n.is_i64() && n.as_i64().map_or(false, |v| v < 0) => "a negative integer",
        Value::Number(_) => "an integer",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::circle_sight::Slot;
    use serde_json::json;

    fn full_bundle() -> Value {
        json!({
            "camera_parameters": {"width": 1280, "height": 720, "auto_exposure": true, "fps": 30},
            "crop": {"left": 60, "right": 200, "up": 20, "down": 0},
            "circle_sight_positions": {"front": "0", "back": -1, "left": 2, "right": "3"},
            "mechanical_parameters": {
                "motor_gear_ratio": 18.75,
                "tooth_count": 15,
                "pitch": 0.005,
                "wheel_distance": 0.96,
                "work_x": 0.36,
                "work_y": 0.0,
                "drill_radius": 0.025,
                "antenna_offset": 0.48,
                "tool": "weed_screw",
                "teltonika": false
            }
        })
    }

    #[test]
    fn test_full_bundle_validates() {
        let entry = ConfigSchema::validate(&full_bundle()).unwrap();
        let camera = entry.camera().unwrap();
        assert_eq!((camera.width, camera.height, camera.fps), (1280, 720, Some(30)));
        assert!(camera.auto_exposure);
        assert_eq!(entry.crop(), Some(&Crop { left: 60, right: 200, up: 20, down: 0 }));
        let table = entry.circle_sight().unwrap();
        assert_eq!(table.index_for(Slot::Back), Some(-1));
        assert_eq!(table.index_for(Slot::Right), Some(3));
        let mech = entry.mechanical().unwrap();
        assert_eq!(mech.tool, Tool::WeedScrew);
        assert_eq!(mech.chop_radius, None);
        assert_eq!(mech.teltonika, Some(false));
    }

    #[test]
    fn test_empty_bundle_is_a_robot_without_camera() {
        let entry = ConfigSchema::validate(&json!({})).unwrap();
        assert_eq!(entry, ConfigEntry::default());
        assert!(entry.crop_region().is_none());
    }

    #[test]
    fn test_null_section_counts_as_absent() {
        let entry = ConfigSchema::validate(&json!({"camera_parameters": null})).unwrap();
        assert!(entry.camera().is_none());
    }

    #[test]
    fn test_root_must_be_mapping() {
        let err = ConfigSchema::validate(&json!("robot")).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "$");
    }

    #[test]
    fn test_missing_required_field() {
        let mut raw = full_bundle();
        raw["camera_parameters"].as_object_mut().unwrap().remove("height");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::MissingField);
        assert_eq!(err.path, "camera_parameters.height");
    }

    #[test]
    fn test_missing_field_reported_before_type_errors() {
        let mut raw = full_bundle();
        raw["camera_parameters"]["width"] = json!("wide");
        raw["mechanical_parameters"].as_object_mut().unwrap().remove("pitch");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::MissingField);
        assert_eq!(err.path, "mechanical_parameters.pitch");
    }

    #[test]
    fn test_crop_requires_camera() {
        let raw = json!({"crop": {"left": 0, "right": 0, "up": 0, "down": 0}});
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::MissingField);
        assert_eq!(err.path, "camera_parameters");
    }

    #[test]
    fn test_numeric_strings_only_for_circle_sight() {
        let mut raw = full_bundle();
        raw["camera_parameters"]["width"] = json!("1280");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "camera_parameters.width");
    }

    #[test]
    fn test_negative_crop_is_type_mismatch() {
        let mut raw = full_bundle();
        raw["crop"]["down"] = json!(-5);
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "crop.down");
        assert!(err.message.contains("negative"));
    }

    #[test]
    fn test_section_must_be_mapping() {
        let raw = json!({"mechanical_parameters": [1, 2, 3]});
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "mechanical_parameters");
    }

    #[test]
    fn test_unknown_tool() {
        let mut raw = full_bundle();
        raw["mechanical_parameters"]["tool"] = json!("unknown_tool");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::UnknownEnumValue);
        assert_eq!(err.path, "mechanical_parameters.tool");
    }

    #[test]
    fn test_tool_type_checked_before_enum() {
        let mut raw = full_bundle();
        raw["mechanical_parameters"]["tool"] = json!(3);
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "mechanical_parameters.tool");
    }

    #[test]
    fn test_types_of_all_sections_checked_before_enums() {
        let mut raw = full_bundle();
        raw["circle_sight_positions"]["front"] = json!("cam0");
        raw["mechanical_parameters"]["tool"] = json!("laser");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "circle_sight_positions.front");
    }

    #[test]
    fn test_mechanical_types_checked_before_slot_names() {
        let mut raw = full_bundle();
        raw["circle_sight_positions"]["top"] = json!(7);
        raw["mechanical_parameters"]["pitch"] = json!("fine");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::TypeMismatch);
        assert_eq!(err.path, "mechanical_parameters.pitch");
    }

    #[test]
    fn test_enums_checked_before_invariants() {
        let mut raw = full_bundle();
        raw["crop"]["left"] = json!(5000);
        raw["circle_sight_positions"]["right"] = json!(2);
        raw["mechanical_parameters"]["tool"] = json!("laser");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::UnknownEnumValue);
        assert_eq!(err.path, "mechanical_parameters.tool");
    }

    #[test]
    fn test_opposite_sign_indices_validate() {
        let mut raw = full_bundle();
        raw["circle_sight_positions"] = json!({"front": 1, "back": "-1"});
        let entry = ConfigSchema::validate(&raw).unwrap();
        let table = entry.circle_sight().unwrap();
        assert_eq!(table.index_for(Slot::Front), Some(1));
        assert_eq!(table.index_for(Slot::Back), Some(-1));
    }

    #[test]
    fn test_every_tool_name_accepted() {
        for tool in Tool::ALL {
            let mut raw = full_bundle();
            raw["mechanical_parameters"]["tool"] = json!(tool.as_str());
            let entry = ConfigSchema::validate(&raw).unwrap();
            assert_eq!(entry.mechanical().unwrap().tool, tool);
        }
    }

    #[test]
    fn test_crop_within_frame() {
        let raw = json!({
            "camera_parameters": {"width": 1280, "height": 720, "auto_exposure": false},
            "crop": {"left": 60, "right": 200, "up": 20, "down": 0}
        });
        let entry = ConfigSchema::validate(&raw).unwrap();
        let region = entry.crop_region().unwrap();
        assert_eq!((region.width, region.height), (1020, 700));
    }

    #[test]
    fn test_crop_wider_than_frame() {
        let raw = json!({
            "camera_parameters": {"width": 1280, "height": 720, "auto_exposure": false},
            "crop": {"left": 700, "right": 700, "up": 0, "down": 0}
        });
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
        assert_eq!(err.path, "crop");
        assert!(err.message.contains("1400"));
    }

    #[test]
    fn test_crop_exactly_frame_height() {
        let raw = json!({
            "camera_parameters": {"width": 1280, "height": 720, "auto_exposure": false},
            "crop": {"left": 0, "right": 0, "up": 700, "down": 20}
        });
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
    }

    #[test]
    fn test_zero_width_rejected() {
        let raw = json!({"camera_parameters": {"width": 0, "height": 720, "auto_exposure": false}});
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
        assert_eq!(err.path, "camera_parameters.width");
    }

    #[test]
    fn test_non_positive_pitch_rejected() {
        let mut raw = full_bundle();
        raw["mechanical_parameters"]["pitch"] = json!(0.0);
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
        assert_eq!(err.path, "mechanical_parameters.pitch");
    }

    #[test]
    fn test_negative_radius_rejected() {
        let mut raw = full_bundle();
        raw["mechanical_parameters"]["chop_radius"] = json!(-0.1);
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
        assert_eq!(err.path, "mechanical_parameters.chop_radius");
    }

    #[test]
    fn test_integer_lengths_accepted() {
        let mut raw = full_bundle();
        raw["mechanical_parameters"]["wheel_distance"] = json!(1);
        let entry = ConfigSchema::validate(&raw).unwrap();
        assert_eq!(entry.mechanical().unwrap().wheel_distance, 1.0);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let mut raw = full_bundle();
        raw["robot_brain"] = json!({"serial": "/dev/ttyACM0"});
        raw["camera_parameters"]["exposure_time"] = json!(12);
        assert!(ConfigSchema::validate(&raw).is_ok());
    }

    #[test]
    fn test_duplicate_circle_sight_index() {
        let mut raw = full_bundle();
        raw["circle_sight_positions"]["right"] = json!("2");
        let err = ConfigSchema::validate(&raw).unwrap_err();
        assert_eq!(err.kind, ConfigErrorKind::InvariantViolation);
        assert_eq!(err.path, "circle_sight_positions.right");
    }

    #[test]
    fn test_validate_is_idempotent() {
        let entry = ConfigSchema::validate(&full_bundle()).unwrap();
        let again = ConfigSchema::validate(&entry.to_raw()).unwrap();
        assert_eq!(entry, again);
    }

    #[test]
    fn test_serialized_entry_matches_raw_form() {
        let entry = ConfigSchema::validate(&full_bundle()).unwrap();
        assert_eq!(serde_json::to_value(&entry).unwrap(), entry.to_raw());
    }
}
