//! Circle-sight slot resolution
//!
//! A circle-sight rig has up to four cameras, one per [`Slot`]. Raw
//! configuration maps slot names to device indices that may be written either
//! as integers or as numeric strings (`"-1"`). The resolver normalizes them once
//! into a [`SlotIndexTable`]; nothing downstream ever sees the string form.
//!
//! The sign of an index encodes mounting orientation. Indices must be unique
//! across slots; `1` and `-1` are distinct indices.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Logical camera mounting position on the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Front,
    Back,
    Left,
    Right,
}

impl Slot {
    pub const ALL: [Slot; 4] = [Slot::Front, Slot::Back, Slot::Left, Slot::Right];

    pub const NAMES: [&'static str; 4] = ["front", "back", "left", "right"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Front => "front",
            Slot::Back => "back",
            Slot::Left => "left",
            Slot::Right => "right",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a signed circle-sight index marks a reversed mounting
pub fn is_flipped(index: i32) -> bool {
    index < 0
}

/// Normalized slot → device index mapping. Read-only once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SlotIndexTable {
    indices: BTreeMap<Slot, i32>,
}

impl SlotIndexTable {
    /// Signed device index for `slot`, or `None` when no camera is mounted there
    pub fn index_for(&self, slot: Slot) -> Option<i32> {
        self.indices.get(&slot).copied()
    }

    /// Populated slots in front, back, left, right order
    pub fn iter(&self) -> impl Iterator<Item = (Slot, i32)> + '_ {
        self.indices.iter().map(|(slot, index)| (*slot, *index))
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Raw mapping form, with integer values
    pub fn to_raw(&self) -> Value {
        let map: Map<String, Value> = self
            .iter()
            .map(|(slot, index)| (slot.as_str().to_string(), Value::from(index)))
            .collect();
        Value::Object(map)
    }
}

/// Builds [`SlotIndexTable`]s from raw `circle_sight_positions` sections
pub struct CircleSightResolver;

impl CircleSightResolver {
    pub const SECTION: &'static str = "circle_sight_positions";

    /// Resolve a raw section into a table.
    ///
    /// Runs the three passes below in order: value types, slot names, then
    /// index uniqueness. A `null` value leaves the slot unpopulated.
    pub fn resolve(raw: &Value) -> Result<SlotIndexTable, ConfigError> {
        let values = Self::read_indices(raw)?;
        let table = Self::assign_slots(values)?;
        Self::check_unique(&table)?;
        Ok(table)
    }

    /// Type pass: the section is a mapping and every value normalizes to an
    /// integer index or `null`. Slot names are not looked at yet.
    pub(crate) fn read_indices(raw: &Value) -> Result<Vec<(&str, Option<i32>)>, ConfigError> {
        let fields = raw.as_object().ok_or_else(|| {
            ConfigError::type_mismatch(Self::SECTION, "expected a mapping of slot names to indices")
        })?;
        let mut values = Vec::with_capacity(fields.len());
        for (name, value) in fields {
            values.push((name.as_str(), Self::normalize(name, value)?));
        }
        Ok(values)
    }

    /// Name pass: every key is one of the four slots
    pub(crate) fn assign_slots(values: Vec<(&str, Option<i32>)>) -> Result<SlotIndexTable, ConfigError> {
        let mut indices = BTreeMap::new();
        for (name, index) in values {
            let slot = Slot::from_name(name).ok_or_else(|| {
                ConfigError::unknown_value(Self::path(name), name, &Slot::NAMES)
            })?;
            if let Some(index) = index {
                indices.insert(slot, index);
            }
        }
        Ok(SlotIndexTable { indices })
    }

    /// Invariant pass: no two slots share a signed index. Reported at the
    /// later slot in front, back, left, right order.
    pub(crate) fn check_unique(table: &SlotIndexTable) -> Result<(), ConfigError> {
        let mut owners: HashMap<i32, Slot> = HashMap::new();
        for (slot, index) in table.iter() {
            if let Some(owner) = owners.insert(index, slot) {
                return Err(ConfigError::invariant(
                    Self::path(slot.as_str()),
                    format!("index {} is already assigned to slot `{}`", index, owner),
                ));
            }
        }
        Ok(())
    }

    fn normalize(name: &str, value: &Value) -> Result<Option<i32>, ConfigError> {
        let parsed = match value {
            Value::Null => return Ok(None),
            Value::Number(number) => number.as_i64().and_then(|n| i32::try_from(n).ok()),
            Value::String(text) => text.trim().parse::<i32>().ok(),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            ConfigError::type_mismatch(
                Self::path(name),
                format!("expected an integer device index, got {}", value),
            )
        })
    }

    fn path(slot: &str) -> String {
        format!("{}.{}", Self::SECTION, slot)
    }
}
