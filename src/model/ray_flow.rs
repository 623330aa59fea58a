//! Ray flow effects and primitive linking

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{FlickerMode, NamedEnum, TravelMode};
use super::{FieldAccess, Rebuild, clamp_unit, non_negative};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32};

// ==============================================================================
// Ray flow
// ==============================================================================

/// Energy travel and flicker along the rays of a ray-type shape.
///
/// `travel_enabled` and `flicker_enabled` follow their mode fields: setting a
/// mode to NONE turns the flag off, any other mode turns it on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RayFlowConfig {
    pub travel: TravelMode,
    pub travel_enabled: bool,
    pub travel_speed: f32,
    pub chase_count: i32,
    pub chase_width: f32,
    pub flicker: FlickerMode,
    pub flicker_enabled: bool,
    pub flicker_intensity: f32,
    pub flicker_frequency: f32,
    pub length_progress: f32,
}

impl Default for RayFlowConfig {
    fn default() -> Self {
        Self {
            travel: TravelMode::None,
            travel_enabled: false,
            travel_speed: 1.0,
            chase_count: 1,
            chase_width: 0.3,
            flicker: FlickerMode::None,
            flicker_enabled: false,
            flicker_intensity: 0.5,
            flicker_frequency: 4.0,
            length_progress: 1.0,
        }
    }
}

impl Rebuild for RayFlowConfig {
    fn normalized(mut self) -> Self {
        self.chase_count = self.chase_count.max(1);
        self.chase_width = clamp_unit(self.chase_width);
        self.flicker_intensity = clamp_unit(self.flicker_intensity);
        self.flicker_frequency = non_negative(self.flicker_frequency);
        self.length_progress = clamp_unit(self.length_progress);
        self
    }
}

pub static RAY_FLOW_SCHEMA: Schema = Schema::new(
    "RayFlowConfig",
    &[
        FieldDef::new("travel", FieldKind::Enum(TravelMode::NAMES)),
        FieldDef::new("travelEnabled", FieldKind::Bool),
        FieldDef::new("travelSpeed", FieldKind::Float),
        FieldDef::new("chaseCount", FieldKind::Int),
        FieldDef::new("chaseWidth", FieldKind::Float),
        FieldDef::new("flicker", FieldKind::Enum(FlickerMode::NAMES)),
        FieldDef::new("flickerEnabled", FieldKind::Bool),
        FieldDef::new("flickerIntensity", FieldKind::Float),
        FieldDef::new("flickerFrequency", FieldKind::Float),
        FieldDef::new("lengthProgress", FieldKind::Float),
    ],
);

impl FieldAccess for RayFlowConfig {
    fn schema() -> &'static Schema {
        &RAY_FLOW_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "travel" => Value::from(self.travel.name()),
            "travelEnabled" => Value::from(self.travel_enabled),
            "travelSpeed" => from_f32(self.travel_speed),
            "chaseCount" => Value::from(self.chase_count),
            "chaseWidth" => from_f32(self.chase_width),
            "flicker" => Value::from(self.flicker.name()),
            "flickerEnabled" => Value::from(self.flicker_enabled),
            "flickerIntensity" => from_f32(self.flicker_intensity),
            "flickerFrequency" => from_f32(self.flicker_frequency),
            "lengthProgress" => from_f32(self.length_progress),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "travel" => {
                self.travel = value::enumeration(v);
                self.travel_enabled = self.travel != TravelMode::None;
            }
            "travelEnabled" => self.travel_enabled = value::boolean(v),
            "travelSpeed" => self.travel_speed = value::float(v),
            "chaseCount" => self.chase_count = value::int(v),
            "chaseWidth" => self.chase_width = value::float(v),
            "flicker" => {
                self.flicker = value::enumeration(v);
                self.flicker_enabled = self.flicker != FlickerMode::None;
            }
            "flickerEnabled" => self.flicker_enabled = value::boolean(v),
            "flickerIntensity" => self.flicker_intensity = value::float(v),
            "flickerFrequency" => self.flicker_frequency = value::float(v),
            "lengthProgress" => self.length_progress = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Link
// ==============================================================================

/// Ties a primitive to another primitive in the same definition.
/// An unlinked primitive has no `LinkConfig` at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LinkConfig {
    pub target: String,
    pub follow: bool,
    pub scale_with: bool,
    pub orbit_sync: bool,
    pub phase_offset: f32,
    pub radius_offset: f32,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            target: String::new(),
            follow: true,
            scale_with: false,
            orbit_sync: false,
            phase_offset: 0.0,
            radius_offset: 0.0,
        }
    }
}

impl Rebuild for LinkConfig {
    fn normalized(mut self) -> Self {
        self.target = self.target.trim().to_string();
        self
    }
}

pub static LINK_SCHEMA: Schema = Schema::new(
    "LinkConfig",
    &[
        FieldDef::new("target", FieldKind::Text),
        FieldDef::new("follow", FieldKind::Bool),
        FieldDef::new("scaleWith", FieldKind::Bool),
        FieldDef::new("orbitSync", FieldKind::Bool),
        FieldDef::new("phaseOffset", FieldKind::Float),
        FieldDef::new("radiusOffset", FieldKind::Float),
    ],
);

impl FieldAccess for LinkConfig {
    fn schema() -> &'static Schema {
        &LINK_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "target" => Value::from(self.target.as_str()),
            "follow" => Value::from(self.follow),
            "scaleWith" => Value::from(self.scale_with),
            "orbitSync" => Value::from(self.orbit_sync),
            "phaseOffset" => from_f32(self.phase_offset),
            "radiusOffset" => from_f32(self.radius_offset),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "target" => self.target = value::text(v),
            "follow" => self.follow = value::boolean(v),
            "scaleWith" => self.scale_with = value::boolean(v),
            "orbitSync" => self.orbit_sync = value::boolean(v),
            "phaseOffset" => self.phase_offset = value::float(v),
            "radiusOffset" => self.radius_offset = value::float(v),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_travel_mode_drives_enabled_flag() {
        let mut flow = RayFlowConfig::default();
        flow.set_field("travel", &json!("chase"));
        assert!(flow.travel_enabled);
        flow.set_field("travel", &json!("NONE"));
        assert!(!flow.travel_enabled);
    }

    #[test]
    fn test_unknown_travel_mode_disables() {
        let mut flow = RayFlowConfig::default();
        flow.set_field("travel", &json!("COMET"));
        flow.set_field("travel", &json!("warp-drive"));
        assert_eq!(flow.travel, TravelMode::None);
        assert!(!flow.travel_enabled);
    }

    #[test]
    fn test_flicker_mode_drives_enabled_flag() {
        let mut flow = RayFlowConfig::default();
        flow.set_field("flicker", &json!("strobe"));
        assert!(flow.flicker_enabled);
        assert_eq!(flow.field("flicker").unwrap(), json!("STROBE"));
    }

    #[test]
    fn test_link_target_trimmed() {
        let link = LinkConfig::default()
            .to_builder()
            .with(|l| l.target = "  core ".to_string())
            .build();
        assert_eq!(link.target, "core");
    }
}
