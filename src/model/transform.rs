//! Placement, orientation and orbital motion of a primitive

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{Anchor, Axis, Billboard, Facing, NamedEnum, Waveform};
use super::{FieldAccess, Rebuild, Vec3, non_negative};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32, from_vec3};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TransformConfig {
    pub anchor: Anchor,
    pub offset: Vec3,
    pub rotation: Vec3,
    pub scale: f32,
    pub scale_xyz: Vec3,
    pub facing: Facing,
    pub billboard: Billboard,
    pub inherit_rotation: bool,
    pub orbit: OrbitConfig,
    pub orbit3d: Orbit3dConfig,
}

impl Default for TransformConfig {
    fn default() -> Self {
        Self {
            anchor: Anchor::Center,
            offset: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: 1.0,
            scale_xyz: Vec3::ONE,
            facing: Facing::Fixed,
            billboard: Billboard::None,
            inherit_rotation: true,
            orbit: OrbitConfig::NONE,
            orbit3d: Orbit3dConfig::NONE,
        }
    }
}

impl Rebuild for TransformConfig {
    fn normalized(mut self) -> Self {
        self.scale = non_negative(self.scale);
        self
    }
}

pub static TRANSFORM_SCHEMA: Schema = Schema::new(
    "TransformConfig",
    &[
        FieldDef::new("anchor", FieldKind::Enum(Anchor::NAMES)),
        FieldDef::new("offset", FieldKind::Vec3),
        FieldDef::new("rotation", FieldKind::Vec3),
        FieldDef::new("scale", FieldKind::Float),
        FieldDef::new("scaleXyz", FieldKind::Vec3),
        FieldDef::new("facing", FieldKind::Enum(Facing::NAMES)),
        FieldDef::new("billboard", FieldKind::Enum(Billboard::NAMES)),
        FieldDef::new("inheritRotation", FieldKind::Bool),
        FieldDef::new("orbit", FieldKind::Nested(&ORBIT_SCHEMA)),
        FieldDef::new("orbit3d", FieldKind::Nested(&ORBIT3D_SCHEMA)),
    ],
);

impl FieldAccess for TransformConfig {
    fn schema() -> &'static Schema {
        &TRANSFORM_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "anchor" => Value::from(self.anchor.name()),
            "offset" => from_vec3(self.offset),
            "rotation" => from_vec3(self.rotation),
            "scale" => from_f32(self.scale),
            "scaleXyz" => from_vec3(self.scale_xyz),
            "facing" => Value::from(self.facing.name()),
            "billboard" => Value::from(self.billboard.name()),
            "inheritRotation" => Value::from(self.inherit_rotation),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "anchor" => self.anchor = value::enumeration(v),
            "offset" => self.offset = value::vec3(v),
            "rotation" => self.rotation = value::vec3(v),
            "scale" => self.scale = value::float(v),
            "scaleXyz" => self.scale_xyz = value::vec3(v),
            "facing" => self.facing = value::enumeration(v),
            "billboard" => self.billboard = value::enumeration(v),
            "inheritRotation" => self.inherit_rotation = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Circular orbit
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrbitConfig {
    pub enabled: bool,
    pub radius: f32,
    pub speed: f32,
    pub axis: Axis,
    pub phase: f32,
}

impl OrbitConfig {
    /// Disabled orbit
    pub const NONE: OrbitConfig = OrbitConfig {
        enabled: false,
        radius: 0.0,
        speed: 0.0,
        axis: Axis::Y,
        phase: 0.0,
    };

    pub fn is_active(&self) -> bool {
        self.enabled && self.radius > 0.0
    }
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for OrbitConfig {
    fn normalized(mut self) -> Self {
        self.radius = non_negative(self.radius);
        self
    }
}

pub static ORBIT_SCHEMA: Schema = Schema::new(
    "OrbitConfig",
    &[
        FieldDef::new("enabled", FieldKind::Bool),
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("axis", FieldKind::Enum(Axis::NAMES)),
        FieldDef::new("phase", FieldKind::Float),
    ],
);

impl FieldAccess for OrbitConfig {
    fn schema() -> &'static Schema {
        &ORBIT_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "enabled" => Value::from(self.enabled),
            "radius" => from_f32(self.radius),
            "speed" => from_f32(self.speed),
            "axis" => Value::from(self.axis.name()),
            "phase" => from_f32(self.phase),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "enabled" => self.enabled = value::boolean(v),
            "radius" => self.radius = value::float(v),
            "speed" => self.speed = value::float(v),
            "axis" => self.axis = value::enumeration(v),
            "phase" => self.phase = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Per-axis oscillating orbit
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AxisMotion {
    pub amplitude: f32,
    pub frequency: f32,
    pub phase: f32,
    pub waveform: Waveform,
}

impl AxisMotion {
    pub const NONE: AxisMotion = AxisMotion {
        amplitude: 0.0,
        frequency: 1.0,
        phase: 0.0,
        waveform: Waveform::Sine,
    };
}

impl Default for AxisMotion {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for AxisMotion {
    fn normalized(mut self) -> Self {
        self.frequency = non_negative(self.frequency);
        self
    }
}

pub static AXIS_MOTION_SCHEMA: Schema = Schema::new(
    "AxisMotion",
    &[
        FieldDef::new("amplitude", FieldKind::Float),
        FieldDef::new("frequency", FieldKind::Float),
        FieldDef::new("phase", FieldKind::Float),
        FieldDef::new("waveform", FieldKind::Enum(Waveform::NAMES)),
    ],
);

impl FieldAccess for AxisMotion {
    fn schema() -> &'static Schema {
        &AXIS_MOTION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "amplitude" => from_f32(self.amplitude),
            "frequency" => from_f32(self.frequency),
            "phase" => from_f32(self.phase),
            "waveform" => Value::from(self.waveform.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "amplitude" => self.amplitude = value::float(v),
            "frequency" => self.frequency = value::float(v),
            "phase" => self.phase = value::float(v),
            "waveform" => self.waveform = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Orbit3dConfig {
    pub enabled: bool,
    pub x: AxisMotion,
    pub y: AxisMotion,
    pub z: AxisMotion,
}

impl Orbit3dConfig {
    pub const NONE: Orbit3dConfig = Orbit3dConfig {
        enabled: false,
        x: AxisMotion::NONE,
        y: AxisMotion::NONE,
        z: AxisMotion::NONE,
    };

    pub fn axis(&self, name: &str) -> Option<&AxisMotion> {
        match name {
            "x" => Some(&self.x),
            "y" => Some(&self.y),
            "z" => Some(&self.z),
            _ => None,
        }
    }

    pub fn axis_mut(&mut self, name: &str) -> Option<&mut AxisMotion> {
        match name {
            "x" => Some(&mut self.x),
            "y" => Some(&mut self.y),
            "z" => Some(&mut self.z),
            _ => None,
        }
    }
}

impl Default for Orbit3dConfig {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for Orbit3dConfig {
    fn normalized(mut self) -> Self {
        self.x = self.x.normalized();
        self.y = self.y.normalized();
        self.z = self.z.normalized();
        self
    }
}

pub static ORBIT3D_SCHEMA: Schema = Schema::new(
    "Orbit3dConfig",
    &[
        FieldDef::new("enabled", FieldKind::Bool),
        FieldDef::new("x", FieldKind::Nested(&AXIS_MOTION_SCHEMA)),
        FieldDef::new("y", FieldKind::Nested(&AXIS_MOTION_SCHEMA)),
        FieldDef::new("z", FieldKind::Nested(&AXIS_MOTION_SCHEMA)),
    ],
);

impl FieldAccess for Orbit3dConfig {
    fn schema() -> &'static Schema {
        &ORBIT3D_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "enabled" => Some(Value::from(self.enabled)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "enabled" => self.enabled = value::boolean(v),
            _ => return false,
        }
        true
    }
}
