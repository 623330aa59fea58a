//! Animation slice
//!
//! Spin, pulse and alpha pulse are always present and use a NONE value when
//! inactive. Wobble, wave, color cycle and precession are optional: `None`
//! means the effect is disabled.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{Axis, NamedEnum, Waveform};
use super::{FieldAccess, Rebuild, Vec3, clamp_unit, non_negative};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32, from_vec3};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnimationConfig {
    pub spin: SpinConfig,
    pub pulse: PulseConfig,
    pub alpha_pulse: AlphaPulseConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wobble: Option<WobbleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave: Option<WaveConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_cycle: Option<ColorCycleConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precession: Option<PrecessionConfig>,
    pub phase: f32,
}

impl AnimationConfig {
    pub fn is_animated(&self) -> bool {
        self.spin.is_active()
            || self.pulse.is_active()
            || self.alpha_pulse.is_active()
            || self.wobble.is_some()
            || self.wave.is_some()
            || self.color_cycle.is_some()
            || self.precession.is_some()
    }
}

impl Rebuild for AnimationConfig {}

pub static ANIMATION_SCHEMA: Schema = Schema::new(
    "AnimationConfig",
    &[
        FieldDef::new("spin", FieldKind::Nested(&SPIN_SCHEMA)),
        FieldDef::new("pulse", FieldKind::Nested(&PULSE_SCHEMA)),
        FieldDef::new("alphaPulse", FieldKind::Nested(&ALPHA_PULSE_SCHEMA)),
        FieldDef::new("wobble", FieldKind::Optional(&WOBBLE_SCHEMA)),
        FieldDef::new("wave", FieldKind::Optional(&WAVE_SCHEMA)),
        FieldDef::new("colorCycle", FieldKind::Optional(&COLOR_CYCLE_SCHEMA)),
        FieldDef::new("precession", FieldKind::Optional(&PRECESSION_SCHEMA)),
        FieldDef::new("phase", FieldKind::Float),
    ],
);

impl FieldAccess for AnimationConfig {
    fn schema() -> &'static Schema {
        &ANIMATION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        match name {
            "phase" => Some(from_f32(self.phase)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "phase" => self.phase = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Spin
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SpinConfig {
    pub axis: Axis,
    pub speed: f32,
    pub oscillate: bool,
    pub range: f32,
}

impl SpinConfig {
    pub const NONE: SpinConfig = SpinConfig {
        axis: Axis::Y,
        speed: 0.0,
        oscillate: false,
        range: 360.0,
    };

    pub fn is_active(&self) -> bool {
        self.speed != 0.0
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for SpinConfig {
    fn normalized(mut self) -> Self {
        self.range = self.range.clamp(0.0, 360.0);
        self
    }
}

pub static SPIN_SCHEMA: Schema = Schema::new(
    "SpinConfig",
    &[
        FieldDef::new("axis", FieldKind::Enum(Axis::NAMES)),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("oscillate", FieldKind::Bool),
        FieldDef::new("range", FieldKind::Float),
    ],
);

impl FieldAccess for SpinConfig {
    fn schema() -> &'static Schema {
        &SPIN_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "axis" => Value::from(self.axis.name()),
            "speed" => from_f32(self.speed),
            "oscillate" => Value::from(self.oscillate),
            "range" => from_f32(self.range),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "axis" => self.axis = value::enumeration(v),
            "speed" => self.speed = value::float(v),
            "oscillate" => self.oscillate = value::boolean(v),
            "range" => self.range = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Scale pulse
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PulseConfig {
    pub scale: f32,
    pub speed: f32,
    pub waveform: Waveform,
    pub min: f32,
    pub max: f32,
}

impl PulseConfig {
    pub const NONE: PulseConfig = PulseConfig {
        scale: 0.0,
        speed: 1.0,
        waveform: Waveform::Sine,
        min: 1.0,
        max: 1.0,
    };

    pub fn is_active(&self) -> bool {
        self.scale != 0.0 && self.speed != 0.0
    }
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for PulseConfig {
    fn normalized(mut self) -> Self {
        self.min = non_negative(self.min);
        self.max = non_negative(self.max).max(self.min);
        self
    }
}

pub static PULSE_SCHEMA: Schema = Schema::new(
    "PulseConfig",
    &[
        FieldDef::new("scale", FieldKind::Float),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("waveform", FieldKind::Enum(Waveform::NAMES)),
        FieldDef::new("min", FieldKind::Float),
        FieldDef::new("max", FieldKind::Float),
    ],
);

impl FieldAccess for PulseConfig {
    fn schema() -> &'static Schema {
        &PULSE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "scale" => from_f32(self.scale),
            "speed" => from_f32(self.speed),
            "waveform" => Value::from(self.waveform.name()),
            "min" => from_f32(self.min),
            "max" => from_f32(self.max),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "scale" => self.scale = value::float(v),
            "speed" => self.speed = value::float(v),
            "waveform" => self.waveform = value::enumeration(v),
            "min" => self.min = value::float(v),
            "max" => self.max = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Alpha pulse
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AlphaPulseConfig {
    pub speed: f32,
    pub min: f32,
    pub max: f32,
    pub waveform: Waveform,
}

impl AlphaPulseConfig {
    pub const NONE: AlphaPulseConfig = AlphaPulseConfig {
        speed: 0.0,
        min: 1.0,
        max: 1.0,
        waveform: Waveform::Sine,
    };

    pub fn is_active(&self) -> bool {
        self.speed != 0.0 && self.min != self.max
    }
}

impl Default for AlphaPulseConfig {
    fn default() -> Self {
        Self::NONE
    }
}

impl Rebuild for AlphaPulseConfig {
    fn normalized(mut self) -> Self {
        self.min = clamp_unit(self.min);
        self.max = clamp_unit(self.max);
        self
    }
}

pub static ALPHA_PULSE_SCHEMA: Schema = Schema::new(
    "AlphaPulseConfig",
    &[
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("min", FieldKind::Float),
        FieldDef::new("max", FieldKind::Float),
        FieldDef::new("waveform", FieldKind::Enum(Waveform::NAMES)),
    ],
);

impl FieldAccess for AlphaPulseConfig {
    fn schema() -> &'static Schema {
        &ALPHA_PULSE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "speed" => from_f32(self.speed),
            "min" => from_f32(self.min),
            "max" => from_f32(self.max),
            "waveform" => Value::from(self.waveform.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "speed" => self.speed = value::float(v),
            "min" => self.min = value::float(v),
            "max" => self.max = value::float(v),
            "waveform" => self.waveform = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Wobble (optional)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WobbleConfig {
    pub amplitude: Vec3,
    pub speed: f32,
    pub randomize: bool,
}

impl Default for WobbleConfig {
    fn default() -> Self {
        Self {
            amplitude: Vec3::splat(0.1),
            speed: 1.0,
            randomize: false,
        }
    }
}

impl Rebuild for WobbleConfig {}

pub static WOBBLE_SCHEMA: Schema = Schema::new(
    "WobbleConfig",
    &[
        FieldDef::new("amplitude", FieldKind::Vec3),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("randomize", FieldKind::Bool),
    ],
);

impl FieldAccess for WobbleConfig {
    fn schema() -> &'static Schema {
        &WOBBLE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "amplitude" => from_vec3(self.amplitude),
            "speed" => from_f32(self.speed),
            "randomize" => Value::from(self.randomize),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "amplitude" => self.amplitude = value::vec3(v),
            "speed" => self.speed = value::float(v),
            "randomize" => self.randomize = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Surface wave (optional)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct WaveConfig {
    pub amplitude: f32,
    pub frequency: f32,
    pub speed: f32,
    pub direction: Axis,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 2.0,
            speed: 1.0,
            direction: Axis::Y,
        }
    }
}

impl Rebuild for WaveConfig {
    fn normalized(mut self) -> Self {
        self.frequency = non_negative(self.frequency);
        self
    }
}

pub static WAVE_SCHEMA: Schema = Schema::new(
    "WaveConfig",
    &[
        FieldDef::new("amplitude", FieldKind::Float),
        FieldDef::new("frequency", FieldKind::Float),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("direction", FieldKind::Enum(Axis::NAMES)),
    ],
);

impl FieldAccess for WaveConfig {
    fn schema() -> &'static Schema {
        &WAVE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "amplitude" => from_f32(self.amplitude),
            "frequency" => from_f32(self.frequency),
            "speed" => from_f32(self.speed),
            "direction" => Value::from(self.direction.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "amplitude" => self.amplitude = value::float(v),
            "frequency" => self.frequency = value::float(v),
            "speed" => self.speed = value::float(v),
            "direction" => self.direction = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Color cycle (optional)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ColorCycleConfig {
    pub speed: f32,
    pub hue_range: f32,
    pub blend: bool,
}

impl Default for ColorCycleConfig {
    fn default() -> Self {
        Self {
            speed: 1.0,
            hue_range: 360.0,
            blend: true,
        }
    }
}

impl Rebuild for ColorCycleConfig {
    fn normalized(mut self) -> Self {
        self.hue_range = self.hue_range.clamp(0.0, 360.0);
        self
    }
}

pub static COLOR_CYCLE_SCHEMA: Schema = Schema::new(
    "ColorCycleConfig",
    &[
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("hueRange", FieldKind::Float),
        FieldDef::new("blend", FieldKind::Bool),
    ],
);

impl FieldAccess for ColorCycleConfig {
    fn schema() -> &'static Schema {
        &COLOR_CYCLE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "speed" => from_f32(self.speed),
            "hueRange" => from_f32(self.hue_range),
            "blend" => Value::from(self.blend),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "speed" => self.speed = value::float(v),
            "hueRange" => self.hue_range = value::float(v),
            "blend" => self.blend = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Precession (optional)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrecessionConfig {
    pub tilt_angle: f32,
    pub speed: f32,
    pub phase: f32,
    pub axis: Axis,
}

impl Default for PrecessionConfig {
    fn default() -> Self {
        Self {
            tilt_angle: 15.0,
            speed: 0.5,
            phase: 0.0,
            axis: Axis::Y,
        }
    }
}

impl Rebuild for PrecessionConfig {
    fn normalized(mut self) -> Self {
        self.tilt_angle = self.tilt_angle.clamp(0.0, 90.0);
        self
    }
}

pub static PRECESSION_SCHEMA: Schema = Schema::new(
    "PrecessionConfig",
    &[
        FieldDef::new("tiltAngle", FieldKind::Float),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("phase", FieldKind::Float),
        FieldDef::new("axis", FieldKind::Enum(Axis::NAMES)),
    ],
);

impl FieldAccess for PrecessionConfig {
    fn schema() -> &'static Schema {
        &PRECESSION_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "tiltAngle" => from_f32(self.tilt_angle),
            "speed" => from_f32(self.speed),
            "phase" => from_f32(self.phase),
            "axis" => Value::from(self.axis.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "tiltAngle" => self.tilt_angle = value::float(v),
            "speed" => self.speed = value::float(v),
            "phase" => self.phase = value::float(v),
            "axis" => self.axis = value::enumeration(v),
            _ => return false,
        }
        true
    }
}
