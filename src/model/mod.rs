//! Immutable configuration model
//!
//! Every slice and sub-config is a plain value type. Edits never mutate a
//! stored value in place: the editor takes a builder from the current value,
//! changes one field and builds a fresh value that replaces the old one.

pub mod animation;
pub mod definition;
pub mod enums;
pub mod ray_flow;
pub mod shapes;
pub mod surface;
pub mod transform;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::Schema;

pub use animation::{
    AlphaPulseConfig, AnimationConfig, ColorCycleConfig, PrecessionConfig, PulseConfig, SpinConfig,
    WaveConfig, WobbleConfig,
};
pub use definition::{
    DefinitionBuilder, FieldDefinition, Layer, LayerBuilder, Modifiers, Primitive,
    PrimitiveBuilder, ShockwaveConfig,
};
pub use ray_flow::{LinkConfig, RayFlowConfig};
pub use shapes::Shape;
pub use surface::{AppearanceConfig, ArrangementConfig, CageOptions, FillConfig, VisibilityMask};
pub use transform::{AxisMotion, Orbit3dConfig, OrbitConfig, TransformConfig};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3::new(1.0, 1.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }
}

/// Value types that are edited through a builder.
///
/// `normalized` is applied by `build()` and is where each type clamps its
/// fields into valid ranges.
pub trait Rebuild: Clone {
    fn normalized(self) -> Self {
        self
    }

    fn to_builder(&self) -> ConfigBuilder<Self> {
        ConfigBuilder {
            draft: self.clone(),
        }
    }
}

/// Builder over a copy of an existing value. Consumed by `build()`, so a
/// half-edited value is never observable outside the call that made it.
#[must_use]
pub struct ConfigBuilder<T> {
    draft: T,
}

impl<T: Rebuild> ConfigBuilder<T> {
    pub fn with(mut self, edit: impl FnOnce(&mut T)) -> Self {
        edit(&mut self.draft);
        self
    }

    pub fn build(self) -> T {
        self.draft.normalized()
    }
}

/// Name-based access to the scalar fields of a flat record
pub trait FieldAccess {
    fn schema() -> &'static Schema
    where
        Self: Sized;

    /// Current value of a field, `None` if the name is unknown
    fn field(&self, name: &str) -> Option<Value>;

    /// Coerce and assign a field; `false` if the name is unknown
    fn set_field(&mut self, name: &str, value: &Value) -> bool;
}

pub(crate) fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

pub(crate) fn non_negative(v: f32) -> f32 {
    if v.is_nan() { 0.0 } else { v.max(0.0) }
}

pub(crate) fn clamp_segments(v: i32) -> i32 {
    use crate::constants::validation::{MAX_SEGMENTS, MIN_SEGMENTS};
    v.clamp(MIN_SEGMENTS, MAX_SEGMENTS)
}
