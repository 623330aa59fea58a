//! Surface slices: fill, visibility mask, quad arrangement and appearance

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{Axis, ColorMode, FillMode, MaskType, NamedEnum, QuadPattern};
use super::{FieldAccess, Rebuild, clamp_unit, non_negative};
use crate::constants::colors::{DEFAULT_COLOR, DEFAULT_SECONDARY_COLOR};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32};

// ==============================================================================
// Fill
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FillConfig {
    pub mode: FillMode,
    pub wire_thickness: f32,
    pub point_size: f32,
    pub double_sided: bool,
    pub depth_test: bool,
    pub depth_write: bool,
    pub cage: CageOptions,
}

impl Default for FillConfig {
    fn default() -> Self {
        Self {
            mode: FillMode::Solid,
            wire_thickness: 1.0,
            point_size: 2.0,
            double_sided: false,
            depth_test: false,
            depth_write: false,
            cage: CageOptions::default(),
        }
    }
}

impl Rebuild for FillConfig {
    fn normalized(mut self) -> Self {
        self.wire_thickness = non_negative(self.wire_thickness);
        self.point_size = non_negative(self.point_size);
        self
    }
}

pub static FILL_SCHEMA: Schema = Schema::new(
    "FillConfig",
    &[
        FieldDef::new("mode", FieldKind::Enum(FillMode::NAMES)),
        FieldDef::new("wireThickness", FieldKind::Float),
        FieldDef::new("pointSize", FieldKind::Float),
        FieldDef::new("doubleSided", FieldKind::Bool),
        FieldDef::new("depthTest", FieldKind::Bool),
        FieldDef::new("depthWrite", FieldKind::Bool),
        FieldDef::new("cage", FieldKind::Nested(&CAGE_SCHEMA)),
    ],
);

impl FieldAccess for FillConfig {
    fn schema() -> &'static Schema {
        &FILL_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "mode" => Value::from(self.mode.name()),
            "wireThickness" => from_f32(self.wire_thickness),
            "pointSize" => from_f32(self.point_size),
            "doubleSided" => Value::from(self.double_sided),
            "depthTest" => Value::from(self.depth_test),
            "depthWrite" => Value::from(self.depth_write),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "mode" => self.mode = value::enumeration(v),
            "wireThickness" => self.wire_thickness = value::float(v),
            "pointSize" => self.point_size = value::float(v),
            "doubleSided" => self.double_sided = value::boolean(v),
            "depthTest" => self.depth_test = value::boolean(v),
            "depthWrite" => self.depth_write = value::boolean(v),
            _ => return false,
        }
        true
    }
}

/// Latitude/longitude line options for CAGE fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CageOptions {
    pub latitude_count: i32,
    pub longitude_count: i32,
    pub show_equator: bool,
    pub show_poles: bool,
}

impl Default for CageOptions {
    fn default() -> Self {
        Self {
            latitude_count: 8,
            longitude_count: 16,
            show_equator: true,
            show_poles: false,
        }
    }
}

impl Rebuild for CageOptions {
    fn normalized(mut self) -> Self {
        self.latitude_count = self.latitude_count.max(0);
        self.longitude_count = self.longitude_count.max(0);
        self
    }
}

pub static CAGE_SCHEMA: Schema = Schema::new(
    "CageOptions",
    &[
        FieldDef::new("latitudeCount", FieldKind::Int),
        FieldDef::new("longitudeCount", FieldKind::Int),
        FieldDef::new("showEquator", FieldKind::Bool),
        FieldDef::new("showPoles", FieldKind::Bool),
    ],
);

impl FieldAccess for CageOptions {
    fn schema() -> &'static Schema {
        &CAGE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "latitudeCount" => Value::from(self.latitude_count),
            "longitudeCount" => Value::from(self.longitude_count),
            "showEquator" => Value::from(self.show_equator),
            "showPoles" => Value::from(self.show_poles),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "latitudeCount" => self.latitude_count = value::int(v),
            "longitudeCount" => self.longitude_count = value::int(v),
            "showEquator" => self.show_equator = value::boolean(v),
            "showPoles" => self.show_poles = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Visibility mask
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct VisibilityMask {
    pub mask: MaskType,
    pub count: i32,
    pub thickness: f32,
    pub offset: f32,
    pub feather: f32,
    pub invert: bool,
    pub animate: bool,
    pub anim_speed: f32,
    pub direction: Axis,
}

impl Default for VisibilityMask {
    fn default() -> Self {
        Self {
            mask: MaskType::Full,
            count: 4,
            thickness: 0.5,
            offset: 0.0,
            feather: 0.0,
            invert: false,
            animate: false,
            anim_speed: 1.0,
            direction: Axis::Y,
        }
    }
}

impl Rebuild for VisibilityMask {
    fn normalized(mut self) -> Self {
        self.count = self.count.max(1);
        self.thickness = clamp_unit(self.thickness);
        self.feather = clamp_unit(self.feather);
        self
    }
}

pub static VISIBILITY_SCHEMA: Schema = Schema::new(
    "VisibilityMask",
    &[
        FieldDef::new("mask", FieldKind::Enum(MaskType::NAMES)),
        FieldDef::new("count", FieldKind::Int),
        FieldDef::new("thickness", FieldKind::Float),
        FieldDef::new("offset", FieldKind::Float),
        FieldDef::new("feather", FieldKind::Float),
        FieldDef::new("invert", FieldKind::Bool),
        FieldDef::new("animate", FieldKind::Bool),
        FieldDef::new("animSpeed", FieldKind::Float),
        FieldDef::new("direction", FieldKind::Enum(Axis::NAMES)),
    ],
);

impl FieldAccess for VisibilityMask {
    fn schema() -> &'static Schema {
        &VISIBILITY_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "mask" => Value::from(self.mask.name()),
            "count" => Value::from(self.count),
            "thickness" => from_f32(self.thickness),
            "offset" => from_f32(self.offset),
            "feather" => from_f32(self.feather),
            "invert" => Value::from(self.invert),
            "animate" => Value::from(self.animate),
            "animSpeed" => from_f32(self.anim_speed),
            "direction" => Value::from(self.direction.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "mask" => self.mask = value::enumeration(v),
            "count" => self.count = value::int(v),
            "thickness" => self.thickness = value::float(v),
            "offset" => self.offset = value::float(v),
            "feather" => self.feather = value::float(v),
            "invert" => self.invert = value::boolean(v),
            "animate" => self.animate = value::boolean(v),
            "animSpeed" => self.anim_speed = value::float(v),
            "direction" => self.direction = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Arrangement
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ArrangementConfig {
    pub pattern: QuadPattern,
    pub shuffle: bool,
    pub seed: i32,
    pub multi_part: bool,
    pub cap_pattern: QuadPattern,
}

impl Default for ArrangementConfig {
    fn default() -> Self {
        Self {
            pattern: QuadPattern::Filled,
            shuffle: false,
            seed: 0,
            multi_part: false,
            cap_pattern: QuadPattern::Filled,
        }
    }
}

impl Rebuild for ArrangementConfig {}

pub static ARRANGEMENT_SCHEMA: Schema = Schema::new(
    "ArrangementConfig",
    &[
        FieldDef::new("pattern", FieldKind::Enum(QuadPattern::NAMES)),
        FieldDef::new("shuffle", FieldKind::Bool),
        FieldDef::new("seed", FieldKind::Int),
        FieldDef::new("multiPart", FieldKind::Bool),
        FieldDef::new("capPattern", FieldKind::Enum(QuadPattern::NAMES)),
    ],
);

impl FieldAccess for ArrangementConfig {
    fn schema() -> &'static Schema {
        &ARRANGEMENT_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "pattern" => Value::from(self.pattern.name()),
            "shuffle" => Value::from(self.shuffle),
            "seed" => Value::from(self.seed),
            "multiPart" => Value::from(self.multi_part),
            "capPattern" => Value::from(self.cap_pattern.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "pattern" => self.pattern = value::enumeration(v),
            "shuffle" => self.shuffle = value::boolean(v),
            "seed" => self.seed = value::int(v),
            "multiPart" => self.multi_part = value::boolean(v),
            "capPattern" => self.cap_pattern = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Appearance
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AppearanceConfig {
    pub color: String,
    pub secondary_color: String,
    pub color_mode: ColorMode,
    pub color_blend: f32,
    pub alpha: f32,
    pub glow: f32,
    pub emissive: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub hue_shift: f32,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            color: DEFAULT_COLOR.to_string(),
            secondary_color: DEFAULT_SECONDARY_COLOR.to_string(),
            color_mode: ColorMode::Solid,
            color_blend: 0.5,
            alpha: 1.0,
            glow: 0.0,
            emissive: 0.0,
            saturation: 1.0,
            brightness: 1.0,
            hue_shift: 0.0,
        }
    }
}

impl Rebuild for AppearanceConfig {
    fn normalized(mut self) -> Self {
        self.alpha = clamp_unit(self.alpha);
        self.glow = clamp_unit(self.glow);
        self.emissive = clamp_unit(self.emissive);
        self.color_blend = clamp_unit(self.color_blend);
        self.saturation = non_negative(self.saturation);
        self.brightness = non_negative(self.brightness);
        self
    }
}

pub static APPEARANCE_SCHEMA: Schema = Schema::new(
    "AppearanceConfig",
    &[
        FieldDef::new("color", FieldKind::Color),
        FieldDef::new("secondaryColor", FieldKind::Color),
        FieldDef::new("colorMode", FieldKind::Enum(ColorMode::NAMES)),
        FieldDef::new("colorBlend", FieldKind::Float),
        FieldDef::new("alpha", FieldKind::Float),
        FieldDef::new("glow", FieldKind::Float),
        FieldDef::new("emissive", FieldKind::Float),
        FieldDef::new("saturation", FieldKind::Float),
        FieldDef::new("brightness", FieldKind::Float),
        FieldDef::new("hueShift", FieldKind::Float),
    ],
);

impl FieldAccess for AppearanceConfig {
    fn schema() -> &'static Schema {
        &APPEARANCE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "color" => Value::from(self.color.as_str()),
            "secondaryColor" => Value::from(self.secondary_color.as_str()),
            "colorMode" => Value::from(self.color_mode.name()),
            "colorBlend" => from_f32(self.color_blend),
            "alpha" => from_f32(self.alpha),
            "glow" => from_f32(self.glow),
            "emissive" => from_f32(self.emissive),
            "saturation" => from_f32(self.saturation),
            "brightness" => from_f32(self.brightness),
            "hueShift" => from_f32(self.hue_shift),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "color" => self.color = value::color(v, DEFAULT_COLOR),
            "secondaryColor" => self.secondary_color = value::color(v, DEFAULT_SECONDARY_COLOR),
            "colorMode" => self.color_mode = value::enumeration(v),
            "colorBlend" => self.color_blend = value::float(v),
            "alpha" => self.alpha = value::float(v),
            "glow" => self.glow = value::float(v),
            "emissive" => self.emissive = value::float(v),
            "saturation" => self.saturation = value::float(v),
            "brightness" => self.brightness = value::float(v),
            "hueShift" => self.hue_shift = value::float(v),
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
    fn test_appearance_alpha_clamped_on_build() {
        let a = AppearanceConfig::default()
            .to_builder()
            .with(|a| a.alpha = 1.5)
            .build();
        assert_eq!(a.alpha, 1.0);
    }

    #[test]
    fn test_appearance_color_normalized() {
        let mut a = AppearanceConfig::default();
        assert!(a.set_field("color", &json!("#0f0")));
        assert_eq!(a.color, "#FF00FF00");
        assert!(a.set_field("color", &json!("not a color")));
        assert_eq!(a.color, DEFAULT_COLOR);
    }

    #[test]
    fn test_fill_defaults() {
        let fill = FillConfig::default();
        assert_eq!(fill.mode, FillMode::Solid);
        assert_eq!(fill.field("mode").unwrap(), json!("SOLID"));
        assert!(fill.field("cage").is_none());
    }

    #[test]
    fn test_record_deserialize_requires_exact_shape() {
        let partial = json!({ "latitudeCount": 4 });
        assert!(crate::value::record::<CageOptions>(&partial).is_none());

        let exact = json!({
            "latitudeCount": 4,
            "longitudeCount": 6,
            "showEquator": false,
            "showPoles": true
        });
        let cage = crate::value::record::<CageOptions>(&exact).unwrap();
        assert_eq!(cage.longitude_count, 6);
    }
}
