//! Primitive, layer and field definition aggregates
//!
//! A field definition is an ordered list of layers, each holding an ordered
//! list of primitives, plus definition-wide shockwave and modifier settings.
//! Aggregates are assembled through builders whose empty slots fall back to
//! defaults on `build()`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::info;

use super::enums::{BlendMode, NamedEnum, ShockwaveShape};
use super::{
    AnimationConfig, AppearanceConfig, ArrangementConfig, FieldAccess, FillConfig, LinkConfig,
    RayFlowConfig, Rebuild, Shape, TransformConfig, VisibilityMask, clamp_unit, non_negative,
};
use crate::constants::colors::DEFAULT_COLOR;
use crate::constants::merge::DEFAULT_PRIMITIVE_ID;
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32};

// ==============================================================================
// Primitive
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Primitive {
    pub id: String,
    pub shape: Shape,
    #[serde(default)]
    pub transform: TransformConfig,
    #[serde(default)]
    pub fill: FillConfig,
    #[serde(default)]
    pub visibility: VisibilityMask,
    #[serde(default)]
    pub arrangement: ArrangementConfig,
    #[serde(default)]
    pub appearance: AppearanceConfig,
    #[serde(default)]
    pub animation: AnimationConfig,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkConfig>,
    #[serde(default)]
    pub ray_flow: RayFlowConfig,
}

impl Primitive {
    pub fn new(id: impl Into<String>) -> Self {
        PrimitiveBuilder::new(id).build()
    }

    pub fn to_builder(&self) -> PrimitiveBuilder {
        PrimitiveBuilder {
            id: self.id.clone(),
            shape: Some(self.shape.clone()),
            transform: Some(self.transform.clone()),
            fill: Some(self.fill.clone()),
            visibility: Some(self.visibility.clone()),
            arrangement: Some(self.arrangement.clone()),
            appearance: Some(self.appearance.clone()),
            animation: Some(self.animation.clone()),
            link: self.link.clone(),
            ray_flow: Some(self.ray_flow.clone()),
        }
    }
}

impl Default for Primitive {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMITIVE_ID)
    }
}

/// Collects one slice per category; unset slices take their defaults
#[derive(Debug, Default)]
pub struct PrimitiveBuilder {
    id: String,
    shape: Option<Shape>,
    transform: Option<TransformConfig>,
    fill: Option<FillConfig>,
    visibility: Option<VisibilityMask>,
    arrangement: Option<ArrangementConfig>,
    appearance: Option<AppearanceConfig>,
    animation: Option<AnimationConfig>,
    link: Option<LinkConfig>,
    ray_flow: Option<RayFlowConfig>,
}

impl PrimitiveBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = id.into();
        self
    }

    pub fn shape(&mut self, shape: Shape) -> &mut Self {
        self.shape = Some(shape);
        self
    }

    pub fn transform(&mut self, transform: TransformConfig) -> &mut Self {
        self.transform = Some(transform);
        self
    }

    pub fn fill(&mut self, fill: FillConfig) -> &mut Self {
        self.fill = Some(fill);
        self
    }

    pub fn visibility(&mut self, visibility: VisibilityMask) -> &mut Self {
        self.visibility = Some(visibility);
        self
    }

    pub fn arrangement(&mut self, arrangement: ArrangementConfig) -> &mut Self {
        self.arrangement = Some(arrangement);
        self
    }

    pub fn appearance(&mut self, appearance: AppearanceConfig) -> &mut Self {
        self.appearance = Some(appearance);
        self
    }

    pub fn animation(&mut self, animation: AnimationConfig) -> &mut Self {
        self.animation = Some(animation);
        self
    }

    pub fn link(&mut self, link: Option<LinkConfig>) -> &mut Self {
        self.link = link;
        self
    }

    pub fn ray_flow(&mut self, ray_flow: RayFlowConfig) -> &mut Self {
        self.ray_flow = Some(ray_flow);
        self
    }

    pub fn build(self) -> Primitive {
        Primitive {
            id: self.id,
            shape: self.shape.unwrap_or_default(),
            transform: self.transform.unwrap_or_default(),
            fill: self.fill.unwrap_or_default(),
            visibility: self.visibility.unwrap_or_default(),
            arrangement: self.arrangement.unwrap_or_default(),
            appearance: self.appearance.unwrap_or_default(),
            animation: self.animation.unwrap_or_default(),
            link: self.link,
            ray_flow: self.ray_flow.unwrap_or_default(),
        }
    }
}

// ==============================================================================
// Layer
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default = "default_alpha")]
    pub alpha: f32,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default)]
    pub blend_mode: BlendMode,
    #[serde(default)]
    pub primitives: Vec<Primitive>,
}

fn default_alpha() -> f32 {
    1.0
}

fn default_visible() -> bool {
    true
}

impl Layer {
    /// New layer holding one default primitive
    pub fn new(name: impl Into<String>) -> Self {
        let mut builder = LayerBuilder::new(name);
        builder.primitives(vec![Primitive::default()]);
        builder.build()
    }

    pub fn to_builder(&self) -> LayerBuilder {
        LayerBuilder {
            name: self.name.clone(),
            alpha: Some(self.alpha),
            visible: Some(self.visible),
            blend_mode: Some(self.blend_mode),
            primitives: self.primitives.clone(),
        }
    }

    pub fn primitive_index(&self, id: &str) -> Option<usize> {
        self.primitives.iter().position(|p| p.id == id)
    }
}

impl Rebuild for Layer {
    fn normalized(mut self) -> Self {
        self.alpha = clamp_unit(self.alpha);
        self
    }
}

pub static LAYER_SCHEMA: Schema = Schema::new(
    "Layer",
    &[
        FieldDef::new("name", FieldKind::Text),
        FieldDef::new("alpha", FieldKind::Float),
        FieldDef::new("visible", FieldKind::Bool),
        FieldDef::new("blendMode", FieldKind::Enum(BlendMode::NAMES)),
    ],
);

impl FieldAccess for Layer {
    fn schema() -> &'static Schema {
        &LAYER_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "name" => Value::from(self.name.as_str()),
            "alpha" => from_f32(self.alpha),
            "visible" => Value::from(self.visible),
            "blendMode" => Value::from(self.blend_mode.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "name" => self.name = value::text(v),
            "alpha" => self.alpha = value::float(v),
            "visible" => self.visible = value::boolean(v),
            "blendMode" => self.blend_mode = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

#[derive(Debug, Default)]
pub struct LayerBuilder {
    name: String,
    alpha: Option<f32>,
    visible: Option<bool>,
    blend_mode: Option<BlendMode>,
    primitives: Vec<Primitive>,
}

impl LayerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn name(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = name.into();
        self
    }

    pub fn alpha(&mut self, alpha: f32) -> &mut Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn visible(&mut self, visible: bool) -> &mut Self {
        self.visible = Some(visible);
        self
    }

    pub fn blend_mode(&mut self, blend_mode: BlendMode) -> &mut Self {
        self.blend_mode = Some(blend_mode);
        self
    }

    pub fn primitives(&mut self, primitives: Vec<Primitive>) -> &mut Self {
        self.primitives = primitives;
        self
    }

    pub fn build(self) -> Layer {
        Layer {
            name: self.name,
            alpha: self.alpha.unwrap_or_else(default_alpha),
            visible: self.visible.unwrap_or_else(default_visible),
            blend_mode: self.blend_mode.unwrap_or_default(),
            primitives: self.primitives,
        }
        .normalized()
    }
}

// ==============================================================================
// Definition-level settings
// ==============================================================================

/// Expanding ring emitted when the field triggers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ShockwaveConfig {
    pub enabled: bool,
    pub shape: ShockwaveShape,
    pub speed: f32,
    pub max_radius: f32,
    pub thickness: f32,
    pub intensity: f32,
    pub rings: i32,
    pub ring_spacing: f32,
    pub color: String,
}

impl Default for ShockwaveConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            shape: ShockwaveShape::Ring,
            speed: 8.0,
            max_radius: 24.0,
            thickness: 0.5,
            intensity: 1.0,
            rings: 1,
            ring_spacing: 1.5,
            color: DEFAULT_COLOR.to_string(),
        }
    }
}

impl Rebuild for ShockwaveConfig {
    fn normalized(mut self) -> Self {
        self.speed = non_negative(self.speed);
        self.max_radius = non_negative(self.max_radius);
        self.thickness = non_negative(self.thickness);
        self.intensity = clamp_unit(self.intensity);
        self.rings = self.rings.max(1);
        self.ring_spacing = non_negative(self.ring_spacing);
        self
    }
}

pub static SHOCKWAVE_SCHEMA: Schema = Schema::new(
    "ShockwaveConfig",
    &[
        FieldDef::new("enabled", FieldKind::Bool),
        FieldDef::new("shape", FieldKind::Enum(ShockwaveShape::NAMES)),
        FieldDef::new("speed", FieldKind::Float),
        FieldDef::new("maxRadius", FieldKind::Float),
        FieldDef::new("thickness", FieldKind::Float),
        FieldDef::new("intensity", FieldKind::Float),
        FieldDef::new("rings", FieldKind::Int),
        FieldDef::new("ringSpacing", FieldKind::Float),
        FieldDef::new("color", FieldKind::Color),
    ],
);

impl FieldAccess for ShockwaveConfig {
    fn schema() -> &'static Schema {
        &SHOCKWAVE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "enabled" => Value::from(self.enabled),
            "shape" => Value::from(self.shape.name()),
            "speed" => from_f32(self.speed),
            "maxRadius" => from_f32(self.max_radius),
            "thickness" => from_f32(self.thickness),
            "intensity" => from_f32(self.intensity),
            "rings" => Value::from(self.rings),
            "ringSpacing" => from_f32(self.ring_spacing),
            "color" => Value::from(self.color.as_str()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "enabled" => self.enabled = value::boolean(v),
            "shape" => self.shape = value::enumeration(v),
            "speed" => self.speed = value::float(v),
            "maxRadius" => self.max_radius = value::float(v),
            "thickness" => self.thickness = value::float(v),
            "intensity" => self.intensity = value::float(v),
            "rings" => self.rings = value::int(v),
            "ringSpacing" => self.ring_spacing = value::float(v),
            "color" => self.color = value::color(v, DEFAULT_COLOR),
            _ => return false,
        }
        true
    }
}

/// Definition-wide multipliers applied on top of every primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Modifiers {
    pub radius_multiplier: f32,
    pub strength_multiplier: f32,
    pub alpha_multiplier: f32,
    pub spin_multiplier: f32,
    pub bobbing: f32,
    pub breathing: f32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            radius_multiplier: 1.0,
            strength_multiplier: 1.0,
            alpha_multiplier: 1.0,
            spin_multiplier: 1.0,
            bobbing: 0.0,
            breathing: 0.0,
        }
    }
}

impl Rebuild for Modifiers {
    fn normalized(mut self) -> Self {
        self.radius_multiplier = non_negative(self.radius_multiplier);
        self.strength_multiplier = non_negative(self.strength_multiplier);
        self.alpha_multiplier = non_negative(self.alpha_multiplier);
        self.bobbing = non_negative(self.bobbing);
        self.breathing = non_negative(self.breathing);
        self
    }
}

pub static MODIFIERS_SCHEMA: Schema = Schema::new(
    "Modifiers",
    &[
        FieldDef::new("radiusMultiplier", FieldKind::Float),
        FieldDef::new("strengthMultiplier", FieldKind::Float),
        FieldDef::new("alphaMultiplier", FieldKind::Float),
        FieldDef::new("spinMultiplier", FieldKind::Float),
        FieldDef::new("bobbing", FieldKind::Float),
        FieldDef::new("breathing", FieldKind::Float),
    ],
);

impl FieldAccess for Modifiers {
    fn schema() -> &'static Schema {
        &MODIFIERS_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "radiusMultiplier" => from_f32(self.radius_multiplier),
            "strengthMultiplier" => from_f32(self.strength_multiplier),
            "alphaMultiplier" => from_f32(self.alpha_multiplier),
            "spinMultiplier" => from_f32(self.spin_multiplier),
            "bobbing" => from_f32(self.bobbing),
            "breathing" => from_f32(self.breathing),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "radiusMultiplier" => self.radius_multiplier = value::float(v),
            "strengthMultiplier" => self.strength_multiplier = value::float(v),
            "alphaMultiplier" => self.alpha_multiplier = value::float(v),
            "spinMultiplier" => self.spin_multiplier = value::float(v),
            "bobbing" => self.bobbing = value::float(v),
            "breathing" => self.breathing = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Field definition
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDefinition {
    pub id: String,
    #[serde(default)]
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub shockwave: ShockwaveConfig,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl Default for FieldDefinition {
    fn default() -> Self {
        let mut builder = DefinitionBuilder::new("untitled");
        builder.layers(vec![Layer::new("base")]);
        builder.build()
    }
}

impl FieldDefinition {
    pub fn to_builder(&self) -> DefinitionBuilder {
        DefinitionBuilder {
            id: self.id.clone(),
            layers: self.layers.clone(),
            shockwave: Some(self.shockwave.clone()),
            modifiers: Some(self.modifiers.clone()),
        }
    }

    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    /// Load a definition from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read definition from {:?}", path))?;
        let definition: FieldDefinition = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse definition JSON from {:?}", path))?;
        info!(id = %definition.id, layers = definition.layers.len(), "Loaded field definition");
        Ok(definition)
    }

    /// Save a definition as pretty-printed JSON, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create definition directory {:?}", parent))?;
        }
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize field definition to JSON")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write definition to {:?}", path))?;
        info!(id = %self.id, path = %path.display(), "Saved field definition");
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct DefinitionBuilder {
    id: String,
    layers: Vec<Layer>,
    shockwave: Option<ShockwaveConfig>,
    modifiers: Option<Modifiers>,
}

impl DefinitionBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    pub fn layers(&mut self, layers: Vec<Layer>) -> &mut Self {
        self.layers = layers;
        self
    }

    pub fn shockwave(&mut self, shockwave: ShockwaveConfig) -> &mut Self {
        self.shockwave = Some(shockwave);
        self
    }

    pub fn modifiers(&mut self, modifiers: Modifiers) -> &mut Self {
        self.modifiers = Some(modifiers);
        self
    }

    pub fn build(self) -> FieldDefinition {
        FieldDefinition {
            id: self.id,
            layers: self.layers,
            shockwave: self.shockwave.unwrap_or_default(),
            modifiers: self.modifiers.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shapes::RingShape;

    #[test]
    fn test_default_definition_has_one_layer_one_primitive() {
        let def = FieldDefinition::default();
        assert_eq!(def.layers.len(), 1);
        assert_eq!(def.layers[0].primitives.len(), 1);
        assert_eq!(def.layers[0].primitives[0].id, DEFAULT_PRIMITIVE_ID);
    }

    #[test]
    fn test_primitive_builder_roundtrip() {
        let mut builder = PrimitiveBuilder::new("ring");
        builder.shape(Shape::Ring(RingShape::default()));
        let primitive = builder.build();
        assert_eq!(primitive.to_builder().build(), primitive);
    }

    #[test]
    fn test_layer_builder_clamps_alpha() {
        let mut builder = LayerBuilder::new("glow");
        builder.alpha(3.0);
        assert_eq!(builder.build().alpha, 1.0);
    }

    #[test]
    fn test_definition_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("def.json");

        let mut def = FieldDefinition::default();
        def.layers.push(Layer::new("glow"));
        def.save(&path).unwrap();

        let loaded = FieldDefinition::load(&path).unwrap();
        assert_eq!(loaded, def);
    }

    #[test]
    fn test_load_missing_file_errors() {
        assert!(FieldDefinition::load(Path::new("/nonexistent/def.json")).is_err());
    }

    #[test]
    fn test_layer_deserialize_defaults() {
        let layer: Layer = serde_json::from_str(r#"{"name": "bare"}"#).unwrap();
        assert_eq!(layer.alpha, 1.0);
        assert!(layer.visible);
        assert!(layer.primitives.is_empty());
    }
}
