//! Shape payloads
//!
//! One record per shape variant. The editor keeps every payload resident and
//! `Shape` carries only the active one.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::enums::{NamedEnum, PolyType, RayArrangement, ShapeType, SphereAlgorithm};
use super::{FieldAccess, Rebuild, clamp_segments, clamp_unit, non_negative};
use crate::constants::validation::{MAX_SUBDIVISIONS, MIN_RAY_COUNT};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::value::{self, from_f32};

/// The active shape of a primitive
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shapeType", rename_all = "lowercase")]
pub enum Shape {
    Sphere(SphereShape),
    Ring(RingShape),
    Prism(PrismShape),
    Cylinder(CylinderShape),
    Polyhedron(PolyhedronShape),
    Torus(TorusShape),
    Capsule(CapsuleShape),
    Cone(ConeShape),
    Jet(JetShape),
    Rays(RaysShape),
    Kamehameha(KamehamehaShape),
    Molecule(MoleculeShape),
}

impl Shape {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Shape::Sphere(_) => ShapeType::Sphere,
            Shape::Ring(_) => ShapeType::Ring,
            Shape::Prism(_) => ShapeType::Prism,
            Shape::Cylinder(_) => ShapeType::Cylinder,
            Shape::Polyhedron(_) => ShapeType::Polyhedron,
            Shape::Torus(_) => ShapeType::Torus,
            Shape::Capsule(_) => ShapeType::Capsule,
            Shape::Cone(_) => ShapeType::Cone,
            Shape::Jet(_) => ShapeType::Jet,
            Shape::Rays(_) => ShapeType::Rays,
            Shape::Kamehameha(_) => ShapeType::Kamehameha,
            Shape::Molecule(_) => ShapeType::Molecule,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Shape::Sphere(SphereShape::default())
    }
}

// ==============================================================================
// Sphere
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SphereShape {
    pub radius: f32,
    pub lat_steps: i32,
    pub lon_steps: i32,
    pub lat_start: f32,
    pub lat_end: f32,
    pub algorithm: SphereAlgorithm,
}

impl Default for SphereShape {
    fn default() -> Self {
        Self {
            radius: 1.0,
            lat_steps: 32,
            lon_steps: 64,
            lat_start: 0.0,
            lat_end: 1.0,
            algorithm: SphereAlgorithm::LatLon,
        }
    }
}

impl Rebuild for SphereShape {
    fn normalized(mut self) -> Self {
        self.radius = non_negative(self.radius);
        self.lat_steps = clamp_segments(self.lat_steps);
        self.lon_steps = clamp_segments(self.lon_steps);
        self.lat_start = clamp_unit(self.lat_start);
        self.lat_end = clamp_unit(self.lat_end);
        self
    }
}

pub static SPHERE_SCHEMA: Schema = Schema::new(
    "SphereShape",
    &[
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("latSteps", FieldKind::Int),
        FieldDef::new("lonSteps", FieldKind::Int),
        FieldDef::new("latStart", FieldKind::Float),
        FieldDef::new("latEnd", FieldKind::Float),
        FieldDef::new("algorithm", FieldKind::Enum(SphereAlgorithm::NAMES)),
    ],
);

impl FieldAccess for SphereShape {
    fn schema() -> &'static Schema {
        &SPHERE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "radius" => from_f32(self.radius),
            "latSteps" => Value::from(self.lat_steps),
            "lonSteps" => Value::from(self.lon_steps),
            "latStart" => from_f32(self.lat_start),
            "latEnd" => from_f32(self.lat_end),
            "algorithm" => Value::from(self.algorithm.name()),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "radius" => self.radius = value::float(v),
            "latSteps" => self.lat_steps = value::int(v),
            "lonSteps" => self.lon_steps = value::int(v),
            "latStart" => self.lat_start = value::float(v),
            "latEnd" => self.lat_end = value::float(v),
            "algorithm" => self.algorithm = value::enumeration(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Ring
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RingShape {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub segments: i32,
    pub height: f32,
    pub y: f32,
    pub arc_start: f32,
    pub arc_end: f32,
    pub twist: f32,
}

impl Default for RingShape {
    fn default() -> Self {
        Self {
            inner_radius: 0.8,
            outer_radius: 1.0,
            segments: 64,
            height: 0.0,
            y: 0.0,
            arc_start: 0.0,
            arc_end: 360.0,
            twist: 0.0,
        }
    }
}

impl Rebuild for RingShape {
    fn normalized(mut self) -> Self {
        self.inner_radius = non_negative(self.inner_radius);
        self.outer_radius = non_negative(self.outer_radius);
        self.segments = clamp_segments(self.segments);
        self.height = non_negative(self.height);
        self
    }
}

pub static RING_SCHEMA: Schema = Schema::new(
    "RingShape",
    &[
        FieldDef::new("innerRadius", FieldKind::Float),
        FieldDef::new("outerRadius", FieldKind::Float),
        FieldDef::new("segments", FieldKind::Int),
        FieldDef::new("height", FieldKind::Float),
        FieldDef::new("y", FieldKind::Float),
        FieldDef::new("arcStart", FieldKind::Float),
        FieldDef::new("arcEnd", FieldKind::Float),
        FieldDef::new("twist", FieldKind::Float),
    ],
);

impl FieldAccess for RingShape {
    fn schema() -> &'static Schema {
        &RING_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "innerRadius" => from_f32(self.inner_radius),
            "outerRadius" => from_f32(self.outer_radius),
            "segments" => Value::from(self.segments),
            "height" => from_f32(self.height),
            "y" => from_f32(self.y),
            "arcStart" => from_f32(self.arc_start),
            "arcEnd" => from_f32(self.arc_end),
            "twist" => from_f32(self.twist),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "innerRadius" => self.inner_radius = value::float(v),
            "outerRadius" => self.outer_radius = value::float(v),
            "segments" => self.segments = value::int(v),
            "height" => self.height = value::float(v),
            "y" => self.y = value::float(v),
            "arcStart" => self.arc_start = value::float(v),
            "arcEnd" => self.arc_end = value::float(v),
            "twist" => self.twist = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Prism
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PrismShape {
    pub sides: i32,
    pub radius: f32,
    pub height: f32,
    pub top_radius: f32,
    pub twist: f32,
    pub height_segments: i32,
    pub cap_top: bool,
    pub cap_bottom: bool,
}

impl Default for PrismShape {
    fn default() -> Self {
        Self {
            sides: 6,
            radius: 1.0,
            height: 2.0,
            top_radius: 1.0,
            twist: 0.0,
            height_segments: 1,
            cap_top: true,
            cap_bottom: true,
        }
    }
}

impl Rebuild for PrismShape {
    fn normalized(mut self) -> Self {
        self.sides = clamp_segments(self.sides);
        self.radius = non_negative(self.radius);
        self.height = non_negative(self.height);
        self.top_radius = non_negative(self.top_radius);
        self.height_segments = self.height_segments.max(1);
        self
    }
}

pub static PRISM_SCHEMA: Schema = Schema::new(
    "PrismShape",
    &[
        FieldDef::new("sides", FieldKind::Int),
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("height", FieldKind::Float),
        FieldDef::new("topRadius", FieldKind::Float),
        FieldDef::new("twist", FieldKind::Float),
        FieldDef::new("heightSegments", FieldKind::Int),
        FieldDef::new("capTop", FieldKind::Bool),
        FieldDef::new("capBottom", FieldKind::Bool),
    ],
);

impl FieldAccess for PrismShape {
    fn schema() -> &'static Schema {
        &PRISM_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "sides" => Value::from(self.sides),
            "radius" => from_f32(self.radius),
            "height" => from_f32(self.height),
            "topRadius" => from_f32(self.top_radius),
            "twist" => from_f32(self.twist),
            "heightSegments" => Value::from(self.height_segments),
            "capTop" => Value::from(self.cap_top),
            "capBottom" => Value::from(self.cap_bottom),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "sides" => self.sides = value::int(v),
            "radius" => self.radius = value::float(v),
            "height" => self.height = value::float(v),
            "topRadius" => self.top_radius = value::float(v),
            "twist" => self.twist = value::float(v),
            "heightSegments" => self.height_segments = value::int(v),
            "capTop" => self.cap_top = value::boolean(v),
            "capBottom" => self.cap_bottom = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Cylinder
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CylinderShape {
    pub radius: f32,
    pub top_radius: f32,
    pub height: f32,
    pub segments: i32,
    pub height_segments: i32,
    pub cap_top: bool,
    pub cap_bottom: bool,
    pub open_ended: bool,
}

impl Default for CylinderShape {
    fn default() -> Self {
        Self {
            radius: 0.5,
            top_radius: 0.5,
            height: 2.0,
            segments: 32,
            height_segments: 1,
            cap_top: true,
            cap_bottom: true,
            open_ended: false,
        }
    }
}

impl Rebuild for CylinderShape {
    fn normalized(mut self) -> Self {
        self.radius = non_negative(self.radius);
        self.top_radius = non_negative(self.top_radius);
        self.height = non_negative(self.height);
        self.segments = clamp_segments(self.segments);
        self.height_segments = self.height_segments.max(1);
        self
    }
}

pub static CYLINDER_SCHEMA: Schema = Schema::new(
    "CylinderShape",
    &[
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("topRadius", FieldKind::Float),
        FieldDef::new("height", FieldKind::Float),
        FieldDef::new("segments", FieldKind::Int),
        FieldDef::new("heightSegments", FieldKind::Int),
        FieldDef::new("capTop", FieldKind::Bool),
        FieldDef::new("capBottom", FieldKind::Bool),
        FieldDef::new("openEnded", FieldKind::Bool),
    ],
);

impl FieldAccess for CylinderShape {
    fn schema() -> &'static Schema {
        &CYLINDER_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "radius" => from_f32(self.radius),
            "topRadius" => from_f32(self.top_radius),
            "height" => from_f32(self.height),
            "segments" => Value::from(self.segments),
            "heightSegments" => Value::from(self.height_segments),
            "capTop" => Value::from(self.cap_top),
            "capBottom" => Value::from(self.cap_bottom),
            "openEnded" => Value::from(self.open_ended),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "radius" => self.radius = value::float(v),
            "topRadius" => self.top_radius = value::float(v),
            "height" => self.height = value::float(v),
            "segments" => self.segments = value::int(v),
            "heightSegments" => self.height_segments = value::int(v),
            "capTop" => self.cap_top = value::boolean(v),
            "capBottom" => self.cap_bottom = value::boolean(v),
            "openEnded" => self.open_ended = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Polyhedron
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PolyhedronShape {
    pub poly_type: PolyType,
    pub radius: f32,
    pub subdivisions: i32,
}

impl Default for PolyhedronShape {
    fn default() -> Self {
        Self {
            poly_type: PolyType::Cube,
            radius: 1.0,
            subdivisions: 0,
        }
    }
}

impl Rebuild for PolyhedronShape {
    fn normalized(mut self) -> Self {
        self.radius = non_negative(self.radius);
        self.subdivisions = self.subdivisions.clamp(0, MAX_SUBDIVISIONS);
        self
    }
}

pub static POLYHEDRON_SCHEMA: Schema = Schema::new(
    "PolyhedronShape",
    &[
        FieldDef::new("polyType", FieldKind::Enum(PolyType::NAMES)),
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("subdivisions", FieldKind::Int),
    ],
);

impl FieldAccess for PolyhedronShape {
    fn schema() -> &'static Schema {
        &POLYHEDRON_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "polyType" => Value::from(self.poly_type.name()),
            "radius" => from_f32(self.radius),
            "subdivisions" => Value::from(self.subdivisions),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "polyType" => self.poly_type = value::enumeration(v),
            "radius" => self.radius = value::float(v),
            "subdivisions" => self.subdivisions = value::int(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Torus
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TorusShape {
    pub major_radius: f32,
    pub minor_radius: f32,
    pub major_segments: i32,
    pub minor_segments: i32,
    pub twist: f32,
}

impl Default for TorusShape {
    fn default() -> Self {
        Self {
            major_radius: 1.0,
            minor_radius: 0.25,
            major_segments: 48,
            minor_segments: 16,
            twist: 0.0,
        }
    }
}

impl Rebuild for TorusShape {
    fn normalized(mut self) -> Self {
        self.major_radius = non_negative(self.major_radius);
        self.minor_radius = non_negative(self.minor_radius);
        self.major_segments = clamp_segments(self.major_segments);
        self.minor_segments = clamp_segments(self.minor_segments);
        self
    }
}

pub static TORUS_SCHEMA: Schema = Schema::new(
    "TorusShape",
    &[
        FieldDef::new("majorRadius", FieldKind::Float),
        FieldDef::new("minorRadius", FieldKind::Float),
        FieldDef::new("majorSegments", FieldKind::Int),
        FieldDef::new("minorSegments", FieldKind::Int),
        FieldDef::new("twist", FieldKind::Float),
    ],
);

impl FieldAccess for TorusShape {
    fn schema() -> &'static Schema {
        &TORUS_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "majorRadius" => from_f32(self.major_radius),
            "minorRadius" => from_f32(self.minor_radius),
            "majorSegments" => Value::from(self.major_segments),
            "minorSegments" => Value::from(self.minor_segments),
            "twist" => from_f32(self.twist),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "majorRadius" => self.major_radius = value::float(v),
            "minorRadius" => self.minor_radius = value::float(v),
            "majorSegments" => self.major_segments = value::int(v),
            "minorSegments" => self.minor_segments = value::int(v),
            "twist" => self.twist = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Capsule
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CapsuleShape {
    pub radius: f32,
    pub height: f32,
    pub segments: i32,
    pub rings: i32,
}

impl Default for CapsuleShape {
    fn default() -> Self {
        Self {
            radius: 0.5,
            height: 2.0,
            segments: 32,
            rings: 8,
        }
    }
}

impl Rebuild for CapsuleShape {
    fn normalized(mut self) -> Self {
        self.radius = non_negative(self.radius);
        self.height = non_negative(self.height);
        self.segments = clamp_segments(self.segments);
        self.rings = self.rings.max(1);
        self
    }
}

pub static CAPSULE_SCHEMA: Schema = Schema::new(
    "CapsuleShape",
    &[
        FieldDef::new("radius", FieldKind::Float),
        FieldDef::new("height", FieldKind::Float),
        FieldDef::new("segments", FieldKind::Int),
        FieldDef::new("rings", FieldKind::Int),
    ],
);

impl FieldAccess for CapsuleShape {
    fn schema() -> &'static Schema {
        &CAPSULE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "radius" => from_f32(self.radius),
            "height" => from_f32(self.height),
            "segments" => Value::from(self.segments),
            "rings" => Value::from(self.rings),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "radius" => self.radius = value::float(v),
            "height" => self.height = value::float(v),
            "segments" => self.segments = value::int(v),
            "rings" => self.rings = value::int(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Cone
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConeShape {
    pub bottom_radius: f32,
    pub top_radius: f32,
    pub height: f32,
    pub segments: i32,
    pub cap_bottom: bool,
}

impl Default for ConeShape {
    fn default() -> Self {
        Self {
            bottom_radius: 1.0,
            top_radius: 0.0,
            height: 2.0,
            segments: 32,
            cap_bottom: true,
        }
    }
}

impl Rebuild for ConeShape {
    fn normalized(mut self) -> Self {
        self.bottom_radius = non_negative(self.bottom_radius);
        self.top_radius = non_negative(self.top_radius);
        self.height = non_negative(self.height);
        self.segments = clamp_segments(self.segments);
        self
    }
}

pub static CONE_SCHEMA: Schema = Schema::new(
    "ConeShape",
    &[
        FieldDef::new("bottomRadius", FieldKind::Float),
        FieldDef::new("topRadius", FieldKind::Float),
        FieldDef::new("height", FieldKind::Float),
        FieldDef::new("segments", FieldKind::Int),
        FieldDef::new("capBottom", FieldKind::Bool),
    ],
);

impl FieldAccess for ConeShape {
    fn schema() -> &'static Schema {
        &CONE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "bottomRadius" => from_f32(self.bottom_radius),
            "topRadius" => from_f32(self.top_radius),
            "height" => from_f32(self.height),
            "segments" => Value::from(self.segments),
            "capBottom" => Value::from(self.cap_bottom),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "bottomRadius" => self.bottom_radius = value::float(v),
            "topRadius" => self.top_radius = value::float(v),
            "height" => self.height = value::float(v),
            "segments" => self.segments = value::int(v),
            "capBottom" => self.cap_bottom = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Jet
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct JetShape {
    pub length: f32,
    pub base_radius: f32,
    pub tip_radius: f32,
    pub segments: i32,
    pub length_segments: i32,
    pub dual_jets: bool,
    pub gap: f32,
    pub hollow: bool,
}

impl Default for JetShape {
    fn default() -> Self {
        Self {
            length: 3.0,
            base_radius: 0.3,
            tip_radius: 0.05,
            segments: 24,
            length_segments: 8,
            dual_jets: false,
            gap: 0.0,
            hollow: false,
        }
    }
}

impl Rebuild for JetShape {
    fn normalized(mut self) -> Self {
        self.length = non_negative(self.length);
        self.base_radius = non_negative(self.base_radius);
        self.tip_radius = non_negative(self.tip_radius);
        self.segments = clamp_segments(self.segments);
        self.length_segments = self.length_segments.max(1);
        self.gap = non_negative(self.gap);
        self
    }
}

pub static JET_SCHEMA: Schema = Schema::new(
    "JetShape",
    &[
        FieldDef::new("length", FieldKind::Float),
        FieldDef::new("baseRadius", FieldKind::Float),
        FieldDef::new("tipRadius", FieldKind::Float),
        FieldDef::new("segments", FieldKind::Int),
        FieldDef::new("lengthSegments", FieldKind::Int),
        FieldDef::new("dualJets", FieldKind::Bool),
        FieldDef::new("gap", FieldKind::Float),
        FieldDef::new("hollow", FieldKind::Bool),
    ],
);

impl FieldAccess for JetShape {
    fn schema() -> &'static Schema {
        &JET_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "length" => from_f32(self.length),
            "baseRadius" => from_f32(self.base_radius),
            "tipRadius" => from_f32(self.tip_radius),
            "segments" => Value::from(self.segments),
            "lengthSegments" => Value::from(self.length_segments),
            "dualJets" => Value::from(self.dual_jets),
            "gap" => from_f32(self.gap),
            "hollow" => Value::from(self.hollow),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "length" => self.length = value::float(v),
            "baseRadius" => self.base_radius = value::float(v),
            "tipRadius" => self.tip_radius = value::float(v),
            "segments" => self.segments = value::int(v),
            "lengthSegments" => self.length_segments = value::int(v),
            "dualJets" => self.dual_jets = value::boolean(v),
            "gap" => self.gap = value::float(v),
            "hollow" => self.hollow = value::boolean(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Rays
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RaysShape {
    pub count: i32,
    pub ray_length: f32,
    pub ray_width: f32,
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub arrangement: RayArrangement,
    pub randomness: f32,
    pub layers: i32,
    pub segments: i32,
}

impl Default for RaysShape {
    fn default() -> Self {
        Self {
            count: 12,
            ray_length: 2.0,
            ray_width: 1.0,
            inner_radius: 0.5,
            outer_radius: 2.5,
            arrangement: RayArrangement::Radial,
            randomness: 0.0,
            layers: 1,
            segments: 1,
        }
    }
}

impl Rebuild for RaysShape {
    fn normalized(mut self) -> Self {
        self.count = self.count.max(MIN_RAY_COUNT);
        self.ray_length = non_negative(self.ray_length);
        self.ray_width = non_negative(self.ray_width);
        self.inner_radius = non_negative(self.inner_radius);
        self.outer_radius = non_negative(self.outer_radius);
        self.randomness = clamp_unit(self.randomness);
        self.layers = self.layers.max(1);
        self.segments = self.segments.max(1);
        self
    }
}

pub static RAYS_SCHEMA: Schema = Schema::new(
    "RaysShape",
    &[
        FieldDef::new("count", FieldKind::Int),
        FieldDef::new("rayLength", FieldKind::Float),
        FieldDef::new("rayWidth", FieldKind::Float),
        FieldDef::new("innerRadius", FieldKind::Float),
        FieldDef::new("outerRadius", FieldKind::Float),
        FieldDef::new("arrangement", FieldKind::Enum(RayArrangement::NAMES)),
        FieldDef::new("randomness", FieldKind::Float),
        FieldDef::new("layers", FieldKind::Int),
        FieldDef::new("segments", FieldKind::Int),
    ],
);

impl FieldAccess for RaysShape {
    fn schema() -> &'static Schema {
        &RAYS_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "count" => Value::from(self.count),
            "rayLength" => from_f32(self.ray_length),
            "rayWidth" => from_f32(self.ray_width),
            "innerRadius" => from_f32(self.inner_radius),
            "outerRadius" => from_f32(self.outer_radius),
            "arrangement" => Value::from(self.arrangement.name()),
            "randomness" => from_f32(self.randomness),
            "layers" => Value::from(self.layers),
            "segments" => Value::from(self.segments),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "count" => self.count = value::int(v),
            "rayLength" => self.ray_length = value::float(v),
            "rayWidth" => self.ray_width = value::float(v),
            "innerRadius" => self.inner_radius = value::float(v),
            "outerRadius" => self.outer_radius = value::float(v),
            "arrangement" => self.arrangement = value::enumeration(v),
            "randomness" => self.randomness = value::float(v),
            "layers" => self.layers = value::int(v),
            "segments" => self.segments = value::int(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Kamehameha (charged orb + beam)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct KamehamehaShape {
    pub orb_radius: f32,
    pub beam_length: f32,
    pub beam_base_radius: f32,
    pub beam_tip_radius: f32,
    pub orb_segments: i32,
    pub beam_segments: i32,
    pub orb_progress: f32,
    pub beam_progress: f32,
}

impl Default for KamehamehaShape {
    fn default() -> Self {
        Self {
            orb_radius: 0.6,
            beam_length: 6.0,
            beam_base_radius: 0.4,
            beam_tip_radius: 0.4,
            orb_segments: 32,
            beam_segments: 24,
            orb_progress: 1.0,
            beam_progress: 1.0,
        }
    }
}

impl Rebuild for KamehamehaShape {
    fn normalized(mut self) -> Self {
        self.orb_radius = non_negative(self.orb_radius);
        self.beam_length = non_negative(self.beam_length);
        self.beam_base_radius = non_negative(self.beam_base_radius);
        self.beam_tip_radius = non_negative(self.beam_tip_radius);
        self.orb_segments = clamp_segments(self.orb_segments);
        self.beam_segments = clamp_segments(self.beam_segments);
        self.orb_progress = clamp_unit(self.orb_progress);
        self.beam_progress = clamp_unit(self.beam_progress);
        self
    }
}

pub static KAMEHAMEHA_SCHEMA: Schema = Schema::new(
    "KamehamehaShape",
    &[
        FieldDef::new("orbRadius", FieldKind::Float),
        FieldDef::new("beamLength", FieldKind::Float),
        FieldDef::new("beamBaseRadius", FieldKind::Float),
        FieldDef::new("beamTipRadius", FieldKind::Float),
        FieldDef::new("orbSegments", FieldKind::Int),
        FieldDef::new("beamSegments", FieldKind::Int),
        FieldDef::new("orbProgress", FieldKind::Float),
        FieldDef::new("beamProgress", FieldKind::Float),
    ],
);

impl FieldAccess for KamehamehaShape {
    fn schema() -> &'static Schema {
        &KAMEHAMEHA_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "orbRadius" => from_f32(self.orb_radius),
            "beamLength" => from_f32(self.beam_length),
            "beamBaseRadius" => from_f32(self.beam_base_radius),
            "beamTipRadius" => from_f32(self.beam_tip_radius),
            "orbSegments" => Value::from(self.orb_segments),
            "beamSegments" => Value::from(self.beam_segments),
            "orbProgress" => from_f32(self.orb_progress),
            "beamProgress" => from_f32(self.beam_progress),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "orbRadius" => self.orb_radius = value::float(v),
            "beamLength" => self.beam_length = value::float(v),
            "beamBaseRadius" => self.beam_base_radius = value::float(v),
            "beamTipRadius" => self.beam_tip_radius = value::float(v),
            "orbSegments" => self.orb_segments = value::int(v),
            "beamSegments" => self.beam_segments = value::int(v),
            "orbProgress" => self.orb_progress = value::float(v),
            "beamProgress" => self.beam_progress = value::float(v),
            _ => return false,
        }
        true
    }
}

// ==============================================================================
// Molecule (atom cluster joined by bonds)
// ==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoleculeShape {
    pub atom_count: i32,
    pub atom_radius: f32,
    pub bond_radius: f32,
    pub spread: f32,
    pub neck_pinch: f32,
    pub seed: i32,
}

impl Default for MoleculeShape {
    fn default() -> Self {
        Self {
            atom_count: 5,
            atom_radius: 0.4,
            bond_radius: 0.1,
            spread: 1.2,
            neck_pinch: 0.5,
            seed: 0,
        }
    }
}

impl Rebuild for MoleculeShape {
    fn normalized(mut self) -> Self {
        self.atom_count = self.atom_count.max(1);
        self.atom_radius = non_negative(self.atom_radius);
        self.bond_radius = non_negative(self.bond_radius);
        self.spread = non_negative(self.spread);
        self.neck_pinch = clamp_unit(self.neck_pinch);
        self
    }
}

pub static MOLECULE_SCHEMA: Schema = Schema::new(
    "MoleculeShape",
    &[
        FieldDef::new("atomCount", FieldKind::Int),
        FieldDef::new("atomRadius", FieldKind::Float),
        FieldDef::new("bondRadius", FieldKind::Float),
        FieldDef::new("spread", FieldKind::Float),
        FieldDef::new("neckPinch", FieldKind::Float),
        FieldDef::new("seed", FieldKind::Int),
    ],
);

impl FieldAccess for MoleculeShape {
    fn schema() -> &'static Schema {
        &MOLECULE_SCHEMA
    }

    fn field(&self, name: &str) -> Option<Value> {
        Some(match name {
            "atomCount" => Value::from(self.atom_count),
            "atomRadius" => from_f32(self.atom_radius),
            "bondRadius" => from_f32(self.bond_radius),
            "spread" => from_f32(self.spread),
            "neckPinch" => from_f32(self.neck_pinch),
            "seed" => Value::from(self.seed),
            _ => return None,
        })
    }

    fn set_field(&mut self, name: &str, v: &Value) -> bool {
        match name {
            "atomCount" => self.atom_count = value::int(v),
            "atomRadius" => self.atom_radius = value::float(v),
            "bondRadius" => self.bond_radius = value::float(v),
            "spread" => self.spread = value::float(v),
            "neckPinch" => self.neck_pinch = value::float(v),
            "seed" => self.seed = value::int(v),
            _ => return false,
        }
        true
    }
}
