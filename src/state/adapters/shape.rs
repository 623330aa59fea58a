//! Shape adapter
//!
//! Keeps all twelve shape payloads resident so switching `shapeType` back and
//! forth never loses entered values. Paths:
//!
//! - `shapeType`: the active variant
//! - `<variant>` / `<variant>.<field>`: any payload, active or not
//! - `<field>`: shorthand for a field of the active payload

use serde_json::Value;
use tracing::warn;

use crate::model::enums::{NamedEnum, ShapeType};
use crate::model::shapes::{
    CAPSULE_SCHEMA, CONE_SCHEMA, CYLINDER_SCHEMA, CapsuleShape, ConeShape, CylinderShape,
    JET_SCHEMA, JetShape, KAMEHAMEHA_SCHEMA, KamehamehaShape, MOLECULE_SCHEMA, MoleculeShape,
    POLYHEDRON_SCHEMA, PRISM_SCHEMA, PolyhedronShape, PrismShape, RAYS_SCHEMA, RING_SCHEMA,
    RaysShape, RingShape, SPHERE_SCHEMA, SphereShape, TORUS_SCHEMA, TorusShape,
};
use crate::model::{Primitive, PrimitiveBuilder, Shape};
use crate::schema::{FieldDef, FieldKind, Schema};
use crate::state::adapter::{Category, PathAccess, SliceAdapter, get_in, set_in, split};

pub static SHAPE_SCHEMA: Schema = Schema::new(
    "ShapeAdapter",
    &[
        FieldDef::new("shapeType", FieldKind::Enum(ShapeType::NAMES)),
        FieldDef::new("sphere", FieldKind::Nested(&SPHERE_SCHEMA)),
        FieldDef::new("ring", FieldKind::Nested(&RING_SCHEMA)),
        FieldDef::new("prism", FieldKind::Nested(&PRISM_SCHEMA)),
        FieldDef::new("cylinder", FieldKind::Nested(&CYLINDER_SCHEMA)),
        FieldDef::new("polyhedron", FieldKind::Nested(&POLYHEDRON_SCHEMA)),
        FieldDef::new("torus", FieldKind::Nested(&TORUS_SCHEMA)),
        FieldDef::new("capsule", FieldKind::Nested(&CAPSULE_SCHEMA)),
        FieldDef::new("cone", FieldKind::Nested(&CONE_SCHEMA)),
        FieldDef::new("jet", FieldKind::Nested(&JET_SCHEMA)),
        FieldDef::new("rays", FieldKind::Nested(&RAYS_SCHEMA)),
        FieldDef::new("kamehameha", FieldKind::Nested(&KAMEHAMEHA_SCHEMA)),
        FieldDef::new("molecule", FieldKind::Nested(&MOLECULE_SCHEMA)),
    ],
);

#[derive(Debug, Clone, Default)]
pub struct ShapeAdapter {
    shape_type: ShapeType,
    sphere: SphereShape,
    ring: RingShape,
    prism: PrismShape,
    cylinder: CylinderShape,
    polyhedron: PolyhedronShape,
    torus: TorusShape,
    capsule: CapsuleShape,
    cone: ConeShape,
    jet: JetShape,
    rays: RaysShape,
    kamehameha: KamehamehaShape,
    molecule: MoleculeShape,
}

impl ShapeAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shape_type(&self) -> ShapeType {
        self.shape_type
    }

    /// The active payload as a `Shape`
    pub fn current_shape(&self) -> Shape {
        match self.shape_type {
            ShapeType::Sphere => Shape::Sphere(self.sphere.clone()),
            ShapeType::Ring => Shape::Ring(self.ring.clone()),
            ShapeType::Prism => Shape::Prism(self.prism.clone()),
            ShapeType::Cylinder => Shape::Cylinder(self.cylinder.clone()),
            ShapeType::Polyhedron => Shape::Polyhedron(self.polyhedron.clone()),
            ShapeType::Torus => Shape::Torus(self.torus.clone()),
            ShapeType::Capsule => Shape::Capsule(self.capsule.clone()),
            ShapeType::Cone => Shape::Cone(self.cone.clone()),
            ShapeType::Jet => Shape::Jet(self.jet.clone()),
            ShapeType::Rays => Shape::Rays(self.rays.clone()),
            ShapeType::Kamehameha => Shape::Kamehameha(self.kamehameha.clone()),
            ShapeType::Molecule => Shape::Molecule(self.molecule.clone()),
        }
    }

    /// Take back an earlier working copy when it still describes the active
    /// shape, so its inactive payloads survive a reload
    pub fn restore(&mut self, previous: ShapeAdapter) {
        if previous.current_shape() == self.current_shape() {
            *self = previous;
        }
    }

    fn set_shape_type(&mut self, v: &Value) {
        let requested = v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string());
        self.shape_type = ShapeType::try_from_name(&requested).unwrap_or_else(|| {
            warn!(shape_type = %requested, fallback = %ShapeType::default(), "Unknown shape type");
            ShapeType::default()
        });
    }

    fn get_payload(&self, ty: ShapeType, field: Option<&str>) -> Option<Value> {
        match ty {
            ShapeType::Sphere => get_in(&self.sphere, field),
            ShapeType::Ring => get_in(&self.ring, field),
            ShapeType::Prism => get_in(&self.prism, field),
            ShapeType::Cylinder => get_in(&self.cylinder, field),
            ShapeType::Polyhedron => get_in(&self.polyhedron, field),
            ShapeType::Torus => get_in(&self.torus, field),
            ShapeType::Capsule => get_in(&self.capsule, field),
            ShapeType::Cone => get_in(&self.cone, field),
            ShapeType::Jet => get_in(&self.jet, field),
            ShapeType::Rays => get_in(&self.rays, field),
            ShapeType::Kamehameha => get_in(&self.kamehameha, field),
            ShapeType::Molecule => get_in(&self.molecule, field),
        }
    }

    fn set_payload(&mut self, ty: ShapeType, field: Option<&str>, v: &Value) -> bool {
        match ty {
            ShapeType::Sphere => set_in(&mut self.sphere, field, v),
            ShapeType::Ring => set_in(&mut self.ring, field, v),
            ShapeType::Prism => set_in(&mut self.prism, field, v),
            ShapeType::Cylinder => set_in(&mut self.cylinder, field, v),
            ShapeType::Polyhedron => set_in(&mut self.polyhedron, field, v),
            ShapeType::Torus => set_in(&mut self.torus, field, v),
            ShapeType::Capsule => set_in(&mut self.capsule, field, v),
            ShapeType::Cone => set_in(&mut self.cone, field, v),
            ShapeType::Jet => set_in(&mut self.jet, field, v),
            ShapeType::Rays => set_in(&mut self.rays, field, v),
            ShapeType::Kamehameha => set_in(&mut self.kamehameha, field, v),
            ShapeType::Molecule => set_in(&mut self.molecule, field, v),
        }
    }

    fn store(&mut self, shape: &Shape) {
        match shape {
            Shape::Sphere(s) => self.sphere = s.clone(),
            Shape::Ring(s) => self.ring = s.clone(),
            Shape::Prism(s) => self.prism = s.clone(),
            Shape::Cylinder(s) => self.cylinder = s.clone(),
            Shape::Polyhedron(s) => self.polyhedron = s.clone(),
            Shape::Torus(s) => self.torus = s.clone(),
            Shape::Capsule(s) => self.capsule = s.clone(),
            Shape::Cone(s) => self.cone = s.clone(),
            Shape::Jet(s) => self.jet = s.clone(),
            Shape::Rays(s) => self.rays = s.clone(),
            Shape::Kamehameha(s) => self.kamehameha = s.clone(),
            Shape::Molecule(s) => self.molecule = s.clone(),
        }
        self.shape_type = shape.shape_type();
    }
}

/// Payload named by an exact path segment (`"torus"`), not an alias
fn variant(segment: &str) -> Option<ShapeType> {
    ShapeType::ALL.iter().copied().find(|t| t.name() == segment)
}

impl PathAccess for ShapeAdapter {
    fn category(&self) -> Category {
        Category::Shape
    }

    fn get(&self, path: &str) -> Option<Value> {
        if path.is_empty() {
            return serde_json::to_value(self.current_shape()).ok();
        }
        if path == "shapeType" {
            return Some(Value::from(self.shape_type.name()));
        }
        let (head, rest) = split(path);
        match variant(head) {
            Some(ty) => self.get_payload(ty, rest),
            None => self.get_payload(self.shape_type, Some(path)),
        }
    }

    fn set(&mut self, path: &str, v: &Value) -> bool {
        if path.is_empty() {
            return match serde_json::from_value::<Shape>(v.clone()) {
                Ok(shape) => {
                    self.store(&shape);
                    true
                }
                Err(_) => false,
            };
        }
        if path == "shapeType" {
            self.set_shape_type(v);
            return true;
        }
        let (head, rest) = split(path);
        match variant(head) {
            Some(ty) => self.set_payload(ty, rest, v),
            None => self.set_payload(self.shape_type, Some(path), v),
        }
    }

    fn schema(&self) -> &'static Schema {
        &SHAPE_SCHEMA
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

impl SliceAdapter<Primitive, PrimitiveBuilder> for ShapeAdapter {
    /// Inactive payloads return to their defaults; only the primitive's own
    /// shape carries over.
    fn load_from(&mut self, source: &Primitive) {
        self.reset();
        self.store(&source.shape);
    }

    fn save_to(&self, builder: &mut PrimitiveBuilder) {
        builder.shape(self.current_shape());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_switching_type_keeps_payloads() {
        let mut adapter = ShapeAdapter::new();
        assert!(adapter.set("radius", &json!(2.5)));
        assert!(adapter.set("shapeType", &json!("torus")));
        assert!(adapter.set("majorRadius", &json!(3.0)));
        assert!(adapter.set("shapeType", &json!("sphere")));

        assert_eq!(adapter.get("radius"), Some(json!(2.5)));
        assert_eq!(adapter.get("torus.majorRadius"), Some(json!(3.0)));
    }

    #[test]
    fn test_current_shape_follows_discriminator() {
        let mut adapter = ShapeAdapter::new();
        adapter.set("ring.segments", &json!(12));
        adapter.set("shapeType", &json!("RING"));
        match adapter.current_shape() {
            Shape::Ring(ring) => assert_eq!(ring.segments, 12),
            other => panic!("expected ring, got {:?}", other.shape_type()),
        }
    }

    #[test]
    fn test_unknown_shape_type_falls_back_to_sphere() {
        let mut adapter = ShapeAdapter::new();
        adapter.set("shapeType", &json!("torus"));
        adapter.set("shapeType", &json!("hypercube"));
        assert_eq!(adapter.shape_type(), ShapeType::Sphere);
        assert_eq!(adapter.get("shapeType"), Some(json!("sphere")));
    }

    #[test]
    fn test_shape_type_alias() {
        let mut adapter = ShapeAdapter::new();
        adapter.set("shapeType", &json!("cube"));
        assert_eq!(adapter.shape_type(), ShapeType::Polyhedron);
    }

    #[test]
    fn test_every_leaf_path_resolves() {
        let adapter = ShapeAdapter::new();
        for path in adapter.paths() {
            assert!(adapter.get(path).is_some(), "unresolved path {path}");
        }
    }

    #[test]
    fn test_round_trip_from_primitive() {
        let mut builder = PrimitiveBuilder::new("beam");
        builder.shape(Shape::Jet(JetShape::default()));
        let primitive = builder.build();

        let mut adapter = ShapeAdapter::new();
        adapter.load_from(&primitive);
        let mut out = primitive.to_builder();
        adapter.save_to(&mut out);
        assert_eq!(out.build(), primitive);
    }

    #[test]
    fn test_load_resets_inactive_payloads() {
        let mut adapter = ShapeAdapter::new();
        adapter.set("torus.majorRadius", &json!(9.0));
        adapter.load_from(&Primitive::new("p"));
        assert_eq!(adapter.get("torus"), get_in(&TorusShape::default(), None));
    }

    #[test]
    fn test_restore_keeps_inactive_payloads() {
        let mut adapter = ShapeAdapter::new();
        adapter.set("radius", &json!(2.5));
        adapter.set("shapeType", &json!("torus"));
        let mut builder = PrimitiveBuilder::new("p");
        adapter.save_to(&mut builder);
        let primitive = builder.build();

        let previous = adapter.clone();
        adapter.load_from(&primitive);
        assert_eq!(adapter.get("sphere.radius"), Some(json!(1.0)));
        adapter.restore(previous);
        assert_eq!(adapter.get("sphere.radius"), Some(json!(2.5)));

        let stale = adapter.clone();
        adapter.set("shapeType", &json!("ring"));
        adapter.restore(stale);
        assert_eq!(adapter.shape_type(), ShapeType::Ring);
    }

    #[test]
    fn test_unknown_field_is_noop() {
        let mut adapter = ShapeAdapter::new();
        assert!(!adapter.set("sphere.wingspan", &json!(1)));
        assert!(!adapter.set("wingspan", &json!(1)));
        assert_eq!(adapter.get("wingspan"), None);
    }
}
