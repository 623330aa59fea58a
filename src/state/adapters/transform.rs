//! Transform adapter
//!
//! Routes `orbit.<field>` and the three-level `orbit3d.<axis>.<field>` in
//! addition to the transform's own scalar fields.

use serde_json::Value;

use crate::model::transform::TRANSFORM_SCHEMA;
use crate::model::{Orbit3dConfig, Primitive, PrimitiveBuilder, Rebuild, TransformConfig};
use crate::schema::Schema;
use crate::state::adapter::{
    Category, PathAccess, SliceAdapter, field_path, get_in, set_in, split,
};

#[derive(Debug, Clone, Default)]
pub struct TransformAdapter {
    transform: TransformConfig,
}

impl TransformAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_orbit3d(&self, rest: Option<&str>) -> Option<Value> {
        let orbit3d = &self.transform.orbit3d;
        let Some(rest) = rest else {
            return get_in(orbit3d, None);
        };
        let (head, tail) = split(rest);
        match orbit3d.axis(head) {
            Some(axis) => get_in(axis, tail),
            None => get_in(orbit3d, Some(rest)),
        }
    }

    fn set_orbit3d(&mut self, rest: Option<&str>, v: &Value) -> bool {
        let mut orbit3d: Orbit3dConfig = self.transform.orbit3d.clone();
        let applied = match rest {
            None => set_in(&mut orbit3d, None, v),
            Some(rest) => {
                let (head, tail) = split(rest);
                match orbit3d.axis_mut(head) {
                    Some(axis) => set_in(axis, tail, v),
                    None => set_in(&mut orbit3d, Some(rest), v),
                }
            }
        };
        if applied {
            self.transform = self.transform.to_builder().with(|t| t.orbit3d = orbit3d).build();
        }
        applied
    }
}

impl PathAccess for TransformAdapter {
    fn category(&self) -> Category {
        Category::Transform
    }

    fn get(&self, path: &str) -> Option<Value> {
        let Some(path) = field_path(path) else {
            return get_in(&self.transform, None);
        };
        match split(path) {
            ("orbit", rest) => get_in(&self.transform.orbit, rest),
            ("orbit3d", rest) => self.get_orbit3d(rest),
            _ => get_in(&self.transform, Some(path)),
        }
    }

    fn set(&mut self, path: &str, v: &Value) -> bool {
        let Some(path) = field_path(path) else {
            return set_in(&mut self.transform, None, v);
        };
        match split(path) {
            ("orbit", rest) => {
                let mut orbit = self.transform.orbit.clone();
                let applied = set_in(&mut orbit, rest, v);
                if applied {
                    self.transform = self.transform.to_builder().with(|t| t.orbit = orbit).build();
                }
                applied
            }
            ("orbit3d", rest) => self.set_orbit3d(rest, v),
            _ => set_in(&mut self.transform, Some(path), v),
        }
    }

    fn schema(&self) -> &'static Schema {
        &TRANSFORM_SCHEMA
    }

    fn reset(&mut self) {
        self.transform = TransformConfig::default();
    }
}

impl SliceAdapter<Primitive, PrimitiveBuilder> for TransformAdapter {
    fn load_from(&mut self, source: &Primitive) {
        self.transform = source.transform.clone();
    }

    fn save_to(&self, builder: &mut PrimitiveBuilder) {
        builder.transform(self.transform.clone());
    }
}
