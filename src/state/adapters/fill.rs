//! Fill adapter: fill mode flags plus the nested cage options

use serde_json::Value;

use crate::model::surface::FILL_SCHEMA;
use crate::model::{FillConfig, Primitive, PrimitiveBuilder, Rebuild};
use crate::schema::Schema;
use crate::state::adapter::{
    Category, PathAccess, SliceAdapter, field_path, get_in, set_in, split,
};

#[derive(Debug, Clone, Default)]
pub struct FillAdapter {
    fill: FillConfig,
}

impl FillAdapter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PathAccess for FillAdapter {
    fn category(&self) -> Category {
        Category::Fill
    }

    fn get(&self, path: &str) -> Option<Value> {
        let Some(path) = field_path(path) else {
            return get_in(&self.fill, None);
        };
        match split(path) {
            ("cage", rest) => get_in(&self.fill.cage, rest),
            _ => get_in(&self.fill, Some(path)),
        }
    }

    fn set(&mut self, path: &str, v: &Value) -> bool {
        let Some(path) = field_path(path) else {
            return set_in(&mut self.fill, None, v);
        };
        match split(path) {
            ("cage", rest) => {
                let mut cage = self.fill.cage.clone();
                let applied = set_in(&mut cage, rest, v);
                if applied {
                    self.fill = self.fill.to_builder().with(|f| f.cage = cage).build();
                }
                applied
            }
            _ => set_in(&mut self.fill, Some(path), v),
        }
    }

    fn schema(&self) -> &'static Schema {
        &FILL_SCHEMA
    }

    fn reset(&mut self) {
        self.fill = FillConfig::default();
    }
}

impl SliceAdapter<Primitive, PrimitiveBuilder> for FillAdapter {
    fn load_from(&mut self, source: &Primitive) {
        self.fill = source.fill.clone();
    }

    fn save_to(&self, builder: &mut PrimitiveBuilder) {
        builder.fill(self.fill.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_mode_and_depth_test() {
        let mut adapter = FillAdapter::new();
        assert_eq!(adapter.get("mode"), Some(json!("SOLID")));
        assert!(adapter.set("mode", &json!("WIRE")));
        assert_eq!(adapter.get("mode"), Some(json!("WIRE")));
        assert!(adapter.set("depthTest", &json!("true")));
        assert_eq!(adapter.get("depthTest"), Some(json!(true)));
    }

    #[test]
    fn test_cage_nested_path() {
        let mut adapter = FillAdapter::new();
        assert!(adapter.set("cage.latitudeCount", &json!("12")));
        assert_eq!(adapter.get("cage.latitudeCount"), Some(json!(12)));
        assert!(!adapter.set("cage.bars", &json!(1)));
    }

    #[test]
    fn test_every_leaf_path_resolves() {
        let adapter = FillAdapter::new();
        for path in adapter.paths() {
            assert!(adapter.get(path).is_some(), "unresolved path {path}");
        }
    }
}
