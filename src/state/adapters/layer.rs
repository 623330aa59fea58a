//! Layer adapter: properties of the selected layer. The primitive list is
//! owned by the aggregate state, never by this adapter.

use serde_json::Value;

use crate::model::definition::LAYER_SCHEMA;
use crate::model::{FieldAccess, Layer, LayerBuilder, Rebuild};
use crate::schema::Schema;
use crate::state::adapter::{Category, PathAccess, SliceAdapter, field_path};

#[derive(Debug, Clone)]
pub struct LayerAdapter {
    /// Working properties; `primitives` stays empty
    layer: Layer,
}

impl Default for LayerAdapter {
    fn default() -> Self {
        Self {
            layer: LayerBuilder::default().build(),
        }
    }
}

impl LayerAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.layer.name
    }
}

impl PathAccess for LayerAdapter {
    fn category(&self) -> Category {
        Category::Layer
    }

    /// The empty path reads the layer properties without the primitive list
    fn get(&self, path: &str) -> Option<Value> {
        match field_path(path) {
            Some(name) => self.layer.field(name),
            None => {
                let mut props = serde_json::Map::new();
                for field in LAYER_SCHEMA.fields {
                    if let Some(v) = self.layer.field(field.name) {
                        props.insert(field.name.to_string(), v);
                    }
                }
                Some(Value::Object(props))
            }
        }
    }

    /// Only single fields are writable here; whole-layer edits go through
    /// the structural merge operations
    fn set(&mut self, path: &str, v: &Value) -> bool {
        let Some(name) = field_path(path) else {
            return false;
        };
        let mut applied = false;
        let rebuilt = Rebuild::to_builder(&self.layer)
            .with(|l| applied = l.set_field(name, v))
            .build();
        if applied {
            self.layer = rebuilt;
        }
        applied
    }

    fn schema(&self) -> &'static Schema {
        &LAYER_SCHEMA
    }

    /// The name is the layer's identity and survives a reset
    fn reset(&mut self) {
        let name = std::mem::take(&mut self.layer.name);
        *self = Self::default();
        self.layer.name = name;
    }
}

impl SliceAdapter<Layer, LayerBuilder> for LayerAdapter {
    fn load_from(&mut self, source: &Layer) {
        self.layer = Layer {
            name: source.name.clone(),
            alpha: source.alpha,
            visible: source.visible,
            blend_mode: source.blend_mode,
            primitives: Vec::new(),
        };
    }

    fn save_to(&self, builder: &mut LayerBuilder) {
        builder
            .name(self.layer.name.clone())
            .alpha(self.layer.alpha)
            .visible(self.layer.visible)
            .blend_mode(self.layer.blend_mode);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Primitive;
    use serde_json::json;

    #[test]
    fn test_alpha_clamped_and_blend_alias() {
        let mut adapter = LayerAdapter::new();
        assert!(adapter.set("alpha", &json!("1.7")));
        assert_eq!(adapter.get("alpha"), Some(json!(1.0)));
        assert!(adapter.set("blendMode", &json!("additive")));
        assert_eq!(adapter.get("blendMode"), Some(json!("ADD")));
    }

    #[test]
    fn test_round_trip_keeps_primitives_out() {
        let layer = Layer::new("core");
        let mut adapter = LayerAdapter::new();
        adapter.load_from(&layer);
        assert_eq!(adapter.name(), "core");

        let mut builder = layer.to_builder();
        adapter.save_to(&mut builder);
        let rebuilt = builder.build();
        assert_eq!(rebuilt, layer);
        assert_eq!(rebuilt.primitives, vec![Primitive::default()]);
    }

    #[test]
    fn test_whole_layer_read_has_no_primitives() {
        let adapter = LayerAdapter::new();
        let whole = adapter.get("").unwrap();
        assert!(whole.get("primitives").is_none());
        assert_eq!(whole["visible"], json!(true));
        assert!(!LayerAdapter::new().set("", &json!({})));
    }
}
