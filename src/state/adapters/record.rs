//! Adapter for categories whose slice is a single flat record

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::model::{
    AppearanceConfig, ArrangementConfig, DefinitionBuilder, FieldAccess, FieldDefinition,
    Modifiers, Primitive, PrimitiveBuilder, RayFlowConfig, Rebuild, ShockwaveConfig,
    VisibilityMask,
};
use crate::schema::Schema;
use crate::state::adapter::{Category, PathAccess, SliceAdapter, field_path, get_in, set_in};

/// A flat record that is one category's slice of some aggregate
pub trait RecordSlice: FieldAccess + Rebuild + Default + Serialize + DeserializeOwned {
    const CATEGORY: Category;
    type Source;
    type Builder;

    fn slice_of(source: &Self::Source) -> &Self;
    fn store(self, builder: &mut Self::Builder);
}

#[derive(Debug, Clone, Default)]
pub struct RecordAdapter<T> {
    value: T,
}

impl<T: RecordSlice> RecordAdapter<T> {
    pub fn new() -> Self {
        Self { value: T::default() }
    }

    pub fn value(&self) -> &T {
        &self.value
    }
}

impl<T: RecordSlice> PathAccess for RecordAdapter<T> {
    fn category(&self) -> Category {
        T::CATEGORY
    }

    fn get(&self, path: &str) -> Option<Value> {
        get_in(&self.value, field_path(path))
    }

    fn set(&mut self, path: &str, value: &Value) -> bool {
        set_in(&mut self.value, field_path(path), value)
    }

    fn schema(&self) -> &'static Schema {
        T::schema()
    }

    fn reset(&mut self) {
        self.value = T::default();
    }
}

impl<T: RecordSlice> SliceAdapter<T::Source, T::Builder> for RecordAdapter<T> {
    fn load_from(&mut self, source: &T::Source) {
        self.value = T::slice_of(source).clone();
    }

    fn save_to(&self, builder: &mut T::Builder) {
        T::store(self.value.clone(), builder);
    }
}

pub type VisibilityAdapter = RecordAdapter<VisibilityMask>;
pub type ArrangementAdapter = RecordAdapter<ArrangementConfig>;
pub type AppearanceAdapter = RecordAdapter<AppearanceConfig>;
pub type RayFlowAdapter = RecordAdapter<RayFlowConfig>;
pub type ShockwaveAdapter = RecordAdapter<ShockwaveConfig>;
pub type ModifiersAdapter = RecordAdapter<Modifiers>;

impl RecordSlice for VisibilityMask {
    const CATEGORY: Category = Category::Visibility;
    type Source = Primitive;
    type Builder = PrimitiveBuilder;

    fn slice_of(source: &Primitive) -> &Self {
        &source.visibility
    }

    fn store(self, builder: &mut PrimitiveBuilder) {
        builder.visibility(self);
    }
}

impl RecordSlice for ArrangementConfig {
    const CATEGORY: Category = Category::Arrangement;
    type Source = Primitive;
    type Builder = PrimitiveBuilder;

    fn slice_of(source: &Primitive) -> &Self {
        &source.arrangement
    }

    fn store(self, builder: &mut PrimitiveBuilder) {
        builder.arrangement(self);
    }
}

impl RecordSlice for AppearanceConfig {
    const CATEGORY: Category = Category::Appearance;
    type Source = Primitive;
    type Builder = PrimitiveBuilder;

    fn slice_of(source: &Primitive) -> &Self {
        &source.appearance
    }

    fn store(self, builder: &mut PrimitiveBuilder) {
        builder.appearance(self);
    }
}

impl RecordSlice for RayFlowConfig {
    const CATEGORY: Category = Category::RayFlow;
    type Source = Primitive;
    type Builder = PrimitiveBuilder;

    fn slice_of(source: &Primitive) -> &Self {
        &source.ray_flow
    }

    fn store(self, builder: &mut PrimitiveBuilder) {
        builder.ray_flow(self);
    }
}

impl RecordSlice for ShockwaveConfig {
    const CATEGORY: Category = Category::Shockwave;
    type Source = FieldDefinition;
    type Builder = DefinitionBuilder;

    fn slice_of(source: &FieldDefinition) -> &Self {
        &source.shockwave
    }

    fn store(self, builder: &mut DefinitionBuilder) {
        builder.shockwave(self);
    }
}

impl RecordSlice for Modifiers {
    const CATEGORY: Category = Category::Modifiers;
    type Source = FieldDefinition;
    type Builder = DefinitionBuilder;

    fn slice_of(source: &FieldDefinition) -> &Self {
        &source.modifiers
    }

    fn store(self, builder: &mut DefinitionBuilder) {
        builder.modifiers(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_round_trip_from_primitive() {
        let mut primitive = Primitive::new("core");
        primitive.appearance.alpha = 0.4;
        primitive.appearance.color = "#FF112233".to_string();

        let mut adapter = AppearanceAdapter::new();
        adapter.load_from(&primitive);

        let mut builder = primitive.to_builder();
        adapter.save_to(&mut builder);
        assert_eq!(builder.build(), primitive);
    }

    #[test]
    fn test_every_leaf_path_resolves() {
        let adapter = VisibilityAdapter::new();
        for path in adapter.paths() {
            assert!(adapter.get(path).is_some(), "unresolved path {path}");
        }
    }

    #[test]
    fn test_travel_coupling_through_adapter() {
        let mut adapter = RayFlowAdapter::new();
        assert!(adapter.set("travel", &json!("CHASE")));
        assert_eq!(adapter.get("travelEnabled"), Some(json!(true)));
        assert!(adapter.set("travel", &json!("NONE")));
        assert_eq!(adapter.get("travelEnabled"), Some(json!(false)));
    }

    #[test]
    fn test_unknown_path_is_noop() {
        let mut adapter = ModifiersAdapter::new();
        let before = adapter.value().clone();
        assert!(!adapter.set("totally.bogus.path", &json!(3)));
        assert_eq!(adapter.get("totally.bogus.path"), None);
        assert_eq!(adapter.value(), &before);
    }

    #[test]
    fn test_set_clamps_through_builder() {
        let mut adapter = AppearanceAdapter::new();
        assert!(adapter.set("alpha", &json!(7)));
        assert_eq!(adapter.get("alpha"), Some(json!(1.0)));
    }

    #[test]
    fn test_whole_record_read() {
        let adapter = ShockwaveAdapter::new();
        let whole = adapter.get("").unwrap();
        assert_eq!(whole["shape"], json!("RING"));
    }

    #[test]
    fn test_definition_level_round_trip() {
        let mut definition = FieldDefinition::default();
        definition.modifiers.bobbing = 0.25;

        let mut adapter = ModifiersAdapter::new();
        adapter.load_from(&definition);
        let mut builder = definition.to_builder();
        adapter.save_to(&mut builder);
        assert_eq!(builder.build(), definition);
    }
}
