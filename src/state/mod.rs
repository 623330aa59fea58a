//! Aggregate edit state
//!
//! `FieldEditState` owns one adapter per category, the layer list and the
//! current layer/primitive selection. Paths are routed by their first segment
//! to exactly one adapter. After every applied edit the selected primitive or
//! layer is rebuilt from the adapters and stored back into the layer list, so
//! `to_definition()` never sees stale data.

pub mod adapter;
pub mod adapters;

use serde_json::Value;
use tracing::{debug, warn};

use crate::constants::merge::DEFAULT_LAYER_NAME;
use crate::model::{
    DefinitionBuilder, FieldDefinition, Layer, LayerBuilder, Primitive, PrimitiveBuilder,
};
use crate::schema::FieldKind;

pub use adapter::{Category, PathAccess, Scope, SliceAdapter};
use adapters::{
    AnimationAdapter, AppearanceAdapter, ArrangementAdapter, FillAdapter, LayerAdapter,
    LinkAdapter, ModifiersAdapter, RayFlowAdapter, ShapeAdapter, ShockwaveAdapter,
    TransformAdapter, VisibilityAdapter,
};

#[derive(Debug, Clone)]
pub struct FieldEditState {
    id: String,
    layers: Vec<Layer>,
    layer_index: usize,
    primitive_index: usize,
    dirty: bool,

    shape: ShapeAdapter,
    transform: TransformAdapter,
    fill: FillAdapter,
    visibility: VisibilityAdapter,
    arrangement: ArrangementAdapter,
    appearance: AppearanceAdapter,
    animation: AnimationAdapter,
    link: LinkAdapter,
    ray_flow: RayFlowAdapter,
    layer: LayerAdapter,
    shockwave: ShockwaveAdapter,
    modifiers: ModifiersAdapter,
}

impl Default for FieldEditState {
    fn default() -> Self {
        Self::from_definition(&FieldDefinition::default())
    }
}

impl FieldEditState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start editing `definition` with the first primitive of the first layer
    /// selected. Layers are taken as they are; a missing layer or primitive is
    /// only created when an edit needs somewhere to land.
    pub fn from_definition(definition: &FieldDefinition) -> Self {
        let mut state = Self {
            id: definition.id.clone(),
            layers: definition.layers.clone(),
            layer_index: 0,
            primitive_index: 0,
            dirty: false,
            shape: ShapeAdapter::new(),
            transform: TransformAdapter::new(),
            fill: FillAdapter::new(),
            visibility: VisibilityAdapter::new(),
            arrangement: ArrangementAdapter::new(),
            appearance: AppearanceAdapter::new(),
            animation: AnimationAdapter::new(),
            link: LinkAdapter::new(),
            ray_flow: RayFlowAdapter::new(),
            layer: LayerAdapter::new(),
            shockwave: ShockwaveAdapter::new(),
            modifiers: ModifiersAdapter::new(),
        };
        state.shockwave.load_from(definition);
        state.modifiers.load_from(definition);
        state.load_selection();
        state
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
        self.dirty = true;
    }

    fn adapter(&self, category: Category) -> &dyn PathAccess {
        match category {
            Category::Shape => &self.shape,
            Category::Transform => &self.transform,
            Category::Fill => &self.fill,
            Category::Visibility => &self.visibility,
            Category::Arrangement => &self.arrangement,
            Category::Appearance => &self.appearance,
            Category::Animation => &self.animation,
            Category::Link => &self.link,
            Category::RayFlow => &self.ray_flow,
            Category::Layer => &self.layer,
            Category::Shockwave => &self.shockwave,
            Category::Modifiers => &self.modifiers,
        }
    }

    fn adapter_mut(&mut self, category: Category) -> &mut dyn PathAccess {
        match category {
            Category::Shape => &mut self.shape,
            Category::Transform => &mut self.transform,
            Category::Fill => &mut self.fill,
            Category::Visibility => &mut self.visibility,
            Category::Arrangement => &mut self.arrangement,
            Category::Appearance => &mut self.appearance,
            Category::Animation => &mut self.animation,
            Category::Link => &mut self.link,
            Category::RayFlow => &mut self.ray_flow,
            Category::Layer => &mut self.layer,
            Category::Shockwave => &mut self.shockwave,
            Category::Modifiers => &mut self.modifiers,
        }
    }

    fn route(path: &str) -> Option<(Category, &str)> {
        let (prefix, rest) = path.split_once('.').unwrap_or((path, ""));
        Category::from_prefix(prefix).map(|category| (category, rest))
    }

    /// Value at `path`; `None` for unknown categories and paths
    pub fn get(&self, path: &str) -> Option<Value> {
        let Some((category, rest)) = Self::route(path) else {
            warn!(path = %path, "Unknown category in path");
            return None;
        };
        let adapter = self.adapter(category);
        let value = adapter.get(rest);
        // Absent optional records read as None without being unknown
        if value.is_none() && !adapter.paths().contains(rest) {
            warn!(path = %path, "Unknown path");
        }
        value
    }

    /// Schema kind of the field at `path`, `None` for unknown paths
    pub fn field_kind(&self, path: &str) -> Option<FieldKind> {
        let (category, rest) = Self::route(path)?;
        Some(self.adapter(category).schema().lookup(rest)?.kind)
    }

    /// Apply `value` at `path`. Unknown paths are logged and ignored; the
    /// return value tells whether the edit applied.
    pub fn set(&mut self, path: &str, value: &Value) -> bool {
        let Some((category, rest)) = Self::route(path) else {
            warn!(path = %path, "Unknown category in path, ignoring");
            return false;
        };
        if !self.adapter_mut(category).set(rest, value) {
            warn!(path = %path, value = %value, "Path not applied");
            return false;
        }
        self.ensure_slot(category.scope());
        match category.scope() {
            Scope::Primitive => self.commit_primitive(),
            Scope::Layer => self.commit_layer(),
            Scope::Definition => {}
        }
        debug!(path = %path, value = %value, "Applied");
        self.dirty = true;
        true
    }

    /// Every path of one category, prefixed with the category name
    pub fn paths(&self, category: Category, leaves_only: bool) -> Vec<String> {
        let paths = self.adapter(category).paths();
        paths
            .iter()
            .filter(|p| !leaves_only || !paths.iter().any(|q| is_child(p, q)))
            .map(|p| format!("{}.{}", category.prefix(), p))
            .collect()
    }

    /// Return one category of the current selection to its defaults
    pub fn reset(&mut self, category: Category) {
        self.adapter_mut(category).reset();
        self.ensure_slot(category.scope());
        match category.scope() {
            Scope::Primitive => self.commit_primitive(),
            Scope::Layer => self.commit_layer(),
            Scope::Definition => {}
        }
        self.dirty = true;
    }

    // ==========================================================================
    // Dirty tracking
    // ==========================================================================

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    // ==========================================================================
    // Selection
    // ==========================================================================

    pub fn selection(&self) -> (usize, usize) {
        (self.layer_index, self.primitive_index)
    }

    fn clamp_selection(&self, layer: usize, primitive: usize) -> (usize, usize) {
        let layer = layer.min(self.layers.len().saturating_sub(1));
        let count = self.layers.get(layer).map_or(0, |l| l.primitives.len());
        (layer, primitive.min(count.saturating_sub(1)))
    }

    /// Select a primitive, clamping both indices into range. Returns the
    /// selection actually made. Re-selecting the current primitive keeps the
    /// working adapters, including inactive shape payloads.
    pub fn select(&mut self, layer: usize, primitive: usize) -> (usize, usize) {
        self.commit_primitive();
        self.commit_layer();
        let target = self.clamp_selection(layer, primitive);
        if target != self.selection() {
            (self.layer_index, self.primitive_index) = target;
            self.load_selection();
        }
        self.selection()
    }

    /// Run `edit` with a temporary selection, restoring the previous one after.
    /// The previous primitive's inactive shape payloads survive the detour.
    pub fn with_selection<R>(
        &mut self,
        layer: usize,
        primitive: usize,
        edit: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved = self.selection();
        if self.clamp_selection(layer, primitive) == saved {
            return edit(self);
        }
        let shape = self.shape.clone();
        self.select(layer, primitive);
        let result = edit(self);
        self.select(saved.0, saved.1);
        self.shape.restore(shape);
        result
    }

    pub fn current_layer(&self) -> Option<&Layer> {
        self.layers.get(self.layer_index)
    }

    pub fn current_primitive(&self) -> Option<&Primitive> {
        self.current_layer()?.primitives.get(self.primitive_index)
    }

    /// Shape adapter of the selected primitive, with every payload resident
    pub fn shape_adapter(&self) -> &ShapeAdapter {
        &self.shape
    }

    fn load_selection(&mut self) {
        match self.layers.get(self.layer_index) {
            Some(layer) => self.layer.load_from(layer),
            None => self.layer.load_from(&LayerBuilder::new(DEFAULT_LAYER_NAME).build()),
        }
        let default = Primitive::default();
        let primitive = self
            .layers
            .get(self.layer_index)
            .and_then(|l| l.primitives.get(self.primitive_index))
            .unwrap_or(&default);
        self.shape.load_from(primitive);
        self.transform.load_from(primitive);
        self.fill.load_from(primitive);
        self.visibility.load_from(primitive);
        self.arrangement.load_from(primitive);
        self.appearance.load_from(primitive);
        self.animation.load_from(primitive);
        self.link.load_from(primitive);
        self.ray_flow.load_from(primitive);
    }

    /// Create the layer and primitive an edit of `scope` lands in when the
    /// selection points at nothing
    fn ensure_slot(&mut self, scope: Scope) {
        if scope == Scope::Definition {
            return;
        }
        if self.layers.is_empty() {
            let mut builder = LayerBuilder::new(DEFAULT_LAYER_NAME);
            self.layer.save_to(&mut builder);
            self.layers.push(builder.build());
            (self.layer_index, self.primitive_index) = (0, 0);
            debug!(layer = DEFAULT_LAYER_NAME, "Created layer for edit");
        }
        if scope == Scope::Primitive
            && let Some(layer) = self.layers.get_mut(self.layer_index)
            && layer.primitives.is_empty()
        {
            layer.primitives.push(Primitive::default());
            self.primitive_index = 0;
            debug!(layer = %layer.name, "Created primitive for edit");
        }
    }

    fn commit_primitive(&mut self) {
        let Some(slot) = self
            .layers
            .get_mut(self.layer_index)
            .and_then(|l| l.primitives.get_mut(self.primitive_index))
        else {
            return;
        };
        let mut builder = PrimitiveBuilder::new(slot.id.clone());
        self.shape.save_to(&mut builder);
        self.transform.save_to(&mut builder);
        self.fill.save_to(&mut builder);
        self.visibility.save_to(&mut builder);
        self.arrangement.save_to(&mut builder);
        self.appearance.save_to(&mut builder);
        self.animation.save_to(&mut builder);
        self.link.save_to(&mut builder);
        self.ray_flow.save_to(&mut builder);
        *slot = builder.build();
    }

    fn commit_layer(&mut self) {
        let Some(slot) = self.layers.get_mut(self.layer_index) else {
            return;
        };
        let mut builder = LayerBuilder::new(slot.name.clone());
        builder.primitives(std::mem::take(&mut slot.primitives));
        self.layer.save_to(&mut builder);
        *slot = builder.build();
    }

    // ==========================================================================
    // Collection access for structural merges
    // ==========================================================================

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn find_layer(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|l| l.name == name)
    }

    pub fn find_primitive(&self, layer: usize, id: &str) -> Option<usize> {
        self.layers.get(layer)?.primitive_index(id)
    }

    /// Append a layer without changing the selection. A layer without
    /// primitives gets one default primitive.
    pub fn push_layer(&mut self, mut layer: Layer) -> usize {
        if layer.primitives.is_empty() {
            layer.primitives.push(Primitive::default());
        }
        self.layers.push(layer);
        self.dirty = true;
        self.layers.len() - 1
    }

    /// Append a primitive to `layer`; `None` if the layer does not exist
    pub fn push_primitive(&mut self, layer: usize, primitive: Primitive) -> Option<usize> {
        let target = self.layers.get_mut(layer)?;
        target.primitives.push(primitive);
        self.dirty = true;
        Some(target.primitives.len() - 1)
    }

    /// Overwrite one primitive in place; reloads the adapters when it is the
    /// selected one. `false` if the slot does not exist.
    pub fn replace_primitive(&mut self, layer: usize, index: usize, primitive: Primitive) -> bool {
        let Some(slot) = self
            .layers
            .get_mut(layer)
            .and_then(|l| l.primitives.get_mut(index))
        else {
            return false;
        };
        *slot = primitive;
        self.dirty = true;
        if (layer, index) == self.selection() {
            self.load_selection();
        }
        true
    }

    /// Immutable definition assembled from the layer list and the
    /// definition-level adapters
    pub fn to_definition(&self) -> FieldDefinition {
        let mut builder = DefinitionBuilder::new(self.id.clone());
        builder.layers(self.layers.clone());
        self.shockwave.save_to(&mut builder);
        self.modifiers.save_to(&mut builder);
        builder.build()
    }
}

fn is_child(parent: &str, path: &str) -> bool {
    path.strip_prefix(parent).is_some_and(|tail| tail.starts_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::FillMode;
    use serde_json::json;

    fn sample_definition() -> FieldDefinition {
        let mut core = Layer::new("core");
        let mut ring = Primitive::new("ring");
        ring.appearance.alpha = 0.5;
        core.primitives.push(ring);

        let mut definition = FieldDefinition::default();
        definition.id = "sample".to_string();
        definition.layers.push(core);
        definition.modifiers.breathing = 0.2;
        definition
    }

    #[test]
    fn test_round_trip_without_edits() {
        let definition = sample_definition();
        let state = FieldEditState::from_definition(&definition);
        assert_eq!(state.to_definition(), definition);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_round_trip_keeps_empty_layer() {
        let mut definition = sample_definition();
        definition.layers.push(LayerBuilder::new("empty").build());
        let mut state = FieldEditState::from_definition(&definition);
        assert_eq!(state.to_definition(), definition);

        assert_eq!(state.select(2, 0), (2, 0));
        assert_eq!(state.to_definition(), definition);
        assert_eq!(state.get("fill.mode"), Some(json!("SOLID")));
        assert!(state.set("layer.alpha", &json!(0.5)));
        assert!(state.layers()[2].primitives.is_empty());

        assert!(state.set("fill.mode", &json!("WIRE")));
        assert_eq!(state.layers()[2].primitives.len(), 1);
        assert_eq!(state.to_definition().layers[2].primitives[0].fill.mode, FillMode::Wire);
    }

    #[test]
    fn test_reselect_keeps_inactive_shape_payloads() {
        let mut state = FieldEditState::new();
        state.set("shape.radius", &json!(2.5));
        state.set("shape.shapeType", &json!("torus"));
        assert_eq!(state.select(0, 0), (0, 0));
        state.set("shape.shapeType", &json!("sphere"));
        assert_eq!(state.get("shape.radius"), Some(json!(2.5)));
    }

    #[test]
    fn test_fill_mode_and_depth_test() {
        let mut state = FieldEditState::new();
        assert_eq!(state.get("fill.mode"), Some(json!("SOLID")));
        assert!(state.set("fill.mode", &json!("WIRE")));
        assert_eq!(state.get("fill.mode"), Some(json!("WIRE")));
        assert!(state.set("fill.depthTest", &json!("true")));
        assert_eq!(state.get("fill.depthTest"), Some(json!(true)));
    }

    #[test]
    fn test_travel_mode_coupling() {
        let mut state = FieldEditState::new();
        state.set("rayFlow.travel", &json!("NONE"));
        assert_eq!(state.get("rayFlow.travelEnabled"), Some(json!(false)));
        state.set("rayFlow.travel", &json!("CHASE"));
        assert_eq!(state.get("rayFlow.travelEnabled"), Some(json!(true)));
    }

    #[test]
    fn test_unknown_path_safety() {
        let mut state = FieldEditState::from_definition(&sample_definition());
        let before = state.to_definition();
        assert_eq!(state.get("totally.bogus.path"), None);
        assert!(!state.set("totally.bogus.path", &json!(42)));
        assert!(!state.set("fill.bogus", &json!(42)));
        assert_eq!(state.to_definition(), before);
        assert!(!state.is_dirty());
    }

    /// Distinct in-type values to try at a leaf, in order
    fn candidates(kind: FieldKind, current: &Value) -> Vec<Value> {
        let values = match kind {
            FieldKind::Float => vec![json!(0.75), json!(0.5), json!(2.0), json!(4.0)],
            FieldKind::Int => vec![json!(4), json!(5), json!(2)],
            FieldKind::Bool => vec![json!(!current.as_bool().unwrap_or(false))],
            FieldKind::Text => vec![json!(format!("{}-edited", current.as_str().unwrap_or("")))],
            FieldKind::Color => vec![json!("#FF336699"), json!("#80996633")],
            FieldKind::Vec3 => vec![json!([0.5, 0.25, 0.75])],
            FieldKind::Enum(names) => names.iter().map(|n| json!(n)).collect(),
            FieldKind::Nested(_) | FieldKind::Optional(_) => Vec::new(),
        };
        values.into_iter().filter(|v| v != current).collect()
    }

    #[test]
    fn test_set_get_consistency_for_every_leaf() {
        let mut state = FieldEditState::new();
        for category in Category::ALL {
            for path in state.paths(*category, true) {
                if state.get(&path).is_none() {
                    assert!(state.set(&path, &json!(0)), "unsettable path {path}");
                }
                let kind = state.field_kind(&path).unwrap();
                let current = state.get(&path).unwrap();
                let candidates = candidates(kind, &current);
                assert!(!candidates.is_empty(), "no new value for {path}");
                let accepted = candidates.iter().any(|v| {
                    assert!(state.set(&path, v), "rejected {v} at {path}");
                    state.get(&path).as_ref() == Some(v)
                });
                assert!(accepted, "no new value read back unchanged at {path}");
            }
        }
    }

    #[test]
    fn test_out_of_range_values_read_back_clamped() {
        let mut state = FieldEditState::new();
        state.set("appearance.alpha", &json!(2.0));
        assert_eq!(state.get("appearance.alpha"), Some(json!(1.0)));
        state.set("shape.sphere.latSteps", &json!(1));
        assert_eq!(state.get("shape.sphere.latSteps"), Some(json!(3)));
        state.set("appearance.alpha", &json!(0.4));
        assert_eq!(state.get("appearance.alpha"), Some(json!(0.4)));
    }

    #[test]
    fn test_unknown_leaf_in_known_category() {
        let state = FieldEditState::new();
        assert_eq!(state.get("fill.bogus"), None);
        assert_eq!(state.get("shape.wingspan"), None);
        assert_eq!(state.get("animation.wobble.speed"), None);
        assert_eq!(state.field_kind("fill.bogus").map(|k| k.type_name()), None);
        assert_eq!(state.field_kind("fill.mode").map(|k| k.type_name()), Some("enum"));
    }

    #[test]
    fn test_edits_commit_into_definition() {
        let mut state = FieldEditState::new();
        state.set("appearance.color", &json!("#00FF00"));
        state.set("layer.alpha", &json!(0.25));
        state.set("shockwave.enabled", &json!(true));

        let definition = state.to_definition();
        assert_eq!(definition.layers[0].primitives[0].appearance.color, "#FF00FF00");
        assert_eq!(definition.layers[0].alpha, 0.25);
        assert!(definition.shockwave.enabled);
    }

    #[test]
    fn test_select_loads_and_clamps() {
        let mut state = FieldEditState::from_definition(&sample_definition());
        assert_eq!(state.select(1, 1), (1, 1));
        assert_eq!(state.get("appearance.alpha"), Some(json!(0.5)));

        assert_eq!(state.select(9, 9), (1, 1));
        assert_eq!(state.select(0, 5), (0, 0));
        assert_eq!(state.get("appearance.alpha"), Some(json!(1.0)));
    }

    #[test]
    fn test_with_selection_restores() {
        let mut state = FieldEditState::from_definition(&sample_definition());
        state.with_selection(1, 1, |s| {
            s.set("appearance.glow", &json!(0.75));
        });
        assert_eq!(state.selection(), (0, 0));
        assert_eq!(state.layers()[1].primitives[1].appearance.glow, 0.75);
        assert_eq!(state.get("appearance.glow"), Some(json!(0.0)));
    }

    #[test]
    fn test_dirty_tracking() {
        let mut state = FieldEditState::new();
        assert!(!state.is_dirty());
        state.set("transform.scale", &json!(2));
        assert!(state.is_dirty());
        state.mark_saved();
        assert!(!state.is_dirty());
        state.mark_dirty();
        assert!(state.is_dirty());
    }

    #[test]
    fn test_empty_definition_gets_layer_on_first_edit() {
        let definition = FieldDefinition {
            layers: Vec::new(),
            ..FieldDefinition::default()
        };
        let mut state = FieldEditState::from_definition(&definition);
        assert_eq!(state.to_definition(), definition);

        assert!(state.set("modifiers.breathing", &json!(0.5)));
        assert!(state.layers().is_empty());

        assert!(state.set("appearance.glow", &json!(0.5)));
        assert_eq!(state.layers().len(), 1);
        assert_eq!(state.layers()[0].name, DEFAULT_LAYER_NAME);
        assert_eq!(state.layers()[0].primitives.len(), 1);
        assert_eq!(state.layers()[0].primitives[0].appearance.glow, 0.5);
    }

    #[test]
    fn test_leaf_paths_exclude_records() {
        let state = FieldEditState::new();
        let leaves = state.paths(Category::Transform, true);
        assert!(leaves.contains(&"transform.orbit3d.x.amplitude".to_string()));
        assert!(!leaves.contains(&"transform.orbit3d".to_string()));
        assert!(!leaves.contains(&"transform.orbit3d.x".to_string()));

        let all = state.paths(Category::Transform, false);
        assert!(all.contains(&"transform.orbit3d.x".to_string()));
    }

    #[test]
    fn test_reset_category() {
        let mut state = FieldEditState::new();
        state.set("fill.mode", &json!("CAGE"));
        state.reset(Category::Fill);
        assert_eq!(state.get("fill.mode"), Some(json!("SOLID")));
    }
}
