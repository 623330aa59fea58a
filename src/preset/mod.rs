//! Presets and fragments
//!
//! A preset is a JSON merge patch applied to a [`FieldEditState`]. Scalar
//! keys become path edits on the current selection; the `$appendLayers`,
//! `$mergeLayers`, `$appendPrimitives` and `$mergePrimitives` directives add
//! or update identity-keyed entries. Keys are applied in document order.
//! Nothing here returns an error: bad keys and entries are logged and listed
//! in the returned [`ApplyReport`].

pub mod catalog;
pub mod entry;
pub mod merge;
pub mod reconcile;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::constants::merge::{APPEND_LAYERS, APPEND_PRIMITIVES, MERGE_LAYERS, MERGE_PRIMITIVES};
use crate::state::FieldEditState;

pub use catalog::{CatalogKind, PresetRegistry};
pub use entry::PresetEntry;
use merge::EntryKind;
use reconcile::Operation;

/// Outcome of applying one patch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyReport {
    /// Paths successfully set
    pub applied: usize,
    /// Keys or paths that were not applied
    pub ignored: Vec<String>,
    pub layers_appended: usize,
    pub layers_merged: usize,
    pub primitives_appended: usize,
    pub primitives_merged: usize,
}

impl ApplyReport {
    /// Whether anything in the state changed
    pub fn changed(&self) -> bool {
        self.applied > 0
            || self.layers_appended > 0
            || self.layers_merged > 0
            || self.primitives_appended > 0
            || self.primitives_merged > 0
    }

    pub fn absorb(&mut self, other: ApplyReport) {
        self.applied += other.applied;
        self.ignored.extend(other.ignored);
        self.layers_appended += other.layers_appended;
        self.layers_merged += other.layers_merged;
        self.primitives_appended += other.primitives_appended;
        self.primitives_merged += other.primitives_merged;
    }
}

/// Apply a raw merge patch to the state
pub fn apply_patch(state: &mut FieldEditState, patch: &Map<String, Value>) -> ApplyReport {
    let mut report = ApplyReport::default();
    for (key, value) in patch {
        match key.as_str() {
            APPEND_LAYERS => reconcile::layers(state, key, value, Operation::Append, &mut report),
            MERGE_LAYERS => reconcile::layers(state, key, value, Operation::Merge, &mut report),
            APPEND_PRIMITIVES => {
                reconcile::primitives(state, key, value, Operation::Append, &mut report)
            }
            MERGE_PRIMITIVES => {
                reconcile::primitives(state, key, value, Operation::Merge, &mut report)
            }
            _ => merge::apply_key(state, EntryKind::Definition, key, value, &mut report),
        }
    }
    report
}

/// Apply a catalog preset or fragment
pub fn apply(state: &mut FieldEditState, entry: &PresetEntry) -> ApplyReport {
    let report = apply_patch(state, &entry.merge_patch);
    info!(
        preset = %format!("{}/{}", entry.category, entry.id),
        applied = report.applied,
        ignored = report.ignored.len(),
        layers_appended = report.layers_appended,
        layers_merged = report.layers_merged,
        primitives_appended = report.primitives_appended,
        primitives_merged = report.primitives_merged,
        "Applied preset"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Layer;
    use crate::model::enums::BlendMode;
    use serde_json::json;

    fn preset(patch: Value) -> PresetEntry {
        PresetEntry::from_document("test", "misc", json!({ "merge": patch })).unwrap()
    }

    #[test]
    fn test_merge_layers_creates_missing_layer() {
        let mut state = FieldEditState::new();
        let report = apply(
            &mut state,
            &preset(json!({"$mergeLayers": [{"name": "Glow", "alpha": 0.5}]})),
        );

        let glow: Vec<&Layer> = state.layers().iter().filter(|l| l.name == "Glow").collect();
        assert_eq!(glow.len(), 1);
        assert_eq!(glow[0].alpha, 0.5);
        assert!(glow[0].visible);
        assert_eq!(glow[0].blend_mode, BlendMode::default());
        assert_eq!(glow[0].primitives.len(), 1);
        assert_eq!(report.layers_appended, 1);
        assert!(state.is_dirty());
    }

    #[test]
    fn test_append_never_overwrites() {
        let mut state = FieldEditState::new();
        let entry = preset(json!({"$appendLayers": [{"name": "Core", "alpha": 0.25}]}));
        apply(&mut state, &entry);
        apply(&mut state, &entry);

        assert_eq!(state.layers().len(), 3);
        let first = state.find_layer("Core").unwrap();
        let second = state.find_layer("Core_2").unwrap();
        assert_ne!(first, second);

        let mut report = ApplyReport::default();
        reconcile::layers(
            &mut state,
            MERGE_LAYERS,
            &json!([{"name": "Core_2", "visible": false}]),
            Operation::Merge,
            &mut report,
        );
        assert!(state.layers()[first].visible);
        assert!(!state.layers()[second].visible);
    }

    #[test]
    fn test_merge_preset_is_idempotent() {
        let entry = preset(json!({
            "fill": {"mode": "WIRE"},
            "glow": 0.8,
            "shockwave": {"enabled": true, "rings": 3},
            "$mergeLayers": [
                {"name": "Glow", "blendMode": "ADD", "primitives": [{"id": "halo", "radius": 2.0}]}
            ],
            "$mergePrimitives": [{"id": "primitive", "spinSpeed": 4.0}]
        }));

        let mut once = FieldEditState::new();
        apply(&mut once, &entry);
        let mut twice = FieldEditState::new();
        apply(&mut twice, &entry);
        apply(&mut twice, &entry);

        assert_eq!(once.to_definition(), twice.to_definition());
        assert_eq!(once.selection(), twice.selection());
    }

    #[test]
    fn test_keys_apply_in_document_order() {
        let mut state = FieldEditState::new();
        let report = apply_patch(
            &mut state,
            json!({"glow": 0.1, "appearance": {"glow": 0.9}})
                .as_object()
                .unwrap(),
        );
        assert_eq!(report.applied, 2);
        assert_eq!(state.get("appearance.glow"), Some(json!(0.9)));
    }

    #[test]
    fn test_structural_patch_keeps_inactive_shape_payloads() {
        let mut state = FieldEditState::new();
        state.set("shape.radius", &json!(2.5));
        state.set("shape.shapeType", &json!("torus"));

        apply_patch(
            &mut state,
            json!({
                "$mergeLayers": [{"name": "base", "visible": false}],
                "$appendLayers": [{"name": "Halo", "primitives": [{"id": "ring", "glow": 0.5}]}]
            })
            .as_object()
            .unwrap(),
        );
        assert_eq!(state.selection(), (0, 0));
        assert!(!state.layers()[0].visible);

        state.set("shape.shapeType", &json!("sphere"));
        assert_eq!(state.get("shape.radius"), Some(json!(2.5)));
    }

    #[test]
    fn test_bad_patch_leaves_state_usable() {
        let mut state = FieldEditState::new();
        let before = state.to_definition();
        let report = apply(
            &mut state,
            &preset(json!({"removedCategory": {"x": 1}, "fill": {"gone": 1}})),
        );

        assert!(!report.changed());
        assert_eq!(report.ignored.len(), 2);
        assert_eq!(state.to_definition(), before);
        assert!(state.set("fill.mode", &json!("WIRE")));
    }

    #[test]
    fn test_fragment_applies_category_body() {
        let mut state = FieldEditState::new();
        let fragment =
            PresetEntry::from_fragment("fast", "rayFlow", json!({"travel": "CHASE", "travelSpeed": 3.0}))
                .unwrap();
        let report = apply(&mut state, &fragment);
        assert_eq!(report.applied, 2);
        assert_eq!(state.get("rayFlow.travelEnabled"), Some(json!(true)));
    }

    #[test]
    fn test_report_absorb() {
        let mut total = ApplyReport::default();
        total.absorb(ApplyReport {
            applied: 2,
            ignored: vec!["x".into()],
            layers_appended: 1,
            ..Default::default()
        });
        total.absorb(ApplyReport {
            applied: 1,
            ..Default::default()
        });
        assert_eq!(total.applied, 3);
        assert_eq!(total.ignored, vec!["x".to_string()]);
        assert!(total.changed());
    }
}
