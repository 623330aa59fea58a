//! Structural merge of identity-keyed layers and primitives
//!
//! Append always creates a new entry and renames on collision
//! (`Core`, `Core_2`, `Core_3`, ...). Merge edits the entry with the same
//! identity in place and falls back to append when there is none. Property
//! overrides go through the scalar merge with the target entry selected; the
//! previous selection is restored afterwards.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::ApplyReport;
use super::merge::{EntryKind, apply_scalars};
use crate::constants::merge::{
    APPEND_PRIMITIVES, COLLISION_SEPARATOR, DEFAULT_LAYER_NAME, DEFAULT_PRIMITIVE_ID,
    FIRST_COLLISION_SUFFIX, LAYER_IDENTITY, MERGE_PRIMITIVES, NESTED_PRIMITIVES,
    PRIMITIVE_IDENTITY,
};
use crate::model::{Layer, Primitive};
use crate::state::FieldEditState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Append,
    Merge,
}

/// `base` if free, otherwise the first free `base_N` with N from 2
pub fn unique_identity(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (FIRST_COLLISION_SUFFIX..)
        .map(|n| format!("{base}{COLLISION_SEPARATOR}{n}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

fn identity<'a>(entry: &'a Map<String, Value>, key: &str, default: &'a str) -> &'a str {
    entry.get(key).and_then(Value::as_str).unwrap_or(default)
}

/// Entries of a directive array; a non-array value is reported and skipped
fn entries<'a>(
    directive: &str,
    value: &'a Value,
    report: &mut ApplyReport,
) -> Vec<&'a Map<String, Value>> {
    let Value::Array(items) = value else {
        warn!(directive = %directive, "Directive value is not an array, ignoring");
        report.ignored.push(directive.to_string());
        return Vec::new();
    };
    items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| match item {
            Value::Object(entry) => Some(entry),
            _ => {
                report.ignored.push(format!("{directive}[{i}]"));
                None
            }
        })
        .collect()
}

pub fn layers(
    state: &mut FieldEditState,
    directive: &str,
    value: &Value,
    op: Operation,
    report: &mut ApplyReport,
) {
    for entry in entries(directive, value, report) {
        layer_entry(state, entry, op, report);
    }
    state.mark_dirty();
}

fn layer_entry(
    state: &mut FieldEditState,
    entry: &Map<String, Value>,
    op: Operation,
    report: &mut ApplyReport,
) {
    let requested = identity(entry, LAYER_IDENTITY, DEFAULT_LAYER_NAME);

    let existing = match op {
        Operation::Merge => state.find_layer(requested),
        Operation::Append => None,
    };
    let (index, fresh) = match existing {
        Some(index) => {
            report.layers_merged += 1;
            debug!(layer = %requested, index, "Merging into layer");
            (index, false)
        }
        None => {
            let name = unique_identity(requested, |n| state.find_layer(n).is_some());
            let index = state.push_layer(Layer::new(name.as_str()));
            report.layers_appended += 1;
            debug!(layer = %name, index, "Appended layer");
            (index, true)
        }
    };

    state.with_selection(index, 0, |s| apply_scalars(s, EntryKind::Layer, entry, report));

    // A fresh layer's placeholder primitive is taken over by the first
    // primitive entry
    let mut placeholder = fresh;
    let nested = [
        (NESTED_PRIMITIVES, op),
        (APPEND_PRIMITIVES, Operation::Append),
        (MERGE_PRIMITIVES, Operation::Merge),
    ];
    for (key, nested_op) in nested {
        if let Some(value) = entry.get(key) {
            for primitive in entries(key, value, report) {
                primitive_entry(state, index, primitive, nested_op, &mut placeholder, report);
            }
        }
    }
}

/// Top-level primitive directives target the selected layer
pub fn primitives(
    state: &mut FieldEditState,
    directive: &str,
    value: &Value,
    op: Operation,
    report: &mut ApplyReport,
) {
    let (layer, _) = state.selection();
    let mut placeholder = false;
    for entry in entries(directive, value, report) {
        primitive_entry(state, layer, entry, op, &mut placeholder, report);
    }
    state.mark_dirty();
}

fn primitive_entry(
    state: &mut FieldEditState,
    layer: usize,
    entry: &Map<String, Value>,
    op: Operation,
    placeholder: &mut bool,
    report: &mut ApplyReport,
) {
    let requested = identity(entry, PRIMITIVE_IDENTITY, DEFAULT_PRIMITIVE_ID);
    let adopt = std::mem::take(placeholder);

    let existing = match op {
        Operation::Merge => state.find_primitive(layer, requested),
        Operation::Append => None,
    };
    let index = match existing {
        Some(index) => {
            report.primitives_merged += 1;
            index
        }
        None if adopt => {
            state.replace_primitive(layer, 0, Primitive::new(requested));
            report.primitives_appended += 1;
            0
        }
        None => {
            let id = unique_identity(requested, |n| state.find_primitive(layer, n).is_some());
            let Some(index) = state.push_primitive(layer, Primitive::new(id)) else {
                warn!(layer, "Primitive target layer does not exist");
                report.ignored.push(requested.to_string());
                return;
            };
            report.primitives_appended += 1;
            index
        }
    };

    state.with_selection(layer, index, |s| {
        apply_scalars(s, EntryKind::Primitive, entry, report)
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unique_identity() {
        let taken = ["Core", "Core_2"];
        assert_eq!(unique_identity("Glow", |n| taken.contains(&n)), "Glow");
        assert_eq!(unique_identity("Core", |n| taken.contains(&n)), "Core_3");
    }

    #[test]
    fn test_append_layer_renames_on_collision() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        let entry = json!([{"name": "Core", "alpha": 0.5}]);
        layers(&mut state, "$appendLayers", &entry, Operation::Append, &mut report);
        layers(&mut state, "$appendLayers", &entry, Operation::Append, &mut report);

        let names: Vec<&str> = state.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["base", "Core", "Core_2"]);
        assert_eq!(report.layers_appended, 2);
        assert!(state.layers()[1..].iter().all(|l| l.alpha == 0.5));
        assert!(state.layers().iter().all(|l| l.primitives.len() == 1));
        assert_eq!(state.selection(), (0, 0));
    }

    #[test]
    fn test_merge_layer_edits_in_place() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        let entry = json!([{"name": "base", "visible": false}]);
        layers(&mut state, "$mergeLayers", &entry, Operation::Merge, &mut report);

        assert_eq!(state.layers().len(), 1);
        assert!(!state.layers()[0].visible);
        assert_eq!(report.layers_merged, 1);
        assert!(state.is_dirty());
    }

    #[test]
    fn test_missing_identity_uses_default() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        layers(&mut state, "$appendLayers", &json!([{}, {"name": 7}]), Operation::Append, &mut report);

        let names: Vec<&str> = state.layers().iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, vec!["base", "layer", "layer_2"]);
    }

    #[test]
    fn test_new_layer_takes_listed_primitives() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        let entry = json!([{
            "name": "Rays",
            "primitives": [
                {"id": "burst", "shapeType": "RAYS", "color": "#FFFF0000"},
                {"id": "burst"}
            ]
        }]);
        layers(&mut state, "$appendLayers", &entry, Operation::Append, &mut report);

        let layer = &state.layers()[1];
        let ids: Vec<&str> = layer.primitives.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["burst", "burst_2"]);
        assert_eq!(report.primitives_appended, 2);

        let index = state.find_layer("Rays").unwrap();
        let color = state.with_selection(index, 0, |s| s.get("appearance.color"));
        assert_eq!(color, Some(json!("#FFFF0000")));
    }

    #[test]
    fn test_placeholder_taken_once() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        let entry = json!([{
            "name": "Halo",
            "primitives": [{"id": "primitive", "glow": 0.5}, {"id": "ring"}]
        }]);
        layers(&mut state, "$mergeLayers", &entry, Operation::Merge, &mut report);

        let ids: Vec<&str> = state.layers()[1].primitives.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["primitive", "ring"]);
        assert_eq!(report.primitives_merged, 1);
        assert_eq!(report.primitives_appended, 1);
    }

    #[test]
    fn test_nested_primitives_follow_parent_merge() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        let entry = json!([{"name": "base", "primitives": [{"id": "primitive", "glow": 0.75}]}]);
        layers(&mut state, "$mergeLayers", &entry, Operation::Merge, &mut report);

        assert_eq!(state.layers()[0].primitives.len(), 1);
        assert_eq!(report.primitives_merged, 1);
        assert_eq!(state.get("appearance.glow"), Some(json!(0.75)));
    }

    #[test]
    fn test_top_level_primitives_target_selected_layer() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        layers(&mut state, "$appendLayers", &json!([{"name": "second"}]), Operation::Append, &mut report);
        state.select(1, 0);

        primitives(&mut state, "$appendPrimitives", &json!([{"id": "orb"}]), Operation::Append, &mut report);
        assert_eq!(state.layers()[0].primitives.len(), 1);
        assert_eq!(state.layers()[1].primitives.len(), 2);
        assert_eq!(state.layers()[1].primitives[1].id, "orb");
    }

    #[test]
    fn test_non_array_directive_is_ignored() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        layers(&mut state, "$appendLayers", &json!({"name": "x"}), Operation::Append, &mut report);
        primitives(&mut state, "$mergePrimitives", &json!([3]), Operation::Merge, &mut report);

        assert_eq!(state.layers().len(), 1);
        assert_eq!(
            report.ignored,
            vec!["$appendLayers".to_string(), "$mergePrimitives[0]".to_string()]
        );
    }
}
