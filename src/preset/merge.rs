//! Scalar merge: patch keys to `FieldEditState::set` calls
//!
//! The key tables here are maintained by hand and can fall behind the
//! schemas; `test_table_targets_exist` catches that.

use serde_json::{Map, Value};
use tracing::trace;

use super::ApplyReport;
use crate::constants::merge::{LAYER_IDENTITY, NESTED_PRIMITIVES, PRIMITIVE_IDENTITY};
use crate::state::{Category, FieldEditState, Scope};

/// Which kind of object a patch map came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// Top level of a preset: every category, selected layer and primitive
    Definition,
    /// Entry of a layer directive: layer properties only
    Layer,
    /// Entry of a primitive directive: primitive categories only
    Primitive,
}

impl EntryKind {
    fn shorthand(self) -> &'static [(&'static str, &'static str)] {
        match self {
            EntryKind::Definition | EntryKind::Primitive => PRIMITIVE_SHORTHAND,
            EntryKind::Layer => LAYER_SHORTHAND,
        }
    }

    fn accepts(self, category: Category) -> bool {
        match self {
            EntryKind::Definition => true,
            EntryKind::Layer => category.scope() == Scope::Layer,
            EntryKind::Primitive => category.scope() == Scope::Primitive,
        }
    }

    /// Keys handled by the structural pass, never by scalar merge
    fn is_reserved(self, key: &str) -> bool {
        if key.starts_with('$') {
            return true;
        }
        match self {
            EntryKind::Definition => false,
            EntryKind::Layer => key == LAYER_IDENTITY || key == NESTED_PRIMITIVES,
            EntryKind::Primitive => key == PRIMITIVE_IDENTITY,
        }
    }
}

/// Bare keys allowed on primitive entries and at the top level
const PRIMITIVE_SHORTHAND: &[(&str, &str)] = &[
    ("shapeType", "shape.shapeType"),
    ("type", "shape.shapeType"),
    ("radius", "shape.radius"),
    ("innerRadius", "shape.innerRadius"),
    ("outerRadius", "shape.outerRadius"),
    ("segments", "shape.segments"),
    ("height", "shape.height"),
    ("majorRadius", "shape.majorRadius"),
    ("minorRadius", "shape.minorRadius"),
    ("count", "shape.count"),
    ("rayLength", "shape.rayLength"),
    ("rayWidth", "shape.rayWidth"),
    ("sides", "shape.sides"),
    ("polyType", "shape.polyType"),
    ("subdivisions", "shape.subdivisions"),
    ("latSteps", "shape.latSteps"),
    ("lonSteps", "shape.lonSteps"),
    ("offset", "transform.offset"),
    ("position", "transform.offset"),
    ("rotation", "transform.rotation"),
    ("scale", "transform.scale"),
    ("anchor", "transform.anchor"),
    ("fillMode", "fill.mode"),
    ("wireThickness", "fill.wireThickness"),
    ("wireWidth", "fill.wireThickness"),
    ("color", "appearance.color"),
    ("colour", "appearance.color"),
    ("secondaryColor", "appearance.secondaryColor"),
    ("alpha", "appearance.alpha"),
    ("opacity", "appearance.alpha"),
    ("glow", "appearance.glow"),
    ("emissive", "appearance.emissive"),
    ("spinSpeed", "animation.spin.speed"),
    ("pulseScale", "animation.pulse.scale"),
    ("travel", "rayFlow.travel"),
    ("travelSpeed", "rayFlow.travelSpeed"),
    ("flicker", "rayFlow.flicker"),
];

const LAYER_SHORTHAND: &[(&str, &str)] = &[
    ("alpha", "layer.alpha"),
    ("opacity", "layer.alpha"),
    ("visible", "layer.visible"),
    ("blendMode", "layer.blendMode"),
    ("blend", "layer.blendMode"),
];

/// Top level: the primitive shorthand plus these
const DEFINITION_EXTRA: &[(&str, &str)] = &[
    ("blendMode", "layer.blendMode"),
    ("blend", "layer.blendMode"),
    ("bobbing", "modifiers.bobbing"),
    ("breathing", "modifiers.breathing"),
];

/// Renamed keys inside category objects, as `(category, old, current)`
const CATEGORY_ALIASES: &[(Category, &str, &str)] = &[
    (Category::Shape, "type", "shapeType"),
    (Category::Transform, "position", "offset"),
    (Category::Fill, "wireWidth", "wireThickness"),
    (Category::Appearance, "colour", "color"),
    (Category::Appearance, "opacity", "alpha"),
    (Category::Layer, "opacity", "alpha"),
    (Category::Layer, "blend", "blendMode"),
    (Category::Shockwave, "colour", "color"),
];

fn shorthand_target(kind: EntryKind, key: &str) -> Option<&'static str> {
    let lookup = |table: &[(&str, &'static str)]| {
        table.iter().find(|(k, _)| *k == key).map(|(_, path)| *path)
    };
    match kind {
        EntryKind::Definition => lookup(kind.shorthand()).or_else(|| lookup(DEFINITION_EXTRA)),
        _ => lookup(kind.shorthand()),
    }
}

fn alias(category: Category, key: &str) -> &str {
    CATEGORY_ALIASES
        .iter()
        .find(|(c, old, _)| *c == category && *old == key)
        .map_or(key, |(_, _, current)| *current)
}

/// Apply every scalar key of `patch`. Structural and identity keys are left
/// for the caller.
pub fn apply_scalars(
    state: &mut FieldEditState,
    kind: EntryKind,
    patch: &Map<String, Value>,
    report: &mut ApplyReport,
) {
    for (key, value) in patch {
        if !kind.is_reserved(key) {
            apply_key(state, kind, key, value, report);
        }
    }
}

/// Apply one scalar key: a shorthand, or a category object expanded into
/// dotted paths
pub fn apply_key(
    state: &mut FieldEditState,
    kind: EntryKind,
    key: &str,
    value: &Value,
    report: &mut ApplyReport,
) {
    if let Some(path) = shorthand_target(kind, key) {
        set(state, path, value, report);
        return;
    }
    match Category::from_prefix(key) {
        Some(category) if kind.accepts(category) => {
            expand(state, category, category.prefix(), value, report);
        }
        _ => {
            trace!(key = %key, "Unrecognized patch key");
            report.ignored.push(key.to_string());
        }
    }
}

/// Objects are walked while `base` names a record; anything else is written
/// whole, so vec3 objects and `null` for optional records pass through.
fn expand(
    state: &mut FieldEditState,
    category: Category,
    base: &str,
    value: &Value,
    report: &mut ApplyReport,
) {
    let Value::Object(fields) = value else {
        set(state, base, value, report);
        return;
    };
    if base != category.prefix() && !is_record(state, category, base) {
        set(state, base, value, report);
        return;
    }
    let top = base == category.prefix();
    for (key, child) in fields {
        let key = if top { alias(category, key) } else { key.as_str() };
        let path = format!("{}.{}", base, key);
        expand(state, category, &path, child, report);
    }
}

fn is_record(state: &FieldEditState, category: Category, path: &str) -> bool {
    state
        .paths(category, false)
        .iter()
        .any(|p| p.strip_prefix(path).is_some_and(|rest| rest.starts_with('.')))
}

fn set(state: &mut FieldEditState, path: &str, value: &Value, report: &mut ApplyReport) {
    if state.set(path, value) {
        report.applied += 1;
    } else {
        report.ignored.push(path.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::adapters::ShapeAdapter;
    use crate::state::PathAccess;
    use serde_json::json;

    fn patch(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("patch must be an object"),
        }
    }

    #[test]
    fn test_table_targets_exist() {
        let state = FieldEditState::new();
        let all: Vec<String> = Category::ALL
            .iter()
            .flat_map(|c| state.paths(*c, false))
            .collect();
        let shape_fields = ShapeAdapter::new().paths();

        let tables = [PRIMITIVE_SHORTHAND, LAYER_SHORTHAND, DEFINITION_EXTRA];
        for (key, target) in tables.iter().flat_map(|t| t.iter()) {
            let known = all.iter().any(|p| p == target)
                || target.strip_prefix("shape.").is_some_and(|field| {
                    shape_fields
                        .iter()
                        .any(|p| p.split_once('.').is_some_and(|(_, f)| f == field))
                });
            assert!(known, "shorthand {key} points at unknown path {target}");
        }
        for (category, old, current) in CATEGORY_ALIASES {
            let path = format!("{}.{}", category.prefix(), current);
            assert!(all.contains(&path), "alias {old} points at unknown path {path}");
        }
    }

    #[test]
    fn test_category_object_expands_to_paths() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({
                "fill": {"mode": "WIRE", "cage": {"latitudeCount": 4}},
                "transform": {"offset": {"x": 1.0, "y": 2.0, "z": 3.0}}
            })),
            &mut report,
        );
        assert_eq!(report.applied, 3);
        assert!(report.ignored.is_empty());
        assert_eq!(state.get("fill.mode"), Some(json!("WIRE")));
        assert_eq!(state.get("fill.cage.latitudeCount"), Some(json!(4)));
        assert_eq!(state.get("transform.offset"), Some(json!([1.0, 2.0, 3.0])));
    }

    #[test]
    fn test_shorthand_and_aliases() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({
                "colour": "#FF112233",
                "travel": "CHASE",
                "appearance": {"opacity": 0.25},
                "blend": "ADD"
            })),
            &mut report,
        );
        assert_eq!(report.applied, 4);
        assert_eq!(state.get("appearance.color"), Some(json!("#FF112233")));
        assert_eq!(state.get("appearance.alpha"), Some(json!(0.25)));
        assert_eq!(state.get("rayFlow.travelEnabled"), Some(json!(true)));
        assert_eq!(state.get("layer.blendMode"), Some(json!("ADD")));
    }

    #[test]
    fn test_shape_shorthand_follows_active_variant() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({"shape": {"shapeType": "TORUS", "majorRadius": 3.0}})),
            &mut report,
        );
        assert_eq!(report.applied, 2);
        assert_eq!(state.get("shape.torus.majorRadius"), Some(json!(3.0)));
    }

    #[test]
    fn test_unknown_keys_are_reported() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({"bogus": 1, "fill": {"nope": true}, "$appendLayers": []})),
            &mut report,
        );
        assert_eq!(report.applied, 0);
        assert_eq!(report.ignored, vec!["bogus".to_string(), "fill.nope".to_string()]);
        assert!(!state.is_dirty());
    }

    #[test]
    fn test_entry_kinds_restrict_categories() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Layer,
            &patch(json!({"name": "x", "alpha": 0.5, "fill": {"mode": "WIRE"}})),
            &mut report,
        );
        assert_eq!(state.get("layer.alpha"), Some(json!(0.5)));
        assert_eq!(state.get("fill.mode"), Some(json!("SOLID")));
        assert_eq!(report.ignored, vec!["fill".to_string()]);

        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Primitive,
            &patch(json!({"id": "p", "alpha": 0.5, "shockwave": {"enabled": true}})),
            &mut report,
        );
        assert_eq!(state.get("appearance.alpha"), Some(json!(0.5)));
        assert_eq!(state.get("shockwave.enabled"), Some(json!(false)));
        assert_eq!(report.ignored, vec!["shockwave".to_string()]);
    }

    #[test]
    fn test_optional_record_cleared_with_null() {
        let mut state = FieldEditState::new();
        let mut report = ApplyReport::default();
        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({"animation": {"wobble": {"amplitude": 0.3}}})),
            &mut report,
        );
        assert_eq!(state.get("animation.wobble.amplitude"), Some(json!([0.3, 0.3, 0.3])));

        apply_scalars(
            &mut state,
            EntryKind::Definition,
            &patch(json!({"animation": {"wobble": null}})),
            &mut report,
        );
        assert_eq!(state.get("animation.wobble"), Some(Value::Null));
    }
}
