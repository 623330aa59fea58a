//! Parsed preset and fragment documents

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;

use crate::constants::catalog::{MERGE_KEY, METADATA_KEYS};
use crate::constants::merge::{
    APPEND_LAYERS, APPEND_PRIMITIVES, MERGE_LAYERS, MERGE_PRIMITIVES, NESTED_PRIMITIVES,
};
use crate::state::Category;

/// Keys that mark a patch as touching a category, besides the category
/// names themselves. Display metadata only; dispatch never reads it.
const CATEGORY_MARKERS: &[(&str, &str)] = &[
    ("shapeType", "shape"),
    ("radius", "shape"),
    ("color", "appearance"),
    ("glow", "appearance"),
    ("fillMode", "fill"),
    ("spinSpeed", "animation"),
    ("travel", "rayFlow"),
    ("flicker", "rayFlow"),
    (APPEND_LAYERS, "layers"),
    (MERGE_LAYERS, "layers"),
    (APPEND_PRIMITIVES, "primitives"),
    (MERGE_PRIMITIVES, "primitives"),
    (NESTED_PRIMITIVES, "primitives"),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresetEntry {
    /// File stem; unique within its category directory
    pub id: String,
    pub name: String,
    pub description: String,
    pub hint: String,
    pub category: String,
    pub merge_patch: Map<String, Value>,
    pub affected_categories: BTreeSet<String>,
}

impl PresetEntry {
    /// Parse a preset document. The patch is the `merge` object when present,
    /// otherwise the document without its metadata keys. Returns `None` when
    /// the document or its `merge` value is not an object.
    pub fn from_document(id: &str, category: &str, document: Value) -> Option<Self> {
        let Value::Object(mut doc) = document else {
            return None;
        };
        let text = |doc: &Map<String, Value>, key: &str| {
            doc.get(key).and_then(Value::as_str).map(str::to_string)
        };
        let name = text(&doc, "name").unwrap_or_else(|| id.to_string());
        let description = text(&doc, "description").unwrap_or_default();
        let hint = text(&doc, "hint").unwrap_or_default();
        let category = text(&doc, "category").unwrap_or_else(|| category.to_string());

        let merge_patch = match doc.remove(MERGE_KEY) {
            Some(Value::Object(patch)) => patch,
            Some(_) => return None,
            None => {
                for key in METADATA_KEYS {
                    doc.remove(*key);
                }
                doc
            }
        };

        Some(Self::with_patch(id, name, description, hint, category, merge_patch))
    }

    /// Parse a fragment. The body is the category object itself and becomes
    /// `{ <category>: body }`.
    pub fn from_fragment(id: &str, category: &str, body: Value) -> Option<Self> {
        if !body.is_object() {
            return None;
        }
        let mut patch = Map::new();
        patch.insert(category.to_string(), body);
        Some(Self::with_patch(
            id,
            id.to_string(),
            String::new(),
            String::new(),
            category.to_string(),
            patch,
        ))
    }

    fn with_patch(
        id: &str,
        name: String,
        description: String,
        hint: String,
        category: String,
        merge_patch: Map<String, Value>,
    ) -> Self {
        let mut affected_categories = BTreeSet::new();
        scan_markers(&merge_patch, &mut affected_categories);
        Self {
            id: id.to_string(),
            name,
            description,
            hint,
            category,
            merge_patch,
            affected_categories,
        }
    }

    /// Whether applying this entry adds or merges layers or primitives
    pub fn is_structural(&self) -> bool {
        self.affected_categories.contains("layers") || self.affected_categories.contains("primitives")
    }
}

/// Collect category markers from patch keys, descending into the entries of
/// structural arrays but not into category objects
fn scan_markers(patch: &Map<String, Value>, out: &mut BTreeSet<String>) {
    for (key, value) in patch {
        if let Some(category) = Category::from_prefix(key) {
            out.insert(category.prefix().to_string());
        } else if let Some((_, marker)) = CATEGORY_MARKERS.iter().find(|(k, _)| *k == key.as_str()) {
            out.insert((*marker).to_string());
        }
        if let Value::Array(items) = value {
            for item in items {
                if let Value::Object(nested) = item {
                    scan_markers(nested, out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_key_is_patch() {
        let entry = PresetEntry::from_document(
            "glow",
            "appearance",
            json!({"name": "Soft Glow", "hint": "subtle", "merge": {"glow": 0.4}}),
        )
        .unwrap();
        assert_eq!(entry.name, "Soft Glow");
        assert_eq!(entry.hint, "subtle");
        assert_eq!(entry.category, "appearance");
        assert_eq!(Value::Object(entry.merge_patch), json!({"glow": 0.4}));
    }

    #[test]
    fn test_document_without_merge_strips_metadata() {
        let entry = PresetEntry::from_document(
            "wire",
            "fill",
            json!({"name": "Wire", "description": "d", "category": "fill", "fill": {"mode": "WIRE"}}),
        )
        .unwrap();
        assert_eq!(Value::Object(entry.merge_patch), json!({"fill": {"mode": "WIRE"}}));
        assert_eq!(entry.affected_categories.iter().collect::<Vec<_>>(), vec!["fill"]);
    }

    #[test]
    fn test_name_defaults_to_id() {
        let entry = PresetEntry::from_document("plain", "misc", json!({"merge": {}})).unwrap();
        assert_eq!(entry.name, "plain");
        assert_eq!(entry.description, "");
    }

    #[test]
    fn test_non_object_documents_rejected() {
        assert!(PresetEntry::from_document("x", "misc", json!([1, 2])).is_none());
        assert!(PresetEntry::from_document("x", "misc", json!({"merge": 3})).is_none());
        assert!(PresetEntry::from_fragment("x", "fill", json!("WIRE")).is_none());
    }

    #[test]
    fn test_markers_scan_structural_entries() {
        let entry = PresetEntry::from_document(
            "stack",
            "layers",
            json!({"merge": {
                "$mergeLayers": [{"name": "Glow", "$appendPrimitives": [{"id": "p", "transform": {}}]}],
                "travel": "CHASE"
            }}),
        )
        .unwrap();
        let affected: Vec<_> = entry.affected_categories.iter().map(String::as_str).collect();
        assert_eq!(affected, vec!["layers", "primitives", "rayFlow", "transform"]);
        assert!(entry.is_structural());
    }

    #[test]
    fn test_nested_primitives_mark_primitives() {
        let entry = PresetEntry::from_document(
            "halo",
            "layers",
            json!({"$mergeLayers": [{"name": "Halo", "primitives": [{"id": "ring"}]}]}),
        )
        .unwrap();
        let affected: Vec<_> = entry.affected_categories.iter().map(String::as_str).collect();
        assert_eq!(affected, vec!["layers", "primitives"]);

        let flat = PresetEntry::from_document(
            "halo",
            "layers",
            json!({"$mergeLayers": [{"name": "Halo", "alpha": 0.5}]}),
        )
        .unwrap();
        assert!(!flat.affected_categories.contains("primitives"));
    }

    #[test]
    fn test_fragment_wraps_body() {
        let entry = PresetEntry::from_fragment("slow", "animation", json!({"spin": {"speed": 5}}))
            .unwrap();
        assert!(!entry.is_structural());
        assert_eq!(
            Value::Object(entry.merge_patch.clone()),
            json!({"animation": {"spin": {"speed": 5}}})
        );
    }
}
