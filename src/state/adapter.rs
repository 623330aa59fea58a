//! Category adapter contract
//!
//! An adapter owns the working copy of one category's slice and answers
//! dotted-path reads and writes relative to that slice. The aggregate state
//! strips the leading category segment before forwarding; an empty remainder
//! addresses the whole slice.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeSet;
use std::fmt;

use crate::model::{FieldAccess, Rebuild};
use crate::schema::Schema;
use crate::value;

/// Where a category's slice lives in the definition tree
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Primitive,
    Layer,
    Definition,
}

/// Closed set of path prefixes. No path is owned by two categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Shape,
    Transform,
    Fill,
    Visibility,
    Arrangement,
    Appearance,
    Animation,
    Link,
    RayFlow,
    Layer,
    Shockwave,
    Modifiers,
}

impl Category {
    pub const ALL: &'static [Category] = &[
        Category::Shape,
        Category::Transform,
        Category::Fill,
        Category::Visibility,
        Category::Arrangement,
        Category::Appearance,
        Category::Animation,
        Category::Link,
        Category::RayFlow,
        Category::Layer,
        Category::Shockwave,
        Category::Modifiers,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            Category::Shape => "shape",
            Category::Transform => "transform",
            Category::Fill => "fill",
            Category::Visibility => "visibility",
            Category::Arrangement => "arrangement",
            Category::Appearance => "appearance",
            Category::Animation => "animation",
            Category::Link => "link",
            Category::RayFlow => "rayFlow",
            Category::Layer => "layer",
            Category::Shockwave => "shockwave",
            Category::Modifiers => "modifiers",
        }
    }

    /// Exact, case-sensitive prefix match
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.prefix() == prefix)
    }

    pub fn scope(self) -> Scope {
        match self {
            Category::Shape
            | Category::Transform
            | Category::Fill
            | Category::Visibility
            | Category::Arrangement
            | Category::Appearance
            | Category::Animation
            | Category::Link
            | Category::RayFlow => Scope::Primitive,
            Category::Layer => Scope::Layer,
            Category::Shockwave | Category::Modifiers => Scope::Definition,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Path-level access to one category's working value
pub trait PathAccess {
    fn category(&self) -> Category;

    /// Value at `path`, `None` for unknown paths or absent optional records
    fn get(&self, path: &str) -> Option<Value>;

    /// Coerce and apply `value` at `path`. Returns whether anything was applied;
    /// unknown paths leave the working value untouched.
    fn set(&mut self, path: &str, value: &Value) -> bool;

    /// Descriptor table the category's paths are derived from
    fn schema(&self) -> &'static Schema;

    /// Every addressable path under this category
    fn paths(&self) -> &'static BTreeSet<String> {
        self.schema().paths()
    }

    /// Restore every field to its default
    fn reset(&mut self);
}

/// Conversion between an adapter's working value and the aggregate it belongs to
pub trait SliceAdapter<S, B>: PathAccess {
    /// Replace the working value with the slice held by `source`.
    /// An absent optional slice resets to the default.
    fn load_from(&mut self, source: &S);

    /// Write the working value into `builder`; the adapter is left unchanged
    fn save_to(&self, builder: &mut B);
}

/// Split a relative path into its first segment and the remainder
pub(crate) fn split(path: &str) -> (&str, Option<&str>) {
    match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    }
}

/// Relative path as a field selector; the empty path selects the whole record
pub(crate) fn field_path(path: &str) -> Option<&str> {
    if path.is_empty() { None } else { Some(path) }
}

/// Read a field of `record`, or the whole record when `field` is `None`
pub(crate) fn get_in<T>(record: &T, field: Option<&str>) -> Option<Value>
where
    T: FieldAccess + Serialize,
{
    match field {
        None => Some(value::to_record(record)),
        Some(name) => record.field(name),
    }
}

/// Rebuild `record` with one field changed, or replace it wholesale when
/// `field` is `None`. `record` is only replaced when the edit applied.
pub(crate) fn set_in<T>(record: &mut T, field: Option<&str>, v: &Value) -> bool
where
    T: FieldAccess + Rebuild + DeserializeOwned,
{
    match field {
        None => match value::record::<T>(v) {
            Some(replacement) => {
                *record = replacement.normalized();
                true
            }
            None => false,
        },
        Some(name) => {
            let mut applied = false;
            let rebuilt = record
                .to_builder()
                .with(|r| applied = r.set_field(name, v))
                .build();
            if applied {
                *record = rebuilt;
            }
            applied
        }
    }
}

/// Read through an optional record. Absent records read as `null` at their
/// own path and `None` below it.
pub(crate) fn get_optional<T>(slot: &Option<T>, field: Option<&str>) -> Option<Value>
where
    T: FieldAccess + Serialize,
{
    match (slot, field) {
        (None, None) => Some(Value::Null),
        (None, Some(_)) => None,
        (Some(record), field) => get_in(record, field),
    }
}

/// Write through an optional record. `null` at the record's own path clears
/// it; a field write on an absent record starts from the default.
pub(crate) fn set_optional<T>(slot: &mut Option<T>, field: Option<&str>, v: &Value) -> bool
where
    T: FieldAccess + Rebuild + Default + DeserializeOwned,
{
    if field.is_none() && v.is_null() {
        *slot = None;
        return true;
    }
    let mut current = slot.clone().unwrap_or_default();
    let applied = set_in(&mut current, field, v);
    if applied {
        *slot = Some(current);
    }
    applied
}
