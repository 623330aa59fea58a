//! Static schema descriptors
//!
//! Every addressable config type declares one `Schema` table listing its
//! fields and their kinds. The set of dotted paths an adapter answers to is
//! derived from these tables and nowhere else.

use std::collections::BTreeSet;
use std::sync::OnceLock;

/// Kind of a single field, used for path expansion and UI hints
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Float,
    Int,
    Bool,
    Text,
    Color,
    Vec3,
    /// Enum stored by canonical name
    Enum(&'static [&'static str]),
    /// Always-present nested record
    Nested(&'static Schema),
    /// Nested record that may be absent (feature disabled)
    Optional(&'static Schema),
}

impl FieldKind {
    pub fn nested_schema(&self) -> Option<&'static Schema> {
        match self {
            FieldKind::Nested(schema) | FieldKind::Optional(schema) => Some(schema),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Float => "float",
            FieldKind::Int => "int",
            FieldKind::Bool => "bool",
            FieldKind::Text => "text",
            FieldKind::Color => "color",
            FieldKind::Vec3 => "vec3",
            FieldKind::Enum(_) => "enum",
            FieldKind::Nested(_) => "object",
            FieldKind::Optional(_) => "object?",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FieldDef {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldDef {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// Descriptor table for one config type.
///
/// Instances are `static`s; the expanded path sets are computed on first use
/// and cached inside the descriptor, so each type is walked once per process.
#[derive(Debug)]
pub struct Schema {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
    paths: OnceLock<BTreeSet<String>>,
    leaves: OnceLock<BTreeSet<String>>,
}

impl Schema {
    pub const fn new(name: &'static str, fields: &'static [FieldDef]) -> Self {
        Self {
            name,
            fields,
            paths: OnceLock::new(),
            leaves: OnceLock::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve a dotted path to its field definition
    pub fn lookup(&self, path: &str) -> Option<&FieldDef> {
        match path.split_once('.') {
            None => self.field(path),
            Some((head, rest)) => self.field(head)?.kind.nested_schema()?.lookup(rest),
        }
    }

    /// Every addressable path: nested record fields appear themselves and
    /// expanded into `<field>.<sub>` entries
    pub fn paths(&self) -> &BTreeSet<String> {
        self.paths.get_or_init(|| {
            let mut out = BTreeSet::new();
            expand(self, "", true, &mut out);
            out
        })
    }

    /// Scalar leaf paths only
    pub fn leaf_paths(&self) -> &BTreeSet<String> {
        self.leaves.get_or_init(|| {
            let mut out = BTreeSet::new();
            expand(self, "", false, &mut out);
            out
        })
    }
}

fn expand(schema: &Schema, prefix: &str, include_records: bool, out: &mut BTreeSet<String>) {
    for field in schema.fields {
        let path = if prefix.is_empty() {
            field.name.to_string()
        } else {
            format!("{prefix}.{}", field.name)
        };
        match field.kind.nested_schema() {
            Some(nested) => {
                if include_records {
                    out.insert(path.clone());
                }
                expand(nested, &path, include_records, out);
            }
            None => {
                out.insert(path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static AXIS: Schema = Schema::new(
        "Axis",
        &[
            FieldDef::new("amplitude", FieldKind::Float),
            FieldDef::new("frequency", FieldKind::Float),
        ],
    );

    static ORBIT: Schema = Schema::new(
        "Orbit",
        &[
            FieldDef::new("enabled", FieldKind::Bool),
            FieldDef::new("x", FieldKind::Nested(&AXIS)),
        ],
    );

    static ROOT: Schema = Schema::new(
        "Root",
        &[
            FieldDef::new("scale", FieldKind::Float),
            FieldDef::new("mode", FieldKind::Enum(&["A", "B"])),
            FieldDef::new("orbit", FieldKind::Nested(&ORBIT)),
            FieldDef::new("extra", FieldKind::Optional(&AXIS)),
        ],
    );

    #[test]
    fn test_paths_expand_nested_records() {
        let paths: Vec<&str> = ROOT.paths().iter().map(String::as_str).collect();
        assert_eq!(
            paths,
            vec![
                "extra",
                "extra.amplitude",
                "extra.frequency",
                "mode",
                "orbit",
                "orbit.enabled",
                "orbit.x",
                "orbit.x.amplitude",
                "orbit.x.frequency",
                "scale",
            ]
        );
    }

    #[test]
    fn test_leaf_paths_skip_records() {
        let leaves = ROOT.leaf_paths();
        assert!(leaves.contains("orbit.x.amplitude"));
        assert!(!leaves.contains("orbit"));
        assert!(!leaves.contains("orbit.x"));
        assert_eq!(leaves.len(), 7);
    }

    #[test]
    fn test_paths_are_cached() {
        let first = ROOT.paths() as *const _;
        let second = ROOT.paths() as *const _;
        assert_eq!(first, second);
    }

    #[test]
    fn test_lookup() {
        assert!(matches!(ROOT.lookup("orbit.x.frequency").unwrap().kind, FieldKind::Float));
        assert!(ROOT.lookup("orbit.y").is_none());
        assert!(ROOT.lookup("scale.more").is_none());
    }
}
