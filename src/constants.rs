//! Application-wide constants
//!
//! This module contains the magic numbers and string literals used throughout
//! the editor, providing a single source of truth for constant values.

/// Settings file location
pub mod config {
    /// Directory under the platform config dir
    pub const APP_DIR: &str = "field-editor";

    /// Settings file name
    pub const FILENAME: &str = "settings.json";

    /// Default catalog directory name (relative to APP_DIR)
    pub const CATALOG_DIR: &str = "catalog";

    /// Default directory for saved field definitions (relative to APP_DIR)
    pub const DEFINITIONS_DIR: &str = "definitions";

    /// Log level used when neither settings nor LOG_LEVEL say otherwise
    pub const DEFAULT_LOG_LEVEL: &str = "info";
}

/// Preset and fragment catalog layout
pub mod catalog {
    /// Presets live under `<catalog>/presets/<category>/<id>.json`
    pub const PRESETS_DIR: &str = "presets";

    /// Fragments live under `<catalog>/fragments/<category>/<id>.json`
    pub const FRAGMENTS_DIR: &str = "fragments";

    /// Only files with this extension are read
    pub const FILE_EXTENSION: &str = "json";

    /// Key holding the patch inside a preset document
    pub const MERGE_KEY: &str = "merge";

    /// Document keys that are metadata, never patch content
    pub const METADATA_KEYS: &[&str] = &["name", "description", "hint", "category"];
}

/// Structural merge directives and identity handling
pub mod merge {
    pub const APPEND_LAYERS: &str = "$appendLayers";
    pub const MERGE_LAYERS: &str = "$mergeLayers";
    pub const APPEND_PRIMITIVES: &str = "$appendPrimitives";
    pub const MERGE_PRIMITIVES: &str = "$mergePrimitives";

    /// Nested primitive list inside a layer entry (follows the parent operation)
    pub const NESTED_PRIMITIVES: &str = "primitives";

    /// Identity key of a layer entry
    pub const LAYER_IDENTITY: &str = "name";

    /// Identity key of a primitive entry
    pub const PRIMITIVE_IDENTITY: &str = "id";

    /// Identity used when a layer entry carries no name
    pub const DEFAULT_LAYER_NAME: &str = "layer";

    /// Identity used when a primitive entry carries no id
    pub const DEFAULT_PRIMITIVE_ID: &str = "primitive";

    /// Separator between identity and numeric suffix on append collisions ("Core_2")
    pub const COLLISION_SEPARATOR: char = '_';

    /// First suffix tried on collision
    pub const FIRST_COLLISION_SUFFIX: u32 = 2;
}

/// Value ranges enforced when sub-configs are rebuilt
pub mod validation {
    /// Minimum segment count for any revolved shape
    pub const MIN_SEGMENTS: i32 = 3;

    /// Maximum segment count for any tessellated shape
    pub const MAX_SEGMENTS: i32 = 512;

    /// Minimum ray count for ray shapes
    pub const MIN_RAY_COUNT: i32 = 1;

    /// Maximum polyhedron subdivision level
    pub const MAX_SUBDIVISIONS: i32 = 6;
}

/// Default colors
pub mod colors {
    /// Fallback for unparseable color strings
    pub const DEFAULT_COLOR: &str = "#FFFFFFFF";

    /// Default secondary color for gradients
    pub const DEFAULT_SECONDARY_COLOR: &str = "#FF000000";

    /// Theme reference prefix (`@primary`, `@accent`)
    pub const THEME_REF_PREFIX: char = '@';
}
