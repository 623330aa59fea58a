//! Link adapter. An unlinked primitive has no link record; writing any link
//! field creates one from defaults and assigning `null` to `link` removes it.

use serde_json::Value;

use crate::model::ray_flow::LINK_SCHEMA;
use crate::model::{LinkConfig, Primitive, PrimitiveBuilder};
use crate::schema::Schema;
use crate::state::adapter::{
    Category, PathAccess, SliceAdapter, field_path, get_optional, set_optional,
};

#[derive(Debug, Clone, Default)]
pub struct LinkAdapter {
    link: Option<LinkConfig>,
}

impl LinkAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_linked(&self) -> bool {
        self.link.is_some()
    }
}

impl PathAccess for LinkAdapter {
    fn category(&self) -> Category {
        Category::Link
    }

    fn get(&self, path: &str) -> Option<Value> {
        get_optional(&self.link, field_path(path))
    }

    fn set(&mut self, path: &str, v: &Value) -> bool {
        set_optional(&mut self.link, field_path(path), v)
    }

    fn schema(&self) -> &'static Schema {
        &LINK_SCHEMA
    }

    fn reset(&mut self) {
        self.link = None;
    }
}

impl SliceAdapter<Primitive, PrimitiveBuilder> for LinkAdapter {
    fn load_from(&mut self, source: &Primitive) {
        self.link = source.link.clone();
    }

    fn save_to(&self, builder: &mut PrimitiveBuilder) {
        builder.link(self.link.clone());
    }
}
