#![forbid(unsafe_code)]

//! Path-addressed editing of field definitions
//!
//! A [`FieldDefinition`](model::FieldDefinition) is an immutable tree of
//! layers, primitives and sub-configs. [`FieldEditState`](state::FieldEditState)
//! exposes it through dotted paths such as `fill.mode` or
//! `animation.spin.speed`, and the [`preset`] module patches it from JSON
//! catalogs.

pub mod color;
pub mod config;
pub mod constants;
pub mod model;
pub mod preset;
pub mod schema;
pub mod state;
pub mod value;
