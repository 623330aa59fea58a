//! Configuration management for the field editor

pub mod settings;

pub use settings::AppSettings;
