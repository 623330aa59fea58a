//! One adapter per category

pub mod animation;
pub mod fill;
pub mod layer;
pub mod link;
pub mod record;
pub mod shape;
pub mod transform;

pub use animation::AnimationAdapter;
pub use fill::FillAdapter;
pub use layer::LayerAdapter;
pub use link::LinkAdapter;
pub use record::{
    AppearanceAdapter, ArrangementAdapter, ModifiersAdapter, RayFlowAdapter, RecordAdapter,
    RecordSlice, ShockwaveAdapter, VisibilityAdapter,
};
pub use shape::ShapeAdapter;
pub use transform::TransformAdapter;
