//! Animation adapter
//!
//! `spin`, `pulse` and `alphaPulse` are always present. `wobble`, `wave`,
//! `colorCycle` and `precession` are optional: assigning `null` to one of
//! them disables it, and writing any of its fields while it is disabled
//! enables it starting from its default.

use serde_json::Value;

use crate::model::animation::ANIMATION_SCHEMA;
use crate::model::{AnimationConfig, Primitive, PrimitiveBuilder, Rebuild};
use crate::schema::Schema;
use crate::state::adapter::{
    Category, PathAccess, SliceAdapter, field_path, get_in, get_optional, set_in, set_optional,
    split,
};

#[derive(Debug, Clone, Default)]
pub struct AnimationAdapter {
    animation: AnimationConfig,
}

impl AnimationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    fn commit(&mut self, edit: impl FnOnce(&mut AnimationConfig)) {
        self.animation = self.animation.to_builder().with(edit).build();
    }
}

impl PathAccess for AnimationAdapter {
    fn category(&self) -> Category {
        Category::Animation
    }

    fn get(&self, path: &str) -> Option<Value> {
        let Some(path) = field_path(path) else {
            return get_in(&self.animation, None);
        };
        let anim = &self.animation;
        match split(path) {
            ("spin", rest) => get_in(&anim.spin, rest),
            ("pulse", rest) => get_in(&anim.pulse, rest),
            ("alphaPulse", rest) => get_in(&anim.alpha_pulse, rest),
            ("wobble", rest) => get_optional(&anim.wobble, rest),
            ("wave", rest) => get_optional(&anim.wave, rest),
            ("colorCycle", rest) => get_optional(&anim.color_cycle, rest),
            ("precession", rest) => get_optional(&anim.precession, rest),
            _ => get_in(anim, Some(path)),
        }
    }

    fn set(&mut self, path: &str, v: &Value) -> bool {
        let Some(path) = field_path(path) else {
            return set_in(&mut self.animation, None, v);
        };
        match split(path) {
            ("spin", rest) => {
                let mut spin = self.animation.spin.clone();
                let applied = set_in(&mut spin, rest, v);
                if applied {
                    self.commit(|a| a.spin = spin);
                }
                applied
            }
            ("pulse", rest) => {
                let mut pulse = self.animation.pulse.clone();
                let applied = set_in(&mut pulse, rest, v);
                if applied {
                    self.commit(|a| a.pulse = pulse);
                }
                applied
            }
            ("alphaPulse", rest) => {
                let mut alpha_pulse = self.animation.alpha_pulse.clone();
                let applied = set_in(&mut alpha_pulse, rest, v);
                if applied {
                    self.commit(|a| a.alpha_pulse = alpha_pulse);
                }
                applied
            }
            ("wobble", rest) => {
                let mut wobble = self.animation.wobble.clone();
                let applied = set_optional(&mut wobble, rest, v);
                if applied {
                    self.commit(|a| a.wobble = wobble);
                }
                applied
            }
            ("wave", rest) => {
                let mut wave = self.animation.wave.clone();
                let applied = set_optional(&mut wave, rest, v);
                if applied {
                    self.commit(|a| a.wave = wave);
                }
                applied
            }
            ("colorCycle", rest) => {
                let mut color_cycle = self.animation.color_cycle.clone();
                let applied = set_optional(&mut color_cycle, rest, v);
                if applied {
                    self.commit(|a| a.color_cycle = color_cycle);
                }
                applied
            }
            ("precession", rest) => {
                let mut precession = self.animation.precession.clone();
                let applied = set_optional(&mut precession, rest, v);
                if applied {
                    self.commit(|a| a.precession = precession);
                }
                applied
            }
            _ => set_in(&mut self.animation, Some(path), v),
        }
    }

    fn schema(&self) -> &'static Schema {
        &ANIMATION_SCHEMA
    }

    fn reset(&mut self) {
        self.animation = AnimationConfig::default();
    }
}

impl SliceAdapter<Primitive, PrimitiveBuilder> for AnimationAdapter {
    fn load_from(&mut self, source: &Primitive) {
        self.animation = source.animation.clone();
    }

    fn save_to(&self, builder: &mut PrimitiveBuilder) {
        builder.animation(self.animation.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PrecessionConfig;
    use serde_json::json;

    #[test]
    fn test_two_segment_paths() {
        let mut adapter = AnimationAdapter::new();
        assert!(adapter.set("spin.speed", &json!(45)));
        assert!(adapter.set("spin.axis", &json!("x")));
        assert_eq!(adapter.get("spin.speed"), Some(json!(45.0)));
        assert_eq!(adapter.get("spin.axis"), Some(json!("X")));
    }

    #[test]
    fn test_precession_absent_until_written() {
        let mut adapter = AnimationAdapter::new();
        assert_eq!(adapter.get("precession.speed"), None);
        assert_eq!(adapter.get("precession"), Some(Value::Null));

        assert!(adapter.set("precession.tiltAngle", &json!(30)));
        assert_eq!(adapter.get("precession.tiltAngle"), Some(json!(30.0)));
        assert_eq!(
            adapter.get("precession.speed"),
            Some(json!(f64::from(PrecessionConfig::default().speed)))
        );
    }

    #[test]
    fn test_null_clears_optional_effect() {
        let mut adapter = AnimationAdapter::new();
        adapter.set("wobble.speed", &json!(2));
        assert!(adapter.get("wobble.speed").is_some());
        assert!(adapter.set("wobble", &Value::Null));
        assert_eq!(adapter.get("wobble.speed"), None);
    }

    #[test]
    fn test_mismatched_record_ignored() {
        let mut adapter = AnimationAdapter::new();
        assert!(!adapter.set("spin", &json!("fast")));
        assert!(!adapter.set("precession", &json!({"speed": 1, "bogus": true})));
        assert_eq!(adapter.get("precession"), Some(Value::Null));
    }

    #[test]
    fn test_every_leaf_path_resolves_once_enabled() {
        let mut adapter = AnimationAdapter::new();
        for path in adapter.paths() {
            if adapter.get(path).is_none() {
                assert!(adapter.set(path, &json!(0)), "unsettable path {path}");
            }
            assert!(adapter.get(path).is_some(), "unresolved path {path}");
        }
    }

    #[test]
    fn test_round_trip_from_primitive() {
        let mut primitive = Primitive::new("p");
        primitive.animation.wave = Some(Default::default());
        primitive.animation.spin.speed = 10.0;

        let mut adapter = AnimationAdapter::new();
        adapter.load_from(&primitive);
        let mut builder = primitive.to_builder();
        adapter.save_to(&mut builder);
        assert_eq!(builder.build(), primitive);
    }
}
