//! Loosely-typed value coercion
//!
//! Inputs arrive as JSON values from the UI, the CLI or preset files. Each
//! helper converts to the exact field type and never fails: unparseable input
//! falls back to the field's zero value or documented default.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::color;
use crate::model::enums::NamedEnum;
use crate::model::Vec3;

/// Numeric field. Parse failures yield 0.
pub fn float(value: &Value) -> f32 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0) as f32,
        Value::String(s) => s.trim().parse::<f32>().unwrap_or_else(|_| {
            debug!(input = %s, "Unparseable float, using 0");
            0.0
        }),
        Value::Bool(b) => f32::from(u8::from(*b)),
        _ => 0.0,
    }
}

/// Integer field. Floats are truncated toward zero and saturate at the i32 range.
pub fn int(value: &Value) -> i32 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32,
            None => n.as_f64().unwrap_or(0.0) as i32,
        },
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i32>()
                .or_else(|_| s.parse::<f64>().map(|f| f as i32))
                .unwrap_or_else(|_| {
                    debug!(input = %s, "Unparseable int, using 0");
                    0
                })
        }
        Value::Bool(b) => i32::from(*b),
        _ => 0,
    }
}

/// Boolean field. Strings match `true`/`false` case-insensitively; anything
/// else is false.
pub fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => s.trim().eq_ignore_ascii_case("true"),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        _ => false,
    }
}

/// Enum field, matched by name through the enum's own `from_name`
pub fn enumeration<E: NamedEnum>(value: &Value) -> E {
    match value {
        Value::String(s) => E::from_name(s),
        Value::Null => E::default(),
        other => E::from_name(&other.to_string()),
    }
}

/// Free text field; scalars are stringified, null is empty
pub fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Color field: hex strings, theme references or a `0xRRGGBB` integer.
/// Invalid input yields `fallback`.
pub fn color(value: &Value, fallback: &str) -> String {
    let parsed = match value {
        Value::String(s) => color::normalize(s),
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u32::try_from(v).ok())
            .map(|v| color::HexColor::from_rgb24(v).to_hex_string()),
        _ => None,
    };
    parsed.unwrap_or_else(|| {
        debug!(input = %value, fallback, "Invalid color, using fallback");
        fallback.to_string()
    })
}

/// 3-vector field: `[x, y, z]`, `{x, y, z}`, `"x,y,z"` or a single number
/// applied uniformly. Missing components are 0.
pub fn vec3(value: &Value) -> Vec3 {
    match value {
        Value::Array(items) => {
            let at = |i: usize| items.get(i).map(float).unwrap_or(0.0);
            Vec3::new(at(0), at(1), at(2))
        }
        Value::Object(map) => {
            let at = |k: &str| map.get(k).map(float).unwrap_or(0.0);
            Vec3::new(at("x"), at("y"), at("z"))
        }
        Value::String(s) if s.contains(',') => {
            let mut parts = s.split(',').map(|p| p.trim().parse::<f32>().unwrap_or(0.0));
            Vec3::new(
                parts.next().unwrap_or(0.0),
                parts.next().unwrap_or(0.0),
                parts.next().unwrap_or(0.0),
            )
        }
        Value::Number(_) | Value::String(_) => Vec3::splat(float(value)),
        _ => Vec3::ZERO,
    }
}

/// Whole sub-config assignment. Only objects that deserialize exactly are
/// accepted; anything else returns `None` and the caller leaves the field
/// untouched.
pub fn record<T: DeserializeOwned>(value: &Value) -> Option<T> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone())
        .inspect_err(|e| debug!(error = %e, "Sub-config shape mismatch, ignoring"))
        .ok()
}

/// JSON representation of an f32 that prints the way it was typed (0.1, not
/// 0.10000000149011612). Non-finite values become null.
pub fn from_f32(v: f32) -> Value {
    let widened = v.to_string().parse::<f64>().unwrap_or(f64::from(v));
    serde_json::Number::from_f64(widened)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

/// JSON representation of a vector as `[x, y, z]`
pub fn from_vec3(v: Vec3) -> Value {
    Value::Array(vec![from_f32(v.x), from_f32(v.y), from_f32(v.z)])
}

/// Serialize a record for whole-field reads
pub fn to_record<T: serde::Serialize>(v: &T) -> Value {
    serde_json::to_value(v).unwrap_or_else(|_| Value::Object(Map::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::enums::FillMode;
    use serde_json::json;

    #[test]
    fn test_float_coercion() {
        assert_eq!(float(&json!(2)), 2.0);
        assert_eq!(float(&json!(0.25)), 0.25);
        assert_eq!(float(&json!(" 1.5 ")), 1.5);
        assert_eq!(float(&json!("abc")), 0.0);
        assert_eq!(float(&json!(null)), 0.0);
        assert_eq!(float(&json!(true)), 1.0);
    }

    #[test]
    fn test_int_coercion() {
        assert_eq!(int(&json!(7)), 7);
        assert_eq!(int(&json!(7.9)), 7);
        assert_eq!(int(&json!("12")), 12);
        assert_eq!(int(&json!("3.5")), 3);
        assert_eq!(int(&json!("x")), 0);
        assert_eq!(int(&json!(1e12)), i32::MAX);
    }

    #[test]
    fn test_bool_coercion() {
        assert!(boolean(&json!(true)));
        assert!(boolean(&json!("TRUE")));
        assert!(!boolean(&json!("False")));
        assert!(!boolean(&json!("yes")));
        assert!(boolean(&json!(1)));
        assert!(!boolean(&json!(null)));
    }

    #[test]
    fn test_enum_coercion_case_insensitive_with_default() {
        assert_eq!(enumeration::<FillMode>(&json!("wire")), FillMode::Wire);
        assert_eq!(enumeration::<FillMode>(&json!("Cage")), FillMode::Cage);
        assert_eq!(enumeration::<FillMode>(&json!("nonsense")), FillMode::Solid);
        assert_eq!(enumeration::<FillMode>(&json!(3)), FillMode::Solid);
    }

    #[test]
    fn test_vec3_forms() {
        assert_eq!(vec3(&json!([1, 2, 3])), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(vec3(&json!({"x": 1, "z": 2})), Vec3::new(1.0, 0.0, 2.0));
        assert_eq!(vec3(&json!("1, 2.5, -1")), Vec3::new(1.0, 2.5, -1.0));
        assert_eq!(vec3(&json!(2)), Vec3::splat(2.0));
        assert_eq!(vec3(&json!(null)), Vec3::ZERO);
    }

    #[test]
    fn test_color_coercion() {
        assert_eq!(color(&json!("#00ff00"), "#FFFFFFFF"), "#FF00FF00");
        assert_eq!(color(&json!(0xFF0000), "#FFFFFFFF"), "#FFFF0000");
        assert_eq!(color(&json!("bogus"), "#FFFFFFFF"), "#FFFFFFFF");
        assert_eq!(color(&json!("@accent"), "#FFFFFFFF"), "@accent");
    }

    #[test]
    fn test_from_f32_is_clean() {
        assert_eq!(from_f32(0.1), json!(0.1));
        assert_eq!(from_f32(f32::NAN), Value::Null);
    }

    #[test]
    fn test_text_coercion() {
        assert_eq!(text(&json!("core")), "core");
        assert_eq!(text(&json!(5)), "5");
        assert_eq!(text(&json!(null)), "");
    }
}
