// src/planner/lenient.rs — Tolerant field decoders for agent-produced JSON
//
// The output schemas declare counts as `number`, so `7.0` is as valid as `7`.
// Optional text and list fields may arrive as explicit `null`.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, Visitor};

/// Whole, non-negative count; integral floats such as `7.0` are accepted.
pub fn count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CountVisitor)
}

/// `null` decodes as the type's default, same as an absent field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

struct CountVisitor;

impl<'de> Visitor<'de> for CountVisitor {
    type Value = u32;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a non-negative whole number")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u32, E> {
        u32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Unsigned(v), &self))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u32, E> {
        u32::try_from(v).map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u32, E> {
        if v.is_finite() && v.fract() == 0.0 && (0.0..=u32::MAX as f64).contains(&v) {
            Ok(v as u32)
        } else {
            Err(E::invalid_value(de::Unexpected::Float(v), &self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(deserialize_with = "count")]
        days: u32,
        #[serde(default, deserialize_with = "null_as_default")]
        note: String,
        #[serde(default, deserialize_with = "null_as_default")]
        tags: Vec<String>,
    }

    fn parse(json: &str) -> Result<Sample, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[test]
    fn test_count_accepts_integral_float() {
        assert_eq!(parse(r#"{"days": 7.0}"#).unwrap().days, 7);
        assert_eq!(parse(r#"{"days": 7}"#).unwrap().days, 7);
    }

    #[test]
    fn test_count_rejects_fraction_and_negative() {
        assert!(parse(r#"{"days": 2.5}"#).is_err());
        assert!(parse(r#"{"days": -1}"#).is_err());
        assert!(parse(r#"{"days": "7"}"#).is_err());
    }

    #[test]
    fn test_null_and_missing_become_default() {
        let s = parse(r#"{"days": 1, "note": null, "tags": null}"#).unwrap();
        assert_eq!(s.note, "");
        assert!(s.tags.is_empty());
        let s = parse(r#"{"days": 1}"#).unwrap();
        assert!(s.tags.is_empty());
    }
}
