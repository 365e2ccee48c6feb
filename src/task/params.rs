//! Scalar parameter values.
//!
//! Task documents leave most defaults empty (`~`) and occasionally use bare
//! booleans or numbers. Every scalar is rendered as the string that would be
//! passed through the environment.

use std::collections::BTreeMap;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer};
use serde_yaml::Value;

pub(super) fn deserialize_params<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?.unwrap_or_default();

    raw.into_iter()
        .map(|(name, value)| {
            scalar_to_string(value)
                .map(|rendered| (name.clone(), rendered))
                .map_err(|kind| {
                    D::Error::custom(format!("parameter '{name}' must be a scalar, got {kind}"))
                })
        })
        .collect()
}

/// Render a scalar, or name the offending kind.
pub(super) fn scalar_to_string(value: Value) -> Result<String, &'static str> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::String(text) => Ok(text),
        Value::Sequence(_) => Err("a sequence"),
        Value::Mapping(_) => Err("a mapping"),
        Value::Tagged(tagged) => scalar_to_string(tagged.value),
    }
}
