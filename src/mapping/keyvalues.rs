//! Entity spawn records and typed keyvalue access

use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

use crate::types::EntityHandle;
use crate::{MappingError, Result};

/// One entity spawned by the host during map load.
#[derive(Debug, Clone, Deserialize)]
pub struct EntitySpawn {
    pub handle: EntityHandle,
    pub classname: String,
    #[serde(default)]
    pub keyvalues: KeyValues,
}

impl EntitySpawn {
    pub fn new(handle: EntityHandle, classname: impl Into<String>, keyvalues: KeyValues) -> Self {
        Self { handle, classname: classname.into(), keyvalues }
    }
}

/// Raw keyvalue as written in a YAML spawn fixture.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawValue {
    fn into_string(self) -> String {
        match self {
            RawValue::Bool(b) => if b { "1" } else { "0" }.to_string(),
            RawValue::Int(i) => i.to_string(),
            RawValue::Float(f) => f.to_string(),
            RawValue::Text(s) => s,
        }
    }
}

/// Keyvalue attributes of a spawned entity.
///
/// The host hands every value over as a string; the typed getters parse on
/// read and fall back to the declared default when the key is absent.
/// Present but malformed values are an error, not a silent default.
#[derive(Debug, Clone, Default)]
pub struct KeyValues(HashMap<String, String>);

impl<'de> Deserialize<'de> for KeyValues {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = HashMap::<String, RawValue>::deserialize(deserializer)?;
        Ok(Self(raw.into_iter().map(|(k, v)| (k, v.into_string())).collect()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KeyValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl KeyValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(|v| v.trim())
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or(default).to_string()
    }

    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.to_ascii_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            _ => Err(MappingError::invalid_attribute(key, value)),
        }
    }

    pub fn int_or(&self, key: &str, default: i64) -> Result<i64> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        value.parse::<i64>().map_err(|_| MappingError::invalid_attribute(key, value))
    }

    pub fn float_or(&self, key: &str, default: f32) -> Result<f32> {
        let Some(value) = self.get(key) else {
            return Ok(default);
        };
        match value.parse::<f32>() {
            Ok(parsed) if parsed.is_finite() => Ok(parsed),
            _ => Err(MappingError::invalid_attribute(key, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_only_when_absent() {
        let kv: KeyValues = [("present", "0"), ("delay", "0.5")].into_iter().collect();
        assert!(!kv.bool_or("present", true).unwrap());
        assert!(kv.bool_or("absent", true).unwrap());
        assert_eq!(kv.float_or("delay", 0.1).unwrap(), 0.5);
        assert_eq!(kv.float_or("missing", 0.1).unwrap(), 0.1);
        assert_eq!(kv.int_or("missing", 7).unwrap(), 7);
    }

    #[test]
    fn malformed_values_are_errors() {
        let kv: KeyValues = [("flag", "maybe"), ("number", "two"), ("time", "inf")].into_iter().collect();
        assert_eq!(kv.bool_or("flag", false), Err(MappingError::invalid_attribute("flag", "maybe")));
        assert!(kv.int_or("number", 0).is_err());
        assert!(kv.float_or("time", 0.0).is_err());
    }

    #[test]
    fn yaml_values_of_any_scalar_type() {
        let yaml = "handle: { index: 4, serial: 2 }\nclassname: trigger_multiple\nkeyvalues:\n  timer_trigger_type: 8\n  timer_modifier_enable_slide: true\n  timer_anti_bhop_time: 0.25\n  timer_zone_course_descriptor: Main\n";
        let spawn: EntitySpawn = serde_yaml_ng::from_str(yaml).unwrap();
        assert_eq!(spawn.handle, EntityHandle::new(4, 2));
        assert_eq!(spawn.keyvalues.int_or("timer_trigger_type", 0).unwrap(), 8);
        assert!(spawn.keyvalues.bool_or("timer_modifier_enable_slide", false).unwrap());
        assert_eq!(spawn.keyvalues.float_or("timer_anti_bhop_time", 0.0).unwrap(), 0.25);
        assert_eq!(spawn.keyvalues.get("timer_zone_course_descriptor"), Some("Main"));
    }
}
