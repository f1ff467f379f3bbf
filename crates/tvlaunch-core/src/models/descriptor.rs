use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

/// What the host should do with the payload.
///
/// Serializes as the host action string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LaunchAction {
    View,
    InstallPackage,
    ManageUnknownAppSources,
}

impl LaunchAction {
    /// Host action string.
    pub fn as_action_str(self) -> &'static str {
        match self {
            Self::View => "android.intent.action.VIEW",
            Self::InstallPackage => "android.intent.action.INSTALL_PACKAGE",
            Self::ManageUnknownAppSources => "android.settings.MANAGE_UNKNOWN_APP_SOURCES",
        }
    }
}

impl Serialize for LaunchAction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_action_str())
    }
}

/// A single extra value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExtraValue {
    Bool(bool),
    Int(i64),
    Str(String),
    StrArray(Vec<String>),
    /// Array of parsed URIs, distinct from plain strings on the receiving side.
    UriArray(Vec<String>),
}

impl ExtraValue {
    pub fn is_array(&self) -> bool {
        matches!(self, Self::StrArray(_) | Self::UriArray(_))
    }
}

impl From<bool> for ExtraValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for ExtraValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<&str> for ExtraValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_string())
    }
}

impl From<String> for ExtraValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

/// Insertion-ordered key/value extras.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extras {
    entries: Vec<(String, ExtraValue)>,
}

impl Extras {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced key keeps its original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExtraValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ExtraValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key)? {
            ExtraValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            ExtraValue::Str(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ExtraValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn has_arrays(&self) -> bool {
        self.entries.iter().any(|(_, v)| v.is_array())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert a JSON object into extras. Non-objects yield `None`.
    ///
    /// Integral numbers become `Int`, strings `Str`, booleans `Bool` and
    /// arrays of strings `StrArray`. Anything else is dropped.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut extras = Extras::new();
        for (key, v) in object {
            let converted = match v {
                serde_json::Value::Bool(b) => Some(ExtraValue::Bool(*b)),
                serde_json::Value::Number(n) => json_int(n).map(ExtraValue::Int),
                serde_json::Value::String(s) => Some(ExtraValue::Str(s.clone())),
                serde_json::Value::Array(items) => items
                    .iter()
                    .map(|i| i.as_str().map(str::to_string))
                    .collect::<Option<Vec<_>>>()
                    .map(ExtraValue::StrArray),
                _ => None,
            };
            if let Some(converted) = converted {
                extras.insert(key.clone(), converted);
            }
        }
        Some(extras)
    }
}

/// Integral JSON number. Whole floats such as `95.0` count; fractions do not.
fn json_int(n: &serde_json::Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64)
            .map(|f| f as i64)
    })
}

impl Serialize for Extras {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Navigation and permission flags on a launch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LaunchFlags {
    pub clear_top: bool,
    pub single_top: bool,
    pub new_task: bool,
    pub grant_read_uri: bool,
}

impl LaunchFlags {
    /// Player launches: a new launch replaces a foregrounded player instead of stacking.
    pub const PLAYER: LaunchFlags = LaunchFlags {
        clear_top: true,
        single_top: true,
        new_task: false,
        grant_read_uri: false,
    };

    /// Launches into a separate task with read access to the payload URI.
    pub const SHARED_FILE: LaunchFlags = LaunchFlags {
        clear_top: false,
        single_top: false,
        new_task: true,
        grant_read_uri: true,
    };

    pub const NEW_TASK: LaunchFlags = LaunchFlags {
        clear_top: false,
        single_top: false,
        new_task: true,
        grant_read_uri: false,
    };
}

/// Fully resolved, player-agnostic activity launch request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchDescriptor {
    pub action: LaunchAction,
    /// Package to launch. `None` lets the host pick a handler.
    pub target_package: Option<String>,
    pub data_uri: String,
    pub mime_type: Option<String>,
    pub extras: Extras,
    pub flags: LaunchFlags,
}

impl LaunchDescriptor {
    pub fn new(action: LaunchAction, data_uri: impl Into<String>) -> Self {
        Self {
            action,
            target_package: None,
            data_uri: data_uri.into(),
            mime_type: None,
            extras: Extras::new(),
            flags: LaunchFlags::default(),
        }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn with_target(mut self, package: Option<String>) -> Self {
        self.target_package = package;
        self
    }

    pub fn with_flags(mut self, flags: LaunchFlags) -> Self {
        self.flags = flags;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut extras = Extras::new();
        extras.insert("a", 1i64);
        extras.insert("b", true);
        extras.insert("a", 2i64);
        let keys: Vec<&str> = extras.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(extras.get_int("a"), Some(2));
    }

    #[test]
    fn test_typed_getters_reject_wrong_type() {
        let mut extras = Extras::new();
        extras.insert("position", "12");
        assert_eq!(extras.get_int("position"), None);
        assert_eq!(extras.get_str("position"), Some("12"));
    }

    #[test]
    fn test_from_json() {
        let json = serde_json::json!({
            "position": 95,
            "end_by": "user",
            "flag": true,
            "list": ["a", "b"],
            "ratio": 0.5,
            "nested": {"x": 1}
        });
        let extras = Extras::from_json(&json).unwrap();
        assert_eq!(extras.get_int("position"), Some(95));
        assert_eq!(extras.get_str("end_by"), Some("user"));
        assert_eq!(extras.get("flag"), Some(&ExtraValue::Bool(true)));
        assert!(extras.get("list").unwrap().is_array());
        assert!(!extras.contains_key("ratio"));
        assert!(!extras.contains_key("nested"));
    }

    #[test]
    fn test_from_json_whole_floats_are_ints() {
        let json = serde_json::json!({"position": 95.0, "duration": 100.0, "ratio": 95.5});
        let extras = Extras::from_json(&json).unwrap();
        assert_eq!(extras.get_int("position"), Some(95));
        assert_eq!(extras.get_int("duration"), Some(100));
        assert!(!extras.contains_key("ratio"));
    }

    #[test]
    fn test_action_serializes_as_host_action() {
        let descriptor = LaunchDescriptor::new(LaunchAction::View, "http://h/f.mkv");
        let json = serde_json::to_value(&descriptor).unwrap();
        assert_eq!(json["action"], "android.intent.action.VIEW");
        assert_eq!(
            serde_json::to_value(LaunchAction::InstallPackage).unwrap(),
            "android.intent.action.INSTALL_PACKAGE"
        );
    }

    #[test]
    fn test_from_json_non_object() {
        assert!(Extras::from_json(&serde_json::Value::Null).is_none());
        assert!(Extras::from_json(&serde_json::json!([1, 2])).is_none());
    }

    #[test]
    fn test_extras_serialize_in_order() {
        let mut extras = Extras::new();
        extras.insert("z", 1i64);
        extras.insert("a", "x");
        let json = serde_json::to_string(&extras).unwrap();
        assert_eq!(
            json,
            r#"{"z":{"type":"int","value":1},"a":{"type":"str","value":"x"}}"#
        );
    }
}
