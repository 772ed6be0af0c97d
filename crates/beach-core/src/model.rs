use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ---------------------------------------------------------------------------
// BeachRecord
// ---------------------------------------------------------------------------

/// One beach's full attribute set, as seeded into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeachRecord {
    pub id: String,
    pub name: String,
    pub location: String,
    pub temperature: f64,
    pub wave_height: f64,
    pub ocean_currents: String,
    pub is_safe: bool,
    pub latitude: f64,
    pub longitude: f64,
    pub description: String,
}

// ---------------------------------------------------------------------------
// BeachPatch
// ---------------------------------------------------------------------------

/// Partial update body. The identifier is not patchable; unknown fields are
/// ignored on deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeachPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wave_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocean_currents: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_safe: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl BeachPatch {
    /// True when the patch touches an input of the safety evaluation.
    pub fn touches_conditions(&self) -> bool {
        self.wave_height.is_some() || self.ocean_currents.is_some()
    }

    /// The patch as a JSON field map, containing only the fields that are set.
    pub fn to_fields(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// StoredBeach
// ---------------------------------------------------------------------------

/// A document as it sits in the store: the store's internal addressing key
/// plus the raw JSON. Kept untyped so malformed entries can be reported
/// instead of failing the whole read.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredBeach {
    pub key: String,
    pub data: Value,
}

impl StoredBeach {
    pub fn new(key: impl Into<String>, data: Value) -> Self {
        Self {
            key: key.into(),
            data,
        }
    }

    /// The domain identifier. Numeric ids are accepted and rendered as strings.
    pub fn id(&self) -> Option<String> {
        match self.data.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    pub fn location(&self) -> Option<&str> {
        self.str_field("location")
    }

    pub fn ocean_currents(&self) -> Option<&str> {
        self.str_field("oceanCurrents")
    }

    pub fn wave_height(&self) -> Option<f64> {
        self.data.get("waveHeight").and_then(Value::as_f64)
    }

    pub fn is_safe(&self) -> Option<bool> {
        self.data.get("isSafe").and_then(Value::as_bool)
    }

    fn str_field(&self, field: &str) -> Option<&str> {
        self.data
            .get(field)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}
