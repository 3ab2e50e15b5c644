//! Untyped template records as served by the catalog.

use serde_json::{Map, Value};

/// Template kind tag of QEMU virtual machines.
pub const QEMU_TEMPLATE_TYPE: &str = "qemu";

/// Borrowed view over one catalog record.
#[derive(Debug, Clone, Copy)]
pub struct TemplateRecord<'a> {
    fields: &'a Map<String, Value>,
}

impl<'a> TemplateRecord<'a> {
    /// View a JSON value as a record; non-objects are not records.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(|fields| Self { fields })
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.fields.get(key)
    }

    /// Field value, or `Null` when absent.
    pub fn get_or_null(&self, key: &str) -> Value {
        self.get(key).cloned().unwrap_or(Value::Null)
    }

    pub fn name(&self) -> Option<&'a Value> {
        self.get("name").filter(|v| is_truthy(v))
    }

    pub fn template_id(&self) -> Option<&'a Value> {
        self.get("template_id").filter(|v| is_truthy(v))
    }

    pub fn template_type(&self) -> Option<&'a Value> {
        self.get("template_type")
    }

    pub fn is_builtin(&self) -> bool {
        self.get("builtin").map_or(false, is_truthy)
    }

    /// Output key for this record: the name rendered as a string.
    ///
    /// Numbers and booleans are rendered the way a JSON object key would be;
    /// arrays and objects cannot name a template.
    pub fn key(&self) -> Option<String> {
        match self.name()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// JSON truthiness: null, false, zero and empty values are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
