//! Per-kind projection of catalog records.
//!
//! Every record is classified before it is projected:
//!
//! 1. records without a truthy `name` or `template_id` are skipped;
//! 2. records flagged `builtin` take the built-in shape, whatever their type;
//! 3. records of type `qemu` take the virtual-machine shape;
//! 4. everything else is skipped.
//!
//! The built-in check runs first, so a built-in `qemu` record loses its
//! virtual-machine fields.

use std::collections::HashMap;

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::record::{TemplateRecord, QEMU_TEMPLATE_TYPE};

/// Compute id given to built-in templates and to VM templates lacking one.
pub const LOCAL_COMPUTE: &str = "local";

/// Value used when a record lacks a field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldDefault {
    Null,
    Integer(i64),
    Bool(bool),
    Text(&'static str),
}

impl FieldDefault {
    pub fn to_value(self) -> Value {
        match self {
            FieldDefault::Null => Value::Null,
            FieldDefault::Integer(i) => Value::from(i),
            FieldDefault::Bool(b) => Value::Bool(b),
            FieldDefault::Text(s) => Value::from(s),
        }
    }
}

/// One output field: where it is read from and what fills it when absent.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub key: &'static str,
    /// Record fields to read, first present one wins
    pub sources: &'static [&'static str],
    pub default: FieldDefault,
}

impl FieldRule {
    const fn same(key: &'static str, default: FieldDefault) -> Self {
        Self {
            key,
            sources: &[],
            default,
        }
    }

    fn source_keys(&self) -> &[&'static str] {
        if self.sources.is_empty() {
            std::slice::from_ref(&self.key)
        } else {
            self.sources
        }
    }

    /// A present field is copied as is, even when it is `null`.
    pub fn apply(&self, record: &TemplateRecord<'_>) -> Value {
        self.source_keys()
            .iter()
            .find_map(|key| record.get(key))
            .cloned()
            .unwrap_or_else(|| self.default.to_value())
    }
}

/// Top-level VM fields that come from the record, in output order.
pub const QEMU_FIELDS: &[FieldRule] = &[
    FieldRule::same("first_port_name", FieldDefault::Null),
    FieldRule::same("port_name_format", FieldDefault::Null),
];

/// VM `properties` fields, in output order.
pub const QEMU_PROPERTIES: &[FieldRule] = &[
    FieldRule::same("adapter_type", FieldDefault::Null),
    FieldRule::same("adapters", FieldDefault::Integer(0)),
    FieldRule::same("console_type", FieldDefault::Null),
    FieldRule::same("cpus", FieldDefault::Integer(1)),
    FieldRule::same("hda_disk_image", FieldDefault::Null),
    FieldRule::same("hda_disk_interface", FieldDefault::Null),
    FieldRule::same("hdb_disk_image", FieldDefault::Null),
    FieldRule::same("hdb_disk_interface", FieldDefault::Null),
    FieldRule::same("hdc_disk_image", FieldDefault::Null),
    FieldRule::same("hdc_disk_interface", FieldDefault::Null),
    FieldRule::same("ram", FieldDefault::Integer(0)),
    FieldRule::same("boot_priority", FieldDefault::Null),
    FieldRule {
        key: "image_path",
        sources: &["qemu_path", "image_path"],
        default: FieldDefault::Null,
    },
    FieldRule::same("replicate_network_connection_state", FieldDefault::Bool(false)),
];

const QEMU_COMPUTE: FieldRule = FieldRule::same("compute_id", FieldDefault::Text(LOCAL_COMPUTE));

/// Classification of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    Builtin,
    Qemu,
}

/// Decide which shape a record takes, if any.
pub fn classify(record: &TemplateRecord<'_>) -> Option<TemplateKind> {
    if record.name().is_none() || record.template_id().is_none() {
        return None;
    }
    if record.is_builtin() {
        return Some(TemplateKind::Builtin);
    }
    match record.template_type() {
        Some(Value::String(kind)) if kind == QEMU_TEMPLATE_TYPE => Some(TemplateKind::Qemu),
        _ => None,
    }
}

/// Built-in template shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BuiltinTemplate {
    pub compute_id: Value,
    pub node_type: Value,
    pub symbol: Value,
    pub template_id: Value,
}

/// QEMU virtual-machine template shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QemuTemplate {
    pub compute_id: Value,
    pub node_type: Value,
    pub symbol: Value,
    pub template_id: Value,
    #[serde(flatten)]
    pub ports: Map<String, Value>,
    pub properties: Map<String, Value>,
}

/// A record projected into its kind's output shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum NormalizedTemplate {
    Builtin(BuiltinTemplate),
    Qemu(QemuTemplate),
}

impl NormalizedTemplate {
    pub fn kind(&self) -> TemplateKind {
        match self {
            NormalizedTemplate::Builtin(_) => TemplateKind::Builtin,
            NormalizedTemplate::Qemu(_) => TemplateKind::Qemu,
        }
    }

    /// Project a record; `None` for records that classify to nothing.
    pub fn from_record(record: &TemplateRecord<'_>) -> Option<Self> {
        let template_id = record.template_id()?.clone();
        let template = match classify(record)? {
            TemplateKind::Builtin => NormalizedTemplate::Builtin(BuiltinTemplate {
                compute_id: Value::from(LOCAL_COMPUTE),
                node_type: record.get_or_null("template_type"),
                symbol: record.get_or_null("symbol"),
                template_id,
            }),
            TemplateKind::Qemu => NormalizedTemplate::Qemu(QemuTemplate {
                compute_id: QEMU_COMPUTE.apply(record),
                node_type: record.get_or_null("template_type"),
                symbol: record.get_or_null("symbol"),
                template_id,
                ports: project(QEMU_FIELDS, record),
                properties: project(QEMU_PROPERTIES, record),
            }),
        };
        Some(template)
    }
}

fn project(rules: &[FieldRule], record: &TemplateRecord<'_>) -> Map<String, Value> {
    rules
        .iter()
        .map(|rule| (rule.key.to_string(), rule.apply(record)))
        .collect()
}

/// Normalized templates keyed by name.
///
/// Keys keep the position of their first insertion; inserting an existing
/// key replaces its template wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedCatalog {
    entries: Vec<(String, NormalizedTemplate)>,
    index: HashMap<String, usize>,
}

impl NormalizedCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the replaced template.
    pub fn insert(&mut self, name: String, template: NormalizedTemplate) -> Option<NormalizedTemplate> {
        match self.index.get(&name).copied() {
            Some(position) => Some(std::mem::replace(&mut self.entries[position].1, template)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, template));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&NormalizedTemplate> {
        self.index.get(name).map(|&position| &self.entries[position].1)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &NormalizedTemplate)> {
        self.entries.iter().map(|(name, template)| (name.as_str(), template))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for NormalizedCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, template) in &self.entries {
            map.serialize_entry(name, template)?;
        }
        map.end()
    }
}

/// Normalize a batch of raw records.
pub fn normalize(records: &[Value]) -> NormalizedCatalog {
    let mut catalog = NormalizedCatalog::new();
    let mut skipped = 0usize;

    for value in records {
        let Some(record) = TemplateRecord::from_value(value) else {
            warn!("Skipping catalog entry that is not an object");
            skipped += 1;
            continue;
        };

        let Some(template) = NormalizedTemplate::from_record(&record) else {
            skipped += 1;
            continue;
        };

        let Some(name) = record.key() else {
            warn!("Skipping template with a non-scalar name: {}", value);
            skipped += 1;
            continue;
        };

        debug!("Normalized template {} as {:?}", name, template.kind());
        if catalog.insert(name.clone(), template).is_some() {
            debug!("Template {} replaced an earlier entry", name);
        }
    }

    info!(
        "Normalized {} templates ({} records skipped)",
        catalog.len(),
        skipped
    );
    catalog
}
