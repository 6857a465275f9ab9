//! Data model for extracted and assembled documentation.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One documented function as emitted by a parsing engine.
///
/// Only the fields the pipeline reads are typed. The decoded value itself is
/// kept in `raw` and written back out verbatim as `content`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawDocRecord {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    /// `None` when the engine reported no parameter list at all.
    #[serde(default)]
    pub params: Option<Vec<Parameter>>,
    #[serde(skip)]
    pub raw: Value,
}

impl RawDocRecord {
    /// Decode one engine record, keeping the untouched value alongside.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let mut record: RawDocRecord = serde_json::from_value(value.clone())?;
        record.raw = value;
        Ok(record)
    }
}

/// A documented parameter. Dotted names (`options.year`) refer to a property
/// of another parameter until the tree builder reparents them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub optional: bool,
    #[serde(default, rename = "isProperty", skip_serializing_if = "is_false")]
    pub is_property: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub props: Option<Vec<Parameter>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Parameter {
    #[cfg(test)]
    pub fn named(name: &str) -> Self {
        Parameter {
            name: name.to_string(),
            optional: false,
            is_property: false,
            props: None,
            extra: Map::new(),
        }
    }
}

fn is_false(b: &bool) -> bool {
    !*b
}

/// Fixed order of the usage tabs shown next to every entry.
pub const USAGE_TABS: [&str; 3] = ["commonjs", "umd", "es2015"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageSnippet {
    pub title: String,
    pub code: String,
}

/// One snippet per supported module-loading convention.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Usage {
    pub commonjs: UsageSnippet,
    pub umd: UsageSnippet,
    pub es2015: UsageSnippet,
}

/// An assembled, source-derived documentation entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocEntry {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url_id: String,
    pub category: Option<String>,
    pub title: String,
    pub description: Option<String>,
    /// The raw record exactly as the engine produced it.
    pub content: Value,
    pub args: Option<Vec<Parameter>>,
    pub usage: Usage,
    pub usage_tabs: [&'static str; 3],
    pub syntax: String,
}

/// A free-form document loaded verbatim from disk.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticDoc {
    #[serde(rename = "type")]
    pub kind: String,
    pub category: String,
    pub path: String,
    pub content: String,
    #[serde(flatten)]
    pub meta: Map<String, Value>,
}

/// Anything that can sit in a category list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GroupItem {
    Entry(DocEntry),
    Static(StaticDoc),
}

/// Final artifact: category name to entries, in configured group order.
pub type GroupedDocs = IndexMap<String, Vec<GroupItem>>;
