//! Field-export registry.
//!
//! The property-replication layer is told which class paths to decode
//! through a list of field-export descriptors. Callers hand that list over
//! as arbitrarily nested groups; [`FieldExportRegistry::build`] flattens it,
//! discards descriptors that cannot be matched against anything (no path),
//! and lets later descriptors override earlier ones with the same identity.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

/// One field-export descriptor.
///
/// Only the identity fields and `path` are interpreted here; everything else
/// (property tables, parse levels, ...) is carried through in `extra` for the
/// replication layer.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldExport {
    /// Class paths this export applies to. Required to be non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<String>>,
    /// Caller-chosen name overriding `export_name` for identity purposes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_export_name: Option<String>,
    /// Name the replication layer emits events under.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_name: Option<String>,
    /// Declared export type (`"class"`, `"object"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_type: Option<String>,
    /// Everything else, verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl FieldExport {
    /// The non-empty path list, if any.
    pub fn valid_path(&self) -> Option<&[String]> {
        self.path.as_deref().filter(|p| !p.is_empty())
    }

    /// Identity used for override detection: the most specific non-empty
    /// name joined with the path.
    pub fn identity(&self) -> String {
        let name = non_empty(&self.custom_export_name)
            .or(non_empty(&self.export_name))
            .or(non_empty(&self.export_type))
            .unwrap_or_default();
        let path = self.path.as_deref().unwrap_or_default().join(",");
        format!("{name}|{path}")
    }

    /// Human-readable label for diagnostics.
    pub fn describe(&self) -> String {
        if let Some(name) = non_empty(&self.custom_export_name).or(non_empty(&self.export_name)) {
            return name.to_string();
        }
        if let Some(path) = &self.path {
            return path.join(",");
        }
        serde_json::to_string(self).unwrap_or_else(|_| String::from("<field export>"))
    }
}

fn non_empty(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|s| !s.is_empty())
}

/// A node of the nested descriptor list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExportNode {
    /// An explicit `null`; skipped silently.
    Null,
    /// A nested list.
    Group(Vec<ExportNode>),
    /// A descriptor.
    Entry(FieldExport),
    /// Anything else (a stray string, number or boolean); discarded.
    Invalid(Value),
}

impl From<FieldExport> for ExportNode {
    fn from(e: FieldExport) -> Self {
        Self::Entry(e)
    }
}

/// Leaf nodes (entries and invalid values) depth-first, dropping nulls.
fn leaves(nodes: &[ExportNode]) -> Vec<&ExportNode> {
    let mut out = Vec::new();
    let mut stack: Vec<&ExportNode> = nodes.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            ExportNode::Null => {}
            ExportNode::Group(children) => stack.extend(children.iter().rev()),
            leaf => out.push(leaf),
        }
    }
    out
}

/// Flatten nested nodes depth-first, preserving order and dropping nulls
/// and invalid values.
pub fn flatten(nodes: &[ExportNode]) -> Vec<&FieldExport> {
    leaves(nodes)
        .into_iter()
        .filter_map(|node| match node {
            ExportNode::Entry(e) => Some(e),
            _ => None,
        })
        .collect()
}

/// The validated, deduplicated descriptor list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FieldExportRegistry {
    entries: IndexMap<String, FieldExport>,
    discarded: usize,
}

impl FieldExportRegistry {
    /// Build from nested nodes.
    ///
    /// Descriptors without a non-empty path, and leaves that are not
    /// descriptors at all, are discarded; with `verbose` set the discarded
    /// ones are reported through `tracing`. A descriptor whose identity was
    /// already seen replaces the earlier payload but keeps its position.
    pub fn build(nodes: &[ExportNode], verbose: bool) -> Self {
        let mut entries = IndexMap::new();
        let mut invalid = Vec::new();
        for node in leaves(nodes) {
            let export = match node {
                ExportNode::Entry(export) => export,
                other => {
                    invalid.push(serde_json::to_string(other).unwrap_or_default());
                    continue;
                }
            };
            if export.valid_path().is_none() {
                invalid.push(export.describe());
                continue;
            }
            entries.insert(export.identity(), export.clone());
        }
        if verbose && !invalid.is_empty() {
            warn!(
                count = invalid.len(),
                exports = %invalid.join(", "),
                "ignoring field exports without a valid path"
            );
        }
        Self {
            entries,
            discarded: invalid.len(),
        }
    }

    /// Number of retained descriptors.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no descriptor was retained.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of descriptors dropped for lacking a path.
    pub fn discarded(&self) -> usize {
        self.discarded
    }

    /// Look up a descriptor by [`FieldExport::identity`].
    pub fn get(&self, identity: &str) -> Option<&FieldExport> {
        self.entries.get(identity)
    }

    /// Retained descriptors in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldExport> {
        self.entries.values()
    }

    /// Consume into the flat list handed to the replication layer.
    pub fn into_vec(self) -> Vec<FieldExport> {
        self.entries.into_values().collect()
    }
}
