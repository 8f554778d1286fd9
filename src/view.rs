//! Rendering of field registries to aligned text and JSON.

use crate::fields::{FieldCompute, FieldRegistry};
use serde::Serialize;

/// One resolved field, ready for serialization.
#[derive(Debug, Clone, Serialize)]
pub struct FieldView {
    pub tag: String,
    pub label: String,
    pub value: String,
    pub hidden: bool,
}

/// Resolves a registry into views, in traversal order. Hidden detail
/// fields are skipped unless `all` is set.
pub fn field_views(
    registry: &FieldRegistry,
    owner: &dyn FieldCompute,
    all: bool,
) -> Vec<FieldView> {
    registry
        .iter()
        .filter(|f| all || !f.hidden())
        .map(|f| FieldView {
            tag: f.tag().to_string(),
            label: f.label().to_string(),
            value: f.value(owner),
            hidden: f.hidden(),
        })
        .collect()
}

/// Renders a registry as aligned `label : value` lines.
pub fn render_text(registry: &FieldRegistry, owner: &dyn FieldCompute, all: bool) -> String {
    let views = field_views(registry, owner, all);
    let width = views.iter().map(|v| v.label.len()).max().unwrap_or(0);

    let mut out = String::new();
    for v in &views {
        out.push_str(&format!("{:<width$} : {}\n", v.label, v.value));
    }
    out
}

/// Renders a registry as a JSON array of field objects.
pub fn render_json(
    registry: &FieldRegistry,
    owner: &dyn FieldCompute,
    all: bool,
) -> serde_json::Value {
    serde_json::json!(field_views(registry, owner, all))
}
