//! Ordered, tagged, lazily-computed field directory.
//!
//! Presentation code consumes a report as an insertion-ordered sequence of
//! `(tag, label, value, hidden)` tuples. Tags are stable machine-lookup
//! strings (`"cpu.thread[0].cpu_part"`); labels are human-facing. Most
//! values are computed once and cached; fields marked recompute (SoC
//! temperature, current frequency) re-read their source on every access.

use std::cell::OnceCell;
use std::collections::HashMap;

/// A value computed by asking the owning report. The variants form a
/// closed set; dispatch happens through [`FieldCompute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComputedField {
    ProcessorDescription,
    ProcessorName,
    CoreCount,
    /// Current scaling frequency of core at inventory index.
    CoreCurKhz(usize),
    SocTemp,
    BoardDescription,
    BoardIntro,
    BoardManufacturer,
    BoardMemorySpec,
    BoardRevisionCode,
    BoardSerial,
    BoardOvervolt,
}

/// Where a field's value comes from.
#[derive(Debug, Clone)]
pub enum FieldSource {
    Literal(String),
    Computed(ComputedField),
}

/// Capability for resolving computed field values, implemented by the
/// report that owns the registry.
pub trait FieldCompute {
    fn compute(&self, field: ComputedField) -> String;
}

/// One report field. Identity is the tag, unique within a registry.
#[derive(Debug)]
pub struct Field {
    tag: String,
    label: String,
    /// Detail field, skipped by default rendering.
    hidden: bool,
    /// Re-invoke the source on every access instead of caching.
    recompute: bool,
    source: FieldSource,
    cache: OnceCell<String>,
}

impl Field {
    pub fn literal(
        tag: impl Into<String>,
        label: impl Into<String>,
        hidden: bool,
        value: impl Into<String>,
    ) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            hidden,
            recompute: false,
            source: FieldSource::Literal(value.into()),
            cache: OnceCell::new(),
        }
    }

    pub fn computed(
        tag: impl Into<String>,
        label: impl Into<String>,
        hidden: bool,
        recompute: bool,
        source: ComputedField,
    ) -> Self {
        Self {
            tag: tag.into(),
            label: label.into(),
            hidden,
            recompute,
            source: FieldSource::Computed(source),
            cache: OnceCell::new(),
        }
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn recompute(&self) -> bool {
        self.recompute
    }

    /// Resolves the field's value against its owner.
    pub fn value(&self, owner: &dyn FieldCompute) -> String {
        match &self.source {
            FieldSource::Literal(v) => v.clone(),
            FieldSource::Computed(c) if self.recompute => owner.compute(*c),
            FieldSource::Computed(c) => self.cache.get_or_init(|| owner.compute(*c)).clone(),
        }
    }
}

/// Insertion-ordered mapping from tag to field.
#[derive(Debug, Default)]
pub struct FieldRegistry {
    fields: Vec<Field>,
    index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a field, or replaces the field with the same tag in place,
    /// keeping its position in the traversal order.
    pub fn insert(&mut self, field: Field) {
        if let Some(&i) = self.index.get(field.tag()) {
            self.fields[i] = field;
        } else {
            self.index.insert(field.tag().to_string(), self.fields.len());
            self.fields.push(field);
        }
    }

    pub fn get(&self, tag: &str) -> Option<&Field> {
        self.index.get(tag).map(|&i| &self.fields[i])
    }

    /// Iterates fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
