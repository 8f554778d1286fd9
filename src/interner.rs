//! Deduplicating string store with per-entry occurrence counting.
//!
//! Every distinct attribute value seen during a scan (model name, part code,
//! feature flag, max frequency, ...) is interned exactly once; the weight of
//! an entry counts how many cores contributed it. The "4x Cortex-A53" style
//! summaries are read straight off these counts.

use std::sync::Arc;

/// One interned string and its accumulated weight.
#[derive(Debug, Clone)]
struct Entry {
    text: Arc<str>,
    weight: u32,
}

/// Insertion-ordered, deduplicating string table.
///
/// Entries are never removed. Consumers hold `Arc<str>` handles into the
/// table, so re-referencing a value from another record never copies the
/// text. Lookup is linear; the table is bounded by attribute cardinality
/// (a handful of distinct values), not by core count.
#[derive(Debug, Clone, Default)]
pub struct WeightedStringTable {
    entries: Vec<Entry>,
}

impl WeightedStringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `text` with weight 1.
    pub fn intern(&mut self, text: &str) -> Arc<str> {
        self.intern_weighted(text, 1)
    }

    /// Interns `text`, adding `weight` to its count.
    ///
    /// Returns a handle to the single stored copy of `text`; repeated calls
    /// with equal text return handles to the same allocation.
    pub fn intern_weighted(&mut self, text: &str, weight: u32) -> Arc<str> {
        for entry in &mut self.entries {
            if entry.text.as_ref() == text {
                entry.weight += weight;
                return Arc::clone(&entry.text);
            }
        }
        let text: Arc<str> = Arc::from(text);
        self.entries.push(Entry {
            text: Arc::clone(&text),
            weight,
        });
        text
    }

    /// Accumulated weight for `text`, or 0 if it was never interned.
    pub fn weight_of(&self, text: &str) -> u32 {
        self.entries
            .iter()
            .find(|e| e.text.as_ref() == text)
            .map(|e| e.weight)
            .unwrap_or(0)
    }

    /// Iterates `(text, weight)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|e| (e.text.as_ref(), e.weight))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intern_deduplicates() {
        let mut table = WeightedStringTable::new();
        let a = table.intern("Cortex-A53");
        let b = table.intern("Cortex-A53");

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(table.len(), 1);
        assert_eq!(table.weight_of("Cortex-A53"), 2);
    }

    #[test]
    fn test_weight_sums_across_insertions() {
        let mut table = WeightedStringTable::new();
        table.intern_weighted("neon", 4);
        table.intern("neon");
        table.intern_weighted("neon", 2);

        assert_eq!(table.weight_of("neon"), 7);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let mut table = WeightedStringTable::new();
        table.intern("b");
        table.intern("a");
        table.intern("b");
        table.intern("c");

        let texts: Vec<&str> = table.iter().map(|(t, _)| t).collect();
        assert_eq!(texts, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_weight_of_missing_is_zero() {
        let table = WeightedStringTable::new();
        assert_eq!(table.weight_of("absent"), 0);
        assert!(table.is_empty());
    }
}
