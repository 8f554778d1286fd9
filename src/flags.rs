//! Feature-flag tokenization and the growing flag vocabulary.
//!
//! Each core's raw `Features`/`flags`/expanded-ISA string is split into
//! tokens; tokens are tallied into a weighted inventory (weight = how many
//! cores carry the flag) and unknown tokens extend the run's vocabulary.

use crate::interner::WeightedStringTable;
use tracing::debug;

/// Tokens longer than this are dropped outright. Truncating instead would
/// put a corrupt token into the vocabulary.
pub const MAX_FLAG_LEN: usize = 15;

/// Owned, append-only set of known flag tokens.
///
/// Membership is whole-token: `neon` being known says nothing about
/// `neonx`. Growth is idempotent across repeated scans of the same input.
#[derive(Debug, Clone, Default)]
pub struct FlagVocabulary {
    tokens: Vec<String>,
}

impl FlagVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the vocabulary from a static baseline list.
    pub fn with_known(known: &[&str]) -> Self {
        Self {
            tokens: known.iter().map(|t| t.to_string()).collect(),
        }
    }

    /// Whole-token membership test.
    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    /// Appends `token` if it is not already present. Returns true when the
    /// vocabulary grew.
    pub fn add_if_missing(&mut self, token: &str) -> bool {
        if self.contains(token) {
            return false;
        }
        self.tokens.push(token.to_string());
        true
    }

    /// Appends every token in `known` that is not already present.
    pub fn add_if_missing_all(&mut self, known: &[&str]) {
        for token in known {
            self.add_if_missing(token);
        }
    }

    /// Space-joined view of the vocabulary, for rendering.
    pub fn snapshot(&self) -> String {
        self.tokens.join(" ")
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

/// Tokenizes every distinct flag string in `per_core_flags` and tallies
/// tokens into `inventory` with the flag string's weight, so a token's
/// final weight is the number of cores carrying it. Previously unseen
/// tokens are appended to `vocab`.
pub fn collect_flags(
    per_core_flags: &WeightedStringTable,
    inventory: &mut WeightedStringTable,
    vocab: &mut FlagVocabulary,
) {
    let mut added = 0;
    for (flag_str, weight) in per_core_flags.iter() {
        for token in flag_str.split(' ') {
            if token.is_empty() || token.len() > MAX_FLAG_LEN {
                continue;
            }
            inventory.intern_weighted(token, weight);
            if vocab.add_if_missing(token) {
                added += 1;
            }
        }
    }
    if added > 0 {
        debug!(added, "flag scan found previously unknown flags");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_token_membership() {
        let vocab = FlagVocabulary::with_known(&["neon", "vfp"]);
        assert!(vocab.contains("neon"));
        // A substring match without boundaries would wrongly accept this.
        assert!(!vocab.contains("neonx"));
        assert!(!vocab.contains("eo"));
    }

    #[test]
    fn test_vocabulary_grows_append_only_and_idempotent() {
        let mut vocab = FlagVocabulary::with_known(&["neon"]);
        assert!(vocab.add_if_missing("neonx"));
        assert!(!vocab.add_if_missing("neonx"));
        assert_eq!(vocab.snapshot(), "neon neonx");
        assert_eq!(vocab.len(), 2);
    }

    #[test]
    fn test_collect_flags_weights_by_core_count() {
        let mut per_core = WeightedStringTable::new();
        // 3 cores share one flag string, a 4th differs.
        per_core.intern_weighted("fp asimd", 3);
        per_core.intern_weighted("fp sve", 1);

        let mut inventory = WeightedStringTable::new();
        let mut vocab = FlagVocabulary::with_known(&["fp", "asimd"]);
        collect_flags(&per_core, &mut inventory, &mut vocab);

        assert_eq!(inventory.weight_of("fp"), 4);
        assert_eq!(inventory.weight_of("asimd"), 3);
        assert_eq!(inventory.weight_of("sve"), 1);
        assert!(vocab.contains("sve"));
    }

    #[test]
    fn test_overlong_token_dropped_not_truncated() {
        let mut per_core = WeightedStringTable::new();
        per_core.intern_weighted("short averyveryverylongflagname", 1);

        let mut inventory = WeightedStringTable::new();
        let mut vocab = FlagVocabulary::new();
        collect_flags(&per_core, &mut inventory, &mut vocab);

        assert_eq!(inventory.weight_of("short"), 1);
        assert_eq!(inventory.len(), 1);
        assert_eq!(vocab.snapshot(), "short");
    }

    #[test]
    fn test_trailing_empty_token_tolerated() {
        let mut per_core = WeightedStringTable::new();
        per_core.intern_weighted("fp asimd ", 2);

        let mut inventory = WeightedStringTable::new();
        let mut vocab = FlagVocabulary::new();
        collect_flags(&per_core, &mut inventory, &mut vocab);

        assert_eq!(inventory.len(), 2);
        assert_eq!(inventory.weight_of("asimd"), 2);
    }

    #[test]
    fn test_collect_is_idempotent_on_vocabulary() {
        let mut per_core = WeightedStringTable::new();
        per_core.intern_weighted("fp asimd", 4);

        let mut vocab = FlagVocabulary::new();
        let mut inv1 = WeightedStringTable::new();
        collect_flags(&per_core, &mut inv1, &mut vocab);
        let after_first = vocab.snapshot();

        let mut inv2 = WeightedStringTable::new();
        collect_flags(&per_core, &mut inv2, &mut vocab);
        assert_eq!(vocab.snapshot(), after_first);
    }
}
