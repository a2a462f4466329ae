//! Word list model: ordered, weighted keyword entries with unique ids.
//!
//! All operations are pure: they take the current list and return a new
//! one, never mutating entries in place. Identity is the opaque `id`;
//! `text` may duplicate across entries and is immutable after creation.

use serde::{Deserialize, Serialize};

/// A single weighted keyword entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Opaque unique identifier within a list
    pub id: String,
    /// Keyword text (non-empty, trimmed)
    pub text: String,
    /// Positive weight driving the rendered font size
    pub weight: f32,
}

/// Generates opaque unique ids for word entries.
///
/// Manual adds draw from a monotonic counter so entity creation stays
/// deterministic under test. Suggestion-derived entries use
/// [`IdGen::suggested`], which embeds the response index and a
/// generation timestamp.
#[derive(Debug, Clone, Default)]
pub struct IdGen {
    next: u64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next fresh id for a manually added word.
    pub fn fresh(&mut self) -> String {
        self.next += 1;
        format!("w{}", self.next)
    }

    /// Deterministic id for the `index`-th entry of a suggestion response
    /// generated at `stamp` (unix milliseconds).
    pub fn suggested(index: usize, stamp: u128) -> String {
        format!("ai-{}-{}", index, stamp)
    }
}

/// Ordered collection of [`Word`] entries, most recent first for manual
/// adds. Ids are unique within the list at all times.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WordList {
    words: Vec<Word>,
}

impl WordList {
    /// An empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from pre-formed entries (ids are taken as-is).
    pub fn from_words(words: Vec<Word>) -> Self {
        Self { words }
    }

    /// The built-in starter list shown before any editing.
    pub fn seed() -> Self {
        let entries = [
            ("1", "人工智能", 5.0),
            ("2", "云计算", 4.0),
            ("3", "视觉设计", 3.0),
            ("4", "大数据", 3.0),
            ("5", "数据可视化", 4.0),
            ("6", "响应式", 2.0),
            ("7", "极简主义", 2.0),
            ("8", "创意", 3.0),
            ("9", "交互", 3.0),
        ];
        Self {
            words: entries
                .iter()
                .map(|(id, text, weight)| Word {
                    id: id.to_string(),
                    text: text.to_string(),
                    weight: *weight,
                })
                .collect(),
        }
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    /// Prepend a new entry with a fresh id. Blank text (after trimming)
    /// leaves the list unchanged.
    pub fn add(&self, text: &str, weight: f32, ids: &mut IdGen) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return self.clone();
        }
        let mut words = Vec::with_capacity(self.words.len() + 1);
        words.push(Word {
            id: ids.fresh(),
            text: trimmed.to_string(),
            weight,
        });
        words.extend(self.words.iter().cloned());
        Self { words }
    }

    /// Remove the entry with the given id. Absent ids are a no-op.
    pub fn remove(&self, id: &str) -> Self {
        Self {
            words: self
                .words
                .iter()
                .filter(|w| w.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Replace the weight on the matching entry, leaving everything else
    /// untouched. Absent ids are a no-op. Weight range enforcement is a
    /// producer-side constraint and is not applied here.
    pub fn update_weight(&self, id: &str, weight: f32) -> Self {
        Self {
            words: self
                .words
                .iter()
                .map(|w| {
                    if w.id == id {
                        Word {
                            weight,
                            ..w.clone()
                        }
                    } else {
                        w.clone()
                    }
                })
                .collect(),
        }
    }

    /// Wholesale substitution, discarding all prior entries. Used for
    /// suggestion results.
    pub fn replace_all(&self, words: Vec<Word>) -> Self {
        Self { words }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(id: &str, text: &str, weight: f32) -> Word {
        Word {
            id: id.to_string(),
            text: text.to_string(),
            weight,
        }
    }

    #[test]
    fn add_prepends_with_fresh_id() {
        let mut ids = IdGen::new();
        let list = WordList::new().add("rust", 5.0, &mut ids);
        let list = list.add("wasm", 3.0, &mut ids);
        assert_eq!(list.len(), 2);
        assert_eq!(list.words()[0].text, "wasm");
        assert_eq!(list.words()[1].text, "rust");
        assert_ne!(list.words()[0].id, list.words()[1].id);
    }

    #[test]
    fn add_blank_text_is_a_noop() {
        let mut ids = IdGen::new();
        let list = WordList::seed();
        assert_eq!(list.add("", 2.0, &mut ids), list);
        assert_eq!(list.add("   ", 2.0, &mut ids), list);
    }

    #[test]
    fn add_trims_text() {
        let mut ids = IdGen::new();
        let list = WordList::new().add("  cloud  ", 1.0, &mut ids);
        assert_eq!(list.words()[0].text, "cloud");
    }

    #[test]
    fn remove_by_id() {
        let list = WordList::seed();
        let removed = list.remove("3");
        assert_eq!(removed.len(), list.len() - 1);
        assert!(removed.get("3").is_none());
    }

    #[test]
    fn remove_absent_id_is_a_noop() {
        let list = WordList::seed();
        assert_eq!(list.remove("nope"), list);
    }

    #[test]
    fn update_weight_touches_only_the_target() {
        let list = WordList::seed();
        let updated = list.update_weight("2", 9.0);
        assert_eq!(updated.get("2").map(|w| w.weight), Some(9.0));
        for (before, after) in list.words().iter().zip(updated.words()) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.text, after.text);
            if before.id != "2" {
                assert_eq!(before.weight, after.weight);
            }
        }
    }

    #[test]
    fn update_weight_absent_id_is_a_noop() {
        let list = WordList::seed();
        assert_eq!(list.update_weight("nope", 1.0), list);
    }

    #[test]
    fn rapid_weight_updates_converge_to_last_value() {
        let mut list = WordList::seed();
        for w in [1.0, 7.0, 2.0, 4.0] {
            list = list.update_weight("5", w);
        }
        assert_eq!(list.get("5").map(|w| w.weight), Some(4.0));
    }

    #[test]
    fn replace_all_discards_prior_entries() {
        let list = WordList::seed();
        let fresh = vec![word("a", "alpha", 1.0), word("b", "beta", 2.0)];
        let replaced = list.replace_all(fresh.clone());
        assert_eq!(replaced.words(), fresh.as_slice());
    }

    #[test]
    fn suggested_ids_embed_index_and_stamp() {
        assert_eq!(IdGen::suggested(0, 42), "ai-0-42");
        assert_eq!(IdGen::suggested(19, 1700000000000), "ai-19-1700000000000");
    }

    #[test]
    fn seed_list_ids_are_unique() {
        let list = WordList::seed();
        let mut ids: Vec<_> = list.words().iter().map(|w| w.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), list.len());
    }
}
