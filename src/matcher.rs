//! Fuzzy reference matching.
//!
//! When a citation fails direct lookup (missing book file, odd punctuation,
//! abbreviation the author invented), we fall back to matching it against a
//! [`RefIndex`] of already-resolved (reference, text) pairs. Matching is an
//! ordered list of pure predicate strategies, tried one at a time; the first
//! strategy that matches anything wins, and ties within a strategy go to the
//! entry inserted first. Best effort, not best match: there is no scoring.
//!
//! No strategy matching is not an error — the caller records the citation
//! with `has_data: false` and the run continues.

use once_cell::sync::Lazy;
use regex::Regex;

static RE_NUMERAL_PAIR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+[:：]\d+").unwrap());

/// Normalizes a reference for comparison: full-width punctuation folds to
/// half-width, whitespace and separator punctuation drop out, case folds.
/// The colon is kept (unified to `:`) so the chapter:verse pair survives.
pub fn normalize(reference: &str) -> String {
    reference
        .chars()
        .filter_map(|c| match c {
            '：' => Some(':'),
            '，' | ',' | '（' | '）' | '(' | ')' | '.' => None,
            c if c.is_whitespace() => None,
            c => Some(c),
        })
        .flat_map(char::to_lowercase)
        .collect()
}

/// Extracts the bare `chapter:verse` numeral pair, if the string has one.
pub fn numeral_pair(reference: &str) -> Option<String> {
    RE_NUMERAL_PAIR
        .find(reference)
        .map(|m| m.as_str().replace('：', ":"))
}

/// One harvested (reference, text) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    /// Answer file the pair came from
    pub source_file: String,
    /// Answer key within that file
    pub key: String,
    pub reference: String,
    pub text: String,
    norm_ref: String,
}

impl IndexEntry {
    pub fn normalized(&self) -> &str {
        &self.norm_ref
    }
}

struct Target {
    norm: String,
    pair: Option<String>,
}

type Strategy = fn(&Target, &IndexEntry) -> bool;

fn exact(target: &Target, entry: &IndexEntry) -> bool {
    entry.norm_ref == target.norm
}

fn containment(target: &Target, entry: &IndexEntry) -> bool {
    entry.norm_ref.contains(&target.norm) || target.norm.contains(&entry.norm_ref)
}

fn numeral(target: &Target, entry: &IndexEntry) -> bool {
    target
        .pair
        .as_ref()
        .is_some_and(|pair| entry.norm_ref.contains(pair))
}

// priority order; resolution stops at the first strategy with any match
static STRATEGIES: &[Strategy] = &[exact, containment, numeral];

/// Insertion-ordered index of all known (reference, text) pairs.
#[derive(Debug, Default)]
pub struct RefIndex {
    entries: Vec<IndexEntry>,
}

impl RefIndex {
    pub fn new() -> Self {
        RefIndex::default()
    }

    pub fn insert(&mut self, source_file: &str, key: &str, reference: &str, text: &str) {
        self.entries.push(IndexEntry {
            source_file: source_file.to_string(),
            key: key.to_string(),
            reference: reference.to_string(),
            text: text.to_string(),
            norm_ref: normalize(reference),
        });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Resolves a reference that failed direct lookup. Returns the first
    /// entry satisfying the highest-priority strategy that matches at all.
    pub fn resolve(&self, reference: &str) -> Option<&IndexEntry> {
        let target = Target {
            norm: normalize(reference),
            pair: numeral_pair(reference),
        };
        STRATEGIES.iter().find_map(|strategy| {
            self.entries.iter().find(|entry| strategy(&target, entry))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(pairs: &[(&str, &str)]) -> RefIndex {
        let mut index = RefIndex::new();
        for (i, (reference, text)) in pairs.iter().enumerate() {
            index.insert("test.json", &format!("q{}", i + 1), reference, text);
        }
        index
    }

    #[test]
    fn normalize_unifies_width_and_drops_separators() {
        assert_eq!(normalize("罗马书 3：23"), "罗马书3:23");
        assert_eq!(normalize("罗马书\u{3000}3:23（和合本）"), "罗马书3:23和合本");
        assert_eq!(normalize("John 3:16"), "john3:16");
    }

    #[test]
    fn numeral_pair_finds_first_pair() {
        assert_eq!(numeral_pair("罗 3：23"), Some("3:23".to_string()));
        assert_eq!(numeral_pair("罗马书第三章"), None);
    }

    #[test]
    fn exact_match_after_normalization() {
        let index = index(&[("罗马书3:23", "甲")]);
        let hit = index.resolve("罗马书 3：23").unwrap();
        assert_eq!(hit.text, "甲");
    }

    #[test]
    fn containment_matches_either_direction() {
        let index = index(&[("罗马书 3:23-24", "甲")]);
        // target is a prefix of the indexed reference once normalized
        assert_eq!(index.resolve("罗马书 3:23").unwrap().text, "甲");
        // and the other way around
        let index = index_containing_short();
        assert_eq!(index.resolve("罗马书 3:23-24").unwrap().text, "乙");
    }

    fn index_containing_short() -> RefIndex {
        index(&[("罗马书 3:23", "乙")])
    }

    #[test]
    fn numeral_match_ignores_book_name() {
        let index = index(&[("罗马书 3:23", "甲")]);
        // abbreviation isn't a substring of the full name, so only the
        // bare chapter:verse pair can connect them
        assert_eq!(index.resolve("罗 3:23").unwrap().text, "甲");
    }

    #[test]
    fn higher_priority_strategy_beats_insertion_order() {
        let index = index(&[("徒 3:23", "甲"), ("罗马书 3:23", "乙")]);
        // numeral matching would find 甲 first, but exact matching wins
        assert_eq!(index.resolve("罗马书 3：23").unwrap().text, "乙");
    }

    #[test]
    fn ties_within_a_strategy_go_to_first_inserted() {
        let index = index(&[("徒 3:23", "甲"), ("雅 3:23", "乙")]);
        assert_eq!(index.resolve("某书 3:23").unwrap().text, "甲");
    }

    #[test]
    fn no_match_is_none() {
        let index = index(&[("罗马书 3:23", "甲")]);
        assert!(index.resolve("徒 99:99").is_none());
    }
}
