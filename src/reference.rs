//! Citation parsing.
//!
//! A citation is a human-written reference string of the form
//! `<book><chapter>:<verse-spec>`, where the verse-spec is a comma-separated
//! list of verse numbers and `start-end` ranges: `罗 3:23`, `罗马书3:9-20,23`.
//! Parsing expands it into (book, chapter, verse) triples. A citation either
//! parses completely or not at all; malformed input never yields partial
//! results, so callers can flag the whole citation as "no data".

use once_cell::sync::Lazy;
use regex::Regex;

use crate::books::{self, Book};

// book token, chapter, verse-spec; both colon widths occur in the wild
static RE_CITATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\p{Han}]+)\s*(\d+)\s*[:：](.+)$").unwrap());

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CitationError {
    #[error("not a recognizable citation: {0:?}")]
    Syntax(String),
    #[error("unknown book name or abbreviation: {0:?}")]
    UnknownBook(String),
    #[error("bad verse number in {0:?}")]
    BadVerse(String),
    #[error("bad verse range in {0:?}")]
    BadRange(String),
}

/// A single addressable verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerseRef {
    pub book: &'static Book,
    pub chapter: u32,
    pub verse: u32,
}

/// A parsed citation: one book, one chapter, one or more verses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Citation {
    /// The string as the author wrote it
    pub raw: String,
    pub book: &'static Book,
    pub chapter: u32,
    /// Expanded verse numbers, in written order, duplicates dropped
    pub verses: Vec<u32>,
}

impl Citation {
    pub fn parse(raw: &str) -> Result<Self, CitationError> {
        let caps = RE_CITATION
            .captures(raw.trim())
            .ok_or_else(|| CitationError::Syntax(raw.to_string()))?;
        let (_, [book_token, chapter_str, verse_spec]) = caps.extract();

        let book = books::find(book_token)
            .ok_or_else(|| CitationError::UnknownBook(book_token.to_string()))?;
        let chapter = parse_number(chapter_str)
            .ok_or_else(|| CitationError::Syntax(raw.to_string()))?;

        let mut verses: Vec<u32> = Vec::new();
        let mut push_unique = |v: u32| {
            if !verses.contains(&v) {
                verses.push(v)
            }
        };

        for part in verse_spec.split(',') {
            let part = part.trim();
            if let Some((start, end)) = part.split_once('-') {
                let start = parse_number(start.trim())
                    .ok_or_else(|| CitationError::BadRange(raw.to_string()))?;
                let end = parse_number(end.trim())
                    .ok_or_else(|| CitationError::BadRange(raw.to_string()))?;
                if end < start {
                    return Err(CitationError::BadRange(raw.to_string()));
                }
                (start..=end).for_each(&mut push_unique);
            } else {
                let verse =
                    parse_number(part).ok_or_else(|| CitationError::BadVerse(raw.to_string()))?;
                push_unique(verse);
            }
        }

        Ok(Citation {
            raw: raw.to_string(),
            book,
            chapter,
            verses,
        })
    }

    /// The denoted verses as (book, chapter, verse) triples.
    pub fn refs(&self) -> impl Iterator<Item = VerseRef> + '_ {
        self.verses.iter().map(|&verse| VerseRef {
            book: self.book,
            chapter: self.chapter,
            verse,
        })
    }
}

/// Chapter and verse numbers are 1-based decimal integers.
fn parse_number(s: &str) -> Option<u32> {
    match s.parse::<u32>() {
        Ok(0) | Err(_) => None,
        Ok(n) => Some(n),
    }
}
