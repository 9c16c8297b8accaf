//! Per-book verse stores and the library that loads them.
//!
//! Each covered book persists as `data/<slug>.json` holding a `verses` list
//! of `{chapter, verse, zh, en}` records. A [`VerseStore`] is that file
//! loaded into a map keyed by (chapter, verse); a [`Library`] is every
//! available store for one run. Stores are read-only for the duration of a
//! run — the only writer is the save-verse endpoint, which rewrites a whole
//! book file at a time.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::books::{self, Book};
use crate::reference::Citation;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("no data file for {book} at {path}")]
    BookNotFound { book: String, path: PathBuf },
    #[error("unreadable data file {path}: {source}")]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed book data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// One verse as persisted in a book file. Fields we don't model are kept in
/// `extra` so a rewrite never loses them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerseRecord {
    pub chapter: u32,
    pub verse: u32,
    #[serde(default)]
    pub zh: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub en: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A whole book file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book: Option<String>,
    /// Translation label, e.g. 和合本
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub verses: Vec<VerseRecord>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BookData {
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
                return Err(StoreError::BookNotFound {
                    book: path.display().to_string(),
                    path: path.to_path_buf(),
                });
            }
            Err(source) => {
                return Err(StoreError::Unreadable {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// In-memory mapping from (chapter, verse) to the Chinese verse text for
/// one book. Immutable once loaded.
#[derive(Debug)]
pub struct VerseStore {
    pub book: &'static Book,
    pub version: Option<String>,
    verses: HashMap<(u32, u32), String>,
}

impl VerseStore {
    /// Loads `data/<slug>.json` from under `data_dir`.
    pub fn load(data_dir: &Path, book: &'static Book) -> Result<Self, StoreError> {
        let path = data_dir.join(format!("{}.json", book.slug));
        let data = match BookData::load(&path) {
            Ok(data) => data,
            Err(StoreError::BookNotFound { path, .. }) => {
                return Err(StoreError::BookNotFound {
                    book: book.name.to_string(),
                    path,
                });
            }
            Err(e) => return Err(e),
        };
        let verses = data
            .verses
            .into_iter()
            .map(|record| ((record.chapter, record.verse), record.zh))
            .collect();
        Ok(VerseStore {
            book,
            version: data.version,
            verses,
        })
    }

    pub fn get(&self, chapter: u32, verse: u32) -> Option<&str> {
        self.verses.get(&(chapter, verse)).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.verses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.verses.is_empty()
    }
}

/// Every available book store for one run, keyed by abbreviation.
///
/// Books without a data file are simply not covered; loading logs the gap
/// and moves on rather than failing the run.
#[derive(Debug, Default)]
pub struct Library {
    stores: HashMap<&'static str, VerseStore>,
}

impl Library {
    /// Loads whatever book files exist under `data_dir`.
    pub fn load(data_dir: &Path) -> Self {
        let mut stores = HashMap::new();
        for book in books::BOOKS {
            match VerseStore::load(data_dir, book) {
                Ok(store) => {
                    info!("Loaded {} ({}): {} verses", book.name, book.slug, store.len());
                    stores.insert(book.abbr, store);
                }
                Err(StoreError::BookNotFound { .. }) => {
                    warn!("No data file for {} ({}); its citations will be unresolved", book.name, book.slug);
                }
                Err(e) => {
                    warn!("Skipping {}: {}", book.name, e);
                }
            }
        }
        Library { stores }
    }

    pub fn store(&self, book: &Book) -> Option<&VerseStore> {
        self.stores.get(book.abbr)
    }

    pub fn is_empty(&self) -> bool {
        self.stores.is_empty()
    }

    /// Resolves a parsed citation to its verse text, joining multi-verse
    /// citations with a single space. Verses missing from the store are
    /// skipped; `None` means nothing at all was found.
    pub fn resolve(&self, citation: &Citation) -> Option<String> {
        let store = self.store(citation.book)?;
        let texts: Vec<&str> = citation
            .refs()
            .filter_map(|r| store.get(r.chapter, r.verse))
            .collect();
        if texts.is_empty() {
            None
        } else {
            Some(texts.join(" "))
        }
    }

    /// The translation label for the book a citation names, if loaded.
    pub fn version_of(&self, citation: &Citation) -> Option<&str> {
        self.store(citation.book)?.version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn romans_store() -> (tempfile::TempDir, Library) {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("romans.json"),
            serde_json::json!({
                "book": "罗马书",
                "version": "和合本",
                "verses": [
                    {"chapter": 3, "verse": 23, "zh": "因为世人都犯了罪，亏缺了神的荣耀；", "en": "for all have sinned"},
                    {"chapter": 3, "verse": 24, "zh": "如今却蒙神的恩典，因基督耶稣的救赎，就白白地称义。"},
                    {"chapter": 6, "verse": 23, "zh": "因为罪的工价乃是死；惟有神的恩赐，在我们的主基督耶稣里，乃是永生。"}
                ]
            })
            .to_string(),
        )
        .unwrap();
        let library = Library::load(dir.path());
        (dir, library)
    }

    #[test]
    fn loads_only_present_books() {
        let (_dir, library) = romans_store();
        assert!(library.store(crate::books::find("罗").unwrap()).is_some());
        assert!(library.store(crate::books::find("徒").unwrap()).is_none());
    }

    #[test]
    fn resolves_single_verse() {
        let (_dir, library) = romans_store();
        let citation = Citation::parse("罗 3:23").unwrap();
        assert_eq!(
            library.resolve(&citation).unwrap(),
            "因为世人都犯了罪，亏缺了神的荣耀；"
        );
        assert_eq!(library.version_of(&citation), Some("和合本"));
    }

    #[test]
    fn joins_ranges_with_spaces() {
        let (_dir, library) = romans_store();
        let citation = Citation::parse("罗 3:23-24").unwrap();
        let text = library.resolve(&citation).unwrap();
        assert!(text.contains("犯了罪"));
        assert!(text.contains(" 如今却蒙"));
    }

    #[test]
    fn partially_covered_range_still_resolves() {
        let (_dir, library) = romans_store();
        // 3:25 isn't in the store; 23-24 are
        let citation = Citation::parse("罗 3:23-25").unwrap();
        assert!(library.resolve(&citation).is_some());
    }

    #[test]
    fn missing_verse_is_none() {
        let (_dir, library) = romans_store();
        let citation = Citation::parse("罗 99:99").unwrap();
        assert_eq!(library.resolve(&citation), None);
    }

    #[test]
    fn book_data_round_trips_unknown_fields() {
        let raw = serde_json::json!({
            "book": "罗马书",
            "source": "scanned-2019",
            "verses": [
                {"chapter": 1, "verse": 1, "zh": "耶稣基督的仆人保罗", "footnote": "abc"}
            ]
        });
        let data: BookData = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&data).unwrap(), raw);
    }
}
