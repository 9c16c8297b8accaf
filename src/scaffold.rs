//! Placeholder answer files for the one2one course.
//!
//! The one2one pages were produced ahead of their answer data, so each page
//! gets a placeholder answer file to keep the in-page fetch from 404ing.
//! We sweep the page HTML for citation-shaped strings (book name, then
//! `chapter:verse` with an optional range) and record them as the page's
//! `refs`; a later populate run fills in whatever the fuzzy matcher can
//! find for them.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::answers::AnswerEntry;
use crate::utils;

// deliberately loose: any short run of Han characters followed by a
// chapter:verse pair looks enough like a citation to collect
static RE_REFERENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\p{Han}]{1,10}\s*\d+[:：]\d+(?:-\d+)?").unwrap());

/// One one2one answer file: the page's harvested refs plus whatever answers
/// have been filled in so far.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionStub {
    pub section: String,
    pub has_data: bool,
    #[serde(default)]
    pub refs: Vec<String>,
    #[serde(default)]
    pub answers: BTreeMap<String, AnswerEntry>,
}

/// Collects citation-shaped strings from page HTML, first occurrence first,
/// duplicates dropped.
pub fn extract_references(html: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for m in RE_REFERENCE.find_iter(html) {
        let reference = m.as_str().to_string();
        if !seen.contains(&reference) {
            seen.push(reference);
        }
    }
    seen
}

/// Writes one placeholder answer file per HTML page under `pages_dir`.
/// Returns the number of files written.
pub fn scaffold(pages_dir: &Path, answers_dir: &Path) -> anyhow::Result<usize> {
    let mut pages: Vec<PathBuf> = fs::read_dir(pages_dir)
        .with_context(|| format!("reading page directory {}", pages_dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "html"))
        .collect();
    pages.sort();

    let mut created = 0;
    for path in &pages {
        let Some(section) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let html = match fs::read_to_string(path) {
            Ok(html) => html,
            Err(e) => {
                warn!("Skipping unreadable page {}: {e}", path.display());
                continue;
            }
        };
        let refs = extract_references(&html);
        let stub = SectionStub {
            section: section.to_string(),
            has_data: false,
            refs,
            answers: BTreeMap::new(),
        };
        let out = answers_dir.join(format!("{section}.json"));
        utils::write_json_atomic(&out, &stub)
            .with_context(|| format!("writing {}", out.display()))?;
        info!("Scaffolded {} ({} refs)", out.display(), stub.refs.len());
        created += 1;
    }
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_citations_from_markup() {
        let html = r#"<p>请背诵 罗马书 3:23 与 约 3:16，并复习罗马书 3:23。</p>"#;
        let refs = extract_references(html);
        assert!(refs.iter().any(|r| r.contains("3:23")));
        assert!(refs.iter().any(|r| r.contains("3:16")));
    }

    #[test]
    fn duplicates_keep_first_occurrence_only() {
        let refs = extract_references("罗 3:23 罗 3:23 罗 3:23");
        assert_eq!(refs, vec!["罗 3:23"]);
    }

    #[test]
    fn ranges_and_fullwidth_colons_are_collected() {
        let refs = extract_references("弗 2：8-9 和 徒 2:38-41");
        assert_eq!(refs.len(), 2);
        assert!(refs[0].contains("2：8-9"));
    }

    #[test]
    fn plain_prose_has_no_references() {
        assert!(extract_references("<h1>第一课 新生命</h1>").is_empty());
    }
}
