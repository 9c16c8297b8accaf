//! Fuzzy back-fill of one2one answer files.
//!
//! Builds a [`RefIndex`] from every generated foundation answer file, then
//! walks the one2one answer files and runs each still-unresolved ref
//! through the matcher. Files are only rewritten when something actually
//! matched, after a one-time `.json.bak` backup of the pre-fill state.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use log::{info, warn};
use serde::Deserialize;

use crate::answers::AnswerEntry;
use crate::matcher::RefIndex;
use crate::scaffold::SectionStub;
use crate::utils;

// harvest shape kept deliberately loose: older answer files carry `zh`
// instead of `text`, and some lack flags entirely
#[derive(Debug, Deserialize)]
struct HarvestFile {
    #[serde(default)]
    answers: std::collections::BTreeMap<String, HarvestEntry>,
}

#[derive(Debug, Deserialize)]
struct HarvestEntry {
    #[serde(default)]
    reference: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    zh: String,
}

fn sorted_json_files(dir: &Path, prefix: &str) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .with_context(|| format!("reading answer directory {}", dir.display()))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().is_some_and(|ext| ext == "json")
                && path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.starts_with(prefix))
        })
        .collect();
    // sorted so index insertion order (and thus tie-breaks) is stable
    files.sort();
    Ok(files)
}

/// Harvests every (reference, text) pair from the foundation answer files.
/// Unparseable files are skipped with a warning.
pub fn build_index(foundation_answers_dir: &Path) -> anyhow::Result<RefIndex> {
    let mut index = RefIndex::new();
    for path in sorted_json_files(foundation_answers_dir, "foundation_")? {
        let file: HarvestFile = match utils::read_json(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!("Skipping unparseable answer file {}: {e}", path.display());
                continue;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        for (key, entry) in &file.answers {
            let text = if !entry.text.is_empty() {
                &entry.text
            } else {
                &entry.zh
            };
            if entry.reference.is_empty() || text.is_empty() {
                continue;
            }
            index.insert(&name, key, &entry.reference, text);
        }
    }
    info!("Indexed {} reference entries from foundation answers", index.len());
    Ok(index)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct PopulateSummary {
    pub files_updated: usize,
    pub matched: usize,
}

/// Fills unresolved refs in every one2one answer file under
/// `one2one_answers_dir` from `index`.
pub fn populate(one2one_answers_dir: &Path, index: &RefIndex) -> anyhow::Result<PopulateSummary> {
    let mut summary = PopulateSummary::default();
    for path in sorted_json_files(one2one_answers_dir, "")? {
        let mut stub: SectionStub = match utils::read_json(&path) {
            Ok(stub) => stub,
            Err(e) => {
                warn!("Skipping unparseable answer file {}: {e}", path.display());
                continue;
            }
        };
        if stub.refs.is_empty() {
            continue;
        }
        let pre_fill = fs::read_to_string(&path)
            .with_context(|| format!("re-reading {}", path.display()))?;

        let mut matched_here = 0;
        for reference in &stub.refs {
            if stub.answers.get(reference).is_some_and(|a| a.has_data) {
                continue;
            }
            match index.resolve(reference) {
                Some(hit) => {
                    stub.answers.insert(
                        reference.clone(),
                        AnswerEntry {
                            reference: hit.reference.clone(),
                            text: hit.text.clone(),
                            has_data: true,
                            version: None,
                            note: None,
                            source_file: Some(hit.source_file.clone()),
                        },
                    );
                    matched_here += 1;
                }
                None => {
                    stub.answers
                        .entry(reference.clone())
                        .or_insert_with(|| AnswerEntry::unresolved(reference, None));
                }
            }
        }

        if matched_here > 0 {
            // keep the pre-fill state around once, for hand inspection
            let backup = path.with_extension("json.bak");
            if !backup.exists() {
                fs::write(&backup, &pre_fill)
                    .with_context(|| format!("writing backup {}", backup.display()))?;
            }
            stub.has_data = stub.answers.values().any(|a| a.has_data);
            utils::write_json_atomic(&path, &stub)
                .with_context(|| format!("rewriting {}", path.display()))?;
            info!("Updated {}: {} refs filled", path.display(), matched_here);
            summary.files_updated += 1;
            summary.matched += matched_here;
        } else {
            info!("No new matches for {}", path.display());
        }
    }
    info!("Populate pass done: {} refs filled", summary.matched);
    Ok(summary)
}
