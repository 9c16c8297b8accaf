//! Answer-key generation for the foundation course.
//!
//! Reads `data/foundation_course.json`, resolves every question's citations
//! against the loaded [`Library`], and writes one answer file per course
//! section under `data/answers/`. Answer files are rewritten wholesale on
//! every run; citations that don't resolve are kept in the output with
//! `has_data: false` so the pages can render a placeholder instead of a
//! broken fetch.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::reference::Citation;
use crate::store::Library;
use crate::utils;

/// Placeholder note shown for citations outside the covered books.
pub const NO_COVERAGE_NOTE: &str = "暂无此书卷数据（仅支持新约）";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub lessons: Vec<Lesson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lesson {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application: Option<String>,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub references: Vec<String>,
}

impl Course {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        utils::read_json(path).with_context(|| format!("reading course data {}", path.display()))
    }

    /// The extraction scripts sometimes emitted a lesson id twice; merge
    /// duplicates by concatenating their sections, ordered by id.
    pub fn merged_lessons(self) -> Vec<Lesson> {
        let mut unique: BTreeMap<u32, Lesson> = BTreeMap::new();
        for lesson in self.lessons {
            match unique.get_mut(&lesson.id) {
                Some(existing) => existing.sections.extend(lesson.sections),
                None => {
                    unique.insert(lesson.id, lesson);
                }
            }
        }
        unique.into_values().collect()
    }
}

/// A resolved-or-unresolved answer for one question citation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnswerEntry {
    pub reference: String,
    pub text: String,
    pub has_data: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
}

impl AnswerEntry {
    pub fn resolved(reference: &str, text: String, version: Option<String>) -> Self {
        AnswerEntry {
            reference: reference.to_string(),
            text,
            has_data: true,
            version,
            note: None,
            source_file: None,
        }
    }

    pub fn unresolved(reference: &str, note: Option<&str>) -> Self {
        AnswerEntry {
            reference: reference.to_string(),
            text: String::new(),
            has_data: false,
            version: None,
            note: note.map(str::to_string),
            source_file: None,
        }
    }
}

/// One generated answer file, covering a single course section.
#[derive(Debug, Serialize, Deserialize)]
pub struct SectionAnswers {
    pub lesson_id: u32,
    pub lesson_title: String,
    pub section_num: u32,
    pub section_title: String,
    pub answers: BTreeMap<String, AnswerEntry>,
}

/// Key of an answer within a section file.
pub fn answer_key(question_id: u32, reference: &str) -> String {
    format!("q{question_id}_{reference}")
}

/// File name of a section's answer data, relative to `data/answers/`.
pub fn answer_file_name(lesson_id: u32, section_num: u32) -> String {
    format!("foundation_L{lesson_id}_S{section_num}.json")
}

/// Resolves one citation via direct lookup. Parse failures and store misses
/// both downgrade to an unresolved entry; the fuzzy pass over already
/// generated answers is a separate, later run (see [`crate::populate`]).
pub fn resolve_reference(library: &Library, reference: &str) -> AnswerEntry {
    let citation = match Citation::parse(reference) {
        Ok(citation) => citation,
        Err(e) => {
            debug!("Unparseable citation {reference:?}: {e}");
            return AnswerEntry::unresolved(reference, Some(NO_COVERAGE_NOTE));
        }
    };
    match library.resolve(&citation) {
        Some(text) => {
            let version = library.version_of(&citation).map(str::to_string);
            AnswerEntry::resolved(reference, text, version)
        }
        None => AnswerEntry::unresolved(reference, Some(NO_COVERAGE_NOTE)),
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub files: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

/// Generates every section's answer file for the foundation course rooted
/// at `site_root`. Returns counts for the operator's summary line.
pub fn generate(site_root: &Path, library: &Library) -> anyhow::Result<GenerateSummary> {
    let course = Course::load(&site_root.join("data").join("foundation_course.json"))?;
    let answers_dir = site_root.join("data").join("answers");
    let lessons = course.merged_lessons();
    info!("Generating answer data for {} lessons", lessons.len());

    let mut summary = GenerateSummary::default();
    for lesson in &lessons {
        for (idx, section) in lesson.sections.iter().enumerate() {
            let section_num = (idx + 1) as u32;
            let mut section_answers = SectionAnswers {
                lesson_id: lesson.id,
                lesson_title: lesson.title.clone(),
                section_num,
                section_title: section.title.clone(),
                answers: BTreeMap::new(),
            };
            for question in &section.questions {
                for reference in &question.references {
                    let entry = resolve_reference(library, reference);
                    if entry.has_data {
                        summary.resolved += 1;
                    } else {
                        summary.unresolved += 1;
                    }
                    section_answers
                        .answers
                        .insert(answer_key(question.id, reference), entry);
                }
            }
            let path = answers_dir.join(answer_file_name(lesson.id, section_num));
            utils::write_json_atomic(&path, &section_answers)
                .with_context(|| format!("writing {}", path.display()))?;
            summary.files += 1;
            let answered = section_answers.answers.values().filter(|a| a.has_data).count();
            info!(
                "Lesson {} section {}: {} of {} answers resolved",
                lesson.id,
                section_num,
                answered,
                section_answers.answers.len()
            );
        }
    }
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merged_lessons_concatenates_duplicate_ids() {
        let course = Course {
            lessons: vec![
                Lesson {
                    id: 2,
                    title: "二".into(),
                    sections: vec![section("a")],
                },
                Lesson {
                    id: 1,
                    title: "一".into(),
                    sections: vec![section("b")],
                },
                Lesson {
                    id: 2,
                    title: "二".into(),
                    sections: vec![section("c")],
                },
            ],
        };
        let lessons = course.merged_lessons();
        assert_eq!(lessons.len(), 2);
        assert_eq!(lessons[0].id, 1);
        assert_eq!(lessons[1].sections.len(), 2);
    }

    fn section(title: &str) -> Section {
        Section {
            id: None,
            title: title.to_string(),
            application: None,
            questions: vec![],
        }
    }

    #[test]
    fn answer_key_embeds_the_reference() {
        assert_eq!(answer_key(3, "罗 3:23"), "q3_罗 3:23");
    }

    #[test]
    fn unparseable_reference_is_unresolved_not_an_error() {
        let library = Library::default();
        let entry = resolve_reference(&library, "随便什么");
        assert!(!entry.has_data);
        assert_eq!(entry.text, "");
        assert_eq!(entry.note.as_deref(), Some(NO_COVERAGE_NOTE));
    }
}
