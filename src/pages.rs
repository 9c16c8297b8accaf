//! Static page rendering for the foundation course.
//!
//! One HTML page per course section plus a contents page, rendered with
//! tera from templates compiled into the binary. Standard answers from the
//! generated answer files are pre-filled into the blanks; references
//! without data render the "no coverage" placeholder instead.

use std::fs;
use std::path::Path;

use anyhow::Context as _;
use log::info;
use serde::Serialize;
use tera::{Context, Tera};

use crate::answers::{self, Course, SectionAnswers};
use crate::utils;

static SECTION_TEMPLATE: &str = include_str!("../templates/pages/section.html.tera");
static INDEX_TEMPLATE: &str = include_str!("../templates/pages/index.html.tera");

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("template error: {0}")]
    Template(#[from] tera::Error),
}

/// One pre-filled (or placeholder) blank under a question.
#[derive(Debug, Serialize)]
pub struct Blank {
    pub reference: String,
    pub prefilled: String,
    pub has_data: bool,
    pub rows: usize,
    pub placeholder: String,
}

#[derive(Debug, Serialize)]
pub struct QuestionBlock {
    pub id: u32,
    pub text: String,
    pub blanks: Vec<Blank>,
}

/// Template context for a single section page.
#[derive(Debug, Serialize)]
pub struct SectionPage {
    pub lesson_id: u32,
    pub lesson_title: String,
    pub section_num: u32,
    pub section_title: String,
    pub questions: Vec<QuestionBlock>,
    pub application: String,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

#[derive(Debug, Serialize)]
struct IndexSection {
    num: u32,
    title: String,
    href: String,
    answered: usize,
}

#[derive(Debug, Serialize)]
struct IndexLesson {
    id: u32,
    title: String,
    sections: Vec<IndexSection>,
}

pub fn page_file_name(lesson_id: u32, section_num: u32) -> String {
    format!("foundation_L{lesson_id}_S{section_num}.html")
}

/// Textarea height for a pre-filled answer: one row per ~50 characters,
/// clamped to 2..=10; three rows for an empty blank.
pub fn rows_for(text: &str) -> usize {
    if text.is_empty() {
        return 3;
    }
    (text.chars().count() / 50 + 1).clamp(2, 10)
}

/// Some extracted section titles are raw artifact strings; fall back to a
/// plain ordinal for those.
pub fn display_title(title: &str, section_num: u32) -> String {
    if title.contains('_') && title.chars().count() > 20 {
        format!("第{section_num}节")
    } else {
        title.to_string()
    }
}

fn tera_with(name: &'static str, template: &'static str) -> Result<Tera, RenderError> {
    let mut tera = Tera::default();
    tera.autoescape_on(vec![".html.tera"]);
    tera.add_raw_templates(vec![(name, template)])?;
    Ok(tera)
}

pub fn render_section(page: &SectionPage) -> Result<String, RenderError> {
    let tera = tera_with("section.html.tera", SECTION_TEMPLATE)?;
    Ok(tera.render("section.html.tera", &Context::from_serialize(page)?)?)
}

fn render_index(lessons: &[IndexLesson]) -> Result<String, RenderError> {
    let tera = tera_with("index.html.tera", INDEX_TEMPLATE)?;
    let mut context = Context::new();
    context.insert("lessons", lessons);
    Ok(tera.render("index.html.tera", &context)?)
}

fn build_blanks(question: &answers::Question, section_answers: &SectionAnswers) -> Vec<Blank> {
    question
        .references
        .iter()
        .map(|reference| {
            let entry = section_answers
                .answers
                .get(&answers::answer_key(question.id, reference));
            let (text, has_data) = match entry {
                Some(entry) if entry.has_data => (entry.text.clone(), true),
                _ => (String::new(), false),
            };
            Blank {
                reference: reference.clone(),
                rows: rows_for(&text),
                placeholder: if has_data {
                    "请填写经文内容...".to_string()
                } else {
                    "暂无标准答案（仅支持新约）".to_string()
                },
                prefilled: text,
                has_data,
            }
        })
        .collect()
}

/// Renders every section page and the contents page for the course rooted
/// at `site_root`. Returns the number of pages written.
pub fn generate(site_root: &Path) -> anyhow::Result<usize> {
    let course = Course::load(&site_root.join("data").join("foundation_course.json"))?;
    let answers_dir = site_root.join("data").join("answers");
    let lessons = course.merged_lessons();

    // flat traversal order, so navigation crosses lesson boundaries
    let mut slots: Vec<(u32, u32)> = Vec::new();
    for lesson in &lessons {
        for idx in 0..lesson.sections.len() {
            slots.push((lesson.id, (idx + 1) as u32));
        }
    }

    let mut index_lessons: Vec<IndexLesson> = Vec::new();
    let mut written = 0;
    let mut slot: usize = 0;
    for lesson in &lessons {
        let mut index_sections = Vec::new();
        for (idx, section) in lesson.sections.iter().enumerate() {
            let section_num = (idx + 1) as u32;
            let answer_path =
                answers_dir.join(answers::answer_file_name(lesson.id, section_num));
            let section_answers: SectionAnswers = match utils::read_json(&answer_path) {
                Ok(section_answers) => section_answers,
                // pages still render without answer data, just unfilled
                Err(_) => SectionAnswers {
                    lesson_id: lesson.id,
                    lesson_title: lesson.title.clone(),
                    section_num,
                    section_title: section.title.clone(),
                    answers: Default::default(),
                },
            };

            let application = match section.application.as_deref() {
                Some(text) if text.chars().count() >= 20 => text.to_string(),
                _ => "请根据本节内容，写下你的个人应用和具体行动计划。".to_string(),
            };
            let page = SectionPage {
                lesson_id: lesson.id,
                lesson_title: lesson.title.clone(),
                section_num,
                section_title: display_title(&section.title, section_num),
                questions: section
                    .questions
                    .iter()
                    .map(|q| QuestionBlock {
                        id: q.id,
                        text: q.question.clone(),
                        blanks: build_blanks(q, &section_answers),
                    })
                    .collect(),
                application,
                prev_href: slot
                    .checked_sub(1)
                    .and_then(|i| slots.get(i))
                    .map(|&(l, s)| page_file_name(l, s)),
                next_href: slots.get(slot + 1).map(|&(l, s)| page_file_name(l, s)),
            };

            let html = render_section(&page)?;
            let out = site_root.join(page_file_name(lesson.id, section_num));
            fs::write(&out, html).with_context(|| format!("writing {}", out.display()))?;
            written += 1;
            slot += 1;

            index_sections.push(IndexSection {
                num: section_num,
                title: page.section_title.clone(),
                href: page_file_name(lesson.id, section_num),
                answered: section_answers
                    .answers
                    .values()
                    .filter(|a| a.has_data)
                    .count(),
            });
        }
        index_lessons.push(IndexLesson {
            id: lesson.id,
            title: lesson.title.clone(),
            sections: index_sections,
        });
    }

    let index_html = render_index(&index_lessons)?;
    let index_out = site_root.join("foundation_course.html");
    fs::write(&index_out, index_html)
        .with_context(|| format!("writing {}", index_out.display()))?;
    written += 1;

    info!("Rendered {written} pages");
    Ok(written)
}
