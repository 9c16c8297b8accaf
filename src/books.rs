//! The fixed table of books the site carries data for.
//!
//! Coverage is New Testament only; each entry ties the standard Chinese
//! abbreviation and the full book name to the slug naming the backing JSON
//! file under `data/`.

/// One book of the corpus.
#[derive(Debug, PartialEq, Eq)]
pub struct Book {
    /// Standard Chinese abbreviation, e.g. `罗`
    pub abbr: &'static str,
    /// Full Chinese name, e.g. `罗马书`
    pub name: &'static str,
    /// File slug; the book's verses live in `data/<slug>.json`
    pub slug: &'static str,
}

pub static BOOKS: &[Book] = &[
    Book { abbr: "太", name: "马太福音", slug: "matthew" },
    Book { abbr: "可", name: "马可福音", slug: "mark" },
    Book { abbr: "路", name: "路加福音", slug: "luke" },
    Book { abbr: "约", name: "约翰福音", slug: "john" },
    Book { abbr: "徒", name: "使徒行传", slug: "acts" },
    Book { abbr: "罗", name: "罗马书", slug: "romans" },
    Book { abbr: "林前", name: "哥林多前书", slug: "1corinthians" },
    Book { abbr: "林后", name: "哥林多后书", slug: "2corinthians" },
    Book { abbr: "加", name: "加拉太书", slug: "galatians" },
    Book { abbr: "弗", name: "以弗所书", slug: "ephesians" },
    Book { abbr: "腓", name: "腓立比书", slug: "philippians" },
    Book { abbr: "西", name: "歌罗西书", slug: "colossians" },
    Book { abbr: "帖前", name: "帖撒罗尼迦前书", slug: "1thessalonians" },
    Book { abbr: "帖后", name: "帖撒罗尼迦后书", slug: "2thessalonians" },
    Book { abbr: "提前", name: "提摩太前书", slug: "1timothy" },
    Book { abbr: "提后", name: "提摩太后书", slug: "2timothy" },
    Book { abbr: "多", name: "提多书", slug: "titus" },
    Book { abbr: "门", name: "腓利门书", slug: "philemon" },
];

/// Looks a book up by abbreviation or full name, e.g. both `罗` and
/// `罗马书` find Romans.
pub fn find(token: &str) -> Option<&'static Book> {
    BOOKS
        .iter()
        .find(|book| book.abbr == token || book.name == token)
}
