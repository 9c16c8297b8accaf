//! Tooling for a Chinese-language scripture study site.
//!
//! This crate provides a CLI tool (`versefill`) for maintaining the site's
//! fill-in-the-blank exercise data, and library access to the pieces it is
//! built from: citation parsing, the per-book verse stores, the fuzzy
//! reference matcher, the answer-key generators, the page renderer, and a
//! small site server with its verse-editing endpoint.
//!
//! The general shape of a run is: parse a human-written citation such as
//! `罗马书 3:23` or `罗 3:9-20,23` into (book, chapter, verse) triples, look
//! each verse up in the per-book JSON stores, and fall back to fuzzy
//! matching against an index of already-resolved references when the direct
//! lookup misses. Resolution failures are never fatal: a citation that
//! cannot be resolved is written out with `has_data: false` so the pages
//! can show a placeholder, and the run continues.
//!
//! Coverage is intentionally partial (New Testament books only, and only
//! those with a data file present), so "no data" is an expected, ordinary
//! outcome rather than an error. Runs are batch transforms over a site
//! directory; nothing here is a long-lived process except `server`.

pub mod answers;
pub mod books;
pub mod matcher;
pub mod pages;
pub mod populate;
pub mod reference;
pub mod scaffold;
pub mod server;
pub mod store;
pub mod utils;
