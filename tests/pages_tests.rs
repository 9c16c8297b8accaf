mod common;

use std::fs;

use versefill::{answers, pages, store::Library};

#[test]
fn renders_section_pages_and_contents() {
    let site = common::site_fixture();
    let library = Library::load(&site.path().join("data"));
    answers::generate(site.path(), &library).unwrap();

    // 3 sections + the contents page
    let written = pages::generate(site.path()).unwrap();
    assert_eq!(written, 4);

    let section1 = fs::read_to_string(site.path().join("foundation_L1_S1.html")).unwrap();
    // standard answer pre-filled
    assert!(section1.contains("因为世人都犯了罪"));
    // uncovered reference renders the placeholder instead
    assert!(section1.contains("暂无标准答案"));
    assert!(section1.contains("创 1:10"));

    let contents = fs::read_to_string(site.path().join("foundation_course.html")).unwrap();
    assert!(contents.contains("foundation_L1_S2.html"));
    assert!(contents.contains("新生命"));
}

#[test]
fn navigation_crosses_sections_in_order() {
    let site = common::site_fixture();
    let library = Library::load(&site.path().join("data"));
    answers::generate(site.path(), &library).unwrap();
    pages::generate(site.path()).unwrap();

    let first = fs::read_to_string(site.path().join("foundation_L1_S1.html")).unwrap();
    assert!(!first.contains("上一节"));
    assert!(first.contains("foundation_L1_S2.html"));

    let middle = fs::read_to_string(site.path().join("foundation_L1_S2.html")).unwrap();
    assert!(middle.contains("foundation_L1_S1.html"));
    assert!(middle.contains("foundation_L1_S3.html"));

    let last = fs::read_to_string(site.path().join("foundation_L1_S3.html")).unwrap();
    assert!(!last.contains("下一节"));
}

#[test]
fn pages_render_even_without_answer_data() {
    let site = common::site_fixture();
    // no answers generated at all
    let written = pages::generate(site.path()).unwrap();
    assert_eq!(written, 4);
    let section1 = fs::read_to_string(site.path().join("foundation_L1_S1.html")).unwrap();
    assert!(section1.contains("暂无标准答案"));
    assert!(!section1.contains("因为世人都犯了罪"));
}
