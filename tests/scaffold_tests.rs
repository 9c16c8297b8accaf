mod common;

use std::fs;

use versefill::scaffold;

#[test]
fn scaffolds_one_placeholder_file_per_page() {
    let dir = tempfile::tempdir().unwrap();
    let pages = dir.path().join("done2one");
    fs::create_dir_all(&pages).unwrap();
    fs::write(
        pages.join("C1_S1.html"),
        "<p>请背诵 罗马书 3:23，并阅读 弗 2：8-9。</p>",
    )
    .unwrap();
    fs::write(pages.join("C1_S2.html"), "<p>本节没有经文引用。</p>").unwrap();
    fs::write(pages.join("notes.txt"), "罗 1:1 不该被扫到").unwrap();

    let answers_dir = pages.join("data").join("answers");
    let created = scaffold::scaffold(&pages, &answers_dir).unwrap();
    assert_eq!(created, 2);

    let stub = common::read_value(&answers_dir.join("C1_S1.json"));
    assert_eq!(stub["section"], "C1_S1");
    assert_eq!(stub["has_data"], false);
    assert_eq!(stub["answers"], serde_json::json!({}));
    let refs = stub["refs"].as_array().unwrap();
    assert_eq!(refs.len(), 2);

    let empty = common::read_value(&answers_dir.join("C1_S2.json"));
    assert_eq!(empty["refs"].as_array().unwrap().len(), 0);
}

#[test]
fn rescaffolding_is_byte_identical() {
    let dir = tempfile::tempdir().unwrap();
    let pages = dir.path().join("done2one");
    fs::create_dir_all(&pages).unwrap();
    fs::write(pages.join("C2_S1.html"), "默想 罗 8:1 与 罗 8:1。").unwrap();

    let answers_dir = pages.join("data").join("answers");
    scaffold::scaffold(&pages, &answers_dir).unwrap();
    let first = fs::read(answers_dir.join("C2_S1.json")).unwrap();
    scaffold::scaffold(&pages, &answers_dir).unwrap();
    let second = fs::read(answers_dir.join("C2_S1.json")).unwrap();
    assert_eq!(first, second);

    // duplicates collapse to the first occurrence
    let stub = common::read_value(&answers_dir.join("C2_S1.json"));
    assert_eq!(stub["refs"].as_array().unwrap().len(), 1);
}
