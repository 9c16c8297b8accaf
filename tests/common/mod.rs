use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub fn fixture(name: &str) -> PathBuf {
    Path::new("tests/data").join(name)
}

/// Builds a throwaway site directory seeded with the fixture book data and
/// course structure.
pub fn site_fixture() -> TempDir {
    let dir = tempfile::tempdir().expect("Unable to create temp site dir");
    let data = dir.path().join("data");
    fs::create_dir_all(&data).expect("Unable to create data dir");
    for name in ["romans.json", "acts.json", "foundation_course.json"] {
        fs::copy(fixture(name), data.join(name)).expect("Unable to copy fixture");
    }
    dir
}

#[allow(dead_code)]
pub fn read_value(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).expect("Unable to read json file"))
        .expect("Unable to parse json file")
}
