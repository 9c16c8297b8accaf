//! Small file helpers shared by the generators and the server.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

/// Writes `value` as pretty-printed JSON via a temp file in the target
/// directory followed by an atomic rename, so a crash mid-write can never
/// leave a half-written answer or book file behind.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> io::Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(dir) = dir {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = NamedTempFile::new_in(dir.unwrap_or(Path::new(".")))?;
    serde_json::to_writer_pretty(&mut tmp, value)?;
    tmp.persist(path)?;
    Ok(())
}

pub fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
