use std::path::PathBuf;

use tempfile::TempDir;

use h5easy::File;

/// A scratch `.h5` path inside a fresh temp dir; keep the guard alive.
pub fn new_path() -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.h5");
    (dir, path)
}

/// A freshly created file plus its temp dir guard.
pub fn new_file() -> (TempDir, File) {
    let (dir, path) = new_path();
    let file = File::open(&path, "w").unwrap();
    (dir, file)
}
