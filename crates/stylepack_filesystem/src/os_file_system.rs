use std::fs;
use std::path::Path;
use std::path::PathBuf;

use crate::FileSystem;

/// A FileSystem backed by std::fs.
#[derive(Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    std::env::current_dir()
  }

  fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
    fs::canonicalize(path)
  }

  fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
    fs::read_to_string(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }
}
