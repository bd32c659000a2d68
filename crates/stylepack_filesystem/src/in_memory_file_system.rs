use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::FileSystem;

/// In-memory implementation of the `FileSystem` trait, for testing passes
/// without touching the real disk.
#[derive(Debug, Default)]
pub struct InMemoryFileSystem {
  files: RwLock<HashMap<PathBuf, String>>,
  directories: RwLock<HashSet<PathBuf>>,
  cwd: PathBuf,
}

impl InMemoryFileSystem {
  pub fn new() -> Self {
    Self {
      files: Default::default(),
      directories: Default::default(),
      cwd: PathBuf::from("/"),
    }
  }

  /// Register a file and all of its ancestor directories.
  pub fn write_file(&self, path: impl Into<PathBuf>, contents: impl Into<String>) {
    let path = normalize(&self.cwd.join(path.into()));

    let mut directories = self.directories.write().unwrap();
    let mut parent = path.parent();
    while let Some(dir) = parent {
      directories.insert(dir.to_path_buf());
      parent = dir.parent();
    }

    self.files.write().unwrap().insert(path, contents.into());
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    Ok(self.cwd.clone())
  }

  fn canonicalize(&self, path: &Path) -> std::io::Result<PathBuf> {
    Ok(normalize(&self.cwd.join(path)))
  }

  fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
    let path = normalize(&self.cwd.join(path));
    self
      .files
      .read()
      .unwrap()
      .get(&path)
      .cloned()
      .ok_or_else(|| {
        std::io::Error::new(
          std::io::ErrorKind::NotFound,
          format!("{} not found", path.display()),
        )
      })
  }

  fn is_file(&self, path: &Path) -> bool {
    let path = normalize(&self.cwd.join(path));
    self.files.read().unwrap().contains_key(&path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    let path = normalize(&self.cwd.join(path));
    self.directories.read().unwrap().contains(&path)
  }
}

/// Resolve `.` and `..` components without consulting the disk.
fn normalize(path: &Path) -> PathBuf {
  let mut result = PathBuf::new();
  for component in path.components() {
    match component {
      Component::CurDir => {}
      Component::ParentDir => {
        result.pop();
      }
      other => result.push(other),
    }
  }
  result
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn reads_back_written_files() {
    let fs = InMemoryFileSystem::new();
    fs.write_file("/project/img/logo.png", "png");

    assert!(fs.is_file(Path::new("/project/img/logo.png")));
    assert!(fs.is_dir(Path::new("/project/img")));
    assert!(!fs.is_file(Path::new("/project/img/missing.png")));
    assert_eq!(
      fs.read_to_string(Path::new("/project/img/logo.png")).unwrap(),
      "png"
    );
  }

  #[test]
  fn canonicalize_resolves_dot_segments() {
    let fs = InMemoryFileSystem::new();
    assert_eq!(
      fs.canonicalize(Path::new("/a/b/../c/./d.png")).unwrap(),
      PathBuf::from("/a/c/d.png")
    );
  }

  #[test]
  fn missing_files_error() {
    let fs = InMemoryFileSystem::new();
    let error = fs.read_to_string(Path::new("/nope.css")).unwrap_err();
    assert_eq!(error.kind(), std::io::ErrorKind::NotFound);
  }
}
