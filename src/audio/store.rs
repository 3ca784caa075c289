// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use dictation_core::ErrorReport;
use dictation_core::Fallible;

/// The directory holding synthesized recordings.
///
/// File names come from the client when audio is served, so we have to
/// ensure there's no possibility of directory traversals.
pub struct AudioStore {
    /// Absolute path to the audio directory.
    root: PathBuf,
}

/// Errors that can occur when resolving a file name.
#[derive(Debug, PartialEq)]
pub enum AudioPathError {
    /// Path is absolute.
    Absolute,
    /// Path contains parent (`..`) components.
    ParentComponent,
    /// Path has more than one component.
    Nested,
    /// Name starts with a dot. In-progress writes use such names.
    Hidden,
    /// Path does not exist.
    NotFound,
    /// Path points to a symbolic link.
    SymbolicLink,
    /// Path is not a file.
    NotFile,
}

impl AudioStore {
    /// Open the audio directory, creating it if necessary.
    pub fn new(root: &Path) -> Fallible<Self> {
        std::fs::create_dir_all(root)?;
        let root = root.canonicalize()?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that a recording with this file name exists in the directory.
    ///
    /// Symbolic links, absolute paths and nested paths are rejected.
    pub fn validate(&self, name: &str) -> Result<PathBuf, AudioPathError> {
        let path: PathBuf = PathBuf::from(name);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(AudioPathError::ParentComponent);
        }
        if path.is_absolute() {
            return Err(AudioPathError::Absolute);
        }
        if path.components().count() != 1 {
            return Err(AudioPathError::Nested);
        }
        if name.starts_with('.') {
            return Err(AudioPathError::Hidden);
        }
        let path: PathBuf = self.root.join(path);
        if path.is_symlink() {
            return Err(AudioPathError::SymbolicLink);
        }
        if !path.exists() {
            return Err(AudioPathError::NotFound);
        }
        if !path.is_file() {
            return Err(AudioPathError::NotFile);
        }
        Ok(path)
    }

    /// Read a recording by file name.
    pub async fn load(&self, name: &str) -> Fallible<Vec<u8>> {
        let path = self
            .validate(name)
            .map_err(|_| ErrorReport::not_found(format!("no audio named '{name}'")))?;
        Ok(tokio::fs::read(path).await?)
    }
}

#[cfg(test)]
mod tests {
    use std::fs::File;
    use std::fs::create_dir;

    use super::*;
    use crate::helper::create_tmp_directory;

    /// Absolute paths are rejected.
    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_abs_rejected() -> Fallible<()> {
        let store = AudioStore::new(&create_tmp_directory()?)?;
        assert_eq!(store.validate("/etc/passwd"), Err(AudioPathError::Absolute));
        Ok(())
    }

    /// Paths with parent components are rejected.
    #[test]
    fn test_parent() -> Fallible<()> {
        let store = AudioStore::new(&create_tmp_directory()?)?;
        assert_eq!(
            store.validate("../../../../etc/passwd"),
            Err(AudioPathError::ParentComponent)
        );
        Ok(())
    }

    #[test]
    fn test_nested() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let store = AudioStore::new(&root)?;
        create_dir(root.join("sub"))?;
        File::create(root.join("sub").join("кот_ru.mp3"))?;
        assert_eq!(store.validate("sub/кот_ru.mp3"), Err(AudioPathError::Nested));
        Ok(())
    }

    #[test]
    fn test_hidden() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let store = AudioStore::new(&root)?;
        File::create(root.join(".кот_ru.mp3.0.part"))?;
        assert_eq!(store.validate(".кот_ru.mp3.0.part"), Err(AudioPathError::Hidden));
        Ok(())
    }

    #[test]
    fn test_non_existent() -> Fallible<()> {
        let store = AudioStore::new(&create_tmp_directory()?)?;
        assert_eq!(store.validate("кот_ru.mp3"), Err(AudioPathError::NotFound));
        Ok(())
    }

    /// Paths to symlinks are rejected.
    #[cfg(not(target_os = "windows"))]
    #[test]
    fn test_symlink() -> Fallible<()> {
        use std::os::unix::fs::symlink;

        let root = create_tmp_directory()?;
        let store = AudioStore::new(&root)?;
        let real_file = root.join("real.mp3");
        File::create(&real_file)?;
        symlink(&real_file, root.join("link.mp3"))?;
        assert_eq!(store.validate("link.mp3"), Err(AudioPathError::SymbolicLink));
        Ok(())
    }

    #[test]
    fn test_dir() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let store = AudioStore::new(&root)?;
        create_dir(root.join("subdir"))?;
        assert_eq!(store.validate("subdir"), Err(AudioPathError::NotFile));
        Ok(())
    }

    #[tokio::test]
    async fn test_load() -> Fallible<()> {
        let root = create_tmp_directory()?;
        let store = AudioStore::new(&root)?;
        std::fs::write(root.join("дом_ru.mp3"), b"ID3")?;
        assert_eq!(store.load("дом_ru.mp3").await?, b"ID3".to_vec());
        let err = store.load("missing.mp3").await.unwrap_err();
        assert_eq!(err.kind(), dictation_core::ErrorKind::NotFound);
        Ok(())
    }
}
