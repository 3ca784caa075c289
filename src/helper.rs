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

use std::path::PathBuf;

use dictation_core::Fallible;
use tempfile::tempdir;

/// Create a temporary directory that outlives the `TempDir` guard.
pub fn create_tmp_directory() -> Fallible<PathBuf> {
    let dir = tempdir()?.keep();
    Ok(dir.canonicalize()?)
}

/// A small dictionary file in the import format.
pub const SAMPLE_DICTIONARY: &str = r#"
[[category]]
name = "1 класс"
type = "class"
description = "Словарные слова"
words = ["берёза", "воробей", "корова"]

[[category]]
name = "Animals"
type = "lesson"
words = ["кот - cat", "собака - dog", "not a pair"]

[[category]]
name = "Empty"
type = "topic"
words = []
"#;
