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

//! Dictionary maintenance commands.

use std::fs::read_to_string;
use std::path::Path;

use dictation_core::ErrorReport;
use dictation_core::Fallible;
use dictation_core::parse_word_pairs;
use serde::Deserialize;

use crate::db::CategoryType;
use crate::db::Database;

/// The TOML import format: a list of `[[category]]` tables.
#[derive(Debug, Deserialize)]
struct DictionaryFile {
    #[serde(default)]
    category: Vec<CategorySpec>,
}

#[derive(Debug, Deserialize)]
struct CategorySpec {
    name: String,
    #[serde(rename = "type")]
    kind: CategoryType,
    description: Option<String>,
    #[serde(default = "default_difficulty")]
    difficulty: u8,
    /// Bare words for classes, `word - translation` lines otherwise.
    #[serde(default)]
    words: Vec<String>,
}

fn default_difficulty() -> u8 {
    1
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub categories: usize,
    pub words: usize,
    pub skipped: usize,
}

/// Import a dictionary file. Either every category and word is added, or
/// nothing is.
pub fn import_dictionary(db: &Database, text: &str) -> Fallible<ImportSummary> {
    let file: DictionaryFile = toml::from_str(text)
        .map_err(|e| ErrorReport::validation(format!("Failed to parse dictionary file: {e}")))?;
    db.transaction(|db| import_categories(db, file.category))
}

fn import_categories(db: &Database, categories: Vec<CategorySpec>) -> Fallible<ImportSummary> {
    let mut summary = ImportSummary::default();
    for spec in categories {
        db.add_category(&spec.name, spec.description.as_deref(), spec.kind)?;
        summary.categories += 1;
        for line in &spec.words {
            let pairs = parse_word_pairs(line, spec.kind.word_mode());
            if pairs.is_empty() {
                log::warn!("Skipping malformed entry in '{}': {line:?}", spec.name);
                summary.skipped += 1;
                continue;
            }
            for pair in pairs {
                db.add_word(
                    pair.primary(),
                    pair.secondary(),
                    Some(&spec.name),
                    spec.difficulty,
                )?;
                summary.words += 1;
            }
        }
    }
    Ok(summary)
}

pub fn init_database(path: &Path) -> Fallible<()> {
    Database::new(path)?;
    println!("Initialized dictionary at {}.", path.display());
    Ok(())
}

pub fn import_file(path: &Path, file: &Path) -> Fallible<()> {
    let db = Database::new(path)?;
    let text = read_to_string(file)?;
    let summary = import_dictionary(&db, &text)?;
    println!(
        "Imported {} words into {} categories ({} skipped).",
        summary.words, summary.categories, summary.skipped
    );
    Ok(())
}

pub fn print_stats(path: &Path) -> Fallible<()> {
    let db = Database::new(path)?;
    let stats = db.stats()?;
    println!("Categories:       {}", stats.categories);
    println!("Letters:          {}", stats.letters);
    println!("Words:            {}", stats.total_words);
    println!("With translation: {}", stats.with_translation);
    Ok(())
}

pub fn clear_words(path: &Path) -> Fallible<()> {
    let db = Database::new(path)?;
    let deleted = db.clear_words()?;
    println!("Deleted {deleted} words.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use dictation_core::DrillMode;

    use super::*;
    use crate::helper::SAMPLE_DICTIONARY;
    use crate::helper::create_tmp_directory;

    #[test]
    fn test_import() -> Fallible<()> {
        let db = Database::in_memory()?;
        let summary = import_dictionary(&db, SAMPLE_DICTIONARY)?;
        assert_eq!(
            summary,
            ImportSummary {
                categories: 3,
                words: 5,
                skipped: 1,
            }
        );
        let animals = db.category_id("Animals")?.unwrap();
        let words = db.find_words(&[animals], &[])?;
        assert_eq!(words.len(), 2);
        assert!(words.iter().all(|w| w.english.is_some()));
        let class = db.category_id("1 класс")?.unwrap();
        assert_eq!(db.count_words(&[class], &[], DrillMode::PrimaryToSecondary)?, 0);
        Ok(())
    }

    #[test]
    fn test_import_twice_reuses_categories() -> Fallible<()> {
        let db = Database::in_memory()?;
        import_dictionary(&db, SAMPLE_DICTIONARY)?;
        import_dictionary(&db, SAMPLE_DICTIONARY)?;
        assert_eq!(db.stats()?.categories, 3);
        assert_eq!(db.stats()?.total_words, 10);
        Ok(())
    }

    #[test]
    fn test_failed_import_writes_nothing() -> Fallible<()> {
        let db = Database::in_memory()?;
        import_dictionary(&db, SAMPLE_DICTIONARY)?;
        let before = db.stats()?;
        let text = r#"
[[category]]
name = "Good"
type = "lesson"
words = ["дом - house", "лес - forest"]

[[category]]
name = "Bad"
type = "lesson"
difficulty = 9
words = ["река - river"]
"#;
        assert!(import_dictionary(&db, text).is_err());
        assert_eq!(db.stats()?, before);
        assert_eq!(db.category_id("Good")?, None);
        // The connection is still usable afterwards.
        import_dictionary(&db, SAMPLE_DICTIONARY)?;
        assert_eq!(db.stats()?.total_words, before.total_words * 2);
        Ok(())
    }

    #[test]
    fn test_bad_type() {
        let db = Database::in_memory().unwrap();
        let text = "[[category]]\nname = \"x\"\ntype = \"grade\"\n";
        assert!(import_dictionary(&db, text).is_err());
    }

    #[test]
    fn test_file_commands() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let db_path = dir.join("words.db");
        let dict_path = dir.join("words.toml");
        std::fs::write(&dict_path, SAMPLE_DICTIONARY)?;
        init_database(&db_path)?;
        import_file(&db_path, &dict_path)?;
        print_stats(&db_path)?;
        assert_eq!(Database::new(&db_path)?.stats()?.total_words, 5);
        clear_words(&db_path)?;
        assert_eq!(Database::new(&db_path)?.stats()?.total_words, 0);
        Ok(())
    }
}
