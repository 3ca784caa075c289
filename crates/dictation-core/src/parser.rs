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

//! Turning raw input into word pairs.
//!
//! Input is either free text pasted by the user, one entry per line, or rows
//! from the dictionary store. Both sources are lenient: anything that can't
//! be turned into a pair for the requested mode is dropped, never reported.

use crate::types::mode::DrillMode;
use crate::types::word_pair::DictionaryEntry;
use crate::types::word_pair::WordPair;

/// Separates the base-language word from its translation on a line.
pub const SEPARATOR: char = '-';

/// Parse pasted text into word pairs.
///
/// In [`DrillMode::PrimaryOnly`] every non-blank line is a word. In the
/// translation modes a line has the shape `word - translation`; it is split
/// on the first separator, and both halves must be non-empty.
pub fn parse_word_pairs(text: &str, mode: DrillMode) -> Vec<WordPair> {
    text.lines()
        .filter_map(|line| parse_line(line, mode))
        .collect()
}

fn parse_line(line: &str, mode: DrillMode) -> Option<WordPair> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    if !mode.needs_translation() {
        return Some(WordPair::single(line));
    }
    let (primary, secondary) = line.split_once(SEPARATOR)?;
    let primary = primary.trim();
    let secondary = secondary.trim();
    if primary.is_empty() || secondary.is_empty() {
        return None;
    }
    Some(WordPair::translated(primary, secondary))
}

/// Convert dictionary rows into word pairs, dropping rows that lack the
/// translation the mode needs.
pub fn pairs_from_entries(
    entries: impl IntoIterator<Item = DictionaryEntry>,
    mode: DrillMode,
) -> Vec<WordPair> {
    entries
        .into_iter()
        .filter_map(|entry| {
            let primary = entry.russian.trim();
            if primary.is_empty() {
                return None;
            }
            if !mode.needs_translation() {
                return Some(WordPair::single(primary));
            }
            let secondary = entry.english.as_deref().map(str::trim).unwrap_or("");
            if secondary.is_empty() {
                None
            } else {
                Some(WordPair::translated(primary, secondary))
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_only() {
        let pairs = parse_word_pairs("кот\n\n  дом  \n", DrillMode::PrimaryOnly);
        assert_eq!(pairs, vec![WordPair::single("кот"), WordPair::single("дом")]);
    }

    #[test]
    fn test_primary_only_keeps_separators() {
        let pairs = parse_word_pairs("кот - cat", DrillMode::PrimaryOnly);
        assert_eq!(pairs, vec![WordPair::single("кот - cat")]);
    }

    #[test]
    fn test_translation_pairs() {
        let pairs = parse_word_pairs("кот-cat\nдом - house", DrillMode::PrimaryToSecondary);
        assert_eq!(
            pairs,
            vec![
                WordPair::translated("кот", "cat"),
                WordPair::translated("дом", "house"),
            ]
        );
    }

    #[test]
    fn test_split_on_first_separator() {
        let pairs = parse_word_pairs("кто-то - someone", DrillMode::SecondaryToPrimary);
        assert_eq!(pairs, vec![WordPair::translated("кто", "то - someone")]);
    }

    #[test]
    fn test_malformed_lines_are_dropped() {
        let text = "no separator\n - cat\nкот - \n-\nдом - house\r\n";
        let pairs = parse_word_pairs(text, DrillMode::PrimaryToSecondary);
        assert_eq!(pairs, vec![WordPair::translated("дом", "house")]);
    }

    #[test]
    fn test_empty_text() {
        assert!(parse_word_pairs("", DrillMode::PrimaryOnly).is_empty());
        assert!(parse_word_pairs("   \n\t\n", DrillMode::PrimaryToSecondary).is_empty());
    }

    #[test]
    fn test_entries() {
        let entries = vec![
            DictionaryEntry {
                russian: "кот".to_string(),
                english: Some("cat".to_string()),
            },
            DictionaryEntry {
                russian: "берёза".to_string(),
                english: None,
            },
            DictionaryEntry {
                russian: "дом".to_string(),
                english: Some("  ".to_string()),
            },
        ];
        let translated = pairs_from_entries(entries.clone(), DrillMode::PrimaryToSecondary);
        assert_eq!(translated, vec![WordPair::translated("кот", "cat")]);
        let dictation = pairs_from_entries(entries, DrillMode::PrimaryOnly);
        assert_eq!(
            dictation,
            vec![
                WordPair::single("кот"),
                WordPair::single("берёза"),
                WordPair::single("дом"),
            ]
        );
    }
}
