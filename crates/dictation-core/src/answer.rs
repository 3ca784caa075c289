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

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::stats::AttemptRecord;
use crate::types::mode::DrillMode;
use crate::types::word_pair::WordPair;

/// Exact match, ignoring case. No trimming: callers trim the input.
pub fn answers_match(expected: &str, given: &str) -> bool {
    expected.to_lowercase() == given.to_lowercase()
}

/// Score an answer to `pair` under `mode`.
pub fn evaluate(pair: &WordPair, mode: DrillMode, answer: &str) -> Fallible<AttemptRecord> {
    let heard_word = pair
        .side(mode.spoken_side())
        .ok_or_else(|| missing_translation(pair))?;
    let correct_word = pair
        .side(mode.expected_side())
        .ok_or_else(|| missing_translation(pair))?;
    Ok(AttemptRecord {
        heard_word: heard_word.to_string(),
        correct_word: correct_word.to_string(),
        user_answer: answer.to_string(),
        is_correct: answers_match(correct_word, answer),
    })
}

pub(crate) fn missing_translation(pair: &WordPair) -> ErrorReport {
    ErrorReport::validation(format!("word '{}' has no translation", pair.primary()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive() {
        assert!(answers_match("кот", "Кот"));
        assert!(answers_match("кот", "КОТ"));
        assert!(answers_match("House", "house"));
        assert!(!answers_match("кот", "кит"));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        assert!(!answers_match("house", "hous"));
        assert!(!answers_match("house", " house"));
    }

    #[test]
    fn test_dictation() {
        let pair = WordPair::single("берёза");
        let record = evaluate(&pair, DrillMode::PrimaryOnly, "Берёза").unwrap();
        assert!(record.is_correct);
        assert_eq!(record.heard_word, "берёза");
        assert_eq!(record.correct_word, "берёза");
        assert_eq!(record.user_answer, "Берёза");
    }

    #[test]
    fn test_primary_to_secondary() {
        let pair = WordPair::translated("кот", "cat");
        let record = evaluate(&pair, DrillMode::PrimaryToSecondary, "cat").unwrap();
        assert!(record.is_correct);
        assert_eq!(record.heard_word, "кот");
        assert_eq!(record.correct_word, "cat");
    }

    #[test]
    fn test_secondary_to_primary() {
        let pair = WordPair::translated("кот", "cat");
        let record = evaluate(&pair, DrillMode::SecondaryToPrimary, "cat").unwrap();
        assert!(!record.is_correct);
        assert_eq!(record.heard_word, "cat");
        assert_eq!(record.correct_word, "кот");
    }

    #[test]
    fn test_missing_translation() {
        let pair = WordPair::single("кот");
        assert!(evaluate(&pair, DrillMode::PrimaryToSecondary, "cat").is_err());
    }
}
