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

/// Maximum number of characters of the word kept in a cache key.
pub const MAX_KEY_WORD_LEN: usize = 50;

/// Extension of cached audio files.
pub const AUDIO_EXTENSION: &str = "mp3";

/// Letters of the basic Cyrillic block, so Ukrainian, Belarusian, Serbian
/// and similar words get distinct keys too.
fn is_cyrillic_letter(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}') && c.is_alphabetic()
}

fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_cyrillic_letter(c) || matches!(c, '-' | '_')
}

/// Reduce a word to characters that are safe in a file name: Cyrillic and
/// Latin letters, digits, `-` and `_`. Anything else becomes `_`.
pub fn sanitize_word(word: &str) -> String {
    word.chars()
        .map(|c| if is_key_char(c) { c } else { '_' })
        .take(MAX_KEY_WORD_LEN)
        .collect()
}

/// The cache key for a word spoken in a given language.
pub fn audio_cache_key(word: &str, language: &str) -> String {
    format!("{}_{}", sanitize_word(word), language)
}

/// The file name a cached recording is stored under.
pub fn audio_file_name(word: &str, language: &str) -> String {
    format!("{}.{AUDIO_EXTENSION}", audio_cache_key(word, language))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words_are_kept() {
        assert_eq!(audio_cache_key("кот", "ru"), "кот_ru");
        assert_eq!(audio_cache_key("House-2_b", "en"), "House-2_b_en");
        assert_eq!(audio_cache_key("ёлка", "ru"), "ёлка_ru");
    }

    #[test]
    fn test_other_cyrillic_alphabets() {
        assert_eq!(sanitize_word("її"), "її");
        assert_eq!(sanitize_word("єє"), "єє");
        assert_ne!(audio_cache_key("її", "uk"), audio_cache_key("єє", "uk"));
        assert_eq!(audio_cache_key("ґанок", "uk"), "ґанок_uk");
        assert_eq!(sanitize_word("ђак"), "ђак");
        // Signs in the Cyrillic block are not letters.
        assert_eq!(sanitize_word("҂5"), "_5");
    }

    #[test]
    fn test_unsafe_characters_are_replaced() {
        assert_eq!(sanitize_word("ice cream"), "ice_cream");
        assert_eq!(sanitize_word("../etc/passwd"), "___etc_passwd");
        assert_eq!(sanitize_word("what?!"), "what__");
        assert_eq!(sanitize_word("café"), "caf_");
    }

    #[test]
    fn test_truncation_counts_characters() {
        let word = "я".repeat(80);
        let sanitized = sanitize_word(&word);
        assert_eq!(sanitized.chars().count(), MAX_KEY_WORD_LEN);
        assert_eq!(audio_cache_key(&word, "ru"), format!("{}_ru", "я".repeat(50)));
    }

    #[test]
    fn test_file_name() {
        assert_eq!(audio_file_name("дом", "ru"), "дом_ru.mp3");
    }
}
