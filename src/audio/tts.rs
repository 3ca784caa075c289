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

use async_trait::async_trait;
use dictation_core::ErrorReport;
use dictation_core::Fallible;

/// The public Google Translate speech endpoint.
pub const DEFAULT_TTS_URL: &str = "https://translate.google.com/translate_tts";

/// The endpoint rejects longer requests.
const MAX_CHUNK_CHARS: usize = 100;

/// Turns text into spoken audio (MP3 bytes).
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, language: &str) -> Fallible<Vec<u8>>;
}

pub struct GoogleTranslateTts {
    client: reqwest::Client,
    url: String,
}

impl GoogleTranslateTts {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
        }
    }
}

#[async_trait]
impl SpeechSynthesizer for GoogleTranslateTts {
    async fn synthesize(&self, text: &str, language: &str) -> Fallible<Vec<u8>> {
        let chunks = split_text(text, MAX_CHUNK_CHARS);
        if chunks.is_empty() {
            return Err(ErrorReport::validation("nothing to synthesize"));
        }
        let total = chunks.len().to_string();
        let mut audio = Vec::new();
        // MP3 frames are self-delimiting, so the parts can simply be joined.
        for (idx, chunk) in chunks.iter().enumerate() {
            let idx = idx.to_string();
            let textlen = chunk.chars().count().to_string();
            log::debug!("Synthesizing chunk {idx} of {total} ({language})");
            let response = self
                .client
                .get(&self.url)
                .query(&[
                    ("ie", "UTF-8"),
                    ("client", "tw-ob"),
                    ("tl", language),
                    ("q", chunk.as_str()),
                    ("total", total.as_str()),
                    ("idx", idx.as_str()),
                    ("textlen", textlen.as_str()),
                ])
                .send()
                .await
                .map_err(|e| ErrorReport::external(format!("speech synthesis request failed: {e}")))?;
            let status = response.status();
            if !status.is_success() {
                return Err(ErrorReport::external(format!(
                    "speech synthesis failed with status {status}"
                )));
            }
            let bytes = response
                .bytes()
                .await
                .map_err(|e| ErrorReport::external(format!("speech synthesis response failed: {e}")))?;
            audio.extend_from_slice(&bytes);
        }
        Ok(audio)
    }
}

/// Split text into chunks of at most `max` characters, breaking on
/// whitespace where possible.
fn split_text(text: &str, max: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if word_len > max {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let chars: Vec<char> = word.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        let needed = if current.is_empty() { word_len } else { current_len + 1 + word_len };
        if needed > max {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if !current.is_empty() {
            current.push(' ');
            current_len += 1;
        }
        current.push_str(word);
        current_len += word_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
