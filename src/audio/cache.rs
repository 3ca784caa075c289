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

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use dictation_core::ErrorReport;
use dictation_core::Fallible;
use dictation_core::Languages;
use dictation_core::audio_key::audio_file_name;

use crate::audio::store::AudioStore;
use crate::audio::tts::SpeechSynthesizer;

/// A recording that is present in the cache directory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachedAudio {
    pub file_name: String,
    pub path: PathBuf,
}

/// Synthesizes each (word, language) pair at most once and keeps the result
/// on disk. Entries are never invalidated.
pub struct AudioCache {
    store: AudioStore,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    languages: Languages,
    writes: AtomicU64,
}

impl AudioCache {
    pub fn new(
        directory: &Path,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        languages: Languages,
    ) -> Fallible<Self> {
        Ok(Self {
            store: AudioStore::new(directory)?,
            synthesizer,
            languages,
            writes: AtomicU64::new(0),
        })
    }

    /// Return the cached recording of `word`, synthesizing it on a miss.
    ///
    /// A failed synthesis leaves nothing behind in the cache.
    pub async fn fetch(&self, word: &str, language: &str) -> Fallible<CachedAudio> {
        let word = word.trim();
        if word.is_empty() {
            return Err(ErrorReport::validation("no word given"));
        }
        let language = self.languages.validate(language)?;
        let file_name = audio_file_name(word, language);
        let path = self.store.root().join(&file_name);
        if tokio::fs::try_exists(&path).await? {
            log::debug!("Audio cache hit: {file_name}");
            return Ok(CachedAudio { file_name, path });
        }
        log::debug!("Audio cache miss: {file_name}");
        let audio = match self.synthesizer.synthesize(word, language).await {
            Ok(audio) => audio,
            Err(e) => {
                log::warn!("Speech synthesis failed for {file_name}: {}", e.message());
                return Err(e);
            }
        };
        if audio.is_empty() {
            return Err(ErrorReport::external("speech synthesis returned no audio"));
        }
        self.persist(&path, &file_name, &audio).await?;
        Ok(CachedAudio { file_name, path })
    }

    /// Read a cached recording by file name.
    pub async fn load(&self, file_name: &str) -> Fallible<Vec<u8>> {
        self.store.load(file_name).await
    }

    /// Write to a hidden sibling first, then rename into place, so readers
    /// never observe a partial file under the final name.
    async fn persist(&self, path: &Path, file_name: &str, audio: &[u8]) -> Fallible<()> {
        let n = self.writes.fetch_add(1, Ordering::Relaxed);
        let tmp = self.store.root().join(format!(".{file_name}.{n}.part"));
        if let Err(e) = tokio::fs::write(&tmp, audio).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ErrorReport::storage(format!("failed to write audio: {e}")));
        }
        if let Err(e) = tokio::fs::rename(&tmp, path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(ErrorReport::storage(format!("failed to store audio: {e}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use async_trait::async_trait;
    use dictation_core::ErrorKind;

    use super::*;
    use crate::helper::create_tmp_directory;

    /// Counts calls and speaks the text back as bytes.
    #[derive(Default)]
    struct EchoSynthesizer {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpeechSynthesizer for EchoSynthesizer {
        async fn synthesize(&self, text: &str, language: &str) -> Fallible<Vec<u8>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{language}:{text}").into_bytes())
        }
    }

    struct BrokenSynthesizer;

    #[async_trait]
    impl SpeechSynthesizer for BrokenSynthesizer {
        async fn synthesize(&self, _text: &str, _language: &str) -> Fallible<Vec<u8>> {
            Err(ErrorReport::external("429 Too Many Requests"))
        }
    }

    #[tokio::test]
    async fn test_second_fetch_hits_cache() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let synth = Arc::new(EchoSynthesizer::default());
        let cache = AudioCache::new(&dir, synth.clone(), Languages::default())?;

        let first = cache.fetch("кот", "ru").await?;
        let first_bytes = cache.load(&first.file_name).await?;
        let second = cache.fetch("кот", "ru").await?;
        let second_bytes = cache.load(&second.file_name).await?;

        assert_eq!(synth.calls.load(Ordering::SeqCst), 1);
        assert_eq!(first, second);
        assert_eq!(first.file_name, "кот_ru.mp3");
        assert_eq!(first_bytes, second_bytes);
        assert_eq!(first_bytes, "ru:кот".as_bytes().to_vec());
        Ok(())
    }

    #[tokio::test]
    async fn test_languages_are_cached_separately() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let synth = Arc::new(EchoSynthesizer::default());
        let cache = AudioCache::new(&dir, synth.clone(), Languages::default())?;
        cache.fetch("cat", "en").await?;
        cache.fetch("cat", "ru").await?;
        assert_eq!(synth.calls.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let cache = AudioCache::new(&dir, Arc::new(BrokenSynthesizer), Languages::default())?;
        let err = cache.fetch("дом", "ru").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ExternalService);
        assert_eq!(err.message(), "429 Too Many Requests");
        assert_eq!(std::fs::read_dir(&dir)?.count(), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_language_is_rejected() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let synth = Arc::new(EchoSynthesizer::default());
        let cache = AudioCache::new(&dir, synth.clone(), Languages::default())?;
        let err = cache.fetch("кот", "../../x").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(synth.calls.load(Ordering::SeqCst), 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_blank_word_is_rejected() -> Fallible<()> {
        let dir = create_tmp_directory()?;
        let cache = AudioCache::new(&dir, Arc::new(EchoSynthesizer::default()), Languages::default())?;
        assert!(cache.fetch("  ", "ru").await.is_err());
        Ok(())
    }
}
