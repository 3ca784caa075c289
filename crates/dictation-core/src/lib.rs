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

//! dictation-core: Core library for the dictation trainer.
//!
//! This library has no I/O and provides:
//! - Parsing word lists into word pairs
//! - The quiz session state machine and answer evaluation
//! - Results summaries and grades
//! - Cache keys for synthesized audio

pub mod answer;
pub mod audio_key;
pub mod error;
pub mod parser;
pub mod report;
pub mod rng;
pub mod session;
pub mod stats;
pub mod types;

// Re-exports for convenience
pub use error::{ErrorKind, ErrorReport, Fallible, fail};
pub use parser::{pairs_from_entries, parse_word_pairs};
pub use report::{Grade, Report, summarize};
pub use session::{CurrentWord, QuizSession, SessionStatus, Verdict};
pub use stats::{AttemptRecord, RunningStats, Stats};
pub use types::language::Languages;
pub use types::mode::{DrillMode, Side};
pub use types::word_pair::{DictionaryEntry, WordPair};
