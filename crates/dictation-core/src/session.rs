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

//! The quiz state machine.
//!
//! A session is `Idle` until a word list is loaded, `InProgress` while the
//! cursor points at an unanswered pair, and `Finished` once the cursor has
//! run off the end of the list. Each answer moves the cursor forward by one.

use crate::answer::evaluate;
use crate::answer::missing_translation;
use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::report::Report;
use crate::report::summarize;
use crate::rng::TinyRng;
use crate::rng::shuffle;
use crate::stats::RunningStats;
use crate::stats::Stats;
use crate::types::mode::DrillMode;
use crate::types::mode::Side;
use crate::types::word_pair::WordPair;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    Idle,
    InProgress,
    Finished,
}

/// The word the user should hear next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Question {
    /// Zero-based position in the session.
    pub index: usize,
    pub total: usize,
    pub speak_word: String,
    /// Which language the word should be spoken in.
    pub speak_side: Side,
    pub mode: DrillMode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum CurrentWord {
    Word(Question),
    Finished(Stats),
}

/// The outcome of a single answer.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub is_correct: bool,
    pub correct_word: String,
    pub heard_word: String,
    pub running: RunningStats,
}

#[derive(Clone, Debug, Default)]
pub struct QuizSession {
    pairs: Vec<WordPair>,
    cursor: usize,
    mode: DrillMode,
    stats: Stats,
}

impl QuizSession {
    /// A session with no words loaded.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> SessionStatus {
        if self.pairs.is_empty() {
            SessionStatus::Idle
        } else if self.cursor < self.pairs.len() {
            SessionStatus::InProgress
        } else {
            SessionStatus::Finished
        }
    }

    pub fn mode(&self) -> DrillMode {
        self.mode
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn total_words(&self) -> usize {
        self.pairs.len()
    }

    pub fn pairs(&self) -> &[WordPair] {
        &self.pairs
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    /// Replace the word list and start over.
    ///
    /// The list is shuffled before it becomes active. On error the session is
    /// left exactly as it was.
    pub fn load(
        &mut self,
        mut pairs: Vec<WordPair>,
        mode: DrillMode,
        rng: &mut TinyRng,
    ) -> Fallible<usize> {
        if pairs.is_empty() {
            return Err(ErrorReport::validation("no valid words"));
        }
        if mode.needs_translation() {
            if let Some(pair) = pairs.iter().find(|pair| pair.secondary().is_none()) {
                return Err(missing_translation(pair));
            }
        }
        shuffle(&mut pairs, rng);
        self.pairs = pairs;
        self.mode = mode;
        self.cursor = 0;
        self.stats = Stats::new();
        Ok(self.pairs.len())
    }

    pub fn current(&self) -> Fallible<CurrentWord> {
        match self.status() {
            SessionStatus::Idle => Err(no_word_list()),
            SessionStatus::Finished => Ok(CurrentWord::Finished(self.stats.clone())),
            SessionStatus::InProgress => {
                let pair = &self.pairs[self.cursor];
                let side = self.mode.spoken_side();
                let speak_word = pair.side(side).ok_or_else(|| missing_translation(pair))?;
                Ok(CurrentWord::Word(Question {
                    index: self.cursor,
                    total: self.pairs.len(),
                    speak_word: speak_word.to_string(),
                    speak_side: side,
                    mode: self.mode,
                }))
            }
        }
    }

    /// Score an answer to the current word and move on to the next one.
    pub fn submit(&mut self, answer: &str) -> Fallible<Verdict> {
        match self.status() {
            SessionStatus::Idle => return Err(no_word_list()),
            SessionStatus::Finished => return Err(ErrorReport::not_found("no current word")),
            SessionStatus::InProgress => {}
        }
        let record = evaluate(&self.pairs[self.cursor], self.mode, answer)?;
        let is_correct = record.is_correct;
        let correct_word = record.correct_word.clone();
        let heard_word = record.heard_word.clone();
        self.stats.record(record);
        self.cursor += 1;
        Ok(Verdict {
            is_correct,
            correct_word,
            heard_word,
            running: self.stats.running(),
        })
    }

    /// Reshuffle the loaded words and clear progress. Words are not reloaded.
    pub fn reset(&mut self, rng: &mut TinyRng) {
        shuffle(&mut self.pairs, rng);
        self.cursor = 0;
        self.stats = Stats::new();
    }

    pub fn report(&self) -> Report {
        summarize(&self.stats, self.pairs.len())
    }
}

fn no_word_list() -> ErrorReport {
    ErrorReport::not_found("no word list loaded")
}
