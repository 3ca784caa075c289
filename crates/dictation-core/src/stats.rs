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

use serde::Serialize;

/// One answered question.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct AttemptRecord {
    /// The word that was spoken.
    pub heard_word: String,
    /// The word the user was expected to type.
    pub correct_word: String,
    /// What the user actually typed.
    pub user_answer: String,
    pub is_correct: bool,
}

/// Statistics accumulated over a session. Append-only until reset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    total_attempts: usize,
    correct_attempts: usize,
    session_results: Vec<AttemptRecord>,
}

/// The running tally sent back after every answer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct RunningStats {
    pub total: usize,
    pub correct: usize,
    pub percentage: f64,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, attempt: AttemptRecord) {
        self.total_attempts += 1;
        if attempt.is_correct {
            self.correct_attempts += 1;
        }
        self.session_results.push(attempt);
    }

    pub fn total_attempts(&self) -> usize {
        self.total_attempts
    }

    pub fn correct_attempts(&self) -> usize {
        self.correct_attempts
    }

    pub fn results(&self) -> &[AttemptRecord] {
        &self.session_results
    }

    /// Accuracy over the attempts made so far, as a percentage.
    pub fn accuracy(&self) -> f64 {
        percentage(self.correct_attempts, self.total_attempts)
    }

    pub fn running(&self) -> RunningStats {
        RunningStats {
            total: self.total_attempts,
            correct: self.correct_attempts,
            percentage: self.accuracy(),
        }
    }
}

/// `part / whole * 100`, or zero for an empty whole.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
