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

use crate::stats::AttemptRecord;
use crate::stats::Stats;
use crate::stats::percentage;

/// A school grade from 1 (worst) to 5 (best).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Grade(u8);

impl Grade {
    /// Thresholds are inclusive lower bounds.
    pub fn from_percentage(percentage: f64) -> Self {
        let grade = if percentage >= 95.0 {
            5
        } else if percentage >= 85.0 {
            4
        } else if percentage >= 75.0 {
            3
        } else if percentage >= 60.0 {
            2
        } else {
            1
        };
        Grade(grade)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

/// The end-of-session summary.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub grade: Grade,
    pub total_words: usize,
    pub correct_count: usize,
    pub errors_count: usize,
    pub percentage: f64,
    pub session_results: Vec<AttemptRecord>,
}

/// Summarize a session.
///
/// The percentage is measured against every word in the session, not just
/// the ones answered: stopping early counts the unanswered words as errors.
pub fn summarize(stats: &Stats, total_words: usize) -> Report {
    let correct_count = stats.correct_attempts();
    let percentage = percentage(correct_count, total_words);
    Report {
        grade: Grade::from_percentage(percentage),
        total_words,
        correct_count,
        errors_count: total_words.saturating_sub(correct_count),
        percentage,
        session_results: stats.results().to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats_with(correct: usize, wrong: usize) -> Stats {
        let mut stats = Stats::new();
        for i in 0..(correct + wrong) {
            stats.record(AttemptRecord {
                heard_word: format!("w{i}"),
                correct_word: format!("w{i}"),
                user_answer: format!("w{i}"),
                is_correct: i < correct,
            });
        }
        stats
    }

    #[test]
    fn test_grade_boundaries() {
        assert_eq!(Grade::from_percentage(100.0).value(), 5);
        assert_eq!(Grade::from_percentage(95.0).value(), 5);
        assert_eq!(Grade::from_percentage(94.9).value(), 4);
        assert_eq!(Grade::from_percentage(85.0).value(), 4);
        assert_eq!(Grade::from_percentage(84.9).value(), 3);
        assert_eq!(Grade::from_percentage(75.0).value(), 3);
        assert_eq!(Grade::from_percentage(60.0).value(), 2);
        assert_eq!(Grade::from_percentage(59.9).value(), 1);
        assert_eq!(Grade::from_percentage(0.0).value(), 1);
    }

    #[test]
    fn test_perfect_session() {
        let report = summarize(&stats_with(2, 0), 2);
        assert_eq!(report.grade, Grade(5));
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.errors_count, 0);
        assert_eq!(report.session_results.len(), 2);
    }

    #[test]
    fn test_abandoned_session_counts_against_all_words() {
        // Four of four answered correctly, but the list had ten words.
        let stats = stats_with(4, 0);
        assert_eq!(stats.accuracy(), 100.0);
        let report = summarize(&stats, 10);
        assert_eq!(report.percentage, 40.0);
        assert_eq!(report.correct_count, 4);
        assert_eq!(report.errors_count, 6);
        assert_eq!(report.grade, Grade(1));
    }

    #[test]
    fn test_empty_session() {
        let report = summarize(&Stats::new(), 0);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.grade, Grade(1));
        assert_eq!(report.errors_count, 0);
    }

    #[test]
    fn test_serialize() {
        let report = summarize(&stats_with(3, 1), 4);
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["grade"], 3);
        assert_eq!(json["errors_count"], 1);
        assert_eq!(json["percentage"], 75.0);
    }
}
