use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum number of answers kept in the progress history.
pub const HISTORY_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    #[serde(rename = "ts", with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub correct: bool,
}

/// Global answer statistics, persisted after every evaluated answer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProgressAggregate {
    pub total_answered: u64,
    pub total_correct: u64,
    pub streak: u32,
    pub history: VecDeque<HistoryEntry>,
}

impl ProgressAggregate {
    pub fn record(&mut self, correct: bool, at: DateTime<Utc>) {
        self.total_answered += 1;
        if correct {
            self.total_correct += 1;
            self.streak += 1;
        } else {
            self.streak = 0;
        }

        while self.history.len() >= HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            timestamp: at,
            correct,
        });
    }

    /// Rounded share of correct answers, 0 when nothing was answered yet.
    pub fn accuracy_percent(&self) -> u32 {
        if self.total_answered == 0 {
            return 0;
        }
        ((self.total_correct as f64 / self.total_answered as f64) * 100.0).round() as u32
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(seconds)
    }

    #[test]
    fn streak_resets_on_wrong_answer() {
        let mut progress = ProgressAggregate::default();
        progress.record(true, at(0));
        progress.record(true, at(1));
        assert_eq!(progress.streak, 2);

        progress.record(false, at(2));
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.total_answered, 3);
        assert_eq!(progress.total_correct, 2);
    }

    #[test]
    fn history_evicts_oldest_first() {
        let mut progress = ProgressAggregate::default();
        for i in 0..(HISTORY_CAPACITY as i64 + 25) {
            progress.record(i % 2 == 0, at(i));
            assert!(progress.history.len() <= HISTORY_CAPACITY);
        }

        assert_eq!(progress.history.len(), HISTORY_CAPACITY);
        assert_eq!(progress.history.front().unwrap().timestamp, at(25));
        assert_eq!(
            progress.history.back().unwrap().timestamp,
            at(HISTORY_CAPACITY as i64 + 24)
        );
    }

    #[test]
    fn accuracy_rounds_to_whole_percent() {
        let mut progress = ProgressAggregate::default();
        assert_eq!(progress.accuracy_percent(), 0);

        progress.record(true, at(0));
        progress.record(true, at(1));
        progress.record(false, at(2));
        assert_eq!(progress.accuracy_percent(), 67);
    }

    #[test]
    fn reads_browser_progress_format() {
        let json = r#"{"totalAnswered":2,"totalCorrect":1,"streak":0,
            "history":[{"ts":1700000000000,"correct":true},{"ts":1700000001000,"correct":false}]}"#;
        let progress: ProgressAggregate = serde_json::from_str(json).unwrap();
        assert_eq!(progress.total_answered, 2);
        assert_eq!(progress.history.len(), 2);
        assert_eq!(progress.history[0].timestamp, at(0));
    }
}
