//! Typing tracker.
//!
//! Scores what the player typed against the race text. Submitted lines are
//! joined with a single space. A character that does not match the next
//! expected one is counted as a miss and skipped, so misses lower accuracy
//! but never move progress. Progress is the matched prefix over the text
//! length.

/// Characters per "word" in words-per-minute
const CHARS_PER_WORD: f64 = 5.0;

/// Stats reported with `room:progress`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingStats {
    pub progress: f64,
    pub wpm: f64,
    pub accuracy: f64,
}

pub struct TypingTracker {
    target: Vec<char>,
    started_at: i64,
    position: usize,
    correct: u64,
    typed: u64,
}

impl TypingTracker {
    /// `started_at` is the race start on the local clock
    pub fn new(text: &str, started_at: i64) -> Self {
        Self {
            target: text.chars().collect(),
            started_at,
            position: 0,
            correct: 0,
            typed: 0,
        }
    }

    /// Score one submitted line and return the updated stats
    pub fn type_line(&mut self, line: &str, now_local: i64) -> TypingStats {
        let separator = (self.typed > 0).then_some(' ');
        for ch in separator.into_iter().chain(line.chars()) {
            self.typed += 1;
            if self.target.get(self.position) == Some(&ch) {
                self.position += 1;
                self.correct += 1;
            }
        }
        self.stats(now_local)
    }

    pub fn stats(&self, now_local: i64) -> TypingStats {
        let progress = if self.target.is_empty() {
            1.0
        } else {
            self.position as f64 / self.target.len() as f64
        };
        let minutes = (now_local - self.started_at).max(0) as f64 / 60_000.0;
        let wpm = if minutes > 0.0 {
            self.position as f64 / CHARS_PER_WORD / minutes
        } else {
            0.0
        };
        let accuracy = if self.typed == 0 {
            100.0
        } else {
            self.correct as f64 / self.typed as f64 * 100.0
        };
        TypingStats {
            progress,
            wpm,
            accuracy,
        }
    }

    /// The part of the text still to be typed
    pub fn remaining(&self) -> String {
        self.target[self.position.min(self.target.len())..]
            .iter()
            .collect()
    }
}
