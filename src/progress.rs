//! Per-puzzle progress records and difficulty unlocks
//!
//! Persistence is the application's business; this module only keeps the
//! records consistent and answers unlock questions from them.

use serde::{Deserialize, Serialize};

use crate::Timestamp;
use crate::sim::{CompletionStats, Difficulty};

/// Completions of the previous tier needed to unlock the next one
pub const UNLOCK_COUNT: u32 = 3;

/// Best results for one puzzle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PuzzleProgress {
    pub puzzle_id: String,
    pub image_id: String,
    pub difficulty: Difficulty,
    pub category: String,
    pub is_completed: bool,
    /// Seconds
    pub best_time: Option<f64>,
    pub best_moves: Option<u32>,
    pub last_played_at: Timestamp,
    /// First completion
    pub completed_at: Option<Timestamp>,
    /// Best rating so far, 0 until completed
    pub star_rating: u8,
}

impl PuzzleProgress {
    pub fn new(
        puzzle_id: &str,
        image_id: &str,
        difficulty: Difficulty,
        category: &str,
        now: Timestamp,
    ) -> Self {
        Self {
            puzzle_id: puzzle_id.to_string(),
            image_id: image_id.to_string(),
            difficulty,
            category: category.to_string(),
            is_completed: false,
            best_time: None,
            best_moves: None,
            last_played_at: now,
            completed_at: None,
            star_rating: 0,
        }
    }

    /// Fold a finished run into the record, keeping the bests
    pub fn record_completion(&mut self, stats: &CompletionStats, now: Timestamp) {
        self.is_completed = true;
        self.last_played_at = now;
        self.completed_at.get_or_insert(now);
        self.best_time = Some(match self.best_time {
            Some(best) => best.min(stats.time_spent),
            None => stats.time_spent,
        });
        self.best_moves = Some(match self.best_moves {
            Some(best) => best.min(stats.move_count),
            None => stats.move_count,
        });
        self.star_rating = self.star_rating.max(stats.star_rating);
    }
}

/// What a difficulty needs before it can be played
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockRequirement {
    pub required_difficulty: Option<Difficulty>,
    pub required_count: u32,
}

pub fn unlock_requirement(difficulty: Difficulty) -> UnlockRequirement {
    let required_difficulty = match difficulty {
        Difficulty::Easy | Difficulty::Medium => None,
        Difficulty::Hard => Some(Difficulty::Medium),
        Difficulty::Challenging => Some(Difficulty::Hard),
        Difficulty::Expert => Some(Difficulty::Challenging),
        Difficulty::Master => Some(Difficulty::Expert),
    };
    UnlockRequirement {
        required_difficulty,
        required_count: if required_difficulty.is_some() { UNLOCK_COUNT } else { 0 },
    }
}

/// Distance to the next unlock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnlockProgress {
    pub next: Difficulty,
    pub current: u32,
    pub required: u32,
    pub remaining: u32,
}

/// All progress records (one per puzzle id)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressBook {
    pub entries: Vec<PuzzleProgress>,
}

impl ProgressBook {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn get(&self, puzzle_id: &str) -> Option<&PuzzleProgress> {
        self.entries.iter().find(|e| e.puzzle_id == puzzle_id)
    }

    /// Record a finished run, creating the entry on first play
    pub fn record_completion(
        &mut self,
        puzzle_id: &str,
        image_id: &str,
        difficulty: Difficulty,
        category: &str,
        stats: &CompletionStats,
        now: Timestamp,
    ) -> &PuzzleProgress {
        let idx = match self.entries.iter().position(|e| e.puzzle_id == puzzle_id) {
            Some(idx) => idx,
            None => {
                self.entries
                    .push(PuzzleProgress::new(puzzle_id, image_id, difficulty, category, now));
                self.entries.len() - 1
            }
        };
        let entry = &mut self.entries[idx];
        entry.record_completion(stats, now);
        log::info!(
            "Recorded completion of '{}' ({}): {:.1}s, {} moves, {} stars",
            puzzle_id,
            difficulty,
            stats.time_spent,
            stats.move_count,
            stats.star_rating
        );
        entry
    }

    /// Completed puzzles at a difficulty
    pub fn completed_count(&self, difficulty: Difficulty) -> u32 {
        self.entries
            .iter()
            .filter(|e| e.difficulty == difficulty && e.is_completed)
            .count() as u32
    }

    pub fn is_unlocked(&self, difficulty: Difficulty) -> bool {
        let req = unlock_requirement(difficulty);
        match req.required_difficulty {
            None => true,
            Some(required) => self.completed_count(required) >= req.required_count,
        }
    }

    /// Playable difficulties, easiest first
    pub fn unlocked_difficulties(&self) -> Vec<Difficulty> {
        Difficulty::ALL
            .iter()
            .copied()
            .filter(|d| self.is_unlocked(*d))
            .collect()
    }

    /// How far `current` completions are from unlocking the next tier
    ///
    /// None at the top tier.
    pub fn progress_to_next_unlock(&self, current: Difficulty) -> Option<UnlockProgress> {
        let next = current.next()?;
        let required = unlock_requirement(next).required_count;
        let done = self.completed_count(current);
        Some(UnlockProgress {
            next,
            current: done,
            required,
            remaining: required.saturating_sub(done),
        })
    }
}
