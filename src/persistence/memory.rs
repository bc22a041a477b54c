//! In-process score store for tests and offline play
//!
//! Behaves like the real service: the stored best only goes up, and a submit
//! answers with the stored best.

use std::cell::{Cell, RefCell};

use super::ScoreStore;
use crate::error::{ArkanoidError, Result};
use crate::highscores::ScoreRecord;

#[derive(Debug, Default)]
pub struct MemoryScoreStore {
    best: Cell<Option<u32>>,
    submissions: RefCell<Vec<u32>>,
    fetches: Cell<usize>,
    failing: Cell<bool>,
}

impl MemoryScoreStore {
    pub fn new(best: Option<u32>) -> Self {
        Self {
            best: Cell::new(best),
            ..Default::default()
        }
    }

    /// Make every following call fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn best(&self) -> Option<u32> {
        self.best.get()
    }

    pub fn submissions(&self) -> Vec<u32> {
        self.submissions.borrow().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.get()
    }

    fn check(&self) -> Result<()> {
        if self.failing.get() {
            Err(ArkanoidError::ScoreStore("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl ScoreStore for MemoryScoreStore {
    async fn fetch_best(&self) -> Result<ScoreRecord> {
        self.fetches.set(self.fetches.get() + 1);
        self.check()?;
        Ok(ScoreRecord {
            score: self.best.get(),
        })
    }

    async fn submit(&self, score: u32) -> Result<ScoreRecord> {
        self.check()?;
        self.submissions.borrow_mut().push(score);
        let best = self.best.get().map_or(score, |b| b.max(score));
        self.best.set(Some(best));
        Ok(ScoreRecord::new(best))
    }
}
