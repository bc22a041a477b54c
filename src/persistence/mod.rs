//! Remote best-score persistence
//!
//! The game only needs two calls, both best-effort:
//! - `fetch_best`: `GET` returning `{score}`
//! - `submit`: `POST {score}` returning the store's authoritative `{score}`
//!
//! Failures are reported to the caller, which logs them and moves on.

pub mod http;
pub mod memory;

pub use http::HttpScoreStore;
pub use memory::MemoryScoreStore;

use crate::error::{ArkanoidError, Result};
use crate::highscores::ScoreRecord;

/// Best-score store contract
#[allow(async_fn_in_trait)]
pub trait ScoreStore {
    /// Current best score known to the store
    async fn fetch_best(&self) -> Result<ScoreRecord>;

    /// Report a finished game's score; returns the store's best afterwards
    async fn submit(&self, score: u32) -> Result<ScoreRecord>;
}

impl<T: ScoreStore> ScoreStore for std::rc::Rc<T> {
    async fn fetch_best(&self) -> Result<ScoreRecord> {
        (**self).fetch_best().await
    }

    async fn submit(&self, score: u32) -> Result<ScoreRecord> {
        (**self).submit(score).await
    }
}

/// Store used when score sync is turned off in settings
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineScoreStore;

impl ScoreStore for OfflineScoreStore {
    async fn fetch_best(&self) -> Result<ScoreRecord> {
        Err(ArkanoidError::ScoreStore("score sync disabled".into()))
    }

    async fn submit(&self, _score: u32) -> Result<ScoreRecord> {
        Err(ArkanoidError::ScoreStore("score sync disabled".into()))
    }
}

/// Either the HTTP store or the offline stub, picked from settings
#[derive(Debug, Clone)]
pub enum ConfiguredStore {
    Http(HttpScoreStore),
    Offline(OfflineScoreStore),
}

impl ConfiguredStore {
    pub fn from_settings(settings: &crate::Settings) -> Self {
        if settings.score_enabled {
            ConfiguredStore::Http(HttpScoreStore::new(&settings.score_url))
        } else {
            log::info!("Score sync disabled");
            ConfiguredStore::Offline(OfflineScoreStore)
        }
    }
}

impl ScoreStore for ConfiguredStore {
    async fn fetch_best(&self) -> Result<ScoreRecord> {
        match self {
            ConfiguredStore::Http(store) => store.fetch_best().await,
            ConfiguredStore::Offline(store) => store.fetch_best().await,
        }
    }

    async fn submit(&self, score: u32) -> Result<ScoreRecord> {
        match self {
            ConfiguredStore::Http(store) => store.submit(score).await,
            ConfiguredStore::Offline(store) => store.submit(score).await,
        }
    }
}
