//! HTTP score store
//!
//! `ureq` is blocking, so each call runs on tokio's blocking pool and the
//! game loop keeps ticking while the request is out.

use std::time::Duration;

use super::ScoreStore;
use crate::error::{ArkanoidError, Result};
use crate::highscores::ScoreRecord;

/// Per-request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct HttpScoreStore {
    url: String,
    agent: ureq::Agent,
}

impl std::fmt::Debug for HttpScoreStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpScoreStore")
            .field("url", &self.url)
            .finish()
    }
}

impl HttpScoreStore {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            agent: ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build(),
        }
    }

    async fn run<F>(&self, request: F) -> Result<ScoreRecord>
    where
        F: FnOnce(&ureq::Agent, &str) -> std::result::Result<ureq::Response, ureq::Error>
            + Send
            + 'static,
    {
        let agent = self.agent.clone();
        let url = self.url.clone();

        tokio::task::spawn_blocking(move || {
            let response = request(&agent, &url).map_err(|e| score_error(&e))?;
            log::debug!("Score: {} status={}", url, response.status());
            response
                .into_json::<ScoreRecord>()
                .map_err(|e| score_error(&e))
        })
        .await
        .map_err(|e| score_error(&e))?
    }
}

fn score_error(err: &dyn std::fmt::Display) -> ArkanoidError {
    ArkanoidError::ScoreStore(err.to_string())
}

impl ScoreStore for HttpScoreStore {
    async fn fetch_best(&self) -> Result<ScoreRecord> {
        self.run(|agent, url| agent.get(url).call()).await
    }

    async fn submit(&self, score: u32) -> Result<ScoreRecord> {
        self.run(move |agent, url| agent.post(url).send_json(ScoreRecord::new(score)))
            .await
    }
}
