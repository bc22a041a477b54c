//! Best-score bookkeeping
//!
//! The remote store is authoritative. A fetched score only ever raises the
//! local best; a submit response replaces it outright.

use serde::{Deserialize, Serialize};

/// Wire shape of the score store, both directions: `{"score": N}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl ScoreRecord {
    pub fn new(score: u32) -> Self {
        Self { score: Some(score) }
    }
}

/// Local best after a successful fetch. A missing field reads as 0.
pub fn merge_fetched(local: u32, fetched: ScoreRecord) -> u32 {
    local.max(fetched.score.unwrap_or(0))
}

/// Local best after a successful submit of `submitted`.
///
/// The response wins even when it is lower than the local value; a response
/// without a score falls back to what was submitted.
pub fn merge_submitted(submitted: u32, response: ScoreRecord) -> u32 {
    response.score.unwrap_or(submitted)
}
