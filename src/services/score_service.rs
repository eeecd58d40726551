use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::state::leaderboard::{Entry, Leaderboard};

/// Body of `POST /api/scores`.
///
/// Missing fields fall back to `""` and `0`, so `{}` decodes and then fails
/// validation on the name.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ScoreSubmission {
    #[serde(alias = "Name", alias = "NAME")]
    pub name: String,
    #[serde(alias = "Score", alias = "SCORE")]
    pub score: i64,
}

/// One ranked row as returned by `GET /api/leaderboard`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreView {
    pub name: String,
    pub score: u64,
    /// RFC 3339.
    pub timestamp: DateTime<Utc>,
}

impl From<Entry> for ScoreView {
    fn from(entry: Entry) -> Self {
        Self {
            name: entry.name().to_string(),
            score: entry.score(),
            timestamp: entry.created_at(),
        }
    }
}

/// Decode the first JSON value of a raw request body; anything after it is
/// ignored. Content type is not checked.
pub fn decode_submission(body: &[u8]) -> Result<ScoreSubmission, ApiError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<ScoreSubmission>()
        .next()
    {
        Some(Ok(sub)) => Ok(sub),
        Some(Err(e)) => {
            tracing::warn!("Rejected score submission: undecodable body ({e})");
            Err(ApiError::InvalidBody)
        }
        None => {
            tracing::warn!("Rejected score submission: empty body");
            Err(ApiError::InvalidBody)
        }
    }
}

/// Check the submission and return the name and score the store accepts.
pub fn validate(sub: ScoreSubmission) -> Result<(String, u64), ApiError> {
    if sub.name.is_empty() {
        tracing::warn!("Rejected score submission: empty name");
        return Err(ApiError::NameRequired);
    }

    let score = u64::try_from(sub.score).map_err(|_| {
        tracing::warn!("Rejected score submission from {}: score {}", sub.name, sub.score);
        ApiError::InvalidScore
    })?;

    Ok((sub.name, score))
}

/// Decode, validate and record a submission.
pub fn submit(board: &Leaderboard, body: &[u8]) -> Result<(), ApiError> {
    let (name, score) = validate(decode_submission(body)?)?;
    let entry = board.submit(name, score);

    tracing::debug!(
        "Accepted score {} for {} ({} ranked entries)",
        entry.score(),
        entry.name(),
        board.len()
    );
    Ok(())
}

/// Current ranking in wire form, highest score first.
pub fn top_scores(board: &Leaderboard) -> Vec<ScoreView> {
    board.snapshot().into_iter().map(ScoreView::from).collect()
}
