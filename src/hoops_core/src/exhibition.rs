use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Result, TournamentError};

/// Exhibition record as it appears in the exhibitions input.
///
/// Only `Result` is used by the model; the other fields are kept for display.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ExhibitionEntry {
    #[serde(rename = "Result")]
    pub result: String,

    #[serde(rename = "Opponent", default, skip_serializing_if = "Option::is_none")]
    pub opponent: Option<String>,

    #[serde(rename = "Date", default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Parsed exhibition score, from the perspective of the team that owns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ExhibitionResult {
    pub score_for: u32,
    pub score_against: u32,
}

impl ExhibitionResult {
    pub fn new(score_for: u32, score_against: u32) -> Self {
        ExhibitionResult {
            score_for,
            score_against,
        }
    }

    pub fn is_win(&self) -> bool {
        self.score_for > self.score_against
    }
}

impl FromStr for ExhibitionResult {
    type Err = TournamentError;

    /// Parse `"scoreA-scoreB"`, e.g. `"86-79"`.
    fn from_str(record: &str) -> Result<Self> {
        let malformed = |reason: String| TournamentError::DataFormat {
            record: record.to_string(),
            reason,
        };

        let (left, right) = record
            .trim()
            .split_once('-')
            .ok_or_else(|| malformed("missing '-' separator".to_string()))?;

        let score_for = left
            .trim()
            .parse::<u32>()
            .map_err(|e| malformed(format!("first score: {}", e)))?;
        let score_against = right
            .trim()
            .parse::<u32>()
            .map_err(|e| malformed(format!("second score: {}", e)))?;

        Ok(ExhibitionResult::new(score_for, score_against))
    }
}

/// What to do with exhibition records that do not parse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ExhibitionPolicy {
    /// Skip the record and log a warning. Form factor is a soft signal.
    #[default]
    Lenient,
    /// Fail the roster load.
    Strict,
}

/// Parse a team's exhibition history, in order.
pub fn parse_history(
    iso_code: &str,
    entries: &[ExhibitionEntry],
    policy: ExhibitionPolicy,
) -> Result<Vec<ExhibitionResult>> {
    let mut results = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.result.parse::<ExhibitionResult>() {
            Ok(result) => results.push(result),
            Err(err) if policy == ExhibitionPolicy::Lenient => {
                tracing::warn!(team = iso_code, error = %err, "skipping exhibition record");
            }
            Err(err) => return Err(err),
        }
    }

    Ok(results)
}
