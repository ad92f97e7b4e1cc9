use thiserror::Error;

/// Errors raised while building or running a tournament.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("configuration error: expected {expected} groups, found {found}")]
    GroupCount { expected: usize, found: usize },

    #[error("configuration error: group {group} has {found} teams, expected {expected}")]
    GroupSize {
        group: String,
        expected: usize,
        found: usize,
    },

    #[error("configuration error: team code {0} appears more than once")]
    DuplicateTeam(String),

    #[error("configuration error: team name {0:?} appears more than once")]
    DuplicateName(String),

    #[error("configuration error: {team} has ranking {ranking}, expected 1..={max}")]
    InvalidRanking { team: String, ranking: u32, max: u32 },

    #[error("configuration error: unknown team id {0}")]
    UnknownTeam(usize),

    #[error("configuration error: forfeit probability {0} is outside [0, 1]")]
    InvalidForfeitProb(f64),

    #[error("configuration error: bracket needs {expected} entrants, found {found}")]
    BracketEntrants { expected: usize, found: usize },

    #[error("bracket has already awarded its medals")]
    BracketComplete,

    #[error("data format error: cannot parse exhibition result {record:?}: {reason}")]
    DataFormat { record: String, reason: String },

    #[error("invalid input: {0}")]
    Json(#[from] serde_json::Error),
}

impl TournamentError {
    /// True for errors caused by a malformed roster or bracket setup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TournamentError::GroupCount { .. }
                | TournamentError::GroupSize { .. }
                | TournamentError::DuplicateTeam(_)
                | TournamentError::DuplicateName(_)
                | TournamentError::InvalidRanking { .. }
                | TournamentError::UnknownTeam(_)
                | TournamentError::InvalidForfeitProb(_)
                | TournamentError::BracketEntrants { .. }
        )
    }

    pub fn is_data_format(&self) -> bool {
        matches!(self, TournamentError::DataFormat { .. })
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        let err = TournamentError::BracketEntrants { expected: 8, found: 7 };
        assert!(err.is_configuration());
        assert!(!err.is_data_format());
        assert!(err.to_string().contains("found 7"));

        let err = TournamentError::DataFormat {
            record: "abc-5".to_string(),
            reason: "bad".to_string(),
        };
        assert!(err.is_data_format());
        assert!(!err.is_configuration());

        let err = TournamentError::InvalidRanking {
            team: "Japan".to_string(),
            ranking: 0,
            max: 1000,
        };
        assert!(err.is_configuration());
        assert_eq!(err.to_string(), "configuration error: Japan has ranking 0, expected 1..=1000");
    }
}
