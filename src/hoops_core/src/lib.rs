//! Hoops Core - basketball tournament simulation.
//!
//! Twelve national teams play a round robin in three groups of four. The top
//! two of each group and the two best third-placed teams enter an eight-team
//! knockout bracket that ends with a final and a third-place game.
//!
//! Inputs are plain JSON documents:
//!
//! - groups: `{"A": [{"Team": "Canada", "ISOCode": "CAN", "FIBARanking": 7}, ...], ...}`
//! - exhibitions: `{"CAN": [{"Opponent": "GER", "Result": "86-79"}, ...], ...}`
//!
//! A run reports everything through an [`EventSink`] and returns a
//! [`TournamentResult`]. Randomness is always injected, so seeded runs are
//! reproducible. Python bindings are available behind the `python` feature.

pub mod bracket;
pub mod constants;
pub mod error;
pub mod events;
pub mod exhibition;
pub mod group;
pub mod medals;
pub mod roster;
pub mod scoring;
pub mod team;
pub mod tournament;

#[cfg(feature = "python")]
mod python;

pub use bracket::{select_advancing, Bracket, BracketStage, Podium};
pub use constants::{BRACKET_SIZE, FORFEIT_PROB, GROUP_COUNT, GROUP_SIZE, MAX_RANKING, WIN_POINTS};
pub use error::{Result, TournamentError};
pub use events::{
    match_events, EventSink, MatchEvent, MatchResult, NullSink, Stage, StandingRow,
    TournamentEvent,
};
pub use exhibition::{parse_history, ExhibitionEntry, ExhibitionPolicy, ExhibitionResult};
pub use group::{compare_standing, rank_teams, Group};
pub use medals::{MedalCount, MedalResult, MedalTable};
pub use roster::{ExhibitionsInput, GroupsInput, Roster, TeamEntry, TeamId};
pub use scoring::{calculate_score, calculate_win_prob, simulate_match, MatchOutcome, Side};
pub use team::Team;
pub use tournament::{GroupRanking, Tournament, TournamentResult};
