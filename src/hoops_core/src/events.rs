//! Structured match and standings events.
//!
//! The simulation never prints. Everything a presentation layer needs is
//! emitted, in order, into an [`EventSink`].

use serde::Serialize;
use std::fmt;

use crate::medals::MedalResult;
use crate::team::Team;

/// Round a match belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Stage {
    Group(String),
    Quarterfinal,
    Semifinal,
    Final,
    ThirdPlace,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Group(label) => write!(f, "Group {}", label),
            Stage::Quarterfinal => write!(f, "Quarterfinal"),
            Stage::Semifinal => write!(f, "Semifinal"),
            Stage::Final => write!(f, "Final"),
            Stage::ThirdPlace => write!(f, "Third place"),
        }
    }
}

/// Outcome of a match from the perspective of the team that called `play_match`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MatchResult {
    Winner,
    Loser,
}

/// One played match.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MatchEvent {
    pub stage: Stage,
    pub team_a: String,
    pub team_b: String,
    /// Result for `team_a`
    pub result: MatchResult,
    pub winner: String,
    pub score_a: Option<u32>,
    pub score_b: Option<u32>,
    pub forfeited_by: Option<String>,
}

impl MatchEvent {
    pub fn is_forfeit(&self) -> bool {
        self.forfeited_by.is_some()
    }

    pub fn loser(&self) -> &str {
        match self.result {
            MatchResult::Winner => &self.team_b,
            MatchResult::Loser => &self.team_a,
        }
    }
}

impl fmt::Display for MatchEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.forfeited_by, self.score_a, self.score_b) {
            (Some(quitter), _, _) => {
                write!(f, "{} gives up against {}.", quitter, self.winner)
            }
            (None, Some(a), Some(b)) => match self.result {
                MatchResult::Winner => {
                    write!(f, "{} wins against {} ({}:{})", self.team_a, self.team_b, a, b)
                }
                MatchResult::Loser => {
                    write!(f, "{} wins against {} ({}:{})", self.team_b, self.team_a, b, a)
                }
            },
            _ => write!(f, "{} beats {}", self.winner, self.loser()),
        }
    }
}

/// Row of a standings table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StandingRow {
    pub rank: usize,
    pub name: String,
    pub iso_code: String,
    pub wins: u32,
    pub losses: u32,
    pub points: u32,
    pub score_for: u32,
    pub score_against: u32,
    pub differential: i64,
}

impl StandingRow {
    pub fn from_team(rank: usize, team: &Team) -> Self {
        StandingRow {
            rank,
            name: team.name.clone(),
            iso_code: team.iso_code.clone(),
            wins: team.wins,
            losses: team.losses,
            points: team.points,
            score_for: team.score_for,
            score_against: team.score_against,
            differential: team.differential(),
        }
    }
}

impl fmt::Display for StandingRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}. {} {}/{} {} {} {} {}",
            self.rank,
            self.name,
            self.wins,
            self.losses,
            self.points,
            self.score_for,
            self.score_against,
            self.differential
        )
    }
}

/// Everything that happens during a run, in chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum TournamentEvent {
    GroupStarted { group: String },
    Match(MatchEvent),
    GroupStandings { group: String, standings: Vec<StandingRow> },
    Advancing { teams: Vec<String> },
    Seeded { quarterfinals: Vec<(String, String)> },
    StageStarted { stage: Stage },
    Medals(MedalResult),
}

/// Receiver for simulation events.
pub trait EventSink {
    fn emit(&mut self, event: TournamentEvent);
}

impl EventSink for Vec<TournamentEvent> {
    fn emit(&mut self, event: TournamentEvent) {
        self.push(event);
    }
}

/// Sink that drops every event (used for batch simulations).
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: TournamentEvent) {}
}

/// Match events of a log, in order.
pub fn match_events(events: &[TournamentEvent]) -> impl Iterator<Item = &MatchEvent> {
    events.iter().filter_map(|event| match event {
        TournamentEvent::Match(m) => Some(m),
        _ => None,
    })
}
