use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::constants::WIN_POINTS;
use crate::events::{MatchEvent, MatchResult, Stage};
use crate::exhibition::ExhibitionResult;
use crate::scoring::{simulate_match, MatchOutcome, Side};

/// National team with its tournament standing.
///
/// Identity and exhibition history are fixed once loaded; the standing fields
/// only ever grow as matches are played.
#[derive(Clone, Debug, Serialize)]
pub struct Team {
    pub name: String,

    /// ISO country code, used to join exhibition data
    pub iso_code: String,

    /// FIBA world ranking (lower is stronger)
    pub fiba_ranking: u32,

    /// Standing points: 2 per win
    pub points: u32,
    pub wins: u32,
    pub losses: u32,

    /// Points scored in played (non-forfeited) matches
    pub score_for: u32,

    /// Points conceded in played (non-forfeited) matches
    pub score_against: u32,

    #[serde(skip)]
    exhibition_results: Vec<ExhibitionResult>,
}

impl Team {
    pub fn new(name: impl Into<String>, iso_code: impl Into<String>, fiba_ranking: u32) -> Self {
        Team {
            name: name.into(),
            iso_code: iso_code.into(),
            fiba_ranking,
            points: 0,
            wins: 0,
            losses: 0,
            score_for: 0,
            score_against: 0,
            exhibition_results: Vec::new(),
        }
    }

    /// Attach the team's exhibition history
    pub fn with_exhibition_results(mut self, results: Vec<ExhibitionResult>) -> Self {
        self.exhibition_results = results;
        self
    }

    pub fn exhibition_results(&self) -> &[ExhibitionResult] {
        &self.exhibition_results
    }

    /// Share of exhibition matches won, 0.0 without any history.
    pub fn form_factor(&self) -> f64 {
        if self.exhibition_results.is_empty() {
            return 0.0;
        }
        let wins = self.exhibition_results.iter().filter(|r| r.is_win()).count();
        wins as f64 / self.exhibition_results.len() as f64
    }

    /// Scored minus conceded
    pub fn differential(&self) -> i64 {
        self.score_for as i64 - self.score_against as i64
    }

    pub fn matches_played(&self) -> u32 {
        self.wins + self.losses
    }

    /// Play a match against `opponent` and apply the result to both standings.
    ///
    /// The winner gets 2 points and a win, the loser a loss. Scores only
    /// accumulate for matches that were actually played.
    pub fn play_match<R: Rng>(
        &mut self,
        opponent: &mut Team,
        stage: &Stage,
        forfeit_prob: f64,
        rng: &mut R,
    ) -> MatchEvent {
        let outcome = simulate_match(self, opponent, forfeit_prob, rng);

        if let Some((score_a, score_b)) = outcome.scores() {
            self.record_score(score_a, score_b);
            opponent.record_score(score_b, score_a);
        }

        let result = match outcome.winner() {
            Side::A => {
                self.record_win();
                opponent.record_loss();
                MatchResult::Winner
            }
            Side::B => {
                opponent.record_win();
                self.record_loss();
                MatchResult::Loser
            }
        };

        let winner = match result {
            MatchResult::Winner => &self.name,
            MatchResult::Loser => &opponent.name,
        };

        let event = MatchEvent {
            stage: stage.clone(),
            team_a: self.name.clone(),
            team_b: opponent.name.clone(),
            result,
            winner: winner.clone(),
            score_a: outcome.scores().map(|(a, _)| a),
            score_b: outcome.scores().map(|(_, b)| b),
            forfeited_by: match outcome {
                MatchOutcome::Forfeit { forfeited: Side::A } => Some(self.name.clone()),
                MatchOutcome::Forfeit { forfeited: Side::B } => Some(opponent.name.clone()),
                MatchOutcome::Decided { .. } => None,
            },
        };

        match &event.forfeited_by {
            Some(quitter) => tracing::debug!(%stage, team = %quitter, "forfeit"),
            None => tracing::debug!(
                %stage,
                team_a = %event.team_a,
                team_b = %event.team_b,
                score_a = ?event.score_a,
                score_b = ?event.score_b,
                "match decided"
            ),
        }

        event
    }

    fn record_win(&mut self) {
        self.points += WIN_POINTS;
        self.wins += 1;
    }

    fn record_loss(&mut self) {
        self.losses += 1;
    }

    fn record_score(&mut self, scored: u32, conceded: u32) {
        self.score_for = self.score_for.saturating_add(scored);
        self.score_against = self.score_against.saturating_add(conceded);
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, #{})", self.name, self.iso_code, self.fiba_ranking)
    }
}
