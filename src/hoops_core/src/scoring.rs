use rand::Rng;
use statrs::distribution::{ContinuousCDF, Triangular};

use crate::constants::{
    BASE_SCORE, COMBINED_BASE_SCORE, FACTOR_WEIGHT, RANKING_SCALE, SCORE_FLOOR, SCORE_SPREAD,
};
use crate::team::Team;

/// One of the two sides of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

/// Simulated outcome of a single match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// One side gave up; nothing was scored.
    Forfeit { forfeited: Side },
    /// The match was played. Scores are never equal.
    Decided { score_a: u32, score_b: u32 },
}

impl MatchOutcome {
    pub fn winner(&self) -> Side {
        match *self {
            MatchOutcome::Forfeit { forfeited } => forfeited.other(),
            MatchOutcome::Decided { score_a, score_b } => {
                if score_a > score_b {
                    Side::A
                } else {
                    Side::B
                }
            }
        }
    }

    pub fn scores(&self) -> Option<(u32, u32)> {
        match *self {
            MatchOutcome::Forfeit { .. } => None,
            MatchOutcome::Decided { score_a, score_b } => Some((score_a, score_b)),
        }
    }
}

/// Matchup factor in favour of side A.
///
/// `(ranking_a - ranking_b) / 10 + form_a - form_b`
pub fn matchup_factor(team_a: &Team, team_b: &Team) -> f64 {
    factor_from_ratings(
        team_a.fiba_ranking,
        team_b.fiba_ranking,
        team_a.form_factor(),
        team_b.form_factor(),
    )
}

pub fn factor_from_ratings(ranking_a: u32, ranking_b: u32, form_a: f64, form_b: f64) -> f64 {
    (ranking_a as f64 - ranking_b as f64) / RANKING_SCALE + form_a - form_b
}

/// Expected score of side A before noise; side B expects `140 - base`.
pub fn base_score(factor: f64) -> f64 {
    BASE_SCORE + factor * FACTOR_WEIGHT
}

/// Simulate a match between two teams.
///
/// Each side first draws a forfeit flag. Side A's flag is checked first, so
/// when both sides would forfeit, A forfeits and B takes the win. Otherwise
/// the match is played out with [`calculate_score`].
///
/// Does not touch either team's standing; see [`Team::play_match`].
pub fn simulate_match<R: Rng>(
    team_a: &Team,
    team_b: &Team,
    forfeit_prob: f64,
    rng: &mut R,
) -> MatchOutcome {
    // Both flags are always drawn so the stream consumed per match is fixed
    let a_forfeits = rng.gen::<f64>() < forfeit_prob;
    let b_forfeits = rng.gen::<f64>() < forfeit_prob;

    if a_forfeits {
        return MatchOutcome::Forfeit { forfeited: Side::A };
    }
    if b_forfeits {
        return MatchOutcome::Forfeit { forfeited: Side::B };
    }

    let (score_a, score_b) = calculate_score(team_a, team_b, rng);
    MatchOutcome::Decided { score_a, score_b }
}

/// Simulated final score of a played match.
///
/// Both scores are at least 60 and never equal: a tie goes to side B by one point.
pub fn calculate_score<R: Rng>(team_a: &Team, team_b: &Team, rng: &mut R) -> (u32, u32) {
    let base = base_score(matchup_factor(team_a, team_b));

    let score_a = (base + rng.gen::<f64>() * SCORE_SPREAD).max(SCORE_FLOOR).floor() as u32;
    let mut score_b = (COMBINED_BASE_SCORE - base + rng.gen::<f64>() * SCORE_SPREAD)
        .max(SCORE_FLOOR)
        .floor() as u32;

    if score_a == score_b {
        score_b += 1;
    }

    (score_a, score_b)
}

/// Probability of side A winning a played match with the given matchup factor.
///
/// The score margin is `(2 * base - 140) + (U1 - U2)` where the noise term, the
/// difference of two uniform draws, is triangular on `[-spread, spread]`.
/// The score floor and integer rounding are ignored.
pub fn played_win_prob(factor: f64) -> f64 {
    let noise = match Triangular::new(-SCORE_SPREAD, SCORE_SPREAD, 0.0) {
        Ok(dist) => dist,
        Err(_) => return 0.5,
    };
    let threshold = COMBINED_BASE_SCORE - 2.0 * base_score(factor);
    1.0 - noise.cdf(threshold)
}

/// Calculate the probability of `team_a` beating `team_b`, forfeits included.
///
/// A wins when it does not forfeit and B does, or when neither forfeits and A
/// wins the played match.
pub fn calculate_win_prob(team_a: &Team, team_b: &Team, forfeit_prob: f64) -> f64 {
    win_prob_from_factor(matchup_factor(team_a, team_b), forfeit_prob)
}

pub fn win_prob_from_factor(factor: f64, forfeit_prob: f64) -> f64 {
    let game_win_prob = played_win_prob(factor);

    if forfeit_prob > 0.0 {
        let stays = 1.0 - forfeit_prob;
        stays * forfeit_prob + stays * stays * game_win_prob
    } else {
        game_win_prob
    }
}
