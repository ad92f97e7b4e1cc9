/// Probability that a side forfeits a match before tip-off
pub const FORFEIT_PROB: f64 = 0.1;

/// Expected score of a side when both teams are evenly matched
pub const BASE_SCORE: f64 = 70.0;

/// Combined expected score of both sides (the opponent gets what is left of it)
pub const COMBINED_BASE_SCORE: f64 = 2.0 * BASE_SCORE;

/// No simulated score goes below this
pub const SCORE_FLOOR: f64 = 60.0;

/// Width of the uniform noise added to each side's base score
pub const SCORE_SPREAD: f64 = 20.0;

/// Ranking places per unit of matchup factor
pub const RANKING_SCALE: f64 = 10.0;

/// Points of base score per unit of matchup factor
pub const FACTOR_WEIGHT: f64 = 5.0;

/// Worst ranking a team may carry
pub const MAX_RANKING: u32 = 1000;

/// Standing points for a win (a loss, forfeited or played, is worth nothing)
pub const WIN_POINTS: u32 = 2;

/// Number of groups in the preliminary round
pub const GROUP_COUNT: usize = 3;

/// Teams per group
pub const GROUP_SIZE: usize = 4;

/// Teams per group that qualify directly
pub const DIRECT_QUALIFIERS: usize = 2;

/// Best third-placed teams that also qualify
pub const THIRD_PLACE_QUALIFIERS: usize = 2;

/// Entrants in the knockout bracket
pub const BRACKET_SIZE: usize = GROUP_COUNT * DIRECT_QUALIFIERS + THIRD_PLACE_QUALIFIERS;

/// Group labels, in the order groups are played
pub fn group_label(index: usize) -> String {
    char::from(b'A' + (index % 26) as u8).to_string()
}
