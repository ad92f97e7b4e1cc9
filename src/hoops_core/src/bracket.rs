//! Knockout bracket: qualification, seeding and elimination rounds.
//!
//! Stages advance strictly in order:
//!
//! - `Seeded`: eight entrants placed in quarterfinal slots
//! - `Quarterfinals`: four winners wait for their semifinals
//! - `Semifinals`: two finalists, two teams for the third-place game
//! - `Medals`: final and third-place game played, podium known

use rand::Rng;
use serde::Serialize;

use crate::constants::{BRACKET_SIZE, DIRECT_QUALIFIERS, THIRD_PLACE_QUALIFIERS};
use crate::error::{Result, TournamentError};
use crate::events::{EventSink, MatchResult, Stage, TournamentEvent};
use crate::group::rank_teams;
use crate::medals::MedalResult;
use crate::roster::{Roster, TeamId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BracketStage {
    Seeded,
    Quarterfinals,
    Semifinals,
    Medals,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Podium {
    pub gold: TeamId,
    pub silver: TeamId,
    pub bronze: TeamId,
}

impl Podium {
    pub fn medal_result(&self, roster: &Roster) -> MedalResult {
        MedalResult {
            gold: roster.name(self.gold).to_string(),
            silver: roster.name(self.silver).to_string(),
            bronze: roster.name(self.bronze).to_string(),
        }
    }
}

/// Teams that reach the knockout stage.
///
/// The top two of every group in group order (A1, A2, B1, B2, ...), followed by
/// the best third-placed teams ranked with the group tie-break rules.
pub fn select_advancing(roster: &Roster, group_rankings: &[Vec<TeamId>]) -> Vec<TeamId> {
    let mut advancing = Vec::with_capacity(BRACKET_SIZE);
    let mut third_placed = Vec::with_capacity(group_rankings.len());

    for ranked in group_rankings {
        advancing.extend(ranked.iter().take(DIRECT_QUALIFIERS).copied());
        if let Some(&third) = ranked.get(DIRECT_QUALIFIERS) {
            third_placed.push(third);
        }
    }

    let best_thirds = rank_teams(roster, &third_placed);
    advancing.extend(best_thirds.into_iter().take(THIRD_PLACE_QUALIFIERS));
    advancing
}

/// Single-elimination bracket over eight entrants.
#[derive(Clone, Debug)]
pub struct Bracket {
    stage: BracketStage,
    entrants: Vec<TeamId>,
    semifinalists: Vec<TeamId>,
    finalists: Vec<TeamId>,
    third_place: Vec<TeamId>,
    podium: Option<Podium>,
}

impl Bracket {
    /// Seed the bracket in advancement order.
    ///
    /// Seeding is positional: entrants 0-1 meet in the first quarterfinal,
    /// 2-3 in the second, and so on. Anything other than exactly eight
    /// entrants is a configuration error.
    pub fn seed(entrants: Vec<TeamId>) -> Result<Self> {
        if entrants.len() != BRACKET_SIZE {
            return Err(TournamentError::BracketEntrants {
                expected: BRACKET_SIZE,
                found: entrants.len(),
            });
        }

        Ok(Bracket {
            stage: BracketStage::Seeded,
            entrants,
            semifinalists: Vec::new(),
            finalists: Vec::new(),
            third_place: Vec::new(),
            podium: None,
        })
    }

    pub fn stage(&self) -> BracketStage {
        self.stage
    }

    pub fn entrants(&self) -> &[TeamId] {
        &self.entrants
    }

    pub fn semifinalists(&self) -> &[TeamId] {
        &self.semifinalists
    }

    pub fn finalists(&self) -> &[TeamId] {
        &self.finalists
    }

    pub fn podium(&self) -> Option<Podium> {
        self.podium
    }

    pub fn quarterfinal_pairings(&self) -> Vec<(TeamId, TeamId)> {
        pair_up(&self.entrants)
    }

    /// Play the next round and move to the following stage.
    pub fn advance<R: Rng>(
        &mut self,
        roster: &mut Roster,
        forfeit_prob: f64,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<BracketStage> {
        match self.stage {
            BracketStage::Seeded => {
                let pairings = self.quarterfinal_pairings();
                let (winners, _) =
                    play_round(roster, &pairings, Stage::Quarterfinal, forfeit_prob, rng, sink);
                self.semifinalists = winners;
                self.stage = BracketStage::Quarterfinals;
            }
            BracketStage::Quarterfinals => {
                let pairings = pair_up(&self.semifinalists);
                let (winners, losers) =
                    play_round(roster, &pairings, Stage::Semifinal, forfeit_prob, rng, sink);
                self.finalists = winners;
                self.third_place = losers;
                self.stage = BracketStage::Semifinals;
            }
            BracketStage::Semifinals => {
                let (gold, silver) = play_round(
                    roster,
                    &pair_up(&self.finalists),
                    Stage::Final,
                    forfeit_prob,
                    rng,
                    sink,
                );
                let (bronze, _) = play_round(
                    roster,
                    &pair_up(&self.third_place),
                    Stage::ThirdPlace,
                    forfeit_prob,
                    rng,
                    sink,
                );

                let podium = Podium {
                    gold: gold[0],
                    silver: silver[0],
                    bronze: bronze[0],
                };
                let medals = podium.medal_result(roster);
                tracing::info!(gold = %medals.gold, silver = %medals.silver, bronze = %medals.bronze, "medals awarded");
                sink.emit(TournamentEvent::Medals(medals));

                self.podium = Some(podium);
                self.stage = BracketStage::Medals;
            }
            BracketStage::Medals => return Err(TournamentError::BracketComplete),
        }

        Ok(self.stage)
    }

    /// Play every remaining round.
    pub fn run<R: Rng>(
        &mut self,
        roster: &mut Roster,
        forfeit_prob: f64,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<Podium> {
        loop {
            if let Some(podium) = self.podium {
                return Ok(podium);
            }
            self.advance(roster, forfeit_prob, rng, sink)?;
        }
    }
}

/// Consecutive pairs: (0,1), (2,3), ...
fn pair_up(teams: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    teams.chunks_exact(2).map(|pair| (pair[0], pair[1])).collect()
}

/// Play one knockout round. Returns winners and losers in pairing order.
fn play_round<R: Rng>(
    roster: &mut Roster,
    pairings: &[(TeamId, TeamId)],
    stage: Stage,
    forfeit_prob: f64,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> (Vec<TeamId>, Vec<TeamId>) {
    tracing::info!(%stage, matches = pairings.len(), "knockout round");
    sink.emit(TournamentEvent::StageStarted {
        stage: stage.clone(),
    });

    let mut winners = Vec::with_capacity(pairings.len());
    let mut losers = Vec::with_capacity(pairings.len());

    for &(a, b) in pairings {
        let event = roster.play(a, b, &stage, forfeit_prob, rng);
        let (winner, loser) = match event.result {
            MatchResult::Winner => (a, b),
            MatchResult::Loser => (b, a),
        };
        winners.push(winner);
        losers.push(loser);
        sink.emit(TournamentEvent::Match(event));
    }

    (winners, losers)
}
