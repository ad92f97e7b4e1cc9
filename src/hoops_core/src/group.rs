//! Group stage: round robin and tie-break ranking.

use rand::Rng;
use std::cmp::Ordering;

use crate::events::{EventSink, StandingRow, Stage, TournamentEvent};
use crate::roster::{Roster, TeamId};
use crate::team::Team;

/// A round-robin group.
#[derive(Clone, Debug)]
pub struct Group {
    label: String,
    members: Vec<TeamId>,
}

impl Group {
    pub fn new(label: impl Into<String>, members: Vec<TeamId>) -> Self {
        Group {
            label: label.into(),
            members,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn members(&self) -> &[TeamId] {
        &self.members
    }

    pub fn stage(&self) -> Stage {
        Stage::Group(self.label.clone())
    }

    /// Every unordered pair once: (0,1), (0,2), ..., (n-2,n-1).
    pub fn pairings(&self) -> Vec<(TeamId, TeamId)> {
        let n = self.members.len();
        let mut pairings = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for i in 0..n {
            for j in (i + 1)..n {
                pairings.push((self.members[i], self.members[j]));
            }
        }
        pairings
    }

    /// Play the round robin. Returns the number of matches played.
    pub fn simulate<R: Rng>(
        &self,
        roster: &mut Roster,
        forfeit_prob: f64,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> usize {
        let stage = self.stage();
        sink.emit(TournamentEvent::GroupStarted {
            group: self.label.clone(),
        });

        let pairings = self.pairings();
        for &(a, b) in &pairings {
            let event = roster.play(a, b, &stage, forfeit_prob, rng);
            sink.emit(TournamentEvent::Match(event));
        }

        tracing::info!(group = %self.label, matches = pairings.len(), "group stage complete");
        pairings.len()
    }

    /// Members ordered by the standing tie-break rules.
    pub fn ranked_teams(&self, roster: &Roster) -> Vec<TeamId> {
        rank_teams(roster, &self.members)
    }

    pub fn standings(&self, roster: &Roster) -> Vec<StandingRow> {
        standing_rows(roster, &self.ranked_teams(roster))
    }
}

/// Standing order: points, then point differential, then points scored, all
/// descending.
pub fn compare_standing(a: &Team, b: &Team) -> Ordering {
    b.points
        .cmp(&a.points)
        .then_with(|| b.differential().cmp(&a.differential()))
        .then_with(|| b.score_for.cmp(&a.score_for))
}

/// Rank `ids` by [`compare_standing`]. Teams level on all three keys keep
/// their order in `ids`.
pub fn rank_teams(roster: &Roster, ids: &[TeamId]) -> Vec<TeamId> {
    let mut indexed: Vec<(usize, TeamId)> = ids.iter().copied().enumerate().collect();
    indexed.sort_by(|&(ia, a), &(ib, b)| {
        compare_standing(roster.get(a), roster.get(b)).then(ia.cmp(&ib))
    });
    indexed.into_iter().map(|(_, id)| id).collect()
}

/// Standing rows for already ranked teams, rank starting at 1.
pub fn standing_rows(roster: &Roster, ranked: &[TeamId]) -> Vec<StandingRow> {
    ranked
        .iter()
        .enumerate()
        .map(|(i, &id)| StandingRow::from_team(i + 1, roster.get(id)))
        .collect()
}
