use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::constants::MAX_RANKING;
use crate::error::{Result, TournamentError};
use crate::events::{MatchEvent, Stage};
use crate::exhibition::{parse_history, ExhibitionEntry, ExhibitionPolicy};
use crate::team::Team;

/// Stable handle to a team in a [`Roster`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TeamId(usize);

impl TeamId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Team record as it appears in the groups input.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct TeamEntry {
    #[serde(rename = "Team")]
    pub name: String,

    #[serde(rename = "ISOCode")]
    pub iso_code: String,

    #[serde(rename = "FIBARanking")]
    pub fiba_ranking: u32,
}

/// Group label -> teams.
///
/// Groups are played in lexical label order, not in document order: "Group 10"
/// comes before "Group 9". Single-letter labels are unaffected.
pub type GroupsInput = BTreeMap<String, Vec<TeamEntry>>;

/// ISO code -> exhibition history.
pub type ExhibitionsInput = HashMap<String, Vec<ExhibitionEntry>>;

/// Arena owning every team of a run.
///
/// Groups and bracket matches refer to teams by [`TeamId`], so each team has a
/// single mutable instance whose standing is visible to every stage.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Roster {
    teams: Vec<Team>,
}

impl Roster {
    pub fn new() -> Self {
        Roster { teams: Vec::new() }
    }

    /// Add a team.
    ///
    /// Results and logs name teams, so both the ISO code and the name must be
    /// unique. The ranking must lie in `1..=MAX_RANKING`.
    pub fn add(&mut self, team: Team) -> Result<TeamId> {
        if !(1..=MAX_RANKING).contains(&team.fiba_ranking) {
            return Err(TournamentError::InvalidRanking {
                team: team.name,
                ranking: team.fiba_ranking,
                max: MAX_RANKING,
            });
        }
        if self.find_by_code(&team.iso_code).is_some() {
            return Err(TournamentError::DuplicateTeam(team.iso_code));
        }
        if self.find_by_name(&team.name).is_some() {
            return Err(TournamentError::DuplicateName(team.name));
        }
        self.teams.push(team);
        Ok(TeamId(self.teams.len() - 1))
    }

    pub fn len(&self) -> usize {
        self.teams.len()
    }

    pub fn contains(&self, id: TeamId) -> bool {
        id.0 < self.teams.len()
    }

    /// Team for `id`. Ids are only handed out by this roster, so a miss is a bug.
    pub fn get(&self, id: TeamId) -> &Team {
        &self.teams[id.0]
    }

    pub fn get_mut(&mut self, id: TeamId) -> &mut Team {
        &mut self.teams[id.0]
    }

    pub fn name(&self, id: TeamId) -> &str {
        &self.teams[id.0].name
    }

    pub fn names(&self, ids: &[TeamId]) -> Vec<String> {
        ids.iter().map(|&id| self.name(id).to_string()).collect()
    }

    pub fn find_by_code(&self, iso_code: &str) -> Option<TeamId> {
        self.teams
            .iter()
            .position(|t| t.iso_code == iso_code)
            .map(TeamId)
    }

    pub fn find_by_name(&self, name: &str) -> Option<TeamId> {
        self.teams.iter().position(|t| t.name == name).map(TeamId)
    }

    pub fn ids(&self) -> impl Iterator<Item = TeamId> {
        (0..self.teams.len()).map(TeamId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TeamId, &Team)> {
        self.teams.iter().enumerate().map(|(i, t)| (TeamId(i), t))
    }

    /// Mutable access to two different teams at once.
    pub fn pair_mut(&mut self, a: TeamId, b: TeamId) -> (&mut Team, &mut Team) {
        assert_ne!(a, b, "a team cannot play itself");
        if a.0 < b.0 {
            let (left, right) = self.teams.split_at_mut(b.0);
            (&mut left[a.0], &mut right[0])
        } else {
            let (left, right) = self.teams.split_at_mut(a.0);
            (&mut right[0], &mut left[b.0])
        }
    }

    /// Play `a` against `b`, `a` being side A of the scoring model.
    pub fn play<R: Rng>(
        &mut self,
        a: TeamId,
        b: TeamId,
        stage: &Stage,
        forfeit_prob: f64,
        rng: &mut R,
    ) -> MatchEvent {
        let (team_a, team_b) = self.pair_mut(a, b);
        team_a.play_match(team_b, stage, forfeit_prob, rng)
    }

    /// Build the roster from the JSON inputs.
    ///
    /// Returns the roster and the team ids of each group, in label order.
    pub fn from_input(
        groups: &GroupsInput,
        exhibitions: &ExhibitionsInput,
        policy: ExhibitionPolicy,
    ) -> Result<(Roster, Vec<(String, Vec<TeamId>)>)> {
        let mut roster = Roster::new();
        let mut group_ids = Vec::with_capacity(groups.len());

        for (label, entries) in groups {
            let mut members = Vec::with_capacity(entries.len());
            for entry in entries {
                let history = match exhibitions.get(&entry.iso_code) {
                    Some(records) => parse_history(&entry.iso_code, records, policy)?,
                    None => Vec::new(),
                };
                let team = Team::new(entry.name.clone(), entry.iso_code.clone(), entry.fiba_ranking)
                    .with_exhibition_results(history);
                members.push(roster.add(team)?);
            }
            group_ids.push((label.clone(), members));
        }

        let known: HashSet<&str> = roster.teams.iter().map(|t| t.iso_code.as_str()).collect();
        for code in exhibitions.keys().filter(|c| !known.contains(c.as_str())) {
            tracing::debug!(code = %code, "exhibition history for a team outside the roster");
        }

        Ok((roster, group_ids))
    }
}
