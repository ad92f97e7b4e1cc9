use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::Serialize;

use crate::bracket::{select_advancing, Bracket};
use crate::constants::{group_label, FORFEIT_PROB, GROUP_COUNT, GROUP_SIZE};
use crate::error::{Result, TournamentError};
use crate::events::{EventSink, NullSink, StandingRow, TournamentEvent};
use crate::exhibition::ExhibitionPolicy;
use crate::group::{standing_rows, Group};
use crate::medals::{MedalResult, MedalTable};
use crate::roster::{ExhibitionsInput, GroupsInput, Roster, TeamId};
use crate::team::Team;

/// Final ranking of one group.
#[derive(Clone, Debug, Serialize)]
pub struct GroupRanking {
    pub group: String,
    pub standings: Vec<StandingRow>,
}

/// Outcome of one simulated tournament.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentResult {
    pub group_rankings: Vec<GroupRanking>,
    /// Bracket entrants in seeding order
    pub advancing: Vec<String>,
    pub medals: MedalResult,
    /// Every team's standing at the end of the run
    pub roster: Roster,
}

/// Tournament setup: the teams, the groups and the match rules.
///
/// The setup itself is never mutated; every simulation plays on its own copy
/// of the roster.
#[derive(Clone, Debug)]
pub struct Tournament {
    roster: Roster,
    groups: Vec<Group>,
    forfeit_prob: f64,
}

impl Tournament {
    /// Create a tournament from an existing roster and group split.
    ///
    /// Requires exactly 3 groups of 4 distinct roster teams.
    pub fn new(roster: Roster, groups: Vec<Group>) -> Result<Self> {
        if groups.len() != GROUP_COUNT {
            return Err(TournamentError::GroupCount {
                expected: GROUP_COUNT,
                found: groups.len(),
            });
        }

        let mut seen: Vec<TeamId> = Vec::with_capacity(GROUP_COUNT * GROUP_SIZE);
        for group in &groups {
            if group.members().len() != GROUP_SIZE {
                return Err(TournamentError::GroupSize {
                    group: group.label().to_string(),
                    expected: GROUP_SIZE,
                    found: group.members().len(),
                });
            }
            for &id in group.members() {
                if !roster.contains(id) {
                    return Err(TournamentError::UnknownTeam(id.index()));
                }
                if seen.contains(&id) {
                    return Err(TournamentError::DuplicateTeam(roster.get(id).iso_code.clone()));
                }
                seen.push(id);
            }
        }

        Ok(Tournament {
            roster,
            groups,
            forfeit_prob: FORFEIT_PROB,
        })
    }

    /// Split `teams` into consecutive groups of 4 labelled A, B, C.
    pub fn from_teams(teams: Vec<Team>) -> Result<Self> {
        let mut roster = Roster::new();
        let ids = teams
            .into_iter()
            .map(|team| roster.add(team))
            .collect::<Result<Vec<TeamId>>>()?;
        let groups = ids
            .chunks(GROUP_SIZE)
            .enumerate()
            .map(|(i, members)| Group::new(group_label(i), members.to_vec()))
            .collect();

        Tournament::new(roster, groups)
    }

    pub fn from_input(
        groups: &GroupsInput,
        exhibitions: &ExhibitionsInput,
        policy: ExhibitionPolicy,
    ) -> Result<Self> {
        let (roster, group_ids) = Roster::from_input(groups, exhibitions, policy)?;
        let groups = group_ids
            .into_iter()
            .map(|(label, members)| Group::new(label, members))
            .collect();
        Tournament::new(roster, groups)
    }

    /// Load from the JSON documents described in the crate docs.
    pub fn from_json(
        groups_json: &str,
        exhibitions_json: Option<&str>,
        policy: ExhibitionPolicy,
    ) -> Result<Self> {
        let groups: GroupsInput = serde_json::from_str(groups_json)?;
        let exhibitions: ExhibitionsInput = match exhibitions_json {
            Some(json) => serde_json::from_str(json)?,
            None => ExhibitionsInput::new(),
        };
        Tournament::from_input(&groups, &exhibitions, policy)
    }

    /// Override the per-side forfeit probability (default 0.1).
    pub fn with_forfeit_prob(mut self, forfeit_prob: f64) -> Result<Self> {
        if !(0.0..=1.0).contains(&forfeit_prob) {
            return Err(TournamentError::InvalidForfeitProb(forfeit_prob));
        }
        self.forfeit_prob = forfeit_prob;
        Ok(self)
    }

    pub fn forfeit_prob(&self) -> f64 {
        self.forfeit_prob
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Simulate the tournament once.
    ///
    /// With a seed the run is reproducible; without one the generator is
    /// seeded from entropy.
    pub fn simulate(&self, seed: Option<u64>, sink: &mut dyn EventSink) -> Result<TournamentResult> {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        self.simulate_with_rng(&mut rng, sink)
    }

    /// Simulate the tournament once with a caller-provided generator.
    pub fn simulate_with_rng<R: Rng>(
        &self,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<TournamentResult> {
        let mut roster = self.roster.clone();

        let mut rankings = Vec::with_capacity(self.groups.len());
        let mut group_rankings = Vec::with_capacity(self.groups.len());

        for group in &self.groups {
            group.simulate(&mut roster, self.forfeit_prob, rng, sink);

            let ranked = group.ranked_teams(&roster);
            let standings = standing_rows(&roster, &ranked);
            sink.emit(TournamentEvent::GroupStandings {
                group: group.label().to_string(),
                standings: standings.clone(),
            });

            group_rankings.push(GroupRanking {
                group: group.label().to_string(),
                standings,
            });
            rankings.push(ranked);
        }

        let advancing = select_advancing(&roster, &rankings);
        let mut bracket = Bracket::seed(advancing)?;
        let advancing = roster.names(bracket.entrants());
        tracing::info!(teams = ?advancing, "knockout stage seeded");
        sink.emit(TournamentEvent::Advancing {
            teams: advancing.clone(),
        });
        sink.emit(TournamentEvent::Seeded {
            quarterfinals: bracket
                .quarterfinal_pairings()
                .iter()
                .map(|&(a, b)| (roster.name(a).to_string(), roster.name(b).to_string()))
                .collect(),
        });

        let podium = bracket.run(&mut roster, self.forfeit_prob, rng, sink)?;
        let medals = podium.medal_result(&roster);

        Ok(TournamentResult {
            group_rankings,
            advancing,
            medals,
            roster,
        })
    }

    /// Run many independent simulations and count medals.
    ///
    /// Per-simulation seeds are drawn from a generator seeded with `seed`, so
    /// the table is reproducible even though simulations run in parallel.
    pub fn run_simulations(&self, n_simulations: usize, seed: Option<u64>) -> Result<MedalTable> {
        let mut rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_entropy(),
        };
        let seeds: Vec<u64> = (0..n_simulations).map(|_| rng.gen::<u64>()).collect();

        seeds
            .par_iter()
            .map(|&sim_seed| {
                self.simulate(Some(sim_seed), &mut NullSink)
                    .map(|result| result.medals)
            })
            .try_fold(MedalTable::new, |mut table, medals| -> Result<MedalTable> {
                table.record(&medals?);
                Ok(table)
            })
            .try_reduce(MedalTable::new, |a, b| Ok(a.merge(b)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::match_events;
    use std::collections::HashSet;

    fn make_teams() -> Vec<Team> {
        (1..=12)
            .map(|rank| {
                let code = format!("T{:02}", rank);
                Team::new(format!("Team {}", rank), code, rank)
            })
            .collect()
    }

    #[test]
    fn test_end_to_end_any_seed() {
        let tournament = Tournament::from_teams(make_teams()).unwrap();

        for seed in 0..30 {
            let result = tournament.simulate(Some(seed), &mut NullSink).unwrap();

            assert_eq!(result.group_rankings.len(), 3);
            for ranking in &result.group_rankings {
                assert_eq!(ranking.standings.len(), 4);
                let points: u32 = ranking.standings.iter().map(|r| r.points).sum();
                assert_eq!(points, 12);
            }

            assert_eq!(result.advancing.len(), 8);
            let unique: HashSet<&String> = result.advancing.iter().collect();
            assert_eq!(unique.len(), 8);

            let podium = [&result.medals.gold, &result.medals.silver, &result.medals.bronze];
            let distinct: HashSet<&&String> = podium.iter().collect();
            assert_eq!(distinct.len(), 3);
            assert!(podium.iter().all(|name| result.advancing.contains(*name)));
        }
    }

    #[test]
    fn test_event_log() {
        let tournament = Tournament::from_teams(make_teams()).unwrap();
        let mut log: Vec<TournamentEvent> = Vec::new();
        let result = tournament.simulate(Some(42), &mut log).unwrap();

        // 18 group matches, 4 + 2 + 1 + 1 knockout matches
        assert_eq!(match_events(&log).count(), 26);

        let standings = log
            .iter()
            .filter(|e| matches!(e, TournamentEvent::GroupStandings { .. }))
            .count();
        assert_eq!(standings, 3);

        assert!(matches!(log.first(), Some(TournamentEvent::GroupStarted { group }) if group == "A"));
        assert_eq!(log.last(), Some(&TournamentEvent::Medals(result.medals.clone())));

        let advancing = log.iter().find_map(|e| match e {
            TournamentEvent::Advancing { teams } => Some(teams.clone()),
            _ => None,
        });
        assert_eq!(advancing, Some(result.advancing.clone()));
    }

    #[test]
    fn test_same_seed_same_run() {
        let tournament = Tournament::from_teams(make_teams()).unwrap();
        let mut first: Vec<TournamentEvent> = Vec::new();
        let mut second: Vec<TournamentEvent> = Vec::new();

        tournament.simulate(Some(7), &mut first).unwrap();
        tournament.simulate(Some(7), &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_setup_is_not_mutated() {
        let tournament = Tournament::from_teams(make_teams()).unwrap();
        let result = tournament.simulate(Some(1), &mut NullSink).unwrap();

        assert!(tournament.roster().iter().all(|(_, t)| t.matches_played() == 0));
        // 3 group games each, plus knockout games for the entrants
        let played: u32 = result.roster.iter().map(|(_, t)| t.matches_played()).sum();
        assert_eq!(played, 2 * 26);
    }

    #[test]
    fn test_configuration_errors() {
        let mut teams = make_teams();
        teams.pop();
        assert!(Tournament::from_teams(teams).unwrap_err().is_configuration());

        let mut teams = make_teams();
        teams[5].iso_code = "T01".to_string();
        assert!(matches!(
            Tournament::from_teams(teams).unwrap_err(),
            TournamentError::DuplicateTeam(code) if code == "T01"
        ));

        let tournament = Tournament::from_teams(make_teams()).unwrap();
        assert!(tournament.clone().with_forfeit_prob(1.5).is_err());
        assert!(tournament.clone().with_forfeit_prob(-0.1).is_err());
        assert_eq!(tournament.with_forfeit_prob(0.0).unwrap().forfeit_prob(), 0.0);
    }

    #[test]
    fn test_group_count_error() {
        let mut roster = Roster::new();
        let ids: Vec<TeamId> = make_teams()
            .into_iter()
            .map(|t| roster.add(t).unwrap())
            .collect();
        let groups = vec![Group::new("A", ids[..4].to_vec()), Group::new("B", ids[4..8].to_vec())];

        let err = Tournament::new(roster.clone(), groups).unwrap_err();
        assert!(matches!(err, TournamentError::GroupCount { expected: 3, found: 2 }));

        let groups = vec![
            Group::new("A", ids[..4].to_vec()),
            Group::new("B", ids[4..8].to_vec()),
            Group::new("C", ids[7..11].to_vec()),
        ];
        assert!(Tournament::new(roster, groups).unwrap_err().is_configuration());
    }

    fn groups_json(first_team: &str) -> String {
        let mut entries: Vec<String> = (1..=12)
            .map(|rank| {
                format!(
                    r#"{{"Team": "Team {}", "ISOCode": "T{:02}", "FIBARanking": {}}}"#,
                    rank, rank, rank
                )
            })
            .collect();
        entries[0] = first_team.to_string();
        format!(
            r#"{{"A": [{}], "B": [{}], "C": [{}]}}"#,
            entries[0..4].join(","),
            entries[4..8].join(","),
            entries[8..12].join(",")
        )
    }

    #[test]
    fn test_extreme_ranking_rejected() {
        let json = groups_json(r#"{"Team": "Far Away", "ISOCode": "FAR", "FIBARanking": 4000000000}"#);
        let err = Tournament::from_json(&json, None, ExhibitionPolicy::Lenient).unwrap_err();
        assert!(matches!(
            err,
            TournamentError::InvalidRanking { ranking: 4000000000, .. }
        ));
        assert!(err.is_configuration());

        let json = groups_json(r#"{"Team": "Far Away", "ISOCode": "FAR", "FIBARanking": 1000}"#);
        let tournament = Tournament::from_json(&json, None, ExhibitionPolicy::Lenient)
            .unwrap()
            .with_forfeit_prob(0.0)
            .unwrap();
        let result = tournament.simulate(Some(1), &mut NullSink).unwrap();
        assert_eq!(result.advancing.len(), 8);
    }

    #[test]
    fn test_duplicate_team_name_rejected() {
        let json = groups_json(r#"{"Team": "Team 2", "ISOCode": "X01", "FIBARanking": 1}"#);
        let err = Tournament::from_json(&json, None, ExhibitionPolicy::Lenient).unwrap_err();
        assert!(matches!(err, TournamentError::DuplicateName(name) if name == "Team 2"));
    }

    #[test]
    fn test_run_simulations() {
        let tournament = Tournament::from_teams(make_teams()).unwrap();
        let table = tournament.run_simulations(40, Some(3)).unwrap();

        assert_eq!(table.simulations, 40);
        let golds: u32 = table.counts.values().map(|c| c.gold).sum();
        let medals: u32 = table.counts.values().map(|c| c.total()).sum();
        assert_eq!(golds, 40);
        assert_eq!(medals, 120);

        let again = tournament.run_simulations(40, Some(3)).unwrap();
        assert_eq!(table.counts, again.counts);

        let names: HashSet<&str> = tournament.roster().iter().map(|(_, t)| t.name.as_str()).collect();
        assert!(table.counts.keys().all(|name| names.contains(name.as_str())));

        let empty = tournament.run_simulations(0, Some(3)).unwrap();
        assert_eq!(empty.simulations, 0);
        assert!(empty.counts.is_empty());
    }
}
