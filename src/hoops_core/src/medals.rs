use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Podium of one run, by team name.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MedalResult {
    pub gold: String,
    pub silver: String,
    pub bronze: String,
}

impl fmt::Display for MedalResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "1st place: {}", self.gold)?;
        writeln!(f, "2nd place: {}", self.silver)?;
        write!(f, "3rd place: {}", self.bronze)
    }
}

/// Medals won by one team over many runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MedalCount {
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

impl MedalCount {
    pub fn total(&self) -> u32 {
        self.gold + self.silver + self.bronze
    }
}

/// Medal counts over a batch of simulations.
#[derive(Clone, Debug, Default, Serialize)]
pub struct MedalTable {
    pub simulations: u32,
    pub counts: BTreeMap<String, MedalCount>,
}

impl MedalTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, medals: &MedalResult) {
        self.simulations += 1;
        self.counts.entry(medals.gold.clone()).or_default().gold += 1;
        self.counts.entry(medals.silver.clone()).or_default().silver += 1;
        self.counts.entry(medals.bronze.clone()).or_default().bronze += 1;
    }

    /// Combine two tables
    pub fn merge(mut self, other: MedalTable) -> MedalTable {
        self.simulations += other.simulations;
        for (team, count) in other.counts {
            let entry = self.counts.entry(team).or_default();
            entry.gold += count.gold;
            entry.silver += count.silver;
            entry.bronze += count.bronze;
        }
        self
    }

    pub fn count(&self, team: &str) -> MedalCount {
        self.counts.get(team).copied().unwrap_or_default()
    }

    /// Share of simulations in which `team` won gold, silver and bronze.
    pub fn probabilities(&self, team: &str) -> (f64, f64, f64) {
        if self.simulations == 0 {
            return (0.0, 0.0, 0.0);
        }
        let count = self.count(team);
        let n = self.simulations as f64;
        (
            count.gold as f64 / n,
            count.silver as f64 / n,
            count.bronze as f64 / n,
        )
    }

    /// Teams by gold count, then total medals, then name.
    pub fn ranked(&self) -> Vec<(&str, MedalCount)> {
        let mut rows: Vec<(&str, MedalCount)> =
            self.counts.iter().map(|(name, &count)| (name.as_str(), count)).collect();
        rows.sort_by(|a, b| {
            b.1.gold
                .cmp(&a.1.gold)
                .then_with(|| b.1.total().cmp(&a.1.total()))
                .then_with(|| a.0.cmp(b.0))
        });
        rows
    }
}
