//! Tournament simulator CLI
//!
//! Commands:
//! - run: simulate one tournament and print the match log
//! - odds: medal table over many simulations
//! - matchups: pre-tournament win probabilities inside each group

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use hoops_core::scoring::calculate_win_prob;
use hoops_core::{ExhibitionPolicy, Stage, Tournament, TournamentEvent, FORFEIT_PROB};

#[derive(Parser)]
#[command(name = "simulate")]
#[command(about = "Basketball group stage and knockout simulator")]
struct Cli {
    #[command(flatten)]
    input: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Groups and teams (JSON); defaults to the bundled sample data
    #[arg(long, global = true, default_value = concat!(env!("CARGO_MANIFEST_DIR"), "/data/groups.json"))]
    groups: PathBuf,

    /// Exhibition results by ISO code (JSON)
    #[arg(long, global = true)]
    exhibitions: Option<PathBuf>,

    /// Probability of each side forfeiting a match
    #[arg(long, global = true, default_value_t = FORFEIT_PROB)]
    forfeit_prob: f64,

    /// Fail on malformed exhibition results instead of skipping them
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one tournament
    Run {
        #[arg(long)]
        seed: Option<u64>,
        /// Print the result and event log as JSON
        #[arg(long)]
        json: bool,
    },
    /// Medal odds over many simulations
    Odds {
        #[arg(long, default_value = "10000")]
        simulations: usize,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Win probabilities for every group-stage matchup
    Matchups,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let tournament = load_tournament(&cli.input)?;

    match cli.command {
        Commands::Run { seed, json } => run(&tournament, seed, json),
        Commands::Odds { simulations, seed } => odds(&tournament, simulations, seed),
        Commands::Matchups => {
            matchups(&tournament);
            Ok(())
        }
    }
}

fn load_tournament(input: &InputArgs) -> Result<Tournament> {
    let groups_json = fs::read_to_string(&input.groups)
        .with_context(|| format!("Failed to read {}", input.groups.display()))?;
    let exhibitions_json = match &input.exhibitions {
        Some(path) => Some(
            fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?,
        ),
        None => None,
    };

    let policy = if input.strict {
        ExhibitionPolicy::Strict
    } else {
        ExhibitionPolicy::Lenient
    };

    let tournament = Tournament::from_json(&groups_json, exhibitions_json.as_deref(), policy)
        .context("Invalid tournament input")?
        .with_forfeit_prob(input.forfeit_prob)?;
    Ok(tournament)
}

fn run(tournament: &Tournament, seed: Option<u64>, json: bool) -> Result<()> {
    let mut events: Vec<TournamentEvent> = Vec::new();
    let result = tournament.simulate(seed, &mut events)?;

    if json {
        let report = serde_json::json!({ "result": result, "events": events });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for event in &events {
        print_event(event);
    }
    Ok(())
}

fn print_event(event: &TournamentEvent) {
    match event {
        TournamentEvent::GroupStarted { group } => {
            println!("Group {}:", group);
            println!("Group stage - Round 1:");
        }
        TournamentEvent::Match(m) => match m.stage {
            Stage::Group(_) => println!("    {}", m),
            _ => {
                println!("{} vs {}", m.team_a, m.team_b);
                println!("    {}", m);
            }
        },
        TournamentEvent::GroupStandings { group, standings } => {
            println!("Final ranking in group {}:", group);
            for row in standings {
                println!("    {}", row);
            }
        }
        TournamentEvent::Advancing { teams } => {
            println!("\nTeams advancing to the next round:");
            for team in teams {
                println!("    {}", team);
            }
        }
        TournamentEvent::Seeded { quarterfinals } => {
            println!("\nSeeds:");
            for (i, (a, b)) in quarterfinals.iter().enumerate() {
                println!("Seed {}:", char::from(b'D' + i as u8));
                println!("    {}", a);
                println!("    {}", b);
            }
        }
        TournamentEvent::StageStarted { stage } => println!("\n{}:", stage),
        TournamentEvent::Medals(medals) => println!("\nMedals:\n{}", medals),
    }
}

fn odds(tournament: &Tournament, simulations: usize, seed: Option<u64>) -> Result<()> {
    let table = tournament.run_simulations(simulations, seed)?;

    println!("{:<20} {:>7} {:>7} {:>7}", "Team", "Gold", "Silver", "Bronze");
    for (team, _) in table.ranked() {
        let (gold, silver, bronze) = table.probabilities(team);
        println!(
            "{:<20} {:>6.1}% {:>6.1}% {:>6.1}%",
            team,
            gold * 100.0,
            silver * 100.0,
            bronze * 100.0
        );
    }
    Ok(())
}

fn matchups(tournament: &Tournament) {
    let roster = tournament.roster();
    for group in tournament.groups() {
        println!("Group {}:", group.label());
        for (a, b) in group.pairings() {
            let (team_a, team_b) = (roster.get(a), roster.get(b));
            let prob = calculate_win_prob(team_a, team_b, tournament.forfeit_prob());
            println!("    {} vs {}: {:.1}%", team_a.name, team_b.name, prob * 100.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_groups_resolve_anywhere() {
        let cli = Cli::try_parse_from(["simulate", "matchups"]).unwrap();
        assert!(cli.input.groups.is_absolute());
        assert!(cli.input.groups.exists());
        assert!(cli.input.exhibitions.is_none());

        let tournament = load_tournament(&cli.input).unwrap();
        assert_eq!(tournament.groups().len(), 3);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["simulate", "odds", "--forfeit-prob", "0.2", "--simulations", "50"])
            .unwrap();
        assert_eq!(cli.input.forfeit_prob, 0.2);
        assert!(matches!(cli.command, Commands::Odds { simulations: 50, seed: None }));
    }
}
