//! Python bindings (`python` feature).
//!
//! Inputs are the same JSON documents the `simulate` binary reads; results
//! come back as JSON strings or plain Python containers.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::constants::{BRACKET_SIZE, FORFEIT_PROB, GROUP_COUNT, GROUP_SIZE};
use crate::error::TournamentError;
use crate::events::TournamentEvent;
use crate::exhibition::ExhibitionPolicy;
use crate::scoring::{factor_from_ratings, win_prob_from_factor};
use crate::tournament::{Tournament, TournamentResult};

impl From<TournamentError> for PyErr {
    fn from(err: TournamentError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[derive(Serialize)]
struct Report<'a> {
    result: &'a TournamentResult,
    events: &'a [TournamentEvent],
}

fn load(
    groups_json: &str,
    exhibitions_json: Option<&str>,
    forfeit_prob: f64,
    strict: bool,
) -> PyResult<Tournament> {
    let policy = if strict {
        ExhibitionPolicy::Strict
    } else {
        ExhibitionPolicy::Lenient
    };
    let tournament = Tournament::from_json(groups_json, exhibitions_json, policy)?
        .with_forfeit_prob(forfeit_prob)?;
    Ok(tournament)
}

/// Simulate one tournament.
///
/// Returns a JSON document with the result and the full event log.
#[pyfunction]
#[pyo3(signature = (groups_json, exhibitions_json = None, seed = None, forfeit_prob = FORFEIT_PROB, strict = false))]
fn simulate_tournament(
    groups_json: &str,
    exhibitions_json: Option<&str>,
    seed: Option<u64>,
    forfeit_prob: f64,
    strict: bool,
) -> PyResult<String> {
    let tournament = load(groups_json, exhibitions_json, forfeit_prob, strict)?;
    let mut events: Vec<TournamentEvent> = Vec::new();
    let result = tournament.simulate(seed, &mut events)?;

    serde_json::to_string(&Report {
        result: &result,
        events: &events,
    })
    .map_err(|e| PyValueError::new_err(format!("Failed to serialize result: {}", e)))
}

/// Medal probabilities over many simulations.
///
/// Returns a map of team names to (gold, silver, bronze) probabilities.
#[pyfunction]
#[pyo3(signature = (groups_json, n_simulations, exhibitions_json = None, seed = None, forfeit_prob = FORFEIT_PROB))]
fn medal_odds(
    groups_json: &str,
    n_simulations: usize,
    exhibitions_json: Option<&str>,
    seed: Option<u64>,
    forfeit_prob: f64,
) -> PyResult<HashMap<String, (f64, f64, f64)>> {
    let tournament = load(groups_json, exhibitions_json, forfeit_prob, false)?;
    let table = tournament.run_simulations(n_simulations, seed)?;

    Ok(table
        .counts
        .keys()
        .map(|team| (team.clone(), table.probabilities(team)))
        .collect())
}

/// Probability of side A winning, from rankings and form factors.
#[pyfunction]
#[pyo3(signature = (ranking_a, ranking_b, form_a = 0.0, form_b = 0.0, forfeit_prob = FORFEIT_PROB))]
fn win_probability(ranking_a: u32, ranking_b: u32, form_a: f64, form_b: f64, forfeit_prob: f64) -> f64 {
    win_prob_from_factor(factor_from_ratings(ranking_a, ranking_b, form_a, form_b), forfeit_prob)
}

/// Python module definition
#[pymodule]
fn hoops_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(simulate_tournament, m)?)?;
    m.add_function(wrap_pyfunction!(medal_odds, m)?)?;
    m.add_function(wrap_pyfunction!(win_probability, m)?)?;

    m.add("FORFEIT_PROB", FORFEIT_PROB)?;
    m.add("GROUP_COUNT", GROUP_COUNT)?;
    m.add("GROUP_SIZE", GROUP_SIZE)?;
    m.add("BRACKET_SIZE", BRACKET_SIZE)?;

    Ok(())
}
