//! Feature vector fed to the win model.
//!
//! The field set and units are fixed by the trained model: three categorical
//! columns plus six numeric ones, named exactly as in the training data.
//!
//! `balls_left` is computed from `overs` as if it were a decimal number of
//! overs, so `10.3` means 61 balls bowled rather than 63. The model was
//! trained on that convention, so it is kept as-is.

use serde::{Deserialize, Serialize};

use super::match_state::{City, MatchState, Team, BALLS_PER_OVER, INNINGS_BALLS, TOTAL_WICKETS};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    pub runs_left: u32,
    pub balls_left: u32,
    pub wickets_left: u32,
    pub target_runs: u32,
    /// Current run rate (runs per over)
    pub crr: f64,
    /// Required run rate (runs per over)
    pub rrr: f64,
}

/// Derive model features from a state that already passed validation.
///
/// Total for any in-range state: zero overs gives `crr = 0` and a finished
/// innings (`balls_left = 0`) gives `rrr = 0` instead of dividing by zero.
pub fn derive(state: &MatchState) -> FeatureVector {
    let runs_left = state.target.saturating_sub(state.score);
    let balls_bowled = (state.overs * BALLS_PER_OVER as f64).floor() as u32;
    let balls_left = INNINGS_BALLS.saturating_sub(balls_bowled);
    let wickets_left = TOTAL_WICKETS.saturating_sub(state.wickets);

    let crr = if state.overs > 0.0 {
        state.score as f64 / state.overs
    } else {
        0.0
    };
    let rrr = if balls_left > 0 {
        (runs_left * BALLS_PER_OVER) as f64 / balls_left as f64
    } else {
        0.0
    };

    FeatureVector {
        batting_team: state.batting_team,
        bowling_team: state.bowling_team,
        city: state.city,
        runs_left,
        balls_left,
        wickets_left,
        target_runs: state.target,
        crr,
        rrr,
    }
}
