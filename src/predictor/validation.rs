//! Cricket-level checks that must pass before any feature is derived.

use thiserror::Error;

use super::match_state::{MatchState, TOTAL_WICKETS};

/// Why a match state cannot be scored. Messages are shown to the user as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Batting and bowling teams cannot be the same.")]
    SameTeam,

    #[error("Overs completed cannot be zero when making predictions.")]
    ZeroOvers,

    #[error("Current score cannot exceed or equal the target. Match already won!")]
    MatchAlreadyDecided,

    #[error("All wickets are out; prediction not possible.")]
    AllOut,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::SameTeam => "same_team",
            ValidationError::ZeroOvers => "zero_overs",
            ValidationError::MatchAlreadyDecided => "match_already_decided",
            ValidationError::AllOut => "all_out",
        }
    }
}

/// Check a match state, stopping at the first failed rule.
///
/// Order matters: identical teams are reported before anything else, then
/// an innings that has not started, then a chase already completed, then a
/// side that is all out.
pub fn validate(state: &MatchState) -> Result<(), ValidationError> {
    if state.batting_team == state.bowling_team {
        return Err(ValidationError::SameTeam);
    }
    if state.overs == 0.0 {
        return Err(ValidationError::ZeroOvers);
    }
    if state.score >= state.target {
        return Err(ValidationError::MatchAlreadyDecided);
    }
    if state.wickets >= TOTAL_WICKETS {
        return Err(ValidationError::AllOut);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::match_state::{City, Team};

    fn state(
        batting: Team,
        bowling: Team,
        target: u32,
        score: u32,
        overs: f64,
        wickets: u32,
    ) -> MatchState {
        MatchState::new(batting, bowling, City::Chennai, target, score, overs, wickets).unwrap()
    }

    fn chase(target: u32, score: u32, overs: f64, wickets: u32) -> MatchState {
        state(
            Team::ChennaiSuperKings,
            Team::GujaratTitans,
            target,
            score,
            overs,
            wickets,
        )
    }

    #[test]
    fn accepts_live_chase() {
        assert_eq!(validate(&chase(180, 100, 10.0, 3)), Ok(()));
        assert_eq!(validate(&chase(150, 149, 15.0, 2)), Ok(()));
    }

    #[test]
    fn same_team_rejected_regardless_of_other_fields() {
        let team = Team::RajasthanRoyals;
        for (target, score, overs, wickets) in
            [(180, 100, 10.0, 3), (120, 120, 0.0, 10), (1, 0, 20.0, 0)]
        {
            let s = state(team, team, target, score, overs, wickets);
            assert_eq!(validate(&s), Err(ValidationError::SameTeam));
        }
    }

    #[test]
    fn zero_overs_rejected_when_otherwise_valid() {
        assert_eq!(
            validate(&chase(180, 0, 0.0, 0)),
            Err(ValidationError::ZeroOvers)
        );
    }

    #[test]
    fn zero_overs_checked_before_decided_match() {
        assert_eq!(
            validate(&chase(120, 120, 0.0, 10)),
            Err(ValidationError::ZeroOvers)
        );
    }

    #[test]
    fn score_equal_to_target_is_decided() {
        assert_eq!(
            validate(&chase(120, 120, 14.2, 4)),
            Err(ValidationError::MatchAlreadyDecided)
        );
    }

    #[test]
    fn decided_match_checked_before_all_out() {
        assert_eq!(
            validate(&chase(120, 120, 19.0, 10)),
            Err(ValidationError::MatchAlreadyDecided)
        );
    }

    #[test]
    fn all_out_rejected() {
        assert_eq!(
            validate(&chase(200, 150, 18.4, 10)),
            Err(ValidationError::AllOut)
        );
    }

    #[test]
    fn kinds_are_distinct() {
        let kinds = [
            ValidationError::SameTeam.kind(),
            ValidationError::ZeroOvers.kind(),
            ValidationError::MatchAlreadyDecided.kind(),
            ValidationError::AllOut.kind(),
        ];
        for (i, a) in kinds.iter().enumerate() {
            for b in &kinds[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
