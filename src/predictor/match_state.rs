//! Typed live match state for a second-innings chase.
//!
//! Raw form input arrives as strings and loosely-typed numbers. Converting it
//! into a [`MatchState`] enforces the same bounds the input widgets impose:
//! a known team/city, `1 ≤ target ≤ 500`, `0 ≤ score ≤ target`,
//! `0.0 ≤ overs ≤ 20.0` and `0 ≤ wickets ≤ 10`. Cricket-level rules (distinct
//! teams, no prediction before the first ball, ...) are checked later by
//! [`super::validation`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Highest target the form accepts.
pub const MAX_TARGET: u32 = 500;
/// Overs in a T20 innings.
pub const MAX_OVERS: f64 = 20.0;
pub const BALLS_PER_OVER: u32 = 6;
/// Legal deliveries in a full T20 innings.
pub const INNINGS_BALLS: u32 = 120;
/// Dismissals that end an innings.
pub const TOTAL_WICKETS: u32 = 10;

/// Declares a closed set of display names with lookup helpers.
macro_rules! named_set {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $label)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Exact (whitespace-trimmed) name match.
            pub fn lookup(name: &str) -> Option<Self> {
                let name = name.trim();
                Self::ALL.iter().copied().find(|v| v.as_str() == name)
            }

            /// Display names in alphabetical order, as shown in the form.
            pub fn sorted_names() -> Vec<&'static str> {
                let mut names: Vec<&'static str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                names.sort_unstable();
                names
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

named_set! {
    /// IPL franchise.
    Team {
        SunrisersHyderabad => "Sunrisers Hyderabad",
        RoyalChallengersBengaluru => "Royal Challengers Bengaluru",
        MumbaiIndians => "Mumbai Indians",
        PunjabKings => "Punjab Kings",
        RajasthanRoyals => "Rajasthan Royals",
        LucknowSuperGiants => "Lucknow Super Giants",
        KolkataKnightRiders => "Kolkata Knight Riders",
        GujaratTitans => "Gujarat Titans",
        ChennaiSuperKings => "Chennai Super Kings",
        DelhiCapitals => "Delhi Capitals",
    }
}

named_set! {
    /// Host city. Names follow the historical match records the model was
    /// trained on, so "Bangalore" and "Bengaluru" are separate venues.
    City {
        Bangalore => "Bangalore",
        Chandigarh => "Chandigarh",
        Delhi => "Delhi",
        Mumbai => "Mumbai",
        Kolkata => "Kolkata",
        Jaipur => "Jaipur",
        Hyderabad => "Hyderabad",
        Chennai => "Chennai",
        CapeTown => "Cape Town",
        PortElizabeth => "Port Elizabeth",
        Durban => "Durban",
        Centurion => "Centurion",
        EastLondon => "East London",
        Johannesburg => "Johannesburg",
        Kimberley => "Kimberley",
        Bloemfontein => "Bloemfontein",
        Ahmedabad => "Ahmedabad",
        Cuttack => "Cuttack",
        Nagpur => "Nagpur",
        Dharamsala => "Dharamsala",
        Visakhapatnam => "Visakhapatnam",
        Pune => "Pune",
        Raipur => "Raipur",
        Ranchi => "Ranchi",
        AbuDhabi => "Abu Dhabi",
        Rajkot => "Rajkot",
        Kanpur => "Kanpur",
        Bengaluru => "Bengaluru",
        Indore => "Indore",
        Dubai => "Dubai",
        Sharjah => "Sharjah",
        NaviMumbai => "Navi Mumbai",
        Lucknow => "Lucknow",
        Guwahati => "Guwahati",
        Mohali => "Mohali",
    }
}

impl FromStr for Team {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Team::lookup(s).ok_or_else(|| InputError::UnknownTeam(s.to_string()))
    }
}

impl FromStr for City {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        City::lookup(s).ok_or_else(|| InputError::UnknownCity(s.to_string()))
    }
}

/// Raw input that falls outside what the form can express.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Unknown team '{0}'")]
    UnknownTeam(String),

    #[error("Unknown city '{0}'")]
    UnknownCity(String),

    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl InputError {
    /// Stable machine-readable identifier for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            InputError::UnknownTeam(_) => "unknown_team",
            InputError::UnknownCity(_) => "unknown_city",
            InputError::OutOfRange { .. } => "out_of_range",
        }
    }
}

/// Form submission exactly as the client sent it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchInput {
    pub batting_team: String,
    pub bowling_team: String,
    pub city: String,
    pub target: i64,
    pub score: i64,
    /// Completed overs, e.g. `4.3`
    pub overs: f64,
    /// Batting-side dismissals so far
    pub wickets: i64,
}

/// Match situation for one prediction request. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchState {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub city: City,
    /// Runs the chasing side needs to win
    pub target: u32,
    /// Runs scored so far (0..=target)
    pub score: u32,
    /// Completed overs (0.0..=20.0)
    pub overs: f64,
    /// Wickets fallen (0..=10)
    pub wickets: u32,
}

impl MatchState {
    /// Build a state, enforcing the form's numeric bounds.
    pub fn new(
        batting_team: Team,
        bowling_team: Team,
        city: City,
        target: u32,
        score: u32,
        overs: f64,
        wickets: u32,
    ) -> Result<Self, InputError> {
        check_range("target", target as f64, 1.0, MAX_TARGET as f64)?;
        check_range("score", score as f64, 0.0, target as f64)?;
        check_range("overs", overs, 0.0, MAX_OVERS)?;
        check_range("wickets", wickets as f64, 0.0, TOTAL_WICKETS as f64)?;

        Ok(Self {
            batting_team,
            bowling_team,
            city,
            target,
            score,
            overs,
            wickets,
        })
    }
}

impl TryFrom<MatchInput> for MatchState {
    type Error = InputError;

    fn try_from(input: MatchInput) -> Result<Self, Self::Error> {
        let batting_team: Team = input.batting_team.parse()?;
        let bowling_team: Team = input.bowling_team.parse()?;
        let city: City = input.city.parse()?;

        let target = to_count("target", input.target, 1, MAX_TARGET)?;
        let score = to_count("score", input.score, 0, target)?;
        let wickets = to_count("wickets", input.wickets, 0, TOTAL_WICKETS)?;

        MatchState::new(
            batting_team,
            bowling_team,
            city,
            target,
            score,
            input.overs,
            wickets,
        )
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), InputError> {
    // NaN fails both comparisons, so it is rejected here too
    if value >= min && value <= max {
        Ok(())
    } else {
        Err(InputError::OutOfRange {
            field,
            min,
            max,
            value,
        })
    }
}

fn to_count(field: &'static str, value: i64, min: u32, max: u32) -> Result<u32, InputError> {
    if value < min as i64 || value > max as i64 {
        return Err(InputError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
            value: value as f64,
        });
    }
    Ok(value as u32)
}
