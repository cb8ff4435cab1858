//! Win model boundary and the shipped artifact-backed implementation.
//!
//! The predictor only depends on [`WinModel`]. [`LogisticModel`] evaluates a
//! one-hot + logistic-regression pipeline exported to JSON: every categorical
//! column has a weight per known value (values missing from the map are the
//! dropped reference level and contribute nothing), and each numeric feature
//! has a single coefficient.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::features::FeatureVector;
use super::match_state::{City, Team};

/// Class probabilities for the batting side, in model output order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WinLoss {
    pub loss: f64,
    pub win: f64,
}

/// Loading the model artifact failed. Always fatal at start-up.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Model file not found at '{}'. Please ensure the artifact is in the correct directory.", .path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("Failed to read model file '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Model file '{}' is malformed: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The model could not score a feature vector.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

/// Trait every win-probability model must implement.
pub trait WinModel: Send + Sync {
    /// Probability that the batting side loses / wins from this position.
    fn predict_probabilities(&self, features: &FeatureVector) -> Result<WinLoss, InferenceError>;

    /// Human-readable name for logging.
    fn name(&self) -> &str;
}

/// Coefficients for the numeric columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericWeights {
    pub runs_left: f64,
    pub balls_left: f64,
    pub wickets_left: f64,
    pub target_runs: f64,
    pub crr: f64,
    pub rrr: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticModel {
    pub name: String,
    pub intercept: f64,
    #[serde(default)]
    pub batting_team: HashMap<Team, f64>,
    #[serde(default)]
    pub bowling_team: HashMap<Team, f64>,
    #[serde(default)]
    pub city: HashMap<City, f64>,
    pub numeric: NumericWeights,
}

impl LogisticModel {
    /// Load the artifact from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ModelError::ArtifactMissing {
                    path: path.to_path_buf(),
                }
            } else {
                ModelError::Io {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        serde_json::from_str(&raw).map_err(|source| ModelError::Malformed {
            path: path.to_path_buf(),
            source,
        })
    }

    fn logit(&self, f: &FeatureVector) -> f64 {
        let n = &self.numeric;
        let categorical = self.batting_team.get(&f.batting_team).copied().unwrap_or(0.0)
            + self.bowling_team.get(&f.bowling_team).copied().unwrap_or(0.0)
            + self.city.get(&f.city).copied().unwrap_or(0.0);
        let numeric = n.runs_left * f.runs_left as f64
            + n.balls_left * f.balls_left as f64
            + n.wickets_left * f.wickets_left as f64
            + n.target_runs * f.target_runs as f64
            + n.crr * f.crr
            + n.rrr * f.rrr;

        self.intercept + categorical + numeric
    }
}

impl WinModel for LogisticModel {
    fn predict_probabilities(&self, features: &FeatureVector) -> Result<WinLoss, InferenceError> {
        let z = self.logit(features);
        if !z.is_finite() {
            return Err(InferenceError(format!(
                "model '{}' produced a non-finite score ({})",
                self.name, z
            )));
        }
        let win = sigmoid(z);
        Ok(WinLoss {
            loss: 1.0 - win,
            win,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Numerically stable logistic function.
fn sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::features::derive;
    use crate::predictor::match_state::MatchState;
    use approx::assert_relative_eq;

    const SHIPPED: &str = include_str!("../../models/win_model.json");

    fn shipped() -> LogisticModel {
        serde_json::from_str(SHIPPED).expect("shipped artifact should parse")
    }

    fn features(target: u32, score: u32, overs: f64, wickets: u32) -> FeatureVector {
        let state = MatchState::new(
            Team::KolkataKnightRiders,
            Team::DelhiCapitals,
            City::Kolkata,
            target,
            score,
            overs,
            wickets,
        )
        .unwrap();
        derive(&state)
    }

    fn flat(intercept: f64) -> LogisticModel {
        LogisticModel {
            name: "flat".into(),
            intercept,
            batting_team: HashMap::new(),
            bowling_team: HashMap::new(),
            city: HashMap::new(),
            numeric: NumericWeights {
                runs_left: 0.0,
                balls_left: 0.0,
                wickets_left: 0.0,
                target_runs: 0.0,
                crr: 0.0,
                rrr: 0.0,
            },
        }
    }

    #[test]
    fn probabilities_sum_to_one() {
        let model = shipped();
        for (target, score, overs, wickets) in
            [(180, 100, 10.0, 3), (150, 149, 15.0, 2), (220, 40, 6.2, 5)]
        {
            let p = model
                .predict_probabilities(&features(target, score, overs, wickets))
                .unwrap();
            assert!((0.0..=1.0).contains(&p.win));
            assert!((0.0..=1.0).contains(&p.loss));
            assert_relative_eq!(p.win + p.loss, 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn shipped_model_orders_situations_sensibly() {
        let model = shipped();
        let cruising = model
            .predict_probabilities(&features(150, 149, 15.0, 2))
            .unwrap();
        let balanced = model
            .predict_probabilities(&features(180, 100, 10.0, 3))
            .unwrap();
        let desperate = model
            .predict_probabilities(&features(200, 100, 15.0, 8))
            .unwrap();

        assert!(cruising.win > 0.9, "1 off 30 should be >90%, got {:.3}", cruising.win);
        assert!(desperate.win < 0.1, "100 off 30 with 2 wickets should be <10%, got {:.3}", desperate.win);
        assert!(balanced.win > desperate.win && balanced.win < cruising.win);
    }

    #[test]
    fn unknown_category_is_reference_level() {
        let mut model = flat(0.0);
        model.city.insert(City::Mumbai, 2.0);
        // Kolkata is absent from the map, so only the intercept counts
        let p = model
            .predict_probabilities(&features(180, 100, 10.0, 3))
            .unwrap();
        assert_relative_eq!(p.win, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn categorical_weights_shift_probability() {
        let mut model = flat(0.0);
        model.batting_team.insert(Team::KolkataKnightRiders, 1.0);
        model.bowling_team.insert(Team::DelhiCapitals, -0.5);
        let p = model
            .predict_probabilities(&features(180, 100, 10.0, 3))
            .unwrap();
        assert_relative_eq!(p.win, sigmoid(0.5), epsilon = 1e-12);
    }

    #[test]
    fn non_finite_score_is_inference_error() {
        let model = flat(f64::NAN);
        let err = model
            .predict_probabilities(&features(180, 100, 10.0, 3))
            .unwrap_err();
        assert!(err.0.contains("non-finite"), "{}", err);
    }

    #[test]
    fn missing_artifact_is_reported() {
        let path = std::env::temp_dir().join("ipl-win-predictor-no-such-model.json");
        match LogisticModel::load(&path) {
            Err(ModelError::ArtifactMissing { path: p }) => assert_eq!(p, path),
            other => panic!("expected ArtifactMissing, got {:?}", other),
        }
    }

    #[test]
    fn malformed_artifact_is_reported() {
        let path = std::env::temp_dir().join(format!(
            "ipl-win-predictor-malformed-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"name": "broken", "intercept": "x"}"#).unwrap();
        let result = LogisticModel::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(ModelError::Malformed { .. })));
    }

    #[test]
    fn unknown_team_in_artifact_is_malformed() {
        let json = r#"{
            "name": "bad",
            "intercept": 0.0,
            "batting_team": {"Deccan Chargers": 0.1},
            "numeric": {"runs_left": 0, "balls_left": 0, "wickets_left": 0,
                        "target_runs": 0, "crr": 0, "rrr": 0}
        }"#;
        assert!(serde_json::from_str::<LogisticModel>(json).is_err());
    }

    #[test]
    fn sigmoid_properties() {
        assert_relative_eq!(sigmoid(0.0), 0.5, epsilon = 1e-12);
        assert!(sigmoid(40.0) > 0.999_999);
        assert!(sigmoid(-800.0) >= 0.0);
        assert_relative_eq!(sigmoid(1.3) + sigmoid(-1.3), 1.0, epsilon = 1e-12);
    }
}
