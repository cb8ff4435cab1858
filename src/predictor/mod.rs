pub mod features;
pub mod match_state;
pub mod model;
pub mod validation;

pub use features::{derive, FeatureVector};
pub use match_state::{City, InputError, MatchInput, MatchState, Team};
pub use model::{InferenceError, LogisticModel, WinLoss, WinModel};
pub use validation::{validate, ValidationError};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// A request that could not produce a prediction. Never fatal to the process.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("An error occurred during prediction: {0}")]
    Inference(#[from] InferenceError),
}

impl PredictError {
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::Validation(e) => e.kind(),
            PredictError::Inference(_) => "inference_failure",
        }
    }
}

/// Result shown to the user for one match state.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub batting_team: Team,
    pub bowling_team: Team,
    pub win_probability: f64,
    pub loss_probability: f64,
    /// `win_probability` as a whole percentage
    pub win_percent: u32,
    /// `loss_probability` as a whole percentage, rounded on its own
    pub loss_percent: u32,
    /// Progress bar widths (truncated percentages)
    pub win_bar: u32,
    pub loss_bar: u32,
    pub features: FeatureVector,
    pub predicted_at: DateTime<Utc>,
}

impl Prediction {
    fn new(features: FeatureVector, probs: WinLoss, predicted_at: DateTime<Utc>) -> Self {
        Self {
            batting_team: features.batting_team,
            bowling_team: features.bowling_team,
            win_probability: probs.win,
            loss_probability: probs.loss,
            win_percent: display_percent(probs.win),
            loss_percent: display_percent(probs.loss),
            win_bar: bar_width(probs.win),
            loss_bar: bar_width(probs.loss),
            features,
            predicted_at,
        }
    }
}

/// Whole percentage, ties to even. Each side is rounded on its own so the
/// pair may not add up to exactly 100.
fn display_percent(p: f64) -> u32 {
    (p * 100.0).round_ties_even().clamp(0.0, 100.0) as u32
}

fn bar_width(p: f64) -> u32 {
    (p * 100.0).trunc().clamp(0.0, 100.0) as u32
}

/// Validate → derive → infer pipeline around a shared, read-only model.
#[derive(Clone)]
pub struct Predictor {
    model: Arc<dyn WinModel>,
}

impl Predictor {
    pub fn new(model: Arc<dyn WinModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    pub fn predict(&self, state: &MatchState) -> Result<Prediction, PredictError> {
        if let Err(e) = validate(state) {
            debug!(
                "Rejected {} vs {}: {}",
                state.batting_team, state.bowling_team, e
            );
            return Err(e.into());
        }

        let features = derive(state);
        let probs = self
            .model
            .predict_probabilities(&features)
            .and_then(check_probabilities)
            .map_err(|e| {
                warn!("Inference failed on model '{}': {}", self.model.name(), e);
                e
            })?;

        let prediction = Prediction::new(features, probs, Utc::now());
        info!(
            "{} need {} off {} balls ({} wickets left) vs {}: win {}%",
            prediction.batting_team,
            prediction.features.runs_left,
            prediction.features.balls_left,
            prediction.features.wickets_left,
            prediction.bowling_team,
            prediction.win_percent
        );
        Ok(prediction)
    }
}

fn check_probabilities(probs: WinLoss) -> Result<WinLoss, InferenceError> {
    let valid = |p: f64| p.is_finite() && (0.0..=1.0).contains(&p);
    if valid(probs.win) && valid(probs.loss) {
        Ok(probs)
    } else {
        Err(InferenceError(format!(
            "model returned invalid probabilities (loss={}, win={})",
            probs.loss, probs.win
        )))
    }
}
