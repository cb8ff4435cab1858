use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::predictor::match_state::{MAX_OVERS, MAX_TARGET, TOTAL_WICKETS};
use crate::predictor::{
    City, InputError, MatchInput, MatchState, PredictError, Prediction, Predictor, Team,
};

#[derive(Clone)]
pub struct AppState {
    pub predictor: Predictor,
}

/// Build the Axum router for the prediction form.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/options", get(options_handler))
        .route("/api/model", get(model_handler))
        .route("/api/predict", post(predict_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Error body returned by every failing API call.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub kind: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    fn new(status: StatusCode, kind: &'static str, message: String) -> Self {
        Self {
            status,
            body: ErrorBody { kind, message },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(serde_json::json!({ "error": self.body })),
        )
            .into_response()
    }
}

impl From<InputError> for ApiError {
    fn from(e: InputError) -> Self {
        ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, e.kind(), e.to_string())
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        let status = match e {
            PredictError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PredictError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        ApiError::new(status, e.kind(), e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::new(e.status(), "bad_request", e.body_text())
    }
}

/// Serve the form page.
async fn index_handler() -> Html<&'static str> {
    Html(FORM_HTML)
}

#[derive(Debug, Serialize)]
pub struct FormLimits {
    pub max_target: u32,
    pub max_overs: f64,
    pub max_wickets: u32,
}

#[derive(Debug, Serialize)]
pub struct FormOptions {
    pub teams: Vec<&'static str>,
    pub cities: Vec<&'static str>,
    pub limits: FormLimits,
}

/// GET /api/options
async fn options_handler() -> Json<FormOptions> {
    Json(FormOptions {
        teams: Team::sorted_names(),
        cities: City::sorted_names(),
        limits: FormLimits {
            max_target: MAX_TARGET,
            max_overs: MAX_OVERS,
            max_wickets: TOTAL_WICKETS,
        },
    })
}

/// GET /api/model
async fn model_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "name": state.predictor.model_name() }))
}

/// POST /api/predict
async fn predict_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<MatchInput>, JsonRejection>,
) -> Result<Json<Prediction>, ApiError> {
    let Json(input) = payload?;
    let match_state = MatchState::try_from(input)?;
    let prediction = state.predictor.predict(&match_state)?;
    Ok(Json(prediction))
}

/// Embedded single-file form (HTML + CSS + JS)
const FORM_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>IPL Win Predictor</title>
<style>
  :root {
    --bg: #f8f9fa;
    --card: #ffffff;
    --border: #dee2e6;
    --accent: #007bff;
    --accent-hover: #0056b3;
    --green: #28a745;
    --amber: #ffc107;
    --red: #dc3545;
    --text: #212529;
    --muted: #6c757d;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { padding: 1.2rem 2rem; border-bottom: 1px solid var(--border); background: var(--card); }
  header h1 { font-size: 1.6rem; }
  header p { color: var(--muted); margin-top: .3rem; }
  main { padding: 1.5rem 2rem; display: grid; grid-template-columns: 320px 1fr; gap: 1.5rem; }
  @media (max-width: 768px) { main { grid-template-columns: 1fr; } }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; padding: 1.2rem; }
  .panel h2 { font-size: 1.05rem; margin-bottom: 1rem; }
  label { display: block; font-size: .85rem; color: var(--muted); margin: .8rem 0 .3rem; }
  select, input { width: 100%; padding: .45rem .6rem; border: 1px solid var(--border); border-radius: 6px; font-size: .95rem; }
  .row { display: grid; grid-template-columns: 1fr 1fr; gap: 1rem; }
  button { margin-top: 1.2rem; background: var(--accent); color: #fff; border: none; border-radius: 10px; padding: 10px 20px; font-size: 1rem; cursor: pointer; }
  button:hover { background: var(--accent-hover); }
  .msg { margin-top: 1rem; padding: .8rem 1rem; border-radius: 8px; }
  .msg.error { background: rgba(220,53,69,.1); color: var(--red); }
  .msg.win { background: rgba(40,167,69,.1); color: var(--green); }
  .msg.loss { background: rgba(255,193,7,.15); color: #856404; }
  .bar { height: 10px; background: var(--border); border-radius: 5px; margin-top: .5rem; overflow: hidden; }
  .bar > div { height: 100%; background: var(--accent); }
  .hidden { display: none; }
  .muted { color: var(--muted); font-size: .8rem; margin-top: 1rem; }
</style>
</head>
<body>
<header>
  <h1>🏏 IPL Win Predictor</h1>
  <p>Predict the probability of an IPL team's victory based on the current match situation.</p>
</header>

<main>
  <div class="panel">
    <h2>Match Details</h2>
    <label for="batting">🏏 Batting team</label>
    <select id="batting"></select>
    <label for="bowling">🎯 Bowling team</label>
    <select id="bowling"></select>
    <label for="city">📍 Host city</label>
    <select id="city"></select>
    <label for="target">🎯 Target</label>
    <input id="target" type="number" min="1" step="1" value="1">
  </div>

  <div class="panel">
    <div class="row">
      <div>
        <label for="score">📊 Current score</label>
        <input id="score" type="number" min="0" step="1" value="0">
      </div>
      <div>
        <label for="overs">⏱️ Overs completed</label>
        <input id="overs" type="number" min="0" step="0.1" value="0.0">
      </div>
    </div>
    <label for="wickets">⚡ Wickets out: <span id="wickets-value">0</span></label>
    <input id="wickets" type="range" min="0" step="1" value="0">
    <button id="predict">🏁 Predict Probability</button>

    <div id="error" class="msg error hidden"></div>
    <div id="result" class="hidden">
      <h2 style="margin-top:1.2rem">🔮 Prediction Results</h2>
      <div class="msg win" id="win-text"></div>
      <div class="bar"><div id="win-bar"></div></div>
      <div class="msg loss" id="loss-text"></div>
      <div class="bar"><div id="loss-bar"></div></div>
    </div>
    <div class="muted" id="model-name"></div>
  </div>
</main>

<script>
const $ = id => document.getElementById(id);

function fill(select, names) {
  select.innerHTML = names.map(n => `<option>${n}</option>`).join('');
}

function showError(message) {
  $('result').classList.add('hidden');
  $('error').textContent = message;
  $('error').classList.remove('hidden');
}

async function loadOptions() {
  const r = await fetch('/api/options');
  if (!r.ok) return;
  const o = await r.json();
  fill($('batting'), o.teams);
  fill($('bowling'), o.teams);
  fill($('city'), o.cities);
  $('target').max = o.limits.max_target;
  $('overs').max = o.limits.max_overs;
  $('wickets').max = o.limits.max_wickets;
  const m = await fetch('/api/model');
  if (m.ok) $('model-name').textContent = 'Model: ' + (await m.json()).name;
}

$('target').addEventListener('input', () => { $('score').max = $('target').value; });
$('wickets').addEventListener('input', () => { $('wickets-value').textContent = $('wickets').value; });

$('predict').addEventListener('click', async () => {
  const body = {
    batting_team: $('batting').value,
    bowling_team: $('bowling').value,
    city: $('city').value,
    target: parseInt($('target').value, 10) || 0,
    score: parseInt($('score').value, 10) || 0,
    overs: parseFloat($('overs').value) || 0,
    wickets: parseInt($('wickets').value, 10) || 0,
  };
  const r = await fetch('/api/predict', {
    method: 'POST',
    headers: { 'Content-Type': 'application/json' },
    body: JSON.stringify(body),
  });
  const data = await r.json().catch(() => null);
  if (!r.ok) {
    showError(data && data.error ? data.error.message : 'Request failed (' + r.status + ')');
    return;
  }
  $('error').classList.add('hidden');
  $('win-text').innerHTML = `<b>${data.batting_team} Win Probability:</b> ${data.win_percent}%`;
  $('loss-text').innerHTML = `<b>${data.bowling_team} Win Probability:</b> ${data.loss_percent}%`;
  $('win-bar').style.width = data.win_bar + '%';
  $('loss-bar').style.width = data.loss_bar + '%';
  $('result').classList.remove('hidden');
});

loadOptions();
</script>
</body>
</html>"#;
