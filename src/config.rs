use clap::Parser;
use std::net::SocketAddr;

/// IPL second-innings win probability predictor
#[derive(Parser, Debug, Clone)]
#[command(name = "ipl-win-predictor", version, about)]
pub struct Config {
    /// Path to the serialized win model artifact (JSON)
    #[arg(long, env = "MODEL_PATH", default_value = "models/win_model.json")]
    pub model_path: String,

    /// Prediction form listen address
    #[arg(long, env = "DASHBOARD_ADDR", default_value = "0.0.0.0:8080")]
    pub dashboard_addr: String,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_path.trim().is_empty() {
            anyhow::bail!("model_path must not be empty");
        }
        if self.dashboard_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!(
                "dashboard_addr '{}' is not a valid socket address",
                self.dashboard_addr
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::parse_from(["ipl-win-predictor"]);
        assert_eq!(config.model_path, "models/win_model.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_address() {
        let config = Config::parse_from([
            "ipl-win-predictor",
            "--dashboard-addr",
            "not-an-address",
        ]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_blank_model_path() {
        let config = Config::parse_from(["ipl-win-predictor", "--model-path", "  "]);
        assert!(config.validate().is_err());
    }
}
