// crates/rbcm-daemon/src/config.rs
//
// Runtime configuration for the RBCM daemon.
// Loaded from a TOML file or populated with sensible defaults.

use serde::Deserialize;
use std::fs;
use std::io;
use std::time::Duration;

use rbcm_core::RbcmError;
use rbcm_sim::OutcomeModel;

/// Runtime configuration for the daemon.
#[derive(Debug, Clone, Deserialize)]
pub struct DaemonConfig {
    /// Host address for the RPC server.
    #[serde(default = "default_rpc_host")]
    pub rpc_host: String,

    /// Port for the RPC server.
    #[serde(default = "default_rpc_port")]
    pub rpc_port: u16,

    /// Log level: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Number of ghost nodes seeded at startup.
    #[serde(default = "default_ghost_count")]
    pub ghost_count: usize,

    /// Simulation tick period in milliseconds.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Success probability for ghost feedback while rogue mode is off.
    #[serde(default = "default_normal_success_probability")]
    pub normal_success_probability: f64,

    /// Success probability for ghost feedback while rogue mode is on.
    #[serde(default = "default_rogue_success_probability")]
    pub rogue_success_probability: f64,

    /// Fixed RNG seed for reproducible simulations. Random when unset.
    #[serde(default)]
    pub simulation_seed: Option<u64>,
}

fn default_rpc_host() -> String {
    "127.0.0.1".to_string()
}

fn default_rpc_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_ghost_count() -> usize {
    20
}

fn default_tick_interval_ms() -> u64 {
    50
}

fn default_normal_success_probability() -> f64 {
    0.95
}

fn default_rogue_success_probability() -> f64 {
    0.20
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            rpc_host: default_rpc_host(),
            rpc_port: default_rpc_port(),
            log_level: default_log_level(),
            ghost_count: default_ghost_count(),
            tick_interval_ms: default_tick_interval_ms(),
            normal_success_probability: default_normal_success_probability(),
            rogue_success_probability: default_rogue_success_probability(),
            simulation_seed: None,
        }
    }
}

impl DaemonConfig {
    /// Load configuration if the file exists.
    ///
    /// Returns `Ok(None)` only when the file is missing. A file that exists
    /// but cannot be read or parsed is an error.
    pub fn load_if_present(path: &str) -> Result<Option<Self>, Box<dyn std::error::Error>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(Some(Self::parse(&contents)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse configuration from TOML text.
    pub fn parse(contents: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: DaemonConfig = toml::from_str(contents)?;
        Ok(config)
    }

    /// Validated outcome model built from the configured probabilities.
    pub fn outcome_model(&self) -> Result<OutcomeModel, RbcmError> {
        OutcomeModel::new(
            self.normal_success_probability,
            self.rogue_success_probability,
        )
    }

    /// Simulation tick period. A zero interval is rejected.
    pub fn tick_interval(&self) -> Result<Duration, RbcmError> {
        if self.tick_interval_ms == 0 {
            return Err(RbcmError::Validation(
                "tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_millis(self.tick_interval_ms))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let cfg = DaemonConfig::parse("").unwrap();
        assert_eq!(cfg.rpc_port, 5000);
        assert_eq!(cfg.ghost_count, 20);
        assert_eq!(cfg.tick_interval().unwrap(), Duration::from_millis(50));
        assert_eq!(cfg.outcome_model().unwrap(), OutcomeModel::default());
        assert!(cfg.simulation_seed.is_none());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let cfg = DaemonConfig::parse("ghost_count = 5\nsimulation_seed = 9\n").unwrap();
        assert_eq!(cfg.ghost_count, 5);
        assert_eq!(cfg.simulation_seed, Some(9));
        assert_eq!(cfg.rpc_host, "127.0.0.1");
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let cfg = DaemonConfig::parse("rogue_success_probability = 1.5\n").unwrap();
        assert!(cfg.outcome_model().is_err());
    }

    fn scratch_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("rbcm-config-{}-{}.toml", std::process::id(), name))
    }

    #[test]
    fn missing_file_is_not_an_error() {
        let path = scratch_path("missing");
        let _ = fs::remove_file(&path);
        let loaded = DaemonConfig::load_if_present(path.to_str().unwrap()).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn existing_file_is_loaded() {
        let path = scratch_path("valid");
        fs::write(&path, "rpc_port = 6001\n").unwrap();
        let loaded = DaemonConfig::load_if_present(path.to_str().unwrap()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().rpc_port, 6001);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_path("malformed");
        fs::write(&path, "rpc_port = \"not a port\"\nghost_count = [\n").unwrap();
        let loaded = DaemonConfig::load_if_present(path.to_str().unwrap());
        fs::remove_file(&path).unwrap();
        assert!(loaded.is_err());
    }

    #[test]
    fn zero_tick_interval_is_rejected() {
        let cfg = DaemonConfig::parse("tick_interval_ms = 0\n").unwrap();
        assert!(cfg.tick_interval().is_err());
    }
}
