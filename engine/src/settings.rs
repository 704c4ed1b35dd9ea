use std::{path::PathBuf, time::Duration};

use chrono::TimeDelta;
use config::{Config, ConfigBuilder, File, FileFormat, builder::DefaultState};
use darkship_core::{Position, VesselSlot};
use rand::{SeedableRng, rngs::StdRng};
use serde::Deserialize;
use snafu::{OptionExt, ResultExt, ensure};
use strum::{AsRefStr, EnumString};
use tracing_subscriber::EnvFilter;

use crate::{
    DriftSettings, Result, SequencerConfig,
    error::error::{ConfigSnafu, InvalidSettingsSnafu},
    telemetry::DEFAULT_MAX_SPEED_KNOTS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, EnumString, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Environment {
    Local,
    Test,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, AsRefStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub log_level: LogLevel,
    pub environment: Environment,
    pub simulation: SimulationSettings,
    pub detector: DetectorSettings,
    /// Where the trajectory plot is written after the run, skipped when absent.
    pub trajectory_output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DetectorSettings {
    /// JSON file of precomputed detections standing in for the model weights.
    pub annotations: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SimulationSettings {
    #[serde(default = "default_vessel_count")]
    pub vessel_count: usize,
    #[serde(with = "humantime_serde", default = "default_frame_interval")]
    pub frame_interval: Duration,
    #[serde(with = "humantime_serde", default = "default_scan_delay")]
    pub scan_delay: Duration,
    pub origin: Option<Position>,
    pub dark_ship_slot: Option<VesselSlot>,
    #[serde(default)]
    pub drift: DriftSettings,
    #[serde(default = "default_max_speed_knots")]
    pub max_speed_knots: f64,
    pub seed: Option<u64>,
}

impl Settings {
    /// Reads `config/<APP_ENVIRONMENT>.yaml` (defaults to `local`), overridden by `DARKSHIP__*`
    /// environment variables.
    pub fn new() -> Result<Self> {
        let raw = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| Environment::Local.as_ref().to_string());
        let Ok(environment) = raw.parse::<Environment>() else {
            return InvalidSettingsSnafu {
                reason: format!("unknown APP_ENVIRONMENT '{raw}'"),
            }
            .fail();
        };

        let builder = Config::builder()
            .add_source(
                File::with_name(&format!("config/{}", environment.as_ref())).required(true),
            )
            .add_source(config::Environment::with_prefix("DARKSHIP").separator("__"))
            .set_override("environment", environment.as_ref())
            .context(ConfigSnafu)?;

        Self::build(builder)
    }

    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Self::build(Config::builder().add_source(File::from_str(yaml, FileFormat::Yaml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self> {
        let settings: Settings = builder
            .build()
            .context(ConfigSnafu)?
            .try_deserialize()
            .context(ConfigSnafu)?;

        settings.simulation.validate()?;

        Ok(settings)
    }

    /// `RUST_LOG` takes precedence over the configured level.
    pub fn init_tracer(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.log_level.as_ref()));

        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

impl SimulationSettings {
    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.vessel_count > 0,
            InvalidSettingsSnafu {
                reason: "vessel_count must be at least 1",
            }
        );
        ensure!(
            self.drift.is_valid(),
            InvalidSettingsSnafu {
                reason: format!("invalid drift settings {:?}", self.drift),
            }
        );
        ensure!(
            self.max_speed_knots.is_finite() && self.max_speed_knots >= 0.0,
            InvalidSettingsSnafu {
                reason: format!("invalid max_speed_knots '{}'", self.max_speed_knots),
            }
        );
        if let Some(origin) = self.origin {
            ensure!(
                origin.is_valid(),
                InvalidSettingsSnafu {
                    reason: format!("origin {origin:?} is not a valid coordinate"),
                }
            );
        }

        Ok(())
    }

    pub fn sequencer_config(&self) -> Result<SequencerConfig> {
        let frame_interval = TimeDelta::from_std(self.frame_interval)
            .ok()
            .context(InvalidSettingsSnafu {
                reason: "frame_interval is out of range",
            })?;

        Ok(SequencerConfig {
            vessel_count: self.vessel_count,
            frame_interval,
            scan_delay: self.scan_delay,
            origin: self.origin,
            start_time: None,
            dark_ship_slot: self.dark_ship_slot,
            drift: self.drift,
            max_speed_knots: self.max_speed_knots,
        })
    }

    /// Seeded when `seed` is set so a run can be replayed.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        }
    }
}

fn default_vessel_count() -> usize {
    5
}

fn default_frame_interval() -> Duration {
    Duration::from_secs(2 * 60 * 60)
}

fn default_scan_delay() -> Duration {
    Duration::from_secs(5)
}

fn default_max_speed_knots() -> f64 {
    DEFAULT_MAX_SPEED_KNOTS
}
