use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub chassis: ChassisConfig,
    pub speeds: SpeedConfig,
    pub sensors: SensorConfig,
    pub run: RunConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChassisConfig {
    pub counts_per_motor_rev: f64,
    pub gear_reduction: f64,
    pub wheel_diameter_inches: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeedConfig {
    pub drive: f64,
    pub turn: f64,
    pub arm: f64,
    pub approach: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensorConfig {
    pub white_threshold: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub settle_seconds: f64,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Try external file first
        if Path::new("config.toml").exists() {
            let config_content = fs::read_to_string("config.toml")?;
            let config: Config = toml::from_str(&config_content)?;
            log::info!("Loaded configuration from file");
            Ok(config)
        } else {
            // Fallback to embedded defaults
            let config_content = include_str!("../config.toml.example");
            let config: Config = toml::from_str(config_content)?;
            log::warn!("Using embedded default configuration");
            Ok(config)
        }
    }
}

// Helper functions for easy access
impl Config {
    /// Encoder ticks per inch of wheel travel.
    pub fn counts_per_inch(&self) -> f64 {
        self.chassis.counts_per_motor_rev * self.chassis.gear_reduction
            / (self.chassis.wheel_diameter_inches * std::f64::consts::PI)
    }

    pub fn params(&self) -> motion::Params {
        motion::Params {
            drive_speed: self.speeds.drive,
            turn_speed: self.speeds.turn,
            arm_speed: self.speeds.arm,
            approach_speed: self.speeds.approach,
            white_threshold: self.sensors.white_threshold,
            settle_seconds: self.run.settle_seconds,
        }
    }
}
