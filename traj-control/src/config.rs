use std::{path::PathBuf, time::Duration};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    connector::ConnectorConfig,
    error::{Error, Result},
    utils::duration_from_secs,
};

#[derive(Debug, Serialize, Deserialize, Clone, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TrajControlConfig {
    // TOML format has a restriction that if a table itself contains tables,
    // all keys with non-table values must be emitted first.
    // Therefore, these fields must be located at the start of the struct.
    #[serde(default = "default_action_server_name")]
    pub action_server_name: String,
    #[serde(default = "default_position_error_topic")]
    pub position_error_topic: String,
    #[serde(default = "default_torques_topic")]
    pub torques_topic: String,
    /// Maximum number of pending messages per telemetry topic.
    #[serde(default = "default_telemetry_queue_size")]
    pub telemetry_queue_size: usize,
    #[serde(default = "default_position_error_file")]
    pub position_error_file: PathBuf,
    #[serde(default = "default_torques_file")]
    pub torques_file: PathBuf,
    /// How long to wait for a valid clock before giving up.
    #[serde(default = "default_clock_timeout_sec")]
    pub clock_timeout_sec: f64,
    /// Delay between dispatch and the requested trajectory start.
    #[serde(default = "default_start_delay_sec")]
    pub start_delay_sec: f64,
    /// Frequency of the wait loop in Hz.
    #[serde(default = "default_spin_rate")]
    pub spin_rate: f64,

    #[serde(default)]
    pub connector: ConnectorConfig,
}

impl Default for TrajControlConfig {
    fn default() -> Self {
        Self {
            action_server_name: default_action_server_name(),
            position_error_topic: default_position_error_topic(),
            torques_topic: default_torques_topic(),
            telemetry_queue_size: default_telemetry_queue_size(),
            position_error_file: default_position_error_file(),
            torques_file: default_torques_file(),
            clock_timeout_sec: default_clock_timeout_sec(),
            start_delay_sec: default_start_delay_sec(),
            spin_rate: default_spin_rate(),
            connector: ConnectorConfig::default(),
        }
    }
}

impl TrajControlConfig {
    /// Fails with [`Error::InvalidDuration`] if any timing field cannot be
    /// represented as a [`Duration`].
    pub fn validate(&self) -> Result<()> {
        self.clock_timeout()?;
        self.start_delay()?;
        self.spin_period()?;
        self.connector.wait_timeout()?;
        Ok(())
    }

    pub fn clock_timeout(&self) -> Result<Duration> {
        duration_from_secs("clock_timeout_sec", self.clock_timeout_sec)
    }

    pub fn start_delay(&self) -> Result<Duration> {
        duration_from_secs("start_delay_sec", self.start_delay_sec)
    }

    /// Period of the wait loop. Zero (no sleeping) if `spin_rate` is not positive.
    pub fn spin_period(&self) -> Result<Duration> {
        if self.spin_rate > 0.0 {
            Duration::try_from_secs_f64(self.spin_rate.recip()).map_err(|_| {
                Error::InvalidDuration {
                    name: "spin_rate",
                    value: self.spin_rate,
                }
            })
        } else {
            Ok(Duration::ZERO)
        }
    }
}

fn default_action_server_name() -> String {
    "/arm_dynamic_controller/follow_joint_trajectory".to_owned()
}

fn default_position_error_topic() -> String {
    "/arm_dynamic_controller/position_error".to_owned()
}

fn default_torques_topic() -> String {
    "/arm_dynamic_controller/torques".to_owned()
}

const fn default_telemetry_queue_size() -> usize {
    1000
}

fn default_position_error_file() -> PathBuf {
    PathBuf::from("/tmp/error.data")
}

fn default_torques_file() -> PathBuf {
    PathBuf::from("/tmp/torques.data")
}

const fn default_clock_timeout_sec() -> f64 {
    10.0
}

const fn default_start_delay_sec() -> f64 {
    1.0
}

const fn default_spin_rate() -> f64 {
    100.0
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_default() {
        let config = TrajControlConfig::default();
        assert_eq!(
            config.action_server_name,
            "/arm_dynamic_controller/follow_joint_trajectory"
        );
        assert_eq!(
            config.position_error_topic,
            "/arm_dynamic_controller/position_error"
        );
        assert_eq!(config.torques_topic, "/arm_dynamic_controller/torques");
        assert_eq!(config.telemetry_queue_size, 1000);
        assert_eq!(config.position_error_file, PathBuf::from("/tmp/error.data"));
        assert_eq!(config.torques_file, PathBuf::from("/tmp/torques.data"));
        assert_approx_eq!(config.clock_timeout_sec, 10.0);
        assert_approx_eq!(config.start_delay_sec, 1.0);
        assert_eq!(config.connector.max_iterations, 3);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config: TrajControlConfig = toml::from_str("").unwrap();
        assert_eq!(config.telemetry_queue_size, 1000);
        assert_eq!(config.connector.max_iterations, 3);
        assert_approx_eq!(config.connector.wait_timeout_sec, 2.0);
    }

    #[test]
    fn test_partial_toml() {
        let s = r#"
torques_file = "/var/tmp/torques.data"
telemetry_queue_size = 10

[connector]
max_iterations = 5
"#;
        let config: TrajControlConfig = toml::from_str(s).unwrap();
        assert_eq!(config.torques_file, PathBuf::from("/var/tmp/torques.data"));
        assert_eq!(config.position_error_file, PathBuf::from("/tmp/error.data"));
        assert_eq!(config.telemetry_queue_size, 10);
        assert_eq!(config.connector.max_iterations, 5);
        assert_approx_eq!(config.connector.wait_timeout_sec, 2.0);
    }

    #[test]
    fn test_validate_default() {
        let config = TrajControlConfig::default();
        config.validate().unwrap();
        assert_eq!(config.clock_timeout().unwrap(), Duration::from_secs(10));
        assert_eq!(config.start_delay().unwrap(), Duration::from_secs(1));
        assert_eq!(config.spin_period().unwrap(), Duration::from_millis(10));
    }

    #[test]
    fn test_validate_rejects_unrepresentable_durations() {
        let cases = [
            ("clock_timeout_sec = 1e30", "clock_timeout_sec"),
            ("start_delay_sec = -1.0", "start_delay_sec"),
            ("spin_rate = 1e-300", "spin_rate"),
            ("[connector]\nwait_timeout_sec = inf", "wait_timeout_sec"),
            ("[connector]\nwait_timeout_sec = nan", "wait_timeout_sec"),
        ];
        for (s, field) in cases {
            let config: TrajControlConfig = toml::from_str(s).unwrap();
            let err = config.validate().unwrap_err();
            assert!(
                matches!(err, Error::InvalidDuration { name, .. } if name == field),
                "{s}: {err:?}"
            );
        }
    }

    #[test]
    fn test_non_positive_spin_rate_disables_sleep() {
        for spin_rate in [0.0, -5.0, f64::INFINITY] {
            let config = TrajControlConfig {
                spin_rate,
                ..Default::default()
            };
            assert_eq!(config.spin_period().unwrap(), Duration::ZERO);
        }
    }

    #[test]
    fn test_unknown_field() {
        assert!(toml::from_str::<TrajControlConfig>("waypoints = []").is_err());
    }

    #[test]
    fn test_ser_default() {
        let s = toml::to_string(&TrajControlConfig::default()).unwrap();
        let config: TrajControlConfig = toml::from_str(&s).unwrap();
        assert_eq!(config.action_server_name, default_action_server_name());
    }
}
