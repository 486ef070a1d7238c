use traj_control::{GoalState, TrajControlConfig};
use traj_control_apps::{report_exit_status, utils::load_config, Backend};

#[test]
fn verify_sample_config() {
    let config = load_config("config/sample_traj_control_config.toml").unwrap();
    let default = TrajControlConfig::default();
    assert_eq!(config.action_server_name, default.action_server_name);
    assert_eq!(config.position_error_file, default.position_error_file);
    assert_eq!(config.torques_file, default.torques_file);
    assert_eq!(config.telemetry_queue_size, default.telemetry_queue_size);
    assert_eq!(
        config.connector.max_iterations,
        default.connector.max_iterations
    );
    toml::to_string(&config).unwrap();
}

#[test]
fn run_dummy_backend() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrajControlConfig {
        position_error_file: dir.path().join("error.data"),
        torques_file: dir.path().join("torques.data"),
        spin_rate: 0.0,
        ..Default::default()
    };
    let result = traj_control_apps::run("test_run_dummy_backend", Backend::Dummy, &config);
    let report = result.as_ref().unwrap();
    assert_eq!(report.final_state, Some(GoalState::Succeeded));
    assert!(config.position_error_file.exists());
    assert!(config.torques_file.exists());
    assert_eq!(report_exit_status(&result), 0);
}

#[test]
fn failure_exit_code() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrajControlConfig {
        position_error_file: dir.path().join("no_such_dir").join("error.data"),
        spin_rate: 0.0,
        ..Default::default()
    };
    let result = traj_control_apps::run("test_failure_exit_code", Backend::Dummy, &config);
    assert!(result.is_err());
    assert_eq!(report_exit_status(&result), 1);
}
