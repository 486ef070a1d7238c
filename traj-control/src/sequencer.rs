use tracing::{debug, info, warn};

use crate::{
    config::TrajControlConfig,
    connector::connect,
    error::{Error, Result},
    goal::waypoints_arm_goal,
    telemetry::{TelemetryLog, TelemetryStream},
    traits::{FollowJointTrajectoryClient, GoalState, Node},
    utils::Rate,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownStatus {
    Success,
    Failure,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Initializing,
    ConnectingClient,
    BuildingGoal,
    Dispatching,
    AwaitingCompletion,
    ShuttingDown(ShutdownStatus),
}

/// What happened during a run that did not fail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Terminal goal state, `None` if the wait ended for another reason.
    pub final_state: Option<GoalState>,
    /// `true` if the process was asked to stop before the goal finished.
    pub interrupted: bool,
    /// `true` once the goal has been handed to the action server.
    pub dispatched: bool,
    pub position_error_count: usize,
    pub torques_count: usize,
    pub position_error_dropped: usize,
    pub torques_dropped: usize,
}

/// Drives one connect / dispatch / record cycle against a [`Node`].
#[derive(Debug)]
pub struct Sequencer<'a, N> {
    node: &'a N,
    config: &'a TrajControlConfig,
    history: Vec<SequencerState>,
}

impl<'a, N: Node> Sequencer<'a, N> {
    pub fn new(node: &'a N, config: &'a TrajControlConfig) -> Self {
        Self {
            node,
            config,
            history: vec![SequencerState::Initializing],
        }
    }

    pub fn state(&self) -> SequencerState {
        *self.history.last().unwrap_or(&SequencerState::Initializing)
    }

    /// Every state visited so far, in order.
    pub fn history(&self) -> &[SequencerState] {
        &self.history
    }

    /// Runs to completion.
    ///
    /// A shutdown request is not an error: it yields a report with
    /// `interrupted` set. Both telemetry logs are closed on every path that
    /// opened them.
    pub fn run(&mut self) -> Result<RunReport> {
        let result = self.run_inner();
        let status = match &result {
            Ok(_) => ShutdownStatus::Success,
            Err(_) => ShutdownStatus::Failure,
        };
        self.transition(SequencerState::ShuttingDown(status));
        result
    }

    fn run_inner(&mut self) -> Result<RunReport> {
        self.config.validate()?;
        let clock_timeout = self.config.clock_timeout()?;
        if !self.node.wait_for_valid(clock_timeout) {
            return Err(Error::ClockUnavailable {
                timeout: clock_timeout,
            });
        }

        self.transition(SequencerState::ConnectingClient);
        let client = self.node.action_client(&self.config.action_server_name)?;
        let client = match connect(client, self.node, &self.config.connector) {
            Ok(client) => client,
            Err(Error::ShutdownRequested) => {
                info!("Shutdown requested while connecting");
                return Ok(RunReport {
                    interrupted: true,
                    ..Default::default()
                });
            }
            Err(e) => return Err(e),
        };

        self.transition(SequencerState::BuildingGoal);
        let goal = waypoints_arm_goal();
        goal.validate()?;

        self.transition(SequencerState::Dispatching);
        let start_time = self
            .node
            .now()
            .checked_add(self.config.start_delay()?)
            .ok_or(Error::InvalidDuration {
                name: "start_delay_sec",
                value: self.config.start_delay_sec,
            })?;
        info!(
            "Sending {}-point trajectory to {}",
            goal.points.len(),
            client.server_name()
        );
        client.send_goal(goal.with_start_time(start_time))?;
        let mut error_stream = self.open_stream(
            &self.config.position_error_topic,
            &self.config.position_error_file,
        )?;
        let mut torques_stream =
            self.open_stream(&self.config.torques_topic, &self.config.torques_file)?;

        self.transition(SequencerState::AwaitingCompletion);
        let waited = self.await_completion(&client, &mut error_stream, &mut torques_stream);

        let report = RunReport {
            dispatched: true,
            position_error_count: error_stream.count(),
            torques_count: torques_stream.count(),
            position_error_dropped: error_stream.dropped(),
            torques_dropped: torques_stream.dropped(),
            ..Default::default()
        };
        let closed_error = error_stream.close();
        let closed_torques = torques_stream.close();
        let final_state = waited?;
        closed_error?;
        closed_torques?;

        match final_state {
            Some(GoalState::Succeeded) => info!("Trajectory execution succeeded"),
            Some(state) => warn!("Trajectory execution finished with {state:?}"),
            None => info!("Shutdown requested before the trajectory finished"),
        }
        Ok(RunReport {
            final_state,
            interrupted: final_state.is_none(),
            ..report
        })
    }

    fn open_stream(
        &self,
        topic: &str,
        path: &std::path::Path,
    ) -> Result<TelemetryStream> {
        let log = TelemetryLog::create(path)?;
        let subscription = self
            .node
            .subscribe(topic, self.config.telemetry_queue_size)?;
        debug!("Recording {topic} to {path:?}");
        Ok(TelemetryStream::new(subscription, log))
    }

    /// Returns the terminal goal state, or `None` if liveness ended first.
    fn await_completion(
        &self,
        client: &N::Client,
        error_stream: &mut TelemetryStream,
        torques_stream: &mut TelemetryStream,
    ) -> Result<Option<GoalState>> {
        let mut rate = Rate::from_period(self.config.spin_period()?);
        loop {
            error_stream.drain()?;
            torques_stream.drain()?;
            let state = client.goal_state();
            if state.is_done() {
                return Ok(Some(state));
            }
            if !self.node.is_ok() {
                return Ok(None);
            }
            rate.sleep();
        }
    }

    fn transition(&mut self, next: SequencerState) {
        debug!("{:?} -> {:?}", self.state(), next);
        self.history.push(next);
    }
}

/// Convenience wrapper around [`Sequencer::run`].
pub fn run<N: Node>(node: &N, config: &TrajControlConfig) -> Result<RunReport> {
    Sequencer::new(node, config).run()
}
