use std::{
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use crate::{
    error::Result,
    goal::TrajectoryGoal,
    traits::{FollowJointTrajectoryClient, GoalState},
};

/// Dummy FollowJointTrajectoryClient for Debug or Tests
///
/// Clones share their counters and the list of sent goals.
#[derive(Debug, Clone)]
pub struct DummyActionClient {
    server_name: String,
    server_ready_after: usize,
    done_after: usize,
    final_state: GoalState,
    probes: Arc<AtomicUsize>,
    polls: Arc<AtomicUsize>,
    pub sent_goals: Arc<Mutex<Vec<TrajectoryGoal>>>,
}

impl DummyActionClient {
    pub fn new(server_name: impl Into<String>) -> Self {
        Self {
            server_name: server_name.into(),
            server_ready_after: 0,
            done_after: 0,
            final_state: GoalState::Succeeded,
            probes: Arc::new(AtomicUsize::new(0)),
            polls: Arc::new(AtomicUsize::new(0)),
            sent_goals: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// The first `probes` calls to `wait_for_server` fail.
    pub fn with_server_ready_after(mut self, probes: usize) -> Self {
        self.server_ready_after = probes;
        self
    }

    /// The goal reports `final_state` once `goal_state` has been polled
    /// `polls` times after dispatch.
    pub fn with_done_after(mut self, polls: usize, final_state: GoalState) -> Self {
        self.done_after = polls;
        self.final_state = final_state;
        self
    }

    pub(crate) fn with_server_name(mut self, server_name: &str) -> Self {
        self.server_name = server_name.to_owned();
        self
    }

    pub fn probe_count(&self) -> usize {
        self.probes.load(Ordering::SeqCst)
    }

    pub fn probe_counter(&self) -> Arc<AtomicUsize> {
        self.probes.clone()
    }

    pub fn sent_goal_count(&self) -> usize {
        self.sent_goals.lock().unwrap().len()
    }
}

impl FollowJointTrajectoryClient for DummyActionClient {
    fn server_name(&self) -> &str {
        &self.server_name
    }

    fn wait_for_server(&self, _timeout: Duration) -> bool {
        let attempt = self.probes.fetch_add(1, Ordering::SeqCst);
        attempt >= self.server_ready_after
    }

    fn send_goal(&self, goal: TrajectoryGoal) -> Result<()> {
        self.sent_goals.lock().unwrap().push(goal);
        self.polls.store(0, Ordering::SeqCst);
        Ok(())
    }

    fn goal_state(&self) -> GoalState {
        if self.sent_goal_count() == 0 {
            return GoalState::Pending;
        }
        let polls = self.polls.fetch_add(1, Ordering::SeqCst);
        if polls >= self.done_after {
            self.final_state
        } else {
            GoalState::Active
        }
    }
}
