#![cfg(target_os = "linux")]

mod util;

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use traj_control::{waypoints_arm_goal, Clock, FollowJointTrajectoryClient, GoalState, Node};
use traj_control_ros::{
    convert_system_time_to_ros_time,
    msg::{
        actionlib_msgs::{GoalID, GoalStatus, GoalStatusArray},
        control_msgs::{FollowJointTrajectoryActionGoal, FollowJointTrajectoryActionResult},
    },
};
use util::{run_roscore_and_init, wait_until};

const ACTION_SERVER: &str = "/arm_dynamic_controller/follow_joint_trajectory";
const TIMEOUT: Duration = Duration::from_secs(10);

fn goal_status(goal_id: &str, status: u8) -> GoalStatus {
    let mut goal_status = GoalStatus {
        status,
        ..Default::default()
    };
    goal_status.goal_id.id = goal_id.to_owned();
    goal_status
}

#[test]
fn test_ros_action_client() {
    let (_roscore, node) = run_roscore_and_init("traj_control_ros_action_client_test");
    let client = node.action_client(ACTION_SERVER).unwrap();

    // fake action server
    let (goal_tx, goal_rx) = flume::unbounded();
    let _goal_subscriber = rosrust::subscribe(
        &format!("{ACTION_SERVER}/goal"),
        1,
        move |goal: FollowJointTrajectoryActionGoal| {
            let _ = goal_tx.send(goal);
        },
    )
    .unwrap();
    let _cancel_subscriber =
        rosrust::subscribe(&format!("{ACTION_SERVER}/cancel"), 1, |_: GoalID| {}).unwrap();
    let result_publisher: rosrust::Publisher<FollowJointTrajectoryActionResult> =
        rosrust::publish(&format!("{ACTION_SERVER}/result"), 1).unwrap();

    // goal and cancel subscribers alone do not make the server ready
    assert!(!client.wait_for_server(Duration::from_millis(500)));

    let status_list = Arc::new(Mutex::new(Vec::<GoalStatus>::new()));
    let status_publisher =
        rosrust::publish::<GoalStatusArray>(&format!("{ACTION_SERVER}/status"), 1).unwrap();
    let status_list_for_server = status_list.clone();
    std::thread::spawn(move || {
        let rate = rosrust::rate(20.0);
        while rosrust::is_ok() {
            let status_list = status_list_for_server.lock().unwrap().clone();
            let _ = status_publisher.send(GoalStatusArray {
                status_list,
                ..Default::default()
            });
            rate.sleep();
        }
    });
    assert!(client.wait_for_server(TIMEOUT));
    assert!(client.goal_id().is_none());
    assert_eq!(client.goal_state(), GoalState::Pending);

    let start_time = node.now() + Duration::from_secs(1);
    client
        .send_goal(waypoints_arm_goal().with_start_time(start_time))
        .unwrap();
    let goal_id = client.goal_id().unwrap();
    let sent = goal_rx.recv_timeout(TIMEOUT).unwrap();
    assert_eq!(sent.goal_id.id, goal_id);
    assert_eq!(
        sent.goal.trajectory.joint_names,
        ["arm_1_joint", "arm_2_joint", "arm_3_joint", "arm_4_joint"]
    );
    assert_eq!(sent.goal.trajectory.points.len(), 3);
    assert_eq!(
        sent.goal.trajectory.header.stamp,
        convert_system_time_to_ros_time(&start_time)
    );
    // not listed by the server yet
    assert_eq!(client.goal_state(), GoalState::Pending);

    *status_list.lock().unwrap() = vec![goal_status(&goal_id, GoalStatus::ACTIVE)];
    let state = wait_until(TIMEOUT, || {
        let state = client.goal_state();
        (state == GoalState::Active).then_some(state)
    });
    assert_eq!(state, Some(GoalState::Active));

    let result = FollowJointTrajectoryActionResult {
        status: goal_status(&goal_id, GoalStatus::SUCCEEDED),
        ..Default::default()
    };
    let state = wait_until(TIMEOUT, || {
        result_publisher.send(result.clone()).unwrap();
        let state = client.goal_state();
        state.is_done().then_some(state)
    });
    assert_eq!(state, Some(GoalState::Succeeded));
}
