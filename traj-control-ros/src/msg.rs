rosrust::rosmsg_include!(
    actionlib_msgs / GoalID,
    actionlib_msgs / GoalStatus,
    actionlib_msgs / GoalStatusArray,
    control_msgs / FollowJointTrajectoryActionGoal,
    control_msgs / FollowJointTrajectoryActionResult,
    control_msgs / FollowJointTrajectoryGoal,
    std_msgs / Float64MultiArray,
    trajectory_msgs / JointTrajectory,
    trajectory_msgs / JointTrajectoryPoint,
);
