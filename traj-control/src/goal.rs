use std::time::{Duration, SystemTime};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Joints commanded by [`waypoints_arm_goal`].
pub const ARM_JOINT_NAMES: [&str; 4] = ["arm_1_joint", "arm_2_joint", "arm_3_joint", "arm_4_joint"];

const ARM_WAYPOINT_POSITIONS: [[f64; 4]; 3] = [
    [0.15, -0.90, -2.52, 1.64],
    [1.57, -0.06, -0.88, 0.49],
    [2.30, 0.82, 1.00, 1.69],
];
const ARM_WAYPOINT_VELOCITY: f64 = 0.2;
const ARM_WAYPOINT_TIMES_SEC: [f64; 3] = [8.0, 13.0, 17.0];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryPoint {
    pub positions: Vec<f64>,
    pub velocities: Vec<f64>,
    pub time_from_start: Duration,
}

impl TrajectoryPoint {
    pub fn new(positions: Vec<f64>, velocities: Vec<f64>, time_from_start: Duration) -> Self {
        Self {
            positions,
            velocities,
            time_from_start,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryGoal {
    pub joint_names: Vec<String>,
    pub points: Vec<TrajectoryPoint>,
    /// When the executor should start the trajectory. `None` means "as soon as received".
    pub start_time: Option<SystemTime>,
}

impl TrajectoryGoal {
    pub fn new(joint_names: Vec<String>, points: Vec<TrajectoryPoint>) -> Self {
        Self {
            joint_names,
            points,
            start_time: None,
        }
    }

    /// Returns the goal stamped to start at `start_time`.
    pub fn with_start_time(mut self, start_time: SystemTime) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Total duration of the trajectory, measured from its start.
    pub fn duration(&self) -> Duration {
        self.points
            .last()
            .map(|p| p.time_from_start)
            .unwrap_or_default()
    }

    /// Checks that every point matches the joint count and that
    /// `time_from_start` is strictly increasing.
    pub fn validate(&self) -> Result<()> {
        let dof = self.joint_names.len();
        let mut previous: Option<Duration> = None;
        for (index, point) in self.points.iter().enumerate() {
            for len in [point.positions.len(), point.velocities.len()] {
                if len != dof {
                    return Err(Error::LengthMismatch {
                        model: dof,
                        input: len,
                    });
                }
            }
            if let Some(previous) = previous {
                if point.time_from_start <= previous {
                    return Err(Error::NonIncreasingTimeFromStart {
                        index,
                        previous,
                        current: point.time_from_start,
                    });
                }
            }
            previous = Some(point.time_from_start);
        }
        Ok(())
    }
}

/// Builds the fixed three-waypoint demonstration trajectory for the arm.
pub fn waypoints_arm_goal() -> TrajectoryGoal {
    let joint_names = ARM_JOINT_NAMES.iter().map(|s| s.to_string()).collect();
    let points = ARM_WAYPOINT_POSITIONS
        .iter()
        .zip(ARM_WAYPOINT_TIMES_SEC)
        .map(|(positions, time)| {
            TrajectoryPoint::new(
                positions.to_vec(),
                vec![ARM_WAYPOINT_VELOCITY; ARM_JOINT_NAMES.len()],
                Duration::from_secs_f64(time),
            )
        })
        .collect();
    TrajectoryGoal::new(joint_names, points)
}

#[cfg(test)]
mod tests {
    use assert_approx_eq::assert_approx_eq;

    use super::*;

    #[test]
    fn test_waypoints_arm_goal_shape() {
        let goal = waypoints_arm_goal();
        assert_eq!(
            goal.joint_names,
            vec!["arm_1_joint", "arm_2_joint", "arm_3_joint", "arm_4_joint"]
        );
        assert_eq!(goal.points.len(), 3);
        for point in &goal.points {
            assert_eq!(point.positions.len(), 4);
            assert_eq!(point.velocities.len(), 4);
            for v in &point.velocities {
                assert_approx_eq!(*v, 0.2);
            }
        }
        assert!(goal.start_time.is_none());
        assert!(goal.validate().is_ok());
    }

    #[test]
    fn test_waypoints_arm_goal_values() {
        let goal = waypoints_arm_goal();
        let times: Vec<_> = goal.points.iter().map(|p| p.time_from_start).collect();
        assert_eq!(
            times,
            vec![
                Duration::from_secs(8),
                Duration::from_secs(13),
                Duration::from_secs(17)
            ]
        );
        assert!(times.windows(2).all(|w| w[0] < w[1]));
        assert_approx_eq!(goal.points[0].positions[2], -2.52);
        assert_approx_eq!(goal.points[1].positions[0], 1.57);
        assert_approx_eq!(goal.points[2].positions[3], 1.69);
        assert_eq!(goal.duration(), Duration::from_secs(17));
    }

    #[test]
    fn test_waypoints_arm_goal_is_pure() {
        let a = waypoints_arm_goal();
        let b = waypoints_arm_goal();
        assert_eq!(a, b);
        for (pa, pb) in a.points.iter().zip(&b.points) {
            for (x, y) in pa.positions.iter().zip(&pb.positions) {
                assert_eq!(x.to_bits(), y.to_bits());
            }
        }
    }

    #[test]
    fn test_validate_length_mismatch() {
        let mut goal = waypoints_arm_goal();
        goal.points[1].velocities.pop();
        assert!(matches!(
            goal.validate(),
            Err(Error::LengthMismatch { model: 4, input: 3 })
        ));
    }

    #[test]
    fn test_validate_non_increasing_time() {
        let mut goal = waypoints_arm_goal();
        goal.points[2].time_from_start = Duration::from_secs(13);
        assert!(matches!(
            goal.validate(),
            Err(Error::NonIncreasingTimeFromStart { index: 2, .. })
        ));
    }

    #[test]
    fn test_with_start_time() {
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(100);
        let goal = waypoints_arm_goal().with_start_time(stamp);
        assert_eq!(goal.start_time, Some(stamp));
    }
}
