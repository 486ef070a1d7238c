use std::time::{Duration, Instant, SystemTime};

use tracing::{debug, info};
use traj_control::{telemetry_channel, Clock, Liveness, Node, TelemetrySource, TelemetrySubscription};

use crate::{
    error::Error, msg::std_msgs::Float64MultiArray,
    ros_action_client::RosFollowJointTrajectoryClient,
    rosrust_utils::convert_ros_time_to_system_time,
};

const ACTION_QUEUE_SIZE: usize = 10;
const CLOCK_POLLING_PERIOD: Duration = Duration::from_millis(10);

/// A ROS1 node. Only one may exist per process.
#[derive(Debug)]
pub struct RosNode(());

impl RosNode {
    /// Registers this process with the ROS master as `name`.
    pub fn init(name: &str) -> Self {
        rosrust::init(name);
        info!("Starting {name} ...");
        Self(())
    }
}

impl Clock for RosNode {
    fn now(&self) -> SystemTime {
        convert_ros_time_to_system_time(&rosrust::now())
    }

    // With simulated time, `now` stays zero until the first /clock message.
    fn wait_for_valid(&self, timeout: Duration) -> bool {
        let start_time = Instant::now();
        while rosrust::is_ok() {
            if rosrust::now().nanos() != 0 {
                return true;
            }
            if start_time.elapsed() >= timeout {
                break;
            }
            std::thread::sleep(CLOCK_POLLING_PERIOD);
        }
        false
    }
}

impl Liveness for RosNode {
    fn is_ok(&self) -> bool {
        rosrust::is_ok()
    }
}

impl TelemetrySource for RosNode {
    fn subscribe(
        &self,
        topic: &str,
        queue_size: usize,
    ) -> traj_control::Result<TelemetrySubscription> {
        let (publisher, subscription) = telemetry_channel(topic, queue_size);
        let subscriber =
            rosrust::subscribe(topic, queue_size, move |message: Float64MultiArray| {
                publisher.push(message.data);
            })
            .map_err(|e| Error::Subscribe {
                topic: topic.to_owned(),
                message: e.to_string(),
            })?;
        debug!("Subscribed {topic} (queue_size = {queue_size})");
        Ok(subscription.with_guard(subscriber))
    }
}

impl Node for RosNode {
    type Client = RosFollowJointTrajectoryClient;

    fn action_client(&self, server_name: &str) -> traj_control::Result<Self::Client> {
        Ok(RosFollowJointTrajectoryClient::new(
            server_name,
            ACTION_QUEUE_SIZE,
        )?)
    }
}
