//! [`traj_control`] backend using ROS1.

mod error;
pub mod msg;
mod ros_action_client;
mod ros_node;
pub mod rosrust_utils;

pub use crate::{error::Error, ros_action_client::*, ros_node::*, rosrust_utils::*};
