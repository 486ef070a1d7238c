//! Send a fixed trajectory to an arm's `FollowJointTrajectory` action server
//! and record controller telemetry until the action finishes.
//!
//! Messaging backends implement [`Node`]; [`DummyNode`] is provided for
//! dry runs and tests.

mod clients;
mod config;
mod connector;
mod error;
mod goal;
mod sequencer;
mod telemetry;
mod traits;
mod utils;

pub use clients::*;
pub use config::*;
pub use connector::*;
pub use error::*;
pub use goal::*;
pub use sequencer::*;
pub use telemetry::*;
pub use traits::*;
pub use utils::*;
