mod action_client;
mod clock;
mod liveness;
mod node;
mod telemetry_source;

pub use action_client::*;
pub use clock::*;
pub use liveness::*;
pub use node::*;
pub use telemetry_source::*;
