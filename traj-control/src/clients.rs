mod dummy_action_client;
mod dummy_node;

pub use dummy_action_client::*;
pub use dummy_node::*;
