pub mod conv_block;
pub mod branch_block;
pub mod trunk;
pub mod head;
pub mod eval_net;
pub mod policy_value_network;

pub use eval_net::*;
pub use policy_value_network::*;
