pub mod config;
pub mod domains;
pub mod error;
pub mod interfaces;
pub mod services;

pub use crate::config::NodeConfig;
pub use crate::domains::message::{
    NodeMessage, NodeMessageData, NodeMessageType, TeamMessagePayload,
};
pub use crate::error::{PokerNodeError, Result};
pub use crate::services::codec::{MessageCodec, WireHeaders, WireMessage};
pub use crate::services::node::NodeEndpoint;
pub use crate::services::session::{SessionController, TeamSession};
