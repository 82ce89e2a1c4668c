use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::warn;

use crate::domains::message::{NodeMessage, NodeMessageType};
use crate::error::Result;
use crate::interfaces::bus::MessageBus;
use crate::services::codec::MessageCodec;

/// One node's attachment to the shared bus. Stamps outbound envelopes with
/// the node id, decodes inbound traffic and filters out messages this node
/// should not see (its own, or ones addressed to another node).
pub struct NodeEndpoint {
    node_id: String,
    bus: Arc<dyn MessageBus>,
    inbound_tx: broadcast::Sender<NodeMessage>,
}

impl NodeEndpoint {
    pub fn start(node_id: impl Into<String>, bus: Arc<dyn MessageBus>) -> Self {
        let node_id = node_id.into();
        let (inbound_tx, _) = broadcast::channel::<NodeMessage>(256);

        let mut bus_rx = bus.subscribe();
        let task_tx = inbound_tx.clone();
        let task_node_id = node_id.clone();
        tokio::spawn(async move {
            loop {
                match bus_rx.recv().await {
                    Ok(wire) => {
                        let message = match MessageCodec::decode(&wire) {
                            Ok(message) => message,
                            Err(err) => {
                                // Fatal for this message only; the loop keeps running.
                                warn!(node_id = %task_node_id, error = %err, "dropping undecodable node message");
                                continue;
                            }
                        };
                        if message.sender_node_id == task_node_id {
                            continue;
                        }
                        if !message.is_broadcast() && message.recipient_node_id != task_node_id {
                            continue;
                        }
                        let _ = task_tx.send(message);
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        warn!(node_id = %task_node_id, skipped, "node message receiver lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        });

        Self {
            node_id,
            bus,
            inbound_tx,
        }
    }

    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Encodes and publishes the message. The sender id is always this
    /// node's; whatever the caller put there is overwritten.
    pub async fn send(&self, mut message: NodeMessage) -> Result<()> {
        message.sender_node_id = self.node_id.clone();
        let wire = MessageCodec::encode(&message)?;
        self.bus.publish(wire).await
    }

    /// Asks all other nodes for their current team list.
    pub async fn request_teams(&self) -> Result<()> {
        self.send(NodeMessage::new(NodeMessageType::RequestTeams))
            .await
    }

    /// Envelopes addressed to this node (or broadcast), already decoded.
    pub fn subscribe(&self) -> broadcast::Receiver<NodeMessage> {
        self.inbound_tx.subscribe()
    }
}
