use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::interfaces::bus::MessageBus;
use crate::services::codec::WireMessage;

/// Loopback bus delivering every published message to all subscribers in the
/// same process. Used by tests and single-node runs.
pub struct InMemoryBus {
    sender: broadcast::Sender<WireMessage>,
}

impl InMemoryBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }
}

impl Default for InMemoryBus {
    fn default() -> Self {
        Self::new(256)
    }
}

#[async_trait]
impl MessageBus for InMemoryBus {
    async fn publish(&self, message: WireMessage) -> Result<()> {
        // No subscribers is fine for a loopback bus.
        let _ = self.sender.send(message);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<WireMessage> {
        self.sender.subscribe()
    }
}
