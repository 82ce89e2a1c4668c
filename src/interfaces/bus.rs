use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::Result;
use crate::services::codec::WireMessage;

/// Seam to the external publish/subscribe transport. Delivery guarantees,
/// ordering and authentication are properties of the implementation, not of
/// this interface.
#[async_trait]
pub trait MessageBus: Send + Sync {
    async fn publish(&self, message: WireMessage) -> Result<()>;

    fn subscribe(&self) -> broadcast::Receiver<WireMessage>;
}
