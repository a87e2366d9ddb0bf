//! Delivery channel abstraction

use async_trait::async_trait;

use crate::errors::DeliveryError;

/// Sends a code to a destination over one medium (SMS, email)
///
/// The result is reported back to the caller only. It never changes the
/// state of the session the code belongs to.
#[async_trait]
pub trait DeliveryChannel: Send + Sync {
    /// Deliver `code` to `destination`, returning a provider message id
    async fn deliver(&self, destination: &str, code: &str) -> Result<String, DeliveryError>;

    /// Short channel name used in logs and results
    fn channel_name(&self) -> &str;
}
