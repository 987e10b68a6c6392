use chrono::Utc;
use tracing::error;

use super::{notifications, settle, StorageGateway};
use crate::errors::StorageError;
use crate::storage::DEFAULT_VISIBILITY_TIMEOUT;

const BACKEND: &str = "queue";

/// Default number of messages returned by [`StorageGateway::get_queue_messages`].
pub const DEFAULT_PEEK_COUNT: usize = 10;

impl StorageGateway {
    pub async fn send_message(&self, text: &str) -> bool {
        let queue = &self.names.queue_name;
        let res = self
            .queues
            .send(queue, text)
            .await
            .inspect_err(|e| error!(op = "send", queue = %queue, error = %e, "queue operation failed"));
        settle(BACKEND, "send", res).is_some()
    }

    /// Pop the oldest visible message: lease it, then delete it with its receipt.
    pub async fn receive_message(&self) -> Option<String> {
        let queue = &self.names.queue_name;
        let res = async {
            let Some(msg) = self.queues.receive(queue, DEFAULT_VISIBILITY_TIMEOUT).await? else {
                return Ok(None);
            };
            self.queues.delete_message(queue, &msg.message_id, &msg.pop_receipt).await?;
            Ok::<_, StorageError>(Some(msg.text))
        }
        .await
        .inspect_err(|e| {
            error!(op = "receive", queue = %queue, error = %e, "queue operation failed")
        });
        settle(BACKEND, "receive", res).flatten()
    }

    /// Texts of up to `max` visible messages, oldest first, without removing them.
    pub async fn get_queue_messages(&self, max: usize) -> Vec<String> {
        let queue = &self.names.queue_name;
        let res = self
            .queues
            .peek(queue, max)
            .await
            .inspect_err(|e| error!(op = "peek", queue = %queue, error = %e, "queue operation failed"));
        settle(BACKEND, "peek", res)
            .unwrap_or_default()
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    pub async fn delete_message(&self, message_id: &str, pop_receipt: &str) -> bool {
        let queue = &self.names.queue_name;
        let res = self
            .queues
            .delete_message(queue, message_id, pop_receipt)
            .await
            .inspect_err(|e| error!(op = "delete", queue = %queue, message_id, error = %e, "queue operation failed"));
        settle(BACKEND, "delete", res).is_some()
    }

    /// Send `[timestamp UTC] [kind] text`. Blank text is rejected; a blank
    /// kind becomes `General`.
    pub async fn send_general_message(&self, kind: &str, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }
        let kind = if kind.trim().is_empty() { "General" } else { kind };
        self.send_message(&notifications::compose(kind, text, Utc::now())).await
    }

    pub async fn send_order_processing(&self, order_id: &str, customer: &str, amount: f64) -> bool {
        if order_id.trim().is_empty() || customer.trim().is_empty() {
            return false;
        }
        let text = notifications::order_processing(order_id, customer, amount);
        self.send_message(&notifications::compose("ORDER_PROCESSING", &text, Utc::now())).await
    }

    pub async fn send_inventory_update(&self, product: &str, action: &str, quantity: i32) -> bool {
        if product.trim().is_empty() || action.trim().is_empty() {
            return false;
        }
        let text = notifications::inventory_update(product, action, quantity);
        self.send_message(&notifications::compose("INVENTORY_MANAGEMENT", &text, Utc::now())).await
    }
}
