use crate::backend::{decode, encode, BackendError, Document, DocumentStore, Snapshot};
use crate::clients::{Confirm, OrderError};
use crate::model::{Order, OrderId, OrderStatus};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Collection holding placed orders.
pub const ORDERS: &str = "orders";

pub const DELETE_ORDER_PROMPT: &str = "Are you sure you want to delete this order?";

/// The order desk: placing, listing and managing orders.
#[derive(Clone)]
pub struct OrderClient {
    documents: Arc<dyn DocumentStore>,
}

fn with_id(snapshot: Snapshot) -> Result<Order, OrderError> {
    let mut order: Order = snapshot.decode()?;
    order.id = Some(OrderId(snapshot.id));
    Ok(order)
}

impl OrderClient {
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        Self { documents }
    }

    #[instrument(skip(self, order), fields(total = order.total_amount))]
    pub async fn place(&self, order: Order) -> Result<OrderId, OrderError> {
        debug!(?order, "place called");
        let id = self.documents.create(ORDERS, encode(&order)?).await?;
        info!(order = %id, "Order stored");
        Ok(OrderId(id))
    }

    /// Every order, in the backend's order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>, OrderError> {
        self.documents
            .list(ORDERS)
            .await?
            .into_iter()
            .map(with_id)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &OrderId) -> Result<Option<Order>, OrderError> {
        let Some(doc) = self.documents.get(ORDERS, &id.0).await? else {
            return Ok(None);
        };
        let mut order: Order = decode(&doc)?;
        order.id = Some(id.clone());
        Ok(Some(order))
    }

    /// Changes only the `status` field.
    #[instrument(skip(self))]
    pub async fn set_status(&self, id: &OrderId, status: OrderStatus) -> Result<(), OrderError> {
        let mut fields = Document::new();
        fields.insert(
            "status".to_string(),
            serde_json::to_value(status).map_err(BackendError::from)?,
        );
        self.documents
            .merge(ORDERS, &id.0, fields)
            .await
            .map_err(|e| match e {
                BackendError::NotFound(_) => OrderError::NotFound(id.to_string()),
                other => OrderError::Backend(other),
            })?;
        info!(order = %id, ?status, "Order status updated");
        Ok(())
    }

    /// Deletes the order once `confirm` approves. Returns whether it did.
    #[instrument(skip(self, confirm))]
    pub async fn delete(&self, id: &OrderId, confirm: &dyn Confirm) -> Result<bool, OrderError> {
        if !confirm.confirm(DELETE_ORDER_PROMPT) {
            debug!(order = %id, "Delete declined");
            return Ok(false);
        }
        self.documents.delete(ORDERS, &id.0).await?;
        info!(order = %id, "Order deleted");
        Ok(true)
    }
}
