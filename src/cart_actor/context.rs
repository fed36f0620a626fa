use crate::backend::DocumentStore;
use crate::cart_actor::CartChanged;
use crate::clients::OrderClient;
use crate::model::DeliveryRules;
use crate::storage::LocalStore;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Dependencies injected into the cart actor by `run()`.
#[derive(Clone)]
pub struct CartContext {
    pub local: Arc<dyn LocalStore>,
    /// Holds the `carts/<uid>` documents.
    pub remote: Arc<dyn DocumentStore>,
    pub orders: OrderClient,
    pub delivery: DeliveryRules,
    pub events: broadcast::Sender<CartChanged>,
}
