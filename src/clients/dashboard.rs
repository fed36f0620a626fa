use crate::backend::{BackendError, DocumentStore};
use crate::clients::{DISHES, ORDERS, RESTAURANTS, USERS};
use serde::Serialize;
use serde_json::Value;
use tracing::instrument;

/// Counters shown on the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    pub restaurants: usize,
    pub dishes: usize,
    pub pending_orders: usize,
    pub delivered_orders: usize,
    pub users: usize,
}

#[instrument(skip(documents))]
pub async fn dashboard_stats(documents: &dyn DocumentStore) -> Result<DashboardStats, BackendError> {
    let orders = documents.list(ORDERS).await?;
    let with_status = |status: &str| {
        orders
            .iter()
            .filter(|order| order.data.get("status").and_then(Value::as_str) == Some(status))
            .count()
    };
    Ok(DashboardStats {
        restaurants: documents.list(RESTAURANTS).await?.len(),
        dishes: documents.list(DISHES).await?.len(),
        pending_orders: with_status("pending"),
        delivered_orders: with_status("delivered"),
        users: documents.list(USERS).await?.len(),
    })
}
