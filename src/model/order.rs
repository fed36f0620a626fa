use crate::model::lenient;
use crate::model::{CartItem, DeliveryCharge};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Backend-assigned order document id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Delivered,
    /// Anything else another client may have written.
    #[serde(other)]
    Unknown,
}

/// Who the order goes to, as typed at checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerDetails {
    pub name: String,
    pub contact: String,
    pub address: String,
}

impl CustomerDetails {
    /// Names of the fields that are blank, in form order.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("contact", &self.contact),
            ("address", &self.address),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

/// An order document in the `orders` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Filled from the document key on reads; never written into the body.
    #[serde(skip)]
    pub id: Option<OrderId>,
    pub customer_name: String,
    pub customer_contact: String,
    pub customer_address: String,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub cart: Vec<CartItem>,
    #[serde(default, deserialize_with = "lenient::number")]
    pub order_amount: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub delivery_charges: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient::optional_timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

impl Order {
    /// A new pending order for `items`, with amounts computed from them.
    pub fn pending(
        customer: &CustomerDetails,
        items: Vec<CartItem>,
        delivery: DeliveryCharge,
        placed_at: DateTime<Utc>,
    ) -> Self {
        let order_amount: f64 = items.iter().map(CartItem::line_total).sum();
        Self {
            id: None,
            customer_name: customer.name.trim().to_string(),
            customer_contact: customer.contact.trim().to_string(),
            customer_address: customer.address.trim().to_string(),
            status: OrderStatus::Pending,
            cart: items,
            order_amount,
            delivery_charges: delivery.amount(),
            total_amount: order_amount + delivery.amount(),
            timestamp: Some(placed_at),
        }
    }
}
