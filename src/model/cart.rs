use crate::model::lenient;
use crate::model::DeliveryCharge;
use serde::{Deserialize, Serialize};

/// One line of the cart.
///
/// The field names are the wire format of both the local `cart-<uid>` entry
/// and the `cart` array of the remote cart document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Dish identifier; unique within a cart.
    pub id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub image: String,
    #[serde(deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(deserialize_with = "lenient::number")]
    pub price: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub serving: String,
    pub qty: u32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.qty)
    }
}

/// The unit fields of a dish, copied into the cart when it is first added.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDetails {
    pub image: String,
    pub name: String,
    pub price: f64,
    pub serving: String,
}

/// Ordered list of selected items, insertion order = add order.
///
/// Invariant: at most one [`CartItem`] per `id`, every `qty >= 1`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a cart from stored items, restoring the invariant.
    ///
    /// Duplicate ids are folded into the first occurrence by summing their
    /// quantities; a zero quantity counts as one.
    pub fn from_items(items: impl IntoIterator<Item = CartItem>) -> Self {
        let mut cart = Self::new();
        for mut item in items {
            item.qty = item.qty.max(1);
            match cart.items.iter_mut().find(|existing| existing.id == item.id) {
                Some(existing) => existing.qty = existing.qty.saturating_add(item.qty),
                None => cart.items.push(item),
            }
        }
        cart
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn into_items(self) -> Vec<CartItem> {
        self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Adds `qty` units of `id`, returning the resulting quantity, or `None`
    /// without touching the cart when `qty` is zero.
    ///
    /// An existing line keeps its details and only grows; a new line is
    /// appended at the end.
    pub fn add(&mut self, id: &str, details: ItemDetails, qty: u32) -> Option<u32> {
        if qty == 0 {
            return None;
        }
        if let Some(existing) = self.items.iter_mut().find(|item| item.id == id) {
            existing.qty = existing.qty.saturating_add(qty);
            return Some(existing.qty);
        }
        self.items.push(CartItem {
            id: id.to_string(),
            image: details.image,
            name: details.name,
            price: details.price,
            serving: details.serving,
            qty,
        });
        Some(qty)
    }

    /// Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Sets the quantity of `id`. Values below 1 and unknown ids are ignored.
    ///
    /// Returns whether the cart changed.
    pub fn set_qty(&mut self, id: &str, qty: i64) -> bool {
        let Ok(qty) = u32::try_from(qty) else {
            return false;
        };
        if qty == 0 {
            return false;
        }
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) if item.qty != qty => {
                item.qty = qty;
                true
            }
            _ => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Number of units across all lines (the badge count).
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |sum, item| sum.saturating_add(item.qty))
    }

    /// Σ price × qty.
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    pub fn total(&self, delivery: DeliveryCharge) -> f64 {
        self.subtotal() + delivery.amount()
    }
}

impl<'de> Deserialize<'de> for Cart {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Vec::<CartItem>::deserialize(deserializer).map(Cart::from_items)
    }
}
