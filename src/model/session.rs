/// The state of one storefront tab.
///
/// # Actor Framework
/// This struct implements the [`ActorEntity`](crate::framework::ActorEntity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::framework::ResourceActor).
///
/// See [`impl ActorEntity for CartSession`](#impl-ActorEntity-for-CartSession) for details on:
/// - Opening ([`OpenSession`])
/// - Actions ([`CartAction`](crate::cart_actor::CartAction))
use crate::model::{Cart, CartItem, DeliveryCharge, UserId};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Type-safe identifier for sessions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub u32);

impl From<u32> for SessionId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session_{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct CartSession {
    pub id: SessionId,
    /// `None` while anonymous; the cart is then local-only.
    pub user: Option<UserId>,
    pub cart: Cart,
    pub delivery: DeliveryCharge,
    /// Bumped on every persist and stored next to both copies of the cart.
    pub version: u64,
}

/// Payload for opening a session. Sessions always start empty and anonymous.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenSession;

impl CartSession {
    pub fn new(id: SessionId) -> Self {
        Self {
            id,
            user: None,
            cart: Cart::new(),
            delivery: DeliveryCharge::default(),
            version: 0,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn view(&self) -> CartView {
        CartView {
            session: self.id,
            user: self.user.clone(),
            items: self.cart.items().to_vec(),
            item_count: self.cart.item_count(),
            subtotal: self.cart.subtotal(),
            delivery: self.delivery,
            total: self.cart.total(self.delivery),
            version: self.version,
        }
    }
}

/// What a UI needs to draw the cart, recomputed after every action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub session: SessionId,
    pub user: Option<UserId>,
    pub items: Vec<CartItem>,
    pub item_count: u32,
    pub subtotal: f64,
    pub delivery: DeliveryCharge,
    pub total: f64,
    pub version: u64,
}
