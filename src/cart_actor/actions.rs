//! Operations a storefront tab can perform on its cart session.
//!
//! These are handled by
//! [`ActorEntity::handle_action`](crate::framework::ActorEntity::handle_action) on
//! [`CartSession`](crate::model::CartSession), one at a time.

use crate::model::{CartView, CustomerDetails, ItemDetails, OrderId, UserId};

#[derive(Debug, Clone)]
pub enum CartAction {
    /// Adds `qty` units, growing an existing line or appending a new one.
    ///
    /// # Errors
    /// `qty == 0` fails with [`CartError::InvalidQuantity`](super::CartError::InvalidQuantity).
    AddItem {
        id: String,
        details: ItemDetails,
        qty: u32,
    },
    /// Drops the line for `id`. Unknown ids change nothing.
    RemoveItem { id: String },
    /// Sets the quantity of an existing line. Values below 1 change nothing.
    SetQty { id: String, qty: i64 },
    /// The user signed in: adopt their remote cart.
    LoadForUser { user_id: UserId },
    /// The user signed out: forget the cart locally, leave the remote copy.
    ClearOnLogout,
    /// Writes the cart out again without changing it.
    Persist,
    /// Re-quotes the delivery charge for a newly typed address.
    UpdateAddress { address: String },
    /// Places an order for the current cart and empties it.
    Checkout(CustomerDetails),
}

#[derive(Debug, Clone, PartialEq)]
pub enum CartActionResult {
    /// The session after the action.
    View(CartView),
    /// Returned by `Checkout`.
    Placed(OrderId),
}
