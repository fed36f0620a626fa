//! Names of the local storage entries owned by the cart.

use crate::model::UserId;

/// Local key for the anonymous cart.
pub const GUEST_CART: &str = "cart-guest";

/// Last delivery charge shown to the customer.
pub const DELIVERY_CHARGES: &str = "deliveryCharges";

/// `cart-<uid>` for a signed-in user, [`GUEST_CART`] otherwise.
pub fn cart_key(user: Option<&UserId>) -> String {
    match user {
        Some(uid) => format!("cart-{uid}"),
        None => GUEST_CART.to_string(),
    }
}

/// Companion entry holding the version of the cart stored under `cart_key`.
pub fn version_key(cart_key: &str) -> String {
    format!("{cart_key}:version")
}
