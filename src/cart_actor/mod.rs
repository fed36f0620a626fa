//! The cart reconciler: one [`CartSession`] per storefront tab, mirrored to
//! local storage and, while signed in, to the user's remote cart document.

mod actions;
mod context;
pub mod entity;
pub mod error;
mod events;
pub mod persist;

pub use actions::*;
pub use context::CartContext;
pub use error::*;
pub use events::CartChanged;

use crate::clients::CartClient;
use crate::framework::ResourceActor;
use crate::model::CartSession;

/// Creates a new cart actor and its client.
///
/// Session ids come from the actor's own counter.
pub fn new(buffer_size: usize) -> (ResourceActor<CartSession>, CartClient) {
    let (actor, generic_client) = ResourceActor::new(buffer_size);
    let client = CartClient::new(generic_client);
    (actor, client)
}
