//! Plain data: the cart, the documents the storefront reads and writes, and
//! the [`CartSession`] entity managed by the cart actor.

mod lenient;

pub mod cart;
pub mod catalog;
pub mod delivery;
pub mod order;
pub mod session;
pub mod user;

pub use cart::*;
pub use catalog::*;
pub use delivery::*;
pub use order::*;
pub use session::*;
pub use user::*;
