//! Type-safe entry points for UI code.
//!
//! [`CartClient`] wraps the cart actor's [`ResourceClient`](crate::framework::ResourceClient).
//! The others are thin, stateless wrappers over the [`backend`](crate::backend).

pub mod account_client;
pub mod actor_client;
pub mod cart_client;
pub mod catalog_client;
mod confirm;
mod dashboard;
mod error;
pub mod order_client;

pub use account_client::*;
pub use actor_client::ActorClient;
pub use cart_client::*;
pub use catalog_client::*;
pub use confirm::Confirm;
pub use dashboard::{dashboard_stats, DashboardStats};
pub use error::*;
pub use order_client::*;
