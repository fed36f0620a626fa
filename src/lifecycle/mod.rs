//! # Store Lifecycle
//!
//! Starting, wiring and stopping the storefront.
//!
//! ## Dependency Injection via Context
//!
//! The cart actor is created without dependencies; [`StoreSystem::new`]
//! injects them through `run(context)`:
//!
//! ```rust,ignore
//! let (cart_actor, cart_client) = cart_actor::new(config.channel_buffer);
//! tokio::spawn(cart_actor.run(CartContext { local, remote, orders, delivery, events }));
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Abort auth followers** - they hold cart client clones
//! 2. **Drop the cart client** - closes the actor's channel
//! 3. **Await the actor** - it drains queued requests and logs its final size
//!
//! Remote cart writes already spawned are not awaited; like in a closing
//! browser tab, they land or they don't.
//!
//! ## Observability
//!
//! See the [`tracing`](self::tracing) module for [`setup_tracing`] and what gets logged.

pub mod store_system;
pub mod tracing;

pub use store_system::*;
pub use self::tracing::setup_tracing;
