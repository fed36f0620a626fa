//! # Food Cart
//!
//! > **The cart and order plumbing of a food-ordering storefront.**
//!
//! The storefront is a thin client over a hosted document database, a blob
//! store and an auth service. The one piece of real state is the shopping
//! cart: it lives in memory per browser tab, is mirrored to local device
//! storage, and follows the signed-in user to a remote `carts/<uid>` document.
//!
//! ## Core Concepts
//!
//! ### One actor, many sessions
//! Every tab is a [`CartSession`](model::CartSession) owned by a single
//! [`ResourceActor`](framework::ResourceActor). The actor handles one request
//! at a time, which gives the cart the same ordering guarantees as a browser
//! event loop: an `AddItem` never interleaves with a sign-in load.
//!
//! ### Dispatch, don't mutate
//! UI code never touches a session. It sends typed
//! [`CartAction`](cart_actor::CartAction)s through the
//! [`CartClient`](clients::CartClient), either fire-and-forget
//! ([`dispatch`](clients::CartClient::dispatch)) or awaiting the new
//! [`CartView`](model::CartView). Badge counters listen for
//! [`CartChanged`](cart_actor::CartChanged) on a broadcast channel.
//!
//! ### Local first, remote best-effort
//! Each change bumps a version and is written to local storage before the
//! action returns. Signed-in carts are also upserted remotely from a detached
//! task; a failed remote write is logged and dropped. On the next sign-in the
//! remote copy wins, and a version mismatch is logged.
//!
//! ## Architecture Notes
//!
//! ### 1. Type-Safe Error Handling
//! Each concern has its own error enum ([`CartError`](cart_actor::CartError),
//! [`BackendError`](backend::BackendError), [`OrderError`](clients::OrderError), ...).
//! The cart client unboxes entity errors, so callers match on `CartError`
//! directly.
//!
//! ### 2. Async Context Injection
//! Storage, backend and the order desk reach the cart actor through its
//! `Context`, injected by `run()` in [`StoreSystem::new`](lifecycle::StoreSystem::new).
//!
//! ### 3. Observability
//! `tracing` everywhere, with structured fields. See [`lifecycle::tracing`].
//!
//! ## Module Tour
//!
//! ### 1. The Engine ([`framework`])
//! The generic sequential actor, its client, and mocks for testing clients.
//!
//! ### 2. The Cart ([`cart_actor`], [`model`])
//! Cart rules, delivery charges, session state and how both copies are kept.
//!
//! ### 3. The Interface ([`clients`])
//! [`CartClient`](clients::CartClient) for tabs; [`OrderClient`](clients::OrderClient),
//! [`CatalogClient`](clients::CatalogClient) and [`AccountClient`](clients::AccountClient)
//! for the order desk, menu admin and accounts.
//!
//! ### 4. The Outside World ([`backend`], [`storage`])
//! Traits for the hosted services and device storage, with in-memory and
//! file implementations.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! [`StoreSystem`](lifecycle::StoreSystem) wires everything, follows auth
//! state per session, and shuts down cleanly.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run the demo with info logs
//! RUST_LOG=info cargo run
//!
//! # Run the tests
//! cargo test
//! ```

pub mod backend;
pub mod cart_actor;
pub mod clients;
pub mod config;
pub mod framework;
pub mod lifecycle;
pub mod model;
pub mod storage;
