//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `tracing_subscriber` formatter filtered
//! by `RUST_LOG`. Module paths are hidden (`with_target(false)`); every line
//! carries structured fields instead.
//!
//! ## What Gets Traced
//!
//! - **Actor Lifecycle**: startup and shutdown of the cart actor, with its size
//! - **Session Operations**: create, get, delete and every cart action
//! - **Persistence**: local write failures at `error`, remote write failures
//!   and local/remote divergence at `warn`
//! - **Client Calls**: `#[instrument]` spans on the client methods
//!
//! ## Usage Examples
//!
//! ```bash
//! # Compact logs (default)
//! RUST_LOG=info cargo run
//!
//! # Show action payloads and remote writes
//! RUST_LOG=debug cargo run
//!
//! # Only the cart actor
//! RUST_LOG=food_cart::framework=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**, a signed-in customer adding a dish and checking out:
//!
//! ```text
//! INFO Actor started entity_type="CartSession"
//! INFO Created entity_type="CartSession" id=session_1 size=1
//! INFO Cart loaded session=session_1 user=9f2c.. items=0 version=0
//! INFO checkout: Order stored order=4b1e..
//! INFO Order placed session=session_1 order=4b1e..
//! ```
//!
//! **With `RUST_LOG=debug`** the same run also shows each `Action` with its
//! payload and a `Remote cart written user=.. version=N` line per persist.

/// Installs the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
