//! # ActorEntity Trait
//!
//! The contract every actor-managed resource implements. In this crate the
//! only entity is the [`CartSession`](crate::model::CartSession), but the
//! actor loop is written against the trait so it stays free of cart logic.
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`] runs once after the entity is built.
//! - [`ActorEntity::on_delete`] runs right before the entity is dropped.
//!
//! Both default to `Ok(())`.

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by a
/// [`ResourceActor`](crate::framework::ResourceActor).
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can talk to the backend. The `Context`
/// associated type is injected into every hook by `run()`, which lets the
/// lifecycle layer bind storage handles after the actor was created.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier, generated by the actor from a `u32` counter.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug + From<u32>;

    /// The data required to open a new instance.
    type Create: Send + Sync + Debug;

    /// Enum of the operations the entity understands (e.g. `AddItem`).
    type Action: Send + Sync + Debug;

    /// The result type returned by actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    type Context: Send + Sync;

    /// One error enum per entity; the actor boxes it into
    /// [`FrameworkError::EntityError`](crate::framework::FrameworkError::EntityError).
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the entity from the generated ID and the payload.
    /// Called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Called after the entity is built and before it is stored.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called immediately before the entity is removed.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Handle one action. The actor never runs two of these concurrently for
    /// the same entity.
    async fn handle_action(
        &mut self,
        action: Self::Action,
        ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
