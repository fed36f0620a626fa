//! # Generic Messages
//!
//! The requests a [`ResourceClient`](crate::framework::ResourceClient) sends to
//! its [`ResourceActor`](crate::framework::ResourceActor).

use crate::framework::entity::ActorEntity;
use crate::framework::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Message type sent to the actor.
///
/// - **Create**: open a new entity from [`ActorEntity::Create`].
/// - **Get**: read a snapshot of the entity.
/// - **Delete**: close the entity.
/// - **Action**: run an [`ActorEntity::Action`] and wait for its result.
/// - **Notify**: run an action without waiting. This is what event callbacks
///   use: the outcome is logged by the actor and nobody is told.
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
    Notify {
        id: T::Id,
        action: T::Action,
    },
}
