use crate::cart_actor::{CartAction, CartActionResult, CartError};
use crate::clients::actor_client::ActorClient;
use crate::framework::{FrameworkError, ResourceClient};
use crate::model::{
    CartSession, CartView, CustomerDetails, ItemDetails, OpenSession, OrderId, SessionId, UserId,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// The dispatch interface UI code uses to drive a cart session.
///
/// [`dispatch`](Self::dispatch) is what an event callback calls: it queues
/// the action and returns. The named methods wait for the action and return
/// the resulting [`CartView`].
#[derive(Clone)]
pub struct CartClient {
    inner: ResourceClient<CartSession>,
}

#[async_trait]
impl ActorClient<CartSession> for CartClient {
    type Error = CartError;

    fn inner(&self) -> &ResourceClient<CartSession> {
        &self.inner
    }

    /// Entity errors come back as the [`CartError`] the session raised.
    fn map_error(e: FrameworkError) -> CartError {
        match e {
            FrameworkError::EntityError(inner) => match inner.downcast::<CartError>() {
                Ok(cart_error) => *cart_error,
                Err(other) => CartError::ActorCommunicationError(other.to_string()),
            },
            FrameworkError::NotFound(id) => CartError::SessionNotFound(id),
            other => CartError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CartClient {
    pub fn new(inner: ResourceClient<CartSession>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn open_session(&self) -> Result<SessionId, CartError> {
        debug!("Sending request");
        self.inner.create(OpenSession).await.map_err(Self::map_error)
    }

    /// Drops the session. Its stored carts are left alone.
    pub async fn close_session(&self, session: SessionId) -> Result<(), CartError> {
        self.delete(session).await
    }

    /// Fire-and-forget. Only fails when the cart actor has stopped.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, session: SessionId, action: CartAction) -> Result<(), CartError> {
        self.inner
            .notify(session, action)
            .await
            .map_err(Self::map_error)
    }

    pub async fn view(&self, session: SessionId) -> Result<CartView, CartError> {
        match self.get(session).await? {
            Some(state) => Ok(state.view()),
            None => Err(CartError::SessionNotFound(session.to_string())),
        }
    }

    #[instrument(skip(self, details))]
    pub async fn add_item(
        &self,
        session: SessionId,
        id: &str,
        details: ItemDetails,
        qty: u32,
    ) -> Result<CartView, CartError> {
        self.view_of(
            session,
            CartAction::AddItem {
                id: id.to_string(),
                details,
                qty,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn remove_item(&self, session: SessionId, id: &str) -> Result<CartView, CartError> {
        self.view_of(session, CartAction::RemoveItem { id: id.to_string() })
            .await
    }

    #[instrument(skip(self))]
    pub async fn set_qty(
        &self,
        session: SessionId,
        id: &str,
        qty: i64,
    ) -> Result<CartView, CartError> {
        self.view_of(
            session,
            CartAction::SetQty {
                id: id.to_string(),
                qty,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn load_for_user(
        &self,
        session: SessionId,
        user_id: UserId,
    ) -> Result<CartView, CartError> {
        self.view_of(session, CartAction::LoadForUser { user_id }).await
    }

    #[instrument(skip(self))]
    pub async fn clear_on_logout(&self, session: SessionId) -> Result<CartView, CartError> {
        self.view_of(session, CartAction::ClearOnLogout).await
    }

    pub async fn persist(&self, session: SessionId) -> Result<CartView, CartError> {
        self.view_of(session, CartAction::Persist).await
    }

    #[instrument(skip(self))]
    pub async fn update_address(
        &self,
        session: SessionId,
        address: &str,
    ) -> Result<CartView, CartError> {
        self.view_of(
            session,
            CartAction::UpdateAddress {
                address: address.to_string(),
            },
        )
        .await
    }

    #[instrument(skip(self, customer))]
    pub async fn checkout(
        &self,
        session: SessionId,
        customer: CustomerDetails,
    ) -> Result<OrderId, CartError> {
        debug!(?customer, "checkout called");
        match self.act(session, CartAction::Checkout(customer)).await? {
            CartActionResult::Placed(order_id) => Ok(order_id),
            other => Err(CartError::UnexpectedResult(format!("{other:?}"))),
        }
    }

    async fn act(
        &self,
        session: SessionId,
        action: CartAction,
    ) -> Result<CartActionResult, CartError> {
        debug!("Sending request");
        self.inner
            .perform_action(session, action)
            .await
            .map_err(Self::map_error)
    }

    async fn view_of(&self, session: SessionId, action: CartAction) -> Result<CartView, CartError> {
        match self.act(session, action).await? {
            CartActionResult::View(view) => Ok(view),
            other => Err(CartError::UnexpectedResult(format!("{other:?}"))),
        }
    }
}
