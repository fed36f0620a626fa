use crate::backend::{AuthProvider, Backend, BackendError};
use crate::cart_actor::{CartChanged, CartContext, CartError};
use crate::clients::{
    dashboard_stats, AccountClient, CartClient, CatalogClient, DashboardStats, OrderClient,
};
use crate::config::AppConfig;
use crate::model::{AuthUser, SessionId};
use crate::storage::LocalStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

/// Capacity of the `CartChanged` broadcast; slow listeners skip ahead.
const EVENT_BUFFER: usize = 64;

/// Wires the storefront together and owns its background tasks.
///
/// `StoreSystem` is responsible for:
/// - **Lifecycle Management**: starting the cart actor and stopping it again
/// - **Dependency Wiring**: handing storage, backend and the order desk to the
///   cart actor through its context
/// - **Auth Following**: one task per open session that turns sign-in and
///   sign-out into `LoadForUser` and `ClearOnLogout`
///
/// # Example
///
/// ```ignore
/// let backend = Arc::new(MemoryBackend::new());
/// let mut system = StoreSystem::new(Backend::memory(&backend), Arc::new(MemoryStore::new()), &AppConfig::default());
///
/// let session = system.open_session().await?;
/// system.cart_client.add_item(session, &dish.id, dish.cart_details(), 1).await?;
///
/// system.shutdown().await?;
/// ```
pub struct StoreSystem {
    pub cart_client: CartClient,
    pub orders: OrderClient,
    pub catalog: CatalogClient,
    pub accounts: AccountClient,

    backend: Backend,
    events: broadcast::Sender<CartChanged>,
    /// Actor tasks, awaited on shutdown.
    handles: Vec<JoinHandle<()>>,
    /// One auth follower per open session, aborted when it closes.
    followers: HashMap<SessionId, JoinHandle<()>>,
}

impl StoreSystem {
    /// Starts the cart actor. Must be called inside a Tokio runtime.
    pub fn new(backend: Backend, local: Arc<dyn LocalStore>, config: &AppConfig) -> Self {
        let orders = OrderClient::new(backend.documents.clone());
        let catalog = CatalogClient::new(backend.documents.clone(), backend.blobs.clone());
        let accounts = AccountClient::new(backend.auth.clone(), backend.documents.clone());
        let (events, _) = broadcast::channel(EVENT_BUFFER);

        let (cart_actor, cart_client) = crate::cart_actor::new(config.channel_buffer);
        let context = CartContext {
            local,
            remote: backend.documents.clone(),
            orders: orders.clone(),
            delivery: config.delivery,
            events: events.clone(),
        };
        let cart_handle = tokio::spawn(cart_actor.run(context));

        Self {
            cart_client,
            orders,
            catalog,
            accounts,
            backend,
            events,
            handles: vec![cart_handle],
            followers: HashMap::new(),
        }
    }

    /// Opens a cart session that follows the auth state from now on.
    ///
    /// The current state is applied right away: a signed-in user gets their
    /// cart loaded, a signed-out tab starts from a cleared guest cart.
    pub async fn open_session(&mut self) -> Result<SessionId, CartError> {
        let session = self.cart_client.open_session().await?;
        let mut auth = self.backend.auth.subscribe();
        let current = auth.borrow_and_update().clone();
        apply_auth(&self.cart_client, session, current).await?;

        let follower = tokio::spawn(follow_auth(self.cart_client.clone(), session, auth));
        self.followers.insert(session, follower);
        info!(%session, "Session opened");
        Ok(session)
    }

    /// Stops the session's auth follower, then closes the session.
    pub async fn close_session(&mut self, session: SessionId) -> Result<(), CartError> {
        if let Some(follower) = self.followers.remove(&session) {
            follower.abort();
            stopped(follower).await;
        }
        self.cart_client.close_session(session).await?;
        info!(%session, "Session closed");
        Ok(())
    }

    /// Whether an auth follower is running for `session`.
    pub fn is_following(&self, session: SessionId) -> bool {
        self.followers
            .get(&session)
            .is_some_and(|follower| !follower.is_finished())
    }

    /// Receives a [`CartChanged`] after every cart change of every session.
    pub fn subscribe(&self) -> broadcast::Receiver<CartChanged> {
        self.events.subscribe()
    }

    pub fn auth(&self) -> &Arc<dyn AuthProvider> {
        &self.backend.auth
    }

    pub async fn dashboard_stats(&self) -> Result<DashboardStats, BackendError> {
        dashboard_stats(self.backend.documents.as_ref()).await
    }

    /// Gracefully shuts down the system.
    ///
    /// Followers hold cart clients, so they are aborted first. Dropping the
    /// remaining clients then closes the cart actor's channel and its task
    /// ends after draining what was already queued.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down store...");

        for follower in self.followers.values() {
            follower.abort();
        }
        for (_, follower) in self.followers {
            stopped(follower).await;
        }

        drop(self.cart_client);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("Store shutdown complete.");
        Ok(())
    }
}

/// Waits for an aborted follower to finish.
async fn stopped(follower: JoinHandle<()>) {
    if let Err(e) = follower.await {
        if !e.is_cancelled() {
            warn!("Auth follower failed: {:?}", e);
        }
    }
}

async fn apply_auth(
    cart: &CartClient,
    session: SessionId,
    user: Option<AuthUser>,
) -> Result<(), CartError> {
    match user {
        Some(user) => cart.load_for_user(session, user.uid).await?,
        None => cart.clear_on_logout(session).await?,
    };
    Ok(())
}

/// Applies every auth change to `session` until the session or the auth
/// provider goes away.
async fn follow_auth(
    cart: CartClient,
    session: SessionId,
    mut auth: watch::Receiver<Option<AuthUser>>,
) {
    while auth.changed().await.is_ok() {
        let user = auth.borrow_and_update().clone();
        match apply_auth(&cart, session, user).await {
            Ok(()) => {}
            Err(CartError::SessionNotFound(_) | CartError::ActorCommunicationError(_)) => {
                debug!(%session, "Session gone, auth follower stopping");
                return;
            }
            Err(e) => warn!(%session, error = %e, "Applying auth change failed"),
        }
    }
    debug!(%session, "Auth provider gone, auth follower stopping");
}
