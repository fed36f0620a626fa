//! [`ActorEntity`] implementation for [`CartSession`].
//!
//! Every mutation follows the same path: change the in-memory cart, persist
//! it (local now, remote in the background when signed in), then broadcast a
//! [`CartChanged`]. Storage failures never fail the action.

use super::actions::{CartAction, CartActionResult};
use super::context::CartContext;
use super::error::CartError;
use super::events::CartChanged;
use super::persist::{self, RemoteCart};
use crate::framework::ActorEntity;
use crate::model::{CartSession, CustomerDetails, OpenSession, Order, OrderId, SessionId, UserId};
use crate::storage::{keys, set_json};
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};

#[async_trait]
impl ActorEntity for CartSession {
    type Id = SessionId;
    type Create = OpenSession;
    type Action = CartAction;
    type ActionResult = CartActionResult;
    type Context = CartContext;
    type Error = CartError;

    fn from_create_params(id: SessionId, _params: OpenSession) -> Result<Self, CartError> {
        Ok(Self::new(id))
    }

    /// Quotes the page-load delivery charge. The cart starts empty.
    async fn on_create(&mut self, ctx: &CartContext) -> Result<(), CartError> {
        self.delivery = ctx.delivery.page_load.quote("");
        self.store_delivery(ctx);
        debug!(session = %self.id, delivery = self.delivery.amount(), "Session opened");
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: CartAction,
        ctx: &CartContext,
    ) -> Result<CartActionResult, CartError> {
        match action {
            CartAction::AddItem { id, details, qty } => {
                let total_qty = self
                    .cart
                    .add(&id, details, qty)
                    .ok_or(CartError::InvalidQuantity(qty))?;
                debug!(session = %self.id, item = %id, qty = total_qty, "Item added");
                self.commit(ctx);
            }
            CartAction::RemoveItem { id } => {
                if self.cart.remove(&id) {
                    self.commit(ctx);
                }
            }
            CartAction::SetQty { id, qty } => {
                if self.cart.set_qty(&id, qty) {
                    self.commit(ctx);
                } else {
                    debug!(session = %self.id, item = %id, qty, "Quantity unchanged");
                }
            }
            CartAction::LoadForUser { user_id } => {
                self.load_for_user(user_id, ctx).await;
                self.announce(ctx);
            }
            CartAction::ClearOnLogout => {
                self.clear_on_logout(ctx);
                self.announce(ctx);
            }
            CartAction::Persist => self.commit(ctx),
            CartAction::UpdateAddress { address } => {
                self.delivery = ctx.delivery.address.quote(&address);
                self.store_delivery(ctx);
                self.announce(ctx);
            }
            CartAction::Checkout(customer) => {
                let order_id = self.checkout(customer, ctx).await?;
                return Ok(CartActionResult::Placed(order_id));
            }
        }
        Ok(CartActionResult::View(self.view()))
    }
}

impl CartSession {
    fn cart_key(&self) -> String {
        keys::cart_key(self.user.as_ref())
    }

    /// Persist, then broadcast.
    fn commit(&mut self, ctx: &CartContext) {
        self.persist(ctx);
        self.announce(ctx);
    }

    fn persist(&mut self, ctx: &CartContext) {
        self.version += 1;
        let key = self.cart_key();
        if let Err(e) = persist::write_local(ctx.local.as_ref(), &key, &self.cart, self.version) {
            error!(session = %self.id, %key, error = %e, "Local cart write failed");
        }
        if let Some(user) = &self.user {
            persist::spawn_remote_write(
                ctx.remote.clone(),
                user.clone(),
                RemoteCart {
                    cart: self.cart.clone(),
                    version: self.version,
                },
            );
        }
    }

    /// Nobody listening is fine.
    fn announce(&self, ctx: &CartContext) {
        let _ = ctx.events.send(CartChanged::from(&*self));
    }

    fn store_delivery(&self, ctx: &CartContext) {
        if let Err(e) = set_json(ctx.local.as_ref(), keys::DELIVERY_CHARGES, &self.delivery) {
            error!(session = %self.id, error = %e, "Storing delivery charge failed");
        }
    }

    /// Adopts the remote cart of `user_id`, falling back to the local copy
    /// when the backend cannot be read. The result is written locally only.
    ///
    /// A switch straight from one user to another signs the first one out
    /// before loading, whether or not a sign-out was seen in between.
    async fn load_for_user(&mut self, user_id: UserId, ctx: &CartContext) {
        if self.user.as_ref().is_some_and(|previous| *previous != user_id) {
            self.clear_on_logout(ctx);
        }
        let key = keys::cart_key(Some(&user_id));
        let local = match persist::read_local(ctx.local.as_ref(), &key) {
            Ok(local) => local,
            Err(e) => {
                warn!(session = %self.id, %key, error = %e, "Local cart unreadable, ignoring it");
                persist::LocalCart::default()
            }
        };

        match persist::read_remote(ctx.remote.as_ref(), &user_id).await {
            Ok(Some(remote)) => {
                if let Some(local_version) = local.version.filter(|v| *v != remote.version) {
                    warn!(
                        session = %self.id,
                        user = %user_id,
                        local_version,
                        remote_version = remote.version,
                        "Local cart diverged from remote, adopting remote"
                    );
                }
                self.cart = remote.cart;
                self.version = remote.version;
            }
            Ok(None) => {
                debug!(session = %self.id, user = %user_id, "No remote cart, starting empty");
                self.cart.clear();
                self.version = 0;
            }
            Err(e) => {
                warn!(
                    session = %self.id,
                    user = %user_id,
                    error = %e,
                    "Remote cart read failed, using local copy"
                );
                self.cart = local.cart;
                self.version = local.version.unwrap_or(0);
            }
        }

        if let Err(e) = persist::write_local(ctx.local.as_ref(), &key, &self.cart, self.version) {
            error!(session = %self.id, %key, error = %e, "Local cart write failed");
        }
        info!(
            session = %self.id,
            user = %user_id,
            items = self.cart.item_count(),
            version = self.version,
            "Cart loaded"
        );
        self.user = Some(user_id);
    }

    fn clear_on_logout(&mut self, ctx: &CartContext) {
        let key = self.cart_key();
        self.cart.clear();
        if let Err(e) = persist::clear_local(ctx.local.as_ref(), &key) {
            error!(session = %self.id, %key, error = %e, "Clearing local cart failed");
        }
        if let Some(user) = self.user.take() {
            info!(session = %self.id, %user, "Signed out, cart cleared");
        }
        self.version = 0;
    }

    async fn checkout(
        &mut self,
        customer: CustomerDetails,
        ctx: &CartContext,
    ) -> Result<OrderId, CartError> {
        let missing = customer.missing_fields();
        if !missing.is_empty() {
            return Err(CartError::InvalidCustomer(missing.join(", ")));
        }
        if self.cart.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let order = Order::pending(&customer, self.cart.items().to_vec(), self.delivery, Utc::now());
        let order_id = ctx.orders.place(order).await.map_err(|e| {
            error!(session = %self.id, error = %e, "Placing order failed");
            CartError::Checkout(e.to_string())
        })?;

        let key = self.cart_key();
        self.cart.clear();
        self.version += 1;
        for stale in [key.as_str(), keys::DELIVERY_CHARGES] {
            if let Err(e) = ctx.local.remove_item(stale) {
                error!(session = %self.id, key = stale, error = %e, "Clearing local entry failed");
            }
        }
        if let Err(e) = ctx
            .local
            .set_item(&keys::version_key(&key), &self.version.to_string())
        {
            error!(session = %self.id, %key, error = %e, "Local cart write failed");
        }
        if let Some(user) = &self.user {
            persist::spawn_remote_write(
                ctx.remote.clone(),
                user.clone(),
                RemoteCart {
                    cart: self.cart.clone(),
                    version: self.version,
                },
            );
        }

        info!(session = %self.id, order = %order_id, "Order placed");
        self.announce(ctx);
        Ok(order_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DocumentStore, MemoryBackend};
    use crate::clients::OrderClient;
    use crate::model::{DeliveryRules, ItemDetails};
    use crate::storage::{LocalStore, MemoryStore};
    use std::sync::Arc;
    use tokio::sync::broadcast;

    struct Harness {
        ctx: CartContext,
        local: Arc<MemoryStore>,
        backend: Arc<MemoryBackend>,
        events: broadcast::Receiver<CartChanged>,
    }

    fn harness() -> Harness {
        let local = Arc::new(MemoryStore::new());
        let backend = Arc::new(MemoryBackend::new());
        let (events, receiver) = broadcast::channel(16);
        let ctx = CartContext {
            local: local.clone(),
            remote: backend.clone(),
            orders: OrderClient::new(backend.clone()),
            delivery: DeliveryRules::flat(50.0),
            events,
        };
        Harness {
            ctx,
            local,
            backend,
            events: receiver,
        }
    }

    fn samosa() -> ItemDetails {
        ItemDetails {
            image: String::new(),
            name: "Samosa".into(),
            price: 40.0,
            serving: "1".into(),
        }
    }

    fn add(id: &str, qty: u32) -> CartAction {
        CartAction::AddItem {
            id: id.into(),
            details: samosa(),
            qty,
        }
    }

    async fn opened(h: &Harness) -> CartSession {
        let mut session = CartSession::from_create_params(SessionId(1), OpenSession).unwrap();
        session.on_create(&h.ctx).await.unwrap();
        session
    }

    #[tokio::test]
    async fn open_stores_the_page_load_charge() {
        let h = harness();
        let session = opened(&h).await;

        assert_eq!(session.delivery.amount(), 50.0);
        assert_eq!(h.local.get_item("deliveryCharges").unwrap().as_deref(), Some("50.0"));
        assert!(session.cart.is_empty());
    }

    #[tokio::test]
    async fn anonymous_mutations_persist_locally_and_announce() {
        let mut h = harness();
        let mut session = opened(&h).await;

        session.handle_action(add("s", 2), &h.ctx).await.unwrap();

        assert_eq!(session.version, 1);
        let stored = persist::read_local(h.local.as_ref(), "cart-guest").unwrap();
        assert_eq!(stored.cart, session.cart);
        assert_eq!(stored.version, Some(1));

        let event = h.events.recv().await.unwrap();
        assert_eq!(event.item_count, 2);
        assert_eq!(event.total, 130.0);
        assert!(h.backend.list("carts").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_op_actions_do_not_persist_or_announce() {
        let mut h = harness();
        let mut session = opened(&h).await;
        session.handle_action(add("s", 1), &h.ctx).await.unwrap();
        h.events.recv().await.unwrap();

        session
            .handle_action(CartAction::RemoveItem { id: "missing".into() }, &h.ctx)
            .await
            .unwrap();
        session
            .handle_action(CartAction::SetQty { id: "s".into(), qty: 0 }, &h.ctx)
            .await
            .unwrap();

        assert_eq!(session.version, 1);
        assert!(h.events.try_recv().is_err());
    }

    #[tokio::test]
    async fn zero_quantity_add_is_rejected() {
        let h = harness();
        let mut session = opened(&h).await;

        let err = session.handle_action(add("s", 0), &h.ctx).await.unwrap_err();
        assert_eq!(err, CartError::InvalidQuantity(0));
        assert_eq!(session.version, 0);
    }

    #[tokio::test]
    async fn load_prefers_remote_and_records_its_version() {
        let h = harness();
        let mut remote_cart = crate::model::Cart::new();
        remote_cart.add("r", samosa(), 3).unwrap();
        persist::spawn_remote_write(
            h.backend.clone(),
            UserId::from("u1"),
            RemoteCart {
                cart: remote_cart.clone(),
                version: 7,
            },
        )
        .await
        .unwrap();
        persist::write_local(h.local.as_ref(), "cart-u1", &crate::model::Cart::new(), 2).unwrap();

        let mut session = opened(&h).await;
        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();

        assert_eq!(session.cart, remote_cart);
        assert_eq!(session.version, 7);
        let local = persist::read_local(h.local.as_ref(), "cart-u1").unwrap();
        assert_eq!(local.cart, remote_cart);
        assert_eq!(local.version, Some(7));
    }

    #[tokio::test]
    async fn load_falls_back_to_local_when_remote_is_down() {
        let h = harness();
        let mut local_cart = crate::model::Cart::new();
        local_cart.add("l", samosa(), 1).unwrap();
        persist::write_local(h.local.as_ref(), "cart-u1", &local_cart, 3).unwrap();
        h.backend.set_offline(true);

        let mut session = opened(&h).await;
        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();

        assert_eq!(session.cart, local_cart);
        assert_eq!(session.version, 3);
        assert!(session.is_authenticated());
    }

    #[tokio::test]
    async fn switching_users_clears_the_previous_users_local_cart() {
        let h = harness();
        let mut session = opened(&h).await;
        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();
        session.handle_action(add("s", 2), &h.ctx).await.unwrap();
        assert!(h.local.get_item("cart-u1").unwrap().is_some());

        session
            .handle_action(CartAction::LoadForUser { user_id: "u2".into() }, &h.ctx)
            .await
            .unwrap();

        assert_eq!(session.user, Some(UserId::from("u2")));
        assert!(session.cart.is_empty());
        assert_eq!(h.local.get_item("cart-u1").unwrap(), None);
        assert_eq!(h.local.get_item("cart-u1:version").unwrap(), None);
        assert!(h.local.get_item("cart-u2").unwrap().is_some());
    }

    #[tokio::test]
    async fn reloading_the_same_user_keeps_the_local_cart() {
        let h = harness();
        let mut session = opened(&h).await;
        h.backend.set_offline(true);
        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();
        session.handle_action(add("s", 2), &h.ctx).await.unwrap();

        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();

        assert_eq!(session.cart.item_count(), 2);
        assert!(h.local.get_item("cart-u1").unwrap().is_some());
    }

    #[tokio::test]
    async fn logout_clears_local_copy_only() {
        let h = harness();
        let mut session = opened(&h).await;
        session
            .handle_action(CartAction::LoadForUser { user_id: "u1".into() }, &h.ctx)
            .await
            .unwrap();
        session.handle_action(add("s", 1), &h.ctx).await.unwrap();
        // Let the background write land before logging out.
        tokio::task::yield_now().await;
        let remote_before = persist::read_remote(h.backend.as_ref(), &"u1".into()).await.unwrap();

        session.handle_action(CartAction::ClearOnLogout, &h.ctx).await.unwrap();

        assert!(session.cart.is_empty());
        assert!(!session.is_authenticated());
        assert_eq!(h.local.get_item("cart-u1").unwrap(), None);
        assert_eq!(h.local.get_item("cart-u1:version").unwrap(), None);
        let remote_after = persist::read_remote(h.backend.as_ref(), &"u1".into()).await.unwrap();
        assert_eq!(remote_before, remote_after);
    }

    #[tokio::test]
    async fn address_requotes_delivery() {
        let mut h = harness();
        h.ctx.delivery = DeliveryRules::default();
        let mut session = opened(&h).await;

        let result = session
            .handle_action(
                CartAction::UpdateAddress {
                    address: "Block 7".into(),
                },
                &h.ctx,
            )
            .await
            .unwrap();

        let CartActionResult::View(view) = result else {
            panic!("expected a view");
        };
        assert_eq!(view.delivery.amount(), 364.0);
        assert_eq!(h.local.get_item("deliveryCharges").unwrap().as_deref(), Some("364.0"));
    }

    #[tokio::test]
    async fn checkout_validates_before_touching_the_backend() {
        let h = harness();
        let mut session = opened(&h).await;
        let customer = CustomerDetails {
            name: "Hina".into(),
            contact: "0300".into(),
            address: "Clifton".into(),
        };

        let err = session
            .handle_action(CartAction::Checkout(customer.clone()), &h.ctx)
            .await
            .unwrap_err();
        assert_eq!(err, CartError::EmptyCart);

        session.handle_action(add("s", 1), &h.ctx).await.unwrap();
        let blank = CustomerDetails {
            name: " ".into(),
            ..customer
        };
        let err = session
            .handle_action(CartAction::Checkout(blank), &h.ctx)
            .await
            .unwrap_err();
        assert_eq!(err, CartError::InvalidCustomer("name".into()));
        assert!(h.backend.list("orders").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_checkout_keeps_the_cart() {
        let h = harness();
        let mut session = opened(&h).await;
        session.handle_action(add("s", 2), &h.ctx).await.unwrap();
        h.backend.set_offline(true);

        let err = session
            .handle_action(
                CartAction::Checkout(CustomerDetails {
                    name: "Hina".into(),
                    contact: "0300".into(),
                    address: "Clifton".into(),
                }),
                &h.ctx,
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CartError::Checkout(_)));
        assert_eq!(session.cart.item_count(), 2);
        assert!(h.local.get_item("cart-guest").unwrap().is_some());
    }
}
