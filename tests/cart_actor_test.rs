use food_cart::backend::{DocumentStore, MemoryBackend};
use food_cart::cart_actor::persist::{RemoteCart, CARTS};
use food_cart::cart_actor::{CartAction, CartChanged, CartContext, CartError};
use food_cart::clients::{CartClient, OrderClient};
use food_cart::model::{CustomerDetails, DeliveryRules, ItemDetails, SessionId, UserId};
use food_cart::storage::{LocalStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

/// Real cart actor over an in-memory backend and local store.
///
/// Pattern 2: Actor + injected context
/// - Real cart actor (tests the reconciliation rules end to end)
/// - MemoryBackend stands in for the hosted services and can go offline
struct Fixture {
    cart: CartClient,
    local: Arc<MemoryStore>,
    backend: Arc<MemoryBackend>,
    events: broadcast::Receiver<CartChanged>,
    handle: JoinHandle<()>,
}

fn start() -> Fixture {
    let local = Arc::new(MemoryStore::new());
    let backend = Arc::new(MemoryBackend::new());
    let (events, receiver) = broadcast::channel(64);
    let (actor, cart) = food_cart::cart_actor::new(16);
    let handle = tokio::spawn(actor.run(CartContext {
        local: local.clone(),
        remote: backend.clone(),
        orders: OrderClient::new(backend.clone()),
        delivery: DeliveryRules::flat(50.0),
        events,
    }));
    Fixture {
        cart,
        local,
        backend,
        events: receiver,
        handle,
    }
}

impl Fixture {
    async fn stop(self) {
        drop(self.cart);
        self.handle.await.unwrap();
    }

    async fn remote_cart(&self, uid: &str) -> Option<RemoteCart> {
        self.backend
            .get(CARTS, uid)
            .await
            .unwrap()
            .map(|doc| food_cart::backend::decode(&doc).unwrap())
    }

    /// Polls `carts/<uid>` until `check` holds; remote writes land from
    /// detached tasks.
    async fn remote_eventually(&self, uid: &str, check: impl Fn(&RemoteCart) -> bool) {
        let polled = tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                if self.remote_cart(uid).await.as_ref().is_some_and(&check) {
                    return;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await;
        assert!(polled.is_ok(), "remote cart of {uid} never matched");
    }
}

fn dish(name: &str, price: f64) -> ItemDetails {
    ItemDetails {
        image: String::new(),
        name: name.to_string(),
        price,
        serving: "1".to_string(),
    }
}

fn customer() -> CustomerDetails {
    CustomerDetails {
        name: "Bilal".to_string(),
        contact: "0300-1234567".to_string(),
        address: "Block 7, Clifton".to_string(),
    }
}

#[tokio::test]
async fn test_totals_follow_add_and_remove() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();

    let view = f.cart.add_item(session, "a", dish("Biryani", 100.0), 2).await.unwrap();
    assert_eq!(view.total, 250.0);

    let view = f.cart.add_item(session, "a", dish("Biryani", 100.0), 1).await.unwrap();
    assert_eq!(view.items[0].qty, 3);
    assert_eq!(view.total, 350.0);

    let view = f.cart.remove_item(session, "a").await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.total, 50.0);

    f.stop().await;
}

#[tokio::test]
async fn test_guest_cart_lives_in_local_storage_only() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();

    f.cart.add_item(session, "kheer", dish("Kheer", 120.0), 1).await.unwrap();

    let stored = f.local.get_item("cart-guest").unwrap().unwrap();
    assert!(stored.contains("Kheer"));
    assert!(f.backend.list(CARTS).await.unwrap().is_empty());

    f.stop().await;
}

#[tokio::test]
async fn test_signed_in_changes_reach_the_remote_cart() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();
    f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();

    f.cart.add_item(session, "naan", dish("Naan", 30.0), 4).await.unwrap();
    let view = f.cart.set_qty(session, "naan", 2).await.unwrap();

    f.remote_eventually("u1", |remote| remote.version == view.version)
        .await;
    let remote = f.remote_cart("u1").await.unwrap();
    assert_eq!(remote.cart.items()[0].qty, 2);
    assert!(f.local.get_item("cart-u1").unwrap().is_some());

    f.stop().await;
}

#[tokio::test]
async fn test_offline_backend_does_not_fail_mutations() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();
    f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();

    f.backend.set_offline(true);
    let view = f.cart.add_item(session, "naan", dish("Naan", 30.0), 1).await.unwrap();
    assert_eq!(view.item_count, 1);
    assert!(f.local.get_item("cart-u1").unwrap().unwrap().contains("Naan"));

    // Let the detached write fail before coming back online
    tokio::time::sleep(Duration::from_millis(20)).await;
    f.backend.set_offline(false);
    assert_eq!(f.remote_cart("u1").await, None);

    f.stop().await;
}

#[tokio::test]
async fn test_sign_in_adopts_remote_cart_over_guest_cart() {
    let f = start();
    let remote = RemoteCart {
        cart: serde_json::from_str(r#"[{"id":"k","name":"Karahi","price":700,"qty":1}]"#).unwrap(),
        version: 7,
    };
    f.backend
        .set(CARTS, "u1", food_cart::backend::encode(&remote).unwrap())
        .await
        .unwrap();

    let session = f.cart.open_session().await.unwrap();
    f.cart.add_item(session, "naan", dish("Naan", 30.0), 1).await.unwrap();

    let view = f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].name, "Karahi");
    assert_eq!(view.version, 7);
    assert_eq!(f.local.get_item("cart-u1:version").unwrap().as_deref(), Some("7"));

    f.stop().await;
}

#[tokio::test]
async fn test_logout_keeps_the_remote_cart() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();
    f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();
    let view = f.cart.add_item(session, "naan", dish("Naan", 30.0), 2).await.unwrap();
    f.remote_eventually("u1", |remote| remote.version == view.version)
        .await;

    let view = f.cart.clear_on_logout(session).await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(view.user, None);
    assert_eq!(f.local.get_item("cart-u1").unwrap(), None);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(f.remote_cart("u1").await.unwrap().cart.item_count(), 2);

    // Signing back in restores it
    let view = f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();
    assert_eq!(view.item_count, 2);

    f.stop().await;
}

#[tokio::test]
async fn test_checkout_places_order_and_empties_both_copies() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();
    f.cart.load_for_user(session, UserId::from("u1")).await.unwrap();
    f.cart.add_item(session, "a", dish("Biryani", 100.0), 2).await.unwrap();

    let order_id = f.cart.checkout(session, customer()).await.unwrap();

    let orders = OrderClient::new(f.backend.clone());
    let order = orders.get(&order_id).await.unwrap().unwrap();
    assert_eq!(order.order_amount, 200.0);
    assert_eq!(order.delivery_charges, 50.0);
    assert_eq!(order.total_amount, 250.0);
    assert_eq!(order.customer_name, "Bilal");

    let view = f.cart.view(session).await.unwrap();
    assert!(view.items.is_empty());
    assert_eq!(f.local.get_item("cart-u1").unwrap(), None);
    assert_eq!(f.local.get_item("deliveryCharges").unwrap(), None);

    f.remote_eventually("u1", |remote| {
        remote.cart.is_empty() && remote.version == view.version
    })
    .await;

    f.stop().await;
}

#[tokio::test]
async fn test_checkout_errors_leave_the_cart_alone() {
    let f = start();
    let session = f.cart.open_session().await.unwrap();

    let result = f.cart.checkout(session, customer()).await;
    assert_eq!(result, Err(CartError::EmptyCart));

    f.cart.add_item(session, "a", dish("Biryani", 100.0), 1).await.unwrap();
    let mut incomplete = customer();
    incomplete.contact = "  ".to_string();
    let result = f.cart.checkout(session, incomplete).await;
    assert!(matches!(result, Err(CartError::InvalidCustomer(fields)) if fields.contains("contact")));

    f.backend.set_offline(true);
    let result = f.cart.checkout(session, customer()).await;
    assert!(matches!(result, Err(CartError::Checkout(_))));
    assert_eq!(f.cart.view(session).await.unwrap().item_count, 1);

    f.stop().await;
}

#[tokio::test]
async fn test_dispatch_is_applied_in_order() {
    let mut f = start();
    let session = f.cart.open_session().await.unwrap();

    f.cart
        .dispatch(
            session,
            CartAction::AddItem {
                id: "a".to_string(),
                details: dish("Biryani", 100.0),
                qty: 1,
            },
        )
        .await
        .unwrap();
    f.cart
        .dispatch(session, CartAction::SetQty { id: "a".to_string(), qty: 5 })
        .await
        .unwrap();

    let view = f.cart.view(session).await.unwrap();
    assert_eq!(view.item_count, 5);

    let first = f.events.recv().await.unwrap();
    let second = f.events.recv().await.unwrap();
    assert_eq!((first.item_count, second.item_count), (1, 5));
    assert!(second.version > first.version);

    f.stop().await;
}

#[tokio::test]
async fn test_sessions_are_independent_and_closable() {
    let f = start();
    let first = f.cart.open_session().await.unwrap();
    let second = f.cart.open_session().await.unwrap();
    assert_ne!(first, second);

    f.cart.add_item(first, "a", dish("Biryani", 100.0), 1).await.unwrap();
    assert_eq!(f.cart.view(second).await.unwrap().item_count, 0);

    f.cart.close_session(first).await.unwrap();
    let result = f.cart.view(first).await;
    assert!(matches!(result, Err(CartError::SessionNotFound(_))));

    let missing = f.cart.view(SessionId(999)).await;
    assert!(matches!(missing, Err(CartError::SessionNotFound(_))));

    f.stop().await;
}
