use food_cart::backend::{no_progress, Backend, DocumentStore, MemoryBackend};
use food_cart::cart_actor::persist::CARTS;
use food_cart::clients::CartClient;
use food_cart::config::AppConfig;
use food_cart::lifecycle::StoreSystem;
use food_cart::model::{
    CartView, CustomerDetails, DeliveryRules, NewDish, NewRestaurant, OrderStatus, Registration,
    SessionId, UserId,
};
use food_cart::storage::{LocalStore, MemoryStore};
use std::sync::Arc;
use std::time::Duration;

fn system() -> (StoreSystem, Arc<MemoryBackend>, Arc<MemoryStore>) {
    let backend = Arc::new(MemoryBackend::new());
    let local = Arc::new(MemoryStore::new());
    let config = AppConfig {
        delivery: DeliveryRules::flat(50.0),
        ..AppConfig::default()
    };
    let system = StoreSystem::new(Backend::memory(&backend), local.clone(), &config);
    (system, backend, local)
}

fn registration(email: &str) -> Registration {
    Registration {
        full_name: "Sana Malik".to_string(),
        email: email.to_string(),
        password: "secret-pass".to_string(),
        phone_number: "0321-7654321".to_string(),
        address: "Gulberg III".to_string(),
    }
}

/// Polls the session until the auth follower has applied `user`.
async fn wait_for_user(cart: &CartClient, session: SessionId, user: Option<&UserId>) -> CartView {
    let result = tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            let view = cart.view(session).await.expect("Failed to view cart");
            if view.user.as_ref() == user {
                return view;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    result.expect("auth change was never applied")
}

/// Full end-to-end test: menu, guest cart, sign-in, sign-out, checkout.
#[tokio::test]
async fn test_full_storefront_integration() {
    let (mut system, backend, local) = system();

    // Admin seeds the menu
    let restaurant = system
        .catalog
        .add_restaurant(
            NewRestaurant {
                name: "Lahori Dhaba".to_string(),
                address: "Mall Road".to_string(),
            },
            None,
            &no_progress,
        )
        .await
        .expect("Failed to add restaurant");
    system
        .catalog
        .add_dish(
            NewDish {
                name: "Chicken Biryani".to_string(),
                price: 100.0,
                original_price: Some(125.0),
                serving: "1".to_string(),
                restaurant: restaurant.clone(),
                description: "Sindhi style".to_string(),
            },
            None,
            &no_progress,
        )
        .await
        .expect("Failed to add dish");
    let dishes = system
        .catalog
        .dishes_for(&restaurant, "biryani")
        .await
        .expect("Failed to list dishes");
    assert_eq!(dishes.len(), 1);
    let biryani = &dishes[0];
    assert_eq!(biryani.discount_label().as_deref(), Some("20.00% OFF"));

    // A guest tab fills a cart
    let session = system.open_session().await.expect("Failed to open session");
    let cart = system.cart_client.clone();
    let view = cart
        .add_item(session, &biryani.id, biryani.cart_details(), 2)
        .await
        .expect("Failed to add item");
    assert_eq!(view.total, 250.0);
    assert!(local.get_item("cart-guest").unwrap().is_some());

    // Registering signs in; the remote cart (none yet) replaces the guest cart
    let user = system
        .accounts
        .register(registration("sana@example.com"))
        .await
        .expect("Failed to register");
    let view = wait_for_user(&cart, session, Some(&user.uid)).await;
    assert_eq!(view.item_count, 0);

    let view = cart
        .add_item(session, &biryani.id, biryani.cart_details(), 3)
        .await
        .expect("Failed to add item");
    let expected_version = view.version;
    tokio::time::timeout(Duration::from_secs(2), async {
        loop {
            if let Ok(Some(doc)) = backend.get(CARTS, user.uid.as_str()).await {
                if doc.get("version").and_then(|v| v.as_u64()) == Some(expected_version) {
                    return;
                }
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("remote cart was never written");

    // Signing out clears the tab but not the remote cart
    system.accounts.sign_out().await.expect("Failed to sign out");
    let view = wait_for_user(&cart, session, None).await;
    assert_eq!(view.item_count, 0);
    assert!(backend.get(CARTS, user.uid.as_str()).await.unwrap().is_some());

    // Signing back in restores it
    system
        .accounts
        .sign_in("sana@example.com", "secret-pass")
        .await
        .expect("Failed to sign in");
    let view = wait_for_user(&cart, session, Some(&user.uid)).await;
    assert_eq!(view.item_count, 3);

    // Checkout
    let view = cart
        .update_address(session, "House 9, Model Town")
        .await
        .expect("Failed to update address");
    assert_eq!(view.total, 350.0);
    let order_id = cart
        .checkout(
            session,
            CustomerDetails {
                name: "Sana Malik".to_string(),
                contact: "0321-7654321".to_string(),
                address: "House 9, Model Town".to_string(),
            },
        )
        .await
        .expect("Failed to check out");

    let order = system
        .orders
        .get(&order_id)
        .await
        .expect("Failed to get order")
        .expect("Order not found");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.total_amount, 350.0);
    assert_eq!(cart.view(session).await.unwrap().item_count, 0);

    // The order desk delivers it
    system
        .orders
        .set_status(&order_id, OrderStatus::Delivered)
        .await
        .expect("Failed to update order");
    let stats = system.dashboard_stats().await.expect("Failed to read stats");
    assert_eq!(stats.restaurants, 1);
    assert_eq!(stats.dishes, 1);
    assert_eq!(stats.pending_orders, 0);
    assert_eq!(stats.delivered_orders, 1);
    assert_eq!(stats.users, 1);

    drop(cart);
    system.shutdown().await.expect("Failed to shut down");
}

/// A tab opened while already signed in starts with the user's cart.
#[tokio::test]
async fn test_session_opened_while_signed_in_loads_user_cart() {
    let (mut system, _backend, _local) = system();
    let user = system
        .accounts
        .register(registration("omar@example.com"))
        .await
        .unwrap();

    let first = system.open_session().await.unwrap();
    let view = system.cart_client.view(first).await.unwrap();
    assert_eq!(view.user, Some(user.uid.clone()));

    let mut events = system.subscribe();
    system
        .cart_client
        .add_item(first, "naan", food_cart::model::ItemDetails {
            image: String::new(),
            name: "Naan".to_string(),
            price: 30.0,
            serving: "1".to_string(),
        }, 2)
        .await
        .unwrap();
    let changed = events.recv().await.unwrap();
    assert_eq!(changed.session, first);
    assert_eq!(changed.item_count, 2);

    // A second tab of the same user sees the cart once the remote write lands
    tokio::time::sleep(Duration::from_millis(50)).await;
    let second = system.open_session().await.unwrap();
    let view = system.cart_client.view(second).await.unwrap();
    assert_eq!(view.item_count, 2);

    system.close_session(first).await.unwrap();
    system.close_session(second).await.unwrap();
    system.shutdown().await.unwrap();
}

/// Concurrent tabs do not see each other's guest carts in memory.
#[tokio::test]
async fn test_concurrent_sessions() {
    let (mut system, _backend, _local) = system();
    let mut sessions = Vec::new();
    for _ in 0..5 {
        sessions.push(system.open_session().await.unwrap());
    }

    let mut handles = vec![];
    for (i, session) in sessions.iter().copied().enumerate() {
        let cart = system.cart_client.clone();
        handles.push(tokio::spawn(async move {
            cart.add_item(
                session,
                "kebab",
                food_cart::model::ItemDetails {
                    image: String::new(),
                    name: "Seekh Kebab".to_string(),
                    price: 80.0,
                    serving: "4".to_string(),
                },
                i as u32 + 1,
            )
            .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for (i, session) in sessions.iter().copied().enumerate() {
        let view = system.cart_client.view(session).await.unwrap();
        assert_eq!(view.item_count, i as u32 + 1);
    }

    system.shutdown().await.unwrap();
}

/// Signing out and straight into another account may reach the session as a
/// single change; the first user's cart must still leave the device.
#[tokio::test]
async fn test_switching_accounts_clears_previous_users_cart() {
    let (mut system, _backend, local) = system();
    let first = system.accounts.register(registration("first@example.com")).await.unwrap();
    let second = system.accounts.register(registration("second@example.com")).await.unwrap();
    system.accounts.sign_in("first@example.com", "secret-pass").await.unwrap();

    let session = system.open_session().await.unwrap();
    let cart = system.cart_client.clone();
    cart.add_item(session, "daal", food_cart::model::ItemDetails {
        image: String::new(),
        name: "Daal Chawal".to_string(),
        price: 150.0,
        serving: "1".to_string(),
    }, 2)
    .await
    .unwrap();
    let first_key = format!("cart-{}", first.uid);
    assert!(local.get_item(&first_key).unwrap().is_some());

    // No yield in between: the follower may only ever see the second user
    system.accounts.sign_out().await.unwrap();
    system.accounts.sign_in("second@example.com", "secret-pass").await.unwrap();

    let view = wait_for_user(&cart, session, Some(&second.uid)).await;
    assert_eq!(view.item_count, 0);
    assert_eq!(local.get_item(&first_key).unwrap(), None);
    assert_eq!(local.get_item(&format!("{first_key}:version")).unwrap(), None);

    drop(cart);
    system.shutdown().await.unwrap();
}

/// Closing a session stops its auth follower right away.
#[tokio::test]
async fn test_closing_a_session_stops_its_follower() {
    let (mut system, _backend, _local) = system();
    let closed = system.open_session().await.unwrap();
    let open = system.open_session().await.unwrap();
    assert!(system.is_following(closed));
    assert!(system.is_following(open));

    system.close_session(closed).await.unwrap();

    assert!(!system.is_following(closed));
    assert!(system.is_following(open));

    // Later auth changes still reach the open session only
    let user = system.accounts.register(registration("late@example.com")).await.unwrap();
    let view = wait_for_user(&system.cart_client, open, Some(&user.uid)).await;
    assert_eq!(view.user, Some(user.uid));

    system.shutdown().await.unwrap();
}
