//! Demo: the admin seeds a menu, a guest fills a cart, registers, refills the
//! signed-in cart and checks out, and the admin marks the order delivered.

use food_cart::backend::{no_progress, Backend, MemoryBackend};
use food_cart::config::AppConfig;
use food_cart::lifecycle::{setup_tracing, StoreSystem};
use food_cart::model::{CustomerDetails, NewDish, NewRestaurant, OrderStatus, Registration};
use food_cart::storage::FileStore;
use std::sync::Arc;
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = AppConfig::from_env().map_err(|e| e.to_string())?;
    info!(path = %config.data_path.display(), "Starting storefront");

    let local = Arc::new(FileStore::open(&config.data_path).map_err(|e| e.to_string())?);
    let backend = Arc::new(MemoryBackend::new());
    let mut system = StoreSystem::new(Backend::memory(&backend), local, &config);

    // Admin seeds the menu
    let span = tracing::info_span!("menu_setup");
    let dishes = async {
        let restaurant = system
            .catalog
            .add_restaurant(
                NewRestaurant {
                    name: "Karachi Kitchen".to_string(),
                    address: "Tariq Road".to_string(),
                },
                None,
                &no_progress,
            )
            .await?;
        for (name, price, original) in [("Chicken Karahi", 700.0, Some(800.0)), ("Garlic Naan", 60.0, None)] {
            system
                .catalog
                .add_dish(
                    NewDish {
                        name: name.to_string(),
                        price,
                        original_price: original,
                        serving: "2".to_string(),
                        restaurant: restaurant.clone(),
                        description: String::new(),
                    },
                    Some(vec![0u8; 100 * 1024].into()),
                    &|pct: f64| info!(pct, "Uploading"),
                )
                .await?;
        }
        system.catalog.dishes_for(&restaurant, "").await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    for dish in &dishes {
        info!(dish = %dish.name, discount = ?dish.discount_label(), "On the menu");
    }
    let karahi = dishes.first().ok_or("Menu is empty")?;

    // A tab opens as a guest and fills the cart
    let session = system.open_session().await.map_err(|e| e.to_string())?;
    let cart = system.cart_client.clone();
    for dish in &dishes {
        cart.add_item(session, &dish.id, dish.cart_details(), 1)
            .await
            .map_err(|e| e.to_string())?;
    }
    let view = cart.set_qty(session, &karahi.id, 2).await.map_err(|e| e.to_string())?;
    info!(items = view.item_count, total = view.total, "Guest cart");

    // Registering signs in; the follower swaps in the user's (empty) remote cart
    let mut badge = system.subscribe();
    let span = tracing::info_span!("sign_in");
    let user = async {
        system
            .accounts
            .register(Registration {
                full_name: "Ayesha Khan".to_string(),
                email: "ayesha@example.com".to_string(),
                password: "hunter22".to_string(),
                phone_number: "0333-0000000".to_string(),
                address: "DHA Phase 6".to_string(),
            })
            .await
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    while let Ok(changed) = badge.recv().await {
        if changed.session == session && changed.item_count == 0 {
            break;
        }
    }
    info!(user = %user.uid, "Signed in with an empty cart");

    let view = cart
        .add_item(session, &karahi.id, karahi.cart_details(), 3)
        .await
        .map_err(|e| e.to_string())?;
    let view = cart.update_address(session, "House 12, Street 4").await.map_err(|e| e.to_string())?;
    info!(items = view.item_count, delivery = %view.delivery, total = view.total, "Cart before checkout");

    let span = tracing::info_span!("checkout");
    let placed = async {
        cart.checkout(
            session,
            CustomerDetails {
                name: "Ayesha Khan".to_string(),
                contact: "0333-0000000".to_string(),
                address: "House 12, Street 4".to_string(),
            },
        )
        .await
    }
    .instrument(span)
    .await;

    match placed {
        Ok(order_id) => {
            info!(order = %order_id, "Order placed");
            if let Err(e) = system.orders.set_status(&order_id, OrderStatus::Delivered).await {
                error!(error = %e, "Marking order delivered failed");
            }
        }
        Err(e) => error!(error = %e, "Checkout failed"),
    }

    let stats = system.dashboard_stats().await.map_err(|e| e.to_string())?;
    info!(?stats, "Dashboard");

    drop(cart);
    system.shutdown().await?;
    info!("Demo completed");
    Ok(())
}
