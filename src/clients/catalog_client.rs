use crate::backend::{encode, BackendError, BlobStore, DocumentStore, Snapshot};
use crate::clients::{CatalogError, Confirm};
use crate::model::{discount_percent, Dish, ImageUpload, NewDish, NewRestaurant, Restaurant};
use crate::model::catalog::contains_folded;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

pub const RESTAURANTS: &str = "restaurants";
pub const DISHES: &str = "dishes";

pub const DELETE_DISH_PROMPT: &str = "Are you sure you want to delete this dish?";

/// Blob path for an image named after `name`, with spaces as dashes.
pub fn image_path(folder: &str, name: &str) -> String {
    format!("{folder}/{}", name.trim().split(' ').collect::<Vec<_>>().join("-"))
}

fn restaurant(snapshot: Snapshot) -> Result<Restaurant, CatalogError> {
    let mut restaurant: Restaurant = snapshot.decode()?;
    restaurant.id = snapshot.id;
    Ok(restaurant)
}

fn dish(snapshot: Snapshot) -> Result<Dish, CatalogError> {
    let mut dish: Dish = snapshot.decode()?;
    dish.id = snapshot.id;
    Ok(dish)
}

fn check_name(name: &str) -> Result<(), CatalogError> {
    if name.trim().is_empty() {
        return Err(CatalogError::Invalid("name is required".to_string()));
    }
    Ok(())
}

fn check_dish(form: &NewDish) -> Result<(), CatalogError> {
    check_name(&form.name)?;
    if !form.price.is_finite() || form.price < 0.0 {
        return Err(CatalogError::Invalid(format!("price {} is not valid", form.price)));
    }
    if form.restaurant.trim().is_empty() {
        return Err(CatalogError::Invalid("restaurant is required".to_string()));
    }
    Ok(())
}

/// Restaurants and dishes, for the storefront and the admin screens.
#[derive(Clone)]
pub struct CatalogClient {
    documents: Arc<dyn DocumentStore>,
    blobs: Arc<dyn BlobStore>,
}

impl CatalogClient {
    pub fn new(documents: Arc<dyn DocumentStore>, blobs: Arc<dyn BlobStore>) -> Self {
        Self { documents, blobs }
    }

    #[instrument(skip(self))]
    pub async fn restaurants(&self) -> Result<Vec<Restaurant>, CatalogError> {
        self.documents
            .list(RESTAURANTS)
            .await?
            .into_iter()
            .map(restaurant)
            .collect()
    }

    #[instrument(skip(self))]
    pub async fn restaurant(&self, id: &str) -> Result<Option<Restaurant>, CatalogError> {
        let Some(doc) = self.documents.get(RESTAURANTS, id).await? else {
            return Ok(None);
        };
        restaurant(Snapshot {
            id: id.to_string(),
            data: doc,
        })
        .map(Some)
    }

    /// Dishes of one restaurant whose name contains `search`, ignoring case.
    #[instrument(skip(self))]
    pub async fn dishes_for(
        &self,
        restaurant_id: &str,
        search: &str,
    ) -> Result<Vec<Dish>, CatalogError> {
        let owner = Value::String(restaurant_id.to_string());
        let dishes = self
            .documents
            .query_eq(DISHES, "restaurant", &owner)
            .await?
            .into_iter()
            .map(dish)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dishes
            .into_iter()
            .filter(|dish| dish.name_matches(search))
            .collect())
    }

    /// Admin filter over every dish: name, description or restaurant name.
    #[instrument(skip(self))]
    pub async fn search_dishes(&self, term: &str) -> Result<Vec<Dish>, CatalogError> {
        let names: HashMap<String, String> = self
            .restaurants()
            .await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();
        let dishes = self
            .documents
            .list(DISHES)
            .await?
            .into_iter()
            .map(dish)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dishes
            .into_iter()
            .filter(|dish| {
                dish.name_matches(term)
                    || dish.description_matches(term)
                    || names
                        .get(&dish.restaurant)
                        .is_some_and(|name| contains_folded(name, term))
            })
            .collect())
    }

    #[instrument(skip(self))]
    pub async fn dish(&self, id: &str) -> Result<Option<Dish>, CatalogError> {
        let Some(doc) = self.documents.get(DISHES, id).await? else {
            return Ok(None);
        };
        dish(Snapshot {
            id: id.to_string(),
            data: doc,
        })
        .map(Some)
    }

    #[instrument(skip(self, image, on_progress))]
    pub async fn add_restaurant(
        &self,
        form: NewRestaurant,
        image: Option<ImageUpload>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<String, CatalogError> {
        check_name(&form.name)?;
        let image = self
            .upload(RESTAURANTS, &form.name, image, on_progress)
            .await?
            .unwrap_or_default();
        let restaurant = Restaurant {
            id: String::new(),
            name: form.name.trim().to_string(),
            address: form.address.trim().to_string(),
            image,
        };
        let id = self
            .documents
            .create(RESTAURANTS, encode(&restaurant)?)
            .await?;
        info!(restaurant = %id, name = %restaurant.name, "Restaurant added");
        Ok(id)
    }

    #[instrument(skip(self, image, on_progress))]
    pub async fn add_dish(
        &self,
        form: NewDish,
        image: Option<ImageUpload>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<String, CatalogError> {
        check_dish(&form)?;
        let image = self
            .upload(DISHES, &form.name, image, on_progress)
            .await?
            .unwrap_or_default();
        let dish = Dish {
            id: String::new(),
            name: form.name.trim().to_string(),
            price: Some(form.price),
            original_price: form.original_price,
            discount: Some(discount_percent(form.price, form.original_price)),
            serving: form.serving,
            restaurant: form.restaurant,
            description: form.description,
            image,
            created_at: Some(Utc::now()),
        };
        let id = self.documents.create(DISHES, encode(&dish)?).await?;
        info!(dish = %id, name = %dish.name, "Dish added");
        Ok(id)
    }

    /// Rewrites the form fields of a dish. The image is replaced only when a
    /// new one is given.
    #[instrument(skip(self, image, on_progress))]
    pub async fn update_dish(
        &self,
        id: &str,
        form: NewDish,
        image: Option<ImageUpload>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<(), CatalogError> {
        check_dish(&form)?;
        let mut fields = encode(&json!({
            "name": form.name.trim(),
            "price": form.price,
            "originalPrice": form.original_price,
            "discount": discount_percent(form.price, form.original_price),
            "serving": form.serving,
            "restaurant": form.restaurant,
            "description": form.description,
        }))?;
        if let Some(url) = self.upload(DISHES, &form.name, image, on_progress).await? {
            fields.insert("image".to_string(), Value::String(url));
        }
        self.documents
            .merge(DISHES, id, fields)
            .await
            .map_err(|e| match e {
                BackendError::NotFound(_) => CatalogError::NotFound(format!("{DISHES}/{id}")),
                other => CatalogError::Backend(other),
            })?;
        info!(dish = %id, "Dish updated");
        Ok(())
    }

    /// Deletes the dish once `confirm` approves. Returns whether it did.
    #[instrument(skip(self, confirm))]
    pub async fn delete_dish(&self, id: &str, confirm: &dyn Confirm) -> Result<bool, CatalogError> {
        if !confirm.confirm(DELETE_DISH_PROMPT) {
            debug!(dish = %id, "Delete declined");
            return Ok(false);
        }
        self.documents.delete(DISHES, id).await?;
        info!(dish = %id, "Dish deleted");
        Ok(true)
    }

    async fn upload(
        &self,
        folder: &str,
        name: &str,
        image: Option<ImageUpload>,
        on_progress: &(dyn Fn(f64) + Send + Sync),
    ) -> Result<Option<String>, CatalogError> {
        let Some(image) = image else {
            return Ok(None);
        };
        let path = image_path(folder, name);
        let url = self.blobs.upload(&path, image.bytes, on_progress).await?;
        debug!(%path, %url, "Image uploaded");
        Ok(Some(url))
    }
}
