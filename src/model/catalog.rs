//! Restaurants and dishes as the admin screens store them.

use crate::model::lenient;
use crate::model::ItemDetails;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Restaurant {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(skip)]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub price: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::optional_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub original_price: Option<f64>,
    /// Percentage off `original_price`, two decimals.
    #[serde(default, deserialize_with = "lenient::optional_number")]
    pub discount: Option<f64>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub serving: String,
    /// Id of the owning restaurant.
    #[serde(default)]
    pub restaurant: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(
        default,
        deserialize_with = "lenient::optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Dish {
    /// `"12.50% OFF"` for a discounted dish that still has a price.
    pub fn discount_label(&self) -> Option<String> {
        match (self.price, self.discount) {
            (Some(_), Some(discount)) if discount > 0.0 => Some(format!("{discount:.2}% OFF")),
            _ => None,
        }
    }

    /// What the cart copies when this dish is added.
    ///
    /// A dish with only an original price sells at that price.
    pub fn cart_details(&self) -> ItemDetails {
        ItemDetails {
            image: self.image.clone(),
            name: self.name.clone(),
            price: self.price.or(self.original_price).unwrap_or(0.0),
            serving: self.serving.clone(),
        }
    }

    /// Case-insensitive substring match on the name. An empty term matches.
    pub fn name_matches(&self, term: &str) -> bool {
        contains_folded(&self.name, term)
    }

    pub fn description_matches(&self, term: &str) -> bool {
        contains_folded(&self.description, term)
    }
}

pub(crate) fn contains_folded(haystack: &str, needle: &str) -> bool {
    let needle = needle.trim().to_lowercase();
    needle.is_empty() || haystack.to_lowercase().contains(&needle)
}

/// `(original - price) / original * 100`, rounded to two decimals.
///
/// Zero when there is no usable original price.
pub fn discount_percent(price: f64, original_price: Option<f64>) -> f64 {
    match original_price {
        Some(original) if original.is_finite() && original > 0.0 => {
            (((original - price) / original) * 100.0 * 100.0).round() / 100.0
        }
        _ => 0.0,
    }
}

/// Form data for a new or edited dish.
#[derive(Debug, Clone, PartialEq)]
pub struct NewDish {
    pub name: String,
    pub price: f64,
    pub original_price: Option<f64>,
    pub serving: String,
    pub restaurant: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewRestaurant {
    pub name: String,
    pub address: String,
}

/// An image picked in an admin form.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub bytes: Vec<u8>,
}

impl From<Vec<u8>> for ImageUpload {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}
