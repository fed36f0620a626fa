//! Delivery charge and the placeholder rules that produce it.
//!
//! Neither rule is a business contract: the storefront draws a random charge
//! when a session opens and switches to an address-length formula once the
//! customer types an address. Both are kept configurable.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeliveryCharge(f64);

impl DeliveryCharge {
    /// Negative and non-finite inputs become zero.
    pub fn new(amount: f64) -> Self {
        if amount.is_finite() && amount > 0.0 {
            Self(amount)
        } else {
            Self(0.0)
        }
    }

    pub fn amount(self) -> f64 {
        self.0
    }
}

impl Display for DeliveryCharge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rs {} /-", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeliveryPolicy {
    Flat(f64),
    /// Uniform whole-rupee draw in `min..=max`.
    Random { min: u32, max: u32 },
    /// `base + per_char * chars(address.trim())`.
    AddressLength { base: f64, per_char: f64 },
}

impl DeliveryPolicy {
    pub fn quote(&self, address: &str) -> DeliveryCharge {
        match *self {
            Self::Flat(amount) => DeliveryCharge::new(amount),
            Self::Random { min, max } => {
                let (low, high) = if min <= max { (min, max) } else { (max, min) };
                DeliveryCharge::new(f64::from(rand::rng().random_range(low..=high)))
            }
            Self::AddressLength { base, per_char } => {
                let chars = address.trim().chars().count() as f64;
                DeliveryCharge::new(base + per_char * chars)
            }
        }
    }
}

/// Which policy applies at which moment of a session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeliveryRules {
    /// Used when a session opens, before any address is known.
    pub page_load: DeliveryPolicy,
    /// Used whenever the customer edits the delivery address.
    pub address: DeliveryPolicy,
}

impl DeliveryRules {
    pub fn flat(amount: f64) -> Self {
        Self {
            page_load: DeliveryPolicy::Flat(amount),
            address: DeliveryPolicy::Flat(amount),
        }
    }
}

impl Default for DeliveryRules {
    fn default() -> Self {
        Self {
            page_load: DeliveryPolicy::Random { min: 50, max: 2100 },
            address: DeliveryPolicy::AddressLength {
                base: 350.0,
                per_char: 2.0,
            },
        }
    }
}
