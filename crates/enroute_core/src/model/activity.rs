//! Activity record and its normalizer.
//!
//! # Invariants
//! - `price >= 0` and `0 <= rating <= 5` for every normalized activity.
//! - `image_url` is never blank after normalization.

use super::coerce::{non_blank, non_negative};
use super::id::{deserialize_loose_id, keep_or_generate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const MAX_RATING: f64 = 5.0;
const PLACEHOLDER_SEED_FALLBACK: &str = "activity";

/// Bookable activity as persisted under `lap_activities`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub image_url: String,
}

impl Activity {
    /// Two activities are equivalent when they share an id, or share both
    /// name and price. The activities store never holds two equivalent records.
    pub fn is_equivalent(&self, other: &Activity) -> bool {
        self.id == other.id || (self.name == other.name && self.price == other.price)
    }
}

/// Loosely-shaped activity input from forms or imported JSON.
///
/// Numeric fields stay as raw JSON values so strings like `"1200"` or junk
/// like `"abc"` can be coerced the same way a browser form would.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActivityInput {
    #[serde(deserialize_with = "deserialize_loose_id")]
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<Value>,
    pub rating: Option<Value>,
    pub image_url: Option<String>,
}

impl ActivityInput {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_price(mut self, price: impl Into<Value>) -> Self {
        self.price = Some(price.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<Value>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

/// Builds a canonical activity from loose input.
///
/// Rating is honoured only when given as a JSON number, and is clamped to
/// `[0, MAX_RATING]` regardless of caller.
pub fn normalize_activity(input: &ActivityInput, now: DateTime<Utc>) -> Activity {
    let name = input.name.as_deref().unwrap_or_default().trim().to_string();
    let rating = match &input.rating {
        Some(Value::Number(number)) => number
            .as_f64()
            .filter(|rating| rating.is_finite())
            .map_or(0.0, |rating| rating.clamp(0.0, MAX_RATING)),
        _ => 0.0,
    };
    let image_url = match non_blank(input.image_url.as_deref()) {
        Some(url) => url.trim().to_string(),
        None => placeholder_image_url(&name),
    };

    Activity {
        id: keep_or_generate(input.id.as_deref(), now),
        description: input.description.clone().unwrap_or_default(),
        category: input.category.clone().unwrap_or_default(),
        price: non_negative(input.price.as_ref()),
        rating,
        image_url,
        name,
    }
}

/// Deterministic placeholder image for `seed`; blank seeds use `"activity"`.
pub fn placeholder_image_url(seed: &str) -> String {
    let seed = match seed.trim() {
        "" => PLACEHOLDER_SEED_FALLBACK,
        trimmed => trimmed,
    };
    format!(
        "https://picsum.photos/seed/{}/640/400",
        urlencoding::encode(seed)
    )
}
