//! Activity search, sort and pagination.

use crate::model::activity::Activity;
use std::cmp::Ordering;
use std::collections::BTreeSet;

pub const DEFAULT_PRICE_MAX: f64 = 10_000.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Keep store order.
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
    RatingDesc,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "relevance" => Some(Self::Relevance),
            "price-asc" | "priceAsc" => Some(Self::PriceAsc),
            "price-desc" | "priceDesc" => Some(Self::PriceDesc),
            "name-asc" | "nameAsc" => Some(Self::NameAsc),
            "name-desc" | "nameDesc" => Some(Self::NameDesc),
            "rating-desc" | "ratingDesc" => Some(Self::RatingDesc),
            _ => None,
        }
    }

    fn compare(self, a: &Activity, b: &Activity) -> Ordering {
        match self {
            Self::Relevance => Ordering::Equal,
            Self::PriceAsc => a.price.total_cmp(&b.price),
            Self::PriceDesc => b.price.total_cmp(&a.price),
            Self::NameAsc => compare_names(&a.name, &b.name),
            Self::NameDesc => compare_names(&b.name, &a.name),
            Self::RatingDesc => b.rating.total_cmp(&a.rating),
        }
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Filter and sort options for [`search_activities`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityQuery {
    /// Case-insensitive substring matched against name, description and category.
    pub text: String,
    /// Empty means every category.
    pub categories: BTreeSet<String>,
    /// Inclusive bounds.
    pub price_min: f64,
    pub price_max: f64,
    pub sort: SortKey,
}

impl Default for ActivityQuery {
    fn default() -> Self {
        Self {
            text: String::new(),
            categories: BTreeSet::new(),
            price_min: 0.0,
            price_max: DEFAULT_PRICE_MAX,
            sort: SortKey::default(),
        }
    }
}

impl ActivityQuery {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    fn matches(&self, activity: &Activity, needle: &str) -> bool {
        let in_text = needle.is_empty()
            || [&activity.name, &activity.description, &activity.category]
                .iter()
                .any(|field| field.to_lowercase().contains(needle));
        let in_category = self.categories.is_empty() || self.categories.contains(&activity.category);
        let in_price = activity.price >= self.price_min && activity.price <= self.price_max;
        in_text && in_category && in_price
    }
}

/// Filters then stably sorts `activities`.
pub fn search_activities(activities: &[Activity], query: &ActivityQuery) -> Vec<Activity> {
    let needle = query.text.trim().to_lowercase();
    let mut hits: Vec<Activity> = activities
        .iter()
        .filter(|activity| query.matches(activity, &needle))
        .cloned()
        .collect();
    if query.sort != SortKey::Relevance {
        hits.sort_by(|a, b| query.sort.compare(a, b));
    }
    hits
}

/// One page of a longer list.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based, clamped into `1..=total_pages`.
    pub page: usize,
    pub page_size: usize,
    /// Never below 1, even for an empty list.
    pub total_pages: usize,
    pub total_items: usize,
}

impl<T> Page<T> {
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

/// Slices `items` into the requested page; out-of-range pages are clamped.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = items.len().div_ceil(page_size).max(1);
    let page = page.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(items.len());

    Page {
        items: items.get(start..end).map(<[T]>::to_vec).unwrap_or_default(),
        page,
        page_size,
        total_pages,
        total_items: items.len(),
    }
}
