//! Fixed demo dataset written the first time the activities store is read.

use crate::model::activity::{placeholder_image_url, Activity};

/// The three demo activities, in display order.
pub fn demo_activities() -> Vec<Activity> {
    vec![
        demo(
            "ex_1",
            "Old Delhi Food Walk",
            "Guided tasting tour through Chandni Chowk with street eats.",
            "Food",
            1200.0,
            4.6,
            "delhi-food-walk",
        ),
        demo(
            "ex_2",
            "Goa Kayaking Sunset",
            "Leisurely paddle through calm backwaters at golden hour.",
            "Water Sports",
            1800.0,
            4.4,
            "goa-kayak-sunset",
        ),
        demo(
            "ex_3",
            "Hampi Heritage Cycle Tour",
            "Morning cycle past ruins and boulder hills with guide.",
            "Sightseeing",
            1500.0,
            4.7,
            "hampi-cycle",
        ),
    ]
}

fn demo(
    id: &str,
    name: &str,
    description: &str,
    category: &str,
    price: f64,
    rating: f64,
    image_seed: &str,
) -> Activity {
    Activity {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        price,
        rating,
        image_url: placeholder_image_url(image_seed),
    }
}
