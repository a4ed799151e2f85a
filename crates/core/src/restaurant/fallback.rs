//! Canned restaurants for demo mode and graceful fallback.

use super::citation::map_search_uri;
use super::types::Restaurant;

const DEMO_DATA: &[(&str, &str, &str)] = &[
    (
        "Burger & Co.",
        "American",
        "Juicy handmade smash burgers with secret sauce and crispy truffle fries.",
    ),
    (
        "Sushi Zen",
        "Japanese",
        "Fresh sashimi, artisan rolls, and warm miso soup in a peaceful setting.",
    ),
    (
        "Pasta Paradise",
        "Italian",
        "Authentic homemade pasta and wood-fired neapolitan pizzas.",
    ),
    (
        "Taco Fiesta",
        "Mexican",
        "Street-style tacos with spicy salsa verde and fresh guacamole.",
    ),
    (
        "Golden Dragon",
        "Chinese",
        "Classic dim sum favorites and spicy Szechuan dishes.",
    ),
];

/// The fixed demo dataset, fully populated and in a stable order.
pub fn demo_restaurants() -> Vec<Restaurant> {
    DEMO_DATA
        .iter()
        .enumerate()
        .map(|(i, (name, cuisine, description))| Restaurant {
            id: format!("demo-{}", i + 1),
            name: name.to_string(),
            cuisine: cuisine.to_string(),
            description: description.to_string(),
            map_uri: Some(map_search_uri(name)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_demo_dataset_is_diverse_and_populated() {
        let demo = demo_restaurants();
        assert!(demo.len() >= 5);

        let cuisines: HashSet<&str> = demo.iter().map(|r| r.cuisine.as_str()).collect();
        assert_eq!(cuisines.len(), demo.len());

        for restaurant in &demo {
            assert!(restaurant.name.chars().count() > 1);
            assert!(!restaurant.description.is_empty());
            assert!(restaurant
                .map_uri
                .as_deref()
                .is_some_and(|uri| uri.starts_with("https://www.google.com/maps/search/")));
        }
    }

    #[test]
    fn test_demo_ids_are_unique() {
        let demo = demo_restaurants();
        let ids: HashSet<&str> = demo.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids.len(), demo.len());
    }
}
