//! Vehicle categories derived from product `type` tags.

use serde::{Deserialize, Serialize};

/// A browseable category: a distinct product `type` with display metadata
/// and the number of products carrying it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Lowercase `type` tag.
    pub key: String,
    pub name: String,
    pub description: String,
    pub image: String,
    pub count: usize,
}

/// Display metadata for the known vehicle body types, keyed by lowercase
/// `type` tag.
const CATEGORY_TABLE: &[(&str, &str, &str, &str)] = &[
    (
        "sedan",
        "Sedans",
        "Comfortable and efficient sedans",
        "https://images.unsplash.com/photo-1555215695-3004980ad54e?w=600&h=400&fit=crop",
    ),
    (
        "suv",
        "SUVs",
        "Spacious and powerful SUVs",
        "https://images.unsplash.com/photo-1556189250-72ba954cfc2b?w=600&h=400&fit=crop",
    ),
    (
        "hatchback",
        "Hatchbacks",
        "Compact and versatile hatchbacks",
        "/honda_hr.png",
    ),
    (
        "truck",
        "Trucks",
        "Tough and capable trucks",
        "https://images.unsplash.com/photo-1559416523-140ddc3d238c?w=600&h=400&fit=crop",
    ),
    (
        "coupe",
        "Coupes",
        "Sporty and stylish coupes",
        "https://images.unsplash.com/photo-1544636331-e26879cd4d9b?w=600&h=400&fit=crop",
    ),
    (
        "van",
        "Vans",
        "Practical and spacious vans",
        "https://images.unsplash.com/photo-1570733577524-3a047079e80d?w=600&h=400&fit=crop",
    ),
];

const GENERIC_CATEGORY_IMAGE: &str =
    "https://images.unsplash.com/photo-1555215695-3004980ad54e?w=600&h=400&fit=crop";

impl Category {
    /// Build a category for a lowercase `type` tag, using the static table
    /// for known types and a generated fallback (capitalized name, generic
    /// description and image) for unknown ones.
    #[must_use]
    pub fn for_kind(key: &str, count: usize) -> Self {
        if let Some((_, name, description, image)) =
            CATEGORY_TABLE.iter().find(|(k, ..)| *k == key)
        {
            return Self {
                key: key.to_string(),
                name: (*name).to_string(),
                description: (*description).to_string(),
                image: (*image).to_string(),
                count,
            };
        }

        Self {
            key: key.to_string(),
            name: capitalize(key),
            description: format!("Browse our {key} collection"),
            image: GENERIC_CATEGORY_IMAGE.to_string(),
            count,
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().collect::<String>() + chars.as_str()
    })
}

/// Static category list served when the cache holds no products at all.
#[must_use]
pub fn fallback_categories() -> Vec<Category> {
    ["sedan", "suv", "truck"]
        .iter()
        .map(|key| Category::for_kind(key, 0))
        .collect()
}
