//! Built-in sample results shown when the catalogs cannot be reached

use crate::models::{MediaItem, MediaType};

/// The fixed sample dataset
pub fn sample_items() -> Vec<MediaItem> {
    vec![
        MediaItem {
            id: "1".to_string(),
            title: "Halo: Combat Evolved".to_string(),
            media_type: MediaType::Game,
            year: Some("2001-11-15".to_string()),
            platforms: vec!["Xbox".to_string(), "PC (Windows)".to_string()],
            summary: "Fight for humanity against the Covenant on the ancient ring-world Halo."
                .to_string(),
            cover_url: "https://placehold.co/200x280?text=HALO".to_string(),
        },
        MediaItem {
            id: "2".to_string(),
            title: "The Matrix".to_string(),
            media_type: MediaType::Movie,
            year: Some("1999-03-31".to_string()),
            platforms: vec!["Theaters".to_string(), "Blu-ray".to_string()],
            summary:
                "A hacker discovers reality is a simulated construct in this genre-defining film."
                    .to_string(),
            cover_url: "https://placehold.co/200x280?text=MATRIX".to_string(),
        },
    ]
}

/// Sample items whose title contains `query`, ignoring case
pub fn sample_matching(query: &str) -> Vec<MediaItem> {
    let needle = query.trim().to_lowercase();
    sample_items()
        .into_iter()
        .filter(|item| item.title.to_lowercase().contains(&needle))
        .collect()
}
