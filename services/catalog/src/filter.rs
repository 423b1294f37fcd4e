//! Result filtering
//!
//! [`apply`] narrows a result list by type, year range and platform. It is
//! pure and idempotent, so it can run after every fetch and again on the
//! displayed list without touching the network.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::models::{MediaItem, MediaType};

/// Type selector of the filter bar
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeFilter {
    #[default]
    All,
    Only(MediaType),
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            Ok(TypeFilter::All)
        } else {
            s.parse().map(TypeFilter::Only)
        }
    }
}

/// Compound filter criteria; every set criterion must match
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub media_type: TypeFilter,
    pub year_from: Option<i32>,
    pub year_to: Option<i32>,
    /// Case-insensitive substring matched against platform names
    pub platform: Option<String>,
}

impl FilterCriteria {
    /// Build criteria from raw form input
    ///
    /// Year boxes keep only their digits (at most four); an empty box means
    /// no bound. Unknown type names fall back to `All`.
    pub fn from_inputs(media_type: &str, year_from: &str, year_to: &str, platform: &str) -> Self {
        Self {
            media_type: media_type.parse().unwrap_or_default(),
            year_from: parse_year_input(year_from),
            year_to: parse_year_input(year_to),
            platform: Some(platform.trim().to_string()).filter(|p| !p.is_empty()),
        }
    }

    /// True when no criterion would remove anything
    pub fn is_empty(&self) -> bool {
        self.media_type == TypeFilter::All
            && self.year_from.is_none()
            && self.year_to.is_none()
            && self.platform.is_none()
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        self.matches_type(item) && self.matches_years(item) && self.matches_platform(item)
    }

    fn matches_type(&self, item: &MediaItem) -> bool {
        match self.media_type {
            TypeFilter::All => true,
            TypeFilter::Only(wanted) => item.media_type == wanted,
        }
    }

    /// Items without a usable year are kept whatever the bounds
    fn matches_years(&self, item: &MediaItem) -> bool {
        if self.year_from.is_none() && self.year_to.is_none() {
            return true;
        }
        let Some(year) = item.release_year() else {
            return true;
        };
        if self.year_from.is_some_and(|from| year < from) {
            return false;
        }
        if self.year_to.is_some_and(|to| year > to) {
            return false;
        }
        true
    }

    fn matches_platform(&self, item: &MediaItem) -> bool {
        let Some(needle) = self.platform.as_deref().map(str::trim).filter(|p| !p.is_empty())
        else {
            return true;
        };
        let needle = needle.to_lowercase();
        item.platforms
            .iter()
            .any(|name| name.to_lowercase().contains(&needle))
    }
}

fn parse_year_input(raw: &str) -> Option<i32> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).take(4).collect();
    digits.parse().ok()
}

/// Keep the items matching `criteria`, preserving their order
pub fn apply(items: &[MediaItem], criteria: &FilterCriteria) -> Vec<MediaItem> {
    items
        .iter()
        .filter(|item| criteria.matches(item))
        .cloned()
        .collect()
}
