//! Catalog models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Year value the games catalog uses when no release date is known
pub const UNKNOWN_YEAR: &str = "—";

/// Kind of catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum MediaType {
    Game,
    Movie,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Game => "Game",
            MediaType::Movie => "Movie",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "game" => Ok(MediaType::Game),
            "movie" => Ok(MediaType::Movie),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

impl TryFrom<String> for MediaType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Media item as returned by the `/search` and `/movies` catalogs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(rename = "type")]
    pub media_type: MediaType,
    /// Release date or year as displayed; may be [`UNKNOWN_YEAR`]
    #[serde(default)]
    pub year: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub platforms: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub summary: String,
    #[serde(rename = "coverUrl", default, deserialize_with = "null_as_empty")]
    pub cover_url: String,
}

impl MediaItem {
    /// Release year from the first four characters of `year`
    ///
    /// `None` for missing, unknown or unparsable values.
    pub fn release_year(&self) -> Option<i32> {
        let year = self.year.as_deref()?;
        if year == UNKNOWN_YEAR {
            return None;
        }
        year.get(..4)?.parse().ok()
    }
}

/// Catalog ids are numbers for games and strings for movies
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(s) => s,
        Raw::Int(n) => n.to_string(),
    })
}

/// Treat an explicit `null` like a missing field
pub fn null_as_empty<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
