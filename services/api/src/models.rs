//! Backend payloads for ratings, library, profile and community threads

pub mod community;
pub mod library;
pub mod profile;
pub mod rating;

pub use community::{Comment, NewComment, NewThread, Thread};
pub use library::LibraryEntry;
pub use profile::{Profile, ProfileUpdate};
pub use rating::{CreatedRating, NewRating, RatingRecord, RatingUpdate};

/// Result of an action that asks the user to confirm first
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Removal<T = ()> {
    /// The user declined; nothing was sent
    Cancelled,
    Removed(T),
}

impl<T> Removal<T> {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Removal::Cancelled)
    }
}
