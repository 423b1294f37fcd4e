//! RetroRewind client core
//!
//! Rating and library reconciliation, profile and community endpoints, and
//! [`AppState`] tying them to a login session and the catalog search.

pub mod community;
pub mod library;
pub mod models;
pub mod profile;
pub mod ratings;
pub mod state;
pub mod time;

pub use community::{ThreadBoard, ThreadView};
pub use library::LibraryReconciler;
pub use models::Removal;
pub use profile::ProfileClient;
pub use ratings::{RatingDraft, RatingReconciler, RatingState, RatingTransition};
pub use state::AppState;
