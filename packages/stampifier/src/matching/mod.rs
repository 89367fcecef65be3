//! Text-media matching: decide which sentence goes with which media item.
//!
//! - [`preprocess`] - equalize list sizes by pruning the least related items
//! - [`matcher`] - preference scoring and assembly of matched pairs
//! - [`stable`] - Gale-Shapley stable matching

pub mod matcher;
pub mod preprocess;
pub mod stable;

pub use matcher::{
    build_preference_lists, match_equal_sized, match_text_and_media, pairing_score,
    PreferenceLists, TextMediaMatch,
};
pub use preprocess::{equalize_for_matching, PreprocessedContents, PrunedSide, UnusedContents};
pub use stable::{PreferenceSide, StableMatcher};
