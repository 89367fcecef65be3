//! Stamp story pipeline.
//!
//! - [`assemble`] - one candidate page per content unit, titles, ordering
//! - [`story`] - the end-to-end story builder

pub mod assemble;
pub mod story;

pub use assemble::{
    apply_title_matches, assemble_stamp_pages, assign_stamp_positions, sort_by_document_position,
};
pub use story::{StampStory, StampStoryBuilder, StampStoryInput};
