//! Stamp page selection and sequencing.
//!
//! Turns the extracted content of a web page (summary sentences, media,
//! quotes, embeds) into a capped, ordered list of stamp pages for a visual
//! story.
//!
//! # Usage
//!
//! ```rust,ignore
//! use stampifier::{StampStoryBuilder, StoryConfig, DescriptorEmbeddings};
//!
//! let descriptors = DescriptorEmbeddings::from_json_str(&descriptor_json)?;
//! let builder = StampStoryBuilder::new(StoryConfig::default().with_max_pages(8), descriptors);
//!
//! let story = builder.build(&input)?;
//! for page in &story.stamp_pages {
//!     println!("{:?} {:?}", page.stamp_position, page.stamp_type);
//! }
//! ```
//!
//! # Modules
//!
//! - [`matching`] - pair summary sentences with media (stable matching)
//! - [`picking`] - covers, budgeted max cover and the interesting sequence picker
//! - [`pipeline`] - stamp page assembly and the story builder
//! - [`types`] - content, stamp page and config types
//! - [`similarity`] - cosine similarity helpers
//! - [`testing`] - deterministic embeddings and content fixtures

pub mod error;
pub mod matching;
pub mod picking;
pub mod pipeline;
pub mod similarity;
pub mod testing;
pub mod types;

pub use error::{Result, StampError};

pub use matching::{match_text_and_media, StableMatcher, TextMediaMatch, UnusedContents};
pub use picking::{
    BudgetedMaxCoverSolver, CoverBits, CoverSet, InterestingSequencePicker, MaxCoverSolution,
    Selection, StampPagePicker,
};
pub use pipeline::{StampStory, StampStoryBuilder, StampStoryInput};
pub use types::config::{
    CappingMethod, CoverCosts, PickerConfig, ScoreWeights, SolverConfig, StoryConfig,
};
pub use types::content::{
    ContentType, ContentUnit, EmbeddedItem, Embedding, MediaItem, QuoteItem,
    SentenceWithAttributes,
};
pub use types::descriptors::DescriptorEmbeddings;
pub use types::stamp_page::{PickedStampPages, StampPage, StampPageType};
