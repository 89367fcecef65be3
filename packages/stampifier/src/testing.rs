//! Testing utilities: deterministic embeddings and content fixtures.
//!
//! Useful for testing code that builds stamp stories without running a
//! real embedding model.

use sha2::{Digest, Sha256};

use crate::pipeline::StampStoryInput;
use crate::types::content::{
    ContentType, EmbeddedItem, Embedding, MediaItem, QuoteItem, SentenceWithAttributes,
};
use crate::types::descriptors::DescriptorEmbeddings;

/// Hash-derived embedding for `text`, stable across runs and platforms.
///
/// Equal texts give equal embeddings; different texts give embeddings that
/// are almost never similar.
pub fn deterministic_embedding(text: &str, dim: usize) -> Embedding {
    let mut values = Vec::with_capacity(dim);
    let mut block = 0u32;
    while values.len() < dim {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        hasher.update(block.to_le_bytes());
        let hash = hasher.finalize();

        values.extend(
            hash.iter()
                .take(dim - values.len())
                .map(|&byte| (byte as f32 / 127.5) - 1.0),
        );
        block += 1;
    }
    values
}

/// Unit vector along `axis`.
///
/// Two unit embeddings are fully similar on the same axis and unrelated on
/// different axes, which makes cover thresholds easy to reason about.
pub fn unit_embedding(dim: usize, axis: usize) -> Embedding {
    let mut embedding = vec![0.0; dim];
    if axis < dim {
        embedding[axis] = 1.0;
    }
    embedding
}

/// Builder for a [`StampStoryInput`] whose embeddings are unit vectors.
///
/// Each `topic` is an axis; content on the same topic is fully similar.
#[derive(Debug, Clone)]
pub struct ContentFixture {
    dim: usize,
    input: StampStoryInput,
}

impl ContentFixture {
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            input: StampStoryInput::default(),
        }
    }

    /// Add a summary sentence in paragraph `paragraph`.
    pub fn sentence(mut self, text: &str, paragraph: usize, topic: usize) -> Self {
        self.input
            .sentences
            .push(SentenceWithAttributes::new(text, paragraph, unit_embedding(self.dim, topic)));
        self
    }

    /// Add an image at content index `index`.
    pub fn image(mut self, index: usize, topic: usize) -> Self {
        self.input
            .media
            .push(MediaItem::image(index, unit_embedding(self.dim, topic), Vec::new()));
        self
    }

    /// Add a video at content index `index`.
    pub fn video(mut self, index: usize, topic: usize) -> Self {
        self.input
            .media
            .push(MediaItem::image(index, unit_embedding(self.dim, topic), Vec::new()).as_video());
        self
    }

    pub fn quote(mut self, index: usize, text: &str, topic: usize) -> Self {
        self.input
            .quotes
            .push(QuoteItem::new(index, text, unit_embedding(self.dim, topic)));
        self
    }

    pub fn embed(mut self, index: usize, content_type: ContentType) -> Self {
        self.input.embedded.push(EmbeddedItem::new(index, content_type));
        self
    }

    pub fn title(mut self, text: &str, paragraph: usize, topic: usize) -> Self {
        self.input
            .titles
            .push(SentenceWithAttributes::new(text, paragraph, unit_embedding(self.dim, topic)));
        self
    }

    pub fn build(self) -> StampStoryInput {
        self.input
    }
}

/// Descriptor map giving every embedded content type the embedding of
/// `topic`.
pub fn descriptors_on_topic(dim: usize, topic: usize) -> DescriptorEmbeddings {
    [
        ContentType::EmbeddedTweet,
        ContentType::EmbeddedInstagramPost,
        ContentType::EmbeddedPinterestPin,
        ContentType::EmbeddedYoutubeVideo,
    ]
    .into_iter()
    .fold(DescriptorEmbeddings::new(), |map, content_type| {
        map.with_descriptor(content_type, unit_embedding(dim, topic))
    })
}
