//! Content types - the typed fragments extracted from a web page.
//!
//! Embeddings are produced upstream and treated as opaque vectors; the
//! library only ever compares them with cosine similarity.

use serde::{Deserialize, Serialize};

/// A fixed-length embedding vector produced by an external model.
pub type Embedding = Vec<f32>;

/// Kind of content a fragment was extracted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Quote,
    EmbeddedTweet,
    EmbeddedInstagramPost,
    EmbeddedPinterestPin,
    EmbeddedYoutubeVideo,
}

impl ContentType {
    /// Whether this content is a third-party embed (tweet, post, pin, video).
    pub fn is_embedded(&self) -> bool {
        matches!(
            self,
            ContentType::EmbeddedTweet
                | ContentType::EmbeddedInstagramPost
                | ContentType::EmbeddedPinterestPin
                | ContentType::EmbeddedYoutubeVideo
        )
    }
}

/// A summary (or title) sentence along with its position in the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceWithAttributes {
    /// The sentence text
    pub text: String,

    /// Content index of the paragraph the sentence came from
    pub paragraph_index: usize,

    /// Position of the sentence inside its paragraph
    pub sentence_index_in_para: usize,

    /// Scale applied to `sentence_index_in_para` when ordering by position.
    ///
    /// Usually `1 / sentences_in_paragraph` so that all sentences of a
    /// paragraph sort before the next paragraph.
    pub sentence_weight: f32,

    /// Font style as it appears on the page
    pub font_style: Option<String>,

    /// Sentence embedding
    pub embedding: Embedding,
}

impl SentenceWithAttributes {
    /// Create a sentence that is the first one of its paragraph.
    pub fn new(text: impl Into<String>, paragraph_index: usize, embedding: Embedding) -> Self {
        Self {
            text: text.into(),
            paragraph_index,
            sentence_index_in_para: 0,
            sentence_weight: 0.0,
            font_style: None,
            embedding,
        }
    }

    /// Set the position of the sentence inside its paragraph.
    pub fn with_position_in_paragraph(mut self, index: usize, weight: f32) -> Self {
        self.sentence_index_in_para = index;
        self.sentence_weight = weight;
        self
    }

    /// Set the font style.
    pub fn with_font_style(mut self, font_style: impl Into<String>) -> Self {
        self.font_style = Some(font_style.into());
        self
    }

    /// Document-order key. Only used for sorting, never for selection.
    pub fn weighted_index(&self) -> f32 {
        self.paragraph_index as f32 + self.sentence_index_in_para as f32 * self.sentence_weight
    }
}

/// An image or video (gif) that can back a stamp page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Index of the media in the extracted content list
    pub content_index: usize,

    /// Image or Video
    pub content_type: ContentType,

    /// Embedding of the media description (labels, web entities)
    pub description_embedding: Embedding,

    /// Embedding of the media attributes (caption, alt text)
    pub attribute_embedding: Embedding,

    /// Caption shown with the media on the page
    #[serde(default)]
    pub caption: Option<String>,

    /// The media already carries text, so overlays should be avoided
    #[serde(default)]
    pub has_text_on_image: bool,
}

impl MediaItem {
    /// Create an image with the given description and attribute embeddings.
    pub fn image(
        content_index: usize,
        description_embedding: Embedding,
        attribute_embedding: Embedding,
    ) -> Self {
        Self {
            content_index,
            content_type: ContentType::Image,
            description_embedding,
            attribute_embedding,
            caption: None,
            has_text_on_image: false,
        }
    }

    /// Mark the media as a video or gif.
    pub fn as_video(mut self) -> Self {
        self.content_type = ContentType::Video;
        self
    }

    /// Set the caption.
    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Flag that the image has text rendered on it.
    pub fn with_text_on_image(mut self, has_text: bool) -> Self {
        self.has_text_on_image = has_text;
        self
    }
}

/// A block quote from the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub content_index: usize,
    pub text: String,
    #[serde(default)]
    pub cite: Option<String>,
    pub embedding: Embedding,
}

impl QuoteItem {
    pub fn new(content_index: usize, text: impl Into<String>, embedding: Embedding) -> Self {
        Self {
            content_index,
            text: text.into(),
            cite: None,
            embedding,
        }
    }

    pub fn with_cite(mut self, cite: impl Into<String>) -> Self {
        self.cite = Some(cite.into());
        self
    }
}

/// Third-party embedded content (tweet, instagram post, pinterest pin, youtube video).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedItem {
    pub content_index: usize,
    pub content_type: ContentType,
    #[serde(default)]
    pub url: Option<String>,
}

impl EmbeddedItem {
    pub fn new(content_index: usize, content_type: ContentType) -> Self {
        Self {
            content_index,
            content_type,
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// One unit of content that becomes exactly one candidate stamp page.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentUnit {
    /// A summary sentence paired with a media item by the text-media matcher
    MatchedPair(SentenceWithAttributes, MediaItem),
    /// A summary sentence with no media
    Sentence(SentenceWithAttributes),
    /// A media item with no sentence
    Media(MediaItem),
    Quote(QuoteItem),
    Embedded(EmbeddedItem),
}
