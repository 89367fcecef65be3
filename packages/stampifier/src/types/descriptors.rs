//! Per-content-type descriptor embeddings.
//!
//! Embedded content (tweets, posts, pins, videos) carries no text of its
//! own that could be embedded, so each such page is described by a fixed
//! embedding for its content type. The map is loaded once at startup and
//! handed to the stamp page assembly step.

use std::io::Read;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::content::{ContentType, Embedding};
use crate::error::Result;

/// Typed `ContentType -> Embedding` map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DescriptorEmbeddings {
    embeddings: IndexMap<ContentType, Embedding>,
}

impl DescriptorEmbeddings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object keyed by snake_case content type.
    ///
    /// ```json
    /// { "embedded_tweet": [0.1, 0.3], "embedded_youtube_video": [0.2, 0.0] }
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_reader(reader: impl Read) -> Result<Self> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Add or replace the descriptor for a content type.
    pub fn with_descriptor(mut self, content_type: ContentType, embedding: Embedding) -> Self {
        self.embeddings.insert(content_type, embedding);
        self
    }

    pub fn get(&self, content_type: ContentType) -> Option<&Embedding> {
        self.embeddings.get(&content_type)
    }

    pub fn len(&self) -> usize {
        self.embeddings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.embeddings.is_empty()
    }
}
