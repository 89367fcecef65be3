//! Equalize sentence and media lists before stable matching.
//!
//! Stable matching needs two lists of the same size. The larger list is
//! pruned by dropping the items least related to anything on the other side.

use ndarray::Array2;
use tracing::debug;

use crate::similarity::{col_max, elementwise_max, row_max, similarity_matrix};
use crate::types::content::{MediaItem, SentenceWithAttributes};

/// Which side lost items during pruning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrunedSide {
    Text,
    Media,
}

/// Content left out of matching.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UnusedContents {
    /// Both lists were already the same size
    #[default]
    None,
    Sentences(Vec<SentenceWithAttributes>),
    Media(Vec<MediaItem>),
}

impl UnusedContents {
    pub fn pruned_side(&self) -> Option<PrunedSide> {
        match self {
            UnusedContents::None => None,
            UnusedContents::Sentences(_) => Some(PrunedSide::Text),
            UnusedContents::Media(_) => Some(PrunedSide::Media),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            UnusedContents::None => 0,
            UnusedContents::Sentences(s) => s.len(),
            UnusedContents::Media(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Two equal-length lists ready for matching, plus whatever was left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreprocessedContents {
    pub sentences: Vec<SentenceWithAttributes>,
    pub media: Vec<MediaItem>,
    pub unused: UnusedContents,
}

/// Similarity of every sentence to every media item.
///
/// The larger of the description and attribute similarity is used.
pub fn sentence_media_similarity(
    sentences: &[SentenceWithAttributes],
    media: &[MediaItem],
) -> Array2<f32> {
    let sentence_embeddings: Vec<&[f32]> = sentences.iter().map(|s| s.embedding.as_slice()).collect();
    let descriptions: Vec<&[f32]> = media.iter().map(|m| m.description_embedding.as_slice()).collect();
    let attributes: Vec<&[f32]> = media.iter().map(|m| m.attribute_embedding.as_slice()).collect();

    elementwise_max(
        similarity_matrix(&sentence_embeddings, &descriptions),
        &similarity_matrix(&sentence_embeddings, &attributes),
    )
}

/// Prune the larger list so both lists have the same length.
///
/// If either list is empty, no matching is possible and the other list is
/// returned whole as unused. Kept items stay in their original order.
pub fn equalize_for_matching(
    sentences: Vec<SentenceWithAttributes>,
    media: Vec<MediaItem>,
) -> PreprocessedContents {
    if sentences.is_empty() {
        return PreprocessedContents {
            unused: unused_media(media),
            ..Default::default()
        };
    }
    if media.is_empty() {
        return PreprocessedContents {
            unused: unused_sentences(sentences),
            ..Default::default()
        };
    }

    let similarity = sentence_media_similarity(&sentences, &media);

    if media.len() > sentences.len() {
        let best: Vec<f32> = (0..media.len()).map(|j| col_max(&similarity, j)).collect();
        let (kept, dropped) = prune(media, &best, sentences.len());
        debug!(dropped = dropped.len(), "Pruned media for text-media matching");
        PreprocessedContents {
            sentences,
            media: kept,
            unused: UnusedContents::Media(dropped),
        }
    } else if sentences.len() > media.len() {
        let best: Vec<f32> = (0..sentences.len()).map(|i| row_max(&similarity, i)).collect();
        let (kept, dropped) = prune(sentences, &best, media.len());
        debug!(dropped = dropped.len(), "Pruned sentences for text-media matching");
        PreprocessedContents {
            sentences: kept,
            media,
            unused: UnusedContents::Sentences(dropped),
        }
    } else {
        PreprocessedContents {
            sentences,
            media,
            unused: UnusedContents::None,
        }
    }
}

fn unused_media(media: Vec<MediaItem>) -> UnusedContents {
    if media.is_empty() {
        UnusedContents::None
    } else {
        UnusedContents::Media(media)
    }
}

fn unused_sentences(sentences: Vec<SentenceWithAttributes>) -> UnusedContents {
    if sentences.is_empty() {
        UnusedContents::None
    } else {
        UnusedContents::Sentences(sentences)
    }
}

/// Keep the `keep` items with the highest best-similarity.
///
/// Ties drop the earlier item first. Returns `(kept, dropped)`, both in
/// original order.
fn prune<T>(items: Vec<T>, best_similarity: &[f32], keep: usize) -> (Vec<T>, Vec<T>) {
    let drop_count = items.len().saturating_sub(keep);

    let mut by_relatedness: Vec<usize> = (0..items.len()).collect();
    by_relatedness.sort_by(|&a, &b| best_similarity[a].total_cmp(&best_similarity[b]));

    let mut dropped_flags = vec![false; items.len()];
    for &index in by_relatedness.iter().take(drop_count) {
        dropped_flags[index] = true;
    }

    let mut kept = Vec::with_capacity(keep);
    let mut dropped = Vec::with_capacity(drop_count);
    for (item, is_dropped) in items.into_iter().zip(dropped_flags) {
        if is_dropped {
            dropped.push(item);
        } else {
            kept.push(item);
        }
    }
    (kept, dropped)
}
