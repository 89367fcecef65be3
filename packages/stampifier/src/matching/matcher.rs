//! Text-media matching.
//!
//! Sentences and media are scored pairwise by embedding similarity,
//! discounted by how far apart they sit in the document, then paired with
//! [`StableMatcher`].

use ndarray::Array2;
use tracing::{debug, instrument};

use super::preprocess::{equalize_for_matching, sentence_media_similarity, UnusedContents};
use super::stable::StableMatcher;
use crate::error::{Result, StampError};
use crate::types::content::{MediaItem, SentenceWithAttributes};

/// Outcome of matching sentences to media.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMediaMatch {
    /// Matched `(sentence, media)` pairs, in media order
    pub matched: Vec<(SentenceWithAttributes, MediaItem)>,

    /// Sentences or media that could not be matched
    pub unused: UnusedContents,
}

/// Preference matrices for the stable matcher.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceLists {
    /// Row `i`: media indices, most preferred first, for sentence `i`
    pub media_preference_for_sentence: Vec<Vec<usize>>,

    /// Row `j`: sentence indices, most preferred first, for media `j`
    pub sentence_preference_for_media: Vec<Vec<usize>>,
}

/// Score of pairing a sentence with a media item.
///
/// `(1 + similarity) / (1 + |distance|)`. The offsets keep dissimilar but
/// adjacent items matchable and avoid dividing by zero.
pub fn pairing_score(similarity: f32, sentence: &SentenceWithAttributes, media: &MediaItem) -> f32 {
    let distance = (media.content_index as f32 - sentence.paragraph_index as f32).abs();
    (1.0 + similarity) / (1.0 + distance)
}

/// Build preference lists for two equal-length lists.
///
/// Rows are sorted by descending pairing score; ties keep index order.
pub fn build_preference_lists(
    sentences: &[SentenceWithAttributes],
    media: &[MediaItem],
) -> Result<PreferenceLists> {
    if sentences.len() != media.len() {
        return Err(StampError::UnequalMatchingInput {
            sentences: sentences.len(),
            media: media.len(),
        });
    }

    let n = sentences.len();
    let similarity = sentence_media_similarity(sentences, media);
    let scores = Array2::from_shape_fn((n, n), |(i, j)| {
        pairing_score(similarity[[i, j]], &sentences[i], &media[j])
    });

    let media_preference_for_sentence = (0..n)
        .map(|i| sorted_descending(n, |j| scores[[i, j]]))
        .collect();
    let sentence_preference_for_media = (0..n)
        .map(|j| sorted_descending(n, |i| scores[[i, j]]))
        .collect();

    Ok(PreferenceLists {
        media_preference_for_sentence,
        sentence_preference_for_media,
    })
}

fn sorted_descending(n: usize, score: impl Fn(usize) -> f32) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    indices.sort_by(|&a, &b| score(b).total_cmp(&score(a)));
    indices
}

/// Match two lists of the same length.
///
/// Returns `(sentence_index, media_index)` pairs. Callers with lists of
/// different sizes must run [`equalize_for_matching`] first.
pub fn match_equal_sized(
    sentences: &[SentenceWithAttributes],
    media: &[MediaItem],
) -> Result<Vec<(usize, usize)>> {
    let preferences = build_preference_lists(sentences, media)?;
    let matcher = StableMatcher::new(
        &preferences.media_preference_for_sentence,
        &preferences.sentence_preference_for_media,
    )?;
    Ok(matcher.matching())
}

/// Match sentences to media, pruning whichever list is longer.
#[instrument(skip_all, fields(sentences = sentences.len(), media = media.len()))]
pub fn match_text_and_media(
    sentences: Vec<SentenceWithAttributes>,
    media: Vec<MediaItem>,
) -> Result<TextMediaMatch> {
    let prepared = equalize_for_matching(sentences, media);
    if prepared.sentences.is_empty() {
        return Ok(TextMediaMatch {
            matched: Vec::new(),
            unused: prepared.unused,
        });
    }

    let pairs = match_equal_sized(&prepared.sentences, &prepared.media)?;
    debug!(matched = pairs.len(), unused = prepared.unused.len(), "Matched text to media");

    let matched = pairs
        .into_iter()
        .map(|(s, m)| (prepared.sentences[s].clone(), prepared.media[m].clone()))
        .collect();

    Ok(TextMediaMatch {
        matched,
        unused: prepared.unused,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence(text: &str, para: usize, embedding: Vec<f32>) -> SentenceWithAttributes {
        SentenceWithAttributes::new(text, para, embedding)
    }

    fn media(index: usize, embedding: Vec<f32>) -> MediaItem {
        MediaItem::image(index, embedding, vec![])
    }

    #[test]
    fn test_pairing_score_penalises_distance() {
        let s = sentence("a", 2, vec![]);
        let near = media(3, vec![]);
        let far = media(12, vec![]);

        assert!((pairing_score(1.0, &s, &near) - 1.0).abs() < 1e-6);
        assert!(pairing_score(1.0, &s, &far) < pairing_score(0.0, &s, &near));
        assert!((pairing_score(0.0, &s, &media(2, vec![])) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_unequal_lists() {
        let err = match_equal_sized(&[sentence("a", 0, vec![1.0])], &[]).unwrap_err();
        assert!(matches!(err, StampError::UnequalMatchingInput { sentences: 1, media: 0 }));
    }

    #[test]
    fn test_matches_contents() {
        let s2 = sentence("two", 0, vec![0.0, 1.0]);
        let m1 = media(0, vec![1.0, 0.0]);
        let m2 = media(0, vec![0.0, 1.0]);

        let result = match_text_and_media(vec![s2.clone()], vec![m1.clone(), m2.clone()]).unwrap();
        assert_eq!(result.matched, vec![(s2, m2)]);
        assert_eq!(result.unused, UnusedContents::Media(vec![m1]));
    }

    #[test]
    fn test_preference_ties_keep_index_order() {
        let sentences = vec![sentence("a", 0, vec![1.0]), sentence("b", 0, vec![1.0])];
        let media = vec![media(0, vec![1.0]), media(0, vec![1.0])];

        let lists = build_preference_lists(&sentences, &media).unwrap();
        assert_eq!(lists.media_preference_for_sentence, vec![vec![0, 1], vec![0, 1]]);
        assert_eq!(lists.sentence_preference_for_media, vec![vec![0, 1], vec![0, 1]]);
    }

    #[test]
    fn test_nothing_to_match() {
        let result = match_text_and_media(vec![], vec![]).unwrap();
        assert!(result.matched.is_empty());
        assert!(result.unused.is_empty());
    }
}
