//! Gale-Shapley stable matching between sentences and media.
//!
//! Media propose, so the matching is optimal for the media side.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{Result, StampError};

/// Which preference matrix a row belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreferenceSide {
    /// `media_preference_for_sentence`: a sentence's ranking of media
    Sentence,
    /// `sentence_preference_for_media`: a media item's ranking of sentences
    Media,
}

impl fmt::Display for PreferenceSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreferenceSide::Sentence => f.write_str("sentence"),
            PreferenceSide::Media => f.write_str("media"),
        }
    }
}

/// Stable matcher over two NxN preference-rank matrices.
#[derive(Debug)]
pub struct StableMatcher<'a> {
    sentence_preference_for_media: &'a [Vec<usize>],
    /// `media_rank_for_sentence[s][m]` = position of media `m` in sentence `s`'s list
    media_rank_for_sentence: Vec<Vec<usize>>,
    set_size: usize,
}

impl<'a> StableMatcher<'a> {
    /// Validate the preference matrices.
    ///
    /// `media_preference_for_sentence[i]` lists media indices from most to
    /// least preferred by sentence `i`; `sentence_preference_for_media[j]`
    /// lists sentence indices from most to least preferred by media `j`.
    pub fn new(
        media_preference_for_sentence: &[Vec<usize>],
        sentence_preference_for_media: &'a [Vec<usize>],
    ) -> Result<Self> {
        let set_size = media_preference_for_sentence.len();
        if sentence_preference_for_media.len() != set_size {
            return Err(StampError::PreferenceMatrixShape {
                expected: set_size,
                actual: sentence_preference_for_media.len(),
            });
        }

        let media_rank_for_sentence =
            rank_table(media_preference_for_sentence, set_size, PreferenceSide::Sentence)?;
        // Only validated; media walk their lists in order.
        rank_table(sentence_preference_for_media, set_size, PreferenceSide::Media)?;

        Ok(Self {
            sentence_preference_for_media,
            media_rank_for_sentence,
            set_size,
        })
    }

    /// Run Gale-Shapley.
    ///
    /// Returns one `(sentence_index, media_index)` pair per media index, in
    /// media index order. Terminates within N² proposals.
    pub fn matching(&self) -> Vec<(usize, usize)> {
        let n = self.set_size;
        let mut sentence_matched_for_media: Vec<Option<usize>> = vec![None; n];
        let mut media_matched_for_sentence: Vec<Option<usize>> = vec![None; n];
        let mut next_proposal = vec![0usize; n];
        let mut unmatched_media: VecDeque<usize> = (0..n).collect();

        while let Some(media) = unmatched_media.pop_front() {
            let sentence = self.sentence_preference_for_media[media][next_proposal[media]];
            next_proposal[media] += 1;

            match media_matched_for_sentence[sentence] {
                None => {
                    media_matched_for_sentence[sentence] = Some(media);
                    sentence_matched_for_media[media] = Some(sentence);
                }
                Some(current) if self.prefers(sentence, media, current) => {
                    sentence_matched_for_media[current] = None;
                    unmatched_media.push_front(current);
                    media_matched_for_sentence[sentence] = Some(media);
                    sentence_matched_for_media[media] = Some(sentence);
                }
                Some(_) => unmatched_media.push_front(media),
            }
        }

        sentence_matched_for_media
            .into_iter()
            .enumerate()
            .filter_map(|(media, sentence)| sentence.map(|s| (s, media)))
            .collect()
    }

    fn prefers(&self, sentence: usize, candidate: usize, current: usize) -> bool {
        let ranks = &self.media_rank_for_sentence[sentence];
        ranks[candidate] < ranks[current]
    }
}

/// Invert preference rows into rank rows, checking each is a permutation.
fn rank_table(
    preferences: &[Vec<usize>],
    set_size: usize,
    side: PreferenceSide,
) -> Result<Vec<Vec<usize>>> {
    preferences
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            if row.len() != set_size {
                return Err(StampError::PreferenceMatrixShape {
                    expected: set_size,
                    actual: row.len(),
                });
            }
            let mut ranks = vec![usize::MAX; set_size];
            for (rank, &item) in row.iter().enumerate() {
                if item >= set_size || ranks[item] != usize::MAX {
                    return Err(StampError::InvalidPreferenceRow { side, row: row_index });
                }
                ranks[item] = rank;
            }
            Ok(ranks)
        })
        .collect()
}
