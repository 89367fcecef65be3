//! Covers: which summary sentences a candidate stamp page represents.

use tracing::debug;

use crate::error::{Result, StampError};
use crate::similarity::cosine_similarity;
use crate::types::config::CoverCosts;
use crate::types::stamp_page::{StampPage, StampPageType};

/// Fixed-width bitset over summary sentence indices.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CoverBits {
    len: usize,
    words: Vec<u64>,
}

impl CoverBits {
    /// An empty bitset of `len` bits.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    /// A bitset with the given indices set. Indices `>= len` are ignored.
    pub fn from_indices(len: usize, indices: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = Self::new(len);
        for index in indices {
            if index < len {
                bits.set(index);
            }
        }
        bits
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn set(&mut self, index: usize) {
        debug_assert!(index < self.len);
        self.words[index / 64] |= 1u64 << (index % 64);
    }

    pub fn contains(&self, index: usize) -> bool {
        index < self.len && self.words[index / 64] & (1u64 << (index % 64)) != 0
    }

    /// Number of set bits.
    pub fn count_ones(&self) -> usize {
        self.words.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Bitwise OR `other` into `self`. Both must have the same width.
    pub fn union_with(&mut self, other: &CoverBits) {
        debug_assert_eq!(self.len, other.len);
        for (word, other) in self.words.iter_mut().zip(&other.words) {
            *word |= other;
        }
    }

    /// Number of bits set here but not in `covered`.
    pub fn count_uncovered(&self, covered: &CoverBits) -> usize {
        self.words
            .iter()
            .zip(&covered.words)
            .map(|(word, covered)| (word & !covered).count_ones() as usize)
            .sum()
    }

    pub fn is_superset_of(&self, other: &CoverBits) -> bool {
        other.count_uncovered(self) == 0
    }

    /// Indices of the set bits, ascending.
    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.contains(i))
    }
}

/// A cover over the summary sentences, with a cost and the index of the
/// candidate page it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Cover {
    pub bits: CoverBits,
    pub cost: f32,
    /// Index into the original candidate list
    pub id: usize,
}

/// The covers of one solver run.
///
/// Every cover in the set has exactly `number_of_elements` bits.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverSet {
    number_of_elements: usize,
    covers: Vec<Cover>,
}

impl CoverSet {
    pub fn new(number_of_elements: usize) -> Self {
        Self {
            number_of_elements,
            covers: Vec::new(),
        }
    }

    /// Add a cover. Its id is its position in the set.
    pub fn push(&mut self, bits: CoverBits, cost: f32) -> Result<usize> {
        let id = self.covers.len();
        if bits.len() != self.number_of_elements {
            return Err(StampError::CoverLengthMismatch {
                expected: self.number_of_elements,
                actual: bits.len(),
            });
        }
        if !cost.is_finite() || cost <= 0.0 {
            return Err(StampError::InvalidCoverCost { id, cost });
        }
        self.covers.push(Cover { bits, cost, id });
        Ok(id)
    }

    pub fn number_of_elements(&self) -> usize {
        self.number_of_elements
    }

    pub fn len(&self) -> usize {
        self.covers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.covers.is_empty()
    }

    pub fn get(&self, index: usize) -> &Cover {
        &self.covers[index]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Cover> {
        self.covers.iter()
    }

    pub fn total_cost(&self) -> f32 {
        self.covers.iter().map(|c| c.cost).sum()
    }

    /// Total cost of the covers at the given indices.
    pub fn cost_of(&self, indices: &[usize]) -> f32 {
        indices.iter().map(|&i| self.covers[i].cost).sum()
    }

    /// An empty bitset of this set's width.
    pub fn empty_bits(&self) -> CoverBits {
        CoverBits::new(self.number_of_elements)
    }
}

/// Cost of a page, by kind.
pub fn page_cost(page: &StampPage, costs: &CoverCosts) -> f32 {
    match page.stamp_type {
        StampPageType::Embedded => costs.embedded,
        StampPageType::Quoted => costs.quoted,
        StampPageType::TextOnly => costs.text_only,
        StampPageType::MediaOnly
        | StampPageType::MediaWithText
        | StampPageType::MediaWithTextAndTitle => costs.visual,
    }
}

/// Bits for the sentences whose similarity to `descriptor` reaches `threshold`.
pub fn cover_for_descriptor<E: AsRef<[f32]>>(
    descriptor: &[f32],
    sentence_embeddings: &[E],
    threshold: f32,
) -> CoverBits {
    CoverBits::from_indices(
        sentence_embeddings.len(),
        sentence_embeddings
            .iter()
            .enumerate()
            .filter(|(_, sentence)| cosine_similarity(descriptor, sentence.as_ref()) >= threshold)
            .map(|(i, _)| i),
    )
}

/// Build one cover per candidate page, in candidate order.
pub fn build_covers<E: AsRef<[f32]>>(
    pages: &[StampPage],
    sentence_embeddings: &[E],
    threshold: f32,
    costs: &CoverCosts,
) -> Result<CoverSet> {
    let mut set = CoverSet::new(sentence_embeddings.len());
    for page in pages {
        let bits = cover_for_descriptor(&page.stamp_descriptor_embedding, sentence_embeddings, threshold);
        set.push(bits, page_cost(page, costs))?;
    }
    debug!(
        covers = set.len(),
        elements = set.number_of_elements(),
        threshold,
        "Built stamp page covers"
    );
    Ok(set)
}
