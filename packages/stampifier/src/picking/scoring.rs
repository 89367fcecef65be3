//! Interestingness scoring for the sequence picker.

use super::cover::{CoverBits, CoverSet};
use crate::types::config::ScoreWeights;
use crate::types::stamp_page::{StampPage, StampPageType};

/// Scores candidate pages relative to the last picked page and to the
/// sentences already covered by earlier picks.
#[derive(Debug)]
pub struct InterestingnessScorer<'a> {
    pages: &'a [StampPage],
    covers: &'a CoverSet,
    weights: ScoreWeights,
    picked_cover: CoverBits,
    last_picked: Option<usize>,
}

impl<'a> InterestingnessScorer<'a> {
    pub fn new(pages: &'a [StampPage], covers: &'a CoverSet, weights: ScoreWeights) -> Self {
        Self {
            pages,
            covers,
            weights,
            picked_cover: covers.empty_bits(),
            last_picked: None,
        }
    }

    /// Record a pick: its sentences count as covered and it becomes the
    /// page later candidates are compared against.
    pub fn pick(&mut self, index: usize) {
        self.picked_cover.union_with(&self.covers.get(index).bits);
        self.last_picked = Some(index);
    }

    pub fn last_picked(&self) -> Option<usize> {
        self.last_picked
    }

    /// Weighted sum of the three signals for picking `index` next.
    pub fn interestingness(&self, index: usize) -> f32 {
        self.weights.content_change * self.content_change_score(index)
            + self.weights.unpicked_weight_to_cost * self.unpicked_weight_to_cost_score(index)
            + self.weights.content_type * self.content_type_score(index)
    }

    /// 1 if the coarse type differs from the last pick, else 0.
    pub fn content_change_score(&self, index: usize) -> f32 {
        match self.last_picked {
            Some(last) if self.pages[last].stamp_type.coarse() != self.pages[index].stamp_type.coarse() => 1.0,
            Some(_) => 0.0,
            None => 1.0,
        }
    }

    /// Sentences covered by `index` and no earlier pick, per unit cost.
    pub fn unpicked_weight_to_cost_score(&self, index: usize) -> f32 {
        let cover = self.covers.get(index);
        cover.bits.count_uncovered(&self.picked_cover) as f32 / cover.cost
    }

    /// Type score scaled into `(0, 1]`.
    pub fn content_type_score(&self, index: usize) -> f32 {
        self.pages[index].stamp_type.score() / StampPageType::MAX_SCORE
    }
}
