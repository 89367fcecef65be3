//! Interesting sequence picker.
//!
//! Builds the story one page at a time. The first candidate always opens
//! the story; every following pick is the unpicked candidate with the
//! highest interestingness relative to what was picked before it.

use tracing::{debug, instrument};

use super::cover::CoverSet;
use super::scoring::InterestingnessScorer;
use crate::types::config::ScoreWeights;
use crate::types::stamp_page::StampPage;

/// Indices chosen by the sequence picker.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SequencePick {
    /// Picked candidate indices in story order
    pub ordered: Vec<usize>,

    /// Remaining candidate indices, ascending
    pub unused: Vec<usize>,
}

#[derive(Debug)]
pub struct InterestingSequencePicker<'a> {
    pages: &'a [StampPage],
    covers: &'a CoverSet,
    weights: ScoreWeights,
}

impl<'a> InterestingSequencePicker<'a> {
    /// `covers` must hold one cover per page, in page order.
    pub fn new(pages: &'a [StampPage], covers: &'a CoverSet, weights: ScoreWeights) -> Self {
        debug_assert_eq!(pages.len(), covers.len());
        Self {
            pages,
            covers,
            weights,
        }
    }

    /// Pick up to `max_pages` pages, seeded with the first candidate.
    #[instrument(skip_all, fields(candidates = self.pages.len(), max_pages = max_pages))]
    pub fn pick(&self, max_pages: usize) -> SequencePick {
        let n = self.pages.len();
        if n == 0 || max_pages == 0 {
            return SequencePick {
                ordered: Vec::new(),
                unused: (0..n).collect(),
            };
        }

        let mut scorer = InterestingnessScorer::new(self.pages, self.covers, self.weights);
        let mut picked = vec![false; n];
        let mut ordered = Vec::with_capacity(max_pages.min(n));

        scorer.pick(0);
        picked[0] = true;
        ordered.push(0);

        while ordered.len() < max_pages {
            let mut best: Option<(usize, f32)> = None;
            for index in (0..n).filter(|&i| !picked[i]) {
                let score = scorer.interestingness(index);
                // Strictly greater, so ties keep the earliest candidate
                match best {
                    Some((_, best_score)) if score <= best_score => {}
                    _ => best = Some((index, score)),
                }
            }

            let Some((index, score)) = best else {
                break;
            };
            debug!(index, score, "Picked next stamp page");
            scorer.pick(index);
            picked[index] = true;
            ordered.push(index);
        }

        let unused = (0..n).filter(|&i| !picked[i]).collect();
        SequencePick { ordered, unused }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picking::cover::build_covers;
    use crate::types::config::CoverCosts;
    use crate::types::content::SentenceWithAttributes;

    fn text_page(para: usize, embedding: Vec<f32>) -> StampPage {
        StampPage::text_only(&SentenceWithAttributes::new("text", para, embedding))
    }

    #[test]
    fn test_alternates_text_and_media_without_coverage() {
        let pages = vec![
            text_page(0, vec![1.0, 0.0, 0.0]),
            StampPage::media_only(1, vec![1.0, 0.0, 0.0]),
            text_page(2, vec![1.0, 0.0, 0.0]),
            StampPage::media_only(3, vec![1.0, 0.0, 0.0]),
            text_page(4, vec![1.0, 0.0, 0.0]),
        ];
        let summary = vec![vec![0.0, 0.0, 1.0]];
        let covers = build_covers(&pages, &summary, 0.5, &CoverCosts::default()).unwrap();

        let pick = InterestingSequencePicker::new(&pages, &covers, ScoreWeights::default()).pick(5);
        assert_eq!(pick.ordered, vec![0, 1, 2, 3, 4]);
        assert!(pick.unused.is_empty());
    }

    #[test]
    fn test_first_candidate_counts_toward_cap() {
        let pages = vec![
            text_page(0, vec![1.0, 0.0]),
            StampPage::media_only(1, vec![0.0, 1.0]),
            StampPage::media_only(2, vec![0.0, 1.0]),
        ];
        let summary = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let covers = build_covers(&pages, &summary, 0.5, &CoverCosts::default()).unwrap();

        let pick = InterestingSequencePicker::new(&pages, &covers, ScoreWeights::default()).pick(2);
        assert_eq!(pick.ordered, vec![0, 1]);
        assert_eq!(pick.unused, vec![2]);
    }

    #[test]
    fn test_prefers_uncovered_sentences() {
        // Both media pages switch type; only page 2 covers a new sentence.
        let pages = vec![
            text_page(0, vec![1.0, 0.0]),
            StampPage::media_only(1, vec![1.0, 0.0]),
            StampPage::media_only(2, vec![0.0, 1.0]),
        ];
        let summary = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        let covers = build_covers(&pages, &summary, 0.5, &CoverCosts::default()).unwrap();

        let pick = InterestingSequencePicker::new(&pages, &covers, ScoreWeights::default()).pick(2);
        assert_eq!(pick.ordered, vec![0, 2]);
    }

    #[test]
    fn test_zero_cap_picks_nothing() {
        let pages = vec![text_page(0, vec![1.0])];
        let covers = build_covers(&pages, &[vec![1.0]], 0.5, &CoverCosts::default()).unwrap();

        let pick = InterestingSequencePicker::new(&pages, &covers, ScoreWeights::default()).pick(0);
        assert!(pick.ordered.is_empty());
        assert_eq!(pick.unused, vec![0]);
    }
}
