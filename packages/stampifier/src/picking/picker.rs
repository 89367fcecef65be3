//! Stamp page picker - caps a candidate list with one of two strategies.

use tracing::{debug, info, instrument, warn};

use super::budgeted::BudgetedMaxCoverSolver;
use super::cover::build_covers;
use super::sequence::InterestingSequencePicker;
use crate::error::Result;
use crate::types::config::{CappingMethod, PickerConfig};
use crate::types::content::SentenceWithAttributes;
use crate::types::stamp_page::{PickedStampPages, StampPage};

/// Candidate indices kept and left out by one picker run.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Kept candidate indices. In story order when `ordered`, else ascending.
    pub capped: Vec<usize>,

    /// Candidates not kept, ascending
    pub unused: Vec<usize>,

    /// Strategy that actually ran
    pub method: CappingMethod,

    /// Whether `capped` is a deliberate sequence that must not be re-sorted
    pub ordered: bool,
}

impl Selection {
    fn empty(candidates: usize, method: CappingMethod) -> Self {
        Self {
            capped: Vec::new(),
            unused: (0..candidates).collect(),
            method,
            ordered: method == CappingMethod::InterestingSequencePicker,
        }
    }
}

/// Chooses between budgeted max cover and the interesting sequence picker.
#[derive(Debug, Clone, Default)]
pub struct StampPagePicker {
    config: PickerConfig,
}

impl StampPagePicker {
    pub fn new(config: PickerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PickerConfig {
        &self.config
    }

    /// The strategy that will run for `candidates` pages.
    ///
    /// `Auto` and `BudgetedMaxCover` both switch to the sequence picker above
    /// the candidate limit.
    pub fn resolve_method(&self, requested: CappingMethod, candidates: usize) -> CappingMethod {
        let too_many = candidates > self.config.max_cover_candidate_limit;
        match requested {
            CappingMethod::InterestingSequencePicker => CappingMethod::InterestingSequencePicker,
            CappingMethod::Auto if too_many => CappingMethod::InterestingSequencePicker,
            CappingMethod::Auto => CappingMethod::BudgetedMaxCover,
            CappingMethod::BudgetedMaxCover if too_many => {
                warn!(
                    candidates,
                    limit = self.config.max_cover_candidate_limit,
                    "Too many candidates for budgeted max cover, using interesting sequence picker"
                );
                CappingMethod::InterestingSequencePicker
            }
            CappingMethod::BudgetedMaxCover => CappingMethod::BudgetedMaxCover,
        }
    }

    /// Pick which candidates to keep, by index.
    #[instrument(skip_all, fields(candidates = pages.len(), sentences = sentences.len(), max_pages = max_pages, method = %method))]
    pub fn select(
        &self,
        pages: &[StampPage],
        sentences: &[SentenceWithAttributes],
        max_pages: usize,
        method: CappingMethod,
    ) -> Result<Selection> {
        let method = self.resolve_method(method, pages.len());
        if pages.is_empty() || max_pages == 0 || sentences.is_empty() {
            debug!("Nothing to pick");
            return Ok(Selection::empty(pages.len(), method));
        }

        let embeddings: Vec<&[f32]> = sentences.iter().map(|s| s.embedding.as_slice()).collect();

        let selection = match method {
            CappingMethod::InterestingSequencePicker => {
                let covers =
                    build_covers(pages, &embeddings, self.config.sequence_threshold, &self.config.costs)?;
                let pick = InterestingSequencePicker::new(pages, &covers, self.config.weights).pick(max_pages);
                Selection {
                    capped: pick.ordered,
                    unused: pick.unused,
                    method,
                    ordered: true,
                }
            }
            _ => {
                let covers =
                    build_covers(pages, &embeddings, self.config.cover_threshold, &self.config.costs)?;
                let solution = BudgetedMaxCoverSolver::new(&covers, max_pages)
                    .with_config(self.config.solver.clone())?
                    .find_approximate_maximum_cover();

                let mut kept = vec![false; pages.len()];
                for &id in &solution.cover_ids {
                    kept[id] = true;
                }
                Selection {
                    capped: solution.cover_ids,
                    unused: (0..pages.len()).filter(|&i| !kept[i]).collect(),
                    method,
                    ordered: false,
                }
            }
        };

        info!(
            method = %selection.method,
            capped = selection.capped.len(),
            unused = selection.unused.len(),
            "Picked stamp pages"
        );
        Ok(selection)
    }

    /// Partition an owned candidate list into capped and unused pages.
    ///
    /// Capped pages follow the selection order.
    pub fn pick(
        &self,
        pages: Vec<StampPage>,
        sentences: &[SentenceWithAttributes],
        max_pages: usize,
        method: CappingMethod,
    ) -> Result<PickedStampPages> {
        let selection = self.select(&pages, sentences, max_pages, method)?;
        Ok(partition(pages, &selection))
    }

    /// Same as [`pick`](Self::pick), with the method given by name.
    pub fn pick_by_name(
        &self,
        pages: Vec<StampPage>,
        sentences: &[SentenceWithAttributes],
        max_pages: usize,
        method: &str,
    ) -> Result<PickedStampPages> {
        let method: CappingMethod = method.parse()?;
        self.pick(pages, sentences, max_pages, method)
    }
}

/// Move pages into capped and unused lists following a selection.
pub fn partition(pages: Vec<StampPage>, selection: &Selection) -> PickedStampPages {
    let mut slots: Vec<Option<StampPage>> = pages.into_iter().map(Some).collect();
    let mut take = |indices: &[usize]| -> Vec<StampPage> {
        indices.iter().filter_map(|&i| slots.get_mut(i).and_then(Option::take)).collect()
    };

    let capped_stamp_pages = take(&selection.capped);
    let unused_stamp_pages = take(&selection.unused);
    PickedStampPages {
        capped_stamp_pages,
        unused_stamp_pages,
    }
}
