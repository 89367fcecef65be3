//! Approximate budgeted maximum coverage.
//!
//! Implements the (1 - 1/e)-approximation of Khuller, Moss and Naor
//! (Algorithm 2): exhaustively seed with every small subset of covers that
//! fits the budget, extend each seed greedily by covered-per-cost, keep the
//! best. A binary search on the budget then finds the largest budget whose
//! cover still respects the page cap.

use std::time::Instant;

use tracing::{debug, instrument, warn};

use super::cover::{CoverBits, CoverSet};
use crate::error::Result;
use crate::types::config::SolverConfig;

/// Best cover found for a page cap.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaxCoverSolution {
    /// Ids of the picked covers, ascending
    pub cover_ids: Vec<usize>,

    /// Budget at which the cover was found
    pub budget: f32,

    /// Number of summary sentences covered
    pub covered: usize,

    /// The deadline expired before the search finished
    pub timed_out: bool,
}

/// Result of one greedy extension or one fixed-budget pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CoverPick {
    /// Cover indices in the order they were picked
    pub covers: Vec<usize>,
    pub covered: usize,
}

impl CoverPick {
    fn beats(&self, other: &CoverPick) -> bool {
        self.covered > other.covered
            || (self.covered == other.covered && self.covers.len() > other.covers.len())
    }
}

/// Budgeted max cover solver over one [`CoverSet`].
///
/// Owns no state between calls, so one solver can be reused for several
/// caps.
#[derive(Debug)]
pub struct BudgetedMaxCoverSolver<'a> {
    covers: &'a CoverSet,
    max_size_allowed: usize,
    config: SolverConfig,
}

impl<'a> BudgetedMaxCoverSolver<'a> {
    pub fn new(covers: &'a CoverSet, max_size_allowed: usize) -> Self {
        Self {
            covers,
            max_size_allowed,
            config: SolverConfig::default(),
        }
    }

    /// Use `config` for this solver, rejecting an unsupported seed size.
    pub fn with_config(mut self, config: SolverConfig) -> Result<Self> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    /// Binary search the budget for the best cover of at most
    /// `max_size_allowed` covers.
    #[instrument(skip_all, fields(covers = self.covers.len(), max_size = self.max_size_allowed))]
    pub fn find_approximate_maximum_cover(&self) -> MaxCoverSolution {
        if self.max_size_allowed == 0 || self.covers.is_empty() {
            return MaxCoverSolution::default();
        }

        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let step = self.budget_step();

        let total_cost = self.covers.total_cost();
        let mut best = MaxCoverSolution::default();

        // Search over whole steps so the bounds always move, whatever the
        // step size relative to the budget.
        let mut lower: u64 = 0;
        let mut upper: u64 = (f64::from(total_cost) / f64::from(step)).ceil() as u64;

        while lower <= upper {
            let mid = lower + (upper - lower) / 2;
            let budget = (mid as f64 * f64::from(step)).min(f64::from(total_cost)) as f32;
            let (pick, timed_out) = self.approximate_maximum_cover_helper(budget, deadline);

            if pick.covers.len() <= self.max_size_allowed {
                if pick.covered >= best.covered {
                    best.cover_ids = self.ids_of(&pick.covers);
                    best.budget = budget;
                    best.covered = pick.covered;
                }
                lower = mid + 1;
            } else if mid == 0 {
                break;
            } else {
                upper = mid - 1;
            }

            if timed_out {
                warn!(budget, "Budgeted max cover deadline expired, returning best cover so far");
                best.timed_out = true;
                break;
            }
        }

        debug!(
            budget = best.budget,
            covered = best.covered,
            picked = best.cover_ids.len(),
            step,
            "Found approximate maximum cover"
        );
        best
    }

    /// One run of Algorithm 2 at a fixed budget.
    ///
    /// Phase 1 seeds with every subset of size `1..k` that fits the budget,
    /// phase 2 with every subset of size `k`; each seed is extended greedily.
    /// Returns the best pick and whether the deadline cut phase 2 short.
    pub fn approximate_maximum_cover_helper(
        &self,
        budget: f32,
        deadline: Option<Instant>,
    ) -> (CoverPick, bool) {
        let k = self
            .config
            .seed_subset_size
            .clamp(1, SolverConfig::MAX_SEED_SUBSET_SIZE);
        let mut best = CoverPick::default();

        for size in 1..k {
            for_each_subset(self.covers.len(), size, |subset| {
                if self.covers.cost_of(subset) <= budget {
                    let pick = self.find_max_cover_given_initial_covers(subset, budget);
                    if pick.beats(&best) {
                        best = pick;
                    }
                }
                true
            });
        }

        let mut timed_out = false;
        for_each_subset(self.covers.len(), k, |subset| {
            if deadline.is_some_and(|d| Instant::now() >= d) {
                timed_out = true;
                return false;
            }
            if self.covers.cost_of(subset) <= budget {
                let pick = self.find_max_cover_given_initial_covers(subset, budget);
                if pick.beats(&best) {
                    best = pick;
                }
            }
            true
        });

        (best, timed_out)
    }

    /// Greedy extension from an initial set of picked covers.
    ///
    /// Repeatedly picks the affordable unpicked cover with the best
    /// `max(1, newly covered) / cost`, until nothing else fits the budget.
    /// Ties go to the lower index.
    pub fn find_max_cover_given_initial_covers(&self, initial: &[usize], budget: f32) -> CoverPick {
        let mut covered = self.covers.empty_bits();
        let mut picked = vec![false; self.covers.len()];
        let mut order = Vec::with_capacity(self.max_size_allowed.max(initial.len()));
        let mut cost_so_far = 0.0f32;

        for &index in initial {
            self.pick(index, &mut covered, &mut picked, &mut order, &mut cost_so_far);
        }

        loop {
            let mut candidate: Option<(usize, f32)> = None;
            for cover in self.covers.iter() {
                if picked[cover.id] || cost_so_far + cover.cost > budget {
                    continue;
                }
                let ratio = unpicked_weight_to_cost_ratio(&cover.bits, cover.cost, &covered);
                if candidate.map_or(true, |(_, best)| ratio > best) {
                    candidate = Some((cover.id, ratio));
                }
            }

            match candidate {
                Some((index, _)) => {
                    self.pick(index, &mut covered, &mut picked, &mut order, &mut cost_so_far)
                }
                None => break,
            }
        }

        CoverPick {
            covers: order,
            covered: covered.count_ones(),
        }
    }

    fn pick(
        &self,
        index: usize,
        covered: &mut CoverBits,
        picked: &mut [bool],
        order: &mut Vec<usize>,
        cost_so_far: &mut f32,
    ) {
        let cover = self.covers.get(index);
        covered.union_with(&cover.bits);
        picked[index] = true;
        order.push(index);
        *cost_so_far += cover.cost;
    }

    fn ids_of(&self, indices: &[usize]) -> Vec<usize> {
        let mut ids: Vec<usize> = indices.iter().map(|&i| self.covers.get(i).id).collect();
        ids.sort_unstable();
        ids
    }

    /// Binary search step.
    ///
    /// Half of the smallest gap between distinct cover costs (or the
    /// smallest cost when all costs are equal), so that neighbouring cost
    /// levels are never merged into one comparison. Never below the `f32`
    /// resolution of the total cost.
    pub fn budget_step(&self) -> f32 {
        let resolution = self.covers.total_cost() * f32::EPSILON;

        if let Some(step) = self.config.budget_step.filter(|s| s.is_finite() && *s > 0.0) {
            return step.max(resolution);
        }

        let mut costs: Vec<f32> = self.covers.iter().map(|c| c.cost).collect();
        costs.sort_by(f32::total_cmp);

        let smallest_cost = costs.first().copied().unwrap_or(1.0);
        let smallest_gap = costs
            .windows(2)
            .map(|w| w[1] - w[0])
            .filter(|gap| *gap > resolution)
            .fold(smallest_cost, f32::min);

        (smallest_gap / 2.0).max(resolution)
    }
}

/// `max(1, newly covered) / cost`.
///
/// The floor of one keeps covers that add nothing new from scoring zero,
/// so remaining budget is still spent on the cheapest pages.
pub fn unpicked_weight_to_cost_ratio(bits: &CoverBits, cost: f32, covered: &CoverBits) -> f32 {
    bits.count_uncovered(covered).max(1) as f32 / cost
}

/// Visit every `size`-subset of `0..n` in lexicographic order.
///
/// The visitor returns false to stop early.
fn for_each_subset(n: usize, size: usize, mut visit: impl FnMut(&[usize]) -> bool) {
    if size == 0 || size > n {
        return;
    }

    let mut subset: Vec<usize> = (0..size).collect();
    loop {
        if !visit(&subset) {
            return;
        }

        // Find the rightmost position that can still move right.
        let mut i = size;
        while i > 0 && subset[i - 1] == n - size + i - 1 {
            i -= 1;
        }
        if i == 0 {
            return;
        }
        subset[i - 1] += 1;
        for j in i..size {
            subset[j] = subset[j - 1] + 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StampError;
    use std::time::Duration;

    /// Six 4-sentence blocks over ten sentences, overlapping by two.
    fn overlapping_blocks() -> CoverSet {
        let mut set = CoverSet::new(10);
        for block in [
            vec![0, 1, 2, 3],
            vec![2, 3, 4, 5],
            vec![4, 5, 6, 7],
            vec![6, 7, 8, 9],
            vec![8, 9, 0, 1],
            vec![1, 2, 3, 4],
        ] {
            set.push(CoverBits::from_indices(10, block), 1.0).unwrap();
        }
        set
    }

    #[test]
    fn test_subsets_are_lexicographic() {
        let mut seen = Vec::new();
        for_each_subset(4, 2, |s| {
            seen.push(s.to_vec());
            true
        });
        assert_eq!(
            seen,
            vec![vec![0, 1], vec![0, 2], vec![0, 3], vec![1, 2], vec![1, 3], vec![2, 3]]
        );

        let mut count = 0;
        for_each_subset(2, 3, |_| {
            count += 1;
            true
        });
        assert_eq!(count, 0);
    }

    #[test]
    fn test_greedy_prefers_most_new_elements_per_cost() {
        let set = overlapping_blocks();
        let solver = BudgetedMaxCoverSolver::new(&set, 3);

        let pick = solver.find_max_cover_given_initial_covers(&[0], 3.0);
        assert_eq!(pick.covers, vec![0, 2, 3]);
        assert_eq!(pick.covered, 10);
    }

    #[test]
    fn test_greedy_respects_budget() {
        let set = overlapping_blocks();
        let solver = BudgetedMaxCoverSolver::new(&set, 6);

        let pick = solver.find_max_cover_given_initial_covers(&[], 2.5);
        assert_eq!(pick.covers.len(), 2);
        assert_eq!(pick.covered, 8);
    }

    #[test]
    fn test_picks_three_overlapping_blocks() {
        let set = overlapping_blocks();
        let solution = BudgetedMaxCoverSolver::new(&set, 3).find_approximate_maximum_cover();

        assert_eq!(solution.cover_ids, vec![0, 2, 3]);
        assert_eq!(solution.covered, 10);
        assert!(!solution.timed_out);
    }

    #[test]
    fn test_larger_cap_never_covers_less() {
        let set = overlapping_blocks();
        let covered: Vec<usize> = (1..=6)
            .map(|cap| {
                let solution = BudgetedMaxCoverSolver::new(&set, cap).find_approximate_maximum_cover();
                assert!(solution.cover_ids.len() <= cap);
                solution.covered
            })
            .collect();

        assert_eq!(&covered[..3], &[4, 8, 10]);
        assert!(covered.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_zero_cap_or_no_covers() {
        let set = overlapping_blocks();
        assert_eq!(
            BudgetedMaxCoverSolver::new(&set, 0).find_approximate_maximum_cover(),
            MaxCoverSolution::default()
        );

        let empty = CoverSet::new(10);
        let solution = BudgetedMaxCoverSolver::new(&empty, 3).find_approximate_maximum_cover();
        assert!(solution.cover_ids.is_empty());
        assert_eq!(solution.budget, 0.0);
    }

    #[test]
    fn test_single_page_cap_keeps_widest_cover() {
        let mut set = CoverSet::new(3);
        set.push(CoverBits::from_indices(3, [0]), 1.0).unwrap();
        set.push(CoverBits::from_indices(3, [1]), 1.0).unwrap();
        set.push(CoverBits::from_indices(3, [0, 1, 2]), 1.0).unwrap();

        let solution = BudgetedMaxCoverSolver::new(&set, 1).find_approximate_maximum_cover();
        assert_eq!(solution.cover_ids, vec![2]);
        assert_eq!(solution.covered, 3);
    }

    #[test]
    fn test_budget_step_from_cost_gaps() {
        let set = overlapping_blocks();
        assert_eq!(BudgetedMaxCoverSolver::new(&set, 3).budget_step(), 0.5);

        let mut mixed = CoverSet::new(1);
        mixed.push(CoverBits::new(1), 1.0).unwrap();
        mixed.push(CoverBits::new(1), 1.5).unwrap();
        mixed.push(CoverBits::new(1), 2.0).unwrap();
        assert_eq!(BudgetedMaxCoverSolver::new(&mixed, 3).budget_step(), 0.25);

        let explicit = BudgetedMaxCoverSolver::new(&mixed, 3)
            .with_config(SolverConfig::default().with_budget_step(0.05))
            .unwrap();
        assert_eq!(explicit.budget_step(), 0.05);
    }

    #[test]
    fn test_tiny_explicit_step_still_terminates() {
        let mut set = CoverSet::new(8);
        for block in [[0, 1], [2, 3], [4, 5], [6, 7]] {
            set.push(CoverBits::from_indices(8, block), 1.0).unwrap();
        }
        let solver = BudgetedMaxCoverSolver::new(&set, 2)
            .with_config(SolverConfig::default().with_budget_step(1e-9))
            .unwrap();

        assert!(solver.budget_step() >= 4.0 * f32::EPSILON);
        let solution = solver.find_approximate_maximum_cover();
        assert_eq!(solution.cover_ids.len(), 2);
        assert_eq!(solution.covered, 4);
    }

    #[test]
    fn test_large_close_costs_still_terminate() {
        let mut set = CoverSet::new(8);
        for (block, cost) in [[0, 1], [2, 3], [4, 5], [6, 7]]
            .into_iter()
            .zip([4096.0, 4096.0005, 4096.0, 4096.0005])
        {
            set.push(CoverBits::from_indices(8, block), cost).unwrap();
        }
        let solver = BudgetedMaxCoverSolver::new(&set, 2);

        assert!(solver.budget_step() >= set.total_cost() * f32::EPSILON);
        let solution = solver.find_approximate_maximum_cover();
        assert_eq!(solution.cover_ids.len(), 2);
        assert_eq!(solution.covered, 4);
    }

    #[test]
    fn test_rejects_large_seed_subsets() {
        let set = overlapping_blocks();
        let err = BudgetedMaxCoverSolver::new(&set, 3)
            .with_config(SolverConfig::default().with_seed_subset_size(10))
            .unwrap_err();
        assert!(matches!(err, StampError::InvalidSeedSubsetSize { actual: 10, .. }));

        let solution = BudgetedMaxCoverSolver::new(&set, 3)
            .with_config(SolverConfig::default().with_seed_subset_size(1))
            .unwrap()
            .find_approximate_maximum_cover();
        assert!(solution.cover_ids.len() <= 3);
    }

    #[test]
    fn test_expired_deadline_returns_feasible_cover() {
        let set = overlapping_blocks();
        let solution = BudgetedMaxCoverSolver::new(&set, 3)
            .with_config(SolverConfig::default().with_deadline(Duration::ZERO))
            .unwrap()
            .find_approximate_maximum_cover();

        assert!(solution.timed_out);
        assert!(solution.cover_ids.len() <= 3);
    }
}
