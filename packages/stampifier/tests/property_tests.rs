//! Property-Based Tests
//!
//! Invariants checked over generated inputs:
//! - Stable matching is a perfect matching with no blocking pair
//! - Raising the cover threshold never adds covered sentences
//! - Budgeted max cover never exceeds the page cap
//! - Raising the page cap never lowers the covered count
//! - Solver and sequence picker are deterministic

use proptest::collection::vec;
use proptest::prelude::*;

use stampifier::picking::cover::cover_for_descriptor;
use stampifier::picking::{BudgetedMaxCoverSolver, CoverBits, CoverSet, InterestingSequencePicker};
use stampifier::{ScoreWeights, StableMatcher, StampPage};

// ============================================================================
// Strategies
// ============================================================================

/// `n` and two `n x n` preference matrices whose rows are permutations.
fn preference_matrices() -> impl Strategy<Value = (Vec<Vec<usize>>, Vec<Vec<usize>>)> {
    (1usize..8).prop_flat_map(|n| {
        let row = Just((0..n).collect::<Vec<usize>>()).prop_shuffle();
        (vec(row.clone(), n), vec(row, n))
    })
}

/// A cover set over `1..12` sentences with `1..8` covers.
fn cover_sets() -> impl Strategy<Value = CoverSet> {
    (1usize..12, 1usize..8).prop_flat_map(|(elements, covers)| {
        vec(
            (vec(0..elements, 0..elements + 1), prop_oneof![Just(1.0f32), Just(1.5), Just(2.0)]),
            covers,
        )
        .prop_map(move |specs| {
            let mut set = CoverSet::new(elements);
            for (indices, cost) in specs {
                set.push(CoverBits::from_indices(elements, indices), cost)
                    .expect("generated covers have the right width and a positive cost");
            }
            set
        })
    })
}

fn embedding(dim: usize) -> impl Strategy<Value = Vec<f32>> {
    vec(-1.0f32..1.0, dim)
}

// ============================================================================
// Stable Matching Properties
// ============================================================================

/// Property: every sentence and every media item is matched exactly once
#[test]
fn proptest_matching_is_perfect() {
    proptest!(|((sentence_prefs, media_prefs) in preference_matrices())| {
        let n = sentence_prefs.len();
        let matcher = StableMatcher::new(&sentence_prefs, &media_prefs).unwrap();
        let pairs = matcher.matching();

        prop_assert_eq!(pairs.len(), n);
        let mut sentences: Vec<usize> = pairs.iter().map(|(s, _)| *s).collect();
        let mut media: Vec<usize> = pairs.iter().map(|(_, m)| *m).collect();
        sentences.sort_unstable();
        media.sort_unstable();
        prop_assert_eq!(sentences, (0..n).collect::<Vec<_>>());
        prop_assert_eq!(media, (0..n).collect::<Vec<_>>());
    });
}

/// Property: no sentence and media item both prefer each other to their partners
#[test]
fn proptest_matching_has_no_blocking_pair() {
    proptest!(|((sentence_prefs, media_prefs) in preference_matrices())| {
        let n = sentence_prefs.len();
        let pairs = StableMatcher::new(&sentence_prefs, &media_prefs).unwrap().matching();

        let mut partner_of_sentence = vec![0; n];
        let mut partner_of_media = vec![0; n];
        for &(s, m) in &pairs {
            partner_of_sentence[s] = m;
            partner_of_media[m] = s;
        }
        let rank = |row: &Vec<usize>, item: usize| row.iter().position(|&x| x == item).unwrap();

        for s in 0..n {
            for m in 0..n {
                if partner_of_sentence[s] == m {
                    continue;
                }
                let sentence_wants = rank(&sentence_prefs[s], m) < rank(&sentence_prefs[s], partner_of_sentence[s]);
                let media_wants = rank(&media_prefs[m], s) < rank(&media_prefs[m], partner_of_media[m]);
                prop_assert!(!(sentence_wants && media_wants), "blocking pair ({}, {})", s, m);
            }
        }
    });
}

// ============================================================================
// Cover Properties
// ============================================================================

/// Property: a higher threshold covers a subset of what a lower one covers
#[test]
fn proptest_cover_shrinks_as_threshold_rises() {
    proptest!(|(
        descriptor in embedding(4),
        sentences in vec(embedding(4), 1..10),
        low in -1.0f32..1.0,
        delta in 0.0f32..1.0,
    )| {
        let loose = cover_for_descriptor(&descriptor, &sentences, low);
        let strict = cover_for_descriptor(&descriptor, &sentences, low + delta);
        prop_assert!(loose.is_superset_of(&strict));
    });
}

// ============================================================================
// Budgeted Max Cover Properties
// ============================================================================

/// Property: the solution never uses more covers than the cap
#[test]
fn proptest_budgeted_respects_cap() {
    proptest!(ProptestConfig::with_cases(64), |(covers in cover_sets(), cap in 0usize..5)| {
        let solution = BudgetedMaxCoverSolver::new(&covers, cap).find_approximate_maximum_cover();

        prop_assert!(solution.cover_ids.len() <= cap);
        prop_assert!(solution.cover_ids.windows(2).all(|w| w[0] < w[1]));

        let mut union = covers.empty_bits();
        for &id in &solution.cover_ids {
            union.union_with(&covers.get(id).bits);
        }
        prop_assert_eq!(union.count_ones(), solution.covered);
    });
}

/// Property: raising the cap never lowers the covered count
#[test]
fn proptest_larger_cap_never_covers_less() {
    proptest!(ProptestConfig::with_cases(32), |(covers in cover_sets())| {
        let covered: Vec<usize> = (1..=covers.len())
            .map(|cap| BudgetedMaxCoverSolver::new(&covers, cap).find_approximate_maximum_cover().covered)
            .collect();

        prop_assert!(
            covered.windows(2).all(|w| w[0] <= w[1]),
            "covered counts by cap: {:?}",
            covered
        );
    });
}

/// Property: solving twice gives the same answer
#[test]
fn proptest_budgeted_is_deterministic() {
    proptest!(ProptestConfig::with_cases(32), |(covers in cover_sets(), cap in 1usize..4)| {
        let first = BudgetedMaxCoverSolver::new(&covers, cap).find_approximate_maximum_cover();
        let second = BudgetedMaxCoverSolver::new(&covers, cap).find_approximate_maximum_cover();
        prop_assert_eq!(first, second);
    });
}

// ============================================================================
// Sequence Picker Properties
// ============================================================================

/// Property: the picker fills the cap, starts at the first page and is deterministic
#[test]
fn proptest_sequence_picker_fills_cap() {
    proptest!(ProptestConfig::with_cases(64), |(covers in cover_sets(), cap in 0usize..10)| {
        let pages: Vec<StampPage> = (0..covers.len())
            .map(|i| if i % 2 == 0 { StampPage::media_only(i, vec![]) } else { StampPage::embedded(i, vec![]) })
            .collect();
        let picker = InterestingSequencePicker::new(&pages, &covers, ScoreWeights::default());
        let pick = picker.pick(cap);

        prop_assert_eq!(pick.ordered.len(), cap.min(pages.len()));
        if cap > 0 {
            prop_assert_eq!(pick.ordered[0], 0);
        }
        prop_assert_eq!(pick.ordered.len() + pick.unused.len(), pages.len());
        prop_assert_eq!(pick, picker.pick(cap));
    });
}
