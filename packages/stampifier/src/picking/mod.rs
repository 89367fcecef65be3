//! Stamp page picking: cap a candidate list to a page budget.
//!
//! - [`cover`] - which summary sentences each candidate covers, and at what cost
//! - [`budgeted`] - approximate budgeted maximum coverage
//! - [`scoring`] / [`sequence`] - greedy interestingness sequence
//! - [`picker`] - strategy dispatch

pub mod budgeted;
pub mod cover;
pub mod picker;
pub mod scoring;
pub mod sequence;

pub use budgeted::{BudgetedMaxCoverSolver, MaxCoverSolution};
pub use cover::{build_covers, page_cost, Cover, CoverBits, CoverSet};
pub use picker::{partition, Selection, StampPagePicker};
pub use scoring::InterestingnessScorer;
pub use sequence::{InterestingSequencePicker, SequencePick};
