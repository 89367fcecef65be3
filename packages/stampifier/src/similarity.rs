//! Cosine similarity over embeddings and embedding lists.

use ndarray::{Array2, Zip};

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for empty, mismatched or zero-norm input.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Pairwise cosine similarity, `rows.len() x cols.len()`.
pub fn similarity_matrix<R, C>(rows: &[R], cols: &[C]) -> Array2<f32>
where
    R: AsRef<[f32]>,
    C: AsRef<[f32]>,
{
    Array2::from_shape_fn((rows.len(), cols.len()), |(i, j)| {
        cosine_similarity(rows[i].as_ref(), cols[j].as_ref())
    })
}

/// Element-wise maximum of two equally shaped matrices, in place.
pub fn elementwise_max(mut a: Array2<f32>, b: &Array2<f32>) -> Array2<f32> {
    debug_assert_eq!(a.dim(), b.dim());
    Zip::from(&mut a).and(b).for_each(|x, &y| *x = x.max(y));
    a
}

/// Largest value of row `i`, or negative infinity for an empty row.
pub fn row_max(matrix: &Array2<f32>, i: usize) -> f32 {
    matrix.row(i).iter().copied().fold(f32::NEG_INFINITY, f32::max)
}

/// Largest value of column `j`, or negative infinity for an empty column.
pub fn col_max(matrix: &Array2<f32>, j: usize) -> f32 {
    matrix.column(j).iter().copied().fold(f32::NEG_INFINITY, f32::max)
}
