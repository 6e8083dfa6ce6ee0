//! Small bridges between `ndarray` storage and `nalgebra` factorizations.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array2, ArrayView2};

pub(crate) fn to_dmatrix(a: ArrayView2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

pub(crate) fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Inverse and log-determinant of a symmetric positive definite matrix.
///
/// Returns `None` when the Cholesky factorization fails.
pub(crate) fn spd_inverse_logdet(a: ArrayView2<f64>) -> Option<(Array2<f64>, f64)> {
    let chol = to_dmatrix(a).cholesky()?;
    let logdet = 2.0 * chol.l_dirty().diagonal().iter().map(|d| d.ln()).sum::<f64>();
    Some((from_dmatrix(&chol.inverse()), logdet))
}

/// Least-squares `β` minimizing `‖y − Xβ‖²` via SVD.
///
/// Tolerances are relaxed step by step for nearly collinear designs;
/// `None` if no finite solution is found.
pub(crate) fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Option<DVector<f64>> {
    if x.nrows() < x.ncols() || x.nrows() != y.len() {
        return None;
    }
    let svd = x.clone().svd(true, true);
    [1e-10, 1e-8, 1e-6]
        .iter()
        .filter_map(|&tol| svd.solve(y, tol).ok())
        .find(|beta| beta.iter().all(|v| v.is_finite()))
}

/// `(a + aᵀ) / 2`, in place.
pub(crate) fn symmetrize(a: &mut Array2<f64>) {
    let n = a.nrows();
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (a[[i, j]] + a[[j, i]]);
            a[[i, j]] = avg;
            a[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Inverse and log-determinant agree with a hand-computed 2×2 case.
    //
    // Given
    // -----
    // - A = [[4, 2], [2, 3]], det = 8.
    //
    // Expect
    // ------
    // - A·A⁻¹ = I and logdet = ln 8.
    fn spd_inverse_logdet_matches_closed_form() {
        let a = array![[4.0, 2.0], [2.0, 3.0]];
        let (inv, logdet) = spd_inverse_logdet(a.view()).expect("SPD input");
        let prod = a.dot(&inv);

        assert_abs_diff_eq!(logdet, 8.0_f64.ln(), epsilon = 1e-12);
        assert_abs_diff_eq!(prod[[0, 0]], 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(prod[[0, 1]], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(prod[[1, 1]], 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Indefinite matrices are reported, not inverted.
    //
    // Given
    // -----
    // - A = [[1, 2], [2, 1]] (eigenvalue −1).
    //
    // Expect
    // ------
    // - `None`.
    fn spd_inverse_logdet_rejects_indefinite_input() {
        let a = array![[1.0, 2.0], [2.0, 1.0]];
        assert!(spd_inverse_logdet(a.view()).is_none());
    }

    #[test]
    // Purpose
    // -------
    // An exactly linear relation is recovered.
    //
    // Given
    // -----
    // - y = 2 + 3x on x = (0, 1, 2); an under-determined 1×2 system.
    //
    // Expect
    // ------
    // - β = (2, 3); `None` for the under-determined case.
    fn solve_least_squares_recovers_line() {
        let x = DMatrix::from_row_slice(3, 2, &[1.0, 0.0, 1.0, 1.0, 1.0, 2.0]);
        let y = DVector::from_row_slice(&[2.0, 5.0, 8.0]);

        let beta = solve_least_squares(&x, &y).expect("full column rank");

        assert_abs_diff_eq!(beta[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(beta[1], 3.0, epsilon = 1e-10);
        let wide = DMatrix::from_row_slice(1, 2, &[1.0, 1.0]);
        assert!(solve_least_squares(&wide, &DVector::from_row_slice(&[1.0])).is_none());
    }
}
