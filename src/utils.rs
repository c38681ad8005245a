//! utils — small conversions between `ndarray` and `nalgebra`.
//!
//! The fitting code stores matrices as `ndarray` containers; dense
//! factorizations (Cholesky, symmetric eigendecomposition) go through
//! `nalgebra`. These helpers copy between the two without reinterpreting
//! memory layout.
use nalgebra::DMatrix;
use ndarray::Array2;

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix`.
pub fn to_dmatrix(a: &Array2<f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy a `nalgebra::DMatrix` into an `ndarray` matrix.
pub fn to_array2(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Replace a square matrix by `(M + Mᵀ)/2` in place.
pub fn symmetrize(m: &mut Array2<f64>) {
    let n = m.nrows().min(m.ncols());
    for i in 0..n {
        for j in (i + 1)..n {
            let avg = 0.5 * (m[[i, j]] + m[[j, i]]);
            m[[i, j]] = avg;
            m[[j, i]] = avg;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Conversions keep row/column positions, and symmetrization averages
    // mirrored entries while leaving the diagonal alone.
    fn conversions_preserve_layout_and_symmetrize_averages() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];
        let m = to_dmatrix(&a);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(to_array2(&m), a);

        let mut s = array![[1.0, 2.0], [4.0, 5.0]];
        symmetrize(&mut s);
        assert_eq!(s, array![[1.0, 3.0], [3.0, 5.0]]);
    }
}
