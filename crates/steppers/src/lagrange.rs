//! Lagrange interpolation on arbitrary control points.
//!
//! The multirate integrator mostly needs the basis polynomials themselves,
//! which serve as weights attributing an off-grid estimate back to the samples
//! it was built from.

/// Evaluates the Lagrange basis polynomial for `control_points[index]` at `x`.
///
/// The polynomial is one at `control_points[index]` and zero at every other
/// control point. A single control point gives the constant polynomial one.
///
/// # Panics
///
/// Panics if `index` is out of range.
#[must_use]
pub fn lagrange_basis(index: usize, x: f64, control_points: &[f64]) -> f64 {
    let node = control_points[index];
    control_points
        .iter()
        .enumerate()
        .filter(|&(j, _)| j != index)
        .map(|(_, &other)| (x - other) / (node - other))
        .product()
}

/// Interpolates the values `ys` at control points `xs` and evaluates at `x`.
///
/// # Panics
///
/// Panics if `xs` and `ys` differ in length.
#[must_use]
pub fn interpolate(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    assert_eq!(
        xs.len(),
        ys.len(),
        "control points and values must have the same length"
    );
    ys.iter()
        .enumerate()
        .map(|(i, y)| y * lagrange_basis(i, x, xs))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;

    #[test]
    fn basis_is_cardinal_at_control_points() {
        let xs = [0.0, 0.5, 1.5, 2.0];
        for i in 0..xs.len() {
            for (j, &x) in xs.iter().enumerate() {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert_relative_eq!(lagrange_basis(i, x, &xs), expected);
            }
        }
    }

    #[test]
    fn basis_sums_to_one_off_grid() {
        let xs = [-1.0, 0.25, 0.5, 3.0];
        let sum: f64 = (0..xs.len()).map(|i| lagrange_basis(i, 1.7, &xs)).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-14);
    }

    #[test]
    fn single_point_is_constant() {
        assert_eq!(lagrange_basis(0, 42.0, &[1.0]), 1.0);
        assert_eq!(interpolate(-3.0, &[1.0], &[7.5]), 7.5);
    }

    #[test]
    fn reproduces_quadratic() {
        let f = |x: f64| 2.0 - x + 0.5 * x * x;
        let xs = [0.0, 1.0, 3.0];
        let ys = xs.map(f);
        assert_relative_eq!(interpolate(2.0, &xs, &ys), f(2.0), epsilon = 1e-14);
        assert_relative_eq!(interpolate(-1.0, &xs, &ys), f(-1.0), epsilon = 1e-14);
    }

    #[test]
    fn linear_extrapolation_weights() {
        // Extrapolating the line through 0 and 0.5 out to 1.0.
        assert_relative_eq!(lagrange_basis(0, 1.0, &[0.0, 0.5]), -1.0);
        assert_relative_eq!(lagrange_basis(1, 1.0, &[0.0, 0.5]), 2.0);
    }
}
