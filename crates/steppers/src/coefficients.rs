//! Adams–Bashforth quadrature weights for variable step sizes.
//!
//! An order-`k` Adams–Bashforth step integrates, over the pending step, the
//! unique degree-`(k - 1)` polynomial interpolating the derivative at the `k`
//! most recent times. The weights depend only on the step sizes, so they are
//! computed from those alone:
//!
//! ```text
//! u(t + h) = u(t) + h * Σ w_i f(t_i)
//! ```
//!
//! For a uniform history the weights are the classical tabulated constants.
//! Otherwise each Lagrange basis polynomial is expanded into monomials and
//! integrated exactly.

mod cache;

pub use cache::CoefficientCache;

use stagger_core::TimeTag;

/// The highest order with tabulated constant-step coefficients.
pub const MAXIMUM_ORDER: usize = 8;

const ORDER_1: [f64; 1] = [1.0];
const ORDER_2: [f64; 2] = [-1.0 / 2.0, 3.0 / 2.0];
const ORDER_3: [f64; 3] = [5.0 / 12.0, -16.0 / 12.0, 23.0 / 12.0];
const ORDER_4: [f64; 4] = [-9.0 / 24.0, 37.0 / 24.0, -59.0 / 24.0, 55.0 / 24.0];
const ORDER_5: [f64; 5] = [
    251.0 / 720.0,
    -1274.0 / 720.0,
    2616.0 / 720.0,
    -2774.0 / 720.0,
    1901.0 / 720.0,
];
const ORDER_6: [f64; 6] = [
    -475.0 / 1440.0,
    2877.0 / 1440.0,
    -7298.0 / 1440.0,
    9982.0 / 1440.0,
    -7923.0 / 1440.0,
    4277.0 / 1440.0,
];
const ORDER_7: [f64; 7] = [
    19087.0 / 60480.0,
    -134_472.0 / 60480.0,
    407_139.0 / 60480.0,
    -688_256.0 / 60480.0,
    705_549.0 / 60480.0,
    -447_288.0 / 60480.0,
    198_721.0 / 60480.0,
];
const ORDER_8: [f64; 8] = [
    -36799.0 / 120_960.0,
    295_767.0 / 120_960.0,
    -1_041_723.0 / 120_960.0,
    2_102_243.0 / 120_960.0,
    -2_664_477.0 / 120_960.0,
    2_183_877.0 / 120_960.0,
    -1_152_169.0 / 120_960.0,
    434_241.0 / 120_960.0,
];

/// Returns the classical constant-step coefficients, oldest first.
///
/// Returns `None` for order zero or orders above [`MAXIMUM_ORDER`].
#[must_use]
pub fn constant_coefficients(order: usize) -> Option<&'static [f64]> {
    match order {
        1 => Some(&ORDER_1),
        2 => Some(&ORDER_2),
        3 => Some(&ORDER_3),
        4 => Some(&ORDER_4),
        5 => Some(&ORDER_5),
        6 => Some(&ORDER_6),
        7 => Some(&ORDER_7),
        8 => Some(&ORDER_8),
        _ => None,
    }
}

/// Computes Adams–Bashforth weights for a sequence of steps.
///
/// `steps` holds the sizes of the steps between consecutive past times, oldest
/// first, followed by the pending step. All steps share one sign; negative
/// steps integrate backward in time. The result holds one weight per past
/// time, oldest first, normalized so that the increment is
/// `pending_step * Σ w_i f_i`.
///
/// An empty input yields no weights.
#[must_use]
pub fn coefficients(steps: &[f64]) -> Vec<f64> {
    let Some(&pending) = steps.last() else {
        return Vec::new();
    };

    if steps.iter().all(|&step| step == pending) {
        if let Some(table) = constant_coefficients(steps.len()) {
            return table.to_vec();
        }
    }

    variable_coefficients(steps)
}

/// Builds the step sequence for [`coefficients`] from the past `times`,
/// oldest first, and the size of the pending step.
#[must_use]
pub fn steps_between(times: &[TimeTag], pending: f64) -> Vec<f64> {
    times
        .windows(2)
        .map(|pair| pair[1].value() - pair[0].value())
        .chain(std::iter::once(pending))
        .collect()
}

/// Integrates each Lagrange basis polynomial over the pending step.
///
/// Times are measured in units of the pending step with the newest past time
/// at zero, so the integration interval is `[0, 1]` regardless of scale or
/// direction.
fn variable_coefficients(steps: &[f64]) -> Vec<f64> {
    let order = steps.len();
    let pending = steps[order - 1];

    let mut nodes = vec![0.0; order];
    for i in (0..order - 1).rev() {
        nodes[i] = nodes[i + 1] - steps[i] / pending;
    }

    (0..order)
        .map(|i| {
            // Monomial coefficients of the basis polynomial, lowest degree first.
            let mut polynomial = vec![1.0];
            let mut denominator = 1.0;
            for (j, &node) in nodes.iter().enumerate() {
                if j == i {
                    continue;
                }
                let mut next = vec![0.0; polynomial.len() + 1];
                for (degree, &c) in polynomial.iter().enumerate() {
                    next[degree + 1] += c;
                    next[degree] -= node * c;
                }
                polynomial = next;
                denominator *= nodes[i] - node;
            }

            let integral: f64 = polynomial
                .iter()
                .enumerate()
                .map(|(degree, &c)| c / (degree + 1) as f64)
                .sum();
            integral / denominator
        })
        .collect()
}
