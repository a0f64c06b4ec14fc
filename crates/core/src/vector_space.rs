/// A correction value that can be accumulated through weighted sums.
///
/// Boundary corrections are linear combinations of coupling evaluations, so
/// the integrators only ever need `self += scale * other`. The physical field
/// type behind a correction stays opaque.
pub trait VectorSpace {
    /// Adds `scale * other` to `self` in place.
    fn add_scaled(&mut self, scale: f64, other: &Self);
}

impl VectorSpace for f64 {
    fn add_scaled(&mut self, scale: f64, other: &Self) {
        *self += scale * other;
    }
}

impl<const N: usize> VectorSpace for [f64; N] {
    fn add_scaled(&mut self, scale: f64, other: &Self) {
        for (value, increment) in self.iter_mut().zip(other) {
            *value += scale * increment;
        }
    }
}

impl VectorSpace for Vec<f64> {
    /// Accumulates element-wise.
    ///
    /// An empty accumulator adopts the length of `other`, so `Vec::new()` can
    /// serve as the zero of any dimension.
    ///
    /// # Panics
    ///
    /// Panics if a non-empty accumulator and `other` differ in length.
    fn add_scaled(&mut self, scale: f64, other: &Self) {
        if self.is_empty() {
            self.resize(other.len(), 0.0);
        }
        assert_eq!(self.len(), other.len(), "dimension mismatch");
        for (value, increment) in self.iter_mut().zip(other) {
            *value += scale * increment;
        }
    }
}
