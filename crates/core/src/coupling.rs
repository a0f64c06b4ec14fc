/// The physical coupling between the two sides of an interface.
///
/// A coupling maps one local sample and one remote sample to a correction
/// value. It is treated as an opaque, potentially expensive function: the
/// integrators call it only for sample pairs that actually contribute, and at
/// most once per pair per step.
///
/// Couplings must be deterministic, always producing the same result for the
/// same pair of samples.
///
/// Closures of the form `Fn(&L, &R) -> Result<O, E>` implement `Coupling`
/// automatically.
pub trait Coupling<L, R> {
    type Output;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Evaluates the coupling between a local and a remote sample.
    ///
    /// # Errors
    ///
    /// Each coupling defines its own `Error` type for domain-specific failures.
    fn evaluate(&self, local: &L, remote: &R) -> Result<Self::Output, Self::Error>;
}

/// Blanket implementation for coupling closures.
impl<L, R, O, E, F> Coupling<L, R> for F
where
    F: Fn(&L, &R) -> Result<O, E>,
    E: std::error::Error + Send + Sync + 'static,
{
    type Output = O;
    type Error = E;

    fn evaluate(&self, local: &L, remote: &R) -> Result<O, E> {
        self(local, remote)
    }
}
