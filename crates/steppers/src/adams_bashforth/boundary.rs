use std::cmp::Ordering;

use log::{debug, trace};
use stagger_core::{
    ApproximateTime, Coupling, EndTime, EvolutionDirection, StepEnd, TimeTag, VectorSpace,
};

use crate::{
    coefficients::{CoefficientCache, coefficients, steps_between},
    history::{BoundaryEvaluator, BoundaryHistory, Entry, Side},
    lagrange::lagrange_basis,
};

use super::{AdamsBashforth, Error};

impl AdamsBashforth {
    /// Adds the boundary correction for the next local step to `result`.
    ///
    /// The step runs from the latest local sample to that time plus `step`.
    /// On success, history no longer needed by later steps at the configured
    /// order is marked unneeded; call [`BoundaryHistory::compact`] to reclaim
    /// it.
    ///
    /// # Errors
    ///
    /// Returns an error if `step` is unusable, either side lacks the samples
    /// the order requires, the remote history reaches the step end, or the
    /// coupling fails. On error neither `result` nor `history` is modified.
    pub fn add_boundary_delta<L, R, C>(
        &self,
        result: &mut C::Output,
        history: &mut BoundaryHistory<L, R>,
        step: f64,
        coupling: &C,
    ) -> Result<(), Error>
    where
        C: Coupling<L, R>,
        C::Output: VectorSpace + Clone,
    {
        Self::check_step(history.direction(), step)?;
        let order = self.boundary_order(history)?;
        let window = Window::locate(history, order)?;
        let end = StepEnd::new(window.start, step);
        check_remote_before(history, &end)?;
        debug!("boundary step of {} from t={}", end.step(), end.start());

        let mut total = result.clone();
        boundary_impl(&mut total, &mut history.evaluator(coupling), window, &end)?;
        *result = total;

        let keep = self.order();
        let local_from = history.local_size().saturating_sub(keep);
        let remote_from = window.remote_available.saturating_sub(keep);
        debug!("retaining local samples from {local_from}, remote from {remote_from}");
        history.retain_from_position(Side::Local, local_from);
        history.retain_from_position(Side::Remote, remote_from);
        Ok(())
    }

    /// Adds the boundary correction from the latest local sample to `time`.
    ///
    /// Dense output only reads the history.
    ///
    /// # Errors
    ///
    /// Returns an error if `time` is not after the latest local sample, either
    /// side lacks the samples the order requires, the remote history reaches
    /// `time`, or the coupling fails. On error `result` is not modified.
    pub fn boundary_dense_output<L, R, C>(
        &self,
        result: &mut C::Output,
        history: &BoundaryHistory<L, R>,
        time: f64,
        coupling: &C,
    ) -> Result<(), Error>
    where
        C: Coupling<L, R>,
        C::Output: VectorSpace + Clone,
    {
        let order = self.boundary_order(history)?;
        let window = Window::locate(history, order)?;
        let end = ApproximateTime(time);
        if !time.is_finite() || !history.direction().less(&window.start, &end) {
            return Err(Error::DenseOutputOutOfRange {
                time,
                start: window.start.value(),
            });
        }
        check_remote_before(history, &end)?;

        let mut total = result.clone();
        boundary_impl(&mut total, &mut history.evaluator(coupling), window, &end)?;
        *result = total;
        Ok(())
    }

    /// Whether the next boundary step on `history` needs the reconciled
    /// (local time-stepping) path.
    ///
    /// # Errors
    ///
    /// Returns an error if the history cannot support a step at the current
    /// order.
    pub fn uses_local_time_stepping<L, R>(
        &self,
        history: &BoundaryHistory<L, R>,
    ) -> Result<bool, Error> {
        let order = self.boundary_order(history)?;
        Ok(!Window::locate(history, order)?.synchronized)
    }
}

/// Positions of the samples relevant to one boundary step.
#[derive(Debug, Clone, Copy)]
pub(super) struct Window {
    pub(super) order: usize,
    pub(super) start: TimeTag,
    pub(super) local_begin: usize,
    pub(super) remote_begin: usize,
    pub(super) remote_available: usize,
    pub(super) synchronized: bool,
}

impl Window {
    /// Finds the samples needed for a step of `order` from the latest local
    /// sample.
    ///
    /// Remote samples may extend past the step start when the neighbor took
    /// shorter steps; the window then starts `order` samples before the first
    /// remote sample after the step start.
    pub(super) fn locate<L, R>(history: &BoundaryHistory<L, R>, order: usize) -> Result<Self, Error> {
        let direction = history.direction();
        let local = history.local();
        let remote = history.remote();

        if local.len() < order || order == 0 {
            return Err(Error::InsufficientHistory {
                side: Side::Local,
                have: local.len(),
                need: order.max(1),
            });
        }
        let local_begin = local.len() - order;
        let start = local[local.len() - 1].tag;
        let remote_available = remote.partition_point(|entry| !direction.less(&start, &entry.tag));

        let synchronized = remote.len() >= order
            && local[local_begin..]
                .iter()
                .zip(&remote[remote.len() - order..])
                .all(|(l, r)| l.tag == r.tag);
        if synchronized {
            return Ok(Self {
                order,
                start,
                local_begin,
                remote_begin: remote.len() - order,
                remote_available,
                synchronized,
            });
        }

        if remote_available < order {
            return Err(Error::InsufficientHistory {
                side: Side::Remote,
                have: remote_available,
                need: order,
            });
        }

        Ok(Self {
            order,
            start,
            local_begin,
            remote_begin: remote_available - order,
            remote_available,
            synchronized,
        })
    }
}

/// Requires every remote sample to precede the end of the integration.
fn check_remote_before<L, R, E: EndTime>(
    history: &BoundaryHistory<L, R>,
    end: &E,
) -> Result<(), Error> {
    match history.remote_last() {
        Some(latest) if !history.direction().less(&latest.tag, end) => {
            Err(Error::HistoryNotYetArrived {
                latest: latest.tag.value(),
                end: end.value(),
            })
        }
        _ => Ok(()),
    }
}

/// Accumulates the boundary correction over `window` up to `end`.
#[allow(clippy::float_cmp)]
pub(super) fn boundary_impl<L, R, C, E>(
    result: &mut C::Output,
    evaluator: &mut BoundaryEvaluator<'_, L, R, C>,
    window: Window,
    end: &E,
) -> Result<(), Error>
where
    C: Coupling<L, R>,
    C::Output: VectorSpace,
    E: EndTime,
{
    let history = evaluator.history();
    let direction = history.direction();
    let order = window.order;
    let local = &history.local()[window.local_begin..];
    let remote = &history.remote()[window.remote_begin..];

    if window.synchronized {
        debug!("synchronized boundary step of order {order}");
        let step = end.since(&window.start);
        let times: Vec<TimeTag> = local.iter().map(|entry| entry.tag).collect();
        for (i, weight) in coefficients(&steps_between(&times, step)).iter().enumerate() {
            let value = evaluator
                .evaluate(window.local_begin + i, window.remote_begin + i)
                .map_err(Error::coupling)?;
            result.add_scaled(step * weight, value);
        }
        return Ok(());
    }

    debug!(
        "reconciling {} local and {} remote samples at order {order}",
        local.len(),
        remote.len()
    );

    let mut timeline = UnionTimeline::new(local, remote, direction, order, end);
    let step_start = timeline.position(&window.start);
    let local_times: Vec<f64> = local.iter().map(|entry| entry.tag.value()).collect();
    let remote_times: Vec<f64> = remote.iter().map(|entry| entry.tag.value()).collect();

    for (local_pos, local_entry) in local.iter().enumerate() {
        let local_union = timeline.position(&local_entry.tag);
        let local_on_remote = contains(remote, &local_entry.tag, direction);

        for (remote_pos, remote_entry) in remote.iter().enumerate() {
            let mut deriv_coef = 0.0;

            if local_entry.tag == remote_entry.tag {
                // Both sides evaluated at this time: an ordinary
                // Adams-Bashforth contribution to each sub-interval it controls.
                for n in step_start..timeline.advance(local_union) {
                    deriv_coef += timeline.base_summand(n, local_union);
                }
            } else {
                let remote_union = timeline.position(&remote_entry.tag);
                let lower = step_start.max(remote_union);

                // Estimate the local side at the remote time by interpolating
                // over the local samples. Skipped when a local sample exists
                // at that time, since the basis polynomial vanishes there.
                if !contains(local, &remote_entry.tag, direction) {
                    let mut summand = 0.0;
                    for n in lower..timeline.advance(remote_union) {
                        summand += timeline.base_summand(n, remote_union);
                    }
                    deriv_coef += summand
                        * lagrange_basis(local_pos, remote_entry.tag.value(), &local_times);
                }

                // Estimate the remote side at the local time. The newest
                // usable remote sample depends on the sub-interval, so the
                // control points are chosen per sub-interval.
                if !local_on_remote {
                    let mut upper = timeline.advance(local_union);
                    if let Some(later) = remote.get(remote_pos + order) {
                        upper = upper.min(timeline.position(&later.tag));
                    }
                    for n in lower..upper {
                        let newest = timeline.newest_at(n, remote);
                        let first = newest + 1 - order;
                        debug_assert!((first..=newest).contains(&remote_pos));
                        deriv_coef += timeline.base_summand(n, local_union)
                            * lagrange_basis(
                                remote_pos - first,
                                local_entry.tag.value(),
                                &remote_times[first..=newest],
                            );
                    }
                }
            }

            if deriv_coef == 0.0 {
                trace!("skipping coupling for pair ({local_pos}, {remote_pos})");
                continue;
            }

            let value = evaluator
                .evaluate(window.local_begin + local_pos, window.remote_begin + remote_pos)
                .map_err(Error::coupling)?;
            result.add_scaled(deriv_coef, value);
        }
    }

    trace!(
        "boundary step used {} coefficient sets ({} cache hits)",
        timeline.cache.misses(),
        timeline.cache.hits()
    );
    Ok(())
}

/// Whether a sample exists at exactly `tag`.
fn contains<T>(entries: &[Entry<T>], tag: &TimeTag, direction: EvolutionDirection) -> bool {
    entries
        .binary_search_by(|entry| direction.cmp(&entry.tag, tag))
        .is_ok()
}

/// The merged step boundaries of both sides, with cached step coefficients.
struct UnionTimeline<'e, E> {
    times: Vec<TimeTag>,
    direction: EvolutionDirection,
    order: usize,
    end: &'e E,
    cache: CoefficientCache,
}

impl<'e, E: EndTime> UnionTimeline<'e, E> {
    fn new<L, R>(
        local: &[Entry<L>],
        remote: &[Entry<R>],
        direction: EvolutionDirection,
        order: usize,
        end: &'e E,
    ) -> Self {
        let mut times = Vec::with_capacity(local.len() + remote.len());
        let (mut i, mut j) = (0, 0);
        while i < local.len() && j < remote.len() {
            match direction.cmp(&local[i].tag, &remote[j].tag) {
                Ordering::Less => {
                    times.push(local[i].tag);
                    i += 1;
                }
                Ordering::Greater => {
                    times.push(remote[j].tag);
                    j += 1;
                }
                Ordering::Equal => {
                    times.push(local[i].tag);
                    i += 1;
                    j += 1;
                }
            }
        }
        times.extend(local[i..].iter().map(|entry| entry.tag));
        times.extend(remote[j..].iter().map(|entry| entry.tag));
        debug_assert!(direction.is_strictly_sorted(&times), "union timeline out of order");

        Self {
            times,
            direction,
            order,
            end,
            cache: CoefficientCache::new(),
        }
    }

    /// Position of the first union time not before `tag`.
    fn position(&self, tag: &TimeTag) -> usize {
        self.times
            .partition_point(|time| self.direction.less(time, tag))
    }

    /// `position + order`, clamped to the end of the timeline.
    fn advance(&self, position: usize) -> usize {
        (position + self.order).min(self.times.len())
    }

    /// Position within `remote` of the newest sample not after union time `n`.
    fn newest_at<T>(&self, n: usize, remote: &[Entry<T>]) -> usize {
        let time = &self.times[n];
        remote.partition_point(|entry| !self.direction.less(time, &entry.tag)) - 1
    }

    /// Size of the union sub-interval starting at position `n`.
    fn step_size(&self, n: usize) -> f64 {
        match self.times.get(n + 1) {
            Some(next) => next.value() - self.times[n].value(),
            None => self.end.since(&self.times[n]),
        }
    }

    /// The weight of the evaluation at union position `evaluation` in an
    /// Adams-Bashforth step over the union sub-interval starting at `step`.
    fn base_summand(&mut self, step: usize, evaluation: usize) -> f64 {
        let size = self.step_size(step);
        let past = &self.times[step + 1 - self.order..=step];
        let weights = self
            .cache
            .get_or_insert_with(step, size, || coefficients(&steps_between(past, size)));
        size * weights[self.order - 1 - (step - evaluation)]
    }
}
